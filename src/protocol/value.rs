/// MySQL binary protocol parameter values, rendered to canonical text.
use crate::constant::{ColumnType, ParamFlags};
use crate::error::{Error, Result};
use crate::protocol::primitive::*;
use simdutf8::basic::from_utf8;
use zerocopy::byteorder::little_endian::{U16 as U16LE, U32 as U32LE};
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Decoded 2-byte type descriptor of one bound parameter.
///
/// Low byte is the wire type code, high byte the parameter flags. `Copy`,
/// so a connection handler can cache an execution's descriptor array and
/// thread it back in when a later packet reuses previously bound types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamType {
    pub column_type: ColumnType,
    pub flags: ParamFlags,
}

impl ParamType {
    /// Read one descriptor from the type array.
    ///
    /// `index` is the parameter's position, carried into the error when the
    /// type code is outside the known register.
    pub fn read(data: &[u8], index: usize) -> Result<(Self, &[u8])> {
        if data.len() < 2 {
            return Err(Error::InvalidPacketLength {
                expected: 2,
                actual: data.len(),
            });
        }
        let column_type = ColumnType::from_u8(data[0]).ok_or(Error::UnsupportedParameterType {
            code: data[0],
            index,
        })?;
        let flags = ParamFlags::from_bits_truncate(data[1]);
        Ok((Self { column_type, flags }, &data[2..]))
    }

    pub fn is_unsigned(&self) -> bool {
        self.flags.contains(ParamFlags::UNSIGNED)
    }
}

/// One bound parameter's value.
///
/// NULL-flagged parameters keep their positional slot; the decoder never
/// drops an entry, so index i here always matches descriptor i.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Canonical text rendering of the value
    Text(String),
    /// SQL NULL
    Null,
}

impl ParamValue {
    /// Decode a single binary protocol value per its type descriptor.
    ///
    /// Returns the rendered value and the remaining bytes. Integers render
    /// base-10 with no leading zeros, floating point renders fixed-point
    /// with 6 fractional digits, strings are taken verbatim (validated as
    /// UTF-8, no charset transcoding).
    pub fn parse(param_type: ParamType, data: &[u8], index: usize) -> Result<(Self, &[u8])> {
        let unsigned = param_type.is_unsigned();

        match param_type.column_type {
            ColumnType::MYSQL_TYPE_NULL => Ok((Self::Null, data)),

            ColumnType::MYSQL_TYPE_TINY => {
                let (val, rest) = read_int_1(data)?;
                let text = if unsigned {
                    val.to_string()
                } else {
                    (val as i8).to_string()
                };
                Ok((Self::Text(text), rest))
            }

            ColumnType::MYSQL_TYPE_SHORT | ColumnType::MYSQL_TYPE_YEAR => {
                let (val, rest) = read_int_2(data)?;
                let text = if unsigned || param_type.column_type == ColumnType::MYSQL_TYPE_YEAR {
                    val.to_string()
                } else {
                    (val as i16).to_string()
                };
                Ok((Self::Text(text), rest))
            }

            ColumnType::MYSQL_TYPE_INT24 | ColumnType::MYSQL_TYPE_LONG => {
                let (val, rest) = read_int_4(data)?;
                let text = if unsigned {
                    val.to_string()
                } else {
                    (val as i32).to_string()
                };
                Ok((Self::Text(text), rest))
            }

            ColumnType::MYSQL_TYPE_LONGLONG => {
                let (val, rest) = read_int_8(data)?;
                let text = if unsigned {
                    val.to_string()
                } else {
                    (val as i64).to_string()
                };
                Ok((Self::Text(text), rest))
            }

            ColumnType::MYSQL_TYPE_FLOAT => {
                let (val, rest) = read_int_4(data)?;
                Ok((Self::Text(format!("{:.6}", f32::from_bits(val))), rest))
            }

            ColumnType::MYSQL_TYPE_DOUBLE => {
                let (val, rest) = read_int_8(data)?;
                Ok((Self::Text(format!("{:.6}", f64::from_bits(val))), rest))
            }

            ColumnType::MYSQL_TYPE_DATE
            | ColumnType::MYSQL_TYPE_NEWDATE
            | ColumnType::MYSQL_TYPE_DATETIME
            | ColumnType::MYSQL_TYPE_TIMESTAMP
            | ColumnType::MYSQL_TYPE_DATETIME2
            | ColumnType::MYSQL_TYPE_TIMESTAMP2 => {
                let date_only = matches!(
                    param_type.column_type,
                    ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE
                );
                let (text, rest) = read_timestamp(data, date_only)?;
                Ok((Self::Text(text), rest))
            }

            ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => {
                let (text, rest) = read_time(data)?;
                Ok((Self::Text(text), rest))
            }

            ColumnType::MYSQL_TYPE_VARCHAR
            | ColumnType::MYSQL_TYPE_VAR_STRING
            | ColumnType::MYSQL_TYPE_STRING
            | ColumnType::MYSQL_TYPE_BLOB
            | ColumnType::MYSQL_TYPE_TINY_BLOB
            | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
            | ColumnType::MYSQL_TYPE_LONG_BLOB
            | ColumnType::MYSQL_TYPE_GEOMETRY
            | ColumnType::MYSQL_TYPE_JSON
            | ColumnType::MYSQL_TYPE_DECIMAL
            | ColumnType::MYSQL_TYPE_NEWDECIMAL
            | ColumnType::MYSQL_TYPE_ENUM
            | ColumnType::MYSQL_TYPE_SET
            | ColumnType::MYSQL_TYPE_BIT
            | ColumnType::MYSQL_TYPE_TYPED_ARRAY => {
                let (bytes, rest) = read_string_lenenc(data)?;
                let text = from_utf8(bytes).map_err(|_| Error::UnsupportedParameterType {
                    code: param_type.column_type as u8,
                    index,
                })?;
                Ok((Self::Text(text.to_owned()), rest))
            }
        }
    }
}

// ============================================================================
// Temporal layouts
// ============================================================================

/// DATE/DATETIME/TIMESTAMP - 4 bytes (date only)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
struct Timestamp4 {
    year: U16LE,
    month: u8,
    day: u8,
}

/// DATE/DATETIME/TIMESTAMP - 7 bytes (without microseconds)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
struct Timestamp7 {
    year: U16LE,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

/// DATE/DATETIME/TIMESTAMP - 11 bytes (with microseconds)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
struct Timestamp11 {
    year: U16LE,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    microsecond: U32LE,
}

/// TIME - 8 bytes (without microseconds)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
struct Time8 {
    is_negative: u8,
    days: U32LE,
    hour: u8,
    minute: u8,
    second: u8,
}

/// TIME - 12 bytes (with microseconds)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
struct Time12 {
    is_negative: u8,
    days: U32LE,
    hour: u8,
    minute: u8,
    second: u8,
    microsecond: U32LE,
}

fn render_date(year: u16, month: u8, day: u8) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}

/// Temporal values carry a 1-byte length then a 0/4/7/11-byte body.
fn read_timestamp(data: &[u8], date_only: bool) -> Result<(String, &[u8])> {
    let (len, rest) = read_int_1(data)?;
    match len {
        0 if date_only => Ok(("0000-00-00".to_owned(), rest)),
        0 => Ok(("0000-00-00 00:00:00".to_owned(), rest)),
        4 => {
            let (bytes, rest) = read_string_fix(rest, 4)?;
            let ts = Timestamp4::read_from_bytes(bytes).map_err(Error::from_debug)?;
            let date = render_date(ts.year.get(), ts.month, ts.day);
            let text = if date_only {
                date
            } else {
                format!("{date} 00:00:00")
            };
            Ok((text, rest))
        }
        7 => {
            let (bytes, rest) = read_string_fix(rest, 7)?;
            let ts = Timestamp7::read_from_bytes(bytes).map_err(Error::from_debug)?;
            let text = format!(
                "{} {:02}:{:02}:{:02}",
                render_date(ts.year.get(), ts.month, ts.day),
                ts.hour,
                ts.minute,
                ts.second
            );
            Ok((text, rest))
        }
        11 => {
            let (bytes, rest) = read_string_fix(rest, 11)?;
            let ts = Timestamp11::read_from_bytes(bytes).map_err(Error::from_debug)?;
            let text = format!(
                "{} {:02}:{:02}:{:02}.{:06}",
                render_date(ts.year.get(), ts.month, ts.day),
                ts.hour,
                ts.minute,
                ts.second,
                ts.microsecond.get()
            );
            Ok((text, rest))
        }
        other => Err(Error::InvalidPacketLength {
            expected: 11,
            actual: other as usize,
        }),
    }
}

/// TIME values carry a 1-byte length then a 0/8/12-byte body; days fold
/// into the hour field of the rendering.
fn read_time(data: &[u8]) -> Result<(String, &[u8])> {
    let (len, rest) = read_int_1(data)?;
    match len {
        0 => Ok(("00:00:00".to_owned(), rest)),
        8 => {
            let (bytes, rest) = read_string_fix(rest, 8)?;
            let time = Time8::read_from_bytes(bytes).map_err(Error::from_debug)?;
            let sign = if time.is_negative != 0 { "-" } else { "" };
            let hours = time.days.get() as u64 * 24 + time.hour as u64;
            let text = format!("{sign}{hours:02}:{:02}:{:02}", time.minute, time.second);
            Ok((text, rest))
        }
        12 => {
            let (bytes, rest) = read_string_fix(rest, 12)?;
            let time = Time12::read_from_bytes(bytes).map_err(Error::from_debug)?;
            let sign = if time.is_negative != 0 { "-" } else { "" };
            let hours = time.days.get() as u64 * 24 + time.hour as u64;
            let text = format!(
                "{sign}{hours:02}:{:02}:{:02}.{:06}",
                time.minute,
                time.second,
                time.microsecond.get()
            );
            Ok((text, rest))
        }
        other => Err(Error::InvalidPacketLength {
            expected: 12,
            actual: other as usize,
        }),
    }
}

// ============================================================================
// NULL Bitmap
// ============================================================================

/// NULL bitmap preceding the type descriptors of a COM_STMT_EXECUTE body.
///
/// Bit i set means parameter i is SQL NULL and contributes no bytes to the
/// value stream. Parameter bitmaps start at bit 0 (the result-set variant
/// with its 2-bit offset does not occur on this path).
#[derive(Debug, Clone, Copy)]
pub struct NullBitmap<'a> {
    bitmap: &'a [u8],
}

impl<'a> NullBitmap<'a> {
    /// Bitmap size in bytes for `num_params` parameters.
    pub fn size(num_params: usize) -> usize {
        num_params.div_ceil(8)
    }

    /// Split the bitmap off the front of `data`.
    pub fn read(data: &'a [u8], num_params: usize) -> Result<(Self, &'a [u8])> {
        let size = Self::size(num_params);
        if data.len() < size {
            return Err(Error::InvalidPacketLength {
                expected: size,
                actual: data.len(),
            });
        }
        Ok((
            Self {
                bitmap: &data[..size],
            },
            &data[size..],
        ))
    }

    /// Check if the parameter at the given index is NULL.
    pub fn is_null(&self, idx: usize) -> bool {
        let byte_pos = idx >> 3;
        let bit_offset = idx & 7;

        if byte_pos >= self.bitmap.len() {
            return false;
        }

        (self.bitmap[byte_pos] & (1 << bit_offset)) != 0
    }
}

// ============================================================================
// Tests
// ============================================================================
