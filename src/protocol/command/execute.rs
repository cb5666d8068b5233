use crate::constant::CommandByte;
use crate::error::{Error, Result};
use crate::protocol::primitive::*;
use crate::protocol::value::{NullBitmap, ParamType, ParamValue};
use tracing::trace;

/// Offset of the command byte, right after the 4-byte packet header.
const COMMAND_OFFSET: usize = 4;
/// Command byte + statement id (4) + cursor flags (1) + iteration count (4).
const FIXED_HEADER_END: usize = 15;

/// One bound parameter slot: its wire descriptor and decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedParameter {
    pub param_type: ParamType,
    pub value: ParamValue,
}

/// Decoded COM_STMT_EXECUTE request.
///
/// `parameters` holds exactly the expected parameter count, in declaration
/// order; NULL-flagged slots carry [`ParamValue::Null`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StmtExecute {
    pub statement_id: u32,
    pub cursor_flags: u8,
    pub iteration_count: u32,
    pub parameters: Vec<PreparedParameter>,
}

impl StmtExecute {
    /// Decode a framed COM_STMT_EXECUTE packet.
    ///
    /// `expected_params` comes from the COM_STMT_PREPARE OK response the
    /// caller cached for this statement id; the packet itself does not
    /// carry the count. Fails with [`Error::MissingParameterTypes`] when
    /// the packet reuses previously bound types (new-params-bind flag 0);
    /// use [`StmtExecute::decode_with_types`] for that path.
    pub fn decode(packet: &[u8], expected_params: usize) -> Result<Self> {
        Self::decode_inner(packet, expected_params, None)
    }

    /// Decode a packet whose type descriptors were bound by an earlier
    /// execution of the same statement.
    ///
    /// `cached_types` is the descriptor array the caller kept from that
    /// execution; its length is the expected parameter count. A packet
    /// that does carry a fresh descriptor array (flag 1) decodes with the
    /// fresh types, as the server would.
    pub fn decode_with_types(packet: &[u8], cached_types: &[ParamType]) -> Result<Self> {
        Self::decode_inner(packet, cached_types.len(), Some(cached_types))
    }

    fn decode_inner(
        packet: &[u8],
        expected_params: usize,
        cached_types: Option<&[ParamType]>,
    ) -> Result<Self> {
        if packet.len() < COMMAND_OFFSET + 1 {
            return Err(Error::InvalidPacketLength {
                expected: COMMAND_OFFSET + 1,
                actual: packet.len(),
            });
        }

        let command = packet[COMMAND_OFFSET];
        if command != CommandByte::StmtExecute as u8 {
            return Err(Error::InvalidPacketType {
                expected: CommandByte::StmtExecute as u8,
                actual: command,
            });
        }

        if packet.len() < FIXED_HEADER_END {
            return Err(Error::InvalidPacketLength {
                expected: FIXED_HEADER_END,
                actual: packet.len(),
            });
        }

        let data = &packet[COMMAND_OFFSET + 1..];
        let (statement_id, data) = read_int_4(data)?;
        let (cursor_flags, data) = read_int_1(data)?;
        let (iteration_count, mut data) = read_int_4(data)?;

        let mut parameters = Vec::with_capacity(expected_params);
        if expected_params > 0 {
            let (bitmap, rest) = NullBitmap::read(data, expected_params)?;
            let (bind_flag, rest) = read_int_1(rest)?;
            data = rest;

            let types = match bind_flag {
                0x01 => {
                    let mut types = Vec::with_capacity(expected_params);
                    for index in 0..expected_params {
                        let (param_type, rest) = ParamType::read(data, index)?;
                        data = rest;
                        types.push(param_type);
                    }
                    types
                }
                0x00 => match cached_types {
                    Some(cached) => cached.to_vec(),
                    None => return Err(Error::MissingParameterTypes),
                },
                other => {
                    return Err(Error::InvalidPacketType {
                        expected: 0x01,
                        actual: other,
                    });
                }
            };

            for (index, &param_type) in types.iter().enumerate() {
                let value = if bitmap.is_null(index) {
                    ParamValue::Null
                } else {
                    let (value, rest) = ParamValue::parse(param_type, data, index)?;
                    data = rest;
                    value
                };
                parameters.push(PreparedParameter { param_type, value });
            }
        }

        trace!(
            statement_id,
            num_params = parameters.len(),
            "decoded COM_STMT_EXECUTE"
        );

        Ok(Self {
            statement_id,
            cursor_flags,
            iteration_count,
            parameters,
        })
    }
}
