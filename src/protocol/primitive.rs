use crate::error::{Error, Result};
use zerocopy::FromBytes;
use zerocopy::byteorder::little_endian::{U16 as U16LE, U32 as U32LE, U64 as U64LE};

/// Read 1-byte integer
pub fn read_int_1(data: &[u8]) -> Result<(u8, &[u8])> {
    if data.is_empty() {
        return Err(Error::InvalidPacketLength {
            expected: 1,
            actual: 0,
        });
    }
    Ok((data[0], &data[1..]))
}

/// Read 2-byte little-endian integer
pub fn read_int_2(data: &[u8]) -> Result<(u16, &[u8])> {
    if data.len() < 2 {
        return Err(Error::InvalidPacketLength {
            expected: 2,
            actual: data.len(),
        });
    }
    let value = U16LE::ref_from_bytes(&data[..2])
        .map_err(Error::from_debug)?
        .get();
    Ok((value, &data[2..]))
}

/// Read 3-byte little-endian integer
pub fn read_int_3(data: &[u8]) -> Result<(u32, &[u8])> {
    if data.len() < 3 {
        return Err(Error::InvalidPacketLength {
            expected: 3,
            actual: data.len(),
        });
    }
    let value = u32::from_le_bytes([data[0], data[1], data[2], 0]);
    Ok((value, &data[3..]))
}

/// Read 4-byte little-endian integer
pub fn read_int_4(data: &[u8]) -> Result<(u32, &[u8])> {
    if data.len() < 4 {
        return Err(Error::InvalidPacketLength {
            expected: 4,
            actual: data.len(),
        });
    }
    let value = U32LE::ref_from_bytes(&data[..4])
        .map_err(Error::from_debug)?
        .get();
    Ok((value, &data[4..]))
}

/// Read 8-byte little-endian integer
pub fn read_int_8(data: &[u8]) -> Result<(u64, &[u8])> {
    if data.len() < 8 {
        return Err(Error::InvalidPacketLength {
            expected: 8,
            actual: data.len(),
        });
    }
    let value = U64LE::ref_from_bytes(&data[..8])
        .map_err(Error::from_debug)?
        .get();
    Ok((value, &data[8..]))
}

/// Read length-encoded integer
///
/// Values below 0xFC are the single-byte fast path; 0xFC/0xFD/0xFE prefix
/// a 2/3/8-byte little-endian integer.
pub fn read_int_lenenc(data: &[u8]) -> Result<(u64, &[u8])> {
    if data.is_empty() {
        return Err(Error::InvalidPacketLength {
            expected: 1,
            actual: 0,
        });
    }

    match data[0] {
        0xFC => {
            let (val, rest) = read_int_2(&data[1..])?;
            Ok((val as u64, rest))
        }
        0xFD => {
            let (val, rest) = read_int_3(&data[1..])?;
            Ok((val as u64, rest))
        }
        0xFE => {
            let (val, rest) = read_int_8(&data[1..])?;
            Ok((val, rest))
        }
        val => Ok((val as u64, &data[1..])),
    }
}

/// Read fixed-length string
pub fn read_string_fix(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if data.len() < len {
        return Err(Error::InvalidPacketLength {
            expected: len,
            actual: data.len(),
        });
    }
    Ok((&data[..len], &data[len..]))
}

/// Read length-encoded string
pub fn read_string_lenenc(data: &[u8]) -> Result<(&[u8], &[u8])> {
    let (len, rest) = read_int_lenenc(data)?;
    read_string_fix(rest, len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_string_lenenc() {
        // length prefix 0x15 = 21 content bytes
        let data = [
            0x15, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4b, 0x4c, 0x4d, 0x4f,
            0x4e, 0x50, 0x51, 0x52, 0x53, 0x54, 0x59, 0x57,
        ];
        let (s, rest) = read_string_lenenc(&data).expect("valid lenenc string");
        assert_eq!(s, b"ABCDEFGHIKLMONPQRSTYW");
        assert_eq!(rest.len(), 0);
    }

    #[test]
    fn test_read_string_lenenc_multi_byte_prefix() {
        // 0xFC prefix: 2-byte length (300), then 300 content bytes
        let mut data = vec![0xFC, 0x2C, 0x01];
        data.extend(std::iter::repeat_n(b'x', 300));
        data.push(0xAA); // trailing byte must survive
        let (s, rest) = read_string_lenenc(&data).expect("valid lenenc string");
        assert_eq!(s.len(), 300);
        assert_eq!(rest, &[0xAA]);
    }

    #[test]
    fn test_read_string_lenenc_truncated() {
        // Every proper prefix of a valid lenenc string must fail, not read
        // past the buffer end.
        let mut data = vec![0x06];
        data.extend_from_slice(b"XYZZZZ");
        for cut in 0..data.len() {
            let result = read_string_lenenc(&data[..cut]);
            assert!(
                matches!(result, Err(Error::InvalidPacketLength { .. })),
                "prefix of {cut} bytes must fail"
            );
        }
    }

    #[test]
    fn test_read_int_lenenc_branches() {
        assert_eq!(read_int_lenenc(&[0xFA]).unwrap().0, 0xFA);
        assert_eq!(read_int_lenenc(&[0xFC, 0x34, 0x12]).unwrap().0, 0x1234);
        assert_eq!(
            read_int_lenenc(&[0xFD, 0x56, 0x34, 0x12]).unwrap().0,
            0x123456
        );
        assert_eq!(
            read_int_lenenc(&[0xFE, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11])
                .unwrap()
                .0,
            0x1122334455667788
        );
    }

    #[test]
    fn test_read_int_fixed_width_truncated() {
        assert!(read_int_1(&[]).is_err());
        assert!(read_int_2(&[0x01]).is_err());
        assert!(read_int_3(&[0x01, 0x02]).is_err());
        assert!(read_int_4(&[0x01, 0x02, 0x03]).is_err());
        assert!(read_int_8(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]).is_err());
    }
}
