use crate::error::{Error, Result};
use crate::protocol::packet::PacketHeader;
use tracing::trace;
use zerocopy::byteorder::little_endian::{U16 as U16LE, U32 as U32LE};
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// COM_STMT_PREPARE OK response body (zero-copy)
///
/// Layout after the 4-byte packet header:
/// - status: 1 byte (0x00 on success)
/// - statement_id: 4 bytes (little-endian)
/// - num_columns: 2 bytes (little-endian)
/// - num_params: 2 bytes (little-endian)
/// - filler: 1 byte
/// - num_warnings: 2 bytes (little-endian)
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, KnownLayout, Immutable)]
pub struct PrepareOk {
    status: u8,
    statement_id: U32LE,
    num_columns: U16LE,
    num_params: U16LE,
    _filler: u8,
    num_warnings: U16LE,
}

impl PrepareOk {
    /// Fixed body size on the wire.
    pub const WIRE_SIZE: usize = 12;

    /// Decode a framed COM_STMT_PREPARE OK packet.
    ///
    /// The caller has already classified the message as a prepare
    /// acknowledgement, so no command-byte discrimination happens here.
    /// The struct is `Copy`; dereference the returned view to own it past
    /// the input buffer's lifetime.
    pub fn decode(packet: &[u8]) -> Result<&Self> {
        let min = PacketHeader::SIZE + Self::WIRE_SIZE;
        if packet.len() < min {
            return Err(Error::InvalidPacketLength {
                expected: min,
                actual: packet.len(),
            });
        }
        let ok = Self::ref_from_bytes(&packet[PacketHeader::SIZE..min]).map_err(Error::from_debug)?;
        trace!(
            statement_id = ok.statement_id(),
            num_params = ok.num_params(),
            "decoded COM_STMT_PREPARE OK"
        );
        Ok(ok)
    }

    pub fn status(&self) -> u8 {
        self.status
    }

    /// Get the statement ID assigned by the server
    pub fn statement_id(&self) -> u32 {
        self.statement_id.get()
    }

    /// Get the number of columns in the result set
    pub fn num_columns(&self) -> u16 {
        self.num_columns.get()
    }

    /// Get the number of parameters in the prepared statement
    pub fn num_params(&self) -> u16 {
        self.num_params.get()
    }

    /// Get the warning count
    pub fn num_warnings(&self) -> u16 {
        self.num_warnings.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Captured prepare acknowledgement: statement 1, 4 columns, 4 params.
    const PREPARE_OK_PACKET: &[u8] = &[
        0x0c, 0x00, 0x00, 0x01, // header: length 12, seq 1
        0x00, // status
        0x01, 0x00, 0x00, 0x00, // statement id = 1
        0x04, 0x00, // num columns = 4
        0x04, 0x00, // num params = 4
        0x00, // filler
        0x00, 0x00, // num warnings = 0
    ];

    #[test]
    fn test_decode_prepare_ok() {
        let decoded = PrepareOk::decode(PREPARE_OK_PACKET).expect("valid packet");
        assert_eq!(decoded.status(), 0);
        assert_eq!(decoded.statement_id(), 1);
        assert_eq!(decoded.num_columns(), 4);
        assert_eq!(decoded.num_params(), 4);
        assert_eq!(decoded.num_warnings(), 0);
    }

    #[test]
    fn test_decode_truncated() {
        for cut in 0..PREPARE_OK_PACKET.len() {
            let result = PrepareOk::decode(&PREPARE_OK_PACKET[..cut]);
            assert!(
                matches!(
                    result,
                    Err(Error::InvalidPacketLength {
                        expected: 16,
                        actual
                    }) if actual == cut
                ),
                "prefix of {cut} bytes must fail"
            );
        }
    }

    #[test]
    fn test_decoded_value_outlives_input() {
        let owned = {
            let packet = PREPARE_OK_PACKET.to_vec();
            *PrepareOk::decode(&packet).expect("valid packet")
        };
        assert_eq!(owned.statement_id(), 1);
    }
}
