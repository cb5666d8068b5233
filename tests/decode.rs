//! End-to-end decode scenarios over the public API, driving the packets a
//! proxy actually sees: frame splitting, prepare acknowledgement, then the
//! execute request decoded with the parameter count cached from it.

use bytes::BytesMut;
use tokio_util::codec::Decoder as _;

use relay_mysql::protocol::packet::{PacketDecoder, PacketHeader};
use relay_mysql::{ParamValue, PrepareOk, StmtExecute};

const PREPARE_OK_PACKET: &[u8] = &[
    0x0c, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x04, 0x00, 0x04, 0x00, 0x00, 0x00,
    0x00,
];

const EXECUTE_PACKET: &[u8] = &[
    0x34, 0x00, 0x00, 0x00, 0x17, 0x01, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    0x01, 0x08, 0x00, 0x08, 0x00, 0x05, 0x00, 0x05, 0x00, 0x39, 0x30, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0xc7, 0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xcd, 0xcc, 0xcc, 0xcc, 0xcc,
    0xdc, 0x5e, 0x40, 0xcd, 0xcc, 0xcc, 0xcc, 0xcc, 0xdc, 0x5e, 0xc0,
];

#[test]
fn prepare_then_execute_flow() {
    // Server side: the proxy decodes the prepare acknowledgement and
    // caches the parameter count for statement 1.
    let prepare_ok = *PrepareOk::decode(PREPARE_OK_PACKET).expect("valid prepare-ok");
    assert_eq!(prepare_ok.statement_id(), 1);
    let cached_params = prepare_ok.num_params() as usize;

    // Client side: the execute request decodes against that count.
    let execute = StmtExecute::decode(EXECUTE_PACKET, cached_params).expect("valid execute");
    assert_eq!(execute.statement_id, prepare_ok.statement_id());
    assert_eq!(execute.parameters.len(), cached_params);

    let rendered: Vec<_> = execute
        .parameters
        .iter()
        .map(|p| match &p.value {
            ParamValue::Text(text) => text.clone(),
            ParamValue::Null => "NULL".to_owned(),
        })
        .collect();
    assert_eq!(rendered, ["12345", "-12345", "123.450000", "-123.450000"]);
}

#[test]
fn frame_header_matches_captured_packets() {
    for packet in [PREPARE_OK_PACKET, EXECUTE_PACKET] {
        let header = PacketHeader::from_bytes(packet).expect("valid header");
        assert!(header.matches(packet));
    }
}

#[test]
fn packet_decoder_splits_coalesced_stream() {
    // A TCP read can hand the relay both packets in one buffer.
    let mut stream = BytesMut::new();
    stream.extend_from_slice(PREPARE_OK_PACKET);
    stream.extend_from_slice(EXECUTE_PACKET);

    let mut decoder = PacketDecoder::new();
    let (seq1, payload1) = decoder
        .decode(&mut stream)
        .expect("no error")
        .expect("first packet");
    let (seq2, payload2) = decoder
        .decode(&mut stream)
        .expect("no error")
        .expect("second packet");

    assert_eq!(seq1, 1);
    assert_eq!(payload1.len(), 12);
    assert_eq!(seq2, 0);
    assert_eq!(payload2.len(), 0x34);
    assert!(stream.is_empty());
    assert!(decoder.decode(&mut stream).expect("no error").is_none());
}

#[test]
fn prepare_ok_truncated_to_twelve_bytes_fails() {
    let result = PrepareOk::decode(&PREPARE_OK_PACKET[..12]);
    assert!(matches!(
        result,
        Err(relay_mysql::Error::InvalidPacketLength {
            expected: 16,
            actual: 12
        })
    ));
}

#[test]
fn execute_round_trips_string_parameters() {
    let params = ["1.2345678910111E+21", "XYZZZZ", "ABCDEFGHIKLMONPQRSTYW"];

    let mut packet = vec![0u8; 4];
    packet.push(0x17);
    packet.extend_from_slice(&1u32.to_le_bytes());
    packet.push(0x00);
    packet.extend_from_slice(&1u32.to_le_bytes());
    packet.push(0x00); // null bitmap
    packet.push(0x01); // new-params-bind flag
    for _ in &params {
        packet.extend_from_slice(&[0xfd, 0x00]);
    }
    for param in &params {
        packet.push(param.len() as u8);
        packet.extend_from_slice(param.as_bytes());
    }
    let payload_len = (packet.len() - 4) as u32;
    packet[..3].copy_from_slice(&payload_len.to_le_bytes()[..3]);

    let decoded = StmtExecute::decode(&packet, params.len()).expect("valid packet");
    for (param, expected) in decoded.parameters.iter().zip(params) {
        assert_eq!(param.value, ParamValue::Text(expected.to_owned()));
    }
}
