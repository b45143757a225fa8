//! Integration tests for the `uframe` subcommands against an in-memory line.

use std::io::Cursor;

use uart_frame_cli::commands::{self, SessionSummary};
use uart_frame_cli::CliError;
use uart_frame_exchange::{ExchangeError, MemoryLine, SerialSettings};
use uart_frame_protocol::{FieldText, ProtocolError};

fn fields(line: &str) -> FieldText {
    FieldText::from_hex_line(line).expect("nine fields")
}

fn text(out: Vec<u8>) -> String {
    String::from_utf8(out).expect("utf-8 output")
}

// ============================================================================
// Offline commands
// ============================================================================

#[test]
fn test_encode_prints_frame_and_checksum() {
    let mut out = Vec::new();
    commands::encode(&fields("02 01 10 00 00 00 00 00 05"), &mut out, false).expect("encode");

    let text = text(out);
    assert!(text.contains("Frame: 02 01 10 00 00 00 00 00 05 18"), "{}", text);
    assert!(text.contains("Checksum: 18 (valid)"), "{}", text);
}

#[test]
fn test_encode_out_of_range() {
    let mut out = Vec::new();
    let err = commands::encode(&fields("02 01 10 00 00 00 00 00 100"), &mut out, false).unwrap_err();
    assert!(matches!(
        err,
        CliError::Protocol(ProtocolError::OutOfRange { value: 0x100, .. })
    ));
    assert!(out.is_empty());
}

#[test]
fn test_decode_reports_mismatch() {
    let mut out = Vec::new();
    let bytes: Vec<String> = "02 01 10 00 00 00 00 00 05 19".split(' ').map(String::from).collect();
    commands::decode(&bytes, &mut out, false).expect("mismatch still decodes");

    let text = text(out);
    assert!(text.contains("Checksum: 18 (MISMATCH, frame carries 19)"), "{}", text);
}

#[test]
fn test_decode_accepts_compact_hex() {
    let mut out = Vec::new();
    commands::decode(&["02011000000000000518".to_string()], &mut out, true).expect("decode");

    let value: serde_json::Value = serde_json::from_str(text(out).trim()).expect("json");
    assert_eq!(value["event"], "decoded");
    assert_eq!(value["record"]["checksum_valid"], true);
    assert_eq!(value["record"]["fields"]["data"], serde_json::json!([0, 0, 0, 5]));
}

#[test]
fn test_decode_wrong_length() {
    let mut out = Vec::new();
    let err = commands::decode(&["02 01 10".to_string()], &mut out, false).unwrap_err();
    assert!(matches!(
        err,
        CliError::Protocol(ProtocolError::ShortFrame {
            expected: 10,
            actual: 3
        })
    ));
}

#[test]
fn test_decode_invalid_hex() {
    let mut out = Vec::new();
    let err = commands::decode(&["0g".to_string()], &mut out, false).unwrap_err();
    assert!(matches!(err, CliError::InvalidBytes(_)));
}

// ============================================================================
// Send
// ============================================================================

#[test]
fn test_send_loopback() {
    let line = MemoryLine::echo();
    let mut out = Vec::new();
    commands::send(
        line.connector(),
        SerialSettings::default(),
        "loopback",
        &fields("02 01 10 00 00 00 00 00 05"),
        &mut out,
        false,
    )
    .expect("send");

    assert_eq!(
        text(out),
        "Status: Connected (loopback)\n\
         Frame Sent: 02 01 10 00 00 00 00 00 05 18\n\
         Frame Received: 02 01 10 00 00 00 00 00 05 18\n  \
         Checksum: 18 (valid)\n\
         Status: Disconnected\n"
    );
    assert_eq!(line.live_handles(), 0);
}

#[test]
fn test_send_timeout_is_error_and_closes() {
    let line = MemoryLine::new();
    line.push_response(vec![0x02; 9]);
    let mut out = Vec::new();

    let err = commands::send(
        line.connector(),
        SerialSettings::default(),
        "COM3",
        &fields("02 01 10 00 00 00 00 00 05"),
        &mut out,
        false,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CliError::Exchange(ExchangeError::Timeout { received: 9, .. })
    ));
    let text = text(out);
    assert!(text.contains("Frame Sent:"), "{}", text);
    assert!(!text.contains("Frame Received:"), "{}", text);
    assert!(text.ends_with("Status: Disconnected\n"), "{}", text);
    assert_eq!(line.live_handles(), 0);
}

#[test]
fn test_send_invalid_field_never_opens() {
    let line = MemoryLine::echo();
    let mut out = Vec::new();
    let err = commands::send(
        line.connector(),
        SerialSettings::default(),
        "COM3",
        &fields("02 01 xx 00 00 00 00 00 05"),
        &mut out,
        false,
    )
    .unwrap_err();

    assert!(matches!(err, CliError::Protocol(ProtocolError::InvalidHex { .. })));
    assert!(line.opened().is_empty());
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_session_runs_each_line() {
    let line = MemoryLine::new();
    line.push_response(vec![0x02, 0x01, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x18]);
    // second exchange: nothing arrives
    let input = Cursor::new(
        "# comment\n\
         02 01 10 00 00 00 00 00 05\n\
         \n\
         02 01 11 00 00 00 00 00 05\n\
         02 01 12\n\
         quit\n\
         02 01 13 00 00 00 00 00 05\n",
    );
    let mut out = Vec::new();

    let summary = commands::session(
        line.connector(),
        SerialSettings::default(),
        "COM3",
        input,
        &mut out,
        false,
    )
    .expect("session");

    assert_eq!(
        summary,
        SessionSummary {
            completed: 1,
            failed: 1,
            checksum_mismatches: 0,
        }
    );
    assert_eq!(line.written().len(), 2);
    let text = text(out);
    assert!(text.contains("Error: timeout waiting for response"), "{}", text);
    assert!(text.contains("Error: wrong field count"), "{}", text);
}

#[test]
fn test_session_close_and_reopen() {
    let line = MemoryLine::echo();
    let input = Cursor::new(
        "close\n\
         02 01 10 00 00 00 00 00 05\n\
         open COM4\n\
         02 01 10 00 00 00 00 00 05\n",
    );
    let mut out = Vec::new();

    let summary = commands::session(
        line.connector(),
        SerialSettings::default(),
        "COM3",
        input,
        &mut out,
        true,
    )
    .expect("session");

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(line.opened(), vec!["COM3".to_string(), "COM4".to_string()]);
    assert_eq!(line.live_handles(), 0);

    let events: Vec<serde_json::Value> = text(out)
        .lines()
        .map(|l| serde_json::from_str(l).expect("json line"))
        .collect();
    let kinds: Vec<&str> = events.iter().filter_map(|e| e["event"].as_str()).collect();
    assert_eq!(
        kinds,
        vec!["status", "status", "error", "status", "status", "sent", "received", "status"]
    );
    assert_eq!(events[2]["message"], "not connected");
}

#[test]
fn test_session_counts_checksum_mismatch() {
    let line = MemoryLine::new();
    line.push_response(vec![0x02, 0x01, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00]);
    let mut out = Vec::new();

    let summary = commands::session(
        line.connector(),
        SerialSettings::default(),
        "COM3",
        Cursor::new("02 01 10 00 00 00 00 00 05\n"),
        &mut out,
        false,
    )
    .expect("session");

    assert_eq!(summary.completed, 1);
    assert_eq!(summary.checksum_mismatches, 1);
}

#[test]
fn test_session_failed_open_is_reported() {
    let line = MemoryLine::new();
    line.fail_next_open(std::io::ErrorKind::NotFound);
    let mut out = Vec::new();

    let summary = commands::session(
        line.connector(),
        SerialSettings::default(),
        "COM9",
        Cursor::new("02 01 10 00 00 00 00 00 05\n"),
        &mut out,
        false,
    )
    .expect("session keeps going");

    assert_eq!(summary.failed, 1);
    let text = text(out);
    assert!(text.contains("Error: failed to open COM9"), "{}", text);
    assert!(text.contains("Error: not connected"), "{}", text);
}
