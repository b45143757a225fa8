//! Subcommand implementations.
//!
//! Each command writes to a caller-supplied stream and is generic over the
//! [`Connector`], so the same code runs against a serial port or an
//! in-memory line.

use std::io::{BufRead, Write};

use serialport::SerialPortType;
use tracing::{debug, info};
use uart_frame_exchange::{Connector, ExchangeController, SerialSettings};
use uart_frame_protocol::{FieldText, FrameCodec};

use crate::error::CliResult;
use crate::output::ConsolePresenter;

/// Print the serial ports the operating system reports.
pub fn list_ports<W: Write>(out: &mut W, json: bool) -> CliResult<()> {
    let ports = serialport::available_ports()?;
    info!(count = ports.len(), "enumerated serial ports");

    let rows: Vec<(String, String)> = ports
        .into_iter()
        .map(|port| (port.port_name, describe_port_type(&port.port_type)))
        .collect();

    if json {
        let entries: Vec<serde_json::Value> = rows
            .iter()
            .map(|(name, kind)| serde_json::json!({ "port": name, "type": kind }))
            .collect();
        writeln!(out, "{}", serde_json::to_string(&entries)?)?;
    } else if rows.is_empty() {
        writeln!(out, "No serial ports found")?;
    } else {
        for (name, kind) in &rows {
            writeln!(out, "{:<24} {}", name, kind)?;
        }
    }
    Ok(())
}

fn describe_port_type(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => {
            let product = usb.product.as_deref().unwrap_or("");
            format!("USB {:04x}:{:04x} {}", usb.vid, usb.pid, product)
                .trim_end()
                .to_string()
        }
        SerialPortType::PciPort => "PCI".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth".to_string(),
        SerialPortType::Unknown => "Unknown".to_string(),
    }
}

/// Build a frame from field text and print it without touching a port.
pub fn encode<W: Write>(fields: &FieldText, out: &mut W, json: bool) -> CliResult<()> {
    let frame = FrameCodec::encode_frame(&fields.parse()?)?;
    let decoded = FrameCodec::decode(&frame.to_bytes())?;
    let mut presenter = ConsolePresenter::new(out, json);
    presenter.decoded(&decoded);
    Ok(())
}

/// Parse raw frame bytes given as hex and print the fields.
///
/// Whitespace between bytes is ignored, so `"02 01 10 ..."` and
/// `"020110..."` are equivalent.
pub fn decode<W: Write>(hex_bytes: &[String], out: &mut W, json: bool) -> CliResult<()> {
    let compact: String = hex_bytes
        .iter()
        .flat_map(|s| s.chars())
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = hex::decode(compact)?;
    let decoded = FrameCodec::decode(&bytes)?;
    let mut presenter = ConsolePresenter::new(out, json);
    presenter.decoded(&decoded);
    Ok(())
}

/// Open `port`, run one exchange and close again.
///
/// A checksum mismatch in the response is reported but is not an error.
pub fn send<C, W>(
    connector: C,
    settings: SerialSettings,
    port: &str,
    fields: &FieldText,
    out: &mut W,
    json: bool,
) -> CliResult<()>
where
    C: Connector,
    W: Write,
{
    let raw = fields.parse()?;
    let mut controller =
        ExchangeController::with_presenter(connector, settings, ConsolePresenter::new(out, json));
    controller.open(port)?;
    let result = controller.send(&raw);
    controller.close();
    result?;
    Ok(())
}

/// Counters for an interactive session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Exchanges that produced a response frame.
    pub completed: usize,
    /// Exchanges that produced no response.
    pub failed: usize,
    /// Responses whose checksum did not match.
    pub checksum_mismatches: usize,
}

/// Run exchanges from a line-oriented script.
///
/// Each input line is one of:
///
/// - nine hex values: send a frame and wait for the response
/// - `open [port]`: (re)open the port
/// - `close`: close the port
/// - `quit` / `exit`: stop reading
///
/// Blank lines and lines starting with `#` are ignored. Failures are
/// reported and the session carries on, so the last received frame stays
/// available across failed exchanges.
pub fn session<C, R, W>(
    connector: C,
    settings: SerialSettings,
    port: &str,
    input: R,
    out: &mut W,
    json: bool,
) -> CliResult<SessionSummary>
where
    C: Connector,
    R: BufRead,
    W: Write,
{
    let mut controller =
        ExchangeController::with_presenter(connector, settings, ConsolePresenter::new(out, json));
    let mut summary = SessionSummary::default();
    let mut current_port = port.to_string();

    if let Err(e) = controller.open(&current_port) {
        controller.presenter_mut().error(&e);
    }

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        debug!(line, "session input");

        let mut words = line.split_whitespace();
        match words.next() {
            Some("quit") | Some("exit") => break,
            Some("close") => controller.close(),
            Some("open") => {
                if let Some(next) = words.next() {
                    current_port = next.to_string();
                }
                if let Err(e) = controller.reopen(&current_port) {
                    controller.presenter_mut().error(&e);
                }
            }
            _ => {
                let raw = match FieldText::from_hex_line(line).and_then(|text| text.parse()) {
                    Ok(raw) => raw,
                    Err(e) => {
                        controller.presenter_mut().error(&e);
                        continue;
                    }
                };
                match controller.send(&raw) {
                    Ok(decoded) => {
                        summary.completed += 1;
                        if !decoded.checksum_valid {
                            summary.checksum_mismatches += 1;
                        }
                    }
                    Err(e) => {
                        summary.failed += 1;
                        controller.presenter_mut().error(&e);
                    }
                }
            }
        }
    }

    controller.close();
    info!(
        completed = summary.completed,
        failed = summary.failed,
        checksum_mismatches = summary.checksum_mismatches,
        "session finished"
    );
    Ok(summary)
}
