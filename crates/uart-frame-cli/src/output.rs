//! Console presentation of frames.
//!
//! Text mode prints one labelled line per event. JSON mode prints one JSON
//! object per line so the output can be piped into other tools.

use std::fmt::Display;
use std::io::Write;

use serde::Serialize;
use tracing::warn;
use uart_frame_exchange::{ConnectionStatus, FrameRecord, Presenter};
use uart_frame_protocol::DecodedFrame;

/// One line of JSON output.
#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Event<'a> {
    Sent { record: &'a FrameRecord },
    Received { record: &'a FrameRecord },
    Status { status: &'a ConnectionStatus },
    Decoded { record: &'a FrameRecord },
    Error { message: String },
}

/// Writes frames and status changes to a console stream.
#[derive(Debug)]
pub struct ConsolePresenter<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> ConsolePresenter<W> {
    /// Present to `out`, as JSON lines if `json` is set.
    pub fn new(out: W, json: bool) -> Self {
        ConsolePresenter { out, json }
    }

    /// Give back the output stream.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Show a frame built or decoded offline.
    pub fn decoded(&mut self, decoded: &DecodedFrame) {
        let record = FrameRecord::from(*decoded);
        if self.json {
            self.emit_json(&Event::Decoded { record: &record });
            return;
        }
        let frame = &record.fields;
        let [d3, d2, d1, d0] = frame.data();
        self.emit_line(format_args!("Frame: {}", record.hex_string));
        self.emit_line(format_args!(
            "  sync={:02X} dev_id={:02X} cmd_id={:02X} prm_id={:02X} error={:02X} data={:02X} {:02X} {:02X} {:02X}",
            frame.start_byte(),
            frame.dev_id(),
            frame.cmd_id(),
            frame.prm_id(),
            frame.error_byte(),
            d3,
            d2,
            d1,
            d0
        ));
        self.emit_line(format_args!("  {}", checksum_verdict(&record)));
    }

    /// Show a failure that did not stop the program.
    pub fn error(&mut self, error: &dyn Display) {
        if self.json {
            self.emit_json(&Event::Error {
                message: error.to_string(),
            });
        } else {
            self.emit_line(format_args!("Error: {}", error));
        }
    }

    fn emit_line(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!(error = %e, "failed to write output");
        }
    }

    fn emit_json(&mut self, event: &Event<'_>) {
        match serde_json::to_string(event) {
            Ok(line) => self.emit_line(format_args!("{}", line)),
            Err(e) => warn!(error = %e, "failed to serialize output"),
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn frame_sent(&mut self, record: &FrameRecord) {
        if self.json {
            self.emit_json(&Event::Sent { record });
        } else {
            self.emit_line(format_args!("Frame Sent: {}", record.hex_string));
        }
    }

    fn frame_received(&mut self, record: &FrameRecord) {
        if self.json {
            self.emit_json(&Event::Received { record });
        } else {
            self.emit_line(format_args!("Frame Received: {}", record.hex_string));
            self.emit_line(format_args!("  {}", checksum_verdict(record)));
        }
    }

    fn status_changed(&mut self, status: &ConnectionStatus) {
        if self.json {
            self.emit_json(&Event::Status { status });
        } else {
            self.emit_line(format_args!("Status: {}", status));
        }
    }
}

fn checksum_verdict(record: &FrameRecord) -> String {
    if record.checksum_valid {
        format!("Checksum: {:02X} (valid)", record.expected_checksum)
    } else {
        format!(
            "Checksum: {:02X} (MISMATCH, frame carries {:02X})",
            record.expected_checksum,
            record.fields.checksum()
        )
    }
}
