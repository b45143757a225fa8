//! Presentation records and the presentation collaborator.

use serde::Serialize;
use uart_frame_protocol::{DecodedFrame, Frame};

/// What the presentation layer is given for every frame sent or received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRecord {
    /// The frame fields and carried checksum.
    pub fields: Frame,
    /// All 10 bytes as space separated upper-case hex.
    pub hex_string: String,
    /// Whether the carried checksum matches the fields.
    pub checksum_valid: bool,
    /// Checksum recomputed from the fields.
    pub expected_checksum: u8,
}

impl FrameRecord {
    /// Build the record for a frame.
    pub fn new(frame: Frame) -> Self {
        FrameRecord {
            fields: frame,
            hex_string: frame.to_string(),
            checksum_valid: frame.checksum_valid(),
            expected_checksum: frame.expected_checksum(),
        }
    }
}

impl From<Frame> for FrameRecord {
    fn from(frame: Frame) -> Self {
        FrameRecord::new(frame)
    }
}

impl From<DecodedFrame> for FrameRecord {
    fn from(decoded: DecodedFrame) -> Self {
        FrameRecord::new(decoded.frame)
    }
}

/// Link state as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// A transport is open on the named port.
    Connected {
        /// Port name.
        port: String,
    },
    /// No transport is open.
    Disconnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Connected { port } => write!(f, "Connected ({})", port),
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// Receives records as exchanges progress.
///
/// The core never formats or renders anything itself; an implementation of
/// this trait decides what the operator sees.
pub trait Presenter {
    /// A command frame was written to the transport.
    fn frame_sent(&mut self, _record: &FrameRecord) {}

    /// A response frame was received and decoded.
    fn frame_received(&mut self, _record: &FrameRecord) {}

    /// The transport was opened or closed.
    fn status_changed(&mut self, _status: &ConnectionStatus) {}
}

/// Presenter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPresenter;

impl Presenter for NoopPresenter {}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn frame_sent(&mut self, record: &FrameRecord) {
        (**self).frame_sent(record)
    }

    fn frame_received(&mut self, record: &FrameRecord) {
        (**self).frame_received(record)
    }

    fn status_changed(&mut self, status: &ConnectionStatus) {
        (**self).status_changed(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uart_frame_protocol::FrameFields;

    #[test]
    fn test_record_for_valid_frame() {
        let frame = Frame::from_fields(FrameFields {
            start_byte: 0x02,
            dev_id: 0x01,
            cmd_id: 0x10,
            data: [0, 0, 0, 5],
            ..Default::default()
        });
        let record = FrameRecord::new(frame);
        assert_eq!(record.hex_string, "02 01 10 00 00 00 00 00 05 18");
        assert!(record.checksum_valid);
        assert_eq!(record.expected_checksum, 0x18);
    }

    #[test]
    fn test_record_for_corrupt_frame() {
        let frame = Frame::from_bytes(&[0x02, 0x01, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x19]);
        let record = FrameRecord::from(frame);
        assert_eq!(record.hex_string, "02 01 10 00 00 00 00 00 05 19");
        assert!(!record.checksum_valid);
        assert_eq!(record.expected_checksum, 0x18);
    }

    #[test]
    fn test_status_display() {
        let status = ConnectionStatus::Connected {
            port: "COM3".to_string(),
        };
        assert_eq!(status.to_string(), "Connected (COM3)");
        assert_eq!(ConnectionStatus::Disconnected.to_string(), "Disconnected");
    }
}
