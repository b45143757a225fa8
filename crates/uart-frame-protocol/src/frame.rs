//! The frame type.
//!
//! ```text
//! +------+--------+--------+--------+-------+-------+-------+-------+-------+----------+
//! | sync | dev_id | cmd_id | prm_id | error | data3 | data2 | data1 | data0 | checksum |
//! +------+--------+--------+--------+-------+-------+-------+-------+-------+----------+
//!    0       1        2        3        4       5       6       7       8        9
//! ```

use bytes::{Buf, BufMut};
use serde::Serialize;

use crate::checksum::checksum_bytes;
use crate::constants::{DATA_LEN, FRAME_LEN};
use crate::fields::FrameFields;

/// A single 10-byte frame.
///
/// Frames are immutable. The `with_*` methods return a new frame with the
/// checksum recomputed, so a frame built locally always carries a checksum
/// that matches its fields. A frame decoded from the wire keeps the checksum
/// it arrived with; compare against [`Frame::expected_checksum`] or use
/// [`Frame::checksum_valid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    #[serde(flatten)]
    fields: FrameFields,
    checksum: u8,
}

impl Frame {
    /// Build a frame from validated fields, computing the checksum.
    pub fn from_fields(fields: FrameFields) -> Self {
        Frame {
            fields,
            checksum: checksum_bytes(fields.to_bytes()),
        }
    }

    /// Split one frame's worth of bytes into fields, keeping the checksum as received.
    pub fn from_bytes(bytes: &[u8; FRAME_LEN]) -> Self {
        let mut buf = &bytes[..];
        let start_byte = buf.get_u8();
        let dev_id = buf.get_u8();
        let cmd_id = buf.get_u8();
        let prm_id = buf.get_u8();
        let error_byte = buf.get_u8();
        let mut data = [0u8; DATA_LEN];
        buf.copy_to_slice(&mut data);
        let checksum = buf.get_u8();

        Frame {
            fields: FrameFields {
                start_byte,
                dev_id,
                cmd_id,
                prm_id,
                error_byte,
                data,
            },
            checksum,
        }
    }

    /// Serialize to wire order.
    pub fn to_bytes(&self) -> [u8; FRAME_LEN] {
        let mut out = [0u8; FRAME_LEN];
        let mut buf = &mut out[..];
        buf.put_slice(&self.fields.to_bytes());
        buf.put_u8(self.checksum);
        out
    }

    /// The nine semantic fields.
    pub fn fields(&self) -> FrameFields {
        self.fields
    }

    /// Sync / start byte.
    pub fn start_byte(&self) -> u8 {
        self.fields.start_byte
    }

    /// Device id.
    pub fn dev_id(&self) -> u8 {
        self.fields.dev_id
    }

    /// Command id.
    pub fn cmd_id(&self) -> u8 {
        self.fields.cmd_id
    }

    /// Parameter id.
    pub fn prm_id(&self) -> u8 {
        self.fields.prm_id
    }

    /// Error byte.
    pub fn error_byte(&self) -> u8 {
        self.fields.error_byte
    }

    /// Data bytes, most significant (data3) first.
    pub fn data(&self) -> [u8; DATA_LEN] {
        self.fields.data
    }

    /// Checksum carried by the frame.
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Checksum recomputed from the fields.
    pub fn expected_checksum(&self) -> u8 {
        checksum_bytes(self.fields.to_bytes())
    }

    /// Whether the carried checksum matches the fields.
    pub fn checksum_valid(&self) -> bool {
        self.checksum == self.expected_checksum()
    }

    /// Same frame with a different sync byte.
    pub fn with_start_byte(&self, start_byte: u8) -> Self {
        Self::from_fields(FrameFields {
            start_byte,
            ..self.fields
        })
    }

    /// Same frame with a different device id.
    pub fn with_dev_id(&self, dev_id: u8) -> Self {
        Self::from_fields(FrameFields {
            dev_id,
            ..self.fields
        })
    }

    /// Same frame with a different command id.
    pub fn with_cmd_id(&self, cmd_id: u8) -> Self {
        Self::from_fields(FrameFields {
            cmd_id,
            ..self.fields
        })
    }

    /// Same frame with a different parameter id.
    pub fn with_prm_id(&self, prm_id: u8) -> Self {
        Self::from_fields(FrameFields {
            prm_id,
            ..self.fields
        })
    }

    /// Same frame with a different error byte.
    pub fn with_error_byte(&self, error_byte: u8) -> Self {
        Self::from_fields(FrameFields {
            error_byte,
            ..self.fields
        })
    }

    /// Same frame with different data bytes.
    pub fn with_data(&self, data: [u8; DATA_LEN]) -> Self {
        Self::from_fields(FrameFields {
            data,
            ..self.fields
        })
    }
}

impl From<FrameFields> for Frame {
    fn from(fields: FrameFields) -> Self {
        Frame::from_fields(fields)
    }
}

/// Space separated upper-case hex, e.g. `02 01 10 00 00 00 00 00 05 18`.
impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.to_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}
