//! Frame encoding/decoding.
//!
//! The frame format is fixed length and carries no delimiters, so a buffer
//! decodes only when it is exactly [`FRAME_LEN`] bytes long. A bad checksum is
//! not a decode failure: the frame is returned with `checksum_valid == false`
//! so a corrupted response can still be shown to the operator.

use serde::Serialize;

use crate::constants::FRAME_LEN;
use crate::error::{ProtocolError, ProtocolResult};
use crate::fields::RawFields;
use crate::frame::Frame;

/// A frame decoded from the wire together with the verification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodedFrame {
    /// The decoded fields and the checksum as received.
    pub frame: Frame,
    /// Whether the received checksum matched the recomputed one.
    pub checksum_valid: bool,
}

/// Encoder and decoder for the 10-byte frame format.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameCodec;

impl FrameCodec {
    /// Validate raw field values and produce the bytes to transmit.
    ///
    /// Fails with [`ProtocolError::OutOfRange`] if any value does not fit in
    /// a byte.
    pub fn encode(raw: &RawFields) -> ProtocolResult<[u8; FRAME_LEN]> {
        Ok(Self::encode_frame(raw)?.to_bytes())
    }

    /// Validate raw field values and build the frame.
    pub fn encode_frame(raw: &RawFields) -> ProtocolResult<Frame> {
        let frame = Frame::from_fields(raw.validate()?);
        log::trace!("encoded frame: {}", frame);
        Ok(frame)
    }

    /// Parse a received buffer.
    ///
    /// Fails with [`ProtocolError::ShortFrame`] unless the buffer is exactly
    /// one frame long.
    pub fn decode(buf: &[u8]) -> ProtocolResult<DecodedFrame> {
        let bytes: &[u8; FRAME_LEN] = buf.try_into().map_err(|_| ProtocolError::ShortFrame {
            expected: FRAME_LEN,
            actual: buf.len(),
        })?;

        let frame = Frame::from_bytes(bytes);
        let checksum_valid = frame.checksum_valid();
        if checksum_valid {
            log::trace!("decoded frame: {}", frame);
        } else {
            log::debug!(
                "decoded frame {} with checksum mismatch: expected 0x{:02X}, got 0x{:02X}",
                frame,
                frame.expected_checksum(),
                frame.checksum()
            );
        }

        Ok(DecodedFrame {
            frame,
            checksum_valid,
        })
    }
}
