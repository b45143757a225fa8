//! Protocol error types.

use thiserror::Error;

use crate::fields::Field;

/// Errors that can occur when building or parsing frames.
///
/// A checksum mismatch is deliberately absent: it is reported alongside a
/// successfully decoded frame rather than as a failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A field value does not fit in a byte.
    #[error("{field} out of range: {value} is not within 0x00..=0xFF")]
    OutOfRange {
        /// Offending field.
        field: Field,
        /// Value that was supplied.
        value: i64,
    },

    /// Buffer length is not exactly one frame.
    #[error("short frame: expected {expected} bytes, got {actual}")]
    ShortFrame {
        /// Required length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Field text is not a hexadecimal number.
    #[error("{field}: invalid hex value {text:?}")]
    InvalidHex {
        /// Field being parsed.
        field: Field,
        /// Text as supplied.
        text: String,
    },

    /// A field line does not hold the expected number of values.
    #[error("wrong field count: expected {expected} values, got {actual}")]
    FieldCount {
        /// Required number of values.
        expected: usize,
        /// Number of values found.
        actual: usize,
    },
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
