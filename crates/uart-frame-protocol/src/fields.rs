//! Frame field input.
//!
//! Operator input goes through a single validated path before it reaches the
//! codec:
//!
//! ```text
//! FieldText --parse--> RawFields --validate--> FrameFields --> Frame
//! ```
//!
//! `FieldText` holds hex text as typed, `RawFields` holds the parsed but
//! unchecked integers, and `FrameFields` holds bytes that are known to fit.

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use crate::constants::{CHECKSUMMED_LEN, DATA_LEN, FIELD_COUNT};
use crate::error::{ProtocolError, ProtocolResult};

// ============================================================================
// Field names
// ============================================================================

/// Names a single field of a frame, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Sync / start byte.
    StartByte,
    /// Device id.
    DevId,
    /// Command id.
    CmdId,
    /// Parameter id.
    PrmId,
    /// Error byte.
    ErrorByte,
    /// Data byte by position, 3 being the most significant.
    Data(u8),
}

impl Field {
    /// All operator-supplied fields in wire order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::StartByte,
        Field::DevId,
        Field::CmdId,
        Field::PrmId,
        Field::ErrorByte,
        Field::Data(3),
        Field::Data(2),
        Field::Data(1),
        Field::Data(0),
    ];
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::StartByte => write!(f, "sync field"),
            Field::DevId => write!(f, "DEV_ID"),
            Field::CmdId => write!(f, "CMD_ID"),
            Field::PrmId => write!(f, "parameter id"),
            Field::ErrorByte => write!(f, "error byte"),
            Field::Data(n) => write!(f, "data byte {}", n),
        }
    }
}

// ============================================================================
// Validated fields
// ============================================================================

/// The nine semantic fields of a frame, each known to fit in a byte.
///
/// `data` is ordered as on the wire: data byte 3 first, data byte 0 last.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameFields {
    /// Sync / start byte.
    pub start_byte: u8,
    /// Device id.
    pub dev_id: u8,
    /// Command id.
    pub cmd_id: u8,
    /// Parameter id.
    pub prm_id: u8,
    /// Error byte.
    pub error_byte: u8,
    /// Data bytes, most significant first.
    pub data: [u8; DATA_LEN],
}

impl FrameFields {
    /// The fields as the first nine bytes of a frame.
    pub fn to_bytes(&self) -> [u8; CHECKSUMMED_LEN] {
        let [d3, d2, d1, d0] = self.data;
        [
            self.start_byte,
            self.dev_id,
            self.cmd_id,
            self.prm_id,
            self.error_byte,
            d3,
            d2,
            d1,
            d0,
        ]
    }
}

// ============================================================================
// Unvalidated fields
// ============================================================================

/// Field values as parsed from operator input, not yet range checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawFields {
    /// Sync / start byte.
    pub start_byte: i64,
    /// Device id.
    pub dev_id: i64,
    /// Command id.
    pub cmd_id: i64,
    /// Parameter id.
    pub prm_id: i64,
    /// Error byte.
    pub error_byte: i64,
    /// Data bytes, most significant first.
    pub data: [i64; DATA_LEN],
}

impl RawFields {
    /// Check every value fits in a byte.
    ///
    /// Fields are checked in wire order and the first offending one is
    /// reported.
    pub fn validate(&self) -> ProtocolResult<FrameFields> {
        let [d3, d2, d1, d0] = self.data;
        Ok(FrameFields {
            start_byte: to_byte(Field::StartByte, self.start_byte)?,
            dev_id: to_byte(Field::DevId, self.dev_id)?,
            cmd_id: to_byte(Field::CmdId, self.cmd_id)?,
            prm_id: to_byte(Field::PrmId, self.prm_id)?,
            error_byte: to_byte(Field::ErrorByte, self.error_byte)?,
            data: [
                to_byte(Field::Data(3), d3)?,
                to_byte(Field::Data(2), d2)?,
                to_byte(Field::Data(1), d1)?,
                to_byte(Field::Data(0), d0)?,
            ],
        })
    }
}

impl From<FrameFields> for RawFields {
    fn from(fields: FrameFields) -> Self {
        RawFields {
            start_byte: fields.start_byte.into(),
            dev_id: fields.dev_id.into(),
            cmd_id: fields.cmd_id.into(),
            prm_id: fields.prm_id.into(),
            error_byte: fields.error_byte.into(),
            data: fields.data.map(i64::from),
        }
    }
}

fn to_byte(field: Field, value: i64) -> ProtocolResult<u8> {
    u8::try_from(value).map_err(|_| ProtocolError::OutOfRange { field, value })
}

// ============================================================================
// Field text
// ============================================================================

/// Field values as hexadecimal text, one string per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldText {
    /// Sync / start byte.
    pub start_byte: String,
    /// Device id.
    pub dev_id: String,
    /// Command id.
    pub cmd_id: String,
    /// Parameter id.
    pub prm_id: String,
    /// Error byte.
    pub error_byte: String,
    /// Data bytes, most significant first.
    pub data: [String; DATA_LEN],
}

impl FieldText {
    /// Build from nine whitespace-separated hex values in wire order.
    ///
    /// `"02 01 10 00 00 00 00 00 05"` yields sync `02`, data bytes 3..0
    /// `00 00 00 05`.
    pub fn from_hex_line(line: &str) -> ProtocolResult<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        Self::from_tokens(&tokens)
    }

    /// Build from nine hex values in wire order.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> ProtocolResult<Self> {
        if tokens.len() != FIELD_COUNT {
            return Err(ProtocolError::FieldCount {
                expected: FIELD_COUNT,
                actual: tokens.len(),
            });
        }
        let text = |i: usize| tokens[i].as_ref().to_string();
        Ok(FieldText {
            start_byte: text(0),
            dev_id: text(1),
            cmd_id: text(2),
            prm_id: text(3),
            error_byte: text(4),
            data: [text(5), text(6), text(7), text(8)],
        })
    }

    /// Parse every field as base-16.
    ///
    /// Surrounding whitespace, a `0x` prefix and a leading sign are accepted.
    /// Values are not range checked here; see [`RawFields::validate`].
    pub fn parse(&self) -> ProtocolResult<RawFields> {
        let [d3, d2, d1, d0] = &self.data;
        Ok(RawFields {
            start_byte: parse_hex(Field::StartByte, &self.start_byte)?,
            dev_id: parse_hex(Field::DevId, &self.dev_id)?,
            cmd_id: parse_hex(Field::CmdId, &self.cmd_id)?,
            prm_id: parse_hex(Field::PrmId, &self.prm_id)?,
            error_byte: parse_hex(Field::ErrorByte, &self.error_byte)?,
            data: [
                parse_hex(Field::Data(3), d3)?,
                parse_hex(Field::Data(2), d2)?,
                parse_hex(Field::Data(1), d1)?,
                parse_hex(Field::Data(0), d0)?,
            ],
        })
    }

    /// Parse and range check in one step.
    pub fn to_fields(&self) -> ProtocolResult<FrameFields> {
        self.parse()?.validate()
    }
}

/// Parse a single hex value.
pub fn parse_hex(field: Field, text: &str) -> ProtocolResult<i64> {
    let invalid = || ProtocolError::InvalidHex {
        field,
        text: text.to_string(),
    };

    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .unwrap_or(unsigned);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    // Values past i64 saturate so the range check still reports them.
    let magnitude = match i64::from_str_radix(digits, 16) {
        Ok(magnitude) => magnitude,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
        Err(_) => return Err(invalid()),
    };
    Ok(if negative { -magnitude } else { magnitude })
}
