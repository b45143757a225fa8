//! Protocol constants
//!
//! The frame carries no length field, so these sizes are the whole of the
//! framing contract. A dropped or inserted byte on the line is only detected
//! as a short read; there is no resynchronisation marker to scan for.

/// Total size of a frame on the wire.
pub const FRAME_LEN: usize = 10;

/// Number of bytes covered by the checksum (everything but the checksum itself).
pub const CHECKSUMMED_LEN: usize = FRAME_LEN - 1;

/// Number of data bytes carried by a frame.
pub const DATA_LEN: usize = 4;

/// Number of operator-supplied fields (five header bytes plus the data bytes).
pub const FIELD_COUNT: usize = 5 + DATA_LEN;

// ============================================================================
// Byte offsets within a frame
// ============================================================================

/// Offset of the sync / start byte.
pub const OFFSET_START: usize = 0;
/// Offset of the device id.
pub const OFFSET_DEV_ID: usize = 1;
/// Offset of the command id.
pub const OFFSET_CMD_ID: usize = 2;
/// Offset of the parameter id.
pub const OFFSET_PRM_ID: usize = 3;
/// Offset of the error byte.
pub const OFFSET_ERROR: usize = 4;
/// Offset of the first data byte (data3, most significant).
pub const OFFSET_DATA: usize = 5;
/// Offset of the checksum byte.
pub const OFFSET_CHECKSUM: usize = FRAME_LEN - 1;
