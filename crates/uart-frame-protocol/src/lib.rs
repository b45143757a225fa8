//! UART Frame Protocol
//!
//! This crate provides the wire format used to talk to the device over its
//! serial link: a fixed-length 10-byte frame carrying five header bytes, four
//! data bytes and an 8-bit additive checksum. The same layout is used for
//! commands (host → device) and responses (device → host).
//!
//! # Frame Layout
//!
//! ```text
//! +------+--------+--------+--------+-------+-------+-------+-------+-------+----------+
//! | sync | dev_id | cmd_id | prm_id | error | data3 | data2 | data1 | data0 | checksum |
//! +------+--------+--------+--------+-------+-------+-------+-------+-------+----------+
//! ```
//!
//! The checksum is the sum of the first nine bytes, truncated to 8 bits.
//! There are no delimiters, no escaping and no length prefix: the only framing
//! signal is the length itself.
//!
//! # Example
//!
//! ```rust
//! use uart_frame_protocol::{FrameCodec, RawFields};
//!
//! let raw = RawFields {
//!     start_byte: 0x02,
//!     dev_id: 0x01,
//!     cmd_id: 0x10,
//!     prm_id: 0x00,
//!     error_byte: 0x00,
//!     data: [0x00, 0x00, 0x00, 0x05],
//! };
//! let bytes = FrameCodec::encode(&raw)?;
//! assert_eq!(bytes[9], 0x18);
//!
//! let decoded = FrameCodec::decode(&bytes)?;
//! assert!(decoded.checksum_valid);
//! # Ok::<(), uart_frame_protocol::ProtocolError>(())
//! ```

mod checksum;
mod codec;
mod constants;
mod error;
mod fields;
mod frame;

pub use checksum::*;
pub use codec::*;
pub use constants::*;
pub use error::*;
pub use fields::*;
pub use frame::*;
