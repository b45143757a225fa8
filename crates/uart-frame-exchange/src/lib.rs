//! UART Frame Exchange
//!
//! This crate drives one request/response cycle of the 10-byte frame
//! protocol over a byte-stream transport: encode the command, write it, wait
//! a bounded time for exactly one response frame, decode it and hand both
//! frames to a presentation collaborator.
//!
//! # Exchange Overview
//!
//! ```text
//! Idle --send--> Sending --write ok--> AwaitingResponse --10 bytes--> Complete
//!                   |                         |
//!                   +--write failed--+        +--fewer bytes / read failed--> Incomplete
//!                                    v
//!                                Incomplete
//! ```
//!
//! Exchanges are synchronous and one-shot. There is no retry; every call to
//! [`ExchangeController::send`] starts again from `Idle`.
//!
//! # Example
//!
//! ```rust
//! use uart_frame_exchange::{ExchangeController, MemoryLine, SerialSettings};
//! use uart_frame_protocol::FieldText;
//!
//! let line = MemoryLine::echo();
//! let mut controller = ExchangeController::new(line.connector(), SerialSettings::default());
//! controller.open("loop0")?;
//!
//! let raw = FieldText::from_hex_line("02 01 10 00 00 00 00 00 05")?.parse()?;
//! let response = controller.send(&raw)?;
//! assert!(response.checksum_valid);
//! # Ok::<(), uart_frame_exchange::ExchangeError>(())
//! ```

mod config;
mod controller;
mod error;
mod memory;
mod record;
mod serial;
mod session;
mod transport;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use memory::*;
pub use record::*;
pub use serial::*;
pub use session::*;
pub use transport::*;
