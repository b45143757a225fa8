//! Error types for the exchange layer.

use std::io;

use thiserror::Error;
use uart_frame_protocol::ProtocolError;

/// Errors that can occur while opening a port or running an exchange.
///
/// Every variant is recoverable: the controller stays usable after any of
/// them and the previously received frame is left untouched.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Frame could not be built or parsed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A send was requested without an open transport.
    #[error("not connected")]
    NotConnected,

    /// An open was requested while a transport is already live.
    #[error("port {port} is already open")]
    AlreadyOpen {
        /// Port currently held.
        port: String,
    },

    /// The transport could not be opened.
    #[error("failed to open {port}: {source}")]
    Open {
        /// Port that was requested.
        port: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// The transport reported a read or write failure.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// Fewer bytes than one frame arrived before the read timed out.
    #[error("timeout waiting for response: expected {expected} bytes, got {received}")]
    Timeout {
        /// Bytes required for a frame.
        expected: usize,
        /// Bytes that actually arrived.
        received: usize,
    },
}

/// Result type alias for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;
