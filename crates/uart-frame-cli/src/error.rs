//! Error types for the command-line front end.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use uart_frame_exchange::ExchangeError;
use uart_frame_protocol::ProtocolError;

/// Errors surfaced to the operator by `uframe`.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failed to read the configuration file.
    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid YAML for this tool.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// No port given on the command line or in the config file.
    #[error("no port given; pass --port or set `port` in the config file")]
    NoPort,

    /// No frame fields given on the command line or in the config file.
    #[error("no frame fields given; pass nine hex values or set `fields` in the config file")]
    NoFields,

    /// Raw frame bytes are not valid hex.
    #[error("invalid frame bytes: {0}")]
    InvalidBytes(#[from] hex::FromHexError),

    /// Frame could not be built or parsed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Exchange with the device failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// Serial port enumeration failed.
    #[error("cannot list serial ports: {0}")]
    Ports(#[from] serialport::Error),

    /// Writing output failed.
    #[error("output error: {0}")]
    Io(#[from] io::Error),

    /// JSON output failed.
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
