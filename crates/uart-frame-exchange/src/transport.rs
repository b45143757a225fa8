//! Transport collaborator traits.
//!
//! The exchange layer never touches a device directly. A [`Connector`] opens a
//! [`Transport`] for a named port; dropping the transport closes it.

use std::io;
use std::time::Duration;

use crate::config::SerialSettings;

/// An open byte-stream handle.
pub trait Transport {
    /// Write all bytes as a single write.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read up to `len` bytes, waiting no longer than `timeout` in total.
    ///
    /// Returns whatever arrived before the deadline, which may be fewer than
    /// `len` bytes (including none). Only transport faults are errors.
    fn read_up_to(&mut self, len: usize, timeout: Duration) -> io::Result<Vec<u8>>;
}

/// Opens transports by port name.
pub trait Connector {
    /// Handle type produced on open.
    type Transport: Transport;

    /// Open the named port with the given settings.
    fn open(&mut self, port: &str, settings: &SerialSettings) -> io::Result<Self::Transport>;
}
