//! Serial port transport backed by the `serialport` crate.

use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::trace;

use crate::config::SerialSettings;
use crate::transport::{Connector, Transport};

/// Opens serial ports at 8N1 with the configured baud rate and timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialConnector;

impl Connector for SerialConnector {
    type Transport = SerialTransport;

    fn open(&mut self, port: &str, settings: &SerialSettings) -> io::Result<SerialTransport> {
        let port = serialport::new(port, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(settings.timeout())
            .open()?;
        Ok(SerialTransport { port })
    }
}

/// An open serial port. Dropping it closes the device.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("port", &self.port.name())
            .finish()
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn read_up_to(&mut self, len: usize, timeout: Duration) -> io::Result<Vec<u8>> {
        read_with_deadline(&mut self.port, len, timeout, |port, remaining| {
            port.set_timeout(remaining).map_err(io::Error::from)
        })
    }
}

/// Read up to `len` bytes from `reader` before `timeout` elapses.
///
/// The driver may hand back a frame in pieces, so reads repeat until the
/// buffer is full or the overall deadline passes. Before each read
/// `set_timeout` is given the time left, which keeps the whole call within
/// `timeout`. A driver timeout or end of stream returns what was gathered.
pub(crate) fn read_with_deadline<R, F>(
    reader: &mut R,
    len: usize,
    timeout: Duration,
    mut set_timeout: F,
) -> io::Result<Vec<u8>>
where
    R: Read + ?Sized,
    F: FnMut(&mut R, Duration) -> io::Result<()>,
{
    let deadline = Instant::now() + timeout;
    let mut buf = vec![0u8; len];
    let mut filled = 0;

    while filled < len {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        set_timeout(reader, remaining)?;

        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(count) => {
                trace!(count, filled, "serial read");
                filled += count;
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    buf.truncate(filled);
    Ok(buf)
}
