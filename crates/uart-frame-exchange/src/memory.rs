//! In-memory transport.
//!
//! A [`MemoryLine`] stands in for the device end of a serial link. Responses
//! are scripted ahead of time (or echoed back), and everything the host
//! writes is recorded. Clones share the same line, so a test can keep one
//! clone while the controller owns the transport.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::SerialSettings;
use crate::transport::{Connector, Transport};

/// One scripted reaction to a read.
#[derive(Debug, Clone)]
enum ScriptedRead {
    Bytes(Vec<u8>),
    Fail(io::ErrorKind),
}

#[derive(Debug, Default)]
struct LineState {
    echo: bool,
    reads: VecDeque<ScriptedRead>,
    pending: Vec<u8>,
    written: Vec<Vec<u8>>,
    opened: Vec<String>,
    live_handles: usize,
    fail_open: Option<io::ErrorKind>,
    fail_write: Option<io::ErrorKind>,
}

/// Shared state of a simulated serial line.
#[derive(Debug, Clone, Default)]
pub struct MemoryLine {
    state: Arc<Mutex<LineState>>,
}

impl MemoryLine {
    /// A line that only answers with scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// A line that answers every write with the same bytes.
    pub fn echo() -> Self {
        let line = Self::new();
        line.state.lock().echo = true;
        line
    }

    /// Connector that opens transports on this line.
    pub fn connector(&self) -> MemoryConnector {
        MemoryConnector { line: self.clone() }
    }

    /// Queue a chunk of bytes arriving from the device.
    ///
    /// A read joins queued chunks until it has what it asked for. Bytes
    /// beyond that stay buffered for the following read, as they would in a
    /// driver's receive buffer.
    pub fn push_response(&self, bytes: impl Into<Vec<u8>>) {
        self.state.lock().reads.push_back(ScriptedRead::Bytes(bytes.into()));
    }

    /// Queue a read failure.
    pub fn push_read_error(&self, kind: io::ErrorKind) {
        self.state.lock().reads.push_back(ScriptedRead::Fail(kind));
    }

    /// Make every write fail with `kind`, or succeed again with `None`.
    pub fn fail_writes(&self, kind: Option<io::ErrorKind>) {
        self.state.lock().fail_write = kind;
    }

    /// Make the next open fail with `kind`.
    pub fn fail_next_open(&self, kind: io::ErrorKind) {
        self.state.lock().fail_open = Some(kind);
    }

    /// Every buffer written so far, in order.
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state.lock().written.clone()
    }

    /// Port names passed to each successful open, in order.
    pub fn opened(&self) -> Vec<String> {
        self.state.lock().opened.clone()
    }

    /// Number of transports currently open on this line.
    pub fn live_handles(&self) -> usize {
        self.state.lock().live_handles
    }
}

/// Opens [`MemoryTransport`]s on a [`MemoryLine`].
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    line: MemoryLine,
}

impl Connector for MemoryConnector {
    type Transport = MemoryTransport;

    fn open(&mut self, port: &str, _settings: &SerialSettings) -> io::Result<MemoryTransport> {
        let mut state = self.line.state.lock();
        if let Some(kind) = state.fail_open.take() {
            return Err(io::Error::new(kind, format!("cannot open {}", port)));
        }
        state.opened.push(port.to_string());
        state.live_handles += 1;
        Ok(MemoryTransport {
            line: self.line.clone(),
        })
    }
}

/// Host end of a [`MemoryLine`].
#[derive(Debug)]
pub struct MemoryTransport {
    line: MemoryLine,
}

impl Transport for MemoryTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut state = self.line.state.lock();
        if let Some(kind) = state.fail_write {
            return Err(io::Error::new(kind, "write failed"));
        }
        state.written.push(bytes.to_vec());
        if state.echo {
            state.reads.push_back(ScriptedRead::Bytes(bytes.to_vec()));
        }
        Ok(())
    }

    fn read_up_to(&mut self, len: usize, _timeout: Duration) -> io::Result<Vec<u8>> {
        let mut state = self.line.state.lock();

        // Scripted chunks are joined until `len` bytes are buffered. Running
        // out of script behaves like the deadline passing.
        while state.pending.len() < len {
            let next = state.reads.pop_front();
            match next {
                Some(ScriptedRead::Bytes(bytes)) => state.pending.extend(bytes),
                Some(ScriptedRead::Fail(kind)) => {
                    return Err(io::Error::new(kind, "read failed"));
                }
                None => break,
            }
        }

        let take = len.min(state.pending.len());
        let bytes: Vec<u8> = state.pending.drain(..take).collect();
        Ok(bytes)
    }
}

impl Drop for MemoryTransport {
    fn drop(&mut self) {
        let mut state = self.line.state.lock();
        state.live_handles = state.live_handles.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_reads() {
        let line = MemoryLine::new();
        let mut transport = line
            .connector()
            .open("mem0", &SerialSettings::default())
            .expect("open");

        line.push_response(vec![1, 2, 3, 4]);
        let timeout = Duration::from_millis(10);
        assert_eq!(transport.read_up_to(3, timeout).expect("read"), vec![1, 2, 3]);
        assert_eq!(transport.read_up_to(3, timeout).expect("read"), vec![4]);
        assert!(transport.read_up_to(3, timeout).expect("read").is_empty());
    }

    #[test]
    fn test_chunks_joined_within_one_read() {
        let line = MemoryLine::new();
        let mut transport = line
            .connector()
            .open("mem0", &SerialSettings::default())
            .expect("open");

        line.push_response(vec![1, 2]);
        line.push_response(vec![3]);
        line.push_response(vec![4, 5, 6]);
        let timeout = Duration::from_millis(10);
        assert_eq!(transport.read_up_to(4, timeout).expect("read"), vec![1, 2, 3, 4]);
        assert_eq!(transport.read_up_to(4, timeout).expect("read"), vec![5, 6]);
    }

    #[test]
    fn test_echo_and_handles() {
        let line = MemoryLine::echo();
        let mut connector = line.connector();
        let mut transport = connector.open("mem0", &SerialSettings::default()).expect("open");
        assert_eq!(line.live_handles(), 1);

        transport.write_all(&[9, 8, 7]).expect("write");
        assert_eq!(
            transport.read_up_to(3, Duration::from_millis(10)).expect("read"),
            vec![9, 8, 7]
        );
        assert_eq!(line.written(), vec![vec![9, 8, 7]]);

        drop(transport);
        assert_eq!(line.live_handles(), 0);
        assert_eq!(line.opened(), vec!["mem0".to_string()]);
    }

    #[test]
    fn test_open_failure_is_one_shot() {
        let line = MemoryLine::new();
        let mut connector = line.connector();
        line.fail_next_open(io::ErrorKind::NotFound);

        let err = connector.open("mem0", &SerialSettings::default()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(connector.open("mem0", &SerialSettings::default()).is_ok());
    }
}
