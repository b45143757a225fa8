//! Session state owned by the exchange controller.

use crate::record::{ConnectionStatus, FrameRecord};

/// Everything that lives between an open and a close.
///
/// At most one transport is held at a time. `last_received` only ever
/// changes when a complete response frame has been decoded; failed or short
/// exchanges leave it as it was.
#[derive(Debug)]
pub struct SessionState<T> {
    link: Option<(String, T)>,
    last_sent: Option<FrameRecord>,
    last_received: Option<FrameRecord>,
}

impl<T> Default for SessionState<T> {
    fn default() -> Self {
        SessionState {
            link: None,
            last_sent: None,
            last_received: None,
        }
    }
}

impl<T> SessionState<T> {
    /// Create an empty, disconnected session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transport is held.
    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    /// Name of the open port, if any.
    pub fn port(&self) -> Option<&str> {
        self.link.as_ref().map(|(port, _)| port.as_str())
    }

    /// Current link state.
    pub fn status(&self) -> ConnectionStatus {
        match self.port() {
            Some(port) => ConnectionStatus::Connected {
                port: port.to_string(),
            },
            None => ConnectionStatus::Disconnected,
        }
    }

    /// Mutable access to the open transport.
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.link.as_mut().map(|(_, transport)| transport)
    }

    /// Take ownership of a freshly opened transport.
    ///
    /// The session must be detached first; one handle at a time.
    pub(crate) fn attach(&mut self, port: &str, transport: T) {
        debug_assert!(self.link.is_none(), "attach while a link is held");
        self.link = Some((port.to_string(), transport));
    }

    /// Give up the transport.
    pub(crate) fn detach(&mut self) -> Option<(String, T)> {
        self.link.take()
    }

    /// The most recently sent command.
    pub fn last_sent(&self) -> Option<&FrameRecord> {
        self.last_sent.as_ref()
    }

    /// The most recently received response.
    pub fn last_received(&self) -> Option<&FrameRecord> {
        self.last_received.as_ref()
    }

    pub(crate) fn record_sent(&mut self, record: FrameRecord) {
        self.last_sent = Some(record);
    }

    pub(crate) fn record_received(&mut self, record: FrameRecord) {
        self.last_received = Some(record);
    }
}
