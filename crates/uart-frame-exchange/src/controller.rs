//! Exchange controller.
//!
//! Owns the session (transport handle plus last frames) and runs one
//! request/response cycle per [`ExchangeController::send`]. There is a single
//! thread of control: an exchange runs to completion before the next one can
//! start, and the bounded read is the only place it waits.

use tracing::{debug, info, warn};
use uart_frame_protocol::{DecodedFrame, FrameCodec, RawFields, FRAME_LEN};

use crate::config::SerialSettings;
use crate::error::{ExchangeError, ExchangeResult};
use crate::record::{ConnectionStatus, FrameRecord, NoopPresenter, Presenter};
use crate::session::SessionState;
use crate::transport::{Connector, Transport};

/// Where the current (or last) exchange got to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangePhase {
    /// No exchange in progress.
    #[default]
    Idle,
    /// Command frame is being written.
    Sending,
    /// Waiting for the response frame.
    AwaitingResponse,
    /// A full response frame was received and decoded.
    Complete,
    /// The exchange stopped early; no response is available.
    Incomplete,
}

/// Runs exchanges over a transport obtained from a [`Connector`].
pub struct ExchangeController<C: Connector, P: Presenter = NoopPresenter> {
    connector: C,
    settings: SerialSettings,
    session: SessionState<C::Transport>,
    presenter: P,
    phase: ExchangePhase,
}

impl<C: Connector> ExchangeController<C, NoopPresenter> {
    /// Create a disconnected controller that presents nothing.
    pub fn new(connector: C, settings: SerialSettings) -> Self {
        Self::with_presenter(connector, settings, NoopPresenter)
    }
}

impl<C: Connector, P: Presenter> ExchangeController<C, P> {
    /// Create a disconnected controller reporting to `presenter`.
    pub fn with_presenter(connector: C, settings: SerialSettings, presenter: P) -> Self {
        ExchangeController {
            connector,
            settings,
            session: SessionState::new(),
            presenter,
            phase: ExchangePhase::Idle,
        }
    }

    /// Settings used for every open.
    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    /// Session state, including the last sent and received frames.
    pub fn session(&self) -> &SessionState<C::Transport> {
        &self.session
    }

    /// The presentation collaborator.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Mutable access to the presentation collaborator.
    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Phase of the current or most recent exchange.
    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    /// Whether a transport is open.
    pub fn is_connected(&self) -> bool {
        self.session.is_open()
    }

    /// Current link state.
    pub fn status(&self) -> ConnectionStatus {
        self.session.status()
    }

    /// The most recently received response, if any.
    pub fn last_received(&self) -> Option<&FrameRecord> {
        self.session.last_received()
    }

    /// Open a transport on `port`.
    ///
    /// Fails with [`ExchangeError::AlreadyOpen`] if a transport is already
    /// held; use [`ExchangeController::reopen`] to switch ports.
    pub fn open(&mut self, port: &str) -> ExchangeResult<()> {
        if let Some(current) = self.session.port() {
            warn!(current, requested = port, "open requested while a port is already open");
            return Err(ExchangeError::AlreadyOpen {
                port: current.to_string(),
            });
        }

        let transport = self.connector.open(port, &self.settings).map_err(|source| {
            warn!(port, error = %source, "failed to open port");
            ExchangeError::Open {
                port: port.to_string(),
                source,
            }
        })?;

        info!(port, baud_rate = self.settings.baud_rate, "port opened");
        self.session.attach(port, transport);
        self.presenter.status_changed(&self.session.status());
        Ok(())
    }

    /// Close any open transport, then open `port`.
    pub fn reopen(&mut self, port: &str) -> ExchangeResult<()> {
        self.close();
        self.open(port)
    }

    /// Close the transport if one is open.
    ///
    /// Closing an already closed controller is not an error.
    pub fn close(&mut self) {
        if let Some((port, transport)) = self.session.detach() {
            drop(transport);
            info!(port = %port, "port closed");
        }
        self.phase = ExchangePhase::Idle;
        self.presenter.status_changed(&ConnectionStatus::Disconnected);
    }

    /// Run one exchange: send the command built from `raw` and wait for one
    /// response frame.
    ///
    /// On success the decoded response is returned, including its checksum
    /// verdict; a checksum mismatch is not an error. On any failure the last
    /// received frame is left unchanged.
    pub fn send(&mut self, raw: &RawFields) -> ExchangeResult<DecodedFrame> {
        self.phase = ExchangePhase::Idle;

        if !self.session.is_open() {
            warn!("send requested while not connected");
            return Err(ExchangeError::NotConnected);
        }

        let frame = FrameCodec::encode_frame(raw)?;
        let bytes = frame.to_bytes();
        let timeout = self.settings.timeout();

        self.transition(ExchangePhase::Sending);
        let written = match self.session.transport_mut() {
            Some(transport) => transport.write_all(&bytes),
            None => return Err(ExchangeError::NotConnected),
        };
        if let Err(source) = written {
            warn!(error = %source, "write failed");
            self.transition(ExchangePhase::Incomplete);
            return Err(ExchangeError::Transport(source));
        }

        let record = FrameRecord::new(frame);
        self.presenter.frame_sent(&record);
        self.session.record_sent(record);

        self.transition(ExchangePhase::AwaitingResponse);
        let read = match self.session.transport_mut() {
            Some(transport) => transport.read_up_to(FRAME_LEN, timeout),
            None => return Err(ExchangeError::NotConnected),
        };
        let response = match read {
            Ok(response) => response,
            Err(source) => {
                warn!(error = %source, "read failed");
                self.transition(ExchangePhase::Incomplete);
                return Err(ExchangeError::Transport(source));
            }
        };

        if response.len() < FRAME_LEN {
            warn!(
                expected = FRAME_LEN,
                received = response.len(),
                timeout_ms = self.settings.timeout_ms,
                "response timed out"
            );
            self.transition(ExchangePhase::Incomplete);
            return Err(ExchangeError::Timeout {
                expected: FRAME_LEN,
                received: response.len(),
            });
        }

        let decoded = match FrameCodec::decode(&response) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.transition(ExchangePhase::Incomplete);
                return Err(e.into());
            }
        };
        if !decoded.checksum_valid {
            warn!(
                frame = %decoded.frame,
                expected = decoded.frame.expected_checksum(),
                "response checksum mismatch"
            );
        }

        let record = FrameRecord::from(decoded);
        self.presenter.frame_received(&record);
        self.session.record_received(record);
        self.transition(ExchangePhase::Complete);

        Ok(decoded)
    }

    fn transition(&mut self, next: ExchangePhase) {
        debug!(from = ?self.phase, to = ?next, "exchange phase");
        self.phase = next;
    }
}

impl<C: Connector, P: Presenter> std::fmt::Debug for ExchangeController<C, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeController")
            .field("settings", &self.settings)
            .field("port", &self.session.port())
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLine;

    fn reference_raw() -> RawFields {
        RawFields {
            start_byte: 0x02,
            dev_id: 0x01,
            cmd_id: 0x10,
            prm_id: 0x00,
            error_byte: 0x00,
            data: [0x00, 0x00, 0x00, 0x05],
        }
    }

    #[test]
    fn test_phase_progression() {
        let line = MemoryLine::echo();
        let mut controller = ExchangeController::new(line.connector(), SerialSettings::default());
        assert_eq!(controller.phase(), ExchangePhase::Idle);

        controller.open("mem0").expect("open");
        controller.send(&reference_raw()).expect("exchange");
        assert_eq!(controller.phase(), ExchangePhase::Complete);

        let silent = MemoryLine::new();
        let mut controller = ExchangeController::new(silent.connector(), SerialSettings::default());
        controller.open("mem1").expect("open");
        controller.send(&reference_raw()).expect_err("no response scripted");
        assert_eq!(controller.phase(), ExchangePhase::Incomplete);
    }

    #[test]
    fn test_out_of_range_does_not_write() {
        let line = MemoryLine::echo();
        let mut controller = ExchangeController::new(line.connector(), SerialSettings::default());
        controller.open("mem0").expect("open");

        let mut raw = reference_raw();
        raw.cmd_id = 0x100;
        let err = controller.send(&raw).unwrap_err();
        assert!(matches!(err, ExchangeError::Protocol(_)));
        assert!(line.written().is_empty());
        assert_eq!(controller.phase(), ExchangePhase::Idle);
    }

    #[test]
    fn test_close_resets_phase() {
        let line = MemoryLine::echo();
        let mut controller = ExchangeController::new(line.connector(), SerialSettings::default());
        controller.open("mem0").expect("open");
        controller.send(&reference_raw()).expect("exchange");

        controller.close();
        assert_eq!(controller.phase(), ExchangePhase::Idle);
        assert!(!controller.is_connected());
    }
}
