//! Serial link settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Baud rate the device firmware expects.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Upper bound on waiting for a response frame (milliseconds).
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Settings passed through to the transport on open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Line speed in bits per second.
    pub baud_rate: u32,
    /// Read timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        SerialSettings {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SerialSettings {
    /// The read timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SerialSettings::default();
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.timeout(), Duration::from_secs(1));
    }
}
