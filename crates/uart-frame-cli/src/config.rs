//! Configuration file loading.
//!
//! ```yaml
//! port: /dev/ttyUSB0
//! serial:
//!   baud_rate: 9600
//!   timeout_ms: 1000
//! fields:
//!   start_byte: "02"
//!   dev_id: "01"
//!   cmd_id: "10"
//!   prm_id: "00"
//!   error_byte: "00"
//!   data: ["00", "00", "00", "05"]
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uart_frame_exchange::SerialSettings;
use uart_frame_protocol::FieldText;

use crate::error::{CliError, CliResult};

/// Contents of a `uframe` configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Port to open when `--port` is not given.
    pub port: Option<String>,
    /// Serial settings.
    pub serial: SerialSettings,
    /// Frame fields to send when none are given on the command line.
    pub fields: Option<FieldText>,
}

impl CliConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(text: &str) -> CliResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, port: Option<String>, baud_rate: Option<u32>, timeout_ms: Option<u64>) -> Self {
        if port.is_some() {
            self.port = port;
        }
        if let Some(baud_rate) = baud_rate {
            self.serial.baud_rate = baud_rate;
        }
        if let Some(timeout_ms) = timeout_ms {
            self.serial.timeout_ms = timeout_ms;
        }
        self
    }

    /// Port to use, or [`CliError::NoPort`].
    pub fn require_port(&self) -> CliResult<&str> {
        self.port.as_deref().ok_or(CliError::NoPort)
    }

    /// Field text from the command line, falling back to the config file.
    pub fn resolve_fields(&self, args: &[String]) -> CliResult<FieldText> {
        if args.is_empty() {
            return self.fields.clone().ok_or(CliError::NoFields);
        }
        Ok(FieldText::from_hex_line(&args.join(" "))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CliConfig::from_yaml("").expect("empty is valid");
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.timeout_ms, 1000);
    }

    #[test]
    fn test_full_config() {
        let config = CliConfig::from_yaml(
            r#"
port: COM3
serial:
  baud_rate: 19200
fields:
  start_byte: "02"
  dev_id: "01"
  cmd_id: "10"
  prm_id: "00"
  error_byte: "00"
  data: ["00", "00", "00", "05"]
"#,
        )
        .expect("valid config");

        assert_eq!(config.port.as_deref(), Some("COM3"));
        assert_eq!(config.serial.baud_rate, 19200);
        assert_eq!(config.serial.timeout_ms, 1000);

        let fields = config.resolve_fields(&[]).expect("fields from config");
        assert_eq!(fields.cmd_id, "10");
        assert_eq!(fields.data[3], "05");
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::from_yaml("port: COM3")
            .expect("valid config")
            .with_overrides(Some("COM4".to_string()), Some(115_200), None);
        assert_eq!(config.require_port().expect("port"), "COM4");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.serial.timeout_ms, 1000);
    }

    #[test]
    fn test_missing_port_and_fields() {
        let config = CliConfig::default();
        assert!(matches!(config.require_port(), Err(CliError::NoPort)));
        assert!(matches!(config.resolve_fields(&[]), Err(CliError::NoFields)));
    }

    #[test]
    fn test_fields_from_args_accepts_split_or_joined() {
        let config = CliConfig::default();
        let split: Vec<String> = "02 01 10 00 00 00 00 00 05".split(' ').map(String::from).collect();
        let joined = vec!["02 01 10 00 00 00 00 00 05".to_string()];
        assert_eq!(
            config.resolve_fields(&split).expect("split"),
            config.resolve_fields(&joined).expect("joined")
        );
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            CliConfig::from_yaml("serial: [1, 2"),
            Err(CliError::ConfigParse(_))
        ));
    }
}
