//! Configuration for the control interface.
//!
//! Values come from three layers: built-in defaults, an optional YAML file
//! and command-line overrides, in increasing order of precedence.
//!
//! ```yaml
//! port: /dev/ttyUSB1
//! baud_rate: 19200
//! read_timeout_ms: 2000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::session::SessionConfig;

/// Default baud rate of the stopwatch UART.
pub const DEFAULT_BAUD_RATE: u32 = 19200;

/// Default serial port identifier.
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM8";
/// Default serial port identifier.
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Settings for one control session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StopwatchConfig {
    /// Serial port identifier.
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
    /// Upper bound on waiting for a timestamp reply, in milliseconds.
    /// Absent means wait forever.
    pub read_timeout_ms: Option<u64>,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        StopwatchConfig {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: None,
        }
    }
}

/// Values supplied on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Serial port identifier.
    pub port: Option<String>,
    /// Baud rate.
    pub baud_rate: Option<u32>,
    /// Reply timeout in milliseconds.
    pub read_timeout_ms: Option<u64>,
}

impl StopwatchConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map.
        if text.trim().is_empty() {
            return Ok(StopwatchConfig::default());
        }
        let config: StopwatchConfig = serde_yaml::from_str(text)?;
        Ok(config)
    }

    /// Render as YAML, in the same schema `from_yaml_str` reads.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Resolve the final configuration from an optional file and overrides.
    pub fn resolve(
        file: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => StopwatchConfig::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of this config.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(baud_rate) = overrides.baud_rate {
            self.baud_rate = baud_rate;
        }
        if overrides.read_timeout_ms.is_some() {
            self.read_timeout_ms = overrides.read_timeout_ms;
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.is_empty() {
            return Err(ConfigError::Invalid("port must not be empty".to_string()));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::Invalid("baud_rate must be non-zero".to_string()));
        }
        if self.read_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "read_timeout_ms must be non-zero when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Reply timeout as a duration.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    /// Session settings derived from this config.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            read_timeout: self.read_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = StopwatchConfig::default();
        assert_eq!(config.baud_rate, 19200);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.read_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let config = StopwatchConfig::from_yaml_str("port: /dev/ttyACM0\n").unwrap();
        assert_eq!(config.port, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(config.read_timeout_ms, None);
    }

    #[test]
    fn test_empty_yaml() {
        assert_eq!(
            StopwatchConfig::from_yaml_str("").unwrap(),
            StopwatchConfig::default()
        );
    }

    #[test]
    fn test_yaml_output_reloads() {
        let config = StopwatchConfig {
            port: "COM3".to_string(),
            baud_rate: 9600,
            read_timeout_ms: Some(250),
        };
        let text = config.to_yaml_string().unwrap();

        assert!(text.contains("port: COM3"));
        assert_eq!(StopwatchConfig::from_yaml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = StopwatchConfig::from_yaml_str("parity: even\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_overrides_win() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: COM3\nbaud_rate: 9600\nread_timeout_ms: 500").unwrap();

        let config = StopwatchConfig::resolve(
            Some(file.path()),
            ConfigOverrides {
                port: None,
                baud_rate: Some(19200),
                read_timeout_ms: None,
            },
        )
        .unwrap();

        assert_eq!(config.port, "COM3");
        assert_eq!(config.baud_rate, 19200);
        assert_eq!(config.read_timeout(), Some(Duration::from_millis(500)));
        assert_eq!(
            config.session_config().read_timeout,
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_missing_file() {
        let result = StopwatchConfig::resolve(
            Some(Path::new("/nonexistent/stopwatch.yaml")),
            ConfigOverrides::default(),
        );
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_values() {
        let zero_baud = StopwatchConfig {
            baud_rate: 0,
            ..StopwatchConfig::default()
        };
        assert!(matches!(zero_baud.validate(), Err(ConfigError::Invalid(_))));

        let zero_timeout = StopwatchConfig {
            read_timeout_ms: Some(0),
            ..StopwatchConfig::default()
        };
        assert!(matches!(zero_timeout.validate(), Err(ConfigError::Invalid(_))));
    }
}
