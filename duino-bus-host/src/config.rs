//! Host configuration
//!
//! Read from a TOML file. Every field is optional:
//!
//! ```toml
//! address = "192.168.1.20:8888"
//! # serial = "/dev/ttyACM0"  # use a serial line instead of TCP
//! baud = 1000000
//! log_filter = "info,duino_bus_host=debug"
//!
//! [bus]
//! debug = true
//! response_timeout_ms = 250
//! max_retries = 2
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use duino_bus_core::BusConfig;
use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};
use crate::serial::DEFAULT_BAUD;

/// Default device address
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:8888";

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings for host tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Device address (host:port)
    pub address: String,
    /// Serial device; when set it is used instead of `address`
    pub serial: Option<String>,
    /// Serial baud rate
    pub baud: u32,
    /// Bus settings
    pub bus: BusConfig,
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            serial: None,
            baud: DEFAULT_BAUD,
            bus: BusConfig::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl HostConfig {
    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| HostError::Config(format!("{}: {}", path.display(), e)))?;
        text.parse()
    }
}

impl FromStr for HostConfig {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        let config: HostConfig = "".parse().unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.bus.response_timeout_ms, 100);
    }

    #[test]
    fn test_partial_bus_section() {
        let config: HostConfig = r#"
            address = "10.0.0.5:9000"

            [bus]
            max_retries = 3
        "#
        .parse()
        .unwrap();

        assert_eq!(config.address, "10.0.0.5:9000");
        assert_eq!(config.bus.max_retries, 3);
        assert_eq!(config.bus.response_timeout_ms, 100);
        assert!(!config.bus.debug);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.serial, None);
        assert_eq!(config.baud, DEFAULT_BAUD);
    }

    #[test]
    fn test_serial_device() {
        let config: HostConfig = r#"
            serial = "/dev/ttyACM0"
            baud = 115200
        "#
        .parse()
        .unwrap();

        assert_eq!(config.serial.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.baud, 115200);
    }

    #[test]
    fn test_invalid_toml() {
        let err = "address = ".parse::<HostConfig>().unwrap_err();
        assert!(matches!(err, HostError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = HostConfig::load("/nonexistent/duino-bus.toml").unwrap_err();
        assert!(matches!(err, HostError::Config(msg) if msg.contains("duino-bus.toml")));
    }
}
