//! Configuration type definitions
//!
//! Bus-level settings shared by devices and hosts. With the `serde`
//! feature the types can be read from a config file; missing fields take
//! their defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default time to wait for a response (ms)
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u32 = 100;

/// Bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BusConfig {
    /// Log every packet sent and received
    pub debug: bool,
    /// How long a host waits for a response before giving up (ms)
    pub response_timeout_ms: u32,
    /// Number of times a host re-sends a request that timed out
    pub max_retries: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            debug: false,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            max_retries: 0,
        }
    }
}

impl BusConfig {
    /// Total number of attempts a request gets
    pub fn attempts(&self) -> u32 {
        u32::from(self.max_retries) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BusConfig::default();
        assert!(!config.debug);
        assert_eq!(config.response_timeout_ms, 100);
        assert_eq!(config.attempts(), 1);
    }

    #[test]
    fn test_attempts_with_retries() {
        let config = BusConfig {
            max_retries: u8::MAX,
            ..BusConfig::default()
        };
        assert_eq!(config.attempts(), 256);
    }
}
