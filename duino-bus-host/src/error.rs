//! Error types for the host tools
//!
//! Provides a unified error type for all host operations.

use std::io;

use duino_bus_core::BusError;
use duino_bus_protocol::PacketError;
use thiserror::Error;

/// Result type alias using HostError
pub type Result<T> = std::result::Result<T, HostError>;

/// Unified error type for host operations
#[derive(Debug, Error)]
pub enum HostError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Packet error: {0}")]
    Packet(PacketError),

    #[error("No response within {0} ms")]
    Timeout(u32),

    #[error("Unexpected response: command {0:#04x}")]
    UnexpectedResponse(u8),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<PacketError> for HostError {
    fn from(e: PacketError) -> Self {
        HostError::Packet(e)
    }
}

impl From<BusError<io::Error>> for HostError {
    fn from(e: BusError<io::Error>) -> Self {
        match e {
            BusError::Packet(e) => HostError::Packet(e),
            BusError::Port(e) => HostError::Io(e),
        }
    }
}

impl From<toml::de::Error> for HostError {
    fn from(e: toml::de::Error) -> Self {
        HostError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_error_conversion() {
        let err: HostError = BusError::<io::Error>::Packet(PacketError::TooSmall).into();
        assert!(matches!(err, HostError::Packet(PacketError::TooSmall)));

        let err: HostError =
            BusError::Port(io::Error::from(io::ErrorKind::UnexpectedEof)).into();
        assert!(matches!(err, HostError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_display() {
        assert_eq!(HostError::Timeout(100).to_string(), "No response within 100 ms");
        assert_eq!(
            HostError::UnexpectedResponse(0x02).to_string(),
            "Unexpected response: command 0x02"
        );
    }
}
