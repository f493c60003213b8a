//! Host-side tooling for Duino Bus
//!
//! Everything that needs `std`: TCP and serial ports, TOML configuration,
//! `tracing` setup and a request/response [`Client`]. The [`sim`] module
//! runs the `no_std` device loop over a socket so the tools can be tried
//! without hardware.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod serial;
pub mod sim;
pub mod socket;

pub use client::Client;
pub use config::HostConfig;
pub use error::{HostError, Result};
pub use serial::SerialPort;
pub use socket::SocketPort;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
