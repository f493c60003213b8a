//! Logging setup and packet traces

use duino_bus_protocol::{dump_mem, CommandNames, DumpOptions, Packet};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{HostError, Result};

/// Install the global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over `filter`.
pub fn init(filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter).map_err(|e| HostError::Config(e.to_string()))?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| HostError::Config(e.to_string()))
}

/// Log a packet header and a hex dump of its payload at `debug`
pub fn log_packet(label: &str, packet: &Packet<'_>, names: &impl CommandNames) {
    let cmd = packet.command().unwrap_or_default();
    debug!(
        "{}: cmd {:#04x} ({}) len {}",
        label,
        cmd,
        names.label(cmd),
        packet.payload().len()
    );
    if !packet.payload().is_empty() {
        dump_mem(packet.payload(), &DumpOptions::with_prefix(label), |line| {
            debug!("{}", line)
        });
    }
}
