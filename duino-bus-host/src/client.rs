//! Request/response client
//!
//! The host side of the bus sends one request and waits for one response.
//! Waiting is bounded by the configured response timeout; a request that
//! times out is re-sent up to `max_retries` times.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use duino_bus_core::{Bus, BusConfig, BusError};
use duino_bus_hal::Port;
use duino_bus_protocol::{CommandRegistry, Packet, Progress, PING};
use tracing::warn;

use crate::error::{HostError, Result};
use crate::logging::log_packet;

/// Number of command names a client can hold
pub const MAX_COMMAND_NAMES: usize = 32;

/// Sleep between polls while the port is idle
const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Talks to one device
pub struct Client<'a, P: Port<Error = io::Error>> {
    bus: Bus<'a, P>,
    config: BusConfig,
    names: CommandRegistry<MAX_COMMAND_NAMES>,
}

impl<'a, P: Port<Error = io::Error>> Client<'a, P> {
    /// Create a client receiving responses into `rx_storage`
    pub fn new(port: P, rx_storage: &'a mut [u8], config: BusConfig) -> Self {
        Self {
            bus: Bus::with_config(port, rx_storage, &config),
            config,
            names: CommandRegistry::new(),
        }
    }

    /// Name a command for packet traces
    pub fn register_command(&mut self, cmd: u8, name: &'static str) -> Result<()> {
        self.names
            .register(cmd, name)
            .map_err(|_| HostError::Config(format!("no room to name command {:#04x}", cmd)))
    }

    /// Current bus settings
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Enable or disable packet traces
    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
        self.bus.set_debug(debug);
    }

    /// The underlying bus
    pub fn bus_mut(&mut self) -> &mut Bus<'a, P> {
        &mut self.bus
    }

    /// Send `request` and wait for the response
    pub fn transact(&mut self, request: &mut Packet<'_>) -> Result<&Packet<'a>> {
        let timeout = Duration::from_millis(u64::from(self.config.response_timeout_ms));

        for attempt in 1..=self.config.attempts() {
            if attempt > 1 {
                warn!(attempt, "No response, resending");
            }
            if self.config.debug {
                log_packet("Send", request, &self.names);
            }
            self.bus.write_packet(request)?;

            if self.wait_response(timeout)? {
                if self.config.debug {
                    log_packet("Rcvd", self.bus.packet(), &self.names);
                }
                return Ok(self.bus.packet());
            }
        }

        Err(HostError::Timeout(self.config.response_timeout_ms))
    }

    /// Check that the device answers
    pub fn ping(&mut self) -> Result<()> {
        let mut storage = [0u8; 1];
        let mut request = Packet::with_data(&mut storage, PING, &[])?;
        let response = self.transact(&mut request)?;
        match response.command() {
            Some(PING) => Ok(()),
            other => Err(HostError::UnexpectedResponse(other.unwrap_or_default())),
        }
    }

    /// Returns true once a complete packet arrived, false at the deadline
    fn wait_response(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        self.bus.packet_mut().decode_reset();

        while Instant::now() < deadline {
            match self.bus.receive() {
                Ok(Some(Progress::Done)) => return Ok(true),
                Ok(Some(Progress::NotDone)) => {}
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(BusError::Packet(e)) if e.is_recoverable() => {
                    warn!("Discarding frame: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(false)
    }
}
