//! Simulated device
//!
//! Serves a single connection with a [`Device`] that answers `PING` and
//! echoes back the payload of `ECHO`. Used by `duino-sim` and by the
//! loopback tests.

use std::io::{self, ErrorKind};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use duino_bus_core::{Activity, Bus, BusConfig, BusError, Device, PacketHandler, PingHandler};
use duino_bus_protocol::{CommandNames, CommandRegistry, Packet};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::logging::log_packet;
use crate::socket::SocketPort;

/// Returns the request payload unchanged
pub const ECHO: u8 = 0x02;

/// Largest packet the simulator accepts, command and CRC included
pub const MAX_PACKET: usize = 256;

const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Answers [`ECHO`] with a copy of the request
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl PacketHandler for EchoHandler {
    fn handle_packet(&mut self, cmd: &Packet<'_>, rsp: &mut Packet<'_>) -> bool {
        cmd.command() == Some(ECHO) && rsp.set(ECHO, cmd.payload()).is_ok()
    }
}

/// Command names known to the simulator
pub fn command_names() -> CommandRegistry<4> {
    let mut names = CommandRegistry::new();
    let _ = names.register(ECHO, "ECHO");
    names
}

/// Serve `stream` until the peer disconnects
pub fn serve(stream: TcpStream, config: &BusConfig) -> Result<()> {
    let port = SocketPort::new(stream)?;
    if let Ok(peer) = port.peer_addr() {
        info!(%peer, "Client connected");
    }

    let names = command_names();
    let mut rx_storage = [0u8; MAX_PACKET];
    let mut rsp_storage = [0u8; MAX_PACKET];
    let bus = Bus::with_config(port, &mut rx_storage, config);
    let mut device = Device::new(bus, (PingHandler, EchoHandler), &mut rsp_storage);

    loop {
        match device.poll() {
            Ok(Activity::Idle) => thread::sleep(IDLE_SLEEP),
            Ok(Activity::Receiving) | Ok(Activity::Sending) | Ok(Activity::Sent) => {}
            Ok(Activity::Handled { command }) => {
                debug!(command = names.label(command), "Handled");
                if config.debug {
                    log_packet("Rcvd", device.bus().packet(), &names);
                    log_packet("Send", device.response(), &names);
                }
            }
            Ok(Activity::Unhandled { command }) => {
                warn!("Unhandled command {:#04x}", command);
            }
            Ok(Activity::Dropped(e)) => warn!("Dropped frame: {}", e),
            Err(BusError::Port(e)) if is_disconnect(&e) => {
                info!("Client disconnected");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset | ErrorKind::BrokenPipe
    )
}
