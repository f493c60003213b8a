//! Duino Bus ping tool
//!
//! Connects to a device over TCP or a serial line and checks that it
//! answers PING.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use duino_bus_host::sim::{ECHO, MAX_PACKET};
use duino_bus_hal::Port;
use duino_bus_host::{logging, Client, HostConfig, SerialPort, SocketPort};

/// Ping a Duino Bus device
#[derive(Parser, Debug)]
#[command(name = "duino-ping")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device address (host:port), overrides the config file
    #[arg(short, long, conflicts_with = "serial")]
    address: Option<String>,

    /// Serial device, used instead of a TCP address
    #[arg(short, long)]
    serial: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Number of pings to send
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,

    /// Log every packet
    #[arg(short, long)]
    debug: bool,
}

fn run(args: Args) -> duino_bus_host::Result<u32> {
    let mut config = match &args.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    if let Some(address) = args.address {
        config.address = address;
        config.serial = None;
    }
    if let Some(serial) = args.serial {
        config.serial = Some(serial);
    }
    if let Some(baud) = args.baud {
        config.baud = baud;
    }
    config.bus.debug |= args.debug;

    logging::init(&config.log_filter)?;
    tracing::info!("duino-ping v{}", duino_bus_host::VERSION);

    match &config.serial {
        Some(path) => {
            tracing::info!("Opening {} at {} baud", path, config.baud);
            ping(SerialPort::open(path, config.baud)?, &config, args.count)
        }
        None => {
            tracing::info!("Connecting to {}", config.address);
            ping(SocketPort::connect(config.address.as_str())?, &config, args.count)
        }
    }
}

fn ping<P: Port<Error = io::Error>>(
    port: P,
    config: &HostConfig,
    count: u32,
) -> duino_bus_host::Result<u32> {
    let mut rx_storage = [0u8; MAX_PACKET];
    let mut client = Client::new(port, &mut rx_storage, config.bus);
    client.register_command(ECHO, "ECHO")?;

    let mut failures = 0;
    for seq in 0..count {
        let start = Instant::now();
        match client.ping() {
            Ok(()) => tracing::info!(seq, "Reply in {:?}", start.elapsed()),
            Err(e) => {
                tracing::error!(seq, "Ping failed: {}", e);
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("duino-ping: {}", e);
            ExitCode::FAILURE
        }
    }
}
