//! Duino Bus device simulator
//!
//! Listens on a TCP port and answers PING and ECHO, one client at a time.

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use duino_bus_host::{logging, sim, HostConfig};

/// Simulated Duino Bus device
#[derive(Parser, Debug)]
#[command(name = "duino-sim")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8888")]
    listen: String,

    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log every packet
    #[arg(short, long)]
    debug: bool,
}

fn run(args: Args) -> duino_bus_host::Result<()> {
    let mut config = match &args.config {
        Some(path) => HostConfig::load(path)?,
        None => HostConfig::default(),
    };
    config.bus.debug |= args.debug;

    logging::init(&config.log_filter)?;
    tracing::info!("duino-sim v{}", duino_bus_host::VERSION);

    let listener = TcpListener::bind(&args.listen)?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = sim::serve(stream, &config.bus) {
                    tracing::error!("Connection failed: {}", e);
                }
            }
            Err(e) => tracing::warn!("Accept failed: {}", e),
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("duino-sim: {}", e);
            ExitCode::FAILURE
        }
    }
}
