//! Client and simulated device talking over a loopback socket

use std::net::{SocketAddr, TcpListener};
use std::thread;

use duino_bus_core::BusConfig;
use duino_bus_host::sim::{self, ECHO, MAX_PACKET};
use duino_bus_host::{Client, HostError, SocketPort};
use duino_bus_protocol::{Packet, PING};

fn spawn_sim() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        sim::serve(stream, &BusConfig::default()).unwrap();
    });
    addr
}

fn config() -> BusConfig {
    BusConfig {
        response_timeout_ms: 2000,
        ..BusConfig::default()
    }
}

#[test]
fn test_ping() {
    let port = SocketPort::connect(spawn_sim()).unwrap();
    let mut rx_storage = [0u8; MAX_PACKET];
    let mut client = Client::new(port, &mut rx_storage, config());

    for _ in 0..3 {
        client.ping().unwrap();
    }
}

#[test]
fn test_echo_reserved_bytes() {
    let port = SocketPort::connect(spawn_sim()).unwrap();
    let mut rx_storage = [0u8; MAX_PACKET];
    let mut client = Client::new(port, &mut rx_storage, config());

    let payload = [0xC0, 0xDB, 0x00, 0xDC, 0xDD, 0xC0];
    let mut storage = [0u8; 16];
    let mut request = Packet::with_data(&mut storage, ECHO, &payload).unwrap();

    let response = client.transact(&mut request).unwrap();
    assert_eq!(response.command(), Some(ECHO));
    assert_eq!(response.payload(), &payload);
}

#[test]
fn test_large_echo() {
    let port = SocketPort::connect(spawn_sim()).unwrap();
    let mut rx_storage = [0u8; MAX_PACKET];
    let mut client = Client::new(port, &mut rx_storage, config());

    let payload: Vec<u8> = (0..=252u8).collect();
    let mut storage = [0u8; MAX_PACKET];
    let mut request = Packet::with_data(&mut storage, ECHO, &payload).unwrap();

    let response = client.transact(&mut request).unwrap();
    assert_eq!(response.payload(), &payload[..]);
}

#[test]
fn test_unknown_command_times_out() {
    let port = SocketPort::connect(spawn_sim()).unwrap();
    let mut rx_storage = [0u8; MAX_PACKET];
    let config = BusConfig {
        response_timeout_ms: 50,
        max_retries: 1,
        ..BusConfig::default()
    };
    let mut client = Client::new(port, &mut rx_storage, config);

    let mut storage = [0u8; 4];
    let mut request = Packet::with_data(&mut storage, 0x33, &[]).unwrap();
    let err = client.transact(&mut request).unwrap_err();
    assert!(matches!(err, HostError::Timeout(50)));

    // The device is still serving
    let mut storage = [0u8; 4];
    let mut request = Packet::with_data(&mut storage, PING, &[]).unwrap();
    client.set_debug(true);
    assert_eq!(client.transact(&mut request).unwrap().command(), Some(PING));
}
