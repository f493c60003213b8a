//! TCP transport
//!
//! [`SocketPort`] puts a `TcpStream` into non-blocking mode and moves one
//! byte at a time, which is what the packet engine expects from a serial
//! line. A closed peer shows up as an `UnexpectedEof` error.

use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use duino_bus_hal::Port;

/// Non-blocking [`Port`] over a TCP connection
#[derive(Debug)]
pub struct SocketPort {
    stream: TcpStream,
}

impl SocketPort {
    /// Wrap a connected stream
    pub fn new(stream: TcpStream) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        // Frames go out a byte at a time
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Connect to `addr`
    pub fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        Self::new(TcpStream::connect(addr)?)
    }

    /// Address of the remote end
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.stream.peer_addr()
    }

    /// Borrow the stream
    pub fn get_ref(&self) -> &TcpStream {
        &self.stream
    }
}

fn closed() -> io::Error {
    io::Error::new(ErrorKind::UnexpectedEof, "connection closed by peer")
}

fn is_transient(e: &io::Error) -> bool {
    matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted)
}

impl Port for SocketPort {
    type Error = io::Error;

    fn is_data_available(&mut self) -> io::Result<bool> {
        let mut buf = [0u8; 1];
        match self.stream.peek(&mut buf) {
            Ok(0) => Err(closed()),
            Ok(_) => Ok(true),
            Err(e) if is_transient(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.stream.read(&mut buf) {
            Ok(0) => Err(closed()),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if is_transient(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The socket API has no cheap readiness query for writing, so this
    /// always says yes; a full send buffer is reported by `write_byte`.
    fn is_space_available(&mut self) -> io::Result<bool> {
        Ok(true)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<bool> {
        match self.stream.write(&[byte]) {
            Ok(0) => Err(io::Error::from(ErrorKind::WriteZero)),
            Ok(_) => Ok(true),
            Err(e) if is_transient(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
