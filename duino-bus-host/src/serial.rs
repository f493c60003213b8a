//! Serial-line transport
//!
//! [`SerialPort`] opens a tty (USB CDC, FTDI, ...) in raw 8N1 mode with a
//! zero timeout, so reads and writes never wait. This is how a host talks
//! to a real device.

use std::io::{self, ErrorKind, Read, Write};
use std::time::Duration;

use duino_bus_hal::Port;
use serialport::{DataBits, FlowControl, Parity, StopBits};

/// Baud rate used when none is configured
pub const DEFAULT_BAUD: u32 = 1_000_000;

/// Non-blocking [`Port`] over a serial device
pub struct SerialPort {
    inner: Box<dyn serialport::SerialPort>,
}

impl SerialPort {
    /// Open `path` at `baud`
    pub fn open(path: &str, baud: u32) -> io::Result<Self> {
        let inner = serialport::new(path, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::ZERO)
            .open()?;
        Ok(Self::new(inner))
    }

    /// Wrap an already opened port
    pub fn new(inner: Box<dyn serialport::SerialPort>) -> Self {
        Self { inner }
    }

    /// Device name, if the platform reports one
    pub fn name(&self) -> Option<String> {
        self.inner.name()
    }
}

impl std::fmt::Debug for SerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialPort")
            .field("name", &self.inner.name())
            .finish()
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}

impl Port for SerialPort {
    type Error = io::Error;

    fn is_data_available(&mut self) -> io::Result<bool> {
        Ok(self.inner.bytes_to_read()? > 0)
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if !self.is_data_available()? {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if is_transient(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// The driver does not report its queue size; a full queue shows up
    /// as a timed-out `write_byte`.
    fn is_space_available(&mut self) -> io::Result<bool> {
        Ok(true)
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<bool> {
        match self.inner.write(&[byte]) {
            Ok(0) => Ok(false),
            Ok(_) => Ok(true),
            Err(e) if is_transient(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
