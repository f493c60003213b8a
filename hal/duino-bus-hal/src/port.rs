//! Byte-level port abstraction
//!
//! A port is anything that can move single bytes without blocking. The
//! packet engine never waits on a port: it asks, and when the answer is
//! "not now" it reports that upward and lets the caller decide when to
//! poll again.

use embedded_io::{Read, ReadReady, Write, WriteReady};

/// Non-blocking byte source and sink
///
/// Implemented by concrete transports (serial lines, sockets). Transport
/// faults are reported through [`Port::Error`]; "nothing to read" and
/// "no room to write" are not faults.
pub trait Port {
    /// Error type for transport failures
    type Error: core::fmt::Debug;

    /// Returns true if at least one byte can be read without blocking
    fn is_data_available(&mut self) -> Result<bool, Self::Error>;

    /// Read a single byte
    ///
    /// Returns `Ok(None)` when no data is available yet.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Returns true if at least one byte can be written without blocking
    fn is_space_available(&mut self) -> Result<bool, Self::Error>;

    /// Write a single byte
    ///
    /// Returns `Ok(false)` when the port has no room; the caller retries
    /// with the same byte later.
    fn write_byte(&mut self, byte: u8) -> Result<bool, Self::Error>;
}

impl<T: Port + ?Sized> Port for &mut T {
    type Error = T::Error;

    fn is_data_available(&mut self) -> Result<bool, Self::Error> {
        (**self).is_data_available()
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read_byte()
    }

    fn is_space_available(&mut self) -> Result<bool, Self::Error> {
        (**self).is_space_available()
    }

    fn write_byte(&mut self, byte: u8) -> Result<bool, Self::Error> {
        (**self).write_byte(byte)
    }
}

/// Adapter exposing an `embedded-io` transport as a [`Port`]
///
/// Buffered UART drivers implement the readiness traits, which is exactly
/// what the non-blocking port contract needs.
#[derive(Debug)]
pub struct IoPort<T> {
    inner: T,
}

impl<T> IoPort<T> {
    /// Wrap a transport
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped transport
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the wrapped transport
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Release the wrapped transport
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> Port for IoPort<T>
where
    T: Read + ReadReady + Write + WriteReady,
{
    type Error = T::Error;

    fn is_data_available(&mut self) -> Result<bool, Self::Error> {
        self.inner.read_ready()
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        if !self.inner.read_ready()? {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match self.inner.read(&mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(buf[0])),
        }
    }

    fn is_space_available(&mut self) -> Result<bool, Self::Error> {
        self.inner.write_ready()
    }

    fn write_byte(&mut self, byte: u8) -> Result<bool, Self::Error> {
        if !self.inner.write_ready()? {
            return Ok(false);
        }
        Ok(self.inner.write(&[byte])? == 1)
    }
}
