//! Packet bus over a byte port
//!
//! A [`Bus`] owns a port and the packet that incoming bytes are decoded
//! into. Reading and writing never block: each call moves at most what the
//! port can take right now and reports whether the packet is finished.

use core::fmt;

use duino_bus_hal::Port;
use duino_bus_protocol::{Packet, PacketError, Progress};

use crate::config::BusConfig;

/// Errors reported by the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<E> {
    /// Packet could not be decoded or encoded
    Packet(PacketError),
    /// Transport failure
    Port(E),
}

impl<E> From<PacketError> for BusError<E> {
    fn from(e: PacketError) -> Self {
        BusError::Packet(e)
    }
}

impl<E: fmt::Debug> fmt::Display for BusError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Packet(e) => write!(f, "packet error: {}", e),
            BusError::Port(e) => write!(f, "port error: {:?}", e),
        }
    }
}

/// Packet transport over a [`Port`]
pub struct Bus<'a, P: Port> {
    port: P,
    rx: Packet<'a>,
    /// Encoded byte the port refused, retried on the next write poll
    pending: Option<(u8, Progress)>,
    debug: bool,
}

impl<'a, P: Port> Bus<'a, P> {
    /// Create a bus decoding into `rx_storage`
    pub fn new(port: P, rx_storage: &'a mut [u8]) -> Self {
        Self {
            port,
            rx: Packet::new(rx_storage),
            pending: None,
            debug: false,
        }
    }

    /// Create a bus and apply `config`
    pub fn with_config(port: P, rx_storage: &'a mut [u8], config: &BusConfig) -> Self {
        let mut bus = Self::new(port, rx_storage);
        bus.set_debug(config.debug);
        bus
    }

    /// Enable or disable packet logging
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    /// Returns true if packet logging is enabled
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// The underlying port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutable access to the underlying port
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Release the port
    pub fn into_port(self) -> P {
        self.port
    }

    /// The most recently decoded packet
    pub fn packet(&self) -> &Packet<'a> {
        &self.rx
    }

    /// Mutable access to the receive packet
    pub fn packet_mut(&mut self) -> &mut Packet<'a> {
        &mut self.rx
    }

    /// Read one byte from the port, if any, and run it through the decoder
    ///
    /// Returns `Ok(None)` when the port had nothing to read.
    pub fn receive(&mut self) -> Result<Option<Progress>, BusError<P::Error>> {
        let byte = match self.port.read_byte().map_err(BusError::Port)? {
            Some(byte) => byte,
            None => return Ok(None),
        };
        let progress = self.rx.decode_byte(byte)?;
        if progress.is_done() && self.debug {
            log_packet("Rcvd", &self.rx);
        }
        Ok(Some(progress))
    }

    /// Read a byte from the port and run it through the packet parser
    ///
    /// No data available is reported as `Progress::NotDone`.
    pub fn process_byte(&mut self) -> Result<Progress, BusError<P::Error>> {
        Ok(self.receive()?.unwrap_or(Progress::NotDone))
    }

    /// Begin writing `packet`, discarding any unfinished write
    pub fn start_write(&mut self, packet: &mut Packet<'_>) -> Result<(), BusError<P::Error>> {
        packet.encode_start()?;
        self.pending = None;
        if self.debug {
            log_packet("Send", packet);
        }
        Ok(())
    }

    /// Push as many encoded bytes as the port accepts
    ///
    /// Returns `Progress::NotDone` when the port filled up before the
    /// closing `END`; call again with the same packet to continue.
    pub fn poll_write(&mut self, packet: &mut Packet<'_>) -> Result<Progress, BusError<P::Error>> {
        loop {
            let (byte, progress) = match self.pending.take() {
                Some(pending) => pending,
                None => packet.encode_byte()?,
            };
            if !self.port.write_byte(byte).map_err(BusError::Port)? {
                self.pending = Some((byte, progress));
                return Ok(Progress::NotDone);
            }
            if progress.is_done() {
                return Ok(Progress::Done);
            }
        }
    }

    /// Write a whole packet, spinning while the port is full
    pub fn write_packet(&mut self, packet: &mut Packet<'_>) -> Result<(), BusError<P::Error>> {
        self.start_write(packet)?;
        while !self.poll_write(packet)?.is_done() {}
        Ok(())
    }
}

#[cfg(feature = "defmt")]
fn log_packet(label: &str, packet: &Packet<'_>) {
    defmt::debug!(
        "{=str} cmd {=u8:#x} len {=usize} data {=[u8]:#x}",
        label,
        packet.command().unwrap_or_default(),
        packet.payload().len(),
        packet.payload()
    );
}

#[cfg(not(feature = "defmt"))]
fn log_packet(_label: &str, _packet: &Packet<'_>) {}
