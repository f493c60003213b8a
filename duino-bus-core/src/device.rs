//! Peripheral-side serve loop
//!
//! A [`Device`] listens on a bus, hands each complete packet to its
//! handler and sends back whatever response the handler produced. Each
//! call to [`Device::poll`] does a bounded amount of work and never
//! blocks, so it can sit in a superloop next to other tasks.

use duino_bus_hal::Port;
use duino_bus_protocol::{Packet, PacketError, Progress};

use crate::bus::{Bus, BusError};
use crate::handler::PacketHandler;

/// What a single [`Device::poll`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Activity {
    /// Nothing to read and nothing to send
    Idle,
    /// Consumed a byte; the packet is not complete yet
    Receiving,
    /// A packet was handled and its response is being sent
    Handled { command: u8 },
    /// A packet arrived that no handler answered
    Unhandled { command: u8 },
    /// Response partially written; the port is full
    Sending,
    /// Response completely written
    Sent,
    /// A corrupt or oversized frame was thrown away
    Dropped(PacketError),
}

/// Bus, handler and response storage for one peripheral
pub struct Device<'a, 'r, P: Port, H: PacketHandler> {
    bus: Bus<'a, P>,
    handler: H,
    response: Packet<'r>,
    sending: bool,
}

impl<'a, 'r, P: Port, H: PacketHandler> Device<'a, 'r, P, H> {
    /// Create a device answering on `bus`, building responses in `rsp_storage`
    pub fn new(bus: Bus<'a, P>, handler: H, rsp_storage: &'r mut [u8]) -> Self {
        Self {
            bus,
            handler,
            response: Packet::new(rsp_storage),
            sending: false,
        }
    }

    /// The underlying bus
    pub fn bus(&self) -> &Bus<'a, P> {
        &self.bus
    }

    /// Mutable access to the underlying bus
    pub fn bus_mut(&mut self) -> &mut Bus<'a, P> {
        &mut self.bus
    }

    /// Mutable access to the handler
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// The last response produced
    pub fn response(&self) -> &Packet<'r> {
        &self.response
    }

    /// Returns true while a response is waiting for room on the port
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Do one step of work
    ///
    /// Finishes a pending response first; otherwise reads at most one
    /// byte. Dropped frames are reported as [`Activity::Dropped`]; only
    /// transport failures and engine misuse come back as `Err`.
    pub fn poll(&mut self) -> Result<Activity, BusError<P::Error>> {
        if self.sending {
            return match self.bus.poll_write(&mut self.response)? {
                Progress::Done => {
                    self.sending = false;
                    Ok(Activity::Sent)
                }
                Progress::NotDone => Ok(Activity::Sending),
            };
        }

        match self.bus.receive() {
            Ok(None) => Ok(Activity::Idle),
            Ok(Some(Progress::NotDone)) => Ok(Activity::Receiving),
            Ok(Some(Progress::Done)) => self.dispatch(),
            Err(BusError::Packet(e)) if e.is_recoverable() => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Dropped frame: {:?}", e);
                Ok(Activity::Dropped(e))
            }
            Err(e) => Err(e),
        }
    }

    /// Poll until there is nothing left to read or the port is full
    ///
    /// Returns every non-idle activity to `on_activity`.
    pub fn poll_all(
        &mut self,
        mut on_activity: impl FnMut(Activity),
    ) -> Result<(), BusError<P::Error>> {
        loop {
            match self.poll()? {
                Activity::Idle => return Ok(()),
                Activity::Sending => {
                    on_activity(Activity::Sending);
                    return Ok(());
                }
                activity => on_activity(activity),
            }
        }
    }

    fn dispatch(&mut self) -> Result<Activity, BusError<P::Error>> {
        // A completed frame always carries a command byte
        let command = self.bus.packet().command().unwrap_or_default();
        self.response.clear();

        // A handler that claims the packet but builds no command has
        // nothing to send
        let handled = self.handler.handle_packet(self.bus.packet(), &mut self.response)
            && !self.response.is_empty();
        if !handled {
            #[cfg(feature = "defmt")]
            defmt::warn!("Unhandled command {=u8:#x}", command);
            return Ok(Activity::Unhandled { command });
        }

        self.bus.start_write(&mut self.response)?;
        self.sending = true;
        Ok(Activity::Handled { command })
    }
}
