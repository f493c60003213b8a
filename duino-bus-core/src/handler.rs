//! Packet dispatch
//!
//! A handler looks at a received packet and, if it recognises the command,
//! fills in a response. Handlers compose: a tuple `(A, B)` offers the
//! packet to `A` first and to `B` only if `A` declined.

use duino_bus_protocol::{Packet, PING};

/// Maps a received packet to a response
pub trait PacketHandler {
    /// Handle an incoming packet
    ///
    /// `rsp` starts out empty. Returns true if the packet was handled and
    /// `rsp` should be sent back, false if the command is not recognised.
    fn handle_packet(&mut self, cmd: &Packet<'_>, rsp: &mut Packet<'_>) -> bool;
}

impl<H: PacketHandler + ?Sized> PacketHandler for &mut H {
    fn handle_packet(&mut self, cmd: &Packet<'_>, rsp: &mut Packet<'_>) -> bool {
        (**self).handle_packet(cmd, rsp)
    }
}

impl<A: PacketHandler, B: PacketHandler> PacketHandler for (A, B) {
    fn handle_packet(&mut self, cmd: &Packet<'_>, rsp: &mut Packet<'_>) -> bool {
        self.0.handle_packet(cmd, rsp) || self.1.handle_packet(cmd, rsp)
    }
}

/// Answers `PING` with an empty `PING`
#[derive(Debug, Clone, Copy, Default)]
pub struct PingHandler;

impl PacketHandler for PingHandler {
    fn handle_packet(&mut self, cmd: &Packet<'_>, rsp: &mut Packet<'_>) -> bool {
        cmd.command() == Some(PING) && rsp.set(PING, &[]).is_ok()
    }
}

/// Adapts a closure into a [`PacketHandler`]
pub struct FnHandler<F>(pub F);

impl<F> FnHandler<F>
where
    F: FnMut(&Packet<'_>, &mut Packet<'_>) -> bool,
{
    /// Wrap `f`
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> PacketHandler for FnHandler<F>
where
    F: FnMut(&Packet<'_>, &mut Packet<'_>) -> bool,
{
    fn handle_packet(&mut self, cmd: &Packet<'_>, rsp: &mut Packet<'_>) -> bool {
        (self.0)(cmd, rsp)
    }
}
