//! Packet engine results
//!
//! Incremental progress and failures are kept apart: [`Progress`] is the
//! normal outcome of feeding or producing one byte, [`PacketError`] is a
//! frame that had to be thrown away or a caller that broke a contract.

use core::fmt;

/// Outcome of a single decode or encode step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// More bytes are needed (decode) or remain to be sent (encode)
    NotDone,
    /// The packet is complete
    Done,
}

impl Progress {
    /// Returns true if the packet is complete
    pub fn is_done(self) -> bool {
        matches!(self, Progress::Done)
    }
}

/// Errors that can occur while decoding, encoding or building a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Trailing CRC byte does not match the received data
    Checksum {
        /// CRC byte found at the end of the frame
        received: u8,
        /// CRC computed over command and payload
        expected: u8,
    },
    /// Frame closed before both command and CRC were received
    TooSmall,
    /// Decoded data does not fit in the packet storage
    BufferFull,
    /// State machine found itself in an unknown state
    InvalidState,
    /// Data passed to a builder method exceeds the remaining capacity
    PayloadTooLarge,
}

impl PacketError {
    /// Returns true if the frame was lost but the engine can keep going
    ///
    /// `InvalidState` and `PayloadTooLarge` point at a bug in the caller
    /// rather than noise on the line.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PacketError::Checksum { .. } | PacketError::TooSmall | PacketError::BufferFull
        )
    }
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::Checksum { received, expected } => write!(
                f,
                "CRC error: received 0x{:02x} expected 0x{:02x}",
                received, expected
            ),
            PacketError::TooSmall => f.write_str("frame too small"),
            PacketError::BufferFull => f.write_str("packet storage full"),
            PacketError::InvalidState => f.write_str("invalid parser state"),
            PacketError::PayloadTooLarge => f.write_str("payload exceeds packet capacity"),
        }
    }
}
