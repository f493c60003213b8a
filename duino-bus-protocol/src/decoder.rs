//! Byte-at-a-time packet decoder
//!
//! The decoder treats the first byte it sees after any finished frame as a
//! frame start, whatever its value, and only an `END` seen inside a frame
//! closes it. A live stream can be fed in without a separate
//! synchronisation step; the price is that the value of that first byte is
//! discarded.

use crate::crc::crc8;
use crate::error::{PacketError, Progress};
use crate::packet::{Packet, State};
use crate::slip::{unescape, END, ESC};

impl Packet<'_> {
    /// Run a single byte through the packet parser
    ///
    /// Returns `Ok(Progress::Done)` once a frame with a valid CRC has been
    /// stored, `Ok(Progress::NotDone)` while more bytes are needed. Every
    /// terminal result (success or a dropped frame) leaves the decoder
    /// ready to start a fresh frame on the next byte.
    pub fn decode_byte(&mut self, byte: u8) -> Result<Progress, PacketError> {
        match State::from_raw(self.decode_state) {
            Some(State::Idle) => {
                self.len = 0;
                self.has_crc = false;
                self.decode_state = State::Frame.raw();
                Ok(Progress::NotDone)
            }
            Some(State::Frame) => match byte {
                END => self.finish_frame(),
                ESC => {
                    self.decode_state = State::Escape.raw();
                    Ok(Progress::NotDone)
                }
                _ => self.push_decoded(byte),
            },
            Some(State::Escape) => {
                self.decode_state = State::Frame.raw();
                self.push_decoded(unescape(byte))
            }
            None => Err(PacketError::InvalidState),
        }
    }

    /// Feed bytes until a frame completes or fails
    ///
    /// Returns the outcome together with the number of bytes consumed.
    /// Bytes after a terminal result are left for the next call.
    pub fn decode_bytes(&mut self, bytes: &[u8]) -> (Result<Progress, PacketError>, usize) {
        for (idx, &byte) in bytes.iter().enumerate() {
            match self.decode_byte(byte) {
                Ok(Progress::NotDone) => {}
                other => return (other, idx + 1),
            }
        }
        (Ok(Progress::NotDone), bytes.len())
    }

    /// Abandon any partially decoded frame
    pub fn decode_reset(&mut self) {
        self.decode_state = State::Idle.raw();
    }

    /// Returns true if the decoder is part way through a frame
    pub fn is_decoding(&self) -> bool {
        self.decode_state != State::Idle.raw()
    }

    fn push_decoded(&mut self, byte: u8) -> Result<Progress, PacketError> {
        if self.len >= self.capacity() {
            self.decode_state = State::Idle.raw();
            return Err(PacketError::BufferFull);
        }
        self.storage[self.len] = byte;
        self.len += 1;
        Ok(Progress::NotDone)
    }

    fn finish_frame(&mut self) -> Result<Progress, PacketError> {
        match self.len {
            // Empty frames (back-to-back END bytes) are ignored
            0 => Ok(Progress::NotDone),
            // Minimum packet is a command and a CRC
            1 => {
                self.decode_state = State::Idle.raw();
                Err(PacketError::TooSmall)
            }
            len => {
                self.decode_state = State::Idle.raw();
                let received = self.storage[len - 1];
                let expected = crc8(&self.storage[..len - 1]);
                if received != expected {
                    #[cfg(feature = "defmt")]
                    defmt::warn!(
                        "CRC Error: Received {=u8:#x} Expected {=u8:#x}",
                        received,
                        expected
                    );
                    return Err(PacketError::Checksum { received, expected });
                }
                self.has_crc = true;
                #[cfg(feature = "defmt")]
                defmt::trace!("Rcvd {=[u8]:#x}", self.as_bytes());
                Ok(Progress::Done)
            }
        }
    }
}
