//! Byte-at-a-time packet encoder
//!
//! Produces `END`, the escaped command and payload, the escaped CRC-8 and
//! a closing `END`, one byte per call, so the caller can stop whenever the
//! transport is full and pick up where it left off.

use crate::crc::crc8;
use crate::error::{PacketError, Progress};
use crate::packet::{Packet, State};
use crate::slip::{escape, END, ESC, ESC_ESC};

impl Packet<'_> {
    /// Reset the encoder to start encoding this packet
    ///
    /// Fails with `TooSmall` if no command has been set.
    pub fn encode_start(&mut self) -> Result<(), PacketError> {
        if self.body_len() == 0 {
            return Err(PacketError::TooSmall);
        }
        self.encode_state = State::Idle.raw();
        self.encode_idx = 0;
        Ok(())
    }

    /// Produce the next byte of the encoded frame
    ///
    /// Returns the byte together with `Progress::Done` for the closing
    /// `END`, `Progress::NotDone` for every byte before it. Fails with
    /// `TooSmall` if a frame would start without a command.
    pub fn encode_byte(&mut self) -> Result<(u8, Progress), PacketError> {
        let body_len = self.body_len();
        match State::from_raw(self.encode_state) {
            Some(State::Idle) => {
                if body_len == 0 {
                    return Err(PacketError::TooSmall);
                }
                self.encode_idx = 0;
                self.encode_crc = crc8(&self.storage[..body_len]);
                self.encode_state = State::Frame.raw();
                Ok((END, Progress::NotDone))
            }
            Some(State::Frame) => {
                if self.encode_idx > body_len {
                    self.encode_state = State::Idle.raw();
                    return Ok((END, Progress::Done));
                }
                let next = self.pending_byte(body_len);
                if escape(next).is_some() {
                    self.encode_state = State::Escape.raw();
                    return Ok((ESC, Progress::NotDone));
                }
                self.encode_idx += 1;
                Ok((next, Progress::NotDone))
            }
            Some(State::Escape) => {
                let next = self.pending_byte(body_len);
                self.encode_idx += 1;
                self.encode_state = State::Frame.raw();
                Ok((escape(next).unwrap_or(ESC_ESC), Progress::NotDone))
            }
            None => Err(PacketError::InvalidState),
        }
    }

    /// Number of bytes the encoded frame occupies on the wire
    pub fn encoded_len(&self) -> usize {
        let body = self.body();
        let stuffed = |byte: u8| if escape(byte).is_some() { 2 } else { 1 };
        2 + body.iter().map(|&b| stuffed(b)).sum::<usize>() + stuffed(crc8(body))
    }

    /// Encode the whole frame into `buf`
    ///
    /// Returns the number of bytes written, or `BufferFull` (with `buf`
    /// untouched) if the frame does not fit.
    pub fn encode_into(&mut self, buf: &mut [u8]) -> Result<usize, PacketError> {
        self.encode_start()?;
        if buf.len() < self.encoded_len() {
            return Err(PacketError::BufferFull);
        }
        let mut written = 0;
        loop {
            let (byte, progress) = self.encode_byte()?;
            buf[written] = byte;
            written += 1;
            if progress.is_done() {
                return Ok(written);
            }
        }
    }

    /// Byte at the encode cursor: body bytes first, then the CRC
    fn pending_byte(&self, body_len: usize) -> u8 {
        if self.encode_idx < body_len {
            self.storage[self.encode_idx]
        } else {
            self.encode_crc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::PING;
    use heapless::Vec;

    /// Encode `cmd` + `data` through a 16-byte packet
    fn encode(cmd: u8, data: &[u8]) -> Vec<u8, 40> {
        let mut storage = [0u8; 16];
        let mut packet = Packet::with_data(&mut storage, cmd, data).unwrap();
        let mut encoded = Vec::new();

        packet.encode_start().unwrap();
        loop {
            let (byte, progress) = packet.encode_byte().unwrap();
            encoded.push(byte).unwrap();
            if progress.is_done() {
                break;
            }
        }
        encoded
    }

    #[test]
    fn test_no_data() {
        assert_eq!(&encode(PING, &[])[..], &[0xC0, 0x01, 0x07, 0xC0]);
    }

    #[test]
    fn test_one_byte_data() {
        assert_eq!(&encode(PING, &[0x02])[..], &[0xC0, 0x01, 0x02, 0x1B, 0xC0]);
    }

    #[test]
    fn test_two_bytes_data() {
        assert_eq!(
            &encode(PING, &[0x02, 0x03])[..],
            &[0xC0, 0x01, 0x02, 0x03, 0x48, 0xC0]
        );
    }

    #[test]
    fn test_escape_end() {
        assert_eq!(
            &encode(0xC0, &[0x02, 0x03])[..],
            &[0xC0, 0xDB, 0xDC, 0x02, 0x03, 0xAE, 0xC0]
        );
    }

    #[test]
    fn test_escape_esc() {
        assert_eq!(
            &encode(0xDB, &[0x02, 0x03])[..],
            &[0xC0, 0xDB, 0xDD, 0x02, 0x03, 0xE0, 0xC0]
        );
    }

    #[test]
    fn test_escape_in_payload() {
        // crc8([02 C0 DB]) = 0x34
        assert_eq!(
            &encode(0x02, &[0xC0, 0xDB])[..],
            &[0xC0, 0x02, 0xDB, 0xDC, 0xDB, 0xDD, 0x34, 0xC0]
        );
    }

    #[test]
    fn test_crc_is_escaped() {
        // Find a one-byte payload whose CRC collides with END
        let data = (0..=u8::MAX)
            .find(|&b| crc8(&[PING, b]) == END)
            .unwrap();
        let encoded = encode(PING, &[data]);

        assert_eq!(encoded[encoded.len() - 3], ESC);
        assert_eq!(encoded[encoded.len() - 2], 0xDC);
        assert_eq!(encoded.iter().filter(|&&b| b == END).count(), 2);
    }

    #[test]
    fn test_reencode_decoded_packet() {
        let mut storage = [0u8; 16];
        let mut packet = Packet::new(&mut storage);
        let (result, _) = packet.decode_bytes(&[0xC0, 0x01, 0x02, 0x03, 0x48, 0xC0]);
        assert_eq!(result, Ok(Progress::Done));

        let mut buf = [0u8; 16];
        let len = packet.encode_into(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[0xC0, 0x01, 0x02, 0x03, 0x48, 0xC0]);
    }

    #[test]
    fn test_encode_into_too_small() {
        let mut storage = [0u8; 16];
        let mut packet = Packet::with_data(&mut storage, 0xC0, &[0x02]).unwrap();

        assert_eq!(packet.encoded_len(), 6);
        let mut buf = [0u8; 5];
        assert_eq!(packet.encode_into(&mut buf), Err(PacketError::BufferFull));
        assert_eq!(buf, [0u8; 5]);
    }

    #[test]
    fn test_encode_without_command() {
        let mut storage = [0u8; 4];
        let mut packet = Packet::new(&mut storage);
        assert_eq!(packet.encode_start(), Err(PacketError::TooSmall));
    }

    #[test]
    fn test_encode_byte_without_command() {
        let mut storage = [0u8; 4];
        let mut packet = Packet::new(&mut storage);

        // Skipping encode_start must not produce an empty frame
        assert_eq!(packet.encode_byte(), Err(PacketError::TooSmall));
        assert_eq!(packet.encode_byte(), Err(PacketError::TooSmall));

        packet.set_command(PING).unwrap();
        assert_eq!(packet.encode_byte(), Ok((0xC0, Progress::NotDone)));
        assert_eq!(packet.encode_byte(), Ok((0x01, Progress::NotDone)));
    }

    #[test]
    fn test_encode_restart() {
        let mut storage = [0u8; 16];
        let mut packet = Packet::with_data(&mut storage, PING, &[]).unwrap();
        let mut buf = [0u8; 8];

        let first = packet.encode_into(&mut buf).unwrap();
        let second = packet.encode_into(&mut buf).unwrap();
        assert_eq!(first, second);
        assert_eq!(&buf[..second], &[0xC0, 0x01, 0x07, 0xC0]);
    }

    #[test]
    fn test_bad_state() {
        let mut storage = [0u8; 16];
        let mut packet = Packet::with_data(&mut storage, PING, &[]).unwrap();

        packet.encode_start().unwrap();
        packet.encode_state = 0x80;
        assert_eq!(packet.encode_byte(), Err(PacketError::InvalidState));
    }
}
