//! Packet storage and accessors
//!
//! A [`Packet`] borrows a fixed-size byte buffer for its whole lifetime and
//! is reused for every message that passes through it. Decoding and
//! encoding only move cursors around inside that buffer; nothing is ever
//! reallocated.
//!
//! Stored layout once a frame has been decoded:
//! ```text
//! storage[0]            command
//! storage[1..len-1]     payload
//! storage[len-1]        CRC-8 as received
//! ```
//! A packet built for sending holds only command and payload; the CRC is
//! computed while encoding.

use crate::error::PacketError;

/// State of the decoder or encoder cursor
///
/// Kept in the packet as its raw discriminant so a corrupted value is
/// reported as [`PacketError::InvalidState`] instead of being trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum State {
    /// Between frames
    Idle = 0,
    /// Inside a frame
    Frame = 1,
    /// Inside a frame, directly after an escape byte
    Escape = 2,
}

impl State {
    pub(crate) const fn raw(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(State::Idle),
            1 => Some(State::Frame),
            2 => Some(State::Escape),
            _ => None,
        }
    }
}

/// A framed message backed by caller-provided storage
#[derive(Debug)]
pub struct Packet<'a> {
    /// Place to store command, payload and received CRC
    pub(crate) storage: &'a mut [u8],
    /// Number of valid bytes in `storage`
    pub(crate) len: usize,
    /// Whether the last stored byte is a verified, received CRC
    pub(crate) has_crc: bool,
    /// Decoder state (raw [`State`])
    pub(crate) decode_state: u8,
    /// Encoder state (raw [`State`])
    pub(crate) encode_state: u8,
    /// Index of the next byte to encode
    pub(crate) encode_idx: usize,
    /// CRC computed when the current encode started
    pub(crate) encode_crc: u8,
}

impl<'a> Packet<'a> {
    /// Create an empty packet using `storage` for its data
    ///
    /// The capacity is the length of `storage` and counts the command
    /// byte and, for received packets, the CRC byte.
    pub fn new(storage: &'a mut [u8]) -> Self {
        Self {
            storage,
            len: 0,
            has_crc: false,
            decode_state: State::Idle.raw(),
            encode_state: State::Idle.raw(),
            encode_idx: 0,
            encode_crc: 0,
        }
    }

    /// Create a packet holding `cmd` and `data`
    pub fn with_data(storage: &'a mut [u8], cmd: u8, data: &[u8]) -> Result<Self, PacketError> {
        let mut packet = Self::new(storage);
        packet.set(cmd, data)?;
        Ok(packet)
    }

    /// Maximum number of bytes the packet can hold
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of valid bytes stored, including command and received CRC
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing is stored, not even a command
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The stored bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Number of stored bytes covered by the CRC (command + payload)
    pub(crate) fn body_len(&self) -> usize {
        if self.has_crc {
            self.len - 1
        } else {
            self.len
        }
    }

    /// Command and payload, without any received CRC
    pub fn body(&self) -> &[u8] {
        &self.storage[..self.body_len()]
    }

    /// The command byte, if one is stored
    pub fn command(&self) -> Option<u8> {
        if self.len >= 1 {
            Some(self.storage[0])
        } else {
            None
        }
    }

    /// The payload (everything between command and CRC)
    pub fn payload(&self) -> &[u8] {
        let end = self.body_len();
        if end <= 1 {
            &[]
        } else {
            &self.storage[1..end]
        }
    }

    /// Mutable access to the payload
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let end = self.body_len();
        if end <= 1 {
            &mut []
        } else {
            &mut self.storage[1..end]
        }
    }

    /// The CRC received with a successfully decoded frame
    pub fn checksum(&self) -> Option<u8> {
        if self.has_crc && self.len >= 2 {
            Some(self.storage[self.len - 1])
        } else {
            None
        }
    }

    /// Drop a received CRC so the packet can be modified and re-encoded
    fn strip_crc(&mut self) {
        if self.has_crc {
            self.len -= 1;
            self.has_crc = false;
        }
    }

    /// Set the command byte, keeping any payload
    pub fn set_command(&mut self, cmd: u8) -> Result<(), PacketError> {
        if self.capacity() == 0 {
            return Err(PacketError::PayloadTooLarge);
        }
        self.strip_crc();
        self.storage[0] = cmd;
        if self.len == 0 {
            self.len = 1;
        }
        Ok(())
    }

    /// Replace the payload, keeping the command byte
    ///
    /// Pass an empty slice to make the payload empty.
    pub fn set_data(&mut self, data: &[u8]) -> Result<(), PacketError> {
        if 1 + data.len() > self.capacity() {
            return Err(PacketError::PayloadTooLarge);
        }
        self.has_crc = false;
        self.len = 1;
        self.append_data(data)
    }

    /// Set both command and payload
    pub fn set(&mut self, cmd: u8, data: &[u8]) -> Result<(), PacketError> {
        if 1 + data.len() > self.capacity() {
            return Err(PacketError::PayloadTooLarge);
        }
        self.set_command(cmd)?;
        self.set_data(data)
    }

    /// Append bytes to the payload
    ///
    /// Fails without touching the packet if `data` does not fit.
    pub fn append_data(&mut self, data: &[u8]) -> Result<(), PacketError> {
        let start = self.body_len();
        if data.len() > self.capacity() - start {
            return Err(PacketError::PayloadTooLarge);
        }
        self.strip_crc();
        self.storage[start..start + data.len()].copy_from_slice(data);
        self.len = start + data.len();
        Ok(())
    }

    /// Append a single byte to the payload
    pub fn append_byte(&mut self, byte: u8) -> Result<(), PacketError> {
        self.append_data(&[byte])
    }

    /// Forget all stored bytes and abandon any decode in progress
    pub fn clear(&mut self) {
        self.len = 0;
        self.has_crc = false;
        self.decode_state = State::Idle.raw();
        self.encode_state = State::Idle.raw();
        self.encode_idx = 0;
    }
}
