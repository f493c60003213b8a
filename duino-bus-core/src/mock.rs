//! In-memory port for tests

use core::convert::Infallible;

use duino_bus_hal::Port;
use heapless::{Deque, Vec};

/// Port backed by fixed queues
///
/// `tx_room` limits how many bytes are accepted before `write_byte`
/// reports that the port is full.
pub struct MockPort {
    pub rx: Deque<u8, 128>,
    pub tx: Vec<u8, 128>,
    pub tx_room: usize,
}

impl MockPort {
    pub fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
            tx_room: usize::MAX,
        }
    }

    pub fn with_rx(data: &[u8]) -> Self {
        let mut port = Self::new();
        port.feed(data);
        port
    }

    pub fn feed(&mut self, data: &[u8]) {
        for &byte in data {
            self.rx.push_back(byte).unwrap();
        }
    }
}

impl Port for MockPort {
    type Error = Infallible;

    fn is_data_available(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.rx.is_empty())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        Ok(self.rx.pop_front())
    }

    fn is_space_available(&mut self) -> Result<bool, Self::Error> {
        Ok(self.tx_room > 0 && !self.tx.is_full())
    }

    fn write_byte(&mut self, byte: u8) -> Result<bool, Self::Error> {
        if self.tx_room == 0 || self.tx.push(byte).is_err() {
            return Ok(false);
        }
        self.tx_room -= 1;
        Ok(true)
    }
}
