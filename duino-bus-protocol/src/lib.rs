//! Duino Bus packet protocol
//!
//! This crate implements the framing used to talk to addressable
//! peripheral devices over a serial line or socket. It is designed to run
//! on small microcontrollers: packets live in caller-provided storage and
//! nothing here allocates.
//!
//! # Protocol Overview
//!
//! Packets are SLIP encoded; the length is inferred from the framing:
//! ```text
//! ┌─────┬─────────┬─────────────┬───────┬─────┐
//! │ END │ COMMAND │ PAYLOAD     │ CRC-8 │ END │
//! │ 0xC0│ 1B      │ 0..N B      │ 1B    │ 0xC0│
//! └─────┴─────────┴─────────────┴───────┴─────┘
//! ```
//!
//! `END` and `ESC` bytes inside command, payload or CRC are replaced with
//! two-byte escape sequences. The CRC-8 covers command and payload in
//! their unescaped form.
//!
//! Decoding and encoding are byte-at-a-time state machines on [`Packet`],
//! so they can be driven straight from a UART interrupt or a poll loop.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod crc;
mod decoder;
pub mod dump;
mod encoder;
pub mod error;
pub mod packet;
pub mod slip;

pub use command::{BaseCommands, CommandNames, CommandRegistry, PING};
pub use crc::crc8;
pub use dump::{dump_mem, DumpOptions};
pub use error::{PacketError, Progress};
pub use packet::Packet;
