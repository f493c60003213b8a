//! Board-agnostic bus logic for Duino Bus
//!
//! This crate glues the packet engine to a transport and to application
//! code, without depending on any particular hardware:
//!
//! - [`Bus`] - Feeds port bytes into the decoder and writes encoded packets
//! - [`PacketHandler`] - Maps a received packet to a response
//! - [`Device`] - Non-blocking serve loop for the peripheral side
//! - [`BusConfig`] - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod config;
pub mod device;
pub mod handler;

#[cfg(test)]
mod mock;

pub use bus::{Bus, BusError};
pub use config::BusConfig;
pub use device::{Activity, Device};
pub use handler::{FnHandler, PacketHandler, PingHandler};
