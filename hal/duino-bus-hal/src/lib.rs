//! Duino Bus Hardware Abstraction Layer
//!
//! This crate defines the byte-level transport capability that the packet
//! engine is driven from. Any serial-like link (UART, TCP socket, USB CDC,
//! an in-memory pipe in tests) only has to move single bytes without
//! blocking and answer "is there data" / "is there room".
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Bus / Device (duino-bus-core)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  duino-bus-hal (this crate - Port)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ IoPort<UART>  │       │  SocketPort   │
//! │ (embedded-io) │       │  (host, TCP)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`port::Port`] - Non-blocking byte source/sink

#![no_std]
#![deny(unsafe_code)]

pub mod port;

pub use port::{IoPort, Port};
