//! Spritelink Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the command transport is written
//! against. Chip-specific crates implement them; host tests mock them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  spritelink-firmware / spritelink-core  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  spritelink-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ spritelink-hal-   │
//!           │      rp2040       │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::SelectLine`] - Active-low select wrapper
//! - [`spi::SpiBus`] - Full-duplex serial bus operations
//! - [`sequencer::ShiftFifo`] - FIFO pair of an instruction sequencer
//! - [`clock::ClockOutput`] - Clock source feeding the remote device

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod sequencer;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use clock::ClockOutput;
pub use gpio::{InputPin, OutputPin, SelectLine};
pub use sequencer::ShiftFifo;
pub use spi::{ConfigError, Mode, Phase, Polarity, SpiBus, SpiConfig};
