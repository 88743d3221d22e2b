//! RP2040-specific HAL for the spritelink firmware
//!
//! This crate provides RP2040 implementations of the `spritelink-hal`
//! traits:
//!
//! - PIO-based serial sequencer for both clock phases
//! - GPIO newtypes for the select line and bit-banged fallback
//! - Falling-edge watchers feeding the blanking latches
//! - PWM clock for the display controller

#![no_std]

pub mod clock;
pub mod edge;
pub mod gpio;
pub mod pio;
pub mod serial;

pub use clock::{ClockError, ProjectClock};
pub use edge::EdgeWatcher;
pub use gpio::{GpioInput, GpioOutput, SelectPin};
pub use serial::PioShifter;
