//! Board-agnostic command transport for the sprite display controller
//!
//! This crate contains everything between the hardware traits and the
//! firmware entry point:
//!
//! - Serial bus with the one-outstanding-response discipline
//! - CPU-driven bit sequencer for boards without a programmable one
//! - Command link (select framing, validation before bus activity)
//! - Frame/line blanking latches and the sync gate built on them
//! - Link configuration types and parser
//! - Demo sequencer composing all of the above
//!
//! # Ownership
//!
//! The bus and the select line are owned by exactly one foreground
//! sequence. Nothing here locks them; callers must not share a
//! [`link::CommandLink`] between tasks. The blanking latches are the only
//! state written from another context (the edge handlers).

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bus;
pub mod config;
pub mod link;
pub mod sequencer;
pub mod soft;
pub mod sync;

pub use bus::SerialBus;
pub use link::{CommandLink, LinkError};
pub use soft::SoftSequencer;
pub use sync::{BlankingEdge, Edge, EdgeHandler, SyncGate, SyncLatch, SYNC_LINE_OFFSET};
