//! Shared state between tasks
//!
//! The blanking latches are the only state written from more than one
//! task: the edge tasks set them, the demo task consumes them.

use spritelink_core::SyncGate;

/// Frame and line latches of the display controller
pub static SYNC_GATE: SyncGate = SyncGate::new();
