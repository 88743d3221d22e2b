//! Demo choreography
//!
//! Thin consumer of the link and the sync gate: walks the controller
//! through its features in fixed stages.

pub mod demo;
pub mod orbit;

pub use demo::{Demo, DemoError, Stage, DUAL_SPRITE_FRAMES, SWEEP_OFFSETS};
pub use orbit::{circle_point, cos_deg, sin_deg, Spiral};
