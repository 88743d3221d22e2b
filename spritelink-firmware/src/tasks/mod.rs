//! Embassy async tasks
//!
//! Edge tasks feed the blanking latches; the demo task is their only
//! consumer and the only owner of the link.

pub mod demo;
pub mod edges;

pub use demo::{demo_task, LinkDemo, LinkFifo};
pub use edges::{edge_monitor_task, edge_task};
