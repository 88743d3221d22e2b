//! Blanking edge watcher
//!
//! Waits for falling edges on a sync input and sets the bound latch on
//! each one. The GPIO interrupt wakes the watcher, so the latch is set
//! from the executor rather than from the interrupt itself. One watcher
//! per edge, each in its own task.

use embassy_rp::gpio::Input;
use spritelink_core::{Edge, EdgeHandler};

/// Falling-edge source bound to a latch
pub struct EdgeWatcher<'d> {
    pin: Input<'d>,
    handler: EdgeHandler<'d>,
}

impl<'d> EdgeWatcher<'d> {
    pub fn new(pin: Input<'d>, handler: EdgeHandler<'d>) -> Self {
        Self { pin, handler }
    }

    pub fn edge(&self) -> Edge {
        self.handler.edge()
    }

    /// Edges seen so far
    pub fn edges(&self) -> u32 {
        self.handler.edges()
    }

    /// Set the latch on every falling edge, forever
    pub async fn run(&mut self) -> ! {
        loop {
            self.pin.wait_for_falling_edge().await;
            self.handler.fire();
        }
    }
}
