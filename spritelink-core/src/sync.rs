//! Blanking-interval synchronisation
//!
//! The controller exposes two falling-edge signals: one per frame and one
//! per line. Each feeds a [`SyncLatch`], a single-bit flag set by the edge
//! handler and consumed by the foreground sequence.
//!
//! The latch is a [`Signal`] guarded by a critical section, so checking
//! the flag and clearing it on consume cannot interleave with a set from
//! the handler. A set that lands after [`SyncLatch::arm`] but before the
//! consumer starts waiting is still seen by the wait.
//!
//! [`SyncGate::sync`] waits for a frame edge and then four line edges.
//! Commands issued after it land in the vertical blanking interval instead
//! of the middle of the active picture.
//!
//! There is no timeout. If the edges stop, the waiter blocks until reset.

use core::hint::spin_loop;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};

/// Lines waited after the frame edge by [`SyncGate::sync`]
pub const SYNC_LINE_OFFSET: u32 = 4;

/// Which blanking edge a latch follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Vertical sync
    Frame,
    /// Horizontal sync
    Line,
}

/// Edge latch
pub struct SyncLatch {
    signal: Signal<CriticalSectionRawMutex, ()>,
    edges: AtomicU32,
}

impl SyncLatch {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
            edges: AtomicU32::new(0),
        }
    }

    /// Set the latch; called from the edge handler on every edge
    pub fn set(&self) {
        self.edges.fetch_add(1, Ordering::Relaxed);
        self.signal.signal(());
    }

    /// Clear the latch
    pub fn arm(&self) {
        self.signal.reset();
    }

    pub fn is_set(&self) -> bool {
        self.signal.signaled()
    }

    /// Wait until the latch is set, then clear it
    ///
    /// Does not clear on entry: an edge since the last [`arm`](Self::arm)
    /// completes the wait immediately.
    pub async fn wait(&self) {
        self.signal.wait().await
    }

    /// Spinning form of [`wait`](Self::wait) for contexts without an executor
    pub fn wait_blocking(&self) {
        while self.signal.try_take().is_none() {
            spin_loop();
        }
    }

    /// Arm, then wait for the next edge
    pub async fn wait_fresh(&self) {
        self.arm();
        self.wait().await
    }

    /// Edges seen since boot (wrapping)
    pub fn edges(&self) -> u32 {
        self.edges.load(Ordering::Relaxed)
    }
}

impl Default for SyncLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer side of an edge latch
#[allow(async_fn_in_trait)]
pub trait BlankingEdge {
    /// Clear any edge seen so far
    fn arm(&self);

    /// Wait for and consume an edge
    async fn wait(&self);

    /// Wait for and consume an edge without yielding
    fn wait_blocking(&self);
}

impl BlankingEdge for SyncLatch {
    fn arm(&self) {
        SyncLatch::arm(self)
    }

    async fn wait(&self) {
        SyncLatch::wait(self).await
    }

    fn wait_blocking(&self) {
        SyncLatch::wait_blocking(self)
    }
}

impl<T: BlankingEdge> BlankingEdge for &T {
    fn arm(&self) {
        (**self).arm()
    }

    async fn wait(&self) {
        (**self).wait().await
    }

    fn wait_blocking(&self) {
        (**self).wait_blocking()
    }
}

/// Handler side of a latch, handed to whatever watches the pin
#[derive(Clone, Copy)]
pub struct EdgeHandler<'a> {
    edge: Edge,
    latch: &'a SyncLatch,
}

impl EdgeHandler<'_> {
    /// Record one edge
    pub fn fire(&self) {
        self.latch.set();
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    pub fn edges(&self) -> u32 {
        self.latch.edges()
    }
}

/// Frame and line latches
pub struct SyncGate<L = SyncLatch> {
    frame: L,
    line: L,
}

impl SyncGate<SyncLatch> {
    pub const fn new() -> Self {
        Self {
            frame: SyncLatch::new(),
            line: SyncLatch::new(),
        }
    }

    /// Handler for the edge source of `edge`
    ///
    /// The caller binds it to the physical pin; the gate does not know
    /// which pin that is.
    pub fn bind(&self, edge: Edge) -> EdgeHandler<'_> {
        EdgeHandler {
            edge,
            latch: self.latch(edge),
        }
    }
}

impl Default for SyncGate<SyncLatch> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> SyncGate<L> {
    pub const fn from_latches(frame: L, line: L) -> Self {
        Self { frame, line }
    }

    pub fn latch(&self, edge: Edge) -> &L {
        match edge {
            Edge::Frame => &self.frame,
            Edge::Line => &self.line,
        }
    }

    pub fn frame(&self) -> &L {
        &self.frame
    }

    pub fn line(&self) -> &L {
        &self.line
    }
}

impl<L: BlankingEdge> SyncGate<L> {
    /// Wait for the next frame edge
    pub async fn sync_frame(&self) {
        self.frame.arm();
        self.frame.wait().await;
    }

    /// Wait for the next line edge
    pub async fn sync_line(&self) {
        self.line.arm();
        self.line.wait().await;
    }

    /// Wait for `lines` consecutive line edges
    pub async fn sync_lines(&self, lines: u32) {
        for _ in 0..lines {
            self.sync_line().await;
        }
    }

    /// Wait for a frame edge followed by `lines` line edges
    pub async fn sync_with_offset(&self, lines: u32) {
        self.sync_frame().await;
        self.sync_lines(lines).await;
    }

    /// Wait until the start of the safe update window
    pub async fn sync(&self) {
        self.sync_with_offset(SYNC_LINE_OFFSET).await;
    }

    /// Spinning form of [`sync`](Self::sync)
    pub fn sync_blocking(&self) {
        self.frame.arm();
        self.frame.wait_blocking();
        for _ in 0..SYNC_LINE_OFFSET {
            self.line.arm();
            self.line.wait_blocking();
        }
    }
}
