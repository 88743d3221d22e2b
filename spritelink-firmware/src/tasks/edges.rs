//! Blanking edge tasks

use defmt::*;
use embassy_time::{Duration, Ticker};

use spritelink_core::Edge;
use spritelink_hal_rp2040::EdgeWatcher;

use crate::channels::SYNC_GATE;

/// Edge counter log interval in seconds
const MONITOR_INTERVAL_S: u64 = 5;

/// Watch one sync input; one instance per edge
#[embassy_executor::task(pool_size = 2)]
pub async fn edge_task(mut watcher: EdgeWatcher<'static>) {
    info!("Edge task started: {:?}", watcher.edge());
    watcher.run().await
}

/// Periodically log edge rates so a dead sync line shows up in the log
#[embassy_executor::task]
pub async fn edge_monitor_task() {
    let mut ticker = Ticker::every(Duration::from_secs(MONITOR_INTERVAL_S));
    let mut last_frames = SYNC_GATE.latch(Edge::Frame).edges();
    let mut last_lines = SYNC_GATE.latch(Edge::Line).edges();

    loop {
        ticker.next().await;

        let frames = SYNC_GATE.latch(Edge::Frame).edges();
        let lines = SYNC_GATE.latch(Edge::Line).edges();
        let frame_delta = frames.wrapping_sub(last_frames);
        let line_delta = lines.wrapping_sub(last_lines);

        if frame_delta == 0 {
            warn!("No frame edges in the last {}s", MONITOR_INTERVAL_S);
        } else {
            debug!(
                "Edges: {} frames, {} lines in {}s",
                frame_delta, line_delta, MONITOR_INTERVAL_S
            );
        }

        last_frames = frames;
        last_lines = lines;
    }
}
