//! Demo task
//!
//! Owns the command link and walks the controller through every demo
//! stage, forever.

use defmt::*;
use embassy_time::Delay;

use spritelink_core::sequencer::{Demo, Stage};
use spritelink_core::{SerialBus, SyncLatch};
use spritelink_hal_rp2040::{ProjectClock, SelectPin};

#[cfg(not(feature = "soft-sequencer"))]
use embassy_rp::peripherals::PIO0;
#[cfg(not(feature = "soft-sequencer"))]
use spritelink_hal_rp2040::PioShifter;

#[cfg(feature = "soft-sequencer")]
use spritelink_core::SoftSequencer;
#[cfg(feature = "soft-sequencer")]
use spritelink_hal_rp2040::{GpioInput, GpioOutput};

/// Sequencer behind the link: PIO0 state machine 0
#[cfg(not(feature = "soft-sequencer"))]
pub type LinkFifo = PioShifter<'static, PIO0, 0>;

/// Sequencer behind the link: bit-banged from the CPU
#[cfg(feature = "soft-sequencer")]
pub type LinkFifo =
    SoftSequencer<GpioOutput<'static>, GpioOutput<'static>, GpioInput<'static>, Delay>;

pub type LinkDemo =
    Demo<'static, SerialBus<LinkFifo>, SelectPin<'static>, SyncLatch, ProjectClock<'static>, Delay>;

/// Demo task
///
/// A failing stage is logged and skipped. A failing start leaves the
/// controller in an unknown state, so the task gives up.
#[embassy_executor::task]
pub async fn demo_task(mut demo: LinkDemo) {
    info!("Demo task started");

    if let Err(e) = demo.start().await {
        error!("Demo start failed: {:?}", e);
        return;
    }
    info!("Controller initialised");

    let mut round: u32 = 0;
    loop {
        for stage in Stage::ALL {
            info!("Stage: {}", stage.name());
            match demo.run(stage).await {
                Ok(()) => trace!(
                    "Stage {} done, {} commands sent",
                    stage.name(),
                    demo.link().commands_sent()
                ),
                Err(e) => warn!("Stage {} failed: {:?}", stage.name(), e),
            }
        }

        round = round.wrapping_add(1);
        debug!("Demo round {} complete, misc={:?}", round, demo.misc());
    }
}
