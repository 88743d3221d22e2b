//! Spritelink - host firmware for a sprite display controller
//!
//! Drives the controller's command port from an RP2040 and times every
//! update against its frame and line sync edges.
//!
//! # Pin map
//!
//! | GPIO | Function                         |
//! |------|----------------------------------|
//! | 2    | SCK                              |
//! | 3    | MOSI                             |
//! | 4    | MISO                             |
//! | 5    | Select (active low)              |
//! | 6    | Frame sync input (falling edge)  |
//! | 7    | Line sync input (falling edge)   |
//! | 8    | Project clock output (PWM 4A)    |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use spritelink_core::sequencer::Demo;
use spritelink_core::{CommandLink, Edge, SerialBus};
use spritelink_hal_rp2040::{EdgeWatcher, ProjectClock, SelectPin};

#[cfg(not(feature = "soft-sequencer"))]
use embassy_rp::bind_interrupts;
#[cfg(not(feature = "soft-sequencer"))]
use embassy_rp::peripherals::PIO0;
#[cfg(not(feature = "soft-sequencer"))]
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
#[cfg(not(feature = "soft-sequencer"))]
use spritelink_hal_rp2040::PioShifter;

#[cfg(feature = "soft-sequencer")]
use spritelink_core::SoftSequencer;
#[cfg(feature = "soft-sequencer")]
use spritelink_hal_rp2040::{GpioInput, GpioOutput};

use crate::channels::SYNC_GATE;

mod channels;
mod config;
mod tasks;

#[cfg(not(feature = "soft-sequencer"))]
bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Spritelink firmware starting...");

    let p = embassy_rp::init(Default::default());
    let system_hz = clk_sys_freq();
    info!("Peripherals initialized, clk_sys = {} Hz", system_hz);

    let config = config::load(system_hz);
    let spi = config.bus.spi_config();
    info!(
        "Link: {} Hz, {:?}, {:?}, line offset {}",
        spi.frequency, spi.polarity, spi.phase, config.sync.line_offset
    );

    // Sync inputs, bound before anything waits on them
    let frame = EdgeWatcher::new(Input::new(p.PIN_6, Pull::Up), SYNC_GATE.bind(Edge::Frame));
    let line = EdgeWatcher::new(Input::new(p.PIN_7, Pull::Up), SYNC_GATE.bind(Edge::Line));
    spawner.spawn(tasks::edge_task(frame)).unwrap();
    spawner.spawn(tasks::edge_task(line)).unwrap();
    spawner.spawn(tasks::edge_monitor_task()).unwrap();

    // Select idles high until the first command
    let select = SelectPin::new(Output::new(p.PIN_5, Level::High));

    #[cfg(not(feature = "soft-sequencer"))]
    let fifo = {
        let Pio {
            mut common, sm0, ..
        } = Pio::new(p.PIO0, Irqs);
        PioShifter::new(&mut common, sm0, p.PIN_2, p.PIN_3, p.PIN_4, spi)
    };

    #[cfg(feature = "soft-sequencer")]
    let fifo = SoftSequencer::new(
        GpioOutput::new(Output::new(p.PIN_2, Level::Low)),
        GpioOutput::new(Output::new(p.PIN_3, Level::Low)),
        GpioInput::new(Input::new(p.PIN_4, Pull::None)),
        Delay,
        spi,
    );

    let bus = match fifo.and_then(|fifo| SerialBus::new(fifo, spi)) {
        Ok(bus) => bus,
        Err(e) => {
            error!("Serial bus rejected its configuration: {:?}", e);
            return;
        }
    };
    info!("Serial bus initialized");

    let pwm = Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, PwmConfig::default());
    let clock = ProjectClock::new(pwm);

    let link = CommandLink::new(bus, select);
    let demo = Demo::new(link, &SYNC_GATE, clock, Delay, config);
    spawner.spawn(tasks::demo_task(demo)).unwrap();

    info!("All tasks spawned");
}
