//! PIO serial sequencer
//!
//! Runs one of the two sequencer programs on a PIO state machine and
//! exposes its FIFO pair as a [`ShiftFifo`]. Pin choice is free: SCK,
//! MOSI and MISO can be any PIO-capable GPIOs.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::gpio::Level;
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, Instance, PioPin, ShiftConfig, ShiftDirection,
    StateMachine,
};
use embassy_rp::Peri;
use fixed::types::U24F8;
use spritelink_hal::{ConfigError, Phase, ShiftFifo, SpiConfig};

use crate::pio::divider_bits;

/// Bits per FIFO word handed to the shifter
const BITS_PER_BYTE: u8 = 8;

/// Sequencer on a PIO state machine
pub struct PioShifter<'d, PIO: Instance, const SM: usize> {
    sm: StateMachine<'d, PIO, SM>,
    config: SpiConfig,
}

impl<'d, PIO: Instance, const SM: usize> PioShifter<'d, PIO, SM> {
    /// Load the program for `config.phase` and start the state machine
    ///
    /// # Arguments
    /// * `common` - PIO common resources (for loading the program)
    /// * `sm` - State machine to run it on
    /// * `sck` - Clock output, driven by side-set
    /// * `mosi` - Data output
    /// * `miso` - Data input
    /// * `config` - Bus parameters, checked before anything is touched
    pub fn new<SCK: PioPin, MOSI: PioPin, MISO: PioPin>(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        sck: Peri<'d, SCK>,
        mosi: Peri<'d, MOSI>,
        miso: Peri<'d, MISO>,
        config: SpiConfig,
    ) -> Result<Self, ConfigError> {
        let divider = divider_bits(clk_sys_freq(), &config)?;

        let installed = match config.phase {
            Phase::CaptureOnFirstTransition => {
                let prg = pio::pio_asm!(
                    ".side_set 1",
                    ".wrap_target",
                    "out pins, 1 side 0",
                    "in pins, 1 side 1",
                    ".wrap"
                );
                common.load_program(&prg.program)
            }
            Phase::CaptureOnSecondTransition => {
                let prg = pio::pio_asm!(
                    ".side_set 1",
                    ".wrap_target",
                    "out x, 1 side 0",
                    "mov pins, x side 1 [1]",
                    "in pins, 1 side 0",
                    ".wrap"
                );
                common.load_program(&prg.program)
            }
        };

        let sck = common.make_pio_pin(sck);
        let mosi = common.make_pio_pin(mosi);
        let miso = common.make_pio_pin(miso);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&sck]);
        cfg.set_out_pins(&[&mosi]);
        cfg.set_in_pins(&[&miso]);
        cfg.shift_out = ShiftConfig {
            auto_fill: true,
            threshold: BITS_PER_BYTE,
            direction: ShiftDirection::Left,
        };
        cfg.shift_in = ShiftConfig {
            auto_fill: true,
            threshold: BITS_PER_BYTE,
            direction: ShiftDirection::Left,
        };
        cfg.clock_divider = U24F8::from_bits(divider);

        sm.set_config(&cfg);
        sm.set_pins(Level::Low, &[&sck, &mosi]);
        sm.set_pin_dirs(PioDirection::Out, &[&sck, &mosi]);
        sm.set_pin_dirs(PioDirection::In, &[&miso]);
        sm.set_enable(true);

        Ok(Self { sm, config })
    }

    pub fn config(&self) -> &SpiConfig {
        &self.config
    }

    /// Stop the state machine and hand it back
    pub fn release(mut self) -> StateMachine<'d, PIO, SM> {
        self.sm.set_enable(false);
        self.sm
    }
}

impl<PIO: Instance, const SM: usize> ShiftFifo for PioShifter<'_, PIO, SM> {
    fn push(&mut self, byte: u8) {
        let word = (byte as u32) << 24;
        while !self.sm.tx().try_push(word) {
            core::hint::spin_loop();
        }
    }

    fn pull(&mut self) -> u8 {
        loop {
            if let Some(word) = self.sm.rx().try_pull() {
                return word as u8;
            }
            core::hint::spin_loop();
        }
    }
}
