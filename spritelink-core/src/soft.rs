//! CPU-driven bit sequencer
//!
//! Runs the same two cadences as the programmable sequencer, on any three
//! GPIO lines, with the CPU stepping each sub-cycle:
//!
//! ```text
//! Phase-A (CPHA=0), 2 steps per bit:
//!   1: SCK low,  drive MOSI
//!   2: SCK high, sample MISO
//!
//! Phase-B (CPHA=1), 4 steps per bit:
//!   1:   SCK low   (refill slot)
//!   2-3: SCK high, drive MOSI
//!   4:   SCK low,  sample MISO
//! ```
//!
//! Each step lasts `1 / (bit rate × steps per bit)`. Bytes are shifted as
//! soon as they are pushed while the receive FIFO has room; once it is full
//! further bytes wait in the transmit FIFO, and a push into a full transmit
//! FIFO stalls forever just as the hardware would with nobody draining.

use embedded_hal::delay::DelayNs;
use heapless::Deque;
use spritelink_hal::{ConfigError, InputPin, OutputPin, Phase, ShiftFifo, SpiConfig};

/// Depth of each FIFO
pub const FIFO_DEPTH: usize = 4;

/// Bit-banged [`ShiftFifo`]
pub struct SoftSequencer<C, O, I, D> {
    sck: C,
    mosi: O,
    miso: I,
    delay: D,
    phase: Phase,
    step_ns: u32,
    tx: Deque<u8, FIFO_DEPTH>,
    rx: Deque<u8, FIFO_DEPTH>,
}

impl<C, O, I, D> SoftSequencer<C, O, I, D>
where
    C: OutputPin,
    O: OutputPin,
    I: InputPin,
    D: DelayNs,
{
    /// Configure the lines and park the clock low
    pub fn new(
        mut sck: C,
        mut mosi: O,
        miso: I,
        delay: D,
        config: SpiConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let step_ns = 1_000_000_000 / config.sequencer_hz()?;

        sck.set_low();
        mosi.set_low();

        Ok(Self {
            sck,
            mosi,
            miso,
            delay,
            phase: config.phase,
            step_ns,
            tx: Deque::new(),
            rx: Deque::new(),
        })
    }

    /// Duration of one sub-step in nanoseconds
    pub fn step_ns(&self) -> u32 {
        self.step_ns
    }

    pub fn release(self) -> (C, O, I, D) {
        (self.sck, self.mosi, self.miso, self.delay)
    }

    /// Shift queued bytes while the receive FIFO has room
    fn run(&mut self) {
        while !self.rx.is_full() {
            let Some(byte) = self.tx.pop_front() else {
                return;
            };
            let response = self.shift_byte(byte);
            // The loop condition leaves a free slot
            debug_assert!(!self.rx.is_full());
            if self.rx.push_back(response).is_err() {
                return;
            }
        }
    }

    fn shift_byte(&mut self, byte: u8) -> u8 {
        let mut response = 0u8;
        for bit in (0..8).rev() {
            let out = byte & (1 << bit) != 0;
            let sampled = match self.phase {
                Phase::CaptureOnFirstTransition => self.shift_bit_phase_a(out),
                Phase::CaptureOnSecondTransition => self.shift_bit_phase_b(out),
            };
            response = (response << 1) | sampled as u8;
        }
        self.sck.set_low();
        response
    }

    fn shift_bit_phase_a(&mut self, out: bool) -> bool {
        self.sck.set_low();
        self.mosi.set_state(out);
        self.delay.delay_ns(self.step_ns);

        self.sck.set_high();
        let sampled = self.miso.is_high();
        self.delay.delay_ns(self.step_ns);
        sampled
    }

    fn shift_bit_phase_b(&mut self, out: bool) -> bool {
        self.sck.set_low();
        self.delay.delay_ns(self.step_ns);

        self.sck.set_high();
        self.mosi.set_state(out);
        self.delay.delay_ns(self.step_ns * 2);

        self.sck.set_low();
        let sampled = self.miso.is_high();
        self.delay.delay_ns(self.step_ns);
        sampled
    }
}

impl<C, O, I, D> ShiftFifo for SoftSequencer<C, O, I, D>
where
    C: OutputPin,
    O: OutputPin,
    I: InputPin,
    D: DelayNs,
{
    fn push(&mut self, byte: u8) {
        if self.tx.push_back(byte).is_err() {
            stall();
        }
        self.run();
    }

    fn pull(&mut self) -> u8 {
        match self.rx.pop_front() {
            Some(response) => {
                self.run();
                response
            }
            None => stall(),
        }
    }
}

/// Nothing left that could make progress
fn stall() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
