//! PWM clock for the display controller
//!
//! A PWM slice counting at the system clock gives a wave at
//! `sys_hz / (top + 1)`. Only integer periods are available, so the
//! produced frequency is the nearest one at or above the request.
//!
//! The output is high for `period / 2` counts, so the duty cycle is 50%
//! only for even periods. Odd periods lose half a count on the high side:
//! 40 MHz from 125 MHz is a period of 3 and a 1/3 duty cycle.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use spritelink_hal::ClockOutput;

/// Clock error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Frequency the slice cannot produce from the system clock
    OutOfRange(u32),
}

/// Counter period, in system clocks, for a target frequency
///
/// At least two cycles so both halves of the wave exist, at most what
/// the 16-bit counter holds.
pub fn period_for(sys_hz: u32, hz: u32) -> Result<u32, ClockError> {
    if hz == 0 {
        return Err(ClockError::OutOfRange(hz));
    }
    let period = sys_hz / hz;
    if !(2..=u16::MAX as u32 + 1).contains(&period) {
        return Err(ClockError::OutOfRange(hz));
    }
    Ok(period)
}

/// Compare value for a period: high for the first `period / 2` counts
pub fn compare_for(period: u32) -> u16 {
    (period / 2) as u16
}

/// Clock on one PWM channel
pub struct ProjectClock<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    sys_hz: u32,
    frequency_hz: u32,
}

impl<'d> ProjectClock<'d> {
    /// Take over a PWM channel and hold its output low
    pub fn new(mut pwm: Pwm<'d>) -> Self {
        let mut config = PwmConfig::default();
        config.enable = false;
        config.compare_a = 0;
        pwm.set_config(&config);

        Self {
            pwm,
            config,
            sys_hz: clk_sys_freq(),
            frequency_hz: 0,
        }
    }

    /// Frequency actually produced, 0 when stopped
    pub fn frequency(&self) -> u32 {
        self.frequency_hz
    }
}

impl ClockOutput for ProjectClock<'_> {
    type Error = ClockError;

    fn set_frequency(&mut self, hz: u32) -> Result<(), Self::Error> {
        let period = period_for(self.sys_hz, hz)?;

        self.config.top = (period - 1) as u16;
        self.config.compare_a = compare_for(period);
        self.config.enable = true;
        self.pwm.set_config(&self.config);

        self.frequency_hz = self.sys_hz / period;
        Ok(())
    }

    fn stop(&mut self) {
        self.config.enable = false;
        self.config.compare_a = 0;
        self.pwm.set_config(&self.config);
        self.frequency_hz = 0;
    }
}
