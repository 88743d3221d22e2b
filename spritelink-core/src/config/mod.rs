//! Link configuration
//!
//! Typed configuration and validation against what a given system clock
//! can generate. Reading it from a file is left to the firmware.

pub mod types;

pub use types::*;

use spritelink_protocol::geometry::SVGA_800X600;

/// Largest clock divider the sequencer and PWM slices accept
pub const MAX_CLOCK_DIVIDER: u32 = 65_536;

/// Configuration rejected by [`LinkConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Bus parameters the sequencer cannot run
    Bus(spritelink_hal::ConfigError),
    /// Oversampled bit rate outside what the system clock can divide to
    BitRateOutOfRange { sequencer_hz: u32, system_hz: u32 },
    /// Project clock that cannot be generated
    ClockOutOfRange(u32),
    /// Offset that would push updates into the visible picture
    LineOffsetOutOfRange(u32),
    /// Spiral orbit with no rings
    NoOrbitRounds,
}

impl From<spritelink_hal::ConfigError> for ConfigError {
    fn from(err: spritelink_hal::ConfigError) -> Self {
        ConfigError::Bus(err)
    }
}

impl LinkConfig {
    /// Check every section against a system clock of `system_hz`
    pub fn validate(&self, system_hz: u32) -> Result<(), ConfigError> {
        let spi = self.bus.spi_config();
        spi.validate()?;

        let sequencer_hz = spi.sequencer_hz()?;
        if sequencer_hz > system_hz || system_hz / sequencer_hz >= MAX_CLOCK_DIVIDER {
            return Err(ConfigError::BitRateOutOfRange {
                sequencer_hz,
                system_hz,
            });
        }

        for hz in [self.project.clock_hz, self.project.reduced_clock_hz] {
            // PWM needs at least two system cycles per period
            if hz == 0 || hz > system_hz / 2 || system_hz / hz > MAX_CLOCK_DIVIDER {
                return Err(ConfigError::ClockOutOfRange(hz));
            }
        }

        if self.sync.line_offset >= SVGA_800X600.lines_before_active() {
            return Err(ConfigError::LineOffsetOutOfRange(self.sync.line_offset));
        }

        if self.demo.orbit_rounds == 0 {
            return Err(ConfigError::NoOrbitRounds);
        }

        Ok(())
    }
}
