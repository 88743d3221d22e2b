//! Configuration type definitions
//!
//! Defaults reproduce the bench setup: Phase-B bus at 2 MHz, four-line
//! sync offset, 40 MHz project clock with a 10 MHz reduced mode.

use spritelink_hal::{Phase, Polarity, SpiConfig};

use crate::sync::SYNC_LINE_OFFSET;

/// Serial bus parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Bit rate in Hz
    pub frequency_hz: u32,
    pub polarity: Polarity,
    pub phase: Phase,
}

impl Default for BusConfig {
    fn default() -> Self {
        let spi = SpiConfig::default();
        Self {
            frequency_hz: spi.frequency,
            polarity: spi.polarity,
            phase: spi.phase,
        }
    }
}

impl BusConfig {
    pub fn spi_config(&self) -> SpiConfig {
        SpiConfig {
            frequency: self.frequency_hz,
            polarity: self.polarity,
            phase: self.phase,
        }
    }
}

/// Update window timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncConfig {
    /// Line edges to wait after the frame edge
    pub line_offset: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            line_offset: SYNC_LINE_OFFSET,
        }
    }
}

/// Clock fed to the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProjectConfig {
    /// Normal pixel clock in Hz
    pub clock_hz: u32,
    /// Clock used once reduced-clock mode is selected
    pub reduced_clock_hz: u32,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            clock_hz: 40_000_000,
            reduced_clock_hz: 10_000_000,
        }
    }
}

/// Demo sequence tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DemoConfig {
    /// Pause between stages in milliseconds
    pub dwell_ms: u32,
    /// Rings of the spiral orbit
    pub orbit_rounds: u8,
    /// Coarse pixels kept clear around the orbit
    pub orbit_margin: u8,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 2000,
            orbit_rounds: 8,
            orbit_margin: 12,
        }
    }
}

/// Complete link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    pub bus: BusConfig,
    pub sync: SyncConfig,
    pub project: ProjectConfig,
    pub demo: DemoConfig,
}
