//! SPI bus abstractions
//!
//! Provides the full-duplex bus trait used by the command link, plus the
//! bus parameters every sequencer implementation is constructed from.

/// SPI bus master
///
/// Every byte written clocks one response byte back. Implementations that
/// queue bytes must keep at most one response unread between calls.
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Transfer data (simultaneous read/write)
    ///
    /// Writes data from `write` buffer while reading into `read` buffer.
    /// Both buffers must be the same length.
    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error>;

    /// Write data, discarding the response bytes
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Read data (writes zeros)
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Transfer data in place
    ///
    /// Writes data from buffer while reading into the same buffer.
    fn transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Self::Error>;
}

/// Bus configuration error
///
/// Raised at construction and never recoverable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Clock idling high is not supported by the sequencer programs
    UnsupportedPolarity,
    /// Bit rate is zero or the oversampled sequencer rate overflows
    InvalidFrequency,
}

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Bit rate in Hz
    pub frequency: u32,
    /// Clock polarity
    pub polarity: Polarity,
    /// Clock phase
    pub phase: Phase,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 2_000_000, // 2 MHz
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnSecondTransition,
        }
    }
}

impl SpiConfig {
    /// Build a configuration from a bit rate and mode
    pub fn new(frequency: u32, mode: Mode) -> Self {
        let (polarity, phase) = mode.into();
        Self {
            frequency,
            polarity,
            phase,
        }
    }

    /// Check the configuration against what the sequencers can run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polarity != Polarity::IdleLow {
            return Err(ConfigError::UnsupportedPolarity);
        }
        self.sequencer_hz().map(|_| ())
    }

    /// Rate the instruction sequencer must run at for this bit rate
    pub fn sequencer_hz(&self) -> Result<u32, ConfigError> {
        if self.frequency == 0 {
            return Err(ConfigError::InvalidFrequency);
        }
        self.frequency
            .checked_mul(self.phase.oversample())
            .ok_or(ConfigError::InvalidFrequency)
    }
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

impl Phase {
    /// Sequencer sub-steps per bit
    ///
    /// CPHA=0 drives then samples. CPHA=1 needs an extra step to refill the
    /// output shift register while the clock is low.
    pub const fn oversample(self) -> u32 {
        match self {
            Phase::CaptureOnFirstTransition => 2,
            Phase::CaptureOnSecondTransition => 4,
        }
    }
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}
