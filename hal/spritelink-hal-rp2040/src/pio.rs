//! PIO sequencer programs and clock divider math
//!
//! # Programs
//!
//! Both programs side-set SCK and use autopull/autopush at 8 bits,
//! shifting left so bytes go out most significant bit first. A byte is
//! pushed into the transmit FIFO left-aligned (`byte << 24`) and comes back
//! in the low 8 bits of the receive FIFO word.
//!
//! Phase-A (CPHA=0), two instructions per bit:
//!
//! ```text
//! out pins, 1   side 0   ; drive MOSI, clock low
//! in  pins, 1   side 1   ; sample MISO on the rising edge
//! ```
//!
//! Phase-B (CPHA=1), four cycles per bit:
//!
//! ```text
//! out x, 1      side 0   ; stall here when empty, clock low
//! mov pins, x   side 1 [1]
//! in  pins, 1   side 0   ; sample MISO on the falling edge
//! ```
//!
//! The state machine stalls on an empty transmit FIFO with the clock low,
//! and on a full receive FIFO mid-byte. The bus layer never lets the
//! receive FIFO fill, so the second stall does not happen in practice.

use spritelink_hal::{ConfigError, SpiConfig};

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// Largest integer part of the 16.8 divider
const MAX_INT_DIVIDER: u64 = 0xFFFF;

/// Calculate the clock divider for a sequencer rate
///
/// The state machine executes one instruction per divided clock, so the
/// divider is `sys_hz / sequencer_hz`. Returns (integer_part,
/// fractional_part) of the 16.8 fixed-point divider.
pub fn calc_clock_divider(sys_hz: u32, sequencer_hz: u32) -> Result<(u16, u8), ConfigError> {
    if sequencer_hz == 0 || sequencer_hz > sys_hz {
        return Err(ConfigError::InvalidFrequency);
    }

    // To get 8-bit fractional precision, multiply by 256 first
    let divider_x256 = (sys_hz as u64 * 256) / sequencer_hz as u64;

    let int_part = divider_x256 / 256;
    if int_part > MAX_INT_DIVIDER {
        return Err(ConfigError::InvalidFrequency);
    }
    let frac_part = divider_x256 % 256;

    Ok((int_part as u16, frac_part as u8))
}

/// Divider for a bus configuration, as the raw U24F8 bit pattern
pub fn divider_bits(sys_hz: u32, config: &SpiConfig) -> Result<u32, ConfigError> {
    config.validate()?;
    let (int_div, frac_div) = calc_clock_divider(sys_hz, config.sequencer_hz()?)?;
    Ok(((int_div as u32) << 8) | frac_div as u32)
}

/// Bit rate actually produced by a divider
pub fn effective_bit_rate(sys_hz: u32, config: &SpiConfig) -> Result<u32, ConfigError> {
    let bits = divider_bits(sys_hz, config)?;
    let oversample = config.phase.oversample() as u64;
    Ok(((sys_hz as u64 * 256) / (bits as u64 * oversample)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spritelink_hal::{Mode, Phase};

    #[test]
    fn test_calc_clock_divider() {
        // 2 MHz Phase-B runs the sequencer at 8 MHz: 125 / 8 = 15.625
        assert_eq!(calc_clock_divider(SYS_CLK_HZ, 8_000_000), Ok((15, 160)));
        assert_eq!(calc_clock_divider(SYS_CLK_HZ, SYS_CLK_HZ), Ok((1, 0)));
        assert_eq!(
            calc_clock_divider(SYS_CLK_HZ, 0),
            Err(ConfigError::InvalidFrequency)
        );
        assert_eq!(
            calc_clock_divider(SYS_CLK_HZ, SYS_CLK_HZ + 1),
            Err(ConfigError::InvalidFrequency)
        );
        // 125 MHz / 1 kHz needs an integer part above 16 bits
        assert_eq!(
            calc_clock_divider(SYS_CLK_HZ, 1_000),
            Err(ConfigError::InvalidFrequency)
        );
    }

    #[test]
    fn test_divider_bits_follow_phase() {
        let phase_b = SpiConfig::new(2_000_000, Mode::Mode1);
        assert_eq!(divider_bits(SYS_CLK_HZ, &phase_b), Ok((15 << 8) | 160));

        let phase_a = SpiConfig::new(2_000_000, Mode::Mode0);
        assert_eq!(phase_a.phase, Phase::CaptureOnFirstTransition);
        // 125 / 4 = 31.25
        assert_eq!(divider_bits(SYS_CLK_HZ, &phase_a), Ok((31 << 8) | 64));

        let idle_high = SpiConfig::new(2_000_000, Mode::Mode3);
        assert_eq!(
            divider_bits(SYS_CLK_HZ, &idle_high),
            Err(ConfigError::UnsupportedPolarity)
        );
    }

    #[test]
    fn test_effective_bit_rate() {
        let config = SpiConfig::new(2_000_000, Mode::Mode1);
        assert_eq!(effective_bit_rate(SYS_CLK_HZ, &config), Ok(2_000_000));

        // 3 MHz Phase-B: 125 / 12 = 10.4166 truncates to 10 + 106/256
        let config = SpiConfig::new(3_000_000, Mode::Mode1);
        let rate = effective_bit_rate(SYS_CLK_HZ, &config).unwrap();
        assert!(rate >= 3_000_000 && rate < 3_001_000);
    }
}
