//! 6-bit colour values
//!
//! The controller drives a 2-bit DAC per channel. A colour byte packs the
//! three channel fields as `00RRGGBB`.
//!
//! Expanding a field to an 8-bit channel: shift the field to the top of the
//! byte, then fill the low six bits when bit 6 is set. Each field value
//! therefore lands on one of two output levels per top bit:
//!
//! | field | channel |
//! |-------|---------|
//! | `00`  | `0x00`  |
//! | `01`  | `0x7F`  |
//! | `10`  | `0x80`  |
//! | `11`  | `0xFF`  |

use crate::opcode::ProtocolViolation;

/// 6-bit RGB colour (`00RRGGBB`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorValue(u8);

impl ColorValue {
    pub const BLACK: Self = Self(0x00);
    pub const DARK_GRAY: Self = Self(0x15);
    pub const GRAY: Self = Self(0x2A);
    pub const WHITE: Self = Self(0x3F);

    pub const BOLD_RED: Self = Self(0x30);
    pub const RED: Self = Self(0x20);
    pub const LIGHT_RED: Self = Self(0x10);

    pub const BOLD_GREEN: Self = Self(0x0C);
    pub const GREEN: Self = Self(0x08);
    pub const LIGHT_GREEN: Self = Self(0x04);

    pub const BOLD_BLUE: Self = Self(0x03);
    pub const BLUE: Self = Self(0x02);
    pub const LIGHT_BLUE: Self = Self(0x01);

    pub const PINK: Self = Self(0x31);
    pub const DARK_PINK: Self = Self(0x21);

    /// Mask of the significant bits
    pub const MASK: u8 = 0x3F;

    /// Build from 2-bit channel fields; higher bits of each field are ignored
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(((red & 0x03) << 4) | ((green & 0x03) << 2) | (blue & 0x03))
    }

    /// Wrap a raw colour byte, rejecting bits above bit 5
    pub fn from_bits(bits: u8) -> Result<Self, ProtocolViolation> {
        if bits & !Self::MASK != 0 {
            return Err(ProtocolViolation::ColorOutOfRange(bits));
        }
        Ok(Self(bits))
    }

    /// Raw colour byte
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The colour byte as a one-byte payload
    pub fn as_bytes(&self) -> &[u8] {
        core::slice::from_ref(&self.0)
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 4) & 0x03
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 2) & 0x03
    }

    pub const fn blue(self) -> u8 {
        self.0 & 0x03
    }

    /// Expand one 2-bit field to an 8-bit channel level
    pub const fn expand_field(field: u8) -> u8 {
        let level = (field & 0x03) << 6;
        if level & 0x40 != 0 {
            level | 0x3F
        } else {
            level
        }
    }

    /// Channel levels as the display shows them
    pub const fn to_rgb888(self) -> [u8; 3] {
        [
            Self::expand_field(self.red()),
            Self::expand_field(self.green()),
            Self::expand_field(self.blue()),
        ]
    }
}

impl TryFrom<u8> for ColorValue {
    type Error = ProtocolViolation;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

/// Palette loaded at start-up
pub const DEFAULT_PALETTE: [ColorValue; 4] = [
    ColorValue::PINK,
    ColorValue::DARK_GRAY,
    ColorValue::BOLD_GREEN,
    ColorValue(0x2C),
];

/// Palette sweep: grays, then each primary from bold to light with white
pub const COLOR_GROUPS: [[ColorValue; 4]; 4] = [
    [
        ColorValue::BLACK,
        ColorValue::DARK_GRAY,
        ColorValue::GRAY,
        ColorValue::WHITE,
    ],
    [
        ColorValue::BOLD_RED,
        ColorValue::RED,
        ColorValue::LIGHT_RED,
        ColorValue::WHITE,
    ],
    [
        ColorValue::BOLD_GREEN,
        ColorValue::GREEN,
        ColorValue::LIGHT_GREEN,
        ColorValue::WHITE,
    ],
    [
        ColorValue::BOLD_BLUE,
        ColorValue::BLUE,
        ColorValue::LIGHT_BLUE,
        ColorValue::WHITE,
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_expansion_table() {
        assert_eq!(ColorValue::expand_field(0b00), 0x00);
        assert_eq!(ColorValue::expand_field(0b01), 0x7F);
        assert_eq!(ColorValue::expand_field(0b10), 0x80);
        assert_eq!(ColorValue::expand_field(0b11), 0xFF);
    }

    #[test]
    fn test_every_channel_uses_the_same_table() {
        let table = [0x00, 0x7F, 0x80, 0xFF];
        for field in 0..4u8 {
            let level = table[field as usize];
            assert_eq!(ColorValue::new(field, 0, 0).to_rgb888(), [level, 0, 0]);
            assert_eq!(ColorValue::new(0, field, 0).to_rgb888(), [0, level, 0]);
            assert_eq!(ColorValue::new(0, 0, field).to_rgb888(), [0, 0, level]);
        }
    }

    #[test]
    fn test_field_positions() {
        let color = ColorValue::PINK; // 11 00 01
        assert_eq!((color.red(), color.green(), color.blue()), (3, 0, 1));
        assert_eq!(ColorValue::new(3, 0, 1), color);
        assert_eq!(color.to_rgb888(), [0xFF, 0x00, 0x7F]);
        assert_eq!(ColorValue::WHITE.to_rgb888(), [0xFF; 3]);
        assert_eq!(ColorValue::BLACK.to_rgb888(), [0x00; 3]);
    }

    #[test]
    fn test_from_bits_range() {
        assert_eq!(ColorValue::from_bits(0x3F), Ok(ColorValue::WHITE));
        assert_eq!(
            ColorValue::from_bits(0x40),
            Err(ProtocolViolation::ColorOutOfRange(0x40))
        );
        assert_eq!(ColorValue::new(0xFF, 0xFF, 0xFF), ColorValue::WHITE);
    }
}
