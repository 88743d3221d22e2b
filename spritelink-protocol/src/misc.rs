//! MISC control byte
//!
//! ```text
//! bit  7..5   4        3          2         1..0
//!      0      reduced  sprite bg  movement  background
//! ```
//!
//! Bits 2 and 3 are named after how the bring-up sequences use them; the
//! controller's own documentation is authoritative.

use crate::opcode::ProtocolViolation;

/// Background pattern behind the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Background {
    #[default]
    Solid = 0,
    Funky = 1,
    Diagonal = 2,
    Horizontal = 3,
}

impl Background {
    pub const ALL: [Background; 4] = [
        Background::Solid,
        Background::Funky,
        Background::Diagonal,
        Background::Horizontal,
    ];

    /// Pattern selected by the low two bits of `bits`
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Background::Solid,
            1 => Background::Funky,
            2 => Background::Diagonal,
            _ => Background::Horizontal,
        }
    }
}

/// Decoded MISC byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MiscFlags(u8);

impl MiscFlags {
    const BACKGROUND_MASK: u8 = 0x03;
    const MOVEMENT: u8 = 1 << 2;
    const SPRITE_BACKGROUND: u8 = 1 << 3;
    const REDUCED_CLOCK: u8 = 1 << 4;

    /// Bits that must be written zero
    pub const RESERVED: u8 = 0xE0;

    /// Solid background, everything off
    pub const fn new() -> Self {
        Self(0)
    }

    /// Decode a raw MISC byte
    pub fn from_bits(bits: u8) -> Result<Self, ProtocolViolation> {
        if bits & Self::RESERVED != 0 {
            return Err(ProtocolViolation::ReservedMiscBits(bits));
        }
        Ok(Self(bits))
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// The flag byte as a one-byte payload
    pub fn as_bytes(&self) -> &[u8] {
        core::slice::from_ref(&self.0)
    }

    pub const fn background(self) -> Background {
        Background::from_bits(self.0)
    }

    pub const fn movement(self) -> bool {
        self.0 & Self::MOVEMENT != 0
    }

    pub const fn sprite_background(self) -> bool {
        self.0 & Self::SPRITE_BACKGROUND != 0
    }

    pub const fn reduced_clock(self) -> bool {
        self.0 & Self::REDUCED_CLOCK != 0
    }

    pub const fn with_background(self, background: Background) -> Self {
        Self((self.0 & !Self::BACKGROUND_MASK) | background as u8)
    }

    pub const fn with_movement(self, on: bool) -> Self {
        self.with_bit(Self::MOVEMENT, on)
    }

    pub const fn with_sprite_background(self, on: bool) -> Self {
        self.with_bit(Self::SPRITE_BACKGROUND, on)
    }

    pub const fn with_reduced_clock(self, on: bool) -> Self {
        self.with_bit(Self::REDUCED_CLOCK, on)
    }

    pub fn toggle_movement(&mut self) {
        self.0 ^= Self::MOVEMENT;
    }

    pub fn toggle_sprite_background(&mut self) {
        self.0 ^= Self::SPRITE_BACKGROUND;
    }

    pub fn toggle_reduced_clock(&mut self) {
        self.0 ^= Self::REDUCED_CLOCK;
    }

    /// Step to the next background pattern, wrapping after the last
    pub fn cycle_background(&mut self) {
        let next = Background::from_bits(self.0.wrapping_add(1));
        *self = self.with_background(next);
    }

    const fn with_bit(self, bit: u8, on: bool) -> Self {
        if on {
            Self(self.0 | bit)
        } else {
            Self(self.0 & !bit)
        }
    }
}

impl TryFrom<u8> for MiscFlags {
    type Error = ProtocolViolation;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_layout() {
        let flags = MiscFlags::new()
            .with_background(Background::Diagonal)
            .with_movement(true);
        assert_eq!(flags.bits(), 0b0_0110);

        let flags = flags.with_reduced_clock(true);
        assert_eq!(flags.bits(), 0b1_0110);
        assert!(flags.reduced_clock());
        assert!(!flags.sprite_background());

        let flags = MiscFlags::new()
            .with_sprite_background(true)
            .with_background(Background::Horizontal);
        assert_eq!(flags.bits(), 0b0_1011);
    }

    #[test]
    fn test_reserved_bits_rejected() {
        assert_eq!(MiscFlags::from_bits(0x1F).map(|f| f.bits()), Ok(0x1F));
        for bit in 5..8 {
            let raw = 1u8 << bit;
            assert_eq!(
                MiscFlags::from_bits(raw),
                Err(ProtocolViolation::ReservedMiscBits(raw))
            );
        }
    }

    #[test]
    fn test_toggles_and_cycle() {
        let mut flags = MiscFlags::from_bits(0b0_0111).unwrap_or_default();
        flags.cycle_background();
        assert_eq!(flags.background(), Background::Solid);
        assert!(flags.movement());

        flags.toggle_movement();
        flags.toggle_sprite_background();
        flags.toggle_reduced_clock();
        assert_eq!(flags.bits(), 0b1_1000);

        flags.cycle_background();
        assert_eq!(flags.background(), Background::Funky);
        assert_eq!(flags.bits(), 0b1_1001);
    }
}
