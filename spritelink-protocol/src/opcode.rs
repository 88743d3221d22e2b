//! Opcode table and payload validation

use crate::color::ColorValue;
use crate::misc::MiscFlags;
use crate::sprite::PACKED_SPRITE_LEN;

/// Command opcodes understood by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Replace the sprite bitmap (18 bytes)
    SpriteData = 0,
    /// Palette slot 1
    Color1 = 1,
    /// Palette slot 2
    Color2 = 2,
    /// Palette slot 3
    Color3 = 3,
    /// Palette slot 4
    Color4 = 4,
    /// Sprite horizontal position in coarse pixels
    SpriteX = 5,
    /// Sprite vertical position in coarse pixels
    SpriteY = 6,
    /// Background, movement and clock control bits
    Misc = 7,
}

/// A command that must not be put on the bus
///
/// Always raised before the select line is touched, so the caller can
/// correct the command and send it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolViolation {
    /// Opcode byte outside 0..=7
    UnknownOpcode(u8),
    /// Payload length does not match the opcode
    PayloadLength {
        opcode: Opcode,
        expected: usize,
        actual: usize,
    },
    /// MISC byte with a reserved bit set
    ReservedMiscBits(u8),
    /// Colour byte above 0x3F
    ColorOutOfRange(u8),
}

impl Opcode {
    /// All opcodes in wire order
    pub const ALL: [Opcode; 8] = [
        Opcode::SpriteData,
        Opcode::Color1,
        Opcode::Color2,
        Opcode::Color3,
        Opcode::Color4,
        Opcode::SpriteX,
        Opcode::SpriteY,
        Opcode::Misc,
    ];

    /// Wire value
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Exact payload length this opcode carries
    pub const fn payload_len(self) -> usize {
        match self {
            Opcode::SpriteData => PACKED_SPRITE_LEN,
            _ => 1,
        }
    }

    /// Check a payload against this opcode's contract
    pub fn validate(self, payload: &[u8]) -> Result<(), ProtocolViolation> {
        let expected = self.payload_len();
        if payload.len() != expected {
            return Err(ProtocolViolation::PayloadLength {
                opcode: self,
                expected,
                actual: payload.len(),
            });
        }

        match self {
            Opcode::Color1 | Opcode::Color2 | Opcode::Color3 | Opcode::Color4 => {
                ColorValue::from_bits(payload[0]).map(|_| ())
            }
            Opcode::Misc => MiscFlags::from_bits(payload[0]).map(|_| ()),
            Opcode::SpriteData | Opcode::SpriteX | Opcode::SpriteY => Ok(()),
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = ProtocolViolation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Opcode::ALL
            .get(value as usize)
            .copied()
            .ok_or(ProtocolViolation::UnknownOpcode(value))
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        opcode.as_u8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_wire_values() {
        for (i, opcode) in Opcode::ALL.iter().enumerate() {
            assert_eq!(opcode.as_u8() as usize, i);
            assert_eq!(Opcode::try_from(i as u8), Ok(*opcode));
        }
        assert_eq!(Opcode::try_from(8), Err(ProtocolViolation::UnknownOpcode(8)));
        assert_eq!(
            Opcode::try_from(0xFF),
            Err(ProtocolViolation::UnknownOpcode(0xFF))
        );
    }

    #[test]
    fn test_payload_lengths() {
        assert_eq!(Opcode::SpriteData.payload_len(), 18);
        for opcode in &Opcode::ALL[1..] {
            assert_eq!(opcode.payload_len(), 1);
        }
    }

    #[test]
    fn test_sprite_data_length_checked() {
        assert_eq!(Opcode::SpriteData.validate(&[0; 18]), Ok(()));
        assert_eq!(
            Opcode::SpriteData.validate(&[0; 17]),
            Err(ProtocolViolation::PayloadLength {
                opcode: Opcode::SpriteData,
                expected: 18,
                actual: 17,
            })
        );
        assert!(Opcode::SpriteData.validate(&[]).is_err());
        assert!(Opcode::SpriteData.validate(&[0; 19]).is_err());
    }

    #[test]
    fn test_single_byte_opcodes() {
        assert!(Opcode::SpriteX.validate(&[]).is_err());
        assert!(Opcode::SpriteY.validate(&[1, 2]).is_err());
        assert_eq!(Opcode::SpriteX.validate(&[0xFF]), Ok(()));
        assert_eq!(Opcode::SpriteY.validate(&[0x00]), Ok(()));
    }

    #[test]
    fn test_value_checks() {
        assert_eq!(Opcode::Color3.validate(&[0x3F]), Ok(()));
        assert_eq!(
            Opcode::Color3.validate(&[0x40]),
            Err(ProtocolViolation::ColorOutOfRange(0x40))
        );
        assert_eq!(Opcode::Misc.validate(&[0x1F]), Ok(()));
        assert_eq!(
            Opcode::Misc.validate(&[0x20]),
            Err(ProtocolViolation::ReservedMiscBits(0x20))
        );
    }
}
