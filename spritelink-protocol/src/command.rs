//! Typed commands
//!
//! [`Command`] is the closed set of things the controller accepts, each
//! variant carrying its payload in already-valid form. Raw opcode/payload
//! pairs are checked by [`Command::parse`].

use crate::color::ColorValue;
use crate::misc::MiscFlags;
use crate::opcode::{Opcode, ProtocolViolation};
use crate::sprite::{PackedSprite, PACKED_SPRITE_LEN};

/// Longest payload of any opcode
pub const MAX_PAYLOAD_LEN: usize = PACKED_SPRITE_LEN;

/// One of the four palette registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaletteSlot {
    Color1,
    Color2,
    Color3,
    Color4,
}

impl PaletteSlot {
    pub const ALL: [PaletteSlot; 4] = [
        PaletteSlot::Color1,
        PaletteSlot::Color2,
        PaletteSlot::Color3,
        PaletteSlot::Color4,
    ];

    /// Opcode that writes this slot
    pub const fn opcode(self) -> Opcode {
        match self {
            PaletteSlot::Color1 => Opcode::Color1,
            PaletteSlot::Color2 => Opcode::Color2,
            PaletteSlot::Color3 => Opcode::Color3,
            PaletteSlot::Color4 => Opcode::Color4,
        }
    }

    /// Zero-based slot index
    pub const fn index(self) -> usize {
        self.opcode() as usize - 1
    }
}

/// A command for the display controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Replace the sprite bitmap
    SpriteData(PackedSprite),
    /// Set a palette slot
    Color(PaletteSlot, ColorValue),
    /// Sprite column in coarse pixels
    SpriteX(u8),
    /// Sprite row in coarse pixels
    SpriteY(u8),
    /// Background, movement and clock control
    Misc(MiscFlags),
}

impl Command {
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::SpriteData(_) => Opcode::SpriteData,
            Command::Color(slot, _) => slot.opcode(),
            Command::SpriteX(_) => Opcode::SpriteX,
            Command::SpriteY(_) => Opcode::SpriteY,
            Command::Misc(_) => Opcode::Misc,
        }
    }

    /// Payload bytes as they go on the wire
    pub fn payload(&self) -> &[u8] {
        match self {
            Command::SpriteData(sprite) => sprite.as_bytes(),
            Command::Color(_, color) => color.as_bytes(),
            Command::SpriteX(x) | Command::SpriteY(x) => core::slice::from_ref(x),
            Command::Misc(flags) => flags.as_bytes(),
        }
    }

    /// Decode a raw opcode byte and payload
    pub fn parse(opcode: u8, payload: &[u8]) -> Result<Self, ProtocolViolation> {
        let opcode = Opcode::try_from(opcode)?;
        opcode.validate(payload)?;

        let command = match opcode {
            Opcode::SpriteData => {
                let mut bytes = [0u8; PACKED_SPRITE_LEN];
                bytes.copy_from_slice(payload);
                Command::SpriteData(PackedSprite::from_bytes(bytes))
            }
            Opcode::Color1 | Opcode::Color2 | Opcode::Color3 | Opcode::Color4 => {
                let slot = PaletteSlot::ALL[opcode.as_u8() as usize - 1];
                Command::Color(slot, ColorValue::from_bits(payload[0])?)
            }
            Opcode::SpriteX => Command::SpriteX(payload[0]),
            Opcode::SpriteY => Command::SpriteY(payload[0]),
            Opcode::Misc => Command::Misc(MiscFlags::from_bits(payload[0])?),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::misc::Background;
    use crate::sprites;
    use proptest::prelude::*;

    #[test]
    fn test_command_opcodes() {
        assert_eq!(
            Command::SpriteData(sprites::HEART.encode()).opcode(),
            Opcode::SpriteData
        );
        for (i, slot) in PaletteSlot::ALL.iter().enumerate() {
            let command = Command::Color(*slot, ColorValue::RED);
            assert_eq!(command.opcode().as_u8() as usize, i + 1);
            assert_eq!(slot.index(), i);
        }
        assert_eq!(Command::SpriteX(3).opcode(), Opcode::SpriteX);
        assert_eq!(Command::SpriteY(3).opcode(), Opcode::SpriteY);
        assert_eq!(Command::Misc(MiscFlags::new()).opcode(), Opcode::Misc);
    }

    #[test]
    fn test_payload_shapes() {
        let sprite = sprites::DRINK.encode();
        assert_eq!(Command::SpriteData(sprite).payload(), sprite.as_bytes());
        assert_eq!(
            Command::Color(PaletteSlot::Color2, ColorValue::PINK).payload(),
            &[0x31]
        );
        assert_eq!(Command::SpriteX(0).payload(), &[0]);
        assert_eq!(Command::SpriteY(74).payload(), &[74]);

        let misc = MiscFlags::new().with_background(Background::Funky);
        assert_eq!(Command::Misc(misc).payload(), &[0x01]);

        for command in [
            Command::SpriteData(sprite),
            Command::Color(PaletteSlot::Color4, ColorValue::WHITE),
            Command::SpriteX(88),
            Command::Misc(misc),
        ] {
            assert_eq!(command.payload().len(), command.opcode().payload_len());
        }
    }

    #[test]
    fn test_parse_rejects_before_decoding() {
        assert_eq!(
            Command::parse(9, &[0]),
            Err(ProtocolViolation::UnknownOpcode(9))
        );
        assert!(matches!(
            Command::parse(0, &[0xFF; 4]),
            Err(ProtocolViolation::PayloadLength { expected: 18, actual: 4, .. })
        ));
        assert_eq!(
            Command::parse(7, &[0x80]),
            Err(ProtocolViolation::ReservedMiscBits(0x80))
        );
    }

    #[test]
    fn test_parse_fixed_sprite() {
        let raw = [
            0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0xFF, 0x00,
            0xFF, 0x00, 0xFF, 0x00,
        ];
        let command = Command::parse(0, &raw).unwrap();
        assert_eq!(command, Command::SpriteData(PackedSprite::from_bytes(raw)));
        assert_eq!(command.payload(), &raw);
    }

    proptest! {
        #[test]
        fn prop_parse_matches_validation(
            opcode in 0u8..10,
            payload in proptest::collection::vec(any::<u8>(), 0..20),
        ) {
            let parsed = Command::parse(opcode, &payload);
            let checked = Opcode::try_from(opcode).and_then(|op| op.validate(&payload));
            prop_assert_eq!(parsed.is_ok(), checked.is_ok());

            if let Ok(command) = parsed {
                prop_assert_eq!(command.opcode().as_u8(), opcode);
                let bytes = command.payload();
                prop_assert_eq!(bytes, payload.as_slice());
            }
        }
    }
}
