//! Command link
//!
//! Frames opcode + payload into one select-bracketed bus transaction:
//!
//! ```text
//! SEL  ‾‾‾\____________________________/‾‾‾
//! DATA     [opcode][payload ...........]
//! ```
//!
//! Every payload is checked against the opcode table before the select
//! line moves, so a rejected command leaves the bus untouched. Response
//! bytes are discarded.

use spritelink_hal::{OutputPin, SelectLine, SpiBus};
use spritelink_protocol::{
    ColorValue, Command, MiscFlags, Opcode, PaletteSlot, ProtocolViolation, SpriteBitmap,
};

/// Command link error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Command rejected before any bus activity
    Protocol(ProtocolViolation),
    /// Bus failed mid-command; the select line has been released
    Bus(E),
}

impl<E> From<ProtocolViolation> for LinkError<E> {
    fn from(violation: ProtocolViolation) -> Self {
        LinkError::Protocol(violation)
    }
}

/// Command transport to the display controller
///
/// Owns the bus and the select line for its whole lifetime.
pub struct CommandLink<B, P> {
    bus: B,
    select: SelectLine<P>,
    sent: u32,
}

impl<B, P> CommandLink<B, P>
where
    B: SpiBus,
    P: OutputPin,
{
    /// Take the bus and select pin; the select line is deasserted
    pub fn new(bus: B, select: P) -> Self {
        Self {
            bus,
            select: SelectLine::new(select),
            sent: 0,
        }
    }

    /// Send one command
    pub fn send(&mut self, opcode: Opcode, payload: &[u8]) -> Result<(), LinkError<B::Error>> {
        opcode.validate(payload)?;

        self.select.assert();
        let result = self
            .bus
            .write(&[opcode.as_u8()])
            .and_then(|()| self.bus.write(payload));
        self.select.deassert();

        result.map_err(LinkError::Bus)?;
        self.sent = self.sent.wrapping_add(1);
        Ok(())
    }

    pub fn send_command(&mut self, command: &Command) -> Result<(), LinkError<B::Error>> {
        self.send(command.opcode(), command.payload())
    }

    /// Replace the sprite bitmap
    pub fn load_sprite(&mut self, sprite: &SpriteBitmap) -> Result<(), LinkError<B::Error>> {
        self.send(Opcode::SpriteData, sprite.encode().as_bytes())
    }

    pub fn set_color(
        &mut self,
        slot: PaletteSlot,
        color: ColorValue,
    ) -> Result<(), LinkError<B::Error>> {
        self.send(slot.opcode(), &[color.bits()])
    }

    /// Load all four palette slots in order
    pub fn set_palette(&mut self, palette: &[ColorValue; 4]) -> Result<(), LinkError<B::Error>> {
        for (slot, color) in PaletteSlot::ALL.iter().zip(palette) {
            self.set_color(*slot, *color)?;
        }
        Ok(())
    }

    pub fn set_x(&mut self, x: u8) -> Result<(), LinkError<B::Error>> {
        self.send(Opcode::SpriteX, &[x])
    }

    pub fn set_y(&mut self, y: u8) -> Result<(), LinkError<B::Error>> {
        self.send(Opcode::SpriteY, &[y])
    }

    /// Position the sprite, X first
    pub fn move_sprite(&mut self, x: u8, y: u8) -> Result<(), LinkError<B::Error>> {
        self.set_x(x)?;
        self.set_y(y)
    }

    pub fn set_misc(&mut self, flags: MiscFlags) -> Result<(), LinkError<B::Error>> {
        self.send(Opcode::Misc, &[flags.bits()])
    }

    /// Commands completed since construction (wrapping)
    pub fn commands_sent(&self) -> u32 {
        self.sent
    }

    /// Give back the bus and the select pin
    pub fn release(self) -> (B, P) {
        (self.bus, self.select.release())
    }
}
