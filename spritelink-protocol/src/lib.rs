//! Sprite display controller command protocol
//!
//! This crate defines the command set of the remote sprite display
//! controller and the data it carries: packed sprite bitmaps, 6-bit colours
//! and the MISC control byte. It does not touch any hardware.
//!
//! # Wire format
//!
//! Every command is one opcode byte followed by a payload whose length is
//! fixed by the opcode, sent MSB first while the select line is held low:
//! ```text
//! ┌────────┬──────────────────────────────┐
//! │ OPCODE │ PAYLOAD                      │
//! │ 1B     │ 1B (colour/position/misc)    │
//! │        │ 18B (sprite bitmap)          │
//! └────────┴──────────────────────────────┘
//! ```
//!
//! The controller never answers. Bytes clocked back during a command carry
//! no meaning.

#![no_std]
#![deny(unsafe_code)]

pub mod color;
pub mod command;
pub mod geometry;
pub mod misc;
pub mod opcode;
pub mod sprite;
pub mod sprites;

pub use color::ColorValue;
pub use command::{Command, PaletteSlot, MAX_PAYLOAD_LEN};
pub use misc::{Background, MiscFlags};
pub use opcode::{Opcode, ProtocolViolation};
pub use sprite::{PackedSprite, SpriteBitmap, PACKED_SPRITE_LEN, SPRITE_HEIGHT, SPRITE_WIDTH};
