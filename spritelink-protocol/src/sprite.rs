//! Sprite bitmaps and their packed wire form
//!
//! A sprite is a 12×12 matrix of foreground/background pixels. On the wire
//! it is flattened row-major (row 0 left to right, then row 1, ...) into a
//! 144-bit stream and packed MSB first into 18 bytes:
//! ```text
//! bit i of the stream -> byte i / 8, bit 7 - (i % 8)
//! ```

/// Sprite width in pixels
pub const SPRITE_WIDTH: usize = 12;

/// Sprite height in pixels
pub const SPRITE_HEIGHT: usize = 12;

/// Length of a packed sprite in bytes
pub const PACKED_SPRITE_LEN: usize = SPRITE_WIDTH * SPRITE_HEIGHT / 8;

/// 12×12 binary sprite bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpriteBitmap {
    pixels: [[bool; SPRITE_WIDTH]; SPRITE_HEIGHT],
}

impl SpriteBitmap {
    /// Bitmap with every pixel set to `value`
    pub const fn filled(value: bool) -> Self {
        Self {
            pixels: [[value; SPRITE_WIDTH]; SPRITE_HEIGHT],
        }
    }

    /// Build from rows of 0/1 values, any non-zero value is foreground
    pub const fn from_rows(rows: [[u8; SPRITE_WIDTH]; SPRITE_HEIGHT]) -> Self {
        let mut pixels = [[false; SPRITE_WIDTH]; SPRITE_HEIGHT];
        let mut y = 0;
        while y < SPRITE_HEIGHT {
            let mut x = 0;
            while x < SPRITE_WIDTH {
                pixels[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self { pixels }
    }

    /// Pixel at column `x`, row `y`
    ///
    /// Out-of-range coordinates read as background.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Set the pixel at column `x`, row `y`; out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if let Some(pixel) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *pixel = value;
        }
    }

    /// Rows, top to bottom
    pub fn rows(&self) -> &[[bool; SPRITE_WIDTH]; SPRITE_HEIGHT] {
        &self.pixels
    }

    /// Number of foreground pixels
    pub fn count_set(&self) -> usize {
        self.pixels.iter().flatten().filter(|p| **p).count()
    }

    /// Pack into the 18-byte wire form
    pub fn encode(&self) -> PackedSprite {
        let mut bytes = [0u8; PACKED_SPRITE_LEN];
        for (i, pixel) in self.pixels.iter().flatten().enumerate() {
            if *pixel {
                bytes[i / 8] |= 0x80 >> (i % 8);
            }
        }
        PackedSprite(bytes)
    }
}

impl Default for SpriteBitmap {
    fn default() -> Self {
        Self::filled(false)
    }
}

/// Packed sprite bitmap, as sent with the SPRITE_DATA opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackedSprite([u8; PACKED_SPRITE_LEN]);

impl PackedSprite {
    /// Wrap raw packed bytes
    pub const fn from_bytes(bytes: [u8; PACKED_SPRITE_LEN]) -> Self {
        Self(bytes)
    }

    /// Packed bytes
    pub fn as_bytes(&self) -> &[u8; PACKED_SPRITE_LEN] {
        &self.0
    }

    /// Expand back into a bitmap
    pub fn unpack(&self) -> SpriteBitmap {
        let mut bitmap = SpriteBitmap::filled(false);
        for i in 0..SPRITE_WIDTH * SPRITE_HEIGHT {
            let set = self.0[i / 8] & (0x80 >> (i % 8)) != 0;
            bitmap.set(i % SPRITE_WIDTH, i / SPRITE_WIDTH, set);
        }
        bitmap
    }
}

impl From<&SpriteBitmap> for PackedSprite {
    fn from(bitmap: &SpriteBitmap) -> Self {
        bitmap.encode()
    }
}

impl AsRef<[u8]> for PackedSprite {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites;
    use proptest::prelude::*;

    #[test]
    fn test_all_ones_and_zeros() {
        assert_eq!(SpriteBitmap::filled(true).encode().as_bytes(), &[0xFF; 18]);
        assert_eq!(SpriteBitmap::filled(false).encode().as_bytes(), &[0x00; 18]);
    }

    #[test]
    fn test_msb_first_row_major() {
        let mut bitmap = SpriteBitmap::default();
        bitmap.set(0, 0, true);
        assert_eq!(bitmap.encode().as_bytes()[0], 0x80);

        // Pixel 12 is row 1, column 0: byte 1, bit 3
        let mut bitmap = SpriteBitmap::default();
        bitmap.set(0, 1, true);
        let packed = bitmap.encode();
        assert_eq!(packed.as_bytes()[1], 0x08);
        assert_eq!(packed.as_bytes().iter().filter(|b| **b != 0).count(), 1);

        let mut bitmap = SpriteBitmap::default();
        bitmap.set(11, 11, true);
        assert_eq!(bitmap.encode().as_bytes()[17], 0x01);
    }

    #[test]
    fn test_tt_logo_bytes() {
        // First two rows: 000111111000 001000000100
        let packed = sprites::TT.encode();
        assert_eq!(&packed.as_bytes()[..3], &[0x1F, 0x82, 0x04]);
    }

    #[test]
    fn test_fixture_bytes() {
        // Each pair of rows is three bytes: row 2k gives the first byte and
        // the high nibble of the second, row 2k + 1 the rest
        let expected: [(SpriteBitmap, [u8; PACKED_SPRITE_LEN]); 4] = [
            (
                sprites::TT,
                [
                    0x1F, 0x82, 0x04, 0x7E, 0x2F, 0xE1, 0x18, 0x19, 0xFD, 0x9F, 0xD9, 0xB1, 0x9B,
                    0x14, 0x32, 0x23, 0x41, 0xF0,
                ],
            ),
            (
                sprites::DRINK,
                [
                    0x01, 0x80, 0x20, 0xF5, 0xE8, 0x42, 0x7F, 0xC3, 0x38, 0x13, 0x00, 0xE0, 0x04,
                    0x00, 0x40, 0x04, 0x01, 0xF0,
                ],
            ),
            (
                sprites::HEART,
                [
                    0x31, 0x87, 0xBC, 0xFF, 0x6F, 0xFA, 0xFF, 0xAF, 0xF6, 0x7F, 0xC3, 0xD8, 0x1F,
                    0x00, 0xE0, 0x04, 0x00, 0x40,
                ],
            ),
            (
                sprites::SPIRAL,
                [
                    0x1F, 0x06, 0x0C, 0x80, 0x28, 0x02, 0x0F, 0x11, 0x09, 0x26, 0x92, 0x89, 0x29,
                    0x22, 0x62, 0x10, 0xC0, 0xF0,
                ],
            ),
        ];
        for (sprite, bytes) in expected {
            assert_eq!(sprite.encode().as_bytes(), &bytes);
            assert_eq!(PackedSprite::from_bytes(bytes).unpack(), sprite);
        }
    }

    #[test]
    fn test_fixtures_round_trip() {
        for sprite in sprites::GALLERY {
            let packed = sprite.encode();
            assert_eq!(packed.unpack(), sprite);

            let ones: u32 = packed.as_bytes().iter().map(|b| b.count_ones()).sum();
            assert_eq!(ones as usize, sprite.count_set());
        }
    }

    #[test]
    fn test_out_of_range_access() {
        let mut bitmap = SpriteBitmap::filled(true);
        assert!(!bitmap.get(12, 0));
        assert!(!bitmap.get(0, 12));
        bitmap.set(12, 12, false);
        assert_eq!(bitmap, SpriteBitmap::filled(true));
    }

    proptest! {
        #[test]
        fn prop_pack_unpack(bytes in proptest::array::uniform18(any::<u8>())) {
            let packed = PackedSprite::from_bytes(bytes);
            prop_assert_eq!(packed.unpack().encode(), packed);
        }
    }
}
