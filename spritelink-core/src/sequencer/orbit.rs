//! Sprite paths in coarse-pixel coordinates
//!
//! Integer trigonometry from a quarter-wave table, so the paths come out
//! identical on the host and on a core without an FPU.

use spritelink_protocol::geometry::{COARSE_HEIGHT, COARSE_WIDTH, MAX_SPRITE_X, MAX_SPRITE_Y};
use spritelink_protocol::{SPRITE_HEIGHT, SPRITE_WIDTH};

/// Fixed-point scale of [`sin_deg`] and [`cos_deg`]
pub const SINE_SCALE: i32 = 1 << 14;

/// sin(0°..=90°) × 16384, rounded
const QUARTER_SINE: [i32; 91] = [
    0, 286, 572, 857, 1143, 1428, 1713, 1997, 2280, 2563, //
    2845, 3126, 3406, 3686, 3964, 4240, 4516, 4790, 5063, 5334, //
    5604, 5872, 6138, 6402, 6664, 6924, 7182, 7438, 7692, 7943, //
    8192, 8438, 8682, 8923, 9162, 9397, 9630, 9860, 10087, 10311, //
    10531, 10749, 10963, 11174, 11381, 11585, 11786, 11982, 12176, 12365, //
    12551, 12733, 12911, 13085, 13255, 13421, 13583, 13741, 13894, 14044, //
    14189, 14330, 14466, 14598, 14726, 14849, 14968, 15082, 15191, 15296, //
    15396, 15491, 15582, 15668, 15749, 15826, 15897, 15964, 16026, 16083, //
    16135, 16182, 16225, 16262, 16294, 16322, 16344, 16362, 16374, 16382, //
    16384,
];

/// Sine of a whole number of degrees, scaled by [`SINE_SCALE`]
pub fn sin_deg(deg: i32) -> i32 {
    let d = deg.rem_euclid(360) as usize;
    match d {
        0..=90 => QUARTER_SINE[d],
        91..=180 => QUARTER_SINE[180 - d],
        181..=270 => -QUARTER_SINE[d - 180],
        _ => -QUARTER_SINE[360 - d],
    }
}

/// Cosine of a whole number of degrees, scaled by [`SINE_SCALE`]
pub fn cos_deg(deg: i32) -> i32 {
    sin_deg(deg + 90)
}

fn clamp_coord(value: i32, max: u32) -> u8 {
    value.clamp(0, max as i32) as u8
}

/// Point on the largest ellipse that keeps `margin` clear on every side
pub fn circle_point(deg: i32, margin: u8) -> (u8, u8) {
    let margin = margin as i32;
    let span_x = (COARSE_WIDTH - SPRITE_WIDTH as u32) as i32 - 2 * margin;
    let span_y = (COARSE_HEIGHT - SPRITE_HEIGHT as u32) as i32 - 2 * margin;

    let x = margin + (cos_deg(deg) + SINE_SCALE) * span_x / (2 * SINE_SCALE);
    let y = margin + (sin_deg(deg) + SINE_SCALE) * span_y / (2 * SINE_SCALE);
    (clamp_coord(x, MAX_SPRITE_X), clamp_coord(y, MAX_SPRITE_Y))
}

/// Spiral out from a quarter-size ring to the full ellipse, then back in
///
/// Ring `i` of `rounds` is walked in steps of `i + 2` degrees, so outer
/// rings move faster. The radius grows smoothly across each ring.
#[derive(Debug, Clone)]
pub struct Spiral {
    rounds: u32,
    radius_x: i32,
    radius_y: i32,
    pass: u32,
    deg: u32,
}

impl Spiral {
    pub fn new(rounds: u8, margin: u8) -> Self {
        let half_sprite = SPRITE_WIDTH as i32 / 2;
        Self {
            rounds: rounds as u32,
            radius_x: (COARSE_WIDTH as i32 - half_sprite - margin as i32) / 2,
            radius_y: (COARSE_HEIGHT as i32 - half_sprite - margin as i32) / 2,
            pass: 0,
            deg: 0,
        }
    }

    /// Position at `deg` with the radius scaled by `permille`
    fn point(&self, deg: i32, permille: i32) -> (u8, u8) {
        let center_x = MAX_SPRITE_X as i32 / 2;
        let center_y = MAX_SPRITE_Y as i32 / 2;
        let x = center_x + cos_deg(deg) * self.radius_x / SINE_SCALE * permille / 1000;
        let y = center_y + sin_deg(deg) * self.radius_y / SINE_SCALE * permille / 1000;
        (clamp_coord(x, MAX_SPRITE_X), clamp_coord(y, MAX_SPRITE_Y))
    }
}

impl Iterator for Spiral {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pass < 2 * self.rounds {
            if self.deg >= 360 {
                self.deg = 0;
                self.pass += 1;
                continue;
            }

            let inward = self.pass >= self.rounds;
            let ring = if inward {
                2 * self.rounds - 1 - self.pass
            } else {
                self.pass
            };
            let deg = self.deg;
            self.deg += ring + 2;

            let progress = if inward { 360 - deg } else { deg };
            let permille = 250 + 750 * (ring * 360 + progress) / (self.rounds * 360);
            return Some(self.point(deg as i32, permille as i32));
        }
        None
    }
}
