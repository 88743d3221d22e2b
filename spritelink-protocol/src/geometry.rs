//! Screen geometry and video timing of the controller

use crate::sprite::{SPRITE_HEIGHT, SPRITE_WIDTH};

/// Visible width in raw pixels
pub const WIDTH: u32 = 800;

/// Visible height in raw pixels
pub const HEIGHT: u32 = 600;

/// Raw pixels per coarse pixel, in both directions
pub const PIXEL_SIZE: u32 = 8;

/// Visible width in coarse pixels
pub const COARSE_WIDTH: u32 = WIDTH / PIXEL_SIZE;

/// Visible height in coarse pixels
pub const COARSE_HEIGHT: u32 = HEIGHT / PIXEL_SIZE;

/// Largest sprite column that keeps the sprite fully on screen
pub const MAX_SPRITE_X: u32 = COARSE_WIDTH - SPRITE_WIDTH as u32;

/// Largest sprite row that keeps the sprite fully on screen
pub const MAX_SPRITE_Y: u32 = COARSE_HEIGHT - SPRITE_HEIGHT as u32;

/// Horizontal or vertical timing in pixels or lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisTiming {
    pub visible: u32,
    pub front_porch: u32,
    pub sync: u32,
    pub back_porch: u32,
}

impl AxisTiming {
    pub const fn total(&self) -> u32 {
        self.visible + self.front_porch + self.sync + self.back_porch
    }

    pub const fn blanking(&self) -> u32 {
        self.front_porch + self.sync + self.back_porch
    }
}

/// Video timing of one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub horizontal: AxisTiming,
    pub vertical: AxisTiming,
}

impl Timing {
    /// Lines between the frame edge and the first visible line
    ///
    /// The frame edge falls at the start of the vertical sync pulse.
    pub const fn lines_before_active(&self) -> u32 {
        self.vertical.sync + self.vertical.back_porch
    }

    /// Project clock cycles per frame at one cycle per pixel
    pub const fn clocks_per_frame(&self) -> u32 {
        self.horizontal.total() * self.vertical.total()
    }
}

/// 800×600 timing
pub const SVGA_800X600: Timing = Timing {
    horizontal: AxisTiming {
        visible: WIDTH,
        front_porch: 40,
        sync: 128,
        back_porch: 88,
    },
    vertical: AxisTiming {
        visible: HEIGHT,
        front_porch: 1,
        sync: 4,
        back_porch: 23,
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coarse_grid() {
        assert_eq!(COARSE_WIDTH, 100);
        assert_eq!(COARSE_HEIGHT, 75);
        assert_eq!(MAX_SPRITE_X, 88);
        assert_eq!(MAX_SPRITE_Y, 63);
    }

    #[test]
    fn test_svga_totals() {
        assert_eq!(SVGA_800X600.horizontal.total(), 1056);
        assert_eq!(SVGA_800X600.vertical.total(), 628);
        assert_eq!(SVGA_800X600.vertical.blanking(), 28);
        assert_eq!(SVGA_800X600.lines_before_active(), 27);
        // 40 MHz pixel clock gives 60 Hz
        assert_eq!(40_000_000 / SVGA_800X600.clocks_per_frame(), 60);
    }
}
