//! The monochrome display state, independent of any rendering backend.
use crate::definitions::display;

/// The graphics of the Chip 8 are black and white and the screen has a total
/// of `2048` pixels `(64 x 32)`. Every pixel holds a single on / off state.
///
/// The framebuffer is only ever mutated by the clear display and the draw
/// instructions, the actual pixel presentation is up to an external renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Box<[[bool; display::WIDTH]; display::HEIGHT]>,
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: Box::new([[false; display::WIDTH]; display::HEIGHT]),
        }
    }

    /// Will set the entire framebuffer to off.
    pub fn clear(&mut self) {
        for row in self.pixels.iter_mut() {
            row.fill(false);
        }
    }

    /// Will return the state of a single pixel.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y][x]
    }

    /// Will return the pixel rows, top to bottom.
    pub fn rows(&self) -> &[[bool; display::WIDTH]] {
        &self.pixels[..]
    }

    /// Will xor the given sprite rows onto the framebuffer with the top left
    /// corner at `(x, y)`.
    ///
    /// Coordinates wrap around both screen edges, so a sprite drawn over the
    /// right border continues on the left one. Returns `true` if any pixel
    /// flipped from on to off, which the chipset stores as the collision
    /// flag `VF`.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        const SPRITE_WIDTH: usize = 8;

        let mut collision = false;

        for (i, row) in sprite.iter().enumerate() {
            let py = (y + i) % display::HEIGHT;

            for j in 0..SPRITE_WIDTH {
                // bit 7 of the sprite byte is the leftmost pixel
                let mask = 1 << (SPRITE_WIDTH - 1 - j);
                if row & mask == 0 {
                    continue;
                }

                let px = (x + j) % display::WIDTH;
                let pixel = &mut self.pixels[py][px];

                if *pixel {
                    collision = true;
                }
                *pixel = !*pixel;
            }
        }

        collision
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::display::fontset::{FONTSET, GLYPH_SIZE};

    /// the glyph for the character `0`
    fn zero_glyph() -> &'static [u8] {
        &FONTSET[..GLYPH_SIZE]
    }

    #[test]
    fn test_draw_glyph_sets_matching_pixels() {
        let mut fb = Framebuffer::new();

        let collision = fb.draw_sprite(0, 0, zero_glyph());
        assert!(!collision);

        for (y, byte) in zero_glyph().iter().enumerate() {
            for x in 0..8 {
                let expected = byte & (1 << (7 - x)) != 0;
                assert_eq!(expected, fb.pixel(x, y), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_draw_twice_collides_and_cancels() {
        let mut fb = Framebuffer::new();

        assert!(!fb.draw_sprite(0, 0, zero_glyph()));
        // the second draw xors every pixel back off
        assert!(fb.draw_sprite(0, 0, zero_glyph()));

        assert_eq!(Framebuffer::new(), fb);
    }

    #[test]
    fn test_draw_wraps_around_right_edge() {
        let mut fb = Framebuffer::new();

        // 0xFF sets all eight columns of the row
        fb.draw_sprite(60, 0, &[0xFF]);

        for j in 0..8 {
            let x = (60 + j) % display::WIDTH;
            assert!(fb.pixel(x, 0), "column {} should wrap to {}", 60 + j, x);
        }
        assert!(!fb.pixel(4, 0));
    }

    #[test]
    fn test_draw_wraps_around_bottom_edge() {
        let mut fb = Framebuffer::new();

        fb.draw_sprite(0, 30, &[0x80, 0x80, 0x80, 0x80]);

        for i in 0..4 {
            let y = (30 + i) % display::HEIGHT;
            assert!(fb.pixel(0, y), "row {} should wrap to {}", 30 + i, y);
        }
    }

    #[test]
    fn test_clear_resets_all_pixels() {
        let mut fb = Framebuffer::new();
        fb.draw_sprite(10, 10, zero_glyph());

        fb.clear();
        assert_eq!(Framebuffer::new(), fb);
    }
}
