//! Drawing primitives on top of the framebuffer.
//!
//! All coordinates are pixel positions with (0, 0) at the top left. Shapes may extend past the
//! panel edges; pixels that fall outside are dropped individually.

use crate::display::framebuffer::Framebuffer;
use crate::font::{self, CHAR_HEIGHT, CHAR_WIDTH};

/// Default distance between heart stamps along a border.
pub const HEART_SPACING: u8 = 5;

/// Offsets of the lit pixels of the heart stamp relative to its anchor (top centre):
///
/// ```text
/// . # . # .
/// # # # # #
/// # # # # #
/// . # # # .
/// . . # . .
/// ```
#[cfg_attr(rustfmt, rustfmt_skip)]
pub const HEART: [(i8, i8); 16] = [
    (-1, 0), (1, 0),
    (-2, 1), (-1, 1), (0, 1), (1, 1), (2, 1),
    (-2, 2), (-1, 2), (0, 2), (1, 2), (2, 2),
    (-1, 3), (0, 3), (1, 3),
    (0, 4),
];

impl Framebuffer {
    /// Draw a horizontal line from `x0` to `x1` inclusive.
    pub fn draw_hline(&mut self, x0: i16, x1: i16, y: i16, on: bool) {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        for x in lo as i32..=hi as i32 {
            self.plot(x, y as i32, on);
        }
    }

    /// Draw a vertical line from `y0` to `y1` inclusive.
    pub fn draw_vline(&mut self, x: i16, y0: i16, y1: i16, on: bool) {
        let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        for y in lo as i32..=hi as i32 {
            self.plot(x as i32, y, on);
        }
    }

    /// Draw a line between two points, both included, with Bresenham's algorithm.
    ///
    /// The endpoints are rasterized in a fixed order, so swapping them yields the same pixels.
    pub fn draw_line(&mut self, x0: i16, y0: i16, x1: i16, y1: i16, on: bool) {
        let ((x0, y0), (x1, y1)) = if (x1, y1) < (x0, y0) {
            ((x1, y1), (x0, y0))
        } else {
            ((x0, y0), (x1, y1))
        };
        let (mut x, mut y) = (x0 as i32, y0 as i32);
        let (x1, y1) = (x1 as i32, y1 as i32);

        let dx = (x1 - x).abs();
        let dy = (y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            self.plot(x, y, on);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw the outline of a rectangle. Nothing is drawn unless both sides are positive.
    pub fn draw_rect(&mut self, top: i16, left: i16, width: i16, height: i16, on: bool) {
        if width <= 0 || height <= 0 {
            return;
        }
        let (top, left) = (top as i32, left as i32);
        let bottom = top + height as i32 - 1;
        let right = left + width as i32 - 1;
        for x in left..=right {
            self.plot(x, top, on);
            self.plot(x, bottom, on);
        }
        for y in top..=bottom {
            self.plot(left, y, on);
            self.plot(right, y, on);
        }
    }

    /// Stamp the 5x5 heart with its top centre at (`x`, `y`). See [`HEART`].
    pub fn draw_heart(&mut self, x: i16, y: i16, on: bool) {
        self.stamp_heart(x as i32, y as i32, on)
    }

    fn stamp_heart(&mut self, x: i32, y: i32, on: bool) {
        for &(dx, dy) in HEART.iter() {
            self.plot(x + dx as i32, y + dy as i32, on);
        }
    }

    /// Stamp hearts every [`HEART_SPACING`] pixels along the four edges of a rectangle.
    pub fn draw_heart_border(&mut self, top: i16, left: i16, width: i16, height: i16, on: bool) {
        self.draw_heart_border_spaced(top, left, width, height, on, HEART_SPACING)
    }

    /// Stamp hearts every `spacing` pixels along the four edges of a rectangle, anchored on the
    /// edge itself. A spacing of 0 is treated as 1.
    pub fn draw_heart_border_spaced(
        &mut self,
        top: i16,
        left: i16,
        width: i16,
        height: i16,
        on: bool,
        spacing: u8,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        let step = spacing.max(1) as usize;
        let (top, left) = (top as i32, left as i32);
        let bottom = top + height as i32 - 1;
        let right = left + width as i32 - 1;
        for x in (left..=right).step_by(step) {
            self.stamp_heart(x, top, on);
            self.stamp_heart(x, bottom, on);
        }
        for y in (top..=bottom).step_by(step) {
            self.stamp_heart(left, y, on);
            self.stamp_heart(right, y, on);
        }
    }

    /// Blit one 8x8 character cell with its top left corner at (`x`, `y`). Glyph ink is lit and
    /// the rest of the cell cleared. Returns `false`, drawing nothing, if the cell does not fit
    /// entirely on the panel.
    pub fn draw_char(&mut self, x: i16, y: i16, c: char) -> bool {
        self.blit_char(x as i32, y as i32, c)
    }

    fn blit_char(&mut self, x: i32, y: i32, c: char) -> bool {
        if false
            || x < 0
            || y < 0
            || x + CHAR_WIDTH as i32 > self.width() as i32
            || y + CHAR_HEIGHT as i32 > self.height() as i32
        {
            return false;
        }
        for (row, &bits) in font::glyph(c).iter().enumerate() {
            for col in 0..CHAR_WIDTH {
                self.plot(x + col as i32, y + row as i32, bits & (0x80u8 >> col) != 0);
            }
        }
        true
    }

    /// Draw a string starting at (`x`, `y`), one 8x8 cell per character. When the next cell would
    /// run past the right edge, text continues at x = 0 on the next cell row; `'\n'` does the
    /// same. Drawing stops at the first cell row that does not fit vertically.
    pub fn draw_string(&mut self, x: i16, y: i16, s: &str) {
        let (width, height) = (self.width() as i32, self.height() as i32);
        let (step_x, step_y) = (CHAR_WIDTH as i32, CHAR_HEIGHT as i32);
        let (mut x, mut y) = (x as i32, y as i32);
        for c in s.chars() {
            if c == '\n' {
                x = 0;
                y += step_y;
                continue;
            }
            if x + step_x > width {
                x = 0;
                y += step_y;
            }
            if y + step_y > height {
                break;
            }
            self.blit_char(x, y, c);
            x += step_x;
        }
    }
}
