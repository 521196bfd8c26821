//! The in-memory copy of display RAM.
//!
//! The buffer is laid out exactly as it goes over the bus: a leading data-mode marker followed by
//! one byte per column per page, in the order the controller's address pointer visits them. This
//! lets `Display::flush` hand the whole thing to the interface in one write.

use alloc::vec::Vec;

use itertools::iproduct;

use crate::command::consts::*;
use crate::command::AddressingMode;
use crate::error::BuildError;
use crate::interface::DATA_MARKER;

/// Locate the bit holding pixel (`x`, `y`): returns the byte index into the framebuffer
/// (including the marker byte at index 0) and the bit mask within that byte.
///
/// The caller guarantees `x < width` and `y < pages * 8`.
pub fn address(mode: AddressingMode, width: u8, pages: u8, x: u8, y: u8) -> (usize, u8) {
    let page = (y >> 3) as usize;
    let index = match mode {
        AddressingMode::Horizontal => page * width as usize + x as usize,
        AddressingMode::Vertical => x as usize * pages as usize + page,
    };
    (1 + index, 1 << (y & 7))
}

/// A packed one-bit-per-pixel framebuffer for a panel of fixed size.
pub struct Framebuffer {
    width: u8,
    height: u8,
    pages: u8,
    mode: AddressingMode,
    bytes: Vec<u8>,
}

impl Framebuffer {
    /// Allocate a cleared framebuffer for a `width` x `height` panel whose display RAM is written
    /// in `mode` order.
    pub fn new(width: u8, height: u8, mode: AddressingMode) -> Result<Self, BuildError> {
        if false
            || width == 0
            || width > NUM_PIXEL_COLS
            || height < 16
            || height > NUM_PIXEL_ROWS
            || height % 8 != 0
        {
            return Err(BuildError::InvalidDimensions { width, height });
        }
        let pages = height / 8;
        let len = pages as usize * width as usize + 1;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| BuildError::Allocation)?;
        bytes.resize(len, 0);
        bytes[0] = DATA_MARKER;
        Ok(Framebuffer {
            width,
            height,
            pages,
            mode,
            bytes,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of 8-row pages, `height / 8`.
    pub fn pages(&self) -> u8 {
        self.pages
    }

    pub fn addressing_mode(&self) -> AddressingMode {
        self.mode
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(address(self.mode, self.width, self.pages, x as u8, y as u8))
    }

    /// Set or clear one pixel. Coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: i16, y: i16, on: bool) {
        self.plot(x as i32, y as i32, on)
    }

    pub(crate) fn plot(&mut self, x: i32, y: i32, on: bool) {
        if let Some((index, mask)) = self.locate(x, y) {
            if on {
                self.bytes[index] |= mask;
            } else {
                self.bytes[index] &= !mask;
            }
        }
    }

    /// Read back one pixel. Coordinates outside the panel read as off.
    pub fn pixel(&self, x: i16, y: i16) -> bool {
        match self.locate(x as i32, y as i32) {
            Some((index, mask)) => self.bytes[index] & mask != 0,
            None => false,
        }
    }

    /// Set every pixel to `on`, going through the same addressing as single-pixel writes.
    pub fn fill(&mut self, on: bool) {
        for (y, x) in iproduct!(0..self.height as i32, 0..self.width as i32) {
            self.plot(x, y, on);
        }
    }

    /// The full data frame: the marker byte followed by the pixel bytes.
    pub fn as_frame(&self) -> &[u8] {
        &self.bytes
    }

    /// The pixel bytes only, in display RAM order.
    pub fn pixel_bytes(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// Number of lit pixels.
    pub fn lit_count(&self) -> u32 {
        self.pixel_bytes().iter().map(|b| b.count_ones()).sum()
    }
}
