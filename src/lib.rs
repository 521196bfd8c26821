//! Driver library for the Solomon Systech SSD1306 monochrome OLED display controller, attached
//! over I2C.
//!
//! The driver keeps a full-screen framebuffer in memory. Drawing happens on the buffer with the
//! primitives in [`display::primitives`], and [`Display::flush`] pushes the whole buffer to the
//! panel in a single bus write.
//!
//! ```ignore
//! let iface = I2cInterface::new(i2c, interface::i2c::DEFAULT_ADDRESS);
//! let mut disp = Display::new(iface, 128, 64, AddressingMode::Horizontal, false)?;
//! disp.init(Config::new())?;
//! disp.framebuffer_mut().draw_rect(3, 3, 122, 58, true);
//! disp.flush()?;
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;
extern crate embedded_hal as hal;


pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod font;
pub mod interface;
pub mod scene;

// Re-exports for primary API.
pub use command::{consts, AddressingMode, ComPinLayout, ComScanDirection};
pub use config::Config;
pub use display::framebuffer::Framebuffer;
pub use display::{Display, DisplayState};
pub use error::{BuildError, Error};
pub use interface::i2c::I2cInterface;
