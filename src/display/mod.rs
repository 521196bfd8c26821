//! The main API to the display driver. A `Display` owns the bus interface and a framebuffer the
//! size of the panel; drawing happens on the framebuffer and `flush` copies it to the panel.

pub mod framebuffer;
pub mod primitives;

use log::{debug, trace, warn};

use crate::command::*;
use crate::config::Config;
use crate::display::framebuffer::Framebuffer;
use crate::error::{BuildError, Error};
use crate::interface;

/// Where the panel is in its bring-up. There is no way back to an earlier state short of
/// constructing a new `Display`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayState {
    /// Constructed, nothing sent to the controller yet.
    Uninitialized,
    /// `init` completed.
    Configured,
    /// At least one frame has been flushed since `init`.
    Active,
}

/// A driver for an SSD1306 display.
pub struct Display<DI>
where
    DI: interface::DisplayInterface,
{
    iface: DI,
    buffer: Framebuffer,
    external_supply: bool,
    state: DisplayState,
}

impl<DI> Display<DI>
where
    DI: interface::DisplayInterface,
{
    /// Construct a new display driver for a `width` x `height` panel connected to `iface`.
    ///
    /// `mode` selects the memory addressing mode the controller is put into by `init`, which also
    /// decides the byte order of the framebuffer. `external_supply` should be set for modules that
    /// feed VCC from outside instead of the on-chip charge pump.
    ///
    /// Nothing is sent to the controller until `init`.
    pub fn new(
        iface: DI,
        width: u8,
        height: u8,
        mode: AddressingMode,
        external_supply: bool,
    ) -> Result<Self, BuildError> {
        let buffer = Framebuffer::new(width, height, mode)?;
        Ok(Display {
            iface,
            buffer,
            external_supply,
            state: DisplayState::Uninitialized,
        })
    }

    /// Initialize the display with a config message.
    ///
    /// The panel is switched off, configured, and switched back on. Each command byte goes out in
    /// its own frame; on a bus error the remaining commands are not sent and the state is left
    /// unchanged.
    pub fn init(&mut self, config: Config) -> Result<(), Error<DI::Error>> {
        debug!(
            "init {}x{} panel, {:?} addressing, external supply: {}",
            self.buffer.width(),
            self.buffer.height(),
            self.buffer.addressing_mode(),
            self.external_supply
        );
        let result = self.send_init(config);
        match result {
            Ok(()) => self.state = DisplayState::Configured,
            Err(Error::Bus(_)) => warn!("bus write failed during init"),
            Err(Error::InvalidArgument) => warn!("init rejected: config value out of range"),
        }
        result
    }

    fn send_init(&mut self, config: Config) -> Result<(), Error<DI::Error>> {
        Command::SetDisplayOn(false).send(&mut self.iface)?;
        Command::SetAddressingMode(self.buffer.addressing_mode()).send(&mut self.iface)?;
        Command::SetStartLine(0).send(&mut self.iface)?;
        config.send(&mut self.iface, self.buffer.height(), self.external_supply)?;
        Command::SetEntireDisplayOn(false).send(&mut self.iface)?;
        Command::SetInverted(false).send(&mut self.iface)?;
        Command::SetChargePump(!self.external_supply).send(&mut self.iface)?;
        Command::SetDisplayOn(true).send(&mut self.iface)
    }

    /// Copy the whole framebuffer to display RAM.
    ///
    /// The column and page windows are reset to cover the panel, then the buffer goes out as one
    /// data frame. The framebuffer itself is never modified. Flushing before `init` is allowed
    /// (the bytes land in display RAM) but does not advance the state.
    pub fn flush(&mut self) -> Result<(), Error<DI::Error>> {
        trace!(
            "flush {} bytes, {} pixels lit",
            self.buffer.as_frame().len(),
            self.buffer.lit_count()
        );
        let result = self.send_frame();
        match result {
            Ok(()) => {
                if self.state == DisplayState::Configured {
                    self.state = DisplayState::Active;
                }
            }
            Err(_) => warn!("bus write failed during flush"),
        }
        result
    }

    fn send_frame(&mut self) -> Result<(), Error<DI::Error>> {
        Command::SetColumnAddress(0, self.buffer.width() - 1).send(&mut self.iface)?;
        Command::SetPageAddress(0, self.buffer.pages() - 1).send(&mut self.iface)?;
        self.iface
            .send_data(self.buffer.as_frame())
            .map_err(Error::Bus)
    }

    /// Control the contrast.
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), Error<DI::Error>> {
        Command::SetContrast(contrast).send(&mut self.iface)
    }

    /// Swap lit and unlit pixels on the panel without touching display RAM.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), Error<DI::Error>> {
        Command::SetInverted(inverted).send(&mut self.iface)
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn width(&self) -> u8 {
        self.buffer.width()
    }

    pub fn height(&self) -> u8 {
        self.buffer.height()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.buffer
    }

    /// Mutable access to the framebuffer for drawing. Changes reach the panel on the next
    /// `flush`.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.buffer
    }

    /// Give back the interface.
    pub fn release(self) -> DI {
        self.iface
    }
}
