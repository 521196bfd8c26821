//! The bus between the driver and the SSD1306.
//!
//! Every write on the bus starts with a control byte telling the controller how to interpret the
//! rest of the transfer: [`COMMAND_MARKER`] for a single command byte, [`DATA_MARKER`] for a run
//! of display RAM bytes.

/// Control byte prefixed to each command frame.
pub const COMMAND_MARKER: u8 = 0x00;
/// Control byte prefixed to each data frame.
pub const DATA_MARKER: u8 = 0x40;

/// A write-only link to the display controller.
pub trait DisplayInterface {
    /// The transport error, passed through unchanged to the caller.
    type Error;

    /// Send one command (or command argument) byte as a `[COMMAND_MARKER, cmd]` frame.
    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;

    /// Send a complete data frame in one blocking write. `frame[0]` must already hold
    /// [`DATA_MARKER`]; the framebuffer reserves that byte so no copy is needed here.
    fn send_data(&mut self, frame: &[u8]) -> Result<(), Self::Error>;
}

pub mod i2c {
    //! The I2C interface. The SSD1306 distinguishes commands from display data by the control
    //! byte at the start of each write, so no extra D/C pin is needed.

    use super::{DisplayInterface, COMMAND_MARKER};

    /// Default 7-bit address of most SSD1306 modules (SA0 tied low).
    pub const DEFAULT_ADDRESS: u8 = 0x3C;

    pub struct I2cInterface<I2C> {
        /// The I2C master the SSD1306 is attached to.
        i2c: I2C,
        /// The 7-bit bus address of the SSD1306.
        address: u8,
    }

    impl<I2C> I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        /// Create a new I2C interface to communicate with the display driver at `address`.
        pub fn new(i2c: I2C, address: u8) -> Self {
            Self { i2c, address }
        }

        /// Give back the I2C peripheral.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C> DisplayInterface for I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write,
    {
        type Error = I2C::Error;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.i2c.write(self.address, &[COMMAND_MARKER, cmd])
        }

        fn send_data(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
            self.i2c.write(self.address, frame)
        }
    }

}
