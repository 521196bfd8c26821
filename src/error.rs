//! Error types for the driver.
//!
//! Construction problems are reported as [`BuildError`], before any display exists. Everything
//! that talks to the controller afterwards reports [`Error`], which is generic over the bus error
//! of the [`DisplayInterface`](crate::interface::DisplayInterface) in use so callers can still
//! match on the underlying transport failure.

use core::fmt;

/// Errors that can occur while constructing a [`Display`](crate::display::Display).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// The framebuffer backing store could not be reserved.
    Allocation,
    /// The requested panel size is not supported by the SSD1306.
    ///
    /// Width must be 1-128 and height a multiple of 8 in 16-64, the range of the multiplex ratio.
    InvalidDimensions {
        /// Requested width in pixels.
        width: u8,
        /// Requested height in pixels.
        height: u8,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BuildError::Allocation => write!(f, "framebuffer allocation failed"),
            BuildError::InvalidDimensions { width, height } => write!(
                f,
                "unsupported panel size {}x{} (width 1-128, height 16-64 in steps of 8)",
                width, height
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuildError {}

/// Errors that can occur while sending commands or image data to the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus rejected a write (device absent, NACK, timeout, ...). The driver does not retry
    /// and does not roll back commands that were already accepted.
    Bus(E),
    /// A command argument is outside the range the controller accepts. Nothing was sent.
    InvalidArgument,
}

impl<E> fmt::Display for Error<E>
where
    E: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus write failed: {:?}", e),
            Error::InvalidArgument => write!(f, "command argument out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl<E> std::error::Error for Error<E> where E: fmt::Debug {}
