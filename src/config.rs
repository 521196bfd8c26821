//! Panel tuning values that are written once by `Display::init`.

use crate::command::*;
use crate::error::Error;
use crate::interface;

/// A configuration for the display. The defaults match the common 128x64 I2C modules; builder
/// methods override individual registers for other panels.
///
/// Unlike the addressing mode and supply choice, which are fixed when the `Display` is created,
/// nothing here affects the framebuffer layout.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    segment_remap: bool,
    com_scan_direction: ComScanDirection,
    com_pins: (ComPinLayout, bool),
    clock_divide: (u8, u8),
    precharge_period: Option<(u8, u8)>,
    vcomh_deselect: u8,
    contrast: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create a new configuration with the default register values: segment remap on, COM scan
    /// from the bottom, alternative COM pins, clock divide 1 at oscillator setting 8, VCOMH
    /// 0x30, full contrast. The pre-charge period follows the supply mode unless overridden.
    pub fn new() -> Self {
        Config {
            segment_remap: true,
            com_scan_direction: ComScanDirection::RowZeroLast,
            com_pins: (ComPinLayout::Alternative, false),
            clock_divide: (1, 8),
            precharge_period: None,
            vcomh_deselect: 0x30,
            contrast: 0xFF,
        }
    }

    /// Extend this `Config` to set column address remapping. See `Command::SetSegmentRemap`.
    pub fn segment_remap(self, remap: bool) -> Self {
        Self {
            segment_remap: remap,
            ..self
        }
    }

    /// Extend this `Config` to set the COM scan direction. See `Command::SetComScanDirection`.
    pub fn com_scan_direction(self, direction: ComScanDirection) -> Self {
        Self {
            com_scan_direction: direction,
            ..self
        }
    }

    /// Extend this `Config` to set the COM pin layout. See `Command::SetComPins`.
    pub fn com_pins(self, layout: ComPinLayout, left_right_remap: bool) -> Self {
        Self {
            com_pins: (layout, left_right_remap),
            ..self
        }
    }

    /// Extend this `Config` to set the display clock. See `Command::SetClockDivide`.
    pub fn clock_divide(self, divide: u8, fosc: u8) -> Self {
        Self {
            clock_divide: (divide, fosc),
            ..self
        }
    }

    /// Extend this `Config` to set explicit pre-charge phase lengths. See
    /// `Command::SetPrechargePeriod`.
    pub fn precharge_period(self, phase_1: u8, phase_2: u8) -> Self {
        Self {
            precharge_period: Some((phase_1, phase_2)),
            ..self
        }
    }

    /// Extend this `Config` to set the VCOMH deselect level. See `Command::SetVcomhDeselect`.
    pub fn vcomh_deselect(self, level: u8) -> Self {
        Self {
            vcomh_deselect: level,
            ..self
        }
    }

    /// Extend this `Config` to set the initial contrast. See `Command::SetContrast`.
    pub fn contrast(self, contrast: u8) -> Self {
        Self { contrast, ..self }
    }

    /// Transmit the panel setup commands that sit between the multiplex ratio and the charge pump
    /// in the init sequence. `mux_ratio` is the display height.
    pub(crate) fn send<DI>(
        &self,
        iface: &mut DI,
        mux_ratio: u8,
        external_supply: bool,
    ) -> Result<(), Error<DI::Error>>
    where
        DI: interface::DisplayInterface,
    {
        // Panels on an external VCC want short pre-charge phases; the charge pump supply needs
        // the long second phase.
        let (phase_1, phase_2) =
            self.precharge_period
                .unwrap_or(if external_supply { (2, 2) } else { (1, 15) });
        Command::SetSegmentRemap(self.segment_remap).send(iface)?;
        Command::SetMuxRatio(mux_ratio).send(iface)?;
        Command::SetComScanDirection(self.com_scan_direction).send(iface)?;
        Command::SetDisplayOffset(0).send(iface)?;
        Command::SetComPins(self.com_pins.0, self.com_pins.1).send(iface)?;
        Command::SetClockDivide(self.clock_divide.0, self.clock_divide.1).send(iface)?;
        Command::SetPrechargePeriod(phase_1, phase_2).send(iface)?;
        Command::SetVcomhDeselect(self.vcomh_deselect).send(iface)?;
        Command::SetContrast(self.contrast).send(iface)
    }
}
