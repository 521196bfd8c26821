//! The command set for the SSD1306.
//!
//! Note 1: The display RAM of the SSD1306 is 128 columns by 64 rows, grouped into 8 pages of 8 rows
//! each. One byte of display RAM covers one column of one page, with the least significant bit at
//! the top. Anywhere there is a "page" address, it refers to such a band of 8 pixel rows.
//!
//! Note 2: Over I2C every command byte *and every argument byte* is sent as its own command frame.

use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Constants describing the display RAM of the SSD1306.

    pub const NUM_PIXEL_COLS: u8 = 128;
    pub const NUM_PIXEL_ROWS: u8 = 64;
    pub const NUM_PAGES: u8 = NUM_PIXEL_ROWS / 8;
    pub const PIXEL_COL_MAX: u8 = NUM_PIXEL_COLS - 1;
    pub const PIXEL_ROW_MAX: u8 = NUM_PIXEL_ROWS - 1;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;
}

use self::consts::*;

/// The order in which written image data advances through display RAM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// The column address increments as data is written, left to right across the range set by
    /// `SetColumnAddress`, wrapping to the next page in the range set by `SetPageAddress`.
    Horizontal,
    /// The page address increments as data is written, top to bottom through the page range,
    /// wrapping to the next column.
    Vertical,
}

/// Setting of the COM line scanning of rows. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComScanDirection {
    /// COM lines scan from COM0 to COM[N-1], so that row address 0 is the first row of the
    /// display.
    RowZeroFirst,
    /// COM lines scan from COM[N-1] to COM0, so that row address 0 is the last row of the
    /// display.
    RowZeroLast,
}

/// Hardware layout of the COM pins. This is fixed by how the module wires the OLED matrix to the
/// controller; the wrong value interleaves or doubles rows. 128x64 modules are almost always
/// `Alternative`, 128x32 modules `Sequential`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComPinLayout {
    Sequential,
    Alternative,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Turn the panel on (`true`) or put it to sleep (`false`).
    SetDisplayOn(bool),
    /// Set how the RAM address pointer advances while writing image data.
    SetAddressingMode(AddressingMode),
    /// Set the display RAM row that is shown on the first display row. Range is 0-63.
    SetStartLine(u8),
    /// Map column address 127 to SEG0 when `true`, flipping the image horizontally.
    SetSegmentRemap(bool),
    /// Set the MUX ratio, i.e. the number of active COM lines. Range 16-64; the controller is
    /// sent the ratio minus one.
    SetMuxRatio(u8),
    /// Set the COM output scan direction.
    SetComScanDirection(ComScanDirection),
    /// Shift the mapping of display rows to COM lines. Range 0-63.
    SetDisplayOffset(u8),
    /// Set the COM pin hardware layout, and whether the left and right halves of the COM lines
    /// are swapped.
    SetComPins(ComPinLayout, bool),
    /// Set the display clock divide ratio (1-16) and oscillator frequency (0-15). Higher
    /// frequency settings increase the refresh rate.
    SetClockDivide(u8, u8),
    /// Set the pre-charge phase 1 and phase 2 lengths, each 1-15 DCLKs.
    SetPrechargePeriod(u8, u8),
    /// Set the VCOMH deselect level register. Only bits 4-6 are meaningful: 0x00 is ~0.65*Vcc,
    /// 0x20 ~0.77*Vcc, 0x30 ~0.83*Vcc.
    SetVcomhDeselect(u8),
    /// Set the contrast current. Range 0-255.
    SetContrast(u8),
    /// When `true`, light every pixel regardless of display RAM contents.
    SetEntireDisplayOn(bool),
    /// When `true`, lit RAM bits show as dark pixels and vice versa.
    SetInverted(bool),
    /// Enable the internal charge pump. Required unless the panel is driven from an external
    /// supply.
    SetChargePump(bool),
    /// Set the column start and end address range for writing image data. Range is 0-127,
    /// start <= end. Used in horizontal and vertical addressing modes only.
    SetColumnAddress(u8, u8),
    /// Set the page start and end address range for writing image data. Range is 0-7,
    /// start <= end. (Note 1)
    SetPageAddress(u8, u8),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        Ok(($cmd, &$buf[..2]))
    }};
}

impl Command {
    /// Encode the command and send the opcode and then each argument byte. Arguments are
    /// validated first, so an out-of-range command sends nothing.
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), Error<DI::Error>>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 2];
        let encoded: Result<(u8, &[u8]), Error<DI::Error>> = match self {
            Command::SetDisplayOn(on) => ok_command!(arg_buf, if on { 0xAF } else { 0xAE }, []),
            Command::SetAddressingMode(mode) => {
                let m = match mode {
                    AddressingMode::Horizontal => 0x00,
                    AddressingMode::Vertical => 0x01,
                };
                ok_command!(arg_buf, 0x20, [m])
            }
            Command::SetStartLine(line) => match line {
                0..=PIXEL_ROW_MAX => ok_command!(arg_buf, 0x40 | line, []),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetSegmentRemap(remap) => ok_command!(arg_buf, 0xA0 | remap as u8, []),
            Command::SetMuxRatio(ratio) => match ratio {
                16..=NUM_PIXEL_ROWS => ok_command!(arg_buf, 0xA8, [ratio - 1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComScanDirection(dir) => ok_command!(
                arg_buf,
                match dir {
                    ComScanDirection::RowZeroFirst => 0xC0,
                    ComScanDirection::RowZeroLast => 0xC8,
                },
                []
            ),
            Command::SetDisplayOffset(offset) => match offset {
                0..=PIXEL_ROW_MAX => ok_command!(arg_buf, 0xD3, [offset]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetComPins(layout, lr_remap) => {
                let alt = match layout {
                    ComPinLayout::Sequential => 0x00,
                    ComPinLayout::Alternative => 0x10,
                };
                let remap = if lr_remap { 0x20 } else { 0x00 };
                ok_command!(arg_buf, 0xDA, [0x02 | alt | remap])
            }
            Command::SetClockDivide(divide, fosc) => match (divide, fosc) {
                (1..=16, 0..=15) => ok_command!(arg_buf, 0xD5, [fosc << 4 | (divide - 1)]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPrechargePeriod(phase_1, phase_2) => match (phase_1, phase_2) {
                (1..=15, 1..=15) => ok_command!(arg_buf, 0xD9, [phase_2 << 4 | phase_1]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetVcomhDeselect(level) => match level & !0x70 {
                0 => ok_command!(arg_buf, 0xDB, [level]),
                _ => Err(Error::InvalidArgument),
            },
            Command::SetContrast(contrast) => ok_command!(arg_buf, 0x81, [contrast]),
            Command::SetEntireDisplayOn(on) => ok_command!(arg_buf, 0xA4 | on as u8, []),
            Command::SetInverted(inverted) => ok_command!(arg_buf, 0xA6 | inverted as u8, []),
            Command::SetChargePump(enable) => {
                ok_command!(arg_buf, 0x8D, [if enable { 0x14 } else { 0x10 }])
            }
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=PIXEL_COL_MAX, 0..=PIXEL_COL_MAX) if start <= end => {
                    ok_command!(arg_buf, 0x21, [start, end])
                }
                _ => Err(Error::InvalidArgument),
            },
            Command::SetPageAddress(start, end) => match (start, end) {
                (0..=PAGE_MAX, 0..=PAGE_MAX) if start <= end => {
                    ok_command!(arg_buf, 0x22, [start, end])
                }
                _ => Err(Error::InvalidArgument),
            },
        };
        let (cmd, args) = encoded?;
        iface.send_command(cmd).map_err(Error::Bus)?;
        for &arg in args {
            iface.send_command(arg).map_err(Error::Bus)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{BusFault, Sent, TestSpyInterface};

    #[test]
    fn set_display_on() {
        let mut di = TestSpyInterface::new();
        Command::SetDisplayOn(false).send(&mut di).unwrap();
        Command::SetDisplayOn(true).send(&mut di).unwrap();
        di.check_multi(sends!(0xAE, 0xAF));
    }

    #[test]
    fn set_addressing_mode() {
        let mut di = TestSpyInterface::new();
        Command::SetAddressingMode(AddressingMode::Horizontal)
            .send(&mut di)
            .unwrap();
        Command::SetAddressingMode(AddressingMode::Vertical)
            .send(&mut di)
            .unwrap();
        di.check_multi(sends!(0x20, 0x00, 0x20, 0x01));
    }

    #[test]
    fn set_start_line() {
        let mut di = TestSpyInterface::new();
        Command::SetStartLine(0).send(&mut di).unwrap();
        Command::SetStartLine(23).send(&mut di).unwrap();
        di.check_multi(sends!(0x40, 0x57));
        assert_eq!(
            Command::SetStartLine(64).send(&mut di),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn set_segment_remap() {
        let mut di = TestSpyInterface::new();
        Command::SetSegmentRemap(false).send(&mut di).unwrap();
        Command::SetSegmentRemap(true).send(&mut di).unwrap();
        di.check_multi(sends!(0xA0, 0xA1));
    }

    #[test]
    fn set_mux_ratio() {
        let mut di = TestSpyInterface::new();
        Command::SetMuxRatio(64).send(&mut di).unwrap();
        Command::SetMuxRatio(16).send(&mut di).unwrap();
        di.check_multi(sends!(0xA8, 63, 0xA8, 15));
        assert_eq!(
            Command::SetMuxRatio(15).send(&mut di),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            Command::SetMuxRatio(65).send(&mut di),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn set_com_scan_direction() {
        let mut di = TestSpyInterface::new();
        Command::SetComScanDirection(ComScanDirection::RowZeroFirst)
            .send(&mut di)
            .unwrap();
        Command::SetComScanDirection(ComScanDirection::RowZeroLast)
            .send(&mut di)
            .unwrap();
        di.check_multi(sends!(0xC0, 0xC8));
    }

    #[test]
    fn set_display_offset() {
        let mut di = TestSpyInterface::new();
        Command::SetDisplayOffset(23).send(&mut di).unwrap();
        di.check_multi(sends!(0xD3, 23));
        assert_eq!(
            Command::SetDisplayOffset(64).send(&mut di),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn set_com_pins() {
        let mut di = TestSpyInterface::new();
        Command::SetComPins(ComPinLayout::Alternative, false)
            .send(&mut di)
            .unwrap();
        Command::SetComPins(ComPinLayout::Sequential, false)
            .send(&mut di)
            .unwrap();
        Command::SetComPins(ComPinLayout::Alternative, true)
            .send(&mut di)
            .unwrap();
        di.check_multi(sends!(0xDA, 0x12, 0xDA, 0x02, 0xDA, 0x32));
    }

    #[test]
    fn set_clock_divide() {
        let mut di = TestSpyInterface::new();
        Command::SetClockDivide(1, 8).send(&mut di).unwrap();
        Command::SetClockDivide(16, 15).send(&mut di).unwrap();
        di.check_multi(sends!(0xD5, 0x80, 0xD5, 0xFF));
        assert_eq!(
            Command::SetClockDivide(0, 8).send(&mut di),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            Command::SetClockDivide(17, 8).send(&mut di),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            Command::SetClockDivide(1, 16).send(&mut di),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn set_precharge_period() {
        let mut di = TestSpyInterface::new();
        Command::SetPrechargePeriod(1, 15).send(&mut di).unwrap();
        Command::SetPrechargePeriod(2, 2).send(&mut di).unwrap();
        di.check_multi(sends!(0xD9, 0xF1, 0xD9, 0x22));
        assert_eq!(
            Command::SetPrechargePeriod(0, 2).send(&mut di),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            Command::SetPrechargePeriod(2, 16).send(&mut di),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn set_vcomh_deselect() {
        let mut di = TestSpyInterface::new();
        Command::SetVcomhDeselect(0x30).send(&mut di).unwrap();
        Command::SetVcomhDeselect(0x00).send(&mut di).unwrap();
        di.check_multi(sends!(0xDB, 0x30, 0xDB, 0x00));
        assert_eq!(
            Command::SetVcomhDeselect(0x31).send(&mut di),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            Command::SetVcomhDeselect(0x80).send(&mut di),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn set_contrast() {
        let mut di = TestSpyInterface::new();
        Command::SetContrast(0xFF).send(&mut di).unwrap();
        di.check_multi(sends!(0x81, 0xFF));
    }

    #[test]
    fn entire_display_on_and_inverted() {
        let mut di = TestSpyInterface::new();
        Command::SetEntireDisplayOn(false).send(&mut di).unwrap();
        Command::SetEntireDisplayOn(true).send(&mut di).unwrap();
        Command::SetInverted(false).send(&mut di).unwrap();
        Command::SetInverted(true).send(&mut di).unwrap();
        di.check_multi(sends!(0xA4, 0xA5, 0xA6, 0xA7));
    }

    #[test]
    fn set_charge_pump() {
        let mut di = TestSpyInterface::new();
        Command::SetChargePump(true).send(&mut di).unwrap();
        Command::SetChargePump(false).send(&mut di).unwrap();
        di.check_multi(sends!(0x8D, 0x14, 0x8D, 0x10));
    }

    #[test]
    fn set_column_address() {
        let mut di = TestSpyInterface::new();
        Command::SetColumnAddress(0, 127).send(&mut di).unwrap();
        di.check_multi(sends!(0x21, 0, 127));
        assert_eq!(
            Command::SetColumnAddress(0, 128).send(&mut di),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            Command::SetColumnAddress(42, 23).send(&mut di),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn set_page_address() {
        let mut di = TestSpyInterface::new();
        Command::SetPageAddress(0, 7).send(&mut di).unwrap();
        di.check_multi(sends!(0x22, 0, 7));
        assert_eq!(
            Command::SetPageAddress(0, 8).send(&mut di),
            Err(Error::InvalidArgument)
        );
        assert_eq!(
            Command::SetPageAddress(3, 2).send(&mut di),
            Err(Error::InvalidArgument)
        );
    }

    #[test]
    fn invalid_argument_sends_nothing() {
        let mut di = TestSpyInterface::new();
        assert!(Command::SetPageAddress(9, 9).send(&mut di).is_err());
        di.check_multi(sends!());
    }

    #[test]
    fn bus_error_stops_mid_command() {
        let mut di = TestSpyInterface::failing_after(1);
        assert_eq!(
            Command::SetContrast(0x7F).send(&mut di),
            Err(Error::Bus(BusFault))
        );
        // The opcode went out, the argument did not.
        di.check_multi(sends!(0x81));
    }
}
