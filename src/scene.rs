//! A small interactive scene on top of the driver: a border that can be plain or made of hearts,
//! and an 8x8 cursor square steered by a two-axis analog joystick.
//!
//! Button handlers run in interrupt context and must not touch the framebuffer. They go through a
//! [`Debouncer`] and flip [`SceneFlags`]; the render loop takes a [`SceneState`] snapshot once
//! per frame and passes it to [`render`].

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use log::trace;

use crate::display::Display;
use crate::error::Error;
use crate::interface::DisplayInterface;

/// Joystick sample reported at rest, on a 0-4095 scale.
pub const JOYSTICK_CENTER: u16 = 2047;
/// Sample distance from centre per pixel of cursor movement per frame.
const JOYSTICK_STEP: i32 = 256;

/// Side length of the cursor square.
pub const CURSOR_SIZE: i16 = 8;

/// Minimum time between two accepted button presses.
pub const DEBOUNCE_MS: u32 = 200;

/// Rejects button events that arrive within `interval_ms` of the last accepted one.
///
/// The timestamps come from a free-running millisecond counter that is allowed to wrap. `accept`
/// takes `&self` so the debouncer can sit in a `static` next to the interrupt handler that owns
/// it; only that one handler may call `accept`.
pub struct Debouncer {
    interval_ms: u32,
    last_ms: AtomicU32,
    armed: AtomicBool,
}

impl Debouncer {
    pub const fn new(interval_ms: u32) -> Self {
        Debouncer {
            interval_ms,
            last_ms: AtomicU32::new(0),
            armed: AtomicBool::new(false),
        }
    }

    /// Returns `true` and restarts the hold-off if the event at `now_ms` should be acted upon.
    pub fn accept(&self, now_ms: u32) -> bool {
        if self.armed.load(Ordering::Acquire)
            && now_ms.wrapping_sub(self.last_ms.load(Ordering::Relaxed)) < self.interval_ms
        {
            return false;
        }
        self.last_ms.store(now_ms, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
        true
    }
}

/// How the border around the cursor area is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorationMode {
    /// A one pixel rectangle outline.
    Plain,
    /// Hearts stamped along the rectangle edges.
    Hearts,
}

/// The flag values the render loop acts on for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneState {
    pub decoration: DecorationMode,
    /// Whether the cursor square is drawn.
    pub drawing: bool,
}

/// Flags shared between button handlers and the render loop.
pub struct SceneFlags {
    hearts: AtomicBool,
    drawing: AtomicBool,
}

impl SceneFlags {
    /// Plain border, cursor drawn.
    pub const fn new() -> Self {
        SceneFlags {
            hearts: AtomicBool::new(false),
            drawing: AtomicBool::new(true),
        }
    }

    /// Switch between the plain and the heart border. Returns the new mode.
    pub fn toggle_decoration(&self) -> DecorationMode {
        if !self.hearts.fetch_xor(true, Ordering::Relaxed) {
            DecorationMode::Hearts
        } else {
            DecorationMode::Plain
        }
    }

    /// Show or hide the cursor square. Returns whether it is now drawn.
    pub fn toggle_drawing(&self) -> bool {
        !self.drawing.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> SceneState {
        SceneState {
            decoration: if self.hearts.load(Ordering::Relaxed) {
                DecorationMode::Hearts
            } else {
                DecorationMode::Plain
            },
            drawing: self.drawing.load(Ordering::Relaxed),
        }
    }
}

impl Default for SceneFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// The rectangle the border is drawn on and the cursor is kept inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Border {
    pub top: i16,
    pub left: i16,
    pub width: i16,
    pub height: i16,
}

impl Border {
    pub const fn new(top: i16, left: i16, width: i16, height: i16) -> Self {
        Border {
            top,
            left,
            width,
            height,
        }
    }

    /// Allowed positions of the cursor's left column.
    fn x_range(&self) -> (i32, i32) {
        let left = self.left as i32;
        (left, left + self.width as i32 - CURSOR_SIZE as i32)
    }

    /// Allowed positions of the cursor's top row.
    fn y_range(&self) -> (i32, i32) {
        let top = self.top as i32;
        (top, top + self.height as i32 - CURSOR_SIZE as i32)
    }
}

impl Default for Border {
    /// Three pixels in from each edge of a 128x64 panel.
    fn default() -> Self {
        Border::new(3, 3, 122, 58)
    }
}

/// Top left corner of the cursor square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    x: i16,
    y: i16,
    border: Border,
}

impl Cursor {
    /// A cursor in the middle of `border`.
    pub fn centered(border: Border) -> Self {
        let (lo_x, hi_x) = border.x_range();
        let (lo_y, hi_y) = border.y_range();
        Cursor {
            x: clamp(lo_x + (hi_x - lo_x) / 2, lo_x, hi_x),
            y: clamp(lo_y + (hi_y - lo_y) / 2, lo_y, hi_y),
            border,
        }
    }

    /// The rectangle the cursor is kept inside.
    pub fn border(&self) -> Border {
        self.border
    }

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    /// Move by one frame's worth of joystick deflection: `(sample - center) / 256` pixels per
    /// axis, truncated toward zero so small deflections do nothing. The square is then clamped to
    /// lie within the border.
    pub fn update(&mut self, x_sample: u16, y_sample: u16) {
        let dx = (x_sample as i32 - JOYSTICK_CENTER as i32) / JOYSTICK_STEP;
        let dy = (y_sample as i32 - JOYSTICK_CENTER as i32) / JOYSTICK_STEP;
        let (lo_x, hi_x) = self.border.x_range();
        let (lo_y, hi_y) = self.border.y_range();
        self.x = clamp(self.x as i32 + dx, lo_x, hi_x);
        self.y = clamp(self.y as i32 + dy, lo_y, hi_y);
    }
}

// `lo` wins when the border is narrower than the cursor. The result saturates at the `i16` range.
fn clamp(v: i32, lo: i32, hi: i32) -> i16 {
    v.min(hi)
        .max(lo)
        .max(i16::MIN as i32)
        .min(i16::MAX as i32) as i16
}

/// Redraw the whole frame and flush it: clear, draw the cursor's border in the current
/// decoration, draw the cursor square if drawing is enabled.
pub fn render<DI>(
    display: &mut Display<DI>,
    cursor: &Cursor,
    state: SceneState,
) -> Result<(), Error<DI::Error>>
where
    DI: DisplayInterface,
{
    let border = cursor.border;
    let fb = display.framebuffer_mut();
    fb.fill(false);
    match state.decoration {
        DecorationMode::Plain => {
            fb.draw_rect(border.top, border.left, border.width, border.height, true)
        }
        DecorationMode::Hearts => {
            fb.draw_heart_border(border.top, border.left, border.width, border.height, true)
        }
    }
    if state.drawing {
        fb.draw_rect(cursor.y, cursor.x, CURSOR_SIZE, CURSOR_SIZE, true);
    }
    trace!("render {:?} at ({}, {})", state, cursor.x, cursor.y);
    display.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::AddressingMode;
    use crate::config::Config;
    use crate::display::framebuffer::Framebuffer;
    use crate::interface::test_spy::{Sent, TestSpyInterface};
    use proptest::prelude::*;

    fn display(di: &TestSpyInterface) -> Display<TestSpyInterface> {
        let mut disp = Display::new(di.split(), 128, 64, AddressingMode::Horizontal, false).unwrap();
        disp.init(Config::new()).unwrap();
        disp
    }

    fn last_frame(di: &TestSpyInterface) -> Vec<u8> {
        match di.sent().pop() {
            Some(Sent::Data(d)) => d,
            other => panic!("expected a data frame, got {:?}", other),
        }
    }

    #[test]
    fn debouncer_holds_off() {
        let d = Debouncer::new(DEBOUNCE_MS);
        assert!(d.accept(0));
        assert!(!d.accept(1));
        assert!(!d.accept(199));
        assert!(d.accept(200));
        assert!(!d.accept(399));
        assert!(d.accept(1000));
    }

    #[test]
    fn debouncer_survives_clock_wrap() {
        let d = Debouncer::new(DEBOUNCE_MS);
        assert!(d.accept(u32::MAX - 50));
        assert!(!d.accept(100));
        assert!(d.accept(150));
    }

    #[test]
    fn debouncer_first_event_always_accepted() {
        let d = Debouncer::new(DEBOUNCE_MS);
        assert!(d.accept(5));
    }

    #[test]
    fn flags_toggle() {
        static FLAGS: SceneFlags = SceneFlags::new();
        assert_eq!(
            FLAGS.snapshot(),
            SceneState {
                decoration: DecorationMode::Plain,
                drawing: true
            }
        );
        assert_eq!(FLAGS.toggle_decoration(), DecorationMode::Hearts);
        assert!(!FLAGS.toggle_drawing());
        assert_eq!(
            FLAGS.snapshot(),
            SceneState {
                decoration: DecorationMode::Hearts,
                drawing: false
            }
        );
        assert_eq!(FLAGS.toggle_decoration(), DecorationMode::Plain);
        assert!(FLAGS.toggle_drawing());
    }

    #[test]
    fn flags_toggle_from_many_writers() {
        static FLAGS: SceneFlags = SceneFlags::new();
        let writers: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    for _ in 0..1000 {
                        FLAGS.toggle_decoration();
                        FLAGS.toggle_drawing();
                    }
                })
            })
            .collect();
        for w in writers {
            w.join().unwrap();
        }
        // An even number of toggles on each flag lands back where it started.
        assert_eq!(FLAGS.snapshot(), SceneFlags::new().snapshot());
    }

    #[test]
    fn debounced_presses_drive_flags() {
        let button = Debouncer::new(DEBOUNCE_MS);
        let flags = SceneFlags::new();
        // A bouncing press at 1000ms, a second press at 1300ms, and bounce on its release.
        for &now_ms in &[1000, 1002, 1005, 1040, 1300, 1310, 1480] {
            if button.accept(now_ms) {
                flags.toggle_decoration();
            }
        }
        assert_eq!(flags.snapshot().decoration, DecorationMode::Plain);
        assert!(button.accept(1700));
        assert_eq!(flags.toggle_decoration(), DecorationMode::Hearts);
    }

    #[test]
    fn cursor_starts_centered() {
        let c = Cursor::centered(Border::default());
        assert_eq!((c.x(), c.y()), (60, 28));
    }

    #[test]
    fn cursor_moves_with_deflection() {
        let mut c = Cursor::centered(Border::default());
        c.update(JOYSTICK_CENTER, JOYSTICK_CENTER);
        assert_eq!((c.x(), c.y()), (60, 28));
        // Less than one step either way does nothing.
        c.update(2047 + 255, 2047 - 255);
        assert_eq!((c.x(), c.y()), (60, 28));
        c.update(4095, 0);
        assert_eq!((c.x(), c.y()), (68, 21));
    }

    #[test]
    fn cursor_clamped_to_border() {
        let mut c = Cursor::centered(Border::default());
        for _ in 0..100 {
            c.update(4095, 4095);
        }
        assert_eq!((c.x(), c.y()), (117, 53));
        for _ in 0..100 {
            c.update(0, 0);
        }
        assert_eq!((c.x(), c.y()), (3, 3));
    }

    #[test]
    fn cursor_on_wide_border_saturates() {
        let border = Border::new(0, 20000, 20000, 64);
        let mut c = Cursor::centered(border);
        assert_eq!((c.x(), c.y()), (29996, 28));
        c.update(4095, JOYSTICK_CENTER);
        assert_eq!((c.x(), c.y()), (30004, 28));
        for _ in 0..1000 {
            c.update(4095, JOYSTICK_CENTER);
        }
        assert_eq!((c.x(), c.y()), (i16::MAX, 28));
        assert_eq!(c.border(), border);
    }

    #[test]
    fn cursor_on_border_narrower_than_square() {
        let mut c = Cursor::centered(Border::new(10, 10, 4, 4));
        assert_eq!((c.x(), c.y()), (10, 10));
        c.update(4095, 4095);
        assert_eq!((c.x(), c.y()), (10, 10));
    }

    #[test]
    fn render_draws_cursor_border() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        let cursor = Cursor::centered(Border::new(10, 20, 40, 30));
        let state = SceneState {
            decoration: DecorationMode::Plain,
            drawing: false,
        };
        render(&mut disp, &cursor, state).unwrap();

        let mut expected = Framebuffer::new(128, 64, AddressingMode::Horizontal).unwrap();
        expected.draw_rect(10, 20, 40, 30, true);
        assert_eq!(disp.framebuffer().as_frame(), expected.as_frame());
    }

    #[test]
    fn render_plain_border_with_cursor() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        let border = Border::default();
        let cursor = Cursor::centered(border);
        let flags = SceneFlags::new();
        render(&mut disp, &cursor, flags.snapshot()).unwrap();

        let fb = disp.framebuffer();
        assert_eq!(fb.lit_count(), 356 + 28);
        assert!(fb.pixel(3, 3));
        assert!(fb.pixel(124, 60));
        assert!(fb.pixel(60, 28));
        assert!(fb.pixel(67, 35));
        assert!(!fb.pixel(61, 29));
        assert_eq!(last_frame(&di), fb.as_frame());
    }

    #[test]
    fn render_hearts_without_cursor() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        let border = Border::default();
        let cursor = Cursor::centered(border);
        let state = SceneState {
            decoration: DecorationMode::Hearts,
            drawing: false,
        };
        render(&mut disp, &cursor, state).unwrap();

        let mut expected = Framebuffer::new(128, 64, AddressingMode::Horizontal).unwrap();
        expected.draw_heart_border(3, 3, 122, 58, true);
        assert_eq!(disp.framebuffer().as_frame(), expected.as_frame());
        assert!(!disp.framebuffer().pixel(60, 28));
    }

    #[test]
    fn render_clears_previous_frame() {
        let di = TestSpyInterface::new();
        let mut disp = display(&di);
        let border = Border::default();
        let mut cursor = Cursor::centered(border);
        let flags = SceneFlags::new();
        render(&mut disp, &cursor, flags.snapshot()).unwrap();
        cursor.update(4095, JOYSTICK_CENTER);
        render(&mut disp, &cursor, flags.snapshot()).unwrap();
        let fb = disp.framebuffer();
        assert_eq!(fb.lit_count(), 356 + 28);
        assert!(!fb.pixel(60, 28));
        assert!(fb.pixel(68, 28));
    }

    proptest! {
        #[test]
        fn cursor_square_stays_inside(moves in prop::collection::vec((0u16..4096, 0u16..4096), 0..50)) {
            let border = Border::default();
            let mut c = Cursor::centered(border);
            for (x, y) in moves {
                c.update(x, y);
                prop_assert!(c.x() >= border.left);
                prop_assert!(c.y() >= border.top);
                prop_assert!(c.x() + CURSOR_SIZE <= border.left + border.width);
                prop_assert!(c.y() + CURSOR_SIZE <= border.top + border.height);
            }
        }
    }
}
