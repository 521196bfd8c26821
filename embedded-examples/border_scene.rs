//! Full example code for driving a 128x64 SSD1306 module over I2C. This runs on an STM32F303RE
//! Nucleo board, with the module on I2C1 (PB6 SCL, PB7 SDA) at the default address 0x3C.
//!
//! The user button (PC13) switches between the plain and the heart border, and a second button
//! on PA1 shows or hides the cursor square, which drifts toward the lower right corner and stops
//! at the border. Both buttons pull their pin low and go through a 200ms debouncer.
//!
//! The framebuffer is allocated once by `Display::new`, so the binary needs a global allocator;
//! `embedded-alloc` provides one over a small static heap.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_alloc;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate ssd1306;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use embedded_alloc::LlffHeap as Heap;
use hal::i2c::I2c;
use hal::prelude::*;
use hal_api::digital::InputPin;
use ssd1306 as oled;
use ssd1306::scene::{self, Border, Cursor, Debouncer, SceneFlags, DEBOUNCE_MS};

#[global_allocator]
static HEAP: Heap = Heap::empty();

// A 128x64 framebuffer is 1025 bytes.
const HEAP_SIZE: usize = 2 * 1024;

const FRAME_MS: u32 = 40;

static FLAGS: SceneFlags = SceneFlags::new();
static DECORATION_BUTTON: Debouncer = Debouncer::new(DEBOUNCE_MS);
static DRAWING_BUTTON: Debouncer = Debouncer::new(DEBOUNCE_MS);

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

#[allow(unsafe_code)]
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

fn main() -> ! {
    init_heap();

    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    // I2C1 is Alternate Function 4 for GPIOs PB6,7.
    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);
    let scl = gpiob.pb6.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let sda = gpiob.pb7.into_af4(&mut gpiob.moder, &mut gpiob.afrl);
    let i2c = I2c::i2c1(dp.I2C1, (scl, sda), 400.khz(), clocks, &mut rcc.apb1);

    // Buttons, both active low.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);
    let mut gpioc = dp.GPIOC.split(&mut rcc.ahb);
    let decoration_pin = gpioc
        .pc13
        .into_pull_up_input(&mut gpioc.moder, &mut gpioc.pupdr);
    let drawing_pin = gpioa
        .pa1
        .into_pull_up_input(&mut gpioa.moder, &mut gpioa.pupdr);

    // Create the I2cInterface and Display.
    let mut disp = oled::Display::new(
        oled::I2cInterface::new(i2c, oled::interface::i2c::DEFAULT_ADDRESS),
        128,
        64,
        oled::AddressingMode::Horizontal,
        false,
    )
    .unwrap();
    disp.init(oled::Config::new()).unwrap();

    let mut cursor = Cursor::centered(Border::default());
    let mut now_ms: u32 = 0;
    let (mut decoration_was_down, mut drawing_was_down) = (false, false);

    loop {
        // Falling edges stand in for the EXTI interrupts; the debouncers and flags are the same
        // ones an interrupt handler would use.
        let decoration_down = decoration_pin.is_low();
        if decoration_down && !decoration_was_down && DECORATION_BUTTON.accept(now_ms) {
            FLAGS.toggle_decoration();
        }
        decoration_was_down = decoration_down;

        let drawing_down = drawing_pin.is_low();
        if drawing_down && !drawing_was_down && DRAWING_BUTTON.accept(now_ms) {
            FLAGS.toggle_drawing();
        }
        drawing_was_down = drawing_down;

        // Stand-in for a joystick held slightly down and to the right.
        cursor.update(2047 + 300, 2047 + 300);
        scene::render(&mut disp, &cursor, FLAGS.snapshot()).unwrap();

        delay.delay_ms(FRAME_MS as u16);
        now_ms = now_ms.wrapping_add(FRAME_MS);
    }
}
