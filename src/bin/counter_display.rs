//! STM32 Blue Pill Counter Display
//! =============================================================================================
//!
//! Two counter tasks race each other on a shared total while two LED tasks wait for the
//! race to show. Each counter is drawn as a label plus progress bar on an SSD1306 OLED.
//! The first time a counter task sees `count1 + count2 != total`, both LEDs start
//! flashing and keep flashing until power-off.
//!
//! Hardware Connections:
//!   OLED Display -> Blue Pill
//!      GND  -> GND
//!      VCC  -> 5V
//!      SDA  -> PB7 (I2C1)
//!      SCL  -> PB6 (I2C1)
//!
//!   LEDs:
//!      LED1 -> PC13 (onboard, active low)
//!      LED2 -> PB12 (to 3.3V through a resistor, active low)
//!
//! Task priorities (lower value preempts higher):
//!   led1 = 4, led2 = 5, count1 = 6, count2 = 7
//! Each task runs alone on an interrupt executor; thread mode only refreshes the panel.

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Disable standard main interface

use cortex_m_rt::entry;
use defmt::{info, warn};
use defmt_rtt as _; // Global logger
use embassy_executor::{Executor, InterruptExecutor};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::InterruptExt;
use embassy_stm32::{
    gpio::{Level, Output, Speed},
    i2c::I2c,
    mode::Blocking,
    time::Hertz,
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use embassy_time::{Delay, Duration, Ticker};
use embedded_graphics::{mono_font::ascii::FONT_6X10, pixelcolor::BinaryColor};
use panic_probe as _; // Panic handler
use ssd1306::{I2CDisplayInterface, Ssd1306, mode::BufferedGraphicsMode, prelude::*};
use static_cell::StaticCell;

use preempt_flasher::{
    config::{DISPLAY_REFRESH_MS, FlashLimits, LED_FIXED_PERIOD_MS},
    frame::{Frame, blit},
    hardware::{gpio_led::GpioLed, priority::interrupt_priority},
    progress::{ProgressLayout, ProgressPalette, ProgressRenderer},
    schedule::{COUNT1, COUNT2, COUNTER_DISPLAY_PLAN, LED1, LED2, check_plan},
    shared::{CounterId, SharedControl},
    tasks::{CounterTask, FlashPeriod, LedFlasher, Phase},
};

type Screen = Ssd1306<
    I2CInterface<I2c<'static, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;
type SharedFrame = Mutex<CriticalSectionRawMutex, Frame>;

// Flags and counters shared by every task
static SHARED: SharedControl = SharedControl::new(FlashLimits::DEFAULT);

// Off-screen frame the counter tasks draw into
static FRAME: StaticCell<SharedFrame> = StaticCell::new();

// One executor per priority level
static EXECUTOR_LED1: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LED2: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_COUNT1: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_COUNT2: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_IDLE: StaticCell<Executor> = StaticCell::new();

// Unused peripheral interrupts donate their vectors to the executors
#[interrupt]
unsafe fn USART1() {
    unsafe { EXECUTOR_LED1.on_interrupt() }
}

#[interrupt]
unsafe fn USART2() {
    unsafe { EXECUTOR_LED2.on_interrupt() }
}

#[interrupt]
unsafe fn USART3() {
    unsafe { EXECUTOR_COUNT1.on_interrupt() }
}

#[interrupt]
unsafe fn SPI1() {
    unsafe { EXECUTOR_COUNT2.on_interrupt() }
}

fn renderer() -> ProgressRenderer<BinaryColor> {
    ProgressRenderer::new(
        &FONT_6X10,
        ProgressPalette::monochrome(),
        ProgressLayout::compact(&FONT_6X10),
    )
}

/// Main application entry point
#[entry]
fn main() -> ! {
    // Initialize peripherals with default configuration
    let p = embassy_stm32::init(Default::default());
    info!("counter display starting");

    check_plan(&COUNTER_DISPLAY_PLAN).unwrap();

    // Configure I2C1 at 400kHz for the OLED (PB6: SCL, PB7: SDA)
    let i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, Hertz::khz(400), Default::default());
    let interface = I2CDisplayInterface::new(i2c);
    let mut screen: Screen = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    screen.init().unwrap();

    // Blank frame, pushed once so the panel starts clean
    let mut frame = Frame::new();
    renderer().clear(&mut frame).unwrap();
    blit(&frame, &mut screen).unwrap();
    screen.flush().unwrap();
    let frame: &'static SharedFrame = FRAME.init(Mutex::new(frame));

    // LEDs start off (active low)
    let led1 = GpioLed::new(Output::new(p.PC13, Level::High, Speed::Low));
    let led2 = GpioLed::new(Output::new(p.PB12, Level::High, Speed::Low));

    // LED1: toggle, then wait
    interrupt::USART1.set_priority(interrupt_priority(&COUNTER_DISPLAY_PLAN, &LED1).unwrap());
    let spawner = EXECUTOR_LED1.start(interrupt::USART1);
    spawner
        .spawn(led_task(LedFlasher::new(
            led1,
            &SHARED,
            Phase::ToggleThenWait,
            FlashPeriod::Fixed(LED_FIXED_PERIOD_MS),
            Delay,
        )))
        .unwrap();

    // LED2: wait, then toggle
    interrupt::USART2.set_priority(interrupt_priority(&COUNTER_DISPLAY_PLAN, &LED2).unwrap());
    let spawner = EXECUTOR_LED2.start(interrupt::USART2);
    spawner
        .spawn(led_task(LedFlasher::new(
            led2,
            &SHARED,
            Phase::WaitThenToggle,
            FlashPeriod::Fixed(LED_FIXED_PERIOD_MS),
            Delay,
        )))
        .unwrap();

    interrupt::USART3.set_priority(interrupt_priority(&COUNTER_DISPLAY_PLAN, &COUNT1).unwrap());
    let spawner = EXECUTOR_COUNT1.start(interrupt::USART3);
    spawner.spawn(counter_task(CounterId::One, frame)).unwrap();

    interrupt::SPI1.set_priority(interrupt_priority(&COUNTER_DISPLAY_PLAN, &COUNT2).unwrap());
    let spawner = EXECUTOR_COUNT2.start(interrupt::SPI1);
    spawner.spawn(counter_task(CounterId::Two, frame)).unwrap();

    // Thread mode: lowest priority, keeps the panel in sync with the frame
    let executor = EXECUTOR_IDLE.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(refresh_task(screen, frame)).unwrap();
    })
}

/// LED Flasher Task
///
/// Toggles its LED every fixed interval once any counter task has set the
/// flashing flag.
#[embassy_executor::task(pool_size = 2)]
async fn led_task(mut flasher: LedFlasher<'static, GpioLed<'static>, Delay>) {
    flasher.run().await
}

/// Counter Task
///
/// Responsibilities:
/// 1. Increment its own counter and draw it
/// 2. Increment the shared total
/// 3. Start the LEDs flashing when counters and total disagree
#[embassy_executor::task(pool_size = 2)]
async fn counter_task(id: CounterId, frame: &'static SharedFrame) {
    let mut counter = CounterTask::new(id, &SHARED, frame, renderer(), Delay);
    counter.run().await
}

/// Display Refresh Task
///
/// Copies the shared frame into the SSD1306 buffer and flushes it over I2C.
#[embassy_executor::task]
async fn refresh_task(mut screen: Screen, frame: &'static SharedFrame) {
    let mut ticker = Ticker::every(Duration::from_millis(DISPLAY_REFRESH_MS as u64));

    loop {
        {
            let frame = frame.lock().await;
            if blit(&frame, &mut screen).is_err() {
                warn!("frame copy failed");
            }
        }

        // Update physical display
        if let Err(e) = screen.flush() {
            warn!("display flush failed: {}", defmt::Debug2Format(&e));
        }

        ticker.next().await;
    }
}
