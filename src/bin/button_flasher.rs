//! STM32 Blue Pill Button Flasher
//! =============================================================================================
//!
//! Two LEDs flash under the control of four push buttons. A press counts once the
//! button is let go again:
//!   LEFT  -> stop flashing
//!   RIGHT -> start flashing
//!   UP    -> flash faster (only while flashing)
//!   DOWN  -> flash slower (only while flashing)
//!
//! Hardware Connections:
//!   Buttons (to GND, internal pull-up):
//!      LEFT  -> PA0
//!      RIGHT -> PA1
//!      UP    -> PA2
//!      DOWN  -> PA3
//!
//!   LEDs:
//!      LED1 -> PC13 (onboard, active low)
//!      LED2 -> PB12 (to 3.3V through a resistor, active low)
//!
//! Task priorities (lower value preempts higher):
//!   led1 = 4, led2 = 5, buttons = 6

#![no_std] // Disable Rust standard library (required for embedded)
#![no_main] // Disable standard main interface

use cortex_m_rt::entry;
use defmt::info;
use defmt_rtt as _; // Global logger
use embassy_executor::{Executor, InterruptExecutor};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::InterruptExt;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_time::{Delay, Duration, Timer};
use panic_probe as _; // Panic handler
use static_cell::StaticCell;

use preempt_flasher::{
    config::FlashLimits,
    hardware::{gpio_button::GpioButton, gpio_led::GpioLed, priority::interrupt_priority},
    schedule::{BUTTON_FLASHER_PLAN, BUTTONS, LED1, LED2, check_plan},
    shared::SharedControl,
    tasks::{ButtonTask, FlashPeriod, Keypad, LedFlasher, Phase},
};

// Flashing flag and period, written by the button task
static SHARED: SharedControl = SharedControl::new(FlashLimits::DEFAULT);

static EXECUTOR_LED1: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LED2: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_BUTTONS: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_IDLE: StaticCell<Executor> = StaticCell::new();

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
    unsafe { EXECUTOR_BUTTONS.on_interrupt() }
}

/// Main application entry point
#[entry]
fn main() -> ! {
    let p = embassy_stm32::init(Default::default());
    info!("button flasher starting");

    check_plan(&BUTTON_FLASHER_PLAN).unwrap();

    // Buttons pull the line low while held
    let keypad = Keypad {
        left: GpioButton::new(Input::new(p.PA0, Pull::Up)),
        right: GpioButton::new(Input::new(p.PA1, Pull::Up)),
        up: GpioButton::new(Input::new(p.PA2, Pull::Up)),
        down: GpioButton::new(Input::new(p.PA3, Pull::Up)),
    };

    // LEDs start off (active low)
    let led1 = GpioLed::new(Output::new(p.PC13, Level::High, Speed::Low));
    let led2 = GpioLed::new(Output::new(p.PB12, Level::High, Speed::Low));

    interrupt::USART1.set_priority(interrupt_priority(&BUTTON_FLASHER_PLAN, &LED1).unwrap());
    let spawner = EXECUTOR_LED1.start(interrupt::USART1);
    spawner
        .spawn(led_task(LedFlasher::new(
            led1,
            &SHARED,
            Phase::ToggleThenWait,
            FlashPeriod::Shared,
            Delay,
        )))
        .unwrap();

    interrupt::USART2.set_priority(interrupt_priority(&BUTTON_FLASHER_PLAN, &LED2).unwrap());
    let spawner = EXECUTOR_LED2.start(interrupt::USART2);
    spawner
        .spawn(led_task(LedFlasher::new(
            led2,
            &SHARED,
            Phase::WaitThenToggle,
            FlashPeriod::Shared,
            Delay,
        )))
        .unwrap();

    interrupt::USART3.set_priority(interrupt_priority(&BUTTON_FLASHER_PLAN, &BUTTONS).unwrap());
    let spawner = EXECUTOR_BUTTONS.start(interrupt::USART3);
    spawner.spawn(button_task(keypad)).unwrap();

    let executor = EXECUTOR_IDLE.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(status_task()).unwrap();
    })
}

/// LED Flasher Task
///
/// Toggles its LED every shared period while flashing is enabled.
#[embassy_executor::task(pool_size = 2)]
async fn led_task(mut flasher: LedFlasher<'static, GpioLed<'static>, Delay>) {
    flasher.run().await
}

/// Button Task
///
/// Samples the keypad every 100 ms and applies at most one action per sample.
#[embassy_executor::task]
async fn button_task(keypad: Keypad<GpioButton<'static>>) {
    let mut buttons = ButtonTask::new(keypad, &SHARED, Delay);
    buttons.run().await
}

/// Status Monitor Task
///
/// Runs in thread mode below every other task and reports the control state.
#[embassy_executor::task]
async fn status_task() {
    loop {
        Timer::after(Duration::from_secs(1)).await;
        info!(
            "System status - flashing: {}, period: {} ms",
            SHARED.is_flashing(),
            SHARED.flash_period_ms()
        );
    }
}
