//! End-to-end runs of the task bodies against in-memory pins, delays and frames.

use std::cell::Cell;
use std::convert::Infallible;

use embassy_futures::block_on;
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, mutex::Mutex};
use embedded_graphics::{
    image::GetPixel, mono_font::ascii::FONT_6X10, pixelcolor::BinaryColor, prelude::*,
};
use embedded_hal::digital::PinState;
use embedded_hal_async::delay::DelayNs;

use preempt_flasher::{
    control::ControlAction,
    debounce::{ButtonEvent, ButtonId, Debouncer},
    frame::Frame,
    hardware::traits::{Button, Led},
    progress::{ProgressLayout, ProgressPalette, ProgressRenderer},
    shared::{CounterId, SharedControl},
    tasks::{ButtonTask, CounterTask, FlashPeriod, Keypad, LedFlasher, Phase},
};

#[derive(Default)]
struct InstantDelay {
    total_ms: u64,
}

impl DelayNs for InstantDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ms += u64::from(ns) / 1_000_000;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

/// Button whose level is set by the test between samples.
struct HeldButton(Cell<bool>);

impl HeldButton {
    fn released() -> Self {
        Self(Cell::new(false))
    }

    fn press(&self) {
        self.0.set(true);
    }

    fn release(&self) {
        self.0.set(false);
    }
}

impl Button for HeldButton {
    fn level(&self) -> PinState {
        if self.0.get() {
            PinState::Low
        } else {
            PinState::High
        }
    }
}

#[derive(Default)]
struct CountingLed {
    lit: bool,
    toggles: u32,
}

impl Led for CountingLed {
    fn on(&mut self) {
        self.lit = true;
        self.toggles += 1;
    }

    fn off(&mut self) {
        self.lit = false;
        self.toggles += 1;
    }
}

fn renderer() -> ProgressRenderer<BinaryColor> {
    ProgressRenderer::new(
        &FONT_6X10,
        ProgressPalette::monochrome(),
        ProgressLayout::compact(&FONT_6X10),
    )
}

#[test]
fn test_left_press_reports_once_on_release() {
    let mut debouncer = Debouncer::new();
    let samples = [1u8, 1, 0, 0, 1];
    let events: Vec<_> = samples
        .iter()
        .map(|&bit| {
            let level = if bit == 0 { PinState::Low } else { PinState::High };
            debouncer.observe(ButtonId::Left, level)
        })
        .collect();
    assert_eq!(
        events,
        [None, None, None, None, Some(ButtonEvent::PressReleased)]
    );
}

#[test]
fn test_six_decreases_step_period_down_by_fifty() {
    let shared = SharedControl::default();
    shared.set_flashing(true);
    let periods: Vec<u32> = (0..6).map(|_| shared.shorten_flash_period()).collect();
    assert_eq!(periods, [450, 400, 350, 300, 250, 200]);
}

#[test]
fn test_button_session_drives_leds() {
    let shared = SharedControl::default();
    let left = HeldButton::released();
    let right = HeldButton::released();
    let up = HeldButton::released();
    let down = HeldButton::released();
    let keypad = Keypad {
        left: &left,
        right: &right,
        up: &up,
        down: &down,
    };
    let mut buttons = ButtonTask::new(keypad, &shared, InstantDelay::default());
    let mut led = CountingLed::default();
    let mut flasher = LedFlasher::new(
        &mut led,
        &shared,
        Phase::ToggleThenWait,
        FlashPeriod::Shared,
        InstantDelay::default(),
    );

    block_on(async {
        // Nothing flashes before RIGHT.
        flasher.step().await;
        assert!(!flasher.is_lit());

        right.press();
        assert_eq!(buttons.step().await, None);
        right.release();
        assert_eq!(buttons.step().await, Some(ControlAction::Enable));

        flasher.step().await;
        assert!(flasher.is_lit());

        // DOWN twice: 500 -> 550 -> 600.
        for _ in 0..2 {
            down.press();
            buttons.step().await;
            down.release();
            assert_eq!(buttons.step().await, Some(ControlAction::Slower));
        }
        assert_eq!(shared.flash_period_ms(), 600);

        // LEFT and RIGHT released together: LEFT wins.
        left.press();
        right.press();
        buttons.step().await;
        left.release();
        right.release();
        assert_eq!(buttons.step().await, Some(ControlAction::Disable));

        flasher.step().await;
        flasher.step().await;
    });

    assert!(!shared.is_flashing());
    drop(flasher);
    assert!(led.lit);
    assert_eq!(led.toggles, 1);
}

#[test]
fn test_sequential_counters_never_flash() {
    let shared = SharedControl::default();
    let frame: Mutex<NoopRawMutex, Frame> = Mutex::new(Frame::new());
    let mut one = CounterTask::new(CounterId::One, &shared, &frame, renderer(), InstantDelay::default());
    let mut two = CounterTask::new(CounterId::Two, &shared, &frame, renderer(), InstantDelay::default());

    block_on(async {
        for _ in 0..500 {
            let result: Result<(), Infallible> = one.step().await;
            result.unwrap();
            two.step().await.unwrap();
            let count = shared.counter(CounterId::One);
            assert_eq!(count, shared.counter(CounterId::Two));
            assert_eq!(count, shared.total() / 2);
            assert!(!shared.is_flashing());
        }
    });

    assert_eq!(shared.counter(CounterId::One), 500);
    assert_eq!(shared.counter(CounterId::Two), 500);
    assert_eq!(shared.total(), 1000);
    assert!(!shared.is_flashing());
}

#[test]
fn test_lost_total_update_trips_flashing_for_good() {
    let shared = SharedControl::default();
    let frame: Mutex<NoopRawMutex, Frame> = Mutex::new(Frame::new());
    let mut one = CounterTask::new(CounterId::One, &shared, &frame, renderer(), InstantDelay::default());
    let mut two = CounterTask::new(CounterId::Two, &shared, &frame, renderer(), InstantDelay::default());

    // A counter increment whose total increment never lands.
    shared.increment_counter(CounterId::Two);

    block_on(async {
        one.step().await.unwrap();
        assert!(shared.is_flashing());
        for _ in 0..20 {
            one.step().await.unwrap();
            two.step().await.unwrap();
        }
    });
    assert!(shared.is_flashing());
}

#[test]
fn test_counter_bars_land_on_frame() {
    let shared = SharedControl::default();
    let frame: Mutex<NoopRawMutex, Frame> = Mutex::new(Frame::new());
    let mut one = CounterTask::new(CounterId::One, &shared, &frame, renderer(), InstantDelay::default());

    block_on(async {
        for _ in 0..250 {
            one.step().await.unwrap();
        }
    });

    let frame = block_on(frame.lock());
    let layout = *renderer().layout();
    let row = (layout.band_height + layout.bar_offset) as i32;
    // 250 of 1000 fills a quarter of the bar plus the leading pixel.
    let lit = (0..layout.bar_width as i32)
        .filter(|dx| frame.pixel(Point::new(layout.bar_x + dx, row)) == Some(BinaryColor::On))
        .count();
    assert_eq!(lit, 26);
}
