//! Bodies of the periodic tasks.
//!
//! Every task exposes `step`, one loop iteration ending in its timed delay,
//! and `run`, which repeats `step` forever. The firmware binaries wrap `run`
//! in an `embassy_executor::task` on the executor that matches the task's
//! priority. Tasks hold `&SharedControl` and talk to each other only
//! through it.

use embassy_sync::{blocking_mutex::raw::RawMutex, mutex::Mutex};
use embedded_graphics::draw_target::DrawTarget;
use embedded_hal::digital::PinState;
use embedded_hal_async::delay::DelayNs;

use crate::config::{BUTTON_SAMPLE_PERIOD_MS, COUNTER_PERIOD_MS, COUNTER_RACE_WINDOW_MS};
use crate::control::ControlAction;
use crate::debounce::{ButtonId, Debouncer, Releases};
use crate::hardware::traits::{Button, Led};
use crate::progress::ProgressRenderer;
use crate::shared::{CounterId, SharedControl};

/// Where the toggle sits relative to the delay. Two LEDs with different
/// phases blink with a visible lead/lag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    ToggleThenWait,
    WaitThenToggle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashPeriod {
    /// Follow the period the button task sets.
    Shared,
    Fixed(u32),
}

pub struct LedFlasher<'a, L, D> {
    led: L,
    lit: bool,
    phase: Phase,
    period: FlashPeriod,
    shared: &'a SharedControl,
    delay: D,
}

impl<'a, L: Led, D: DelayNs> LedFlasher<'a, L, D> {
    /// The LED is assumed to be off when handed over.
    pub fn new(led: L, shared: &'a SharedControl, phase: Phase, period: FlashPeriod, delay: D) -> Self {
        Self {
            led,
            lit: false,
            phase,
            period,
            shared,
            delay,
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    fn period_ms(&self) -> u32 {
        match self.period {
            FlashPeriod::Shared => self.shared.flash_period_ms(),
            FlashPeriod::Fixed(ms) => ms,
        }
    }

    fn toggle_if_flashing(&mut self) {
        if !self.shared.is_flashing() {
            return;
        }
        self.lit = !self.lit;
        if self.lit {
            self.led.on();
        } else {
            self.led.off();
        }
    }

    pub async fn step(&mut self) {
        match self.phase {
            Phase::ToggleThenWait => {
                self.toggle_if_flashing();
                self.delay.delay_ms(self.period_ms()).await;
            }
            Phase::WaitThenToggle => {
                self.delay.delay_ms(self.period_ms()).await;
                self.toggle_if_flashing();
            }
        }
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}

pub struct CounterTask<'a, M: RawMutex, T: DrawTarget, D> {
    id: CounterId,
    shared: &'a SharedControl,
    display: &'a Mutex<M, T>,
    renderer: ProgressRenderer<T::Color>,
    delay: D,
    period_ms: u32,
    race_window_ms: u32,
}

impl<'a, M: RawMutex, T: DrawTarget, D: DelayNs> CounterTask<'a, M, T, D> {
    pub fn new(
        id: CounterId,
        shared: &'a SharedControl,
        display: &'a Mutex<M, T>,
        renderer: ProgressRenderer<T::Color>,
        delay: D,
    ) -> Self {
        Self {
            id,
            shared,
            display,
            renderer,
            delay,
            period_ms: COUNTER_PERIOD_MS,
            race_window_ms: COUNTER_RACE_WINDOW_MS,
        }
    }

    pub fn with_period_ms(mut self, period_ms: u32) -> Self {
        self.period_ms = period_ms;
        self
    }

    /// Wait this long between the counter and the total increment.
    pub fn with_race_window_ms(mut self, race_window_ms: u32) -> Self {
        self.race_window_ms = race_window_ms;
        self
    }

    /// One iteration. A failed draw is returned only after the total has
    /// been updated and the delay has elapsed, so it never fakes a race.
    pub async fn step(&mut self) -> Result<(), T::Error> {
        let value = self.shared.increment_counter(self.id);
        let drawn = {
            let mut display = self.display.lock().await;
            self.renderer.render(&mut *display, self.id, value)
        };

        if self.race_window_ms > 0 {
            self.delay.delay_ms(self.race_window_ms).await;
        }
        self.shared.increment_total();

        if !self.shared.is_consistent() {
            if !self.shared.is_flashing() {
                info!(
                    "count{}: counters {} + {} != total {}",
                    self.id.number(),
                    self.shared.counter(CounterId::One),
                    self.shared.counter(CounterId::Two),
                    self.shared.total()
                );
            }
            self.shared.set_flashing(true);
        }

        self.delay.delay_ms(self.period_ms).await;
        drawn
    }

    pub async fn run(&mut self) -> ! {
        loop {
            if self.step().await.is_err() {
                warn!("count{}: display write failed", self.id.number());
            }
        }
    }
}

/// The four direction buttons, each on its own input line.
pub struct Keypad<B> {
    pub left: B,
    pub right: B,
    pub up: B,
    pub down: B,
}

impl<B: Button> Keypad<B> {
    pub fn level(&self, id: ButtonId) -> PinState {
        match id {
            ButtonId::Left => self.left.level(),
            ButtonId::Right => self.right.level(),
            ButtonId::Up => self.up.level(),
            ButtonId::Down => self.down.level(),
        }
    }
}

pub struct ButtonTask<'a, B, D> {
    keypad: Keypad<B>,
    debouncer: Debouncer,
    shared: &'a SharedControl,
    delay: D,
    period_ms: u32,
}

impl<'a, B: Button, D: DelayNs> ButtonTask<'a, B, D> {
    pub fn new(keypad: Keypad<B>, shared: &'a SharedControl, delay: D) -> Self {
        Self {
            keypad,
            debouncer: Debouncer::new(),
            shared,
            delay,
            period_ms: BUTTON_SAMPLE_PERIOD_MS,
        }
    }

    pub fn with_period_ms(mut self, period_ms: u32) -> Self {
        self.period_ms = period_ms;
        self
    }

    /// Read every button once and collect the completed presses.
    pub fn sample(&mut self) -> Releases {
        let mut releases = Releases::none();
        for id in ButtonId::ALL {
            if self.debouncer.observe(id, self.keypad.level(id)).is_some() {
                releases.insert(id);
            }
        }
        releases
    }

    pub async fn step(&mut self) -> Option<ControlAction> {
        let releases = self.sample();
        let action = ControlAction::select(&releases, self.shared.is_flashing());
        if let Some(action) = action {
            self.shared.apply(action);
            debug!(
                "buttons: {} -> flashing {} period {} ms",
                action,
                self.shared.is_flashing(),
                self.shared.flash_period_ms()
            );
        }
        self.delay.delay_ms(self.period_ms).await;
        action
    }

    pub async fn run(&mut self) -> ! {
        loop {
            self.step().await;
        }
    }
}
