//! Flags and counters every task reads and writes.
//!
//! Each field is its own atomic cell, so a single read or write is never
//! torn. Nothing makes a group of writes atomic: a counter increment and
//! the matching total increment are two separate stores, and a task that
//! preempts between them sees `counters != total`. The counter display
//! variant turns that mismatch into its flashing trigger.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::config::FlashLimits;
use crate::control::ControlAction;

pub const COUNTER_COUNT: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CounterId {
    One,
    Two,
}

impl CounterId {
    pub const ALL: [CounterId; COUNTER_COUNT] = [CounterId::One, CounterId::Two];

    /// Number shown in the label, also the display row.
    pub const fn number(self) -> u8 {
        match self {
            CounterId::One => 1,
            CounterId::Two => 2,
        }
    }

    const fn index(self) -> usize {
        self.number() as usize - 1
    }
}

pub struct SharedControl {
    flashing: AtomicBool,
    flash_period_ms: AtomicU32,
    counters: [AtomicU32; COUNTER_COUNT],
    total: AtomicU32,
    limits: FlashLimits,
}

impl SharedControl {
    pub const fn new(limits: FlashLimits) -> Self {
        Self {
            flashing: AtomicBool::new(false),
            flash_period_ms: AtomicU32::new(limits.clamp(limits.initial_ms)),
            counters: [AtomicU32::new(0), AtomicU32::new(0)],
            total: AtomicU32::new(0),
            limits,
        }
    }

    pub fn is_flashing(&self) -> bool {
        self.flashing.load(Ordering::Relaxed)
    }

    pub fn set_flashing(&self, flashing: bool) {
        self.flashing.store(flashing, Ordering::Relaxed);
    }

    pub fn flash_period_ms(&self) -> u32 {
        self.flash_period_ms.load(Ordering::Relaxed)
    }

    pub fn limits(&self) -> &FlashLimits {
        &self.limits
    }

    /// Shorten the period by one step, stopping at the minimum.
    pub fn shorten_flash_period(&self) -> u32 {
        let next = self
            .limits
            .clamp(self.flash_period_ms().saturating_sub(self.limits.step_ms));
        self.flash_period_ms.store(next, Ordering::Relaxed);
        next
    }

    /// Lengthen the period by one step, stopping at the maximum.
    pub fn lengthen_flash_period(&self) -> u32 {
        let next = self
            .limits
            .clamp(self.flash_period_ms().saturating_add(self.limits.step_ms));
        self.flash_period_ms.store(next, Ordering::Relaxed);
        next
    }

    pub fn apply(&self, action: ControlAction) {
        match action {
            ControlAction::Disable => self.set_flashing(false),
            ControlAction::Enable => self.set_flashing(true),
            ControlAction::Faster => {
                self.shorten_flash_period();
            }
            ControlAction::Slower => {
                self.lengthen_flash_period();
            }
        }
    }

    pub fn counter(&self, id: CounterId) -> u32 {
        self.counters[id.index()].load(Ordering::Relaxed)
    }

    /// Bump one counter and return its new value. Does not touch the total.
    pub fn increment_counter(&self, id: CounterId) -> u32 {
        self.counters[id.index()]
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1)
    }

    pub fn total(&self) -> u32 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn increment_total(&self) -> u32 {
        self.total.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// `counters[One] + counters[Two] == total`, read field by field.
    pub fn is_consistent(&self) -> bool {
        let sum = CounterId::ALL
            .iter()
            .fold(0u32, |sum, id| sum.wrapping_add(self.counter(*id)));
        sum == self.total()
    }
}

impl Default for SharedControl {
    fn default() -> Self {
        Self::new(FlashLimits::DEFAULT)
    }
}
