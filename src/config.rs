//! Tunable constants shared by both firmware variants.
//!
//! Periods are in milliseconds. Changing any of them changes which races
//! show up in the counter display, so keep the relative values intact.

use crate::schedule::hmsm;

/// Shortest half-period the button task can select.
pub const FLASH_MIN_DELAY_MS: u32 = 100;
/// Longest half-period the button task can select.
pub const FLASH_MAX_DELAY_MS: u32 = 1000;
/// Amount one UP/DOWN release moves the half-period.
pub const FLASH_DELAY_STEP_MS: u32 = 50;
/// Half-period in effect at power-up.
pub const FLASH_INITIAL_DELAY_MS: u32 = 500;

/// Button sampling period. Must stay well below a human press duration.
pub const BUTTON_SAMPLE_PERIOD_MS: u32 = 100;

/// Toggle interval of the LED tasks in the counter display variant.
pub const LED_FIXED_PERIOD_MS: u32 = hmsm(0, 0, 0, 500);

/// Pause between two counter iterations.
pub const COUNTER_PERIOD_MS: u32 = hmsm(0, 0, 0, 2);

/// Extra wait between a counter increment and the matching total increment.
/// Zero leaves only the draw in between.
pub const COUNTER_RACE_WINDOW_MS: u32 = 0;

/// How often the frame buffer is pushed to the panel.
pub const DISPLAY_REFRESH_MS: u32 = 50;

/// Counter values wrap on the progress bar at this modulus.
pub const PROGRESS_MODULUS: u32 = 1000;

/// Width of the progress bar in pixels.
pub const PROGRESS_BAR_WIDTH: u32 = 100;

/// Bounds and step for the shared flash period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlashLimits {
    pub min_ms: u32,
    pub max_ms: u32,
    pub step_ms: u32,
    pub initial_ms: u32,
}

impl FlashLimits {
    pub const DEFAULT: Self = Self {
        min_ms: FLASH_MIN_DELAY_MS,
        max_ms: FLASH_MAX_DELAY_MS,
        step_ms: FLASH_DELAY_STEP_MS,
        initial_ms: FLASH_INITIAL_DELAY_MS,
    };

    /// Clamp a candidate period into `[min_ms, max_ms]`.
    pub const fn clamp(&self, period_ms: u32) -> u32 {
        if period_ms < self.min_ms {
            self.min_ms
        } else if period_ms > self.max_ms {
            self.max_ms
        } else {
            period_ms
        }
    }
}

impl Default for FlashLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
