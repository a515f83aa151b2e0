//! Preemptive LED flasher and counter display for the STM32F103 "Blue Pill".
//!
//! Tasks share a handful of flags and counters through [`shared::SharedControl`]
//! and nothing else. This library holds everything that does not touch the
//! board directly, so it builds and tests on the host:
//!
//! ```bash
//! cargo test
//! ```
//!
//! The firmware binaries in `src/bin` add the board bring-up and need the
//! `firmware` feature:
//!
//! ```bash
//! cargo run --release --target thumbv7m-none-eabi --features firmware --bin counter_display
//! cargo run --release --target thumbv7m-none-eabi --features firmware --bin button_flasher
//! ```

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to the modules below.
mod fmt;

pub mod config;
pub mod control;
pub mod debounce;
pub mod frame;
pub mod hardware;
pub mod progress;
pub mod schedule;
pub mod shared;
pub mod tasks;

#[cfg(test)]
mod testing;
