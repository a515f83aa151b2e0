//! Board I/O behind the `Led` and `Button` capabilities.

pub mod traits;

#[cfg(feature = "firmware")]
pub mod gpio_button;
#[cfg(feature = "firmware")]
pub mod gpio_led;
#[cfg(feature = "firmware")]
pub mod priority;
