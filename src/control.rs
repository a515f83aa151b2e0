//! What the button task does with the releases seen in one cycle.

use crate::debounce::{ButtonId, Releases};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlAction {
    /// Stop toggling the LEDs.
    Disable,
    /// Start toggling the LEDs.
    Enable,
    /// Shorten the flash period by one step.
    Faster,
    /// Lengthen the flash period by one step.
    Slower,
}

impl ControlAction {
    /// First match wins, checked in the order LEFT, RIGHT, UP, DOWN.
    /// UP and DOWN only count while the LEDs are flashing.
    pub fn select(releases: &Releases, flashing: bool) -> Option<ControlAction> {
        if releases.contains(ButtonId::Left) {
            Some(ControlAction::Disable)
        } else if releases.contains(ButtonId::Right) {
            Some(ControlAction::Enable)
        } else if flashing && releases.contains(ButtonId::Up) {
            Some(ControlAction::Faster)
        } else if flashing && releases.contains(ButtonId::Down) {
            Some(ControlAction::Slower)
        } else {
            None
        }
    }
}
