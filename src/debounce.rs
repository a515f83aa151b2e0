//! Press-then-release edge detection for the four direction buttons.
//!
//! Buttons are active-low: `PinState::Low` means pressed. There is no
//! bounce interval; the sampling period of the caller does the filtering.

use embedded_hal::digital::PinState;

pub const BUTTON_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Left,
    Right,
    Up,
    Down,
}

impl ButtonId {
    pub const ALL: [ButtonId; BUTTON_COUNT] =
        [ButtonId::Left, ButtonId::Right, ButtonId::Up, ButtonId::Down];

    const fn index(self) -> usize {
        match self {
            ButtonId::Left => 0,
            ButtonId::Right => 1,
            ButtonId::Up => 2,
            ButtonId::Down => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// The button went down at some earlier sample and is up now.
    PressReleased,
}

/// Last sample seen per button.
#[derive(Debug)]
pub struct Debouncer {
    last: [PinState; BUTTON_COUNT],
}

impl Debouncer {
    /// All buttons start released.
    pub const fn new() -> Self {
        Self {
            last: [PinState::High; BUTTON_COUNT],
        }
    }

    /// Feed one raw sample. Returns an event only on the low-to-high edge.
    pub fn observe(&mut self, button: ButtonId, sample: PinState) -> Option<ButtonEvent> {
        let slot = &mut self.last[button.index()];
        let event = (*slot == PinState::Low && sample == PinState::High)
            .then_some(ButtonEvent::PressReleased);
        *slot = sample;
        event
    }

    pub fn reset(&mut self) {
        self.last = [PinState::High; BUTTON_COUNT];
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

/// Buttons released during one sampling cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Releases {
    bits: u8,
}

impl Releases {
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    pub fn insert(&mut self, button: ButtonId) {
        self.bits |= 1 << button.index();
    }

    pub const fn contains(&self, button: ButtonId) -> bool {
        self.bits & (1 << button.index()) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

impl FromIterator<ButtonId> for Releases {
    fn from_iter<I: IntoIterator<Item = ButtonId>>(iter: I) -> Self {
        let mut releases = Releases::none();
        for button in iter {
            releases.insert(button);
        }
        releases
    }
}
