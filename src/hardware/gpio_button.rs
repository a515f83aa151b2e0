use super::traits::Button;
use embassy_stm32::gpio::{Input, Level};
use embedded_hal::digital::PinState;

/// Push button wired to ground with the internal pull-up enabled.
pub struct GpioButton<'d> {
    pin: Input<'d>,
}

impl<'d> GpioButton<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self { pin }
    }
}

impl<'d> Button for GpioButton<'d> {
    fn level(&self) -> PinState {
        match self.pin.get_level() {
            Level::Low => PinState::Low,
            Level::High => PinState::High,
        }
    }
}
