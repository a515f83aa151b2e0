use embedded_hal::digital::PinState;

pub trait Led {
    fn on(&mut self);
    fn off(&mut self);
}

/// Raw, undebounced input line. Active-low: `PinState::Low` is pressed.
pub trait Button {
    fn level(&self) -> PinState;
}

impl<L: Led + ?Sized> Led for &mut L {
    fn on(&mut self) {
        L::on(self)
    }

    fn off(&mut self) {
        L::off(self)
    }
}

impl<B: Button + ?Sized> Button for &B {
    fn level(&self) -> PinState {
        B::level(self)
    }
}
