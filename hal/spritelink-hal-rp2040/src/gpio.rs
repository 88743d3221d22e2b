//! GPIO newtypes
//!
//! Bridges embassy-rp pins to the `spritelink-hal` pin traits.

use embassy_rp::gpio::{Input, Output};
use spritelink_hal::{InputPin, OutputPin};

/// Push-pull output
pub struct GpioOutput<'d>(Output<'d>);

/// Select line of the link, wrapped by [`spritelink_hal::SelectLine`]
pub type SelectPin<'d> = GpioOutput<'d>;

impl<'d> GpioOutput<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self(pin)
    }

    pub fn into_inner(self) -> Output<'d> {
        self.0
    }
}

impl OutputPin for GpioOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Input, used for MISO when the link is bit-banged
pub struct GpioInput<'d>(Input<'d>);

impl<'d> GpioInput<'d> {
    pub fn new(pin: Input<'d>) -> Self {
        Self(pin)
    }

    pub fn into_inner(self) -> Input<'d> {
        self.0
    }
}

impl InputPin for GpioInput<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}
