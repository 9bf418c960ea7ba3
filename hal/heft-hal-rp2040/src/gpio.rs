//! GPIO lines for bit-banged peripherals
//!
//! Wraps an embassy `Flex` pin so the owning driver decides the direction
//! and pull configuration once, at construction time.

use embassy_rp::gpio::{Flex, Pin, Pull as RpPull};
use embassy_rp::Peri;
use heft_hal::{InputPin, OutputPin, Pull};

/// A GPIO line whose role is configured by its driver
pub struct FlexPin<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexPin<'d> {
    /// Take ownership of a GPIO pin
    ///
    /// The pin stays in its reset state until the driver configures it.
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Flex::new(pin),
        }
    }
}

fn to_rp_pull(pull: Pull) -> RpPull {
    match pull {
        Pull::None => RpPull::None,
        Pull::Up => RpPull::Up,
        Pull::Down => RpPull::Down,
    }
}

impl OutputPin for FlexPin<'_> {
    fn configure_output(&mut self) {
        self.pin.set_low();
        self.pin.set_as_output();
    }

    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

impl InputPin for FlexPin<'_> {
    fn configure_input(&mut self, pull: Pull) {
        self.pin.set_as_input();
        self.pin.set_pull(to_rp_pull(pull));
    }

    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}
