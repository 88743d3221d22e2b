//! GPIO pin abstractions
//!
//! Provides traits for the digital lines of the serial link and a wrapper
//! for the active-low select line that brackets each command.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Active-low select line
///
/// The remote device frames one command between assertion (low) and
/// deassertion (high). Construction deasserts the line so the device sees
/// an idle bus until the first command.
pub struct SelectLine<P> {
    pin: P,
}

impl<P: OutputPin> SelectLine<P> {
    /// Wrap a pin and drive it to the idle (deasserted) level
    pub fn new(mut pin: P) -> Self {
        pin.set_high();
        Self { pin }
    }

    /// Assert the line (drive low)
    pub fn assert(&mut self) {
        self.pin.set_low();
    }

    /// Deassert the line (drive high)
    pub fn deassert(&mut self) {
        self.pin.set_high();
    }

    /// Check if the line is currently asserted
    pub fn is_asserted(&self) -> bool {
        self.pin.is_set_low()
    }

    /// Release the underlying pin
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePin {
        high: bool,
        writes: u32,
    }

    impl OutputPin for FakePin {
        fn set_high(&mut self) {
            self.high = true;
            self.writes += 1;
        }

        fn set_low(&mut self) {
            self.high = false;
            self.writes += 1;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_select_line_starts_deasserted() {
        let select = SelectLine::new(FakePin {
            high: false,
            writes: 0,
        });
        assert!(!select.is_asserted());

        let pin = select.release();
        assert!(pin.high);
        assert_eq!(pin.writes, 1);
    }

    #[test]
    fn test_select_line_is_active_low() {
        let mut select = SelectLine::new(FakePin {
            high: true,
            writes: 0,
        });

        select.assert();
        assert!(select.is_asserted());
        assert!(select.release().is_set_low());
    }
}
