//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs. Level changes and reads are assumed to complete in
//! negligible, deterministic time.

/// Input pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating input
    #[default]
    None,
    /// Internal pull-up enabled
    Up,
    /// Internal pull-down enabled
    Down,
}

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Configure the line as a push-pull output
    ///
    /// Called once by the owning driver at construction. Pins handed over
    /// already configured can keep the default no-op.
    fn configure_output(&mut self) {}

    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Configure the line as an input with the given pull resistor
    ///
    /// Called once by the owning driver at construction.
    fn configure_input(&mut self, _pull: Pull) {}

    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
        configured: Option<Pull>,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    impl InputPin for MockPin {
        fn configure_input(&mut self, pull: Pull) {
            self.configured = Some(pull);
        }

        fn is_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_is_low_default() {
        let mut pin = MockPin {
            high: true,
            configured: None,
        };
        assert!(!InputPin::is_low(&pin));

        pin.set_low();
        assert!(!OutputPin::is_set_high(&pin));
        assert!(InputPin::is_low(&pin));
    }

    #[test]
    fn test_configure_defaults() {
        let mut pin = MockPin {
            high: false,
            configured: None,
        };

        // Output configuration is a no-op unless overridden
        pin.configure_output();
        assert!(pin.configured.is_none());

        pin.configure_input(Pull::Up);
        assert_eq!(pin.configured, Some(Pull::Up));
    }
}
