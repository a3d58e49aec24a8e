//! Status LED that honours the board's active level
//!
//! Callers say on or off; the descriptor's [`ActiveLevel`] decides which
//! electrical level that is, so an active-low LED needs no special casing.

use embedded_hal::digital::OutputPin;

use crate::descriptor::Indicator;
use crate::pins::{ActiveLevel, Level};

pub struct StatusLed<P> {
    pin: P,
    active: ActiveLevel,
    on: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Wrap `pin` and switch the LED off
    ///
    /// `pin` must be the GPIO named by `indicator.pin`.
    ///
    /// # Errors
    ///
    /// Propagates the pin's error.
    pub fn new(pin: P, indicator: Indicator) -> Result<Self, P::Error> {
        let mut led = Self {
            pin,
            active: indicator.active,
            on: false,
        };
        led.set(false)?;
        Ok(led)
    }

    /// # Errors
    ///
    /// Propagates the pin's error.
    pub fn set(&mut self, on: bool) -> Result<(), P::Error> {
        match self.active.level(on) {
            Level::High => self.pin.set_high()?,
            Level::Low => self.pin.set_low()?,
        }
        self.on = on;
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates the pin's error.
    pub fn on(&mut self) -> Result<(), P::Error> {
        self.set(true)
    }

    /// # Errors
    ///
    /// Propagates the pin's error.
    pub fn off(&mut self) -> Result<(), P::Error> {
        self.set(false)
    }

    /// # Errors
    ///
    /// Propagates the pin's error.
    pub fn toggle(&mut self) -> Result<(), P::Error> {
        self.set(!self.on)
    }

    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.on
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::Pin;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct FakePin {
        high: Option<bool>,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = Some(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = Some(true);
            Ok(())
        }
    }

    #[test]
    fn test_active_high_led() {
        let indicator = Indicator {
            pin: Pin(25),
            active: ActiveLevel::High,
        };
        let mut led = StatusLed::new(FakePin::default(), indicator).unwrap();
        assert!(!led.is_on());
        led.on().unwrap();
        assert!(led.is_on());
        assert_eq!(led.release().high, Some(true));
    }

    #[test]
    fn test_active_low_led_is_inverted() {
        let indicator = Indicator {
            pin: Pin(2),
            active: ActiveLevel::Low,
        };
        let mut led = StatusLed::new(FakePin::default(), indicator).unwrap();
        // Constructed off, which is high for an active-low LED
        assert_eq!(led.pin.high, Some(true));
        led.toggle().unwrap();
        assert_eq!(led.pin.high, Some(false));
        led.toggle().unwrap();
        assert!(!led.is_on());
        assert_eq!(led.release().high, Some(true));
    }
}
