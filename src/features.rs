//! Firmware build toggles
//!
//! The toggles are Cargo features, but everything in this crate takes them as
//! a [`Features`] value so a test can exercise a board with its display on and
//! off in the same build.

/// Which optional parts of the firmware are compiled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
    /// Host serial channel
    pub serial: bool,
    /// Status LED
    pub led: bool,
    /// External display
    pub display: bool,
    /// MCCI LMIC radio driver, which takes the extra calibration fields
    pub mcci_lmic: bool,
}

impl Features {
    /// The toggles this crate was compiled with
    pub const BUILD: Self = Self {
        serial: cfg!(feature = "serial"),
        led: cfg!(feature = "led"),
        display: cfg!(feature = "display"),
        mcci_lmic: cfg!(feature = "mcci-lmic"),
    };

    /// Nothing optional enabled
    pub const NONE: Self = Self {
        serial: false,
        led: false,
        display: false,
        mcci_lmic: false,
    };

    /// Everything optional enabled
    pub const ALL: Self = Self {
        serial: true,
        led: true,
        display: true,
        mcci_lmic: true,
    };

    #[must_use]
    pub const fn with_serial(mut self, on: bool) -> Self {
        self.serial = on;
        self
    }

    #[must_use]
    pub const fn with_led(mut self, on: bool) -> Self {
        self.led = on;
        self
    }

    #[must_use]
    pub const fn with_display(mut self, on: bool) -> Self {
        self.display = on;
        self
    }

    #[must_use]
    pub const fn with_mcci_lmic(mut self, on: bool) -> Self {
        self.mcci_lmic = on;
        self
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::BUILD
    }
}
