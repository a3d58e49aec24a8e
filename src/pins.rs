use core::fmt;

/// Raw value LMIC-style pin maps use for a line that is not connected
pub const LMIC_UNUSED_PIN: u8 = 0xFF;

/// A platform GPIO number
///
/// Numbers have no meaning across boards; GPIO 13 on one platform and GPIO 13
/// on another are unrelated. Absent lines are `Option<Pin>::None`, never a
/// magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(pub u8);

impl Pin {
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Render an optional line the way a raw LMIC pin map expects it
#[must_use]
pub const fn raw(pin: Option<Pin>) -> u8 {
    match pin {
        Some(Pin(n)) => n,
        None => LMIC_UNUSED_PIN,
    }
}

/// Electrical level of a digital line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[must_use]
    pub const fn inverted(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

/// Which level switches a line's function on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Driving the line high turns it on
    High,
    /// Driving the line low turns it on
    Low,
}

impl ActiveLevel {
    /// Level to drive for the requested state
    #[must_use]
    pub const fn level(self, on: bool) -> Level {
        match (self, on) {
            (Self::High, true) | (Self::Low, false) => Level::High,
            (Self::High, false) | (Self::Low, true) => Level::Low,
        }
    }

    #[must_use]
    pub const fn on(self) -> Level {
        self.level(true)
    }

    #[must_use]
    pub const fn off(self) -> Level {
        self.level(false)
    }
}

/// Two-wire (I2C) bus lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cPins {
    pub sda: Pin,
    pub scl: Pin,
}

/// SPI bus lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiPins {
    pub sck: Pin,
    pub mosi: Pin,
    pub miso: Pin,
}
