//! Platform bus capability
//!
//! The handful of global reconfigurations board bring-up needs. Every call
//! changes shared platform state that later peripheral constructors pick up;
//! nothing is stored on the caller's side.

use crate::pins::{I2cPins, Level, Pin};
use crate::platform::Result;

/// Shared bus and pin configuration
///
/// # Ordering
///
/// Calls are only made from a board's hardware and post-serial phases,
/// before any bus user exists. Implementations may assume a single thread
/// and no concurrent access.
pub trait PlatformBus {
    /// Bind the two-wire bus to `pins`
    ///
    /// The binding is remembered, so a driver that later starts the bus
    /// without naming pins gets these rather than the platform defaults.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidPin` if the platform validates pin
    /// legality and either line cannot carry I2C.
    fn bind_i2c(&mut self, pins: I2cPins) -> Result<()>;

    /// Move the SPI clock line to `sck`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidPin` if `sck` cannot carry the SPI
    /// clock.
    fn relocate_spi_sck(&mut self, sck: Pin) -> Result<()>;

    /// Configure `pin` as an output and drive it to `level`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidPin` if `pin` cannot be an output.
    fn drive_output(&mut self, pin: Pin, level: Level) -> Result<()>;
}

impl<T: PlatformBus + ?Sized> PlatformBus for &mut T {
    fn bind_i2c(&mut self, pins: I2cPins) -> Result<()> {
        (**self).bind_i2c(pins)
    }

    fn relocate_spi_sck(&mut self, sck: Pin) -> Result<()> {
        (**self).relocate_spi_sck(sck)
    }

    fn drive_output(&mut self, pin: Pin, level: Level) -> Result<()> {
        (**self).drive_output(pin, level)
    }
}
