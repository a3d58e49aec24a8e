//! Platform error types

use core::fmt;

use crate::pins::Pin;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Errors a platform reports while reconfiguring pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Pin cannot carry the requested function on this platform
    InvalidPin(Pin),
    /// Pin is already owned by another peripheral
    PinInUse(Pin),
    /// Platform cannot perform this reconfiguration at all
    Unsupported,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(pin) => write!(f, "{pin} cannot be used for this function"),
            Self::PinInUse(pin) => write!(f, "{pin} is already in use"),
            Self::Unsupported => write!(f, "reconfiguration not supported by platform"),
        }
    }
}
