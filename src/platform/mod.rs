//! Platform abstraction used during bring-up
//!
//! Bus pin assignment and clock-line ownership are process-wide hardware
//! state. Boards only touch that state through [`PlatformBus`], so tests can
//! swap the real registers for the recording stub in [`mock`].

pub mod bus;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use bus::PlatformBus;
pub use error::{PlatformError, Result};
