#![cfg_attr(not(any(test, feature = "mock")), no_std)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

//! Board support for LoRaWAN end-node firmware
//!
//! Every supported board provides two things: a constant [`BoardDescriptor`]
//! describing how its radio, status LED, display and host serial are wired,
//! and a [`BoardProfile`] implementation that performs the board's hardware
//! bring-up at two fixed points during start-up. The rest of the firmware
//! reads pins from the descriptor and never hard-codes them.

// Logging shim, must come first so the macros are visible below
mod fmt;

/// Pin numbers, levels and bus pin groups
pub mod pins;

/// The per-board pin and feature descriptor
pub mod descriptor;

/// Build-time firmware toggles
pub mod features;

/// Platform bus capability used during bring-up
pub mod platform;

/// Supported boards
pub mod boards;

/// Start-up ordering
pub mod boot;

/// Fallback identity and start-up configuration
pub mod config;

/// Status LED driver
pub mod indicator;

pub use boards::{ActiveBoard, BoardInitError, BoardProfile, InitPhase};
pub use descriptor::BoardDescriptor;
pub use features::Features;
pub use platform::{PlatformBus, PlatformError};
