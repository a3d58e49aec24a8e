//! Start-up identity and serial wait
//!
//! The board descriptor only supplies fallbacks. Anything the firmware
//! configures elsewhere (build-time keys, stored settings) arrives as
//! [`Overrides`] and takes priority.

use core::fmt;

use heapless::String;

use crate::descriptor::{BoardDescriptor, DEVICE_ID_MAX_LEN, SerialWait};
use crate::features::Features;
use crate::fmt::debug;

/// Values from higher-priority configuration sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides<'a> {
    pub device_id: Option<&'a str>,
    pub wait_for_serial: Option<SerialWait>,
}

impl Overrides<'_> {
    /// Serial wait to use, the override first and the board default second
    ///
    /// `None` when serial is compiled out or the board has no host channel.
    #[must_use]
    pub const fn serial_wait(
        &self,
        descriptor: &BoardDescriptor,
        features: Features,
    ) -> Option<SerialWait> {
        if descriptor.host_serial(features).is_none() {
            return None;
        }
        match self.wait_for_serial {
            Some(wait) => Some(wait),
            None => descriptor.wait_for_serial,
        }
    }
}

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Source {
    Override,
    BoardDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Device id is empty or longer than [`DEVICE_ID_MAX_LEN`]
    DeviceIdLength(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceIdLength(len) => write!(
                f,
                "device id is {len} bytes, expected 1..={DEVICE_ID_MAX_LEN}"
            ),
        }
    }
}

/// Resolved identity and serial wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub device_id: String<DEVICE_ID_MAX_LEN>,
    pub device_id_source: Source,
    /// `None` means do not wait at all
    pub wait_for_serial: Option<SerialWait>,
}

impl NodeConfig {
    /// Combine `overrides` with the board's defaults
    ///
    /// The serial wait only applies when serial is enabled and the board has
    /// a host channel.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DeviceIdLength`] if the chosen device id is
    /// empty or too long.
    pub fn resolve(
        descriptor: &BoardDescriptor,
        features: Features,
        overrides: &Overrides<'_>,
    ) -> Result<Self, ConfigError> {
        let (id, device_id_source) = match overrides.device_id {
            Some(id) => (id, Source::Override),
            None => (descriptor.device_id_default, Source::BoardDefault),
        };

        let len = id.len();
        if len == 0 || len > DEVICE_ID_MAX_LEN {
            return Err(ConfigError::DeviceIdLength(len));
        }
        let mut device_id = String::new();
        device_id
            .push_str(id)
            .map_err(|()| ConfigError::DeviceIdLength(len))?;

        let wait_for_serial = overrides.serial_wait(descriptor, features);

        debug!("Device id {} ({:?})", id, device_id_source);

        Ok(Self {
            device_id,
            device_id_source,
            wait_for_serial,
        })
    }
}
