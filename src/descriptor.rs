//! Pin and feature descriptor
//!
//! One `const` [`BoardDescriptor`] per board records where everything is
//! wired. Drivers read their pins from it at construction time; nothing else
//! in the firmware knows a pin number. Fields for optional peripherals describe
//! the wiring whether or not the peripheral is compiled in, and the
//! capability-checked accessors hide what the current [`Features`] leave out.

use core::fmt;

use embassy_time::Duration;
use heapless::Vec;

use crate::features::Features;
use crate::pins::{self, ActiveLevel, I2cPins, Level, Pin, SpiPins};

/// Longest device id the identity subsystem accepts, in UTF-8 bytes
pub const DEVICE_ID_MAX_LEN: usize = 16;

/// Upper bound on pins a single board can claim at once
pub const MAX_PIN_CLAIMS: usize = 16;

/// Digital interrupt lines from the radio
///
/// DIO0 is always wired. DIO1 and DIO2 may be absent; an absent line is
/// structurally missing, not pin 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DioPins {
    pub dio0: Pin,
    pub dio1: Option<Pin>,
    pub dio2: Option<Pin>,
}

/// Radio control lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioPins {
    /// Chip select
    pub nss: Pin,
    /// Antenna transmit/receive switch
    pub rxtx: Option<Pin>,
    /// Reset
    pub rst: Option<Pin>,
    pub dio: DioPins,
}

impl RadioPins {
    /// The interrupt lines that are actually wired, with their index
    pub fn dio_lines(&self) -> impl Iterator<Item = (u8, Pin)> {
        [Some(self.dio.dio0), self.dio.dio1, self.dio.dio2]
            .into_iter()
            .zip(0u8..)
            .filter_map(|(pin, idx)| pin.map(|p| (idx, p)))
    }

    /// Raw LMIC layout for drivers that take plain integers
    #[must_use]
    pub const fn to_raw(&self) -> RawPinmap {
        RawPinmap {
            nss: self.nss.0,
            rxtx: pins::raw(self.rxtx),
            rst: pins::raw(self.rst),
            dio: [
                self.dio.dio0.0,
                pins::raw(self.dio.dio1),
                pins::raw(self.dio.dio2),
            ],
        }
    }
}

/// LMIC `lmic_pinmap` layout, absent lines set to [`pins::LMIC_UNUSED_PIN`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPinmap {
    pub nss: u8,
    pub rxtx: u8,
    pub rst: u8,
    pub dio: [u8; 3],
}

/// Extra radio tuning consumed by the MCCI LMIC driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioCalibration {
    /// Level of the RXTX line while receiving
    pub rxtx_rx_active: Level,
    /// RSSI calibration offset in dB
    pub rssi_cal: i8,
    /// SPI clock for the radio in Hz
    pub spi_freq_hz: u32,
    /// Clock error allowance in parts per million of LMIC's maximum. Only
    /// slow 8-bit MCUs need one.
    pub clock_error_ppm: Option<u32>,
}

/// Everything the radio driver needs at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    pub pins: RadioPins,
    pub spi: SpiPins,
    pub calibration: Option<RadioCalibration>,
}

/// Status LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicator {
    pub pin: Pin,
    pub active: ActiveLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayController {
    /// SSD1306 128x64 OLED
    Ssd1306,
}

/// How the display is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayBus {
    I2c(I2cPins),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Display {
    pub controller: DisplayController,
    pub bus: DisplayBus,
    pub reset: Option<Pin>,
}

impl Display {
    /// Whether the display sits on the platform's default bus pins
    #[must_use]
    pub fn uses_default_bus(&self, platform: &PlatformDefaults) -> bool {
        match self.bus {
            DisplayBus::I2c(pins) => pins == platform.i2c,
        }
    }
}

/// The platform's built-in host communication channel
///
/// Board code only names the channel; the platform owns the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostSerial {
    /// USB device implemented by the MCU itself
    NativeUsb,
    /// Hardware UART, usually behind an on-board USB bridge
    Uart { port: u8 },
}

impl HostSerial {
    /// Native USB needs time to enumerate before output is seen
    #[must_use]
    pub const fn needs_enumeration(self) -> bool {
        matches!(self, Self::NativeUsb)
    }
}

/// How long start-up holds waiting for a host terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialWait {
    Seconds(u16),
    Indefinitely,
}

impl SerialWait {
    /// Parse the conventional integer form, where `-1` waits forever
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            -1 => Some(Self::Indefinitely),
            n => u16::try_from(n).ok().map(Self::Seconds),
        }
    }

    /// Wait bound, `None` for an indefinite wait
    #[must_use]
    #[allow(clippy::cast_lossless)] // `u64::from` is not const
    pub const fn timeout(self) -> Option<Duration> {
        match self {
            Self::Seconds(s) => Some(Duration::from_secs(s as u64)),
            Self::Indefinitely => None,
        }
    }
}

/// Line that switches power to an external peripheral bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerGate {
    pub pin: Pin,
    pub active: ActiveLevel,
}

/// Bus pins the platform uses when nobody asks for others
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlatformDefaults {
    pub i2c: I2cPins,
    pub spi: SpiPins,
}

/// What a pin is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    RadioNss,
    RadioRst,
    RadioRxTx,
    RadioDio(u8),
    RadioSck,
    RadioMosi,
    RadioMiso,
    Indicator,
    DisplaySda,
    DisplayScl,
    DisplayReset,
    PowerGate,
    /// Platform default I2C data line
    DefaultSda,
    /// Platform default I2C clock line
    DefaultScl,
    /// Platform default SPI clock line
    DefaultSck,
}

/// A physical pin two functions share on purpose
///
/// Only `resolved_for`, which must be `first` or `second`, may ever be
/// established on the pin. The board's hardware phase is responsible for
/// making sure nothing else lands there; using both at once is unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinHazard {
    pub pin: Pin,
    pub first: PinFunction,
    pub second: PinFunction,
    pub resolved_for: PinFunction,
}

impl PinHazard {
    fn covers(&self, pin: Pin) -> bool {
        self.pin == pin
    }

    /// Whether `resolved_for` is one of the two functions sharing the pin
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved_for == self.first || self.resolved_for == self.second
    }
}

/// A pin and the function claiming it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinClaim {
    pub pin: Pin,
    pub function: PinFunction,
}

/// Descriptor consistency errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescriptorError {
    /// Two functions claim one pin and nothing arbitrates it
    DuplicatePin {
        pin: Pin,
        first: PinFunction,
        second: PinFunction,
    },
    /// Two functions claim a documented hazard pin at the same time
    UnsupportedSharing {
        pin: Pin,
        first: PinFunction,
        second: PinFunction,
    },
    /// Default device id is empty or longer than [`DEVICE_ID_MAX_LEN`]
    DeviceIdLength(usize),
    /// More pins claimed than [`MAX_PIN_CLAIMS`]
    TooManyClaims,
    /// Hazard resolved for a function that does not share its pin
    UnresolvedHazard(Pin),
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePin { pin, first, second } => {
                write!(f, "{pin} claimed by both {first:?} and {second:?}")
            }
            Self::UnsupportedSharing { pin, first, second } => write!(
                f,
                "{pin} is shared by {first:?} and {second:?}; only one may be used"
            ),
            Self::DeviceIdLength(len) => write!(
                f,
                "default device id is {len} bytes, expected 1..={DEVICE_ID_MAX_LEN}"
            ),
            Self::TooManyClaims => write!(f, "more than {MAX_PIN_CLAIMS} pins claimed"),
            Self::UnresolvedHazard(pin) => {
                write!(f, "{pin} hazard is resolved for neither of its functions")
            }
        }
    }
}

/// Board wiring and defaults
///
/// Read-only for the life of the firmware; boards define it as a `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardDescriptor {
    /// Board identifier used by the build
    pub board_id: &'static str,
    /// Identity used when no other source configures one
    pub device_id_default: &'static str,
    pub radio: RadioPins,
    /// SPI lines the radio uses once the hardware phase has run
    pub radio_spi: SpiPins,
    pub radio_calibration: RadioCalibration,
    pub indicator: Option<Indicator>,
    /// Where a display is, or would be, connected
    pub display: Option<Display>,
    pub power_gate: Option<PowerGate>,
    pub host_serial: Option<HostSerial>,
    pub wait_for_serial: Option<SerialWait>,
    pub platform: PlatformDefaults,
    /// Intentional pin sharing, see [`PinHazard`]
    pub hazards: &'static [PinHazard],
}

impl BoardDescriptor {
    /// Radio pins, plus calibration when the MCCI driver is built
    #[must_use]
    pub const fn radio_config(&self, features: Features) -> RadioConfig {
        RadioConfig {
            pins: self.radio,
            spi: self.radio_spi,
            calibration: if features.mcci_lmic {
                Some(self.radio_calibration)
            } else {
                None
            },
        }
    }

    #[must_use]
    pub const fn indicator(&self, features: Features) -> Option<Indicator> {
        if features.led { self.indicator } else { None }
    }

    #[must_use]
    pub const fn display(&self, features: Features) -> Option<Display> {
        if features.display { self.display } else { None }
    }

    /// Power gate, when a peripheral that depends on it is enabled
    #[must_use]
    pub const fn power_gate(&self, features: Features) -> Option<PowerGate> {
        if features.display && self.display.is_some() {
            self.power_gate
        } else {
            None
        }
    }

    #[must_use]
    pub const fn host_serial(&self, features: Features) -> Option<HostSerial> {
        if features.serial { self.host_serial } else { None }
    }

    #[must_use]
    pub const fn serial_wait(&self, features: Features) -> Option<SerialWait> {
        if features.serial && self.host_serial.is_some() {
            self.wait_for_serial
        } else {
            None
        }
    }

    /// Every pin in use under `features`
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::TooManyClaims`] if the board claims more
    /// than [`MAX_PIN_CLAIMS`] pins.
    pub fn pin_claims(
        &self,
        features: Features,
    ) -> Result<Vec<PinClaim, MAX_PIN_CLAIMS>, DescriptorError> {
        let mut claims = Vec::new();
        let mut claim = |pin: Option<Pin>, function: PinFunction| match pin {
            Some(pin) => claims
                .push(PinClaim { pin, function })
                .map_err(|_| DescriptorError::TooManyClaims),
            None => Ok(()),
        };

        claim(Some(self.radio.nss), PinFunction::RadioNss)?;
        claim(self.radio.rst, PinFunction::RadioRst)?;
        claim(self.radio.rxtx, PinFunction::RadioRxTx)?;
        for (idx, pin) in self.radio.dio_lines() {
            claim(Some(pin), PinFunction::RadioDio(idx))?;
        }
        claim(Some(self.radio_spi.sck), PinFunction::RadioSck)?;
        claim(Some(self.radio_spi.mosi), PinFunction::RadioMosi)?;
        claim(Some(self.radio_spi.miso), PinFunction::RadioMiso)?;

        if let Some(led) = self.indicator(features) {
            claim(Some(led.pin), PinFunction::Indicator)?;
        }
        if let Some(display) = self.display(features) {
            match display.bus {
                DisplayBus::I2c(bus) => {
                    claim(Some(bus.sda), PinFunction::DisplaySda)?;
                    claim(Some(bus.scl), PinFunction::DisplayScl)?;
                }
            }
            claim(display.reset, PinFunction::DisplayReset)?;
        }
        if let Some(gate) = self.power_gate(features) {
            claim(Some(gate.pin), PinFunction::PowerGate)?;
        }

        Ok(claims)
    }

    /// Check that no two enabled functions share a pin
    ///
    /// A collision on a documented hazard pin is reported as
    /// [`DescriptorError::UnsupportedSharing`]: the hazard allows one of the
    /// functions, never both. So is a lone claim on a hazard pin by anything
    /// other than the function the hazard is resolved for.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self, features: Features) -> Result<(), DescriptorError> {
        let len = self.device_id_default.len();
        if len == 0 || len > DEVICE_ID_MAX_LEN {
            return Err(DescriptorError::DeviceIdLength(len));
        }

        if let Some(hazard) = self.hazards.iter().find(|h| !h.is_resolved()) {
            return Err(DescriptorError::UnresolvedHazard(hazard.pin));
        }

        let claims = self.pin_claims(features)?;
        for (i, a) in claims.iter().enumerate() {
            for b in &claims[i + 1..] {
                if a.pin != b.pin {
                    continue;
                }
                let (pin, first, second) = (a.pin, a.function, b.function);
                return Err(if self.hazards.iter().any(|h| h.covers(pin)) {
                    DescriptorError::UnsupportedSharing { pin, first, second }
                } else {
                    DescriptorError::DuplicatePin { pin, first, second }
                });
            }
        }

        for hazard in self.hazards {
            let forbidden = claims
                .iter()
                .find(|c| hazard.covers(c.pin) && c.function != hazard.resolved_for);
            if let Some(claim) = forbidden {
                return Err(DescriptorError::UnsupportedSharing {
                    pin: hazard.pin,
                    first: hazard.resolved_for,
                    second: claim.function,
                });
            }
        }
        Ok(())
    }
}
