//! Board-specific configurations and bring-up
//!
//! This module isolates everything that differs between boards from the rest
//! of the firmware. Each board supplies a static [`BoardDescriptor`] and a
//! [`BoardProfile`] that runs its hardware bring-up at two fixed points during
//! start-up; which board is active is decided by a `board-*` Cargo feature.

use core::fmt;

use crate::descriptor::{BoardDescriptor, DisplayBus};
use crate::features::Features;
use crate::platform::{self, PlatformBus, PlatformError};

// Board modules are always built for tests so every board gets checked
#[cfg(any(test, feature = "board-heltec-wireless-stick-lite"))]
pub mod heltec_wireless_stick_lite;

#[cfg(any(test, feature = "board-teensylc"))]
pub mod teensylc;

/// Point in start-up a bring-up step belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitPhase {
    /// First thing at start-up, before the host serial or any peripheral
    /// exists
    Hardware,
    /// After the host serial is up (if enabled), before the radio, LED or
    /// display are constructed
    PostInitSerial,
}

/// Board hardware initialization failed
///
/// The only failure this layer reports. It is never transient, so there is
/// nothing to retry: the caller stops start-up at this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardInitError {
    pub phase: InitPhase,
    pub cause: PlatformError,
}

impl BoardInitError {
    #[must_use]
    pub const fn hardware(cause: PlatformError) -> Self {
        Self {
            phase: InitPhase::Hardware,
            cause,
        }
    }

    #[must_use]
    pub const fn post_serial(cause: PlatformError) -> Self {
        Self {
            phase: InitPhase::PostInitSerial,
            cause,
        }
    }
}

impl fmt::Display for BoardInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "board init failed in {:?} phase: {}", self.phase, self.cause)
    }
}

/// A supported board
///
/// # Calling contract
///
/// - [`init_hardware`](Self::init_hardware) is the very first thing start-up
///   does. The host serial does not exist yet, so it must not log.
/// - [`init_post_serial`](Self::init_post_serial) runs right after the host
///   serial is ready, or straight after the hardware phase when serial is
///   compiled out, and before the radio, LED or display are constructed.
/// - Each phase runs exactly once per boot. Nothing survives between the two
///   calls except the platform state they reconfigure.
///
/// [`crate::boot::Boot`] enforces this order at compile time.
pub trait BoardProfile {
    /// Wiring and defaults for this board
    fn descriptor(&self) -> &'static BoardDescriptor;

    /// Bring-up that has to happen before anything touches a bus
    ///
    /// # Errors
    ///
    /// Returns [`BoardInitError`] when the platform refuses a required
    /// reconfiguration.
    fn init_hardware<B: PlatformBus>(
        &self,
        bus: &mut B,
        features: Features,
    ) -> Result<(), BoardInitError>;

    /// Bring-up that needs the host serial but must precede peripherals
    ///
    /// Most boards have nothing to do here.
    ///
    /// # Errors
    ///
    /// Returns [`BoardInitError`] when the platform refuses a required
    /// reconfiguration.
    fn init_post_serial<B: PlatformBus>(
        &self,
        _bus: &mut B,
        _features: Features,
    ) -> Result<(), BoardInitError> {
        Ok(())
    }

    /// Run one phase
    ///
    /// # Errors
    ///
    /// Whatever the phase itself returns.
    fn init<B: PlatformBus>(
        &self,
        phase: InitPhase,
        bus: &mut B,
        features: Features,
    ) -> Result<(), BoardInitError> {
        match phase {
            InitPhase::Hardware => self.init_hardware(bus, features),
            InitPhase::PostInitSerial => self.init_post_serial(bus, features),
        }
    }
}

/// Bind the two-wire bus to the display's pins if they are not the defaults
///
/// Must run before any driver can start the bus with the default pins.
/// Returns whether the bus was rebound.
///
/// # Errors
///
/// Propagates the platform's refusal of the pins.
pub fn bind_display_bus<B: PlatformBus>(
    descriptor: &BoardDescriptor,
    bus: &mut B,
    features: Features,
) -> platform::Result<bool> {
    let Some(display) = descriptor.display(features) else {
        return Ok(false);
    };
    if display.uses_default_bus(&descriptor.platform) {
        return Ok(false);
    }
    match display.bus {
        DisplayBus::I2c(pins) => bus.bind_i2c(pins)?,
    }
    Ok(true)
}

/// Move the radio's SPI clock off the platform default if the board needs it
///
/// Returns whether the clock line was moved.
///
/// # Errors
///
/// Propagates the platform's refusal of the new clock pin.
pub fn relocate_spi_clock<B: PlatformBus>(
    descriptor: &BoardDescriptor,
    bus: &mut B,
) -> platform::Result<bool> {
    let sck = descriptor.radio_spi.sck;
    if sck == descriptor.platform.spi.sck {
        return Ok(false);
    }
    bus.relocate_spi_sck(sck)?;
    Ok(true)
}

/// Switch on the peripheral power gate when something enabled depends on it
///
/// # Errors
///
/// Propagates the platform's refusal to drive the gate pin.
pub fn enable_power_gate<B: PlatformBus>(
    descriptor: &BoardDescriptor,
    bus: &mut B,
    features: Features,
) -> platform::Result<()> {
    if let Some(gate) = descriptor.power_gate(features) {
        bus.drive_output(gate.pin, gate.active.on())?;
    }
    Ok(())
}

#[cfg(feature = "board-heltec-wireless-stick-lite")]
pub type ActiveBoard = heltec_wireless_stick_lite::HeltecWirelessStickLite;

#[cfg(feature = "board-heltec-wireless-stick-lite")]
pub const ACTIVE_BOARD: ActiveBoard = heltec_wireless_stick_lite::HeltecWirelessStickLite;

#[cfg(feature = "board-teensylc")]
pub type ActiveBoard = teensylc::TeensyLc;

#[cfg(feature = "board-teensylc")]
pub const ACTIVE_BOARD: ActiveBoard = teensylc::TeensyLc;

// Default fallback if no board is selected
#[cfg(not(any(
    feature = "board-heltec-wireless-stick-lite",
    feature = "board-teensylc"
)))]
compile_error!("No board selected! Please enable a board feature like 'board-teensylc'");

#[cfg(all(
    feature = "board-heltec-wireless-stick-lite",
    feature = "board-teensylc"
))]
compile_error!("More than one board selected! Enable exactly one 'board-*' feature");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Display, DisplayController, Indicator, PowerGate};
    use crate::pins::{ActiveLevel, I2cPins, Level, Pin};
    use crate::platform::mock::{BusCall, Journal, RecordingBus};

    /// Board with a display on non-default pins and an uncontended LED
    struct DisplayBoard;

    const DISPLAY_BOARD: BoardDescriptor = BoardDescriptor {
        indicator: Some(Indicator {
            pin: Pin(13),
            active: ActiveLevel::High,
        }),
        display: Some(Display {
            controller: DisplayController::Ssd1306,
            bus: DisplayBus::I2c(I2cPins {
                sda: Pin(4),
                scl: Pin(15),
            }),
            reset: None,
        }),
        power_gate: None,
        ..heltec_wireless_stick_lite::DESCRIPTOR
    };

    impl BoardProfile for DisplayBoard {
        fn descriptor(&self) -> &'static BoardDescriptor {
            &DISPLAY_BOARD
        }

        fn init_hardware<B: PlatformBus>(
            &self,
            bus: &mut B,
            features: Features,
        ) -> Result<(), BoardInitError> {
            bind_display_bus(self.descriptor(), bus, features)
                .map_err(BoardInitError::hardware)?;
            Ok(())
        }
    }

    #[test]
    fn test_display_on_custom_pins_rebinds_bus() {
        let mut bus = RecordingBus::new(Journal::new());
        let features = Features::ALL;
        DisplayBoard.init_hardware(&mut bus, features).unwrap();
        assert_eq!(
            bus.i2c_pins(),
            Some(I2cPins {
                sda: Pin(4),
                scl: Pin(15)
            })
        );
        assert_eq!(DISPLAY_BOARD.validate(features), Ok(()));
    }

    #[test]
    fn test_display_on_default_pins_leaves_bus_alone() {
        let mut descriptor = DISPLAY_BOARD;
        descriptor.display = Some(Display {
            bus: DisplayBus::I2c(descriptor.platform.i2c),
            ..DISPLAY_BOARD.display.unwrap()
        });
        let mut bus = RecordingBus::new(Journal::new());
        assert_eq!(bind_display_bus(&descriptor, &mut bus, Features::ALL), Ok(false));
        assert!(bus.calls().is_empty());
    }

    #[test]
    fn test_disabled_display_is_not_bound() {
        let mut bus = RecordingBus::new(Journal::new());
        let features = Features::ALL.with_display(false);
        assert_eq!(bind_display_bus(&DISPLAY_BOARD, &mut bus, features), Ok(false));
        assert_eq!(bus.i2c_pins(), None);
    }

    #[test]
    fn test_power_gate_driven_to_active_level() {
        let mut descriptor = DISPLAY_BOARD;
        descriptor.power_gate = Some(PowerGate {
            pin: Pin(21),
            active: ActiveLevel::Low,
        });
        let mut bus = RecordingBus::new(Journal::new());
        enable_power_gate(&descriptor, &mut bus, Features::ALL).unwrap();
        assert_eq!(bus.calls(), [BusCall::DriveOutput(Pin(21), Level::Low)]);
    }

    #[test]
    fn test_default_post_serial_phase_does_nothing() {
        let mut bus = RecordingBus::new(Journal::new());
        DisplayBoard
            .init(InitPhase::PostInitSerial, &mut bus, Features::ALL)
            .unwrap();
        assert!(bus.calls().is_empty());
    }

    #[test]
    fn test_rejected_remap_fails_hardware_phase() {
        let mut bus = RecordingBus::new(Journal::new()).reject(Pin(15));
        assert_eq!(
            DisplayBoard.init(InitPhase::Hardware, &mut bus, Features::ALL),
            Err(BoardInitError::hardware(PlatformError::InvalidPin(Pin(15))))
        );
        assert_eq!(bus.i2c_pins(), None);
    }
}
