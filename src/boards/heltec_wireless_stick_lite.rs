//! Heltec Wireless Stick Lite (ESP32)
//!
//! Pin assignments and bring-up for the Heltec Wireless Stick Lite. USB
//! serial comes from an on-board USB to serial bridge. There is no on-board
//! display; an external SSD1306 can be connected.

use super::{BoardInitError, BoardProfile, bind_display_bus, enable_power_gate};
use crate::descriptor::{
    BoardDescriptor, DioPins, Display, DisplayBus, DisplayController, HostSerial, Indicator,
    PinFunction, PinHazard, PlatformDefaults, PowerGate, RadioCalibration, RadioPins,
};
use crate::features::Features;
use crate::pins::{ActiveLevel, I2cPins, Level, Pin, SpiPins};
use crate::platform::PlatformBus;

/// ESP32 default bus pins from the board support package
const PLATFORM: PlatformDefaults = PlatformDefaults {
    i2c: I2cPins {
        sda: Pin(21),
        scl: Pin(22),
    },
    spi: SpiPins {
        sck: Pin(5),
        mosi: Pin(27),
        miso: Pin(19),
    },
};

/// Vext and the default I2C SDA are both GPIO21. Vext wins: the display is
/// wired to other pins and the bus is moved there before anything starts it.
const HAZARDS: &[PinHazard] = &[PinHazard {
    pin: Pin(21),
    first: PinFunction::PowerGate,
    second: PinFunction::DefaultSda,
    resolved_for: PinFunction::PowerGate,
}];

/// Pin assignments for the Heltec Wireless Stick Lite
///
/// LoRa Radio (SX1276):
/// - NSS (Chip Select): GPIO18
/// - Reset: GPIO14
/// - DIO0 / DIO1 / DIO2: GPIO26 / GPIO35 / GPIO34
/// - RXTX: not connected
/// - SPI: default pins (SCK: GPIO5, MOSI: GPIO27, MISO: GPIO19)
///
/// Display (external SSD1306, no reset line):
/// - I2C SDA: GPIO4, SCL: GPIO15, not the default GPIO21 / GPIO22
///
/// LED: GPIO25, active high
///
/// Vext: GPIO21, active low. Same pin as the default I2C SDA.
pub const DESCRIPTOR: BoardDescriptor = BoardDescriptor {
    board_id: "heltec_wireless_stick_lite",
    device_id_default: "wireless-sticklt",
    radio: RadioPins {
        nss: Pin(18),
        rxtx: None,
        rst: Some(Pin(14)),
        dio: DioPins {
            dio0: Pin(26),
            dio1: Some(Pin(35)),
            dio2: Some(Pin(34)),
        },
    },
    radio_spi: PLATFORM.spi,
    radio_calibration: RadioCalibration {
        rxtx_rx_active: Level::Low,
        rssi_cal: 10,
        spi_freq_hz: 8_000_000,
        clock_error_ppm: None,
    },
    indicator: Some(Indicator {
        pin: Pin(25),
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
    power_gate: Some(PowerGate {
        pin: Pin(21),
        active: ActiveLevel::Low,
    }),
    host_serial: Some(HostSerial::Uart { port: 0 }),
    wait_for_serial: None,
    platform: PLATFORM,
    hazards: HAZARDS,
};

pub struct HeltecWirelessStickLite;

impl BoardProfile for HeltecWirelessStickLite {
    fn descriptor(&self) -> &'static BoardDescriptor {
        &DESCRIPTOR
    }

    fn init_hardware<B: PlatformBus>(
        &self,
        bus: &mut B,
        features: Features,
    ) -> Result<(), BoardInitError> {
        // Bind the display pins first so nothing can start the bus on GPIO21,
        // then it is safe to take GPIO21 for Vext
        bind_display_bus(&DESCRIPTOR, bus, features).map_err(BoardInitError::hardware)?;
        enable_power_gate(&DESCRIPTOR, bus, features).map_err(BoardInitError::hardware)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::InitPhase;
    use crate::pins::LMIC_UNUSED_PIN;
    use crate::platform::PlatformError;
    use crate::platform::mock::{BusCall, Journal, RecordingBus};

    #[test]
    fn test_descriptor_is_consistent() {
        for features in [
            Features::NONE,
            Features::ALL,
            Features::ALL.with_display(false),
            Features::ALL.with_led(false),
        ] {
            assert_eq!(DESCRIPTOR.validate(features), Ok(()));
        }
    }

    #[test]
    fn test_without_display_hardware_phase_does_nothing() {
        let mut bus = RecordingBus::new(Journal::new());
        let features = Features::ALL.with_display(false);
        HeltecWirelessStickLite
            .init(InitPhase::Hardware, &mut bus, features)
            .unwrap();
        assert!(bus.calls().is_empty());

        let radio = DESCRIPTOR.radio_config(features);
        assert_eq!(radio.pins.nss, Pin(18));
        let led = DESCRIPTOR.indicator(features).unwrap();
        assert_eq!(led.pin, Pin(25));
        assert_eq!(led.active, ActiveLevel::High);
    }

    #[test]
    fn test_display_bus_bound_before_vext_is_driven() {
        let mut bus = RecordingBus::new(Journal::new());
        HeltecWirelessStickLite
            .init_hardware(&mut bus, Features::ALL)
            .unwrap();
        assert_eq!(
            bus.calls(),
            [
                BusCall::BindI2c(I2cPins {
                    sda: Pin(4),
                    scl: Pin(15)
                }),
                BusCall::DriveOutput(Pin(21), Level::Low),
            ]
        );
    }

    #[test]
    fn test_hazard_pin_is_never_used_for_i2c() {
        let mut bus = RecordingBus::new(Journal::new());
        HeltecWirelessStickLite
            .init_hardware(&mut bus, Features::ALL)
            .unwrap();
        let hazard = HAZARDS[0];
        let i2c = bus.i2c_pins().unwrap();
        assert_ne!(i2c.sda, hazard.pin);
        assert_ne!(i2c.scl, hazard.pin);
        assert_eq!(bus.output(hazard.pin), Some(Level::Low));
    }

    #[test]
    fn test_post_serial_phase_has_no_work() {
        let mut bus = RecordingBus::new(Journal::new());
        HeltecWirelessStickLite
            .init(InitPhase::PostInitSerial, &mut bus, Features::ALL)
            .unwrap();
        assert!(bus.calls().is_empty());
    }

    #[test]
    fn test_rejected_vext_fails_hardware_phase() {
        let mut bus = RecordingBus::new(Journal::new()).reject(Pin(21));
        assert_eq!(
            HeltecWirelessStickLite.init_hardware(&mut bus, Features::ALL),
            Err(BoardInitError::hardware(PlatformError::InvalidPin(Pin(21))))
        );
    }

    #[test]
    fn test_all_three_dio_lines_wired() {
        let raw = DESCRIPTOR.radio.to_raw();
        assert_eq!(raw.dio, [26, 35, 34]);
        assert_eq!(raw.rxtx, LMIC_UNUSED_PIN);
    }

    #[test]
    fn test_bridged_uart_needs_no_wait() {
        let serial = DESCRIPTOR.host_serial(Features::ALL).unwrap();
        assert!(!serial.needs_enumeration());
        assert_eq!(DESCRIPTOR.serial_wait(Features::ALL), None);
    }
}
