//! Teensy LC with an external SPI LoRa module
//!
//! Pin assignments and bring-up for the Teensy LC. Serial runs over the
//! MCU's native USB. The on-board LED sits on the default SPI clock pin, so
//! the clock is moved to GPIO14 before the radio driver starts SPI.

use super::{BoardInitError, BoardProfile, relocate_spi_clock};
use crate::descriptor::{
    BoardDescriptor, DioPins, Display, DisplayBus, DisplayController, HostSerial, Indicator,
    PinFunction, PinHazard, PlatformDefaults, RadioCalibration, RadioPins, SerialWait,
};
use crate::features::Features;
use crate::pins::{ActiveLevel, I2cPins, Level, Pin, SpiPins};
use crate::platform::PlatformBus;

/// Teensy LC default bus pins
const PLATFORM: PlatformDefaults = PlatformDefaults {
    i2c: I2cPins {
        sda: Pin(18),
        scl: Pin(19),
    },
    spi: SpiPins {
        sck: Pin(13),
        mosi: Pin(11),
        miso: Pin(12),
    },
};

/// The LED owns GPIO13; SPI SCK is relocated to GPIO14
const HAZARDS: &[PinHazard] = &[PinHazard {
    pin: Pin(13),
    first: PinFunction::Indicator,
    second: PinFunction::DefaultSck,
    resolved_for: PinFunction::Indicator,
}];

/// Pin assignments for the Teensy LC
///
/// LoRa module:
/// - NSS (Chip Select): GPIO10
/// - Reset: GPIO9
/// - DIO0 / DIO1: GPIO8 / GPIO7, DIO2 not needed for LoRa
/// - RXTX: not connected
/// - SPI: SCK GPIO14 (moved from GPIO13), MOSI GPIO11, MISO GPIO12
///
/// Display (optional SSD1306): default I2C, SDA GPIO18, SCL GPIO19
///
/// LED: GPIO13, active high
pub const DESCRIPTOR: BoardDescriptor = BoardDescriptor {
    board_id: "teensylc",
    device_id_default: "teensylc",
    radio: RadioPins {
        nss: Pin(10),
        rxtx: None,
        rst: Some(Pin(9)),
        dio: DioPins {
            dio0: Pin(8),
            dio1: Some(Pin(7)),
            dio2: None,
        },
    },
    radio_spi: SpiPins {
        sck: Pin(14),
        ..PLATFORM.spi
    },
    radio_calibration: RadioCalibration {
        rxtx_rx_active: Level::Low,
        rssi_cal: 10,
        spi_freq_hz: 8_000_000,
        clock_error_ppm: None,
    },
    indicator: Some(Indicator {
        pin: Pin(13),
        active: ActiveLevel::High,
    }),
    display: Some(Display {
        controller: DisplayController::Ssd1306,
        bus: DisplayBus::I2c(PLATFORM.i2c),
        reset: None,
    }),
    power_gate: None,
    host_serial: Some(HostSerial::NativeUsb),
    wait_for_serial: Some(SerialWait::Seconds(10)),
    platform: PLATFORM,
    hazards: HAZARDS,
};

pub struct TeensyLc;

impl BoardProfile for TeensyLc {
    fn descriptor(&self) -> &'static BoardDescriptor {
        &DESCRIPTOR
    }

    fn init_hardware<B: PlatformBus>(
        &self,
        bus: &mut B,
        _features: Features,
    ) -> Result<(), BoardInitError> {
        // The LED is physically on GPIO13 whether or not it is used
        relocate_spi_clock(&DESCRIPTOR, bus).map_err(BoardInitError::hardware)?;
        Ok(())
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
        ] {
            assert_eq!(DESCRIPTOR.validate(features), Ok(()));
        }
    }

    #[test]
    fn test_spi_clock_moved_off_led_pin() {
        let mut bus = RecordingBus::new(Journal::new());
        TeensyLc
            .init(InitPhase::Hardware, &mut bus, Features::ALL)
            .unwrap();
        assert_eq!(bus.calls(), [BusCall::RelocateSpiSck(Pin(14))]);

        let led = DESCRIPTOR.indicator(Features::ALL).unwrap();
        assert_ne!(bus.spi_sck(), Some(led.pin));
        assert_eq!(bus.spi_sck(), Some(Pin(14)));
    }

    #[test]
    fn test_spi_clock_moved_even_without_led() {
        let mut bus = RecordingBus::new(Journal::new());
        TeensyLc.init_hardware(&mut bus, Features::NONE).unwrap();
        assert_eq!(bus.spi_sck(), Some(Pin(14)));
    }

    #[test]
    fn test_display_on_default_pins_is_not_rebound() {
        let mut bus = RecordingBus::new(Journal::new());
        TeensyLc.init_hardware(&mut bus, Features::ALL).unwrap();
        assert_eq!(bus.i2c_pins(), None);
    }

    #[test]
    fn test_rejected_clock_pin_fails_hardware_phase() {
        let mut bus = RecordingBus::new(Journal::new()).reject(Pin(14));
        assert_eq!(
            TeensyLc.init_hardware(&mut bus, Features::ALL),
            Err(BoardInitError::hardware(PlatformError::InvalidPin(Pin(14))))
        );
    }

    #[test]
    fn test_unused_dio2_is_absent() {
        assert_eq!(DESCRIPTOR.radio.dio.dio2, None);
        assert_eq!(DESCRIPTOR.radio.to_raw().dio, [8, 7, LMIC_UNUSED_PIN]);
        assert_eq!(DESCRIPTOR.radio.dio_lines().count(), 2);
    }

    #[test]
    fn test_native_usb_waits_ten_seconds() {
        let features = Features::ALL;
        assert_eq!(DESCRIPTOR.host_serial(features), Some(HostSerial::NativeUsb));
        assert!(HostSerial::NativeUsb.needs_enumeration());
        assert_eq!(
            DESCRIPTOR.serial_wait(features),
            Some(SerialWait::Seconds(10))
        );
        assert_eq!(DESCRIPTOR.serial_wait(features.with_serial(false)), None);
    }
}
