//! Recording platform stub for testing
//!
//! [`RecordingBus`] stands in for the real bus registers and
//! [`RecordingFirmware`] for the firmware's peripheral constructors. Both
//! write to one shared [`Journal`], so a test can check the order in which
//! bring-up and construction happened across the two.
//!
//! Available during test builds and with the `mock` feature.

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::boot::Firmware;
use crate::descriptor::{Display, HostSerial, Indicator, RadioConfig, SerialWait};
use crate::pins::{I2cPins, Level, Pin};
use crate::platform::{PlatformBus, PlatformError, Result};

/// A call made on the platform bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCall {
    BindI2c(I2cPins),
    RelocateSpiSck(Pin),
    DriveOutput(Pin, Level),
}

/// A peripheral the firmware constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constructed {
    Serial(HostSerial, Option<SerialWait>),
    Radio(RadioConfig),
    Indicator(Indicator),
    Display(Display),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Bus(BusCall),
    Firmware(Constructed),
}

/// Shared, ordered record of everything that happened
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Index of the first event matching `pred`
    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }
}

/// Platform bus that records calls and tracks the resulting configuration
#[derive(Debug)]
pub struct RecordingBus {
    journal: Journal,
    calls: Vec<BusCall>,
    i2c: Option<I2cPins>,
    spi_sck: Option<Pin>,
    outputs: Vec<(Pin, Level)>,
    rejected: Vec<Pin>,
}

impl RecordingBus {
    #[must_use]
    pub const fn new(journal: Journal) -> Self {
        Self {
            journal,
            calls: Vec::new(),
            i2c: None,
            spi_sck: None,
            outputs: Vec::new(),
            rejected: Vec::new(),
        }
    }

    /// Refuse `pin` the way a platform that validates pin legality would
    #[must_use]
    pub fn reject(mut self, pin: Pin) -> Self {
        self.rejected.push(pin);
        self
    }

    /// Calls made on this bus, in order
    #[must_use]
    pub fn calls(&self) -> Vec<BusCall> {
        self.calls.clone()
    }

    /// Current two-wire binding, `None` while on platform defaults
    #[must_use]
    pub const fn i2c_pins(&self) -> Option<I2cPins> {
        self.i2c
    }

    /// Current SPI clock, `None` while on the platform default
    #[must_use]
    pub const fn spi_sck(&self) -> Option<Pin> {
        self.spi_sck
    }

    /// Level last driven on `pin`
    #[must_use]
    pub fn output(&self, pin: Pin) -> Option<Level> {
        self.outputs
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
    }

    fn check(&self, pin: Pin) -> Result<()> {
        if self.rejected.contains(&pin) {
            Err(PlatformError::InvalidPin(pin))
        } else {
            Ok(())
        }
    }

    fn record(&mut self, call: BusCall) {
        self.calls.push(call);
        self.journal.push(Event::Bus(call));
    }
}

impl PlatformBus for RecordingBus {
    fn bind_i2c(&mut self, pins: I2cPins) -> Result<()> {
        self.check(pins.sda)?;
        self.check(pins.scl)?;
        self.record(BusCall::BindI2c(pins));
        self.i2c = Some(pins);
        Ok(())
    }

    fn relocate_spi_sck(&mut self, sck: Pin) -> Result<()> {
        self.check(sck)?;
        self.record(BusCall::RelocateSpiSck(sck));
        self.spi_sck = Some(sck);
        Ok(())
    }

    fn drive_output(&mut self, pin: Pin, level: Level) -> Result<()> {
        self.check(pin)?;
        self.record(BusCall::DriveOutput(pin, level));
        self.outputs.push((pin, level));
        Ok(())
    }
}

/// Firmware stand-in that records each peripheral it is asked to construct
#[derive(Debug, Clone)]
pub struct RecordingFirmware {
    journal: Journal,
}

impl RecordingFirmware {
    #[must_use]
    pub const fn new(journal: Journal) -> Self {
        Self { journal }
    }

    /// Peripherals constructed so far, in order
    #[must_use]
    pub fn constructed(&self) -> Vec<Constructed> {
        self.journal
            .events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Firmware(step) => Some(step),
                Event::Bus(_) => None,
            })
            .collect()
    }
}

impl Firmware for RecordingFirmware {
    fn start_serial(&mut self, serial: HostSerial, wait: Option<SerialWait>) {
        self.journal
            .push(Event::Firmware(Constructed::Serial(serial, wait)));
    }

    fn start_radio(&mut self, radio: RadioConfig) {
        self.journal.push(Event::Firmware(Constructed::Radio(radio)));
    }

    fn start_indicator(&mut self, indicator: Indicator) {
        self.journal
            .push(Event::Firmware(Constructed::Indicator(indicator)));
    }

    fn start_display(&mut self, display: Display) {
        self.journal
            .push(Event::Firmware(Constructed::Display(display)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_and_firmware_share_one_journal() {
        let journal = Journal::new();
        let mut bus = RecordingBus::new(journal.clone());
        let mut firmware = RecordingFirmware::new(journal.clone());

        bus.relocate_spi_sck(Pin(14)).unwrap();
        firmware.start_serial(HostSerial::NativeUsb, None);

        assert_eq!(
            journal.events(),
            [
                Event::Bus(BusCall::RelocateSpiSck(Pin(14))),
                Event::Firmware(Constructed::Serial(HostSerial::NativeUsb, None)),
            ]
        );
        assert_eq!(bus.calls().len(), 1);
        assert_eq!(firmware.constructed().len(), 1);
    }

    #[test]
    fn test_rejected_pin_leaves_state_untouched() {
        let mut bus = RecordingBus::new(Journal::new()).reject(Pin(4));
        let pins = I2cPins {
            sda: Pin(4),
            scl: Pin(15),
        };
        assert_eq!(bus.bind_i2c(pins), Err(PlatformError::InvalidPin(Pin(4))));
        assert_eq!(bus.i2c_pins(), None);
        assert!(bus.calls().is_empty());
    }

    #[test]
    fn test_output_reports_last_level() {
        let mut bus = RecordingBus::new(Journal::new());
        bus.drive_output(Pin(21), Level::High).unwrap();
        bus.drive_output(Pin(21), Level::Low).unwrap();
        assert_eq!(bus.output(Pin(21)), Some(Level::Low));
        assert_eq!(bus.output(Pin(22)), None);
    }
}
