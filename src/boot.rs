//! Start-up ordering
//!
//! Start-up has to go: board hardware phase, host serial, board post-serial
//! phase, then radio, LED and display. [`Boot`] encodes that order as a
//! typestate. Host serial parameters only become reachable once the hardware
//! phase has succeeded, and peripheral pins only once the post-serial phase
//! has, so an out-of-order start-up does not compile.
//!
//! ```ignore
//! let boot = Boot::new(&ACTIVE_BOARD, Features::BUILD).init_hardware(&mut bus)?;
//! if let Some(serial) = boot.host_serial() {
//!     start_serial(serial, boot.serial_wait());
//! }
//! let boot = boot.serial_ready().init_post_serial(&mut bus)?;
//! let radio = Radio::new(boot.radio());
//! ```

use core::marker::PhantomData;

use crate::boards::{BoardInitError, BoardProfile};
use crate::config::Overrides;
use crate::descriptor::{BoardDescriptor, Display, HostSerial, Indicator, RadioConfig, SerialWait};
use crate::features::Features;
use crate::fmt::{error, info};
use crate::platform::PlatformBus;

/// Nothing has run yet
pub struct PowerOn;
/// Hardware phase done, host serial may be started
pub struct HardwareReady;
/// Host serial started, or compiled out
pub struct SerialReady;
/// Both phases done, peripherals may be constructed
pub struct Ready;

/// Start-up progress for one board
pub struct Boot<'p, P: BoardProfile, S> {
    profile: &'p P,
    features: Features,
    _state: PhantomData<S>,
}

impl<'p, P: BoardProfile, S> Boot<'p, P, S> {
    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static BoardDescriptor {
        self.profile.descriptor()
    }

    const fn advance<N>(self) -> Boot<'p, P, N> {
        Boot {
            profile: self.profile,
            features: self.features,
            _state: PhantomData,
        }
    }
}

impl<'p, P: BoardProfile> Boot<'p, P, PowerOn> {
    #[must_use]
    pub const fn new(profile: &'p P, features: Features) -> Self {
        Self {
            profile,
            features,
            _state: PhantomData,
        }
    }

    /// Run the board's hardware phase
    ///
    /// # Errors
    ///
    /// Returns the board's [`BoardInitError`]; start-up must stop there.
    pub fn init_hardware<B: PlatformBus>(
        self,
        bus: &mut B,
    ) -> Result<Boot<'p, P, HardwareReady>, BoardInitError> {
        self.profile.init_hardware(bus, self.features)?;
        Ok(self.advance())
    }
}

impl<'p, P: BoardProfile> Boot<'p, P, HardwareReady> {
    /// The channel to start, if serial is enabled and the board has one
    #[must_use]
    pub fn host_serial(&self) -> Option<HostSerial> {
        self.descriptor().host_serial(self.features)
    }

    /// The board's default wait, before any override
    #[must_use]
    pub fn serial_wait(&self) -> Option<SerialWait> {
        self.descriptor().serial_wait(self.features)
    }

    /// Mark the host serial as started, including any wait for a terminal
    #[must_use]
    pub const fn serial_ready(self) -> Boot<'p, P, SerialReady> {
        self.advance()
    }
}

impl<'p, P: BoardProfile> Boot<'p, P, SerialReady> {
    /// Run the board's post-serial phase
    ///
    /// # Errors
    ///
    /// Returns the board's [`BoardInitError`]; no peripheral may be
    /// constructed afterwards.
    pub fn init_post_serial<B: PlatformBus>(
        self,
        bus: &mut B,
    ) -> Result<Boot<'p, P, Ready>, BoardInitError> {
        self.profile.init_post_serial(bus, self.features)?;
        Ok(self.advance())
    }
}

impl<P: BoardProfile> Boot<'_, P, Ready> {
    #[must_use]
    pub fn radio(&self) -> RadioConfig {
        self.descriptor().radio_config(self.features)
    }

    #[must_use]
    pub fn indicator(&self) -> Option<Indicator> {
        self.descriptor().indicator(self.features)
    }

    #[must_use]
    pub fn display(&self) -> Option<Display> {
        self.descriptor().display(self.features)
    }
}

/// Peripheral constructors the firmware provides
pub trait Firmware {
    /// Start the host channel and hold for a terminal if `wait` says so
    fn start_serial(&mut self, serial: HostSerial, wait: Option<SerialWait>);
    fn start_radio(&mut self, radio: RadioConfig);
    fn start_indicator(&mut self, indicator: Indicator);
    fn start_display(&mut self, display: Display);
}

/// Bring the board and its peripherals up in order
///
/// The host serial waits as `overrides` says, falling back to the board's
/// default. Stops at the first failed phase without constructing anything
/// after it.
/// What to do next, such as blinking the LED or halting, is up to the caller.
///
/// # Errors
///
/// Returns the [`BoardInitError`] of the phase that failed.
pub fn run<P, B, F>(
    profile: &P,
    bus: &mut B,
    firmware: &mut F,
    features: Features,
    overrides: &Overrides<'_>,
) -> Result<(), BoardInitError>
where
    P: BoardProfile,
    B: PlatformBus,
    F: Firmware,
{
    // No logging before the host serial is up
    let boot = Boot::new(profile, features).init_hardware(bus)?;

    if let Some(serial) = boot.host_serial() {
        let wait = overrides.serial_wait(boot.descriptor(), boot.features());
        firmware.start_serial(serial, wait);
    }

    let boot = boot
        .serial_ready()
        .init_post_serial(bus)
        .inspect_err(|err| error!("{}", err))?;

    firmware.start_radio(boot.radio());
    if let Some(indicator) = boot.indicator() {
        firmware.start_indicator(indicator);
    }
    if let Some(display) = boot.display() {
        firmware.start_display(display);
    }

    info!("Board {} initialized", boot.descriptor().board_id);
    Ok(())
}
