//! Independent watchdog

use embassy_stm32::peripherals::IWDG;
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_stm32::Peripheral;

use crate::beacon::Watchdog;
use crate::config::WATCHDOG_TIMEOUT_US;

/// IWDG fed once per bit-clock wait
pub struct Iwdg<'d> {
    dog: IndependentWatchdog<'d, IWDG>,
}

impl<'d> Iwdg<'d> {
    /// Start the watchdog; it cannot be stopped afterwards
    pub fn start(iwdg: impl Peripheral<P = IWDG> + 'd) -> Self {
        let mut dog = IndependentWatchdog::new(iwdg, WATCHDOG_TIMEOUT_US);
        dog.unleash();
        info!("watchdog armed, {} us", WATCHDOG_TIMEOUT_US);
        Self { dog }
    }
}

impl Watchdog for Iwdg<'_> {
    fn feed(&mut self) {
        self.dog.pet();
    }
}
