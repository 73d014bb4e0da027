//! Bit clock timer
//!
//! TIM2 counts at [`TIMER_TICK_HZ`] and interrupts on overflow. Auto-reload
//! preload is off, so a reload written from the overflow handler sets the
//! period of the count that has just begun.

use embassy_stm32::pac;
use embassy_stm32::peripherals::TIM2;
use embassy_stm32::timer::low_level::Timer;
use embassy_stm32::Peripheral;

use crate::config::{IDLE_TIMEOUT_TICKS, TIMER_PRESCALER, TIMER_TICK_HZ};
use crate::modem::{auto_reload, OverflowTimer};

/// Owns TIM2; keep alive for as long as the bit clock runs
pub struct BitTimer<'d> {
    _timer: Timer<'d, TIM2>,
}

impl<'d> BitTimer<'d> {
    /// Configure TIM2 for the bit clock, counting the idle timeout
    pub fn new(tim: impl Peripheral<P = TIM2> + 'd) -> Self {
        let timer = Timer::new(tim);
        let regs = timer.regs_core();
        regs.cr1().modify(|w| {
            w.set_arpe(false);
            w.set_urs(pac::timer::vals::Urs::COUNTER_ONLY);
        });
        regs.psc().write_value(TIMER_PRESCALER);
        regs.arr().write(|w| w.set_arr(auto_reload(IDLE_TIMEOUT_TICKS)));
        regs.egr().write(|w| w.set_ug(true));
        timer.clear_update_interrupt();
        timer.enable_update_interrupt(true);
        timer.start();
        debug!("bit clock TIM2 at {} Hz", TIMER_TICK_HZ);
        Self { _timer: timer }
    }

    /// Register handle for the foreground and the interrupt handler
    #[must_use]
    pub fn counter(&self) -> Tim2Counter {
        Tim2Counter(())
    }
}

/// TIM2 counter registers
#[derive(Clone, Copy)]
pub struct Tim2Counter(());

impl Tim2Counter {
    /// Clear the overflow flag; `true` if it was set
    #[must_use]
    pub fn acknowledge(self) -> bool {
        let regs = pac::TIM2;
        let pending = regs.sr().read().uif();
        if pending {
            regs.sr().modify(|w| w.set_uif(false));
        }
        pending
    }
}

impl OverflowTimer for Tim2Counter {
    fn reload(&self, ticks: u16) {
        pac::TIM2.arr().write_value(u32::from(auto_reload(ticks)));
    }

    fn restart(&self, ticks: u16) {
        let regs = pac::TIM2;
        regs.arr().write_value(u32::from(auto_reload(ticks)));
        regs.cnt().write_value(0);
    }
}
