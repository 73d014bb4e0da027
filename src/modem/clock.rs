//! Bit clock and tone oscillator
//!
//! Cross-context cells, one writer each:
//!
//! | Cell           | Writer                                  | Reader     |
//! |----------------|-----------------------------------------|------------|
//! | `transmitting` | foreground                              | ISR        |
//! | `tone`         | foreground                              | ISR        |
//! | `budget`       | foreground                              | ISR        |
//! | `lead_in`      | foreground                              | ISR        |
//! | `elapsed`      | ISR sets, foreground clears when arming | foreground |
//!
//! Every cell is a single byte or half-word, so loads and stores are
//! single instructions on the target.
//!
//! In tone mode the oscillator keeps one running balance: each armed wait
//! adds its budget, each elapsed sample period is subtracted, including
//! periods that end while no wait is armed. A wait completes once the
//! balance reaches zero, so each bit boundary lands within one sample
//! period after the sum of the budgets so far, as long as the foreground
//! re-arms within a bit period.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use super::waveform::{LadderDac, SINE_TABLE};
use crate::config::IDLE_TIMEOUT_TICKS;
use crate::types::Tone;

/// Hardware counter that raises an interrupt on overflow
///
/// `ticks` is always the full period from one overflow to the next.
pub trait OverflowTimer {
    /// Set the period of the count that just started (called from the ISR)
    fn reload(&self, ticks: u16);

    /// Zero the counter and overflow after `ticks`
    fn restart(&self, ticks: u16);
}

/// Auto-reload value for a period of `ticks`; an up-counter loaded with
/// `n` overflows every `n + 1` ticks
#[must_use]
pub const fn auto_reload(ticks: u16) -> u16 {
    ticks.saturating_sub(1)
}

impl<T: OverflowTimer + ?Sized> OverflowTimer for &T {
    fn reload(&self, ticks: u16) {
        (**self).reload(ticks);
    }

    fn restart(&self, ticks: u16) {
        (**self).restart(ticks);
    }
}

/// Work done while the foreground spins on a deadline
pub trait Background {
    /// Called repeatedly until the deadline passes
    fn service(&mut self);

    /// Called once per wait (watchdog feed)
    fn kick(&mut self) {}
}

impl Background for () {
    fn service(&mut self) {}
}

/// What the oscillator does on each overflow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockMode {
    /// One overflow per armed wait
    Deadline,
    /// Waveform synthesis, waits counted in elapsed periods
    Tone,
}

#[cfg(feature = "embedded")]
impl defmt::Format for ClockMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Deadline => defmt::write!(f, "deadline"),
            Self::Tone => defmt::write!(f, "tone"),
        }
    }
}

/// Cells shared between [`BitClock`] and [`Oscillator`]
pub struct ClockShared {
    transmitting: AtomicBool,
    tone: AtomicU8,
    elapsed: AtomicBool,
    budget: AtomicU16,
    lead_in: AtomicU16,
}

impl ClockShared {
    /// Idle, mark selected, nothing armed
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transmitting: AtomicBool::new(false),
            tone: AtomicU8::new(0),
            elapsed: AtomicBool::new(true),
            budget: AtomicU16::new(0),
            lead_in: AtomicU16::new(0),
        }
    }

    /// Hand out the foreground and interrupt halves
    pub fn split<T: OverflowTimer>(&mut self, timer: T) -> (BitClock<'_, T>, Oscillator<'_>) {
        let shared: &ClockShared = self;
        (
            BitClock { shared, timer },
            Oscillator {
                shared,
                mode: ClockMode::Deadline,
                step: 0,
                last_period: 0,
                remaining: 0,
                armed: false,
            },
        )
    }

    fn tone(&self) -> Tone {
        Tone::from_u8(self.tone.load(Ordering::Acquire))
    }
}

impl Default for ClockShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Foreground half: selects tones and paces bits
pub struct BitClock<'a, T> {
    shared: &'a ClockShared,
    timer: T,
}

impl<T: OverflowTimer> BitClock<'_, T> {
    /// Switch the oscillator on, starting with `tone`
    pub fn start_transmit(&mut self, tone: Tone) {
        critical_section::with(|_| {
            let period = tone.period_ticks();
            self.shared.tone.store(tone.as_u8(), Ordering::Release);
            self.shared.lead_in.store(period, Ordering::Relaxed);
            self.shared.transmitting.store(true, Ordering::Release);
            self.timer.restart(period);
        });
    }

    /// Switch the oscillator off; later waits are plain deadlines
    pub fn stop_transmit(&mut self) {
        critical_section::with(|_| {
            self.shared.transmitting.store(false, Ordering::Release);
            self.timer.restart(IDLE_TIMEOUT_TICKS);
        });
    }

    /// Tone used from the next waveform sample on
    pub fn select_tone(&mut self, tone: Tone) {
        self.shared.tone.store(tone.as_u8(), Ordering::Release);
    }

    /// Whether the oscillator is on
    #[must_use]
    pub fn is_transmitting(&self) -> bool {
        self.shared.transmitting.load(Ordering::Acquire)
    }

    /// Spin for `ticks` timer ticks while servicing `background`
    pub fn wait<B: Background + ?Sized>(&mut self, ticks: u16, background: &mut B) {
        background.kick();
        self.arm(ticks);
        while !self.shared.elapsed.load(Ordering::Acquire) {
            background.service();
        }
    }

    fn arm(&mut self, ticks: u16) {
        if self.is_transmitting() {
            self.shared.budget.store(ticks, Ordering::Relaxed);
            self.shared.elapsed.store(false, Ordering::Release);
        } else {
            critical_section::with(|_| {
                self.timer.restart(ticks);
                self.shared.elapsed.store(false, Ordering::Release);
            });
        }
    }
}

/// Interrupt half: runs once per timer overflow
pub struct Oscillator<'a> {
    shared: &'a ClockShared,
    mode: ClockMode,
    step: u8,
    last_period: u16,
    remaining: i32,
    armed: bool,
}

impl Oscillator<'_> {
    /// Handle one overflow
    pub fn on_overflow<T, D>(&mut self, timer: &T, dac: &mut D) -> ClockMode
    where
        T: OverflowTimer + ?Sized,
        D: LadderDac + ?Sized,
    {
        if self.shared.transmitting.load(Ordering::Acquire) {
            if self.mode == ClockMode::Deadline {
                self.enter_tone();
            }
            self.step = (self.step + 1) % SINE_TABLE.len() as u8;
            dac.write(SINE_TABLE[usize::from(self.step)]);

            let period = self.shared.tone().period_ticks();
            timer.reload(period);
            let elapsed = core::mem::replace(&mut self.last_period, period);
            self.charge(elapsed);
        } else {
            self.mode = ClockMode::Deadline;
            self.armed = false;
            self.shared.elapsed.store(true, Ordering::Release);
            timer.reload(IDLE_TIMEOUT_TICKS);
        }
        self.mode
    }

    /// Mode of the last overflow
    #[must_use]
    pub const fn mode(&self) -> ClockMode {
        self.mode
    }

    /// Tone currently selected by the foreground
    #[must_use]
    pub fn tone(&self) -> Tone {
        self.shared.tone()
    }

    /// Waveform table position of the last sample
    #[must_use]
    pub const fn step(&self) -> u8 {
        self.step
    }

    fn enter_tone(&mut self) {
        self.mode = ClockMode::Tone;
        // The period running now was started by `start_transmit`
        self.last_period = self.shared.lead_in.load(Ordering::Relaxed);
        self.remaining = 0;
        self.armed = false;
    }

    fn charge(&mut self, elapsed: u16) {
        // Every tone period counts, armed or not; time spent between waits
        // is owed by the next one
        self.remaining -= i32::from(elapsed);
        if self.shared.elapsed.load(Ordering::Acquire) {
            return;
        }
        if !self.armed {
            self.remaining += i32::from(self.shared.budget.load(Ordering::Relaxed));
            self.armed = true;
        }
        if self.remaining <= 0 {
            self.armed = false;
            self.shared.elapsed.store(true, Ordering::Release);
        }
    }
}
