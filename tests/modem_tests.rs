//! Tests for the bit clock and tone oscillator
//!
//! The interrupt is simulated from `Background::service`: each call is one
//! timer overflow, and the bench adds up the ticks of every count that ran.

use core::cell::Cell;

use aprs_tracker::ax25::SymbolSink;
use aprs_tracker::config::{BIT_TICKS, IDLE_TIMEOUT_TICKS, MARK_PERIOD_TICKS, SPACE_PERIOD_TICKS};
use aprs_tracker::modem::{auto_reload, AfskKeyer, Background, ClockMode, ClockShared, LadderDac, Oscillator, OverflowTimer, SINE_TABLE};
use aprs_tracker::types::Tone;

/// Timer whose current period is whatever was loaded last
#[derive(Default)]
struct Timer {
    period: Cell<u16>,
    restarts: Cell<u32>,
}

impl OverflowTimer for Timer {
    fn reload(&self, ticks: u16) {
        self.period.set(ticks);
    }

    fn restart(&self, ticks: u16) {
        self.period.set(ticks);
        self.restarts.set(self.restarts.get() + 1);
    }
}

#[derive(Default)]
struct Levels(Vec<u8>);

impl LadderDac for Levels {
    fn write(&mut self, level: u8) {
        self.0.push(level);
    }
}

struct Isr<'a, 't> {
    oscillator: Oscillator<'a>,
    timer: &'t Timer,
    levels: Levels,
    ticks: u32,
    overflows: u32,
    kicked: Vec<Tone>,
}

impl<'a, 't> Isr<'a, 't> {
    fn new(oscillator: Oscillator<'a>, timer: &'t Timer) -> Self {
        Self {
            oscillator,
            timer,
            levels: Levels::default(),
            ticks: 0,
            overflows: 0,
            kicked: Vec::new(),
        }
    }
}

impl Background for Isr<'_, '_> {
    fn service(&mut self) {
        self.ticks += u32::from(self.timer.period.get());
        self.overflows += 1;
        self.oscillator.on_overflow(self.timer, &mut self.levels);
    }

    fn kick(&mut self) {
        self.kicked.push(self.oscillator.tone());
    }
}

// ============================================================================
// Deadline Mode Tests
// ============================================================================

#[test]
fn deadline_wait_is_one_overflow() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    clock.wait(500, &mut isr);
    assert_eq!(isr.overflows, 1);
    assert_eq!(isr.ticks, 500);
    assert_eq!(timer.restarts.get(), 1);
    assert_eq!(timer.period.get(), IDLE_TIMEOUT_TICKS);
    assert_eq!(isr.oscillator.mode(), ClockMode::Deadline);
    assert!(isr.levels.0.is_empty());
}

#[test]
fn stray_idle_overflow_is_harmless() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    isr.service();
    isr.service();
    clock.wait(300, &mut isr);
    assert_eq!(isr.overflows, 3);
    assert_eq!(timer.restarts.get(), 1);
}

// ============================================================================
// Tone Mode Tests
// ============================================================================

#[test]
fn tone_mode_plays_the_sine_table() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    clock.start_transmit(Tone::Mark);
    assert_eq!(timer.period.get(), MARK_PERIOD_TICKS);
    for _ in 0..2 * SINE_TABLE.len() {
        isr.service();
    }

    assert_eq!(isr.oscillator.mode(), ClockMode::Tone);
    let expected: Vec<u8> = SINE_TABLE.iter().cycle().skip(1).take(2 * SINE_TABLE.len()).copied().collect();
    assert_eq!(isr.levels.0, expected);
    assert_eq!(isr.oscillator.step(), 0);
}

#[test]
fn selected_tone_sets_the_next_period() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    clock.start_transmit(Tone::Mark);
    isr.service();
    assert_eq!(timer.period.get(), MARK_PERIOD_TICKS);
    clock.select_tone(Tone::Space);
    isr.service();
    assert_eq!(timer.period.get(), SPACE_PERIOD_TICKS);
}

#[test]
fn mark_bits_average_out_to_the_bit_period() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    clock.start_transmit(Tone::Mark);
    for _ in 0..100 {
        clock.wait(BIT_TICKS, &mut isr);
    }
    // ceil(100 * 1667 / 104)
    assert_eq!(isr.overflows, 1603);
}

#[test]
fn overshoot_carries_into_the_next_bit() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    clock.start_transmit(Tone::Mark);
    let tones = [Tone::Space, Tone::Space, Tone::Mark, Tone::Space, Tone::Mark, Tone::Mark, Tone::Mark];
    let mut budget = 0u32;
    for &tone in tones.iter().cycle().take(200) {
        clock.select_tone(tone);
        clock.wait(BIT_TICKS, &mut isr);
        budget += u32::from(BIT_TICKS);

        // Never early, and late by less than one sample period
        assert!(isr.ticks >= budget, "{} < {budget}", isr.ticks);
        assert!(isr.ticks - budget < u32::from(MARK_PERIOD_TICKS), "{} - {budget}", isr.ticks);
    }
}

#[test]
fn overflows_between_waits_are_owed_by_the_next_bit() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    clock.start_transmit(Tone::Mark);
    let tones = [Tone::Mark, Tone::Space, Tone::Space, Tone::Mark];
    let mut budget = 0u32;
    for &tone in tones.iter().cycle().take(100) {
        clock.select_tone(tone);
        clock.wait(BIT_TICKS, &mut isr);
        budget += u32::from(BIT_TICKS);
        assert!(isr.ticks >= budget, "{} < {budget}", isr.ticks);
        assert!(isr.ticks - budget < u32::from(MARK_PERIOD_TICKS), "{} - {budget}", isr.ticks);

        // The foreground is busy when the next sample period ends
        isr.service();
    }
}

#[test]
fn stop_transmit_returns_to_deadlines() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    clock.start_transmit(Tone::Space);
    assert!(clock.is_transmitting());
    clock.wait(BIT_TICKS, &mut isr);
    clock.stop_transmit();
    assert!(!clock.is_transmitting());
    assert_eq!(timer.period.get(), IDLE_TIMEOUT_TICKS);

    let levels = isr.levels.0.len();
    let overflows = isr.overflows;
    clock.wait(1000, &mut isr);
    assert_eq!(isr.overflows, overflows + 1);
    assert_eq!(isr.levels.0.len(), levels);
    assert_eq!(isr.oscillator.mode(), ClockMode::Deadline);
}

// ============================================================================
// Register Tests
// ============================================================================

/// Up-counter that overflows after counting past its auto-reload value
#[derive(Default)]
struct UpCounter {
    arr: Cell<u16>,
}

impl UpCounter {
    fn period(&self) -> u32 {
        u32::from(self.arr.get()) + 1
    }
}

impl OverflowTimer for UpCounter {
    fn reload(&self, ticks: u16) {
        self.arr.set(auto_reload(ticks));
    }

    fn restart(&self, ticks: u16) {
        self.arr.set(auto_reload(ticks));
    }
}

#[test]
fn counter_periods_match_the_requested_ticks() {
    let counter = UpCounter::default();
    let mut shared = ClockShared::new();
    let (mut clock, mut oscillator) = shared.split(&counter);
    let mut levels = Levels::default();

    clock.start_transmit(Tone::Mark);
    assert_eq!(counter.period(), u32::from(MARK_PERIOD_TICKS));
    clock.select_tone(Tone::Space);
    oscillator.on_overflow(&counter, &mut levels);
    assert_eq!(counter.period(), u32::from(SPACE_PERIOD_TICKS));

    clock.stop_transmit();
    assert_eq!(counter.period(), u32::from(IDLE_TIMEOUT_TICKS));
}

// ============================================================================
// Keyer Tests
// ============================================================================

#[test]
fn keyer_holds_each_symbol_for_one_bit() {
    let timer = Timer::default();
    let mut shared = ClockShared::new();
    let (mut clock, oscillator) = shared.split(&timer);
    let mut isr = Isr::new(oscillator, &timer);

    let symbols = [Tone::Space, Tone::Mark, Tone::Mark, Tone::Space, Tone::Space, Tone::Mark];
    clock.start_transmit(Tone::Mark);
    let mut keyer = AfskKeyer::new(&mut clock, &mut isr, BIT_TICKS);
    for &tone in &symbols {
        keyer.emit(tone);
    }
    assert_eq!(keyer.symbols(), 6);

    assert_eq!(isr.kicked, symbols);
    let total = u32::from(BIT_TICKS) * 6;
    assert!(isr.ticks >= total && isr.ticks - total < u32::from(MARK_PERIOD_TICKS));
}
