//! Symbol sink keying the oscillator

use super::clock::{Background, BitClock, OverflowTimer};
use crate::ax25::SymbolSink;
use crate::types::Tone;

/// Holds each line symbol on the oscillator for one bit period
pub struct AfskKeyer<'k, 'a, T, B: ?Sized> {
    clock: &'k mut BitClock<'a, T>,
    background: &'k mut B,
    bit_ticks: u16,
    symbols: u32,
}

impl<'k, 'a, T: OverflowTimer, B: Background + ?Sized> AfskKeyer<'k, 'a, T, B> {
    /// Keyer pacing bits at `bit_ticks`; the clock must be transmitting
    pub fn new(clock: &'k mut BitClock<'a, T>, background: &'k mut B, bit_ticks: u16) -> Self {
        Self {
            clock,
            background,
            bit_ticks,
            symbols: 0,
        }
    }

    /// Bit periods keyed so far
    #[must_use]
    pub const fn symbols(&self) -> u32 {
        self.symbols
    }
}

impl<T: OverflowTimer, B: Background + ?Sized> SymbolSink for AfskKeyer<'_, '_, T, B> {
    fn emit(&mut self, tone: Tone) {
        self.clock.select_tone(tone);
        self.clock.wait(self.bit_ticks, &mut *self.background);
        self.symbols = self.symbols.wrapping_add(1);
    }
}
