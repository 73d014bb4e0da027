//! AFSK Modem
//!
//! One hardware timer serves two purposes, selected per overflow:
//!
//! | Mode       | On overflow                                         |
//! |------------|-----------------------------------------------------|
//! | `Deadline` | mark the armed wait elapsed, reload the idle period |
//! | `Tone`     | next sine sample to the DAC, reload the tone period, charge the period against the armed wait |
//!
//! The foreground side ([`BitClock`]) selects the mode, the tone and the
//! wait budget through atomic cells in [`ClockShared`]; the interrupt side
//! ([`Oscillator`]) is the only code touching the timer reload and the DAC
//! once running.

pub mod clock;
pub mod keyer;
pub mod waveform;

pub use clock::{auto_reload, Background, BitClock, ClockMode, ClockShared, Oscillator, OverflowTimer};
pub use keyer::AfskKeyer;
pub use waveform::{LadderDac, SINE_TABLE};
