//! Hardware Abstraction Layer
//!
//! STM32G474 implementations of the seams the protocol core is written
//! against. Interrupt-side drivers touch registers through the PAC so they
//! can run from bare `#[interrupt]` handlers without an executor.

pub mod adc;
pub mod dac;
pub mod gpio;
pub mod timer;
pub mod uart;
pub mod watchdog;
