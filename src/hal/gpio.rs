//! GPIO Abstractions
//!
//! Transmitter keying and the digital telemetry inputs.

use embassy_stm32::gpio::{Input, Output};

use crate::beacon::TransmitterControl;

/// Push-to-talk gate and indicator LED
pub struct RadioGate<'d> {
    ptt: Output<'d>,
    led: Output<'d>,
}

impl<'d> RadioGate<'d> {
    /// Take both pins; they start low (receive, LED off)
    #[must_use]
    pub fn new(mut ptt: Output<'d>, mut led: Output<'d>) -> Self {
        ptt.set_low();
        led.set_low();
        Self { ptt, led }
    }

    /// Whether the transmitter is keyed
    #[must_use]
    pub fn is_keyed(&self) -> bool {
        self.ptt.is_set_high()
    }
}

impl TransmitterControl for RadioGate<'_> {
    fn set_ptt(&mut self, on: bool) {
        if on {
            self.ptt.set_high();
        } else {
            self.ptt.set_low();
        }
    }

    fn set_indicator(&mut self, on: bool) {
        if on {
            self.led.set_high();
        } else {
            self.led.set_low();
        }
    }
}

/// Six digital telemetry inputs
pub struct DigitalInputs<'d> {
    pins: [Input<'d>; 6],
}

impl<'d> DigitalInputs<'d> {
    /// Inputs reported as bits 1 through 6, in order
    #[must_use]
    pub fn new(pins: [Input<'d>; 6]) -> Self {
        Self { pins }
    }

    /// Pin states with input `n` at bit `n + 1`
    #[must_use]
    pub fn sample(&self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.is_high())
            .fold(0, |bits, (index, _)| bits | (1 << (index + 1)))
    }
}
