//! Resistor ladder DAC
//!
//! Four GPIOB outputs (PB2..PB5, 8.2k/3.9k/2k/1k) summed into the audio
//! line. All four bits change in one BSRR write so no intermediate level
//! appears on the output.

use embassy_stm32::gpio::{Level, Output, Pin, Speed};
use embassy_stm32::pac;
use embassy_stm32::Peripheral;

use crate::config::pins::DAC_SHIFT;
use crate::modem::LadderDac;

/// Ladder bits, least significant first
const LADDER_BITS: usize = 4;

/// Ladder outputs on GPIOB
pub struct GpioLadder<'d> {
    _pins: [Output<'d>; LADDER_BITS],
}

impl<'d> GpioLadder<'d> {
    /// Configure the ladder pins, driving level zero
    pub fn new(
        bit0: impl Peripheral<P = impl Pin> + 'd,
        bit1: impl Peripheral<P = impl Pin> + 'd,
        bit2: impl Peripheral<P = impl Pin> + 'd,
        bit3: impl Peripheral<P = impl Pin> + 'd,
    ) -> Self {
        Self {
            _pins: [
                Output::new(bit0, Level::Low, Speed::VeryHigh),
                Output::new(bit1, Level::Low, Speed::VeryHigh),
                Output::new(bit2, Level::Low, Speed::VeryHigh),
                Output::new(bit3, Level::Low, Speed::VeryHigh),
            ],
        }
    }
}

impl LadderDac for GpioLadder<'_> {
    fn write(&mut self, level: u8) {
        pac::GPIOB.bsrr().write(|w| {
            for bit in 0..LADDER_BITS {
                let pin = DAC_SHIFT + bit;
                if level & (1 << bit) != 0 {
                    w.set_bs(pin, true);
                } else {
                    w.set_br(pin, true);
                }
            }
        });
    }
}
