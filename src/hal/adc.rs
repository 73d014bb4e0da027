//! ADC Driver
//!
//! Blocking reads of the six analog telemetry channels on ADC1.

use embassy_stm32::adc::{Adc, AnyAdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

use super::gpio::DigitalInputs;
use crate::aprs::{TelemetrySource, ANALOG_CHANNELS};

/// Telemetry reports carry 10-bit values
const TELEMETRY_BITS: u32 = 10;

/// ADC resolution on the G4
const ADC_BITS: u32 = 12;

/// Analog and digital telemetry inputs
pub struct TelemetryInputs<'d> {
    adc: Adc<'d, ADC1>,
    channels: [AnyAdcChannel<ADC1>; ANALOG_CHANNELS as usize],
    digital: DigitalInputs<'d>,
}

impl<'d> TelemetryInputs<'d> {
    /// Channels are numbered in array order
    pub fn new(
        mut adc: Adc<'d, ADC1>,
        channels: [AnyAdcChannel<ADC1>; ANALOG_CHANNELS as usize],
        digital: DigitalInputs<'d>,
    ) -> Self {
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self { adc, channels, digital }
    }
}

impl TelemetrySource for TelemetryInputs<'_> {
    fn analog(&mut self, channel: u8) -> u16 {
        match self.channels.get_mut(usize::from(channel)) {
            Some(pin) => self.adc.blocking_read(pin) >> (ADC_BITS - TELEMETRY_BITS),
            None => 0,
        }
    }

    fn digital_inputs(&mut self) -> u8 {
        self.digital.sample()
    }
}
