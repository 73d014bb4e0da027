//! Telemetry inputs

/// Analog channels in a telemetry report (the reference channel 0 plus
/// the five reported channels)
pub const ANALOG_CHANNELS: u8 = 6;

/// Readings sampled for a telemetry report
pub trait TelemetrySource {
    /// 10-bit reading of `channel` (0..ANALOG_CHANNELS)
    fn analog(&mut self, channel: u8) -> u16;

    /// Digital input bitmap; bits 1 to 6 are reported
    fn digital_inputs(&mut self) -> u8;
}

/// Render the eight digital characters: bits 1 to 6, then two spare zeros
#[must_use]
pub fn digital_chars(pins: u8) -> [u8; 8] {
    let mut out = [b'0'; 8];
    for (slot, bit) in out.iter_mut().zip(1..=6) {
        if pins & (1 << bit) != 0 {
            *slot = b'1';
        }
    }
    out
}
