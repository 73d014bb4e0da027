//! Sine table and ladder DAC seam

/// One sine cycle as 4-bit ladder levels
pub const SINE_TABLE: [u8; 16] = [7, 10, 13, 14, 15, 14, 13, 10, 8, 5, 2, 1, 0, 1, 2, 5];

/// Highest level the ladder can show
pub const MAX_LEVEL: u8 = 0x0F;

/// 4-bit resistor ladder output
pub trait LadderDac {
    /// Drive `level` (0..=15) onto the ladder
    fn write(&mut self, level: u8);
}
