//! AX.25 frame check sequence
//!
//! CRC-16/CCITT in its reflected form (polynomial 0x8408, initial value
//! 0xFFFF), computed one bit at a time in transmit order. The value sent
//! on air is the complement, low byte first.

/// Register value at the start of a frame
pub const CRC_INIT: u16 = 0xFFFF;

/// Reflected CCITT polynomial
pub const CRC_POLY: u16 = 0x8408;

/// Bit-serial CRC accumulator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc16(u16);

impl Crc16 {
    /// Seeded accumulator
    #[must_use]
    pub const fn new() -> Self {
        Self(CRC_INIT)
    }

    /// Fold in one transmitted bit
    pub fn update_bit(&mut self, bit: bool) {
        let mix = self.0 ^ u16::from(bit);
        self.0 >>= 1;
        if mix & 0x0001 != 0 {
            self.0 ^= CRC_POLY;
        }
    }

    /// Fold in a byte, least-significant bit first
    pub fn update_byte(&mut self, byte: u8) {
        let mut bits = byte;
        for _ in 0..8 {
            self.update_bit(bits & 1 != 0);
            bits >>= 1;
        }
    }

    /// Raw register contents
    #[must_use]
    pub const fn register(self) -> u16 {
        self.0
    }

    /// Frame check sequence (complemented register)
    #[must_use]
    pub const fn fcs(self) -> u16 {
        !self.0
    }

    /// FCS bytes in transmit order: low, then high
    #[must_use]
    pub const fn fcs_bytes(self) -> [u8; 2] {
        let fcs = self.fcs();
        [(fcs & 0xFF) as u8, (fcs >> 8) as u8]
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// FCS of a complete byte sequence
#[must_use]
pub fn fcs(data: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    for &byte in data {
        crc.update_byte(byte);
    }
    crc.fcs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        // CRC-16/X-25 catalogue check
        assert_eq!(fcs(b"123456789"), 0x906E);
    }

    #[test]
    fn empty_input_is_complemented_seed() {
        assert_eq!(fcs(&[]), 0x0000);
        assert_eq!(Crc16::new().register(), 0xFFFF);
    }

    #[test]
    fn fcs_bytes_low_first() {
        let mut crc = Crc16::new();
        crc.update_byte(b'A');
        let [lo, hi] = crc.fcs_bytes();
        assert_eq!(u16::from(lo) | (u16::from(hi) << 8), crc.fcs());
    }
}
