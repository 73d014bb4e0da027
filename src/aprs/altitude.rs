//! Meters to feet without a multiplier
//!
//! `x * 3.28084` is approximated as `x * 3` followed by five
//! shift-and-add steps, which is about 3.2783. The result never exceeds
//! the exact value and stays within `0.0008 * exact + 5` feet below it for
//! altitudes up to 9999 m.

use crate::types::AsciiField;

/// Digits in the rendered altitude
pub const FEET_DIGITS: usize = 6;

/// Largest altitude the six digits can show
pub const MAX_FEET: u32 = 999_999;

/// Altitude as six zero-padded digits
pub type FeetText = AsciiField<{ FEET_DIGITS + 1 }>;

/// Convert whole meters to feet
#[must_use]
pub const fn meters_to_feet(meters: u32) -> u32 {
    let mut x = meters.saturating_mul(3);
    x = x.saturating_add(x >> 4);
    x = x.saturating_add(x >> 6);
    x = x.saturating_add(x >> 7);
    x = x.saturating_add(x >> 8);
    x = x.saturating_add(x >> 10);
    x
}

/// Whole meters from an altitude field such as `545.4`.
///
/// Only the first seven characters count. The integer part ends at the
/// first `.` or zero byte after the first character (or at the seventh
/// character), and digits are read leftwards from there until a
/// non-digit, so a sign or stray character cuts the value short.
#[must_use]
pub fn parse_meters(field: &[u8]) -> u32 {
    let mut text = [0u8; 7];
    for (cell, &byte) in text.iter_mut().zip(field) {
        *cell = byte;
    }
    text[6] = b'.';

    let point = (1..text.len())
        .find(|&i| text[i] == b'.' || text[i] == 0)
        .unwrap_or(6);

    let mut meters = 0u32;
    let mut scale = 1u32;
    for &c in text[..point].iter().rev() {
        if !c.is_ascii_digit() {
            break;
        }
        meters += u32::from(c - b'0') * scale;
        scale *= 10;
    }
    meters
}

/// Render feet as six zero-padded digits, clamped to `999999`
#[must_use]
pub fn render_feet(feet: u32) -> FeetText {
    let mut value = feet.min(MAX_FEET);
    let mut digits = [b'0'; FEET_DIGITS];
    for cell in digits.iter_mut().rev() {
        *cell = b'0' + (value % 10) as u8;
        value /= 10;
    }
    FeetText::from_bytes(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_conversions() {
        assert_eq!(meters_to_feet(0), 0);
        assert_eq!(meters_to_feet(1), 3);
        assert_eq!(meters_to_feet(100), 325);
        assert_eq!(meters_to_feet(545), 1784);
    }

    #[test]
    fn parses_integer_part() {
        assert_eq!(parse_meters(b"545.4\0\0"), 545);
        assert_eq!(parse_meters(b"001.000"), 1);
        assert_eq!(parse_meters(b"1234567"), 123_456);
        assert_eq!(parse_meters(b"00."), 0);
        assert_eq!(parse_meters(b"-12.5"), 12);
        assert_eq!(parse_meters(b"12"), 12);
        assert_eq!(parse_meters(b""), 0);
    }

    #[test]
    fn renders_padded() {
        assert_eq!(render_feet(3).as_bytes(), b"000003");
        assert_eq!(render_feet(1_234_567).as_bytes(), b"999999");
    }
}
