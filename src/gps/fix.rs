//! Per-field GPS fix buffers

use crate::types::AsciiField;

/// UTC time buffer capacity
pub const TIME_CAPACITY: usize = 7;
/// Latitude buffer capacity
pub const LATITUDE_CAPACITY: usize = 10;
/// Longitude buffer capacity
pub const LONGITUDE_CAPACITY: usize = 11;
/// Altitude buffer capacity
pub const ALTITUDE_CAPACITY: usize = 8;
/// Speed buffer capacity
pub const SPEED_CAPACITY: usize = 6;
/// Course buffer capacity
pub const COURSE_CAPACITY: usize = 6;
/// Satellite count buffer capacity
pub const SATELLITES_CAPACITY: usize = 3;

/// One of the decoded fix fields
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixField {
    /// UTC time, `HHMMSS`
    Time,
    /// Latitude, `DDMM.MMMM`
    Latitude,
    /// Longitude, `DDDMM.MMMM`
    Longitude,
    /// Altitude in meters, `MMM.MMM`
    Altitude,
    /// Ground speed in knots
    Speed,
    /// Track angle in degrees
    Course,
    /// Satellites tracked
    Satellites,
}

#[cfg(feature = "embedded")]
impl defmt::Format for FixField {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Time => defmt::write!(f, "time"),
            Self::Latitude => defmt::write!(f, "lat"),
            Self::Longitude => defmt::write!(f, "lon"),
            Self::Altitude => defmt::write!(f, "alt"),
            Self::Speed => defmt::write!(f, "speed"),
            Self::Course => defmt::write!(f, "course"),
            Self::Satellites => defmt::write!(f, "sats"),
        }
    }
}

/// Set of fix fields as ASCII characters
///
/// The decoder writes these in place as characters stream in, so a
/// value shorter than the previous one leaves the old tail behind until
/// the snapshot cuts it off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixFields {
    /// UTC time
    pub time: AsciiField<TIME_CAPACITY>,
    /// Latitude
    pub latitude: AsciiField<LATITUDE_CAPACITY>,
    /// Longitude
    pub longitude: AsciiField<LONGITUDE_CAPACITY>,
    /// Altitude in meters
    pub altitude: AsciiField<ALTITUDE_CAPACITY>,
    /// Speed in knots
    pub speed: AsciiField<SPEED_CAPACITY>,
    /// Course in degrees
    pub course: AsciiField<COURSE_CAPACITY>,
    /// Satellites tracked
    pub satellites: AsciiField<SATELLITES_CAPACITY>,
}

impl FixFields {
    /// Fields before the first fix: zero speed, course and altitude so an
    /// early transmission still renders well-formed numbers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: AsciiField::new(),
            latitude: AsciiField::new(),
            longitude: AsciiField::new(),
            altitude: AsciiField::from_bytes(b"00."),
            speed: AsciiField::from_bytes(b"000"),
            course: AsciiField::from_bytes(b"000"),
            satellites: AsciiField::new(),
        }
    }

    /// Store one character of `field`; `false` if past its capacity
    pub fn set(&mut self, field: FixField, index: usize, byte: u8) -> bool {
        match field {
            FixField::Time => self.time.set(index, byte),
            FixField::Latitude => self.latitude.set(index, byte),
            FixField::Longitude => self.longitude.set(index, byte),
            FixField::Altitude => self.altitude.set(index, byte),
            FixField::Speed => self.speed.set(index, byte),
            FixField::Course => self.course.set(index, byte),
            FixField::Satellites => self.satellites.set(index, byte),
        }
    }
}

impl Default for FixFields {
    fn default() -> Self {
        Self::new()
    }
}
