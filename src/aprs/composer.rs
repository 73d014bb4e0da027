//! Snapshot and rendering of APRS payloads

use super::altitude::{meters_to_feet, parse_meters, render_feet, FeetText};
use super::telemetry::{digital_chars, TelemetrySource};
use crate::ax25::PayloadSink;
use crate::config::{SYMBOL_CODE, SYMBOL_TABLE};
use crate::gps::fix::{
    FixFields, ALTITUDE_CAPACITY, COURSE_CAPACITY, LATITUDE_CAPACITY, LONGITUDE_CAPACITY,
    SATELLITES_CAPACITY, SPEED_CAPACITY, TIME_CAPACITY,
};
use crate::types::AsciiField;

/// Characters of latitude shown in a position report (`DDMM.MM`)
const LATITUDE_SHOWN: usize = 7;
/// Characters of longitude shown in a position report (`DDDMM.MM`)
const LONGITUDE_SHOWN: usize = 8;
/// Characters of course and speed shown
const VECTOR_SHOWN: usize = 3;

/// Fix fields frozen for one transmission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionReport {
    /// UTC time, 6 characters
    pub time: AsciiField<TIME_CAPACITY>,
    /// Latitude, 9 characters
    pub latitude: AsciiField<LATITUDE_CAPACITY>,
    /// Longitude, 10 characters
    pub longitude: AsciiField<LONGITUDE_CAPACITY>,
    /// Altitude in meters, 7 characters
    pub altitude: AsciiField<ALTITUDE_CAPACITY>,
    /// Speed, 5 characters
    pub speed: AsciiField<SPEED_CAPACITY>,
    /// Course, 5 characters
    pub course: AsciiField<COURSE_CAPACITY>,
    /// Satellites, 2 characters
    pub satellites: AsciiField<SATELLITES_CAPACITY>,
    /// Altitude in feet, six digits
    pub altitude_feet: FeetText,
}

impl PositionReport {
    /// Empty report, rendered as zero feet
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: AsciiField::new(),
            latitude: AsciiField::new(),
            longitude: AsciiField::new(),
            altitude: AsciiField::new(),
            speed: AsciiField::new(),
            course: AsciiField::new(),
            satellites: AsciiField::new(),
            altitude_feet: render_feet(0),
        }
    }

    /// Satellite count as one hex digit: `1x` becomes `A`..`F`, an
    /// unpadded single digit is sent as is, an empty count as `0`
    #[must_use]
    pub fn satellites_hex(&self) -> u8 {
        match (self.satellites.get(0), self.satellites.get(1)) {
            (0, _) => b'0',
            (digit, 0) => digit,
            (b'1', ones) => ones + 17,
            (_, ones) => ones,
        }
    }
}

impl Default for PositionReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds payloads from snapshotted fix fields
///
/// Owns the telemetry sequence number, which advances once per telemetry
/// report and wraps at 256.
#[derive(Clone, Debug)]
pub struct MessageComposer {
    report: PositionReport,
    sequence: u8,
}

impl MessageComposer {
    /// Composer whose first telemetry report carries `sequence`
    #[must_use]
    pub fn new(sequence: u8) -> Self {
        Self {
            report: PositionReport::new(),
            sequence,
        }
    }

    /// Freeze the current fields and derive altitude in feet
    pub fn prepare(&mut self, fix: &FixFields) {
        let report = &mut self.report;
        report.time.copy_terminated(&fix.time, 6);
        report.latitude.copy_terminated(&fix.latitude, 9);
        report.longitude.copy_terminated(&fix.longitude, 10);
        report.altitude.copy_terminated(&fix.altitude, 7);
        report.speed.copy_terminated(&fix.speed, 5);
        report.course.copy_terminated(&fix.course, 5);
        report.satellites.copy_terminated(&fix.satellites, 2);

        let meters = parse_meters(report.altitude.raw());
        report.altitude_feet = render_feet(meters_to_feet(meters));
        debug!(
            "snapshot alt={=u32}m feet={=[u8]:a}",
            meters,
            report.altitude_feet.as_bytes()
        );
    }

    /// Last snapshot
    #[must_use]
    pub const fn report(&self) -> &PositionReport {
        &self.report
    }

    /// Sequence number of the next telemetry report
    #[must_use]
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Write the position report payload
    pub fn render_position<S: PayloadSink + ?Sized>(&self, out: &mut S) {
        let report = &self.report;
        out.push_byte(b'@');
        out.push_bytes(report.time.as_bytes());
        out.push_byte(b'z');
        out.push_bytes(report.latitude.truncated(LATITUDE_SHOWN));
        out.push_byte(b'N');
        out.push_byte(SYMBOL_TABLE);
        out.push_bytes(report.longitude.truncated(LONGITUDE_SHOWN));
        out.push_byte(b'W');
        out.push_byte(SYMBOL_CODE);
        out.push_bytes(report.course.truncated(VECTOR_SHOWN));
        out.push_byte(b'/');
        out.push_bytes(report.speed.truncated(VECTOR_SHOWN));
        out.push_bytes(b"/A=");
        out.push_bytes(report.altitude_feet.as_bytes());
        out.push_byte(b' ');
        out.push_byte(report.satellites_hex());
        out.push_byte(b' ');
    }

    /// Write a telemetry payload and advance the sequence number
    pub fn render_telemetry<T, S>(&mut self, sensors: &mut T, out: &mut S)
    where
        T: TelemetrySource + ?Sized,
        S: PayloadSink + ?Sized,
    {
        out.push_bytes(b"T#");
        out.push_ebyte(u16::from(self.sequence));
        self.sequence = self.sequence.wrapping_add(1);
        out.push_byte(b',');

        for channel in 1..=5 {
            out.push_ebyte(sensors.analog(channel));
            out.push_byte(b',');
        }
        out.push_bytes(&digital_chars(sensors.digital_inputs()));

        out.push_byte(b',');
        out.push_ebyte(sensors.analog(0));
        out.push_byte(b',');
        out.push_bytes(self.report.time.as_bytes());
    }
}

impl Default for MessageComposer {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[test]
    fn satellites_above_nine_are_hex() {
        let mut report = PositionReport::new();
        report.satellites = AsciiField::from_bytes(b"12");
        assert_eq!(report.satellites_hex(), b'C');
        report.satellites = AsciiField::from_bytes(b"07");
        assert_eq!(report.satellites_hex(), b'7');
        report.satellites = AsciiField::new();
        assert_eq!(report.satellites_hex(), b'0');
    }

    #[test]
    fn unpadded_satellite_count_is_sent_as_is() {
        let mut report = PositionReport::new();
        report.satellites = AsciiField::from_bytes(b"8");
        assert_eq!(report.satellites_hex(), b'8');
        report.satellites = AsciiField::from_bytes(b"1");
        assert_eq!(report.satellites_hex(), b'1');
    }

    #[test]
    fn defaults_render_before_fix() {
        let mut composer = MessageComposer::new(0);
        composer.prepare(&FixFields::new());
        let mut out: Vec<u8, 64> = Vec::new();
        composer.render_position(&mut out);
        assert_eq!(out.as_slice(), b"@zN/WO000/000/A=000000 0 ");
    }
}
