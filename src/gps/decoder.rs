//! NMEA position decoder
//!
//! A character-driven state machine. `$` starts a sentence, commas select
//! the active field, and before the first comma the sentence identity is
//! sniffed from single letters:
//!
//! - `C` only appears in `GPRMC`
//! - `S` marks sentences to skip (`GPGSA`, `GPGSV`); checked before `A`
//! - `A` ends `GPGGA`, unless an `S` was already seen
//!
//! The sniffing is deliberately letter-based and unaware of other
//! sentence types; anything unrecognized is dropped silently.

use super::fix::{FixField, FixFields};

/// Comma count after a link reset, larger than any routed field
const COMMA_SENTINEL: u8 = 25;

/// Identity of the sentence being decoded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SentenceType {
    /// Not (yet) recognized
    #[default]
    None,
    /// Recommended minimum data: speed and course
    Rmc,
    /// Fix data: time, position, satellites, altitude
    Gga,
    /// Recognized as a sentence to skip
    Ignored,
}

impl SentenceType {
    /// Field routed from the given comma position of this sentence
    #[must_use]
    pub const fn route(self, commas: u8) -> Option<FixField> {
        match (self, commas) {
            (Self::Gga, 1) => Some(FixField::Time),
            (Self::Gga, 2) => Some(FixField::Latitude),
            (Self::Gga, 4) => Some(FixField::Longitude),
            (Self::Gga, 7) => Some(FixField::Satellites),
            (Self::Gga, 9) => Some(FixField::Altitude),
            (Self::Rmc, 7) => Some(FixField::Speed),
            (Self::Rmc, 8) => Some(FixField::Course),
            _ => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SentenceType {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "none"),
            Self::Rmc => defmt::write!(f, "RMC"),
            Self::Gga => defmt::write!(f, "GGA"),
            Self::Ignored => defmt::write!(f, "ignored"),
        }
    }
}

/// Position within the current sentence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeCursor {
    /// Sentence identity so far
    pub sentence: SentenceType,
    /// Commas seen since `$`
    pub commas: u8,
    /// Character index within the active field
    pub index: u8,
}

impl DecodeCursor {
    /// Cursor after a link reset: nothing routes until the next `$`
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            sentence: SentenceType::None,
            commas: COMMA_SENTINEL,
            index: 0,
        }
    }

    /// Cursor right after `$`
    #[must_use]
    pub const fn sentence_start() -> Self {
        Self {
            sentence: SentenceType::None,
            commas: 0,
            index: 0,
        }
    }
}

impl Default for DecodeCursor {
    fn default() -> Self {
        Self::idle()
    }
}

/// Sentence counters, for diagnostics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecoderStats {
    /// `GPGGA` sentences that reached their first field
    pub gga: u16,
    /// `GPRMC` sentences that reached their first field
    pub rmc: u16,
    /// Sentences skipped or unrecognized
    pub skipped: u16,
}

#[cfg(feature = "embedded")]
impl defmt::Format for DecoderStats {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "NMEA(gga={}, rmc={}, skipped={})", self.gga, self.rmc, self.skipped);
    }
}

/// Streaming NMEA field extractor
#[derive(Clone, Debug)]
pub struct PositionDecoder {
    fix: FixFields,
    cursor: DecodeCursor,
    stats: DecoderStats,
}

impl PositionDecoder {
    /// Create a decoder with pre-fix defaults, waiting for `$`
    #[must_use]
    pub fn new() -> Self {
        Self {
            fix: FixFields::new(),
            cursor: DecodeCursor::idle(),
            stats: DecoderStats::default(),
        }
    }

    /// Consume one received character
    pub fn feed(&mut self, byte: u8) {
        match byte {
            0 => self.cursor = DecodeCursor::idle(),
            b'$' => self.cursor = DecodeCursor::sentence_start(),
            b',' => {
                self.cursor.commas = self.cursor.commas.saturating_add(1);
                self.cursor.index = 0;
                if self.cursor.commas == 1 {
                    self.count_sentence();
                }
            }
            _ if self.cursor.commas == 0 => self.sniff(byte),
            _ => self.store(byte),
        }
    }

    /// Consume a run of characters
    pub fn feed_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.feed(byte);
        }
    }

    /// Fields as decoded so far (may be mid-sentence)
    #[must_use]
    pub const fn fix(&self) -> &FixFields {
        &self.fix
    }

    /// Current cursor
    #[must_use]
    pub const fn cursor(&self) -> DecodeCursor {
        self.cursor
    }

    /// Sentence counters
    #[must_use]
    pub const fn stats(&self) -> DecoderStats {
        self.stats
    }

    fn sniff(&mut self, byte: u8) {
        match byte {
            b'C' => self.cursor.sentence = SentenceType::Rmc,
            b'S' => self.cursor.sentence = SentenceType::Ignored,
            b'A' if self.cursor.sentence != SentenceType::Ignored => {
                self.cursor.sentence = SentenceType::Gga;
            }
            _ => {}
        }
    }

    fn store(&mut self, byte: u8) {
        let Some(field) = self.cursor.sentence.route(self.cursor.commas) else {
            return;
        };
        if self.fix.set(field, usize::from(self.cursor.index), byte) {
            self.cursor.index += 1;
        }
    }

    fn count_sentence(&mut self) {
        let counter = match self.cursor.sentence {
            SentenceType::Gga => &mut self.stats.gga,
            SentenceType::Rmc => &mut self.stats.rmc,
            SentenceType::None | SentenceType::Ignored => &mut self.stats.skipped,
        };
        *counter = counter.wrapping_add(1);
        trace!("nmea sentence {}", self.cursor.sentence);
    }
}

impl Default for PositionDecoder {
    fn default() -> Self {
        Self::new()
    }
}
