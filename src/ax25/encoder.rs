//! NRZI frame encoder with bit stuffing

use heapless::Vec;

use super::crc::Crc16;
use super::text::TextStore;
use crate::types::Tone;

/// Frame delimiter
pub const FLAG: u8 = 0x7E;

/// Ones in a row before a zero is stuffed
const MAX_ONES: u8 = 5;

/// Consumer of line symbols, one bit period per call
pub trait SymbolSink {
    /// Hold `tone` for one bit period
    fn emit(&mut self, tone: Tone);
}

/// Destination for rendered payload bytes
pub trait PayloadSink {
    /// Append one byte
    fn push_byte(&mut self, byte: u8);

    /// Append bytes up to the first zero
    fn push_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes.iter().take_while(|&&b| b != 0) {
            self.push_byte(byte);
        }
    }

    /// Append a value as three decimal digits, clamped to 999
    fn push_ebyte(&mut self, value: u16) {
        let value = value.min(999);
        self.push_byte(b'0' + (value / 100) as u8);
        self.push_byte(b'0' + (value / 10 % 10) as u8);
        self.push_byte(b'0' + (value % 10) as u8);
    }
}

/// Captures the payload; bytes beyond the capacity are dropped.
impl<const N: usize> PayloadSink for Vec<u8, N> {
    fn push_byte(&mut self, byte: u8) {
        let _ = self.push(byte);
    }
}

/// Line state of one frame in flight
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransmitFrame {
    crc: Crc16,
    tone: Tone,
    ones: u8,
}

impl TransmitFrame {
    /// Fresh frame: seeded CRC, mark tone, no ones pending
    #[must_use]
    pub const fn new() -> Self {
        Self {
            crc: Crc16::new(),
            tone: Tone::Mark,
            ones: 0,
        }
    }

    /// Send one byte, folding it into the CRC unless it is a flag
    pub fn send_byte<S: SymbolSink + ?Sized>(&mut self, byte: u8, sink: &mut S) {
        self.send(byte, true, sink);
    }

    /// Send one byte without touching the CRC
    pub fn send_raw<S: SymbolSink + ?Sized>(&mut self, byte: u8, sink: &mut S) {
        self.send(byte, false, sink);
    }

    fn send<S: SymbolSink + ?Sized>(&mut self, byte: u8, checked: bool, sink: &mut S) {
        let flag = byte == FLAG;
        let mut bits = byte;
        for _ in 0..8 {
            let bit = bits & 1 != 0;
            if flag {
                self.ones = 0;
            } else if checked {
                self.crc.update_bit(bit);
            }

            if bit {
                self.ones += 1;
                if self.ones == MAX_ONES {
                    // Fifth one, then the stuffed zero's transition
                    sink.emit(self.tone);
                    self.tone = self.tone.toggle();
                    self.ones = 0;
                }
            } else {
                self.ones = 0;
                self.tone = self.tone.toggle();
            }

            sink.emit(self.tone);
            bits >>= 1;
        }
    }

    /// CRC accumulated so far
    #[must_use]
    pub const fn crc(&self) -> Crc16 {
        self.crc
    }

    /// Tone of the last bit sent
    #[must_use]
    pub const fn tone(&self) -> Tone {
        self.tone
    }

    /// Consecutive ones since the last zero or stuffed bit
    #[must_use]
    pub const fn ones(&self) -> u8 {
        self.ones
    }
}

impl Default for TransmitFrame {
    fn default() -> Self {
        Self::new()
    }
}

/// Where an encoder is in its frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePhase {
    /// Flags and address block
    Header,
    /// Information field
    Payload,
    /// FCS and closing flag
    Footer,
    /// Closing flag sent
    Closed,
}

#[cfg(feature = "embedded")]
impl defmt::Format for FramePhase {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Header => defmt::write!(f, "header"),
            Self::Payload => defmt::write!(f, "payload"),
            Self::Footer => defmt::write!(f, "footer"),
            Self::Closed => defmt::write!(f, "closed"),
        }
    }
}

/// One UI frame being keyed out
///
/// Created by [`FrameEncoder::open`], which sends the header; payload goes
/// through [`PayloadSink`]; [`FrameEncoder::close`] sends the footer and
/// consumes the encoder.
pub struct FrameEncoder<'s, S: SymbolSink + ?Sized> {
    sink: &'s mut S,
    frame: TransmitFrame,
    phase: FramePhase,
}

impl<'s, S: SymbolSink + ?Sized> FrameEncoder<'s, S> {
    /// Send `flags` flag bytes and the address block at `header`
    pub fn open<T: TextStore + ?Sized>(sink: &'s mut S, flags: u8, text: &T, header: u16) -> Self {
        let mut encoder = Self {
            sink,
            frame: TransmitFrame::new(),
            phase: FramePhase::Header,
        };
        for _ in 0..flags {
            encoder.frame.send_byte(FLAG, &mut *encoder.sink);
        }
        encoder.send_text(text, header);
        encoder.phase = FramePhase::Payload;
        encoder
    }

    /// Send one byte of the frame body
    pub fn send_byte(&mut self, byte: u8) {
        self.frame.send_byte(byte, &mut *self.sink);
    }

    /// Send the zero-terminated string at `offset`
    pub fn send_text<T: TextStore + ?Sized>(&mut self, text: &T, offset: u16) {
        let mut offset = offset;
        loop {
            let byte = text.read_byte(offset);
            if byte == 0 {
                break;
            }
            self.send_byte(byte);
            match offset.checked_add(1) {
                Some(next) => offset = next,
                None => break,
            }
        }
    }

    /// Send FCS and closing flag; returns the FCS
    pub fn close(mut self) -> u16 {
        self.phase = FramePhase::Footer;
        let fcs = self.frame.crc().fcs();
        let [low, high] = self.frame.crc().fcs_bytes();
        self.frame.send_raw(low, &mut *self.sink);
        self.frame.send_raw(high, &mut *self.sink);
        self.frame.send_byte(FLAG, &mut *self.sink);
        self.phase = FramePhase::Closed;
        trace!("frame closed fcs={=u16:#x}", fcs);
        fcs
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Line state
    #[must_use]
    pub const fn frame(&self) -> &TransmitFrame {
        &self.frame
    }
}

impl<S: SymbolSink + ?Sized> PayloadSink for FrameEncoder<'_, S> {
    fn push_byte(&mut self, byte: u8) {
        self.send_byte(byte);
    }
}
