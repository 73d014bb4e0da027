//! Read-only text resource
//!
//! Canned header bytes and operator messages live in one byte blob and are
//! addressed by offset. A string runs from its offset to the next zero
//! byte. The blob is laid out once at boot and never written afterwards.

use core::fmt;

use heapless::Vec;

use super::address::{AddressError, Ax25Address};
use super::{CONTROL_UI, PID_NO_LAYER3};

/// Byte-addressable read-only storage
pub trait TextStore {
    /// Byte at `offset`; zero past the end
    fn read_byte(&self, offset: u16) -> u8;
}

impl TextStore for [u8] {
    fn read_byte(&self, offset: u16) -> u8 {
        self.get(usize::from(offset)).copied().unwrap_or(0)
    }
}

/// Failure while laying out the text blob
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextError {
    /// Blob capacity exhausted
    Full,
    /// Header needs at least a destination and a source
    MissingAddress,
    /// Operator text contains a zero byte
    EmbeddedNul,
    /// Address text rejected
    Address(AddressError),
}

impl From<AddressError> for TextError {
    fn from(err: AddressError) -> Self {
        Self::Address(err)
    }
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "text resource full"),
            Self::MissingAddress => write!(f, "header needs destination and source"),
            Self::EmbeddedNul => write!(f, "text contains a zero byte"),
            Self::Address(err) => write!(f, "address: {err}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TextError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Full => defmt::write!(f, "text resource full"),
            Self::MissingAddress => defmt::write!(f, "header needs destination and source"),
            Self::EmbeddedNul => defmt::write!(f, "text contains a zero byte"),
            Self::Address(err) => defmt::write!(f, "address: {}", err),
        }
    }
}

/// Offsets of the canned station strings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextLayout {
    /// Header including the digipeater path
    pub full_header: u16,
    /// Destination and source only; this is the header transmitted
    pub header: u16,
    /// Operator message
    pub message: u16,
}

/// Text blob held in RAM
#[derive(Clone, Debug, Default)]
pub struct StaticText<const N: usize> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> StaticText<N> {
    /// Empty blob
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Lay out a station's canned strings.
    ///
    /// `path` lists digipeater aliases for the full header; the trimmed
    /// header carries only `destination` and `source`.
    pub fn station(
        destination: &str,
        source: &str,
        path: &[&str],
        message: &str,
    ) -> Result<(Self, TextLayout), TextError> {
        let destination: Ax25Address = destination.parse()?;
        let source: Ax25Address = source.parse()?;

        let mut addresses: Vec<Ax25Address, 10> = Vec::new();
        addresses.push(destination).map_err(|_| TextError::Full)?;
        addresses.push(source).map_err(|_| TextError::Full)?;
        for hop in path {
            addresses.push(hop.parse()?).map_err(|_| TextError::Full)?;
        }

        let mut text = Self::new();
        let full_header = text.push_header(&addresses)?;
        let header = text.push_header(&addresses[..2])?;
        let message = text.push_str(message)?;
        Ok((
            text,
            TextLayout {
                full_header,
                header,
                message,
            },
        ))
    }

    /// Append an address block: addresses, control, PID, terminator
    pub fn push_header(&mut self, addresses: &[Ax25Address]) -> Result<u16, TextError> {
        if addresses.len() < 2 {
            return Err(TextError::MissingAddress);
        }
        let offset = self.offset()?;
        let last = addresses.len() - 1;
        for (index, address) in addresses.iter().enumerate() {
            let encoded = address.encode(index == last)?;
            self.extend(&encoded)?;
        }
        self.extend(&[CONTROL_UI, PID_NO_LAYER3, 0])?;
        Ok(offset)
    }

    /// Append a zero-terminated string
    pub fn push_str(&mut self, text: &str) -> Result<u16, TextError> {
        if text.bytes().any(|b| b == 0) {
            return Err(TextError::EmbeddedNul);
        }
        let offset = self.offset()?;
        self.extend(text.as_bytes())?;
        self.extend(&[0])?;
        Ok(offset)
    }

    /// Bytes laid out so far
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// String starting at `offset`, without its terminator
    #[must_use]
    pub fn string_at(&self, offset: u16) -> &[u8] {
        let tail = self.bytes.get(usize::from(offset)..).unwrap_or(&[]);
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        &tail[..end]
    }

    fn offset(&self) -> Result<u16, TextError> {
        u16::try_from(self.bytes.len()).map_err(|_| TextError::Full)
    }

    fn extend(&mut self, bytes: &[u8]) -> Result<(), TextError> {
        self.bytes.extend_from_slice(bytes).map_err(|()| TextError::Full)
    }
}

impl<const N: usize> TextStore for StaticText<N> {
    fn read_byte(&self, offset: u16) -> u8 {
        self.bytes.as_slice().read_byte(offset)
    }
}
