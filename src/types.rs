//! Shared types used across the tracker firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

use crate::config::{MARK_PERIOD_TICKS, SPACE_PERIOD_TICKS};

/// Bell-202 tone currently keyed onto the audio output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tone {
    /// 1200 Hz
    #[default]
    Mark,
    /// 2200 Hz
    Space,
}

impl Tone {
    /// The other tone (an NRZI transition)
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Mark => Self::Space,
            Self::Space => Self::Mark,
        }
    }

    /// Timer reload between waveform samples for this tone
    #[must_use]
    pub const fn period_ticks(self) -> u16 {
        match self {
            Self::Mark => MARK_PERIOD_TICKS,
            Self::Space => SPACE_PERIOD_TICKS,
        }
    }

    /// Encode for storage in a byte-sized shared cell
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Mark => 0,
            Self::Space => 1,
        }
    }

    /// Decode from a byte-sized shared cell (anything non-zero is space)
    #[must_use]
    pub const fn from_u8(raw: u8) -> Self {
        if raw == 0 {
            Self::Mark
        } else {
            Self::Space
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Tone {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Mark => defmt::write!(f, "MARK"),
            Self::Space => defmt::write!(f, "SPACE"),
        }
    }
}

/// Fixed-capacity ASCII field
///
/// GPS values are carried as the characters the receiver sent, never as
/// numbers, so truncation is exactly what the wire format shows. Unwritten
/// cells stay zero and the value reads up to the first zero byte.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AsciiField<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> AsciiField<N> {
    /// Capacity in bytes
    pub const CAPACITY: usize = N;

    /// Create an all-zero (empty) field
    #[must_use]
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    /// Create a field holding `text`, truncated to the capacity
    #[must_use]
    pub fn from_bytes(text: &[u8]) -> Self {
        let mut field = Self::new();
        for (index, &byte) in text.iter().take(N).enumerate() {
            field.bytes[index] = byte;
        }
        field
    }

    /// Store one character; returns `false` if `index` is past the capacity
    pub fn set(&mut self, index: usize, byte: u8) -> bool {
        match self.bytes.get_mut(index) {
            Some(cell) => {
                *cell = byte;
                true
            }
            None => false,
        }
    }

    /// Character at `index`, zero past the capacity
    #[must_use]
    pub fn get(&self, index: usize) -> u8 {
        self.bytes.get(index).copied().unwrap_or(0)
    }

    /// The value: characters up to the first zero byte
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.bytes.iter().position(|&b| b == 0).unwrap_or(N);
        &self.bytes[..end]
    }

    /// The value cut to at most `len` characters
    #[must_use]
    pub fn truncated(&self, len: usize) -> &[u8] {
        let value = self.as_bytes();
        &value[..value.len().min(len)]
    }

    /// Raw storage including zero cells
    #[must_use]
    pub const fn raw(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Copy the first `len` raw cells of `source` and zero-terminate.
    ///
    /// `len` is clamped so the terminator always fits.
    pub fn copy_terminated<const M: usize>(&mut self, source: &AsciiField<M>, len: usize) {
        let len = len.min(N.saturating_sub(1));
        for index in 0..len {
            self.bytes[index] = source.get(index);
        }
        for cell in &mut self.bytes[len..] {
            *cell = 0;
        }
    }

    /// Number of characters in the value
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Check if the value is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.first().map_or(true, |&b| b == 0)
    }
}

impl<const N: usize> Default for AsciiField<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for AsciiField<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match core::str::from_utf8(self.as_bytes()) {
            Ok(text) => write!(f, "{text:?}"),
            Err(_) => write!(f, "{:?}", self.as_bytes()),
        }
    }
}

#[cfg(feature = "embedded")]
impl<const N: usize> defmt::Format for AsciiField<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:a}", self.as_bytes());
    }
}
