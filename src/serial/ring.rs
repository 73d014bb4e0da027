//! Interrupt-safe byte ring
//!
//! Index convention: `head` names the slot written last, `tail` the slot
//! read last. The ring is empty when they are equal, so one of the `N`
//! slots is always unused.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

/// Behaviour of the receive side when the ring is full
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Advance the head regardless. Head lands on tail and the whole
    /// unread backlog becomes invisible, matching the classic firmware.
    Overwrite,
    /// Discard the incoming byte and keep the backlog
    #[default]
    DropNewest,
}

#[cfg(feature = "embedded")]
impl defmt::Format for OverflowPolicy {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Overwrite => defmt::write!(f, "overwrite"),
            Self::DropNewest => defmt::write!(f, "drop-newest"),
        }
    }
}

/// Data was lost because the consumer fell behind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Overflow;

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("serial ring overflow")
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Overflow {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "serial ring overflow");
    }
}

/// Fixed-capacity byte ring shared by one producer and one consumer
pub struct SerialChannel<const N: usize> {
    cells: [AtomicU8; N],
    /// Written by the producer only
    head: AtomicU8,
    /// Written by the consumer only
    tail: AtomicU8,
    /// Written by the producer only
    overflows: AtomicU8,
}

impl<const N: usize> SerialChannel<N> {
    const VALID: () = assert!(N >= 2 && N <= 256, "ring capacity must fit a u8 index");

    /// Create an empty channel
    #[must_use]
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self {
            cells: [const { AtomicU8::new(0) }; N],
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            overflows: AtomicU8::new(0),
        }
    }

    /// Number of bytes that can be queued at once
    #[must_use]
    pub const fn usable_capacity(&self) -> usize {
        N - 1
    }

    /// Hand out the producer and consumer halves.
    ///
    /// The exclusive borrow guarantees exactly one of each exists.
    pub fn split(&mut self) -> (Producer<'_, N>, Consumer<'_, N>) {
        let channel: &Self = self;
        (Producer { channel }, Consumer { channel })
    }

    fn len(&self) -> usize {
        let head = usize::from(self.head.load(Ordering::Acquire));
        let tail = usize::from(self.tail.load(Ordering::Acquire));
        (head + N - tail) % N
    }
}

impl<const N: usize> Default for SerialChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

const fn advance<const N: usize>(index: u8) -> u8 {
    let next = index as usize + 1;
    if next == N {
        0
    } else {
        next as u8
    }
}

/// Writing half of a [`SerialChannel`]
pub struct Producer<'a, const N: usize> {
    channel: &'a SerialChannel<N>,
}

impl<const N: usize> Producer<'_, N> {
    /// Append a byte, applying `policy` when the ring is full.
    ///
    /// Returns `Err(Overflow)` whenever data was lost: the incoming byte
    /// under [`OverflowPolicy::DropNewest`], the unread backlog under
    /// [`OverflowPolicy::Overwrite`].
    pub fn push(&mut self, byte: u8, policy: OverflowPolicy) -> Result<(), Overflow> {
        let head = self.channel.head.load(Ordering::Relaxed);
        let next = advance::<N>(head);
        let full = next == self.channel.tail.load(Ordering::Acquire);

        if full {
            self.record_overflow();
            if policy == OverflowPolicy::DropNewest {
                return Err(Overflow);
            }
        }

        self.channel.cells[usize::from(next)].store(byte, Ordering::Relaxed);
        self.channel.head.store(next, Ordering::Release);

        if full {
            Err(Overflow)
        } else {
            Ok(())
        }
    }

    /// Append a byte only if a slot is free; hands the byte back otherwise
    pub fn try_push(&mut self, byte: u8) -> Result<(), u8> {
        let head = self.channel.head.load(Ordering::Relaxed);
        let next = advance::<N>(head);
        if next == self.channel.tail.load(Ordering::Acquire) {
            return Err(byte);
        }
        self.channel.cells[usize::from(next)].store(byte, Ordering::Relaxed);
        self.channel.head.store(next, Ordering::Release);
        Ok(())
    }

    /// Check if no slot is free
    #[must_use]
    pub fn is_full(&self) -> bool {
        advance::<N>(self.channel.head.load(Ordering::Relaxed))
            == self.channel.tail.load(Ordering::Acquire)
    }

    fn record_overflow(&mut self) {
        // Single writer: a plain load/store pair cannot race.
        let count = self.channel.overflows.load(Ordering::Relaxed);
        self.channel
            .overflows
            .store(count.wrapping_add(1), Ordering::Relaxed);
    }
}

/// Reading half of a [`SerialChannel`]
pub struct Consumer<'a, const N: usize> {
    channel: &'a SerialChannel<N>,
}

impl<const N: usize> Consumer<'_, N> {
    /// Take the oldest byte, if any
    pub fn pop(&mut self) -> Option<u8> {
        let tail = self.channel.tail.load(Ordering::Relaxed);
        if tail == self.channel.head.load(Ordering::Acquire) {
            return None;
        }
        let next = advance::<N>(tail);
        let byte = self.channel.cells[usize::from(next)].load(Ordering::Relaxed);
        self.channel.tail.store(next, Ordering::Release);
        Some(byte)
    }

    /// Bytes waiting to be read
    #[must_use]
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    /// Check if nothing is waiting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channel.tail.load(Ordering::Relaxed) == self.channel.head.load(Ordering::Acquire)
    }

    /// Overflow events recorded by the producer (wraps at 256)
    #[must_use]
    pub fn overflow_count(&self) -> u8 {
        self.channel.overflows.load(Ordering::Relaxed)
    }
}
