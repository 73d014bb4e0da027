//! Tests for the serial transport
//!
//! Ring FIFO ordering, overflow policies and the foreground/interrupt split.

use aprs_tracker::config::SERIAL_BUFFER_SIZE;
use aprs_tracker::serial::{split, Overflow, OverflowPolicy, SerialChannel, TxPrime};

#[derive(Default)]
struct FakeUsart {
    tx_interrupt: bool,
    primes: usize,
}

impl TxPrime for FakeUsart {
    fn is_idle(&self) -> bool {
        !self.tx_interrupt
    }

    fn prime(&mut self) {
        self.tx_interrupt = true;
        self.primes += 1;
    }
}

// ============================================================================
// Ring Tests
// ============================================================================

#[test]
fn ring_holds_capacity_minus_one() {
    let mut channel = SerialChannel::<SERIAL_BUFFER_SIZE>::new();
    assert_eq!(channel.usable_capacity(), 95);
    let (mut producer, mut consumer) = channel.split();

    for byte in 0..95u8 {
        assert_eq!(producer.push(byte, OverflowPolicy::DropNewest), Ok(()));
    }
    assert!(producer.is_full());
    assert_eq!(consumer.len(), 95);
    assert_eq!(consumer.pop(), Some(0));
    assert!(!producer.is_full());
}

#[test]
fn ring_is_fifo_across_wraparound() {
    let mut channel = SerialChannel::<8>::new();
    let (mut producer, mut consumer) = channel.split();
    let mut expected = 0u8;
    let mut next = 0u8;

    // Interleave bursts of pushes with partial drains for several laps
    for burst in [3usize, 7, 1, 5, 6, 2, 7, 4] {
        for _ in 0..burst {
            if producer.try_push(next).is_ok() {
                next = next.wrapping_add(1);
            }
        }
        for _ in 0..(burst / 2 + 1) {
            if let Some(byte) = consumer.pop() {
                assert_eq!(byte, expected);
                expected = expected.wrapping_add(1);
            }
        }
    }
    while let Some(byte) = consumer.pop() {
        assert_eq!(byte, expected);
        expected = expected.wrapping_add(1);
    }
    assert_eq!(expected, next);
}

#[test]
fn drop_newest_keeps_backlog() {
    let mut channel = SerialChannel::<4>::new();
    let (mut producer, mut consumer) = channel.split();

    for byte in [1, 2, 3] {
        producer.push(byte, OverflowPolicy::DropNewest).unwrap();
    }
    assert_eq!(producer.push(4, OverflowPolicy::DropNewest), Err(Overflow));
    assert_eq!(consumer.overflow_count(), 1);

    assert_eq!(consumer.pop(), Some(1));
    assert_eq!(consumer.pop(), Some(2));
    assert_eq!(consumer.pop(), Some(3));
    assert_eq!(consumer.pop(), None);
}

#[test]
fn overwrite_loses_backlog() {
    let mut channel = SerialChannel::<4>::new();
    let (mut producer, mut consumer) = channel.split();

    for byte in [1, 2, 3] {
        producer.push(byte, OverflowPolicy::Overwrite).unwrap();
    }
    // Head catches the tail: the ring reads as empty afterwards
    assert_eq!(producer.push(4, OverflowPolicy::Overwrite), Err(Overflow));
    assert_eq!(consumer.overflow_count(), 1);
    assert!(consumer.is_empty());

    producer.push(5, OverflowPolicy::Overwrite).unwrap();
    assert_eq!(consumer.pop(), Some(5));
}

// ============================================================================
// Link Tests
// ============================================================================

#[test]
fn link_receives_in_order() {
    let mut rx = SerialChannel::<SERIAL_BUFFER_SIZE>::new();
    let mut tx = SerialChannel::<SERIAL_BUFFER_SIZE>::new();
    let (mut link, mut isr) = split(&mut rx, &mut tx, FakeUsart::default(), OverflowPolicy::DropNewest);

    for &byte in b"$GPGGA," {
        isr.on_receive(byte).unwrap();
    }
    let mut received = Vec::new();
    while let Some(byte) = link.poll_received() {
        received.push(byte);
    }
    assert_eq!(received, b"$GPGGA,");
    assert_eq!(link.overflow_count(), 0);
}

#[test]
fn link_counts_receive_overflow() {
    let mut rx = SerialChannel::<4>::new();
    let mut tx = SerialChannel::<4>::new();
    let (link, mut isr) = split(&mut rx, &mut tx, FakeUsart::default(), OverflowPolicy::DropNewest);

    for byte in 0..6 {
        let _ = isr.on_receive(byte);
    }
    assert_eq!(link.pending(), 3);
    assert_eq!(link.overflow_count(), 3);
    assert_eq!(isr.policy(), OverflowPolicy::DropNewest);
}

#[test]
fn transmit_drains_through_isr() {
    let mut rx = SerialChannel::<SERIAL_BUFFER_SIZE>::new();
    let mut tx = SerialChannel::<SERIAL_BUFFER_SIZE>::new();
    let (mut link, mut isr) = split(&mut rx, &mut tx, FakeUsart::default(), OverflowPolicy::DropNewest);

    link.send_str("OK\r\n");
    assert_eq!(link.port().primes, 1);

    let mut sent = Vec::new();
    while let Some(byte) = isr.on_transmit_ready() {
        sent.push(byte);
    }
    assert_eq!(sent, b"OK\r\n");
}
