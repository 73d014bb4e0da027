//! Foreground and interrupt halves of the GPS serial link

use super::ring::{Consumer, Overflow, OverflowPolicy, Producer, SerialChannel};

/// Hardware transmitter hook used by the foreground half
pub trait TxPrime {
    /// Check if the transmit data register is empty and no drain is running
    fn is_idle(&self) -> bool;

    /// Start the transmit-empty event chain so the ISR drains the TX ring
    fn prime(&mut self);
}

/// Foreground half: reads received bytes, queues bytes to send
pub struct SerialLink<'a, P, const N: usize> {
    rx: Consumer<'a, N>,
    tx: Producer<'a, N>,
    port: P,
}

/// Interrupt half: stores received bytes, feeds the transmitter
pub struct SerialIsr<'a, const N: usize> {
    rx: Producer<'a, N>,
    tx: Consumer<'a, N>,
    policy: OverflowPolicy,
}

/// Assemble both halves from an RX and a TX channel
pub fn split<'a, P: TxPrime, const N: usize>(
    rx: &'a mut SerialChannel<N>,
    tx: &'a mut SerialChannel<N>,
    port: P,
    policy: OverflowPolicy,
) -> (SerialLink<'a, P, N>, SerialIsr<'a, N>) {
    let (rx_producer, rx_consumer) = rx.split();
    let (tx_producer, tx_consumer) = tx.split();
    (
        SerialLink {
            rx: rx_consumer,
            tx: tx_producer,
            port,
        },
        SerialIsr {
            rx: rx_producer,
            tx: tx_consumer,
            policy,
        },
    )
}

impl<P: TxPrime, const N: usize> SerialLink<'_, P, N> {
    /// Take the oldest received byte, if any
    pub fn poll_received(&mut self) -> Option<u8> {
        self.rx.pop()
    }

    /// Queue a byte for transmission, priming an idle transmitter.
    ///
    /// Never drops: while the TX ring is full this spins until the
    /// interrupt side frees a slot.
    pub fn enqueue_transmit(&mut self, byte: u8) {
        let mut pending = byte;
        loop {
            match self.tx.try_push(pending) {
                Ok(()) => break,
                Err(returned) => {
                    pending = returned;
                    if self.port.is_idle() {
                        self.port.prime();
                    }
                    core::hint::spin_loop();
                }
            }
        }

        if self.port.is_idle() {
            self.port.prime();
        }
    }

    /// Queue every byte of `text`
    pub fn send_str(&mut self, text: &str) {
        for &byte in text.as_bytes() {
            self.enqueue_transmit(byte);
        }
    }

    /// Received bytes waiting to be read
    #[must_use]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Receive overflow events so far (wraps at 256)
    #[must_use]
    pub fn overflow_count(&self) -> u8 {
        self.rx.overflow_count()
    }

    /// The transmitter hook
    pub fn port(&self) -> &P {
        &self.port
    }
}

impl<const N: usize> SerialIsr<'_, N> {
    /// Hardware received a byte
    pub fn on_receive(&mut self, byte: u8) -> Result<(), Overflow> {
        self.rx.push(byte, self.policy)
    }

    /// Hardware can accept another byte; `None` leaves the line idle
    pub fn on_transmit_ready(&mut self) -> Option<u8> {
        self.tx.pop()
    }

    /// Configured receive overflow policy
    #[must_use]
    pub const fn policy(&self) -> OverflowPolicy {
        self.policy
    }
}
