//! Serial Transport
//!
//! Duplex byte transport for the GPS UART. Each direction is a
//! single-producer single-consumer ring shared between an interrupt
//! handler and the foreground loop:
//!
//! ```text
//!   USART RX ISR ──Producer──▶ [ RX ring ] ──Consumer──▶ SerialLink::poll_received
//!   SerialLink::enqueue_transmit ──Producer──▶ [ TX ring ] ──Consumer──▶ USART TX ISR
//! ```
//!
//! Every shared cell is an `AtomicU8`, so a single load or store can never
//! be torn by preemption.

pub mod link;
pub mod ring;

pub use link::{split, SerialIsr, SerialLink, TxPrime};
pub use ring::{Consumer, Overflow, OverflowPolicy, Producer, SerialChannel};
