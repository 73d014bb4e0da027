//! Tiny Transmitter APRS Tracker Firmware Library
//!
//! This library turns a stream of GPS NMEA sentences into APRS position and
//! telemetry packets, framed as AX.25 UI frames and sent as Bell-202 AFSK
//! tones through a resistor-ladder DAC. There is no RTOS: all concurrency is
//! interrupt handlers plus a single foreground loop.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Beacon (prepare → header → payload → footer)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    PROTOCOL LAYER                            │
//! │  GPS decoder  │  APRS composer  │  AX.25 framer (CRC, NRZI)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    TRANSPORT / TIMING                        │
//! │  Serial rings (UART ISRs)  │  Bit clock + oscillator (TIM)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    HAL / DRIVER LAYER                        │
//! │  USART  │  TIM  │  GPIO ladder DAC  │  ADC  │  IWDG         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows serial → GPS decoder → APRS composer → AX.25 framer → bit
//! clock. Control flows back: every transmitted bit is a deadline wait on
//! the bit clock, and every wait keeps draining the GPS serial ring.
//!
//! # Design Principles
//!
//! - **No unsafe in the core**: interrupt-shared state is atomic cells only
//! - **Split roles in the type system**: producer/consumer and
//!   foreground/interrupt halves are distinct handles
//! - **Functional core, imperative shell**: every protocol stage is testable
//!   on the host against trait-based hardware doubles
//! - **No error channel on the real-time path**: stale data is retransmitted,
//!   construction-time failures return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// STM32G474 implementations of the serial, timer, DAC, GPIO, ADC and
/// watchdog seams used by the protocol core.
#[cfg(feature = "embedded")]
pub mod hal;

/// Serial Transport
///
/// Interrupt-fed ring buffers bridging the GPS UART to the foreground.
pub mod serial;

/// GPS Input
///
/// Streaming NMEA field extraction.
pub mod gps;

/// APRS Messages
///
/// Fix snapshots, altitude conversion, position and telemetry payloads.
pub mod aprs;

/// AX.25 Link Layer
///
/// UI-frame encoding: CRC-16, NRZI, bit stuffing, addresses, canned text.
pub mod ax25;

/// AFSK Modem
///
/// Timer-driven tone oscillator and the bit-period deadline clock.
pub mod modem;

/// Beacon
///
/// Outer transmit sequence tying all stages together.
pub mod beacon;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::aprs::{MessageComposer, TelemetrySource};
    pub use crate::ax25::{StaticText, TextLayout, TextStore};
    pub use crate::beacon::{Beacon, GpsInput, Message, TransmitterControl};
    pub use crate::modem::{Background, BitClock, ClockShared, Oscillator};
    pub use crate::serial::{OverflowPolicy, SerialChannel, SerialIsr, SerialLink};

    // Common traits
    pub use embedded_hal::digital::{InputPin, OutputPin};

    // Embassy
    pub use embassy_time::{Duration, Instant};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
