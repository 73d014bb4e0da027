//! AX.25 Link Layer
//!
//! Builds connectionless UI frames bit by bit:
//!
//! ```text
//! 0x7E × N | dest | src | digis.. | 0x03 | 0xF0 | payload | FCS lo | FCS hi | 0x7E
//! ```
//!
//! Bytes go out least-significant bit first, NRZI coded (a zero toggles
//! the tone, a one holds it) with a stuffed zero after every five
//! consecutive ones. Flags are exempt from stuffing and from the FCS.

pub mod address;
pub mod crc;
pub mod encoder;
pub mod text;

pub use address::{AddressError, Ax25Address};
pub use crc::Crc16;
pub use encoder::{FrameEncoder, FramePhase, PayloadSink, SymbolSink, TransmitFrame, FLAG};
pub use text::{StaticText, TextError, TextLayout, TextStore};

/// Control field of a UI frame
pub const CONTROL_UI: u8 = 0x03;

/// Protocol identifier: no layer 3
pub const PID_NO_LAYER3: u8 = 0xF0;
