//! APRS Payload Composition
//!
//! Turns decoded fix fields into the two payloads the beacon sends:
//!
//! ```text
//! position:  @HHMMSSzDDMM.MMN/DDDMM.MMWOccc/sss/A=ffffff h
//! telemetry: T#sss,aaa,aaa,aaa,aaa,aaa,bbbbbbbb,aaa,HHMMSS
//! ```
//!
//! Numbers stay in the characters the receiver sent; only the altitude is
//! converted (meters to feet) with integer arithmetic.

pub mod altitude;
pub mod composer;
pub mod telemetry;

pub use altitude::{meters_to_feet, parse_meters, render_feet, FeetText};
pub use composer::{MessageComposer, PositionReport};
pub use telemetry::{TelemetrySource, ANALOG_CHANNELS};
