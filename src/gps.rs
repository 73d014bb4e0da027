//! GPS Input
//!
//! Extracts position fields from NMEA 0183 sentences one character at a
//! time. Nothing is buffered per sentence: characters are routed straight
//! into per-field ASCII buffers as they arrive.
//!
//! Only two sentences are used:
//!
//! | Sentence | Field (comma) | Value                  |
//! |----------|---------------|------------------------|
//! | `GPGGA`  | 1             | UTC time `HHMMSS.ss`   |
//! | `GPGGA`  | 2             | latitude `DDMM.MMMM`   |
//! | `GPGGA`  | 4             | longitude `DDDMM.MMMM` |
//! | `GPGGA`  | 7             | satellites tracked     |
//! | `GPGGA`  | 9             | altitude, meters       |
//! | `GPRMC`  | 7             | speed, knots           |
//! | `GPRMC`  | 8             | course, degrees        |

pub mod decoder;
pub mod fix;

pub use decoder::{DecodeCursor, DecoderStats, PositionDecoder, SentenceType};
pub use fix::{FixField, FixFields};
