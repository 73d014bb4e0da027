//! AX.25 address fields
//!
//! An address is a callsign of up to six characters plus a 4-bit SSID,
//! written as `CALL` or `CALL-SSID`. On the wire each callsign character
//! is shifted left one bit, the callsign is padded with shifted spaces,
//! and the seventh byte carries `0b011S_SSS0`, with bit 0 set on the last
//! address of the header.

use core::fmt;
use core::str::FromStr;

/// Longest callsign
pub const CALLSIGN_LEN: usize = 6;

/// Encoded length of one address
pub const ENCODED_LEN: usize = 7;

/// Highest SSID
pub const MAX_SSID: u8 = 15;

/// Address text that cannot be encoded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressError {
    /// No callsign characters
    Empty,
    /// More than six callsign characters
    TooLong,
    /// Callsign character outside `A-Z0-9`
    InvalidCharacter(u8),
    /// SSID missing, non-numeric, or above 15
    InvalidSsid,
    /// SSID byte of a non-final address would read as a flag
    FlagCollision,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty callsign"),
            Self::TooLong => write!(f, "callsign longer than {CALLSIGN_LEN} characters"),
            Self::InvalidCharacter(c) => write!(f, "invalid callsign character 0x{c:02x}"),
            Self::InvalidSsid => write!(f, "SSID must be 0-{MAX_SSID}"),
            Self::FlagCollision => write!(f, "SSID byte collides with the frame flag"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for AddressError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Empty => defmt::write!(f, "empty callsign"),
            Self::TooLong => defmt::write!(f, "callsign too long"),
            Self::InvalidCharacter(c) => defmt::write!(f, "invalid callsign character {=u8:#x}", c),
            Self::InvalidSsid => defmt::write!(f, "invalid SSID"),
            Self::FlagCollision => defmt::write!(f, "SSID byte collides with flag"),
        }
    }
}

/// Callsign and SSID
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ax25Address {
    callsign: [u8; CALLSIGN_LEN],
    len: u8,
    ssid: u8,
}

impl Ax25Address {
    /// Build from a callsign and SSID
    pub fn new(callsign: &str, ssid: u8) -> Result<Self, AddressError> {
        if ssid > MAX_SSID {
            return Err(AddressError::InvalidSsid);
        }
        let text = callsign.as_bytes();
        if text.is_empty() {
            return Err(AddressError::Empty);
        }
        if text.len() > CALLSIGN_LEN {
            return Err(AddressError::TooLong);
        }

        let mut stored = [b' '; CALLSIGN_LEN];
        for (cell, &c) in stored.iter_mut().zip(text) {
            let c = c.to_ascii_uppercase();
            if !c.is_ascii_uppercase() && !c.is_ascii_digit() {
                return Err(AddressError::InvalidCharacter(c));
            }
            *cell = c;
        }

        Ok(Self {
            callsign: stored,
            len: text.len() as u8,
            ssid,
        })
    }

    /// Callsign characters without padding
    #[must_use]
    pub fn callsign(&self) -> &str {
        // Only ASCII letters and digits are ever stored
        core::str::from_utf8(&self.callsign[..usize::from(self.len)]).unwrap_or("")
    }

    /// Secondary station identifier
    #[must_use]
    pub const fn ssid(&self) -> u8 {
        self.ssid
    }

    /// SSID byte as transmitted
    #[must_use]
    pub const fn ssid_byte(&self, last: bool) -> u8 {
        0x60 | (self.ssid << 1) | last as u8
    }

    /// Wire form of this address
    ///
    /// A non-final SSID byte of 0x7E (SSID 15) would be taken for a flag
    /// by the encoder, so it is rejected.
    pub fn encode(&self, last: bool) -> Result<[u8; ENCODED_LEN], AddressError> {
        let ssid = self.ssid_byte(last);
        if ssid == super::FLAG {
            return Err(AddressError::FlagCollision);
        }
        let mut out = [0u8; ENCODED_LEN];
        for (cell, &c) in out.iter_mut().zip(&self.callsign) {
            *cell = c << 1;
        }
        out[CALLSIGN_LEN] = ssid;
        Ok(out)
    }
}

impl FromStr for Ax25Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('-') {
            None => Self::new(s, 0),
            Some((call, ssid)) => {
                if ssid.is_empty() || !ssid.bytes().all(|c| c.is_ascii_digit()) {
                    return Err(AddressError::InvalidSsid);
                }
                let ssid: u8 = ssid.parse().map_err(|_| AddressError::InvalidSsid)?;
                Self::new(call, ssid)
            }
        }
    }
}

impl fmt::Display for Ax25Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ssid == 0 {
            write!(f, "{}", self.callsign())
        } else {
            write!(f, "{}-{}", self.callsign(), self.ssid)
        }
    }
}

impl fmt::Debug for Ax25Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ax25Address({self})")
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Ax25Address {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}-{}", self.callsign(), self.ssid);
    }
}
