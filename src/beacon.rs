//! Beacon transmit sequence
//!
//! A transmission snapshots the fix, keys the radio, turns the oscillator
//! on and keys one UI frame:
//!
//! ```text
//! prepare → PTT on → tone mode → header → payload → footer → deadline mode → PTT off
//! ```
//!
//! Every bit period is a wait on the bit clock, and every wait keeps
//! draining the GPS link, so the fix keeps updating while on air.

use crate::aprs::{MessageComposer, TelemetrySource};
use crate::ax25::{FrameEncoder, TextLayout, TextStore};
use crate::config::{BEACON_PAUSE_TICKS, BEACON_PAUSE_WAITS, BIT_TICKS, TX_DELAY_FLAGS};
use crate::gps::{FixFields, PositionDecoder};
use crate::modem::{AfskKeyer, Background, BitClock, OverflowTimer};
use crate::serial::{SerialLink, TxPrime};
use crate::types::Tone;

/// Payload choice for one transmission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Message {
    /// Position report from the latest fix
    Position,
    /// Analog and digital telemetry
    Telemetry,
    /// Canned string from the text resource
    Text(u16),
}

impl Message {
    /// Map a one-letter command to a message: `S` sends the operator
    /// text, `T` telemetry, anything else a position report
    #[must_use]
    pub const fn from_command(command: u8, layout: &TextLayout) -> Self {
        match command {
            b'S' => Self::Text(layout.message),
            b'T' => Self::Telemetry,
            _ => Self::Position,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Message {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Position => defmt::write!(f, "position"),
            Self::Telemetry => defmt::write!(f, "telemetry"),
            Self::Text(offset) => defmt::write!(f, "text@{}", offset),
        }
    }
}

/// Push-to-talk gate and indicator
pub trait TransmitterControl {
    /// Key or unkey the transmitter
    fn set_ptt(&mut self, on: bool);

    /// Drive the indicator LED
    fn set_indicator(&mut self, on: bool);
}

/// Watchdog fed once per bit-clock wait
pub trait Watchdog {
    /// Restart the countdown
    fn feed(&mut self);
}

impl Watchdog for () {
    fn feed(&mut self) {}
}

/// Provider of the fields a transmission snapshots
pub trait FixSource {
    /// Fields decoded so far
    fn fix(&self) -> &FixFields;
}

/// GPS link drained into the decoder while the foreground waits
pub struct GpsInput<'a, P, W, const N: usize> {
    link: SerialLink<'a, P, N>,
    decoder: PositionDecoder,
    watchdog: W,
    overflows: u8,
}

impl<'a, P: TxPrime, W: Watchdog, const N: usize> GpsInput<'a, P, W, N> {
    /// Couple a serial link with a fresh decoder
    pub fn new(link: SerialLink<'a, P, N>, watchdog: W) -> Self {
        Self {
            link,
            decoder: PositionDecoder::new(),
            watchdog,
            overflows: 0,
        }
    }

    /// Feed every received byte to the decoder
    pub fn drain(&mut self) {
        while let Some(byte) = self.link.poll_received() {
            self.decoder.feed(byte);
        }

        let overflows = self.link.overflow_count();
        if overflows != self.overflows {
            warn!("GPS receive overflow ({} total)", overflows);
            self.overflows = overflows;
        }
    }

    /// Decoder state
    #[must_use]
    pub const fn decoder(&self) -> &PositionDecoder {
        &self.decoder
    }

    /// Serial link, for outbound text
    pub fn link(&mut self) -> &mut SerialLink<'a, P, N> {
        &mut self.link
    }
}

impl<P: TxPrime, W: Watchdog, const N: usize> Background for GpsInput<'_, P, W, N> {
    fn service(&mut self) {
        self.drain();
    }

    fn kick(&mut self) {
        self.watchdog.feed();
    }
}

impl<P, W, const N: usize> FixSource for GpsInput<'_, P, W, N> {
    fn fix(&self) -> &FixFields {
        self.decoder.fix()
    }
}

/// Framing and pacing parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeaconSettings {
    /// Offset of the transmitted address block in the text resource
    pub header: u16,
    /// Flags ahead of the address block
    pub flags: u8,
    /// Timer ticks per bit
    pub bit_ticks: u16,
    /// Ticks per idle wait between beacons
    pub pause_ticks: u16,
    /// Idle waits between beacons
    pub pause_waits: u16,
}

impl BeaconSettings {
    /// Default timing with the address block at `header`
    #[must_use]
    pub const fn new(header: u16) -> Self {
        Self {
            header,
            flags: TX_DELAY_FLAGS,
            bit_ticks: BIT_TICKS,
            pause_ticks: BEACON_PAUSE_TICKS,
            pause_waits: BEACON_PAUSE_WAITS,
        }
    }
}

/// Composes and keys beacon frames
pub struct Beacon<'a, T, X: ?Sized> {
    clock: BitClock<'a, T>,
    composer: MessageComposer,
    text: &'a X,
    settings: BeaconSettings,
}

impl<'a, T: OverflowTimer, X: TextStore + ?Sized> Beacon<'a, T, X> {
    /// Beacon driving `clock`, with canned strings from `text`
    pub fn new(
        clock: BitClock<'a, T>,
        composer: MessageComposer,
        text: &'a X,
        settings: BeaconSettings,
    ) -> Self {
        Self {
            clock,
            composer,
            text,
            settings,
        }
    }

    /// Send one frame; returns its FCS
    pub fn transmit<I, R, S>(&mut self, message: Message, input: &mut I, radio: &mut R, sensors: &mut S) -> u16
    where
        I: Background + FixSource,
        R: TransmitterControl + ?Sized,
        S: TelemetrySource + ?Sized,
    {
        self.composer.prepare(input.fix());

        radio.set_indicator(true);
        radio.set_ptt(true);
        self.clock.start_transmit(Tone::Mark);

        let fcs = {
            let mut keyer = AfskKeyer::new(&mut self.clock, input, self.settings.bit_ticks);
            let mut frame = FrameEncoder::open(&mut keyer, self.settings.flags, self.text, self.settings.header);
            match message {
                Message::Position => self.composer.render_position(&mut frame),
                Message::Telemetry => self.composer.render_telemetry(sensors, &mut frame),
                Message::Text(offset) => frame.send_text(self.text, offset),
            }
            frame.close()
        };

        self.clock.stop_transmit();
        radio.set_ptt(false);
        radio.set_indicator(false);
        info!("sent {} fcs={=u16:#06x}", message, fcs);
        fcs
    }

    /// Idle between beacons while the GPS keeps being serviced
    pub fn pause<B: Background + ?Sized>(&mut self, input: &mut B) {
        for _ in 0..self.settings.pause_waits {
            self.clock.wait(self.settings.pause_ticks, input);
        }
    }

    /// Composer state (snapshot and telemetry sequence)
    #[must_use]
    pub const fn composer(&self) -> &MessageComposer {
        &self.composer
    }

    /// Framing and pacing parameters
    #[must_use]
    pub const fn settings(&self) -> &BeaconSettings {
        &self.settings
    }
}
