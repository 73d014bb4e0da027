//! Tests for the AX.25 framer
//!
//! The encoder's tone stream is NRZI-decoded and unstuffed here, then
//! checked byte for byte against the header, payload and FCS.

use aprs_tracker::ax25::crc::fcs;
use aprs_tracker::ax25::{
    AddressError, Ax25Address, FrameEncoder, FramePhase, PayloadSink, StaticText, SymbolSink, TextError,
    TransmitFrame, FLAG,
};
use aprs_tracker::types::Tone;

#[derive(Default)]
struct Recorder {
    tones: Vec<Tone>,
}

impl SymbolSink for Recorder {
    fn emit(&mut self, tone: Tone) {
        self.tones.push(tone);
    }
}

/// Byte-at-a-time CRC-16/X.25 for cross-checking the bit-serial one
fn table_fcs(data: &[u8]) -> u16 {
    let mut table = [0u16; 256];
    for (index, entry) in table.iter_mut().enumerate() {
        let mut value = index as u16;
        for _ in 0..8 {
            value = if value & 1 != 0 { (value >> 1) ^ 0x8408 } else { value >> 1 };
        }
        *entry = value;
    }
    let mut crc = 0xFFFFu16;
    for &byte in data {
        crc = (crc >> 8) ^ table[usize::from((crc ^ u16::from(byte)) as u8)];
    }
    !crc
}

/// Line bits: a held tone is a one, a change is a zero
fn nrzi_decode(tones: &[Tone]) -> Vec<bool> {
    let mut previous = Tone::Mark;
    tones
        .iter()
        .map(|&tone| {
            let bit = tone == previous;
            previous = tone;
            bit
        })
        .collect()
}

/// Drop the zero following every run of five ones
fn unstuff(bits: &[bool]) -> Vec<bool> {
    let mut out = Vec::new();
    let mut ones = 0;
    let mut skip = false;
    for &bit in bits {
        if skip {
            assert!(!bit, "stuffed bit must be a zero");
            skip = false;
            continue;
        }
        out.push(bit);
        if bit {
            ones += 1;
            if ones == 5 {
                skip = true;
                ones = 0;
            }
        } else {
            ones = 0;
        }
    }
    out
}

fn to_bytes(bits: &[bool]) -> Vec<u8> {
    assert_eq!(bits.len() % 8, 0, "bit count {} is not whole bytes", bits.len());
    bits.chunks(8)
        .map(|chunk| chunk.iter().rev().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect()
}

fn longest_run_of_ones(bits: &[bool]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for &bit in bits {
        run = if bit { run + 1 } else { 0 };
        longest = longest.max(run);
    }
    longest
}

fn station() -> (StaticText<128>, aprs_tracker::ax25::TextLayout) {
    StaticText::station("APAVR0", "NOCALL-11", &["RELAY", "WIDE2-2"], ">hello").unwrap()
}

// ============================================================================
// CRC Tests
// ============================================================================

#[test]
fn crc_matches_table_driven_reference() {
    let inputs: [&[u8]; 5] = [b"", b"A", b"123456789", b"@120000z3723.24N/12202.16WO", &[0xFF; 40]];
    for input in inputs {
        assert_eq!(fcs(input), table_fcs(input), "input {input:?}");
    }
    assert_eq!(fcs(b"123456789"), 0x906E);
}

// ============================================================================
// Line Coding Tests
// ============================================================================

#[test]
fn flag_has_six_ones_and_no_stuffing() {
    let mut sink = Recorder::default();
    let mut frame = TransmitFrame::new();
    frame.send_byte(FLAG, &mut sink);
    frame.send_byte(FLAG, &mut sink);

    let bits = nrzi_decode(&sink.tones);
    assert_eq!(bits.len(), 16);
    assert_eq!(to_bytes(&bits), [FLAG, FLAG]);
    assert_eq!(longest_run_of_ones(&bits), 6);
}

#[test]
fn ones_count_carries_across_bytes() {
    let mut sink = Recorder::default();
    let mut frame = TransmitFrame::new();
    // 0xF0 ends with four ones; 0x01 adds the fifth
    frame.send_byte(0xF0, &mut sink);
    assert_eq!(frame.ones(), 4);
    frame.send_byte(0x01, &mut sink);

    assert_eq!(sink.tones.len(), 17);
    let bits = nrzi_decode(&sink.tones);
    assert_eq!(to_bytes(&unstuff(&bits)), [0xF0, 0x01]);
}

#[test]
fn raw_bytes_skip_the_crc() {
    let mut sink = Recorder::default();
    let mut frame = TransmitFrame::new();
    frame.send_byte(b'A', &mut sink);
    let crc = frame.crc();
    frame.send_raw(0x55, &mut sink);
    assert_eq!(frame.crc(), crc);
    assert_eq!(sink.tones.len(), 16);
}

// ============================================================================
// Frame Tests
// ============================================================================

#[test]
fn frame_decodes_to_header_payload_and_fcs() {
    let (text, layout) = station();
    let mut sink = Recorder::default();

    let mut encoder = FrameEncoder::open(&mut sink, 3, &text, layout.header);
    assert_eq!(encoder.phase(), FramePhase::Payload);
    encoder.push_bytes(b"!hello\0ignored");
    let sent_fcs = encoder.close();

    let bits = nrzi_decode(&sink.tones);
    let (opening, rest) = bits.split_at(3 * 8);
    let (body, closing) = rest.split_at(rest.len() - 8);
    assert_eq!(to_bytes(opening), [FLAG; 3]);
    assert_eq!(to_bytes(closing), [FLAG]);
    assert!(longest_run_of_ones(body) <= 5);

    let body = to_bytes(&unstuff(body));
    let header = text.string_at(layout.header);
    let (frame, trailer) = body.split_at(body.len() - 2);
    assert_eq!(&frame[..header.len()], header);
    assert_eq!(&frame[header.len()..], b"!hello");

    let expected = fcs(frame);
    assert_eq!(sent_fcs, expected);
    assert_eq!(trailer, expected.to_le_bytes());
}

#[test]
fn payload_of_ones_is_stuffed_and_recovered() {
    let (text, layout) = station();
    let mut sink = Recorder::default();

    let mut encoder = FrameEncoder::open(&mut sink, 1, &text, layout.header);
    for _ in 0..4 {
        encoder.send_byte(0xFF);
    }
    let sent_fcs = encoder.close();

    let bits = nrzi_decode(&sink.tones);
    let body = &bits[8..bits.len() - 8];
    assert!(longest_run_of_ones(body) <= 5);

    let body = to_bytes(&unstuff(body));
    assert_eq!(&body[body.len() - 6..body.len() - 2], &[0xFF; 4]);
    assert_eq!(sent_fcs, fcs(&body[..body.len() - 2]));
}

#[test]
fn full_header_carries_the_path() {
    let (text, layout) = station();
    let full = text.string_at(layout.full_header);
    assert_eq!(full.len(), 4 * 7 + 2);
    // Only the last address has the extension bit
    let extension: Vec<u8> = full[..28].chunks(7).map(|a| a[6] & 1).collect();
    assert_eq!(extension, [0, 0, 0, 1]);
    assert_eq!(&full[14..20], b"RELAY ".map(|c| c << 1));
}

// ============================================================================
// Address Tests
// ============================================================================

#[test]
fn address_parses_and_displays() {
    let address: Ax25Address = "nocall-11".parse().unwrap();
    assert_eq!(address.callsign(), "NOCALL");
    assert_eq!(address.ssid(), 11);
    assert_eq!(address.to_string(), "NOCALL-11");

    let bare: Ax25Address = "APAVR0".parse().unwrap();
    assert_eq!(bare.ssid(), 0);
    assert_eq!(bare.to_string(), "APAVR0");
}

#[test]
fn address_rejects_bad_text() {
    assert_eq!("".parse::<Ax25Address>(), Err(AddressError::Empty));
    assert_eq!("TOOLONG1".parse::<Ax25Address>(), Err(AddressError::TooLong));
    assert_eq!("N0C*LL".parse::<Ax25Address>(), Err(AddressError::InvalidCharacter(b'*')));
    assert_eq!("N0CALL-16".parse::<Ax25Address>(), Err(AddressError::InvalidSsid));
    assert_eq!("N0CALL-".parse::<Ax25Address>(), Err(AddressError::InvalidSsid));
}

#[test]
fn ssid_fifteen_only_allowed_last() {
    let address = Ax25Address::new("N0CALL", 15).unwrap();
    assert_eq!(address.encode(false), Err(AddressError::FlagCollision));
    assert_eq!(address.encode(true).unwrap()[6], 0x7F);

    let result = StaticText::<128>::station("APAVR0", "N0CALL-15", &["WIDE1-1"], ">x");
    assert!(matches!(result, Err(TextError::Address(AddressError::FlagCollision))));
}
