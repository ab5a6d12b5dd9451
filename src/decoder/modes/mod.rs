//! QR code data mode decoders
//!
//! The corrected data codewords are read as one bit stream of segments,
//! each a 4-bit mode indicator followed by mode-specific content:
//! - Numeric: digits 0-9, three per 10 bits
//! - Alphanumeric: 45-character set, two per 11 bits
//! - Byte: raw 8-bit data
//! - Kanji: Shift-JIS double-byte characters, 13 bits each
//! - ECI, FNC1 and structured append headers, which carry no characters

pub mod alphanumeric;
pub mod byte;
pub mod kanji;
pub mod numeric;

use crate::error::DecodeFailure;
use crate::models::{Fnc1, Segment, SegmentMode, StructuredAppend, Version};
use alphanumeric::AlphanumericDecoder;
use byte::ByteDecoder;
use kanji::KanjiDecoder;
use numeric::NumericDecoder;

const TRUNCATED: DecodeFailure = DecodeFailure::MalformedPayload("data stream truncated");

/// Everything recovered from the data codewords
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedContent {
    pub payload: Vec<u8>,
    pub segments: Vec<Segment>,
    /// First ECI designator seen, if any
    pub eci: Option<u32>,
    pub structured_append: Option<StructuredAppend>,
    pub fnc1: Option<Fnc1>,
}

/// MSB-first reader over codeword bytes
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Read `n` (at most 32) bits; running past the end is a malformed payload
    pub fn read_bits(&mut self, n: usize) -> Result<u32, DecodeFailure> {
        if n > self.remaining() {
            return Err(TRUNCATED);
        }
        let mut value = 0u32;
        for _ in 0..n {
            let bit = (self.data[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.pos += 1;
        }
        Ok(value)
    }
}

/// Character-count field width for a mode and version range
pub fn char_count_bits(mode: SegmentMode, version: Version) -> usize {
    let bracket = match version.number() {
        1..=9 => 0,
        10..=26 => 1,
        _ => 2,
    };
    let widths = match mode {
        SegmentMode::Numeric => [10, 12, 14],
        SegmentMode::Alphanumeric => [9, 11, 13],
        SegmentMode::Byte => [8, 16, 16],
        SegmentMode::Kanji => [8, 10, 12],
    };
    widths[bracket]
}

/// Decode segments greedily until the terminator or fewer than four
/// bits remain
pub fn decode_stream(data: &[u8], version: Version) -> Result<DecodedContent, DecodeFailure> {
    let mut reader = BitReader::new(data);
    let mut content = DecodedContent::default();

    while reader.remaining() >= 4 {
        let mode = reader.read_bits(4)?;
        let segment_mode = match mode {
            0 => break,
            1 => SegmentMode::Numeric,
            2 => SegmentMode::Alphanumeric,
            4 => SegmentMode::Byte,
            8 => SegmentMode::Kanji,
            3 => {
                let index = reader.read_bits(4)? as u8;
                let total = reader.read_bits(4)? as u8 + 1;
                let parity = reader.read_bits(8)? as u8;
                content.structured_append = Some(StructuredAppend {
                    index,
                    total,
                    parity,
                });
                continue;
            }
            5 => {
                content.fnc1 = Some(Fnc1::FirstPosition);
                continue;
            }
            9 => {
                let indicator = reader.read_bits(8)? as u8;
                content.fnc1 = Some(Fnc1::SecondPosition(indicator));
                continue;
            }
            7 => {
                let designator = read_eci(&mut reader)?;
                content.eci.get_or_insert(designator);
                continue;
            }
            _ => return Err(DecodeFailure::MalformedPayload("unknown mode indicator")),
        };

        let count = reader.read_bits(char_count_bits(segment_mode, version))? as usize;
        let start = content.payload.len();
        let out = &mut content.payload;
        match segment_mode {
            SegmentMode::Numeric => NumericDecoder::decode(&mut reader, count, out)?,
            SegmentMode::Alphanumeric => {
                AlphanumericDecoder::decode(&mut reader, count, content.fnc1.is_some(), out)?
            }
            SegmentMode::Byte => ByteDecoder::decode(&mut reader, count, out)?,
            SegmentMode::Kanji => KanjiDecoder::decode(&mut reader, count, out)?,
        }
        log::trace!("payload: {:?} segment, {} chars", segment_mode, count);
        content.segments.push(Segment {
            mode: segment_mode,
            char_count: count,
            range: start..content.payload.len(),
        });
    }

    Ok(content)
}

/// ECI designator in its 1-, 2- or 3-byte form
fn read_eci(reader: &mut BitReader<'_>) -> Result<u32, DecodeFailure> {
    let first = reader.read_bits(8)?;
    if first & 0x80 == 0 {
        Ok(first)
    } else if first & 0xC0 == 0x80 {
        Ok(((first & 0x3F) << 8) | reader.read_bits(8)?)
    } else if first & 0xE0 == 0xC0 {
        Ok(((first & 0x1F) << 16) | reader.read_bits(16)?)
    } else {
        Err(DecodeFailure::MalformedPayload("invalid ECI designator"))
    }
}

/// Payload as text: UTF-8 when declared (ECI 26) or valid, ISO-8859-1 otherwise
pub fn payload_text(payload: &[u8], eci: Option<u32>) -> String {
    match eci {
        Some(26) => String::from_utf8_lossy(payload).into_owned(),
        Some(1) | Some(3) => latin1(payload),
        _ => match std::str::from_utf8(payload) {
            Ok(text) => text.to_owned(),
            Err(_) => latin1(payload),
        },
    }
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}
