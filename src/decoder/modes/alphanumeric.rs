/// Alphanumeric mode decoder (mode 0010)
/// Character set: 0-9, A-Z, space, $%*+-./:
use super::BitReader;
use crate::error::DecodeFailure;

const ALPHANUMERIC_TABLE: [u8; 45] = *b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// ASCII group separator, written for a lone `%` under FNC1
const GROUP_SEPARATOR: u8 = 0x1D;

/// Pairs = 11 bits, single = 6 bits
pub struct AlphanumericDecoder;

impl AlphanumericDecoder {
    /// Append `character_count` characters to `out`. With FNC1 active, `%%`
    /// stands for `%` and a lone `%` for the group separator.
    pub fn decode(
        reader: &mut BitReader<'_>,
        character_count: usize,
        fnc1: bool,
        out: &mut Vec<u8>,
    ) -> Result<(), DecodeFailure> {
        let start = out.len();
        let mut chars_remaining = character_count;

        while chars_remaining > 0 {
            if chars_remaining >= 2 {
                let value = reader.read_bits(11)? as usize;
                if value >= 45 * 45 {
                    return Err(DecodeFailure::MalformedPayload("alphanumeric pair out of range"));
                }
                out.push(ALPHANUMERIC_TABLE[value / 45]);
                out.push(ALPHANUMERIC_TABLE[value % 45]);
                chars_remaining -= 2;
            } else {
                let value = reader.read_bits(6)? as usize;
                let ch = ALPHANUMERIC_TABLE
                    .get(value)
                    .ok_or(DecodeFailure::MalformedPayload("alphanumeric character out of range"))?;
                out.push(*ch);
                chars_remaining -= 1;
            }
        }

        if fnc1 {
            let segment = out.split_off(start);
            let mut iter = segment.into_iter().peekable();
            while let Some(b) = iter.next() {
                if b == b'%' {
                    if iter.peek() == Some(&b'%') {
                        iter.next();
                        out.push(b'%');
                    } else {
                        out.push(GROUP_SEPARATOR);
                    }
                } else {
                    out.push(b);
                }
            }
        }

        Ok(())
    }
}
