/// Byte mode decoder (mode 0100), 8 bits per character
use super::BitReader;
use crate::error::DecodeFailure;

pub struct ByteDecoder;

impl ByteDecoder {
    /// Append `character_count` raw bytes to `out`; text interpretation
    /// happens once the whole payload is known
    pub fn decode(
        reader: &mut BitReader<'_>,
        character_count: usize,
        out: &mut Vec<u8>,
    ) -> Result<(), DecodeFailure> {
        out.reserve(character_count);
        for _ in 0..character_count {
            out.push(reader.read_bits(8)? as u8);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_decode() {
        let data = [0x48, 0x49, 0xFF];
        let mut out = Vec::new();
        ByteDecoder::decode(&mut BitReader::new(&data), 3, &mut out).unwrap();
        assert_eq!(out, [0x48, 0x49, 0xFF]);
    }

    #[test]
    fn test_byte_truncated() {
        let data = [0x48];
        let mut out = Vec::new();
        assert!(ByteDecoder::decode(&mut BitReader::new(&data), 2, &mut out).is_err());
    }
}
