/// Kanji mode decoder (mode 1000)
/// Each 13-bit value packs one Shift-JIS double-byte character
use super::BitReader;
use crate::error::DecodeFailure;

pub struct KanjiDecoder;

impl KanjiDecoder {
    /// Append `character_count` Shift-JIS characters (two bytes each) to `out`
    pub fn decode(
        reader: &mut BitReader<'_>,
        character_count: usize,
        out: &mut Vec<u8>,
    ) -> Result<(), DecodeFailure> {
        out.reserve(character_count * 2);
        for _ in 0..character_count {
            let value = reader.read_bits(13)?;
            let mut code = ((value / 0xC0) << 8) | (value % 0xC0);
            if code < 0x1F00 {
                code += 0x8140;
            } else {
                code += 0xC140;
            }
            out.push((code >> 8) as u8);
            out.push((code & 0xFF) as u8);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::modes::tests::BitWriter;

    #[test]
    fn test_kanji_decode() {
        // 0x935F and 0xE4AA, the worked examples of the mode
        let mut w = BitWriter::default();
        w.push(0x0D9F, 13).push(0x1AAA, 13);
        let data = w.into_bytes();
        let mut out = Vec::new();
        KanjiDecoder::decode(&mut BitReader::new(&data), 2, &mut out).unwrap();
        assert_eq!(out, [0x93, 0x5F, 0xE4, 0xAA]);
    }
}
