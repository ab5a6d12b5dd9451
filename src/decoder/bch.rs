/// BCH codes protecting format information (15,5) and version information (18,6).
///
/// Both codes have minimum distance 7, so a read word within Hamming
/// distance 3 of a codeword decodes to it unambiguously.
const FORMAT_GENERATOR: u32 = 0x537;
const VERSION_GENERATOR: u32 = 0x1F25;

/// XOR mask applied to every format codeword
pub const FORMAT_XOR_MASK: u16 = 0x5412;

/// Largest Hamming distance accepted as a correction
pub const MAX_CORRECTABLE_BITS: u32 = 3;

/// Masked 15-bit format codeword for 5 data bits (EC level << 3 | mask)
pub fn format_codeword(data: u8) -> u16 {
    let data = (data & 0x1F) as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_GENERATOR);
    }
    (((data << 10) | (rem & 0x3FF)) as u16) ^ FORMAT_XOR_MASK
}

/// 18-bit version codeword for versions 7-40
pub fn version_codeword(version: u8) -> u32 {
    let data = version as u32;
    let mut rem = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * VERSION_GENERATOR);
    }
    (data << 12) | (rem & 0xFFF)
}

pub struct BchDecoder;

impl BchDecoder {
    /// Nearest format data bits and the number of bits corrected
    pub fn decode_format(bits: u16) -> Option<(u8, u32)> {
        (0u8..32)
            .map(|data| (data, (format_codeword(data) ^ bits).count_ones()))
            .min_by_key(|&(_, distance)| distance)
            .filter(|&(_, distance)| distance <= MAX_CORRECTABLE_BITS)
    }

    /// Nearest version number (7-40) and the number of bits corrected
    pub fn decode_version(bits: u32) -> Option<(u8, u32)> {
        (7u8..=40)
            .map(|v| (v, (version_codeword(v) ^ bits).count_ones()))
            .min_by_key(|&(_, distance)| distance)
            .filter(|&(_, distance)| distance <= MAX_CORRECTABLE_BITS)
    }
}
