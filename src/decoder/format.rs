/// Format information: EC level and mask pattern
use crate::decoder::bch::BchDecoder;
use crate::error::DecodeFailure;
use crate::models::{ECLevel, MaskPattern, ModuleGrid};

/// Decoded 15-bit format field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// The five data bits this field encodes
    pub fn data_bits(&self) -> u8 {
        (self.ec_level.format_bits() << 3) | self.mask_pattern.id()
    }

    /// Read both copies from the grid and keep the one closer to a valid
    /// codeword. The first copy wins ties.
    pub fn read(grid: &ModuleGrid) -> Result<Self, DecodeFailure> {
        let [first, second] = format_positions(grid.dimension());
        let decoded = [read_copy(grid, &first), read_copy(grid, &second)];
        log::trace!("format: copy distances {:?}", decoded.map(|d| d.map(|(_, dist)| dist)));

        let best = decoded
            .into_iter()
            .flatten()
            .min_by_key(|&(_, distance)| distance)
            .ok_or(DecodeFailure::MalformedFormatInfo(
                "both format copies fail their BCH check",
            ))?;

        let data = best.0;
        Ok(Self {
            ec_level: ECLevel::from_format_bits(data >> 3),
            mask_pattern: MaskPattern::from_bits(data),
        })
    }
}

fn read_copy(grid: &ModuleGrid, positions: &[(usize, usize); 15]) -> Option<(u8, u32)> {
    let bits = positions
        .iter()
        .enumerate()
        .fold(0u16, |acc, (i, &(x, y))| acc | ((grid.get(x, y) as u16) << i));
    BchDecoder::decode_format(bits)
}

/// Module positions (x, y) of format bit `i` (LSB first) for the copy
/// around the top-left finder and the copy split between the other two
pub fn format_positions(dimension: usize) -> [[(usize, usize); 15]; 2] {
    let mut first = [(0, 0); 15];
    let mut second = [(0, 0); 15];
    for (i, slot) in first.iter_mut().enumerate() {
        *slot = match i {
            0..=5 => (8, i),
            6 => (8, 7),
            7 => (8, 8),
            8 => (7, 8),
            _ => (14 - i, 8),
        };
    }
    for (i, slot) in second.iter_mut().enumerate() {
        *slot = if i < 8 {
            (dimension - 1 - i, 8)
        } else {
            (8, dimension - 15 + i)
        };
    }
    [first, second]
}
