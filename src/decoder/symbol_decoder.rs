/// Module grid to payload: format, version, unmask, codewords, Reed-Solomon, data stream
use crate::decoder::bitstream::BitstreamExtractor;
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::modes::{DecodedContent, decode_stream};
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::decoder::tables::EcBlockInfo;
use crate::decoder::unmask::unmask;
use crate::decoder::version::VersionInfo;
use crate::error::DecodeFailure;
use crate::models::{ECLevel, MaskPattern, ModuleGrid, Version};

/// Result of decoding one grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridDecode {
    pub content: DecodedContent,
    pub version: Version,
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
    /// Codewords repaired by Reed-Solomon across all blocks
    pub corrected_errors: usize,
}

pub struct SymbolDecoder;

impl SymbolDecoder {
    /// Decode a sampled grid. Pure: the same grid always gives the same answer.
    pub fn decode(grid: &ModuleGrid) -> Result<GridDecode, DecodeFailure> {
        let format = FormatInfo::read(grid)?;
        let version = VersionInfo::read(grid)?;
        if version.dimension() != grid.dimension() {
            return Err(DecodeFailure::MalformedFormatInfo(
                "version information disagrees with grid size",
            ));
        }
        log::debug!(
            "decode: version {} EC {:?} mask {}",
            version.number(),
            format.ec_level,
            format.mask_pattern.id()
        );

        let func = FunctionMask::new(version);
        let mut matrix = grid.as_matrix().clone();
        unmask(&mut matrix, format.mask_pattern, &func);
        let codewords = BitstreamExtractor::extract_codewords(&matrix, &func);

        let info = EcBlockInfo::new(version, format.ec_level);
        let (data, corrected_errors) = deinterleave_and_correct(&codewords, &info)?;
        let content = decode_stream(&data, version)?;

        Ok(GridDecode {
            content,
            version,
            ec_level: format.ec_level,
            mask_pattern: format.mask_pattern,
            corrected_errors,
        })
    }
}

/// Split the interleaved codewords into blocks (short blocks first), correct
/// each, and concatenate the data portions
pub fn deinterleave_and_correct(
    codewords: &[u8],
    info: &EcBlockInfo,
) -> Result<(Vec<u8>, usize), DecodeFailure> {
    if codewords.len() != info.total_codewords {
        return Err(DecodeFailure::UncorrectableData("codeword count does not match version"));
    }

    let num_short_blocks = info.num_short_blocks();
    let short_data_len = info.short_block_len() - info.ecc_per_block;
    let long_data_len = short_data_len + 1;
    let data_len = |b: usize| {
        if b < num_short_blocks {
            short_data_len
        } else {
            long_data_len
        }
    };

    let mut blocks: Vec<Vec<u8>> = (0..info.num_blocks)
        .map(|_| Vec::with_capacity(long_data_len + info.ecc_per_block))
        .collect();

    let mut source = codewords.iter().copied();
    for i in 0..long_data_len {
        for (b, block) in blocks.iter_mut().enumerate() {
            if i < data_len(b) {
                block.extend(source.next());
            }
        }
    }
    for _ in 0..info.ecc_per_block {
        for block in blocks.iter_mut() {
            block.extend(source.next());
        }
    }

    let rs = ReedSolomonDecoder::new(info.ecc_per_block);
    let mut data_out = Vec::with_capacity(info.data_codewords());
    let mut corrected = 0;
    for (b, block) in blocks.iter_mut().enumerate() {
        match rs.decode(block) {
            Ok(count) => corrected += count,
            Err(err) => {
                log::debug!("decode: block {} of {}: {}", b + 1, info.num_blocks, err);
                return Err(DecodeFailure::UncorrectableData(
                    "Reed-Solomon block exceeds its correction capacity",
                ));
            }
        }
        data_out.extend_from_slice(&block[..data_len(b)]);
    }

    Ok((data_out, corrected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::bch::BchDecoder;
    use crate::decoder::format::format_positions;
    use crate::models::SegmentMode;
    use qrcode::{Color, EcLevel, QrCode};

    fn grid_for(data: &[u8], version: i16, ec: EcLevel) -> ModuleGrid {
        let code = QrCode::with_version(data, qrcode::Version::Normal(version), ec).unwrap();
        let width = code.width();
        let mut modules = Vec::with_capacity(width * width);
        for y in 0..width {
            for x in 0..width {
                modules.push(code[(x, y)] == Color::Dark);
            }
        }
        ModuleGrid::from_bools(width, &modules).unwrap()
    }

    /// Flip the first module of each listed codeword
    fn corrupt_codewords(grid: &ModuleGrid, codewords: &[usize]) -> ModuleGrid {
        let positions =
            BitstreamExtractor::data_module_positions(&FunctionMask::new(grid.version()));
        codewords.iter().fold(grid.clone(), |g, &k| {
            let (x, y) = positions[8 * k];
            g.with_toggled(x, y)
        })
    }

    #[test]
    fn test_decodes_numeric_v1() {
        let decoded = SymbolDecoder::decode(&grid_for(b"12345", 1, EcLevel::M)).unwrap();
        assert_eq!(decoded.content.payload, b"12345");
        assert_eq!(decoded.version.number(), 1);
        assert_eq!(decoded.ec_level, ECLevel::M);
        assert_eq!(decoded.corrected_errors, 0);
        assert_eq!(decoded.content.segments[0].mode, SegmentMode::Numeric);
    }

    #[test]
    fn test_decodes_version_info_symbol() {
        let text = b"version seven carries its own version block";
        let decoded = SymbolDecoder::decode(&grid_for(text, 7, EcLevel::Q)).unwrap();
        assert_eq!(decoded.content.payload, text);
        assert_eq!(decoded.version.number(), 7);
        assert_eq!(decoded.ec_level, ECLevel::Q);
    }

    #[test]
    fn test_multi_block_symbol() {
        // 5-Q has two short and two long blocks
        let text = b"HELLO WORLD 0123456789 INTERLEAVED BLOCKS";
        let decoded = SymbolDecoder::decode(&grid_for(text, 5, EcLevel::Q)).unwrap();
        assert_eq!(decoded.content.payload, text);
    }

    #[test]
    fn test_corrects_up_to_capacity() {
        // 1-M: one block with 10 ECC codewords, so 5 correctable
        let grid = grid_for(b"12345", 1, EcLevel::M);
        let damaged = corrupt_codewords(&grid, &[0, 3, 8, 15, 21]);
        let decoded = SymbolDecoder::decode(&damaged).unwrap();
        assert_eq!(decoded.content.payload, b"12345");
        assert_eq!(decoded.corrected_errors, 5);

        let damaged = corrupt_codewords(&grid, &[0, 3, 8, 15, 21, 24]);
        assert!(matches!(
            SymbolDecoder::decode(&damaged),
            Err(DecodeFailure::UncorrectableData(_))
        ));
    }

    #[test]
    fn test_format_copies() {
        let grid = grid_for(b"FORMAT", 2, EcLevel::L);
        let [first, second] = format_positions(grid.dimension());

        // Five bad bits in the first copy
        let one_copy = first
            .iter()
            .take(5)
            .fold(grid.clone(), |g, &(x, y)| g.with_toggled(x, y));
        assert_eq!(SymbolDecoder::decode(&one_copy).unwrap().content.payload, b"FORMAT");

        // A word at least 4 bits from every format codeword, in both copies
        let far = (0u16..0x8000)
            .find(|&w| BchDecoder::decode_format(w).is_none())
            .unwrap();
        let write = |g: ModuleGrid, positions: &[(usize, usize); 15]| {
            positions.iter().enumerate().fold(g, |g, (i, &(x, y))| {
                if g.get(x, y) != ((far >> i) & 1 == 1) {
                    g.with_toggled(x, y)
                } else {
                    g
                }
            })
        };
        let both = write(write(grid, &first), &second);
        assert!(matches!(
            SymbolDecoder::decode(&both),
            Err(DecodeFailure::MalformedFormatInfo(_))
        ));
    }

    #[test]
    fn test_wrong_codeword_count() {
        let info = EcBlockInfo::new(Version::MIN, ECLevel::L);
        assert!(deinterleave_and_correct(&[0u8; 10], &info).is_err());
    }
}
