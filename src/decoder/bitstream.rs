/// Codeword extraction in the zig-zag placement order
use crate::decoder::function_mask::FunctionMask;
use crate::models::BitMatrix;

pub struct BitstreamExtractor;

impl BitstreamExtractor {
    /// Data module positions (x, y) in placement order: column pairs from
    /// the right edge, skipping the vertical timing column, alternating
    /// upward and downward, right column of each pair first
    pub fn data_module_positions(func: &FunctionMask) -> Vec<(usize, usize)> {
        let size = func.size();
        let mut positions = Vec::with_capacity(func.data_modules_count());
        let mut upward = true;
        let mut right = size - 1;

        loop {
            let pair = [right, right - 1];
            for step in 0..size {
                let y = if upward { size - 1 - step } else { step };
                for &x in &pair {
                    if !func.is_function(x, y) {
                        positions.push((x, y));
                    }
                }
            }
            upward = !upward;

            if right < 3 {
                break;
            }
            right -= 2;
            if right == 6 {
                right = 5;
            }
        }

        positions
    }

    /// Pack the unmasked data modules MSB-first into codewords.
    /// Trailing remainder bits that do not fill a byte are dropped.
    pub fn extract_codewords(matrix: &BitMatrix, func: &FunctionMask) -> Vec<u8> {
        let positions = Self::data_module_positions(func);
        positions
            .chunks_exact(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .fold(0u8, |acc, &(x, y)| (acc << 1) | matrix.get(x, y) as u8)
            })
            .collect()
    }
}
