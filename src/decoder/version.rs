/// Version information for versions 7-40
use crate::decoder::bch::BchDecoder;
use crate::error::DecodeFailure;
use crate::models::{ModuleGrid, Version};

/// Smallest dimension that carries version information (version 7)
pub const VERSION_INFO_MIN_DIMENSION: usize = 45;

/// Version info is 18 bits (6 data + 12 ECC), stored in a 6x3 block next to
/// the top-right finder and transposed next to the bottom-left finder
pub struct VersionInfo;

impl VersionInfo {
    /// Version encoded in the grid. Below version 7 it is implied by the
    /// dimension; above, the copy closer to a valid codeword wins.
    pub fn read(grid: &ModuleGrid) -> Result<Version, DecodeFailure> {
        let size = grid.dimension();
        if size < VERSION_INFO_MIN_DIMENSION {
            return Ok(grid.version());
        }

        let top_right = BchDecoder::decode_version(read_bits(grid, false));
        let bottom_left = BchDecoder::decode_version(read_bits(grid, true));
        log::trace!("version: top-right {:?}, bottom-left {:?}", top_right, bottom_left);

        [top_right, bottom_left]
            .into_iter()
            .flatten()
            .min_by_key(|&(_, distance)| distance)
            .and_then(|(number, _)| Version::new(number))
            .ok_or(DecodeFailure::MalformedFormatInfo(
                "both version copies fail their BCH check",
            ))
    }
}

/// Module (x, y) of version bit `i` (LSB first) in the top-right block
pub fn version_position(dimension: usize, i: usize) -> (usize, usize) {
    (dimension - 11 + i % 3, i / 3)
}

fn read_bits(grid: &ModuleGrid, transposed: bool) -> u32 {
    let size = grid.dimension();
    (0..18).fold(0u32, |acc, i| {
        let (x, y) = version_position(size, i);
        let dark = if transposed { grid.get(y, x) } else { grid.get(x, y) };
        acc | ((dark as u32) << i)
    })
}
