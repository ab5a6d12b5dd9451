/// Sampled module grid
pub mod grid;
/// Borrowed RGBA input
pub mod image;
/// Bit matrix for binary images and module grids
pub mod matrix;
/// 2D point
pub mod point;
/// Symbol metadata and the decode result
pub mod symbol;

pub use grid::ModuleGrid;
pub use image::PixelBuffer;
pub use matrix::BitMatrix;
pub use point::Point;
pub use symbol::{
    Corners, DecodedSymbol, ECLevel, Fnc1, MaskPattern, Segment, SegmentMode, StructuredAppend,
    Version,
};
