//! QR symbol location and grid extraction
//!
//! - Run-length scanning of the binarized image
//! - Finder pattern detection (1:1:3:1:1 on rows, confirmed on columns)
//! - Grouping of finders into symbol locations
//! - Sampling the located quadrilateral into a module grid

/// Finder pattern detection using 1:1:3:1:1 ratio scanning
pub mod finder;
/// Module grid sampling from a located symbol
pub mod grid;
/// Finder grouping, orientation and corner derivation
pub mod locator;
/// Row and column run-length tables
pub mod runs;

pub use finder::{FinderCandidate, FinderDetector};
pub use grid::{BilinearSampler, GridSampler};
pub use locator::{LocatorParams, SymbolLocation, SymbolLocator};
pub use runs::{Run, RunTable};
