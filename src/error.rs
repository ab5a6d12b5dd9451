//! Typed outcomes for decode attempts and input validation

use thiserror::Error;

/// Why a decode attempt produced no payload.
///
/// These are ordinary outcomes for arbitrary images, not faults: an image
/// without a QR symbol yields [`DecodeFailure::NotLocated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeFailure {
    /// No finder-pattern grouping produced a plausible symbol location
    #[error("no QR symbol located")]
    NotLocated,
    /// Both format (or version) information copies failed their BCH check
    #[error("malformed format information: {0}")]
    MalformedFormatInfo(&'static str),
    /// A Reed-Solomon block carried more errors than it can correct
    #[error("uncorrectable data: {0}")]
    UncorrectableData(&'static str),
    /// The corrected data stream is internally inconsistent
    #[error("malformed payload: {0}")]
    MalformedPayload(&'static str),
}

/// Rejected pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImageError {
    /// Width or height is zero
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions {
        /// Supplied width
        width: usize,
        /// Supplied height
        height: usize,
    },
    /// Buffer length is not `width * height * 4`
    #[error("RGBA buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Required byte count
        expected: usize,
        /// Supplied byte count
        actual: usize,
    },
}
