//! qr_reader - QR code decoding from raw RGBA pixel buffers
//!
//! A pure Rust pipeline: binarize, scan runs, find the three finder
//! patterns, locate the symbol, sample its module grid, then decode
//! format/version information, Reed-Solomon blocks and the data stream.
//!
//! ```no_run
//! use qr_reader::{DecodeOptions, PixelBuffer, QrReader};
//!
//! # let (rgba, width, height) = (vec![255u8; 64 * 64 * 4], 64, 64);
//! let reader = QrReader::new(DecodeOptions::default());
//! let image = PixelBuffer::new(&rgba, width, height).unwrap();
//! match reader.decode(&image) {
//!     Ok(symbol) => println!("{} at {:?}", symbol.text, symbol.corners),
//!     Err(failure) => println!("no QR code: {failure}"),
//! }
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Decode configuration and environment overrides
pub mod config;
/// QR code decoding modules (error correction, format extraction, data modes)
#[allow(missing_docs)]
pub mod decoder;
/// QR code detection modules (runs, finder patterns, location, sampling)
#[allow(missing_docs)]
pub mod detector;
/// Decode outcomes and input errors
pub mod error;
/// Core data structures (PixelBuffer, BitMatrix, ModuleGrid, DecodedSymbol, ...)
pub mod models;
mod pipeline;
/// Pixel classification
pub mod utils;

pub use config::{DecodeOptions, InversionAttempts};
pub use detector::{BilinearSampler, GridSampler, SymbolLocation};
pub use error::{DecodeFailure, ImageError};
pub use models::{
    BitMatrix, Corners, DecodedSymbol, ECLevel, Fnc1, MaskPattern, ModuleGrid, PixelBuffer, Point,
    Segment, SegmentMode, StructuredAppend, Version,
};
pub use utils::binarization::{LuminanceSampler, PixelSampler};

use decoder::modes::payload_text;
use pipeline::{PassResult, decode_pass, more_advanced};
use thiserror::Error;

/// Either half of a failed [`decode`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QrError {
    /// The pixel buffer was rejected before decoding
    #[error(transparent)]
    Image(#[from] ImageError),
    /// The image was read but no symbol decoded
    #[error(transparent)]
    Decode(#[from] DecodeFailure),
}

/// Decoder wired with its pixel classifier and grid sampler.
///
/// Holds no per-call state, so one reader can serve any number of threads.
#[derive(Debug, Clone)]
pub struct QrReader<P = LuminanceSampler, G = BilinearSampler> {
    pixel_sampler: P,
    grid_sampler: G,
    options: DecodeOptions,
}

impl QrReader {
    /// Reader with the luminance classifier (at `options.luminance_threshold`)
    /// and the bilinear grid sampler
    pub fn new(options: DecodeOptions) -> Self {
        Self::with_collaborators(
            LuminanceSampler::new(options.luminance_threshold),
            BilinearSampler,
            options,
        )
    }
}

impl Default for QrReader {
    fn default() -> Self {
        Self::new(DecodeOptions::default())
    }
}

impl<P: PixelSampler, G: GridSampler> QrReader<P, G> {
    /// Reader with caller-supplied collaborators
    pub fn with_collaborators(pixel_sampler: P, grid_sampler: G, options: DecodeOptions) -> Self {
        Self {
            pixel_sampler,
            grid_sampler,
            options,
        }
    }

    /// Options this reader was built with
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Locate and decode one QR symbol.
    ///
    /// When the first pass fails and the options allow it, the whole
    /// pipeline runs again on a colour-inverted copy. Corners are in the
    /// coordinates of `image` either way.
    pub fn decode(&self, image: &PixelBuffer<'_>) -> Result<DecodedSymbol, DecodeFailure> {
        let first = match self.pass(image) {
            Ok(result) => return Ok(build_symbol(result, false)),
            Err(failure) => failure,
        };
        if !self.options.retries_inverted() {
            return Err(first);
        }

        log::debug!("decode: first pass failed ({first}), retrying inverted");
        let inverted = image.inverted();
        let inverted = PixelBuffer::new(&inverted, image.width(), image.height())
            .map_err(|_| first)?;
        match self.pass(&inverted) {
            Ok(result) => Ok(build_symbol(result, true)),
            Err(second) => Err(more_advanced(first, second)),
        }
    }

    /// The sampled module grid of the first hypothesis that yields one,
    /// without decoding it
    pub fn sample_grid(&self, image: &PixelBuffer<'_>) -> Option<ModuleGrid> {
        let binary = utils::binarization::binarize(image, &self.pixel_sampler);
        let runs = detector::RunTable::scan(&binary);
        let candidates = detector::FinderDetector::detect(&runs);
        detector::SymbolLocator::hypotheses(&candidates, &self.options.locator_params())
            .iter()
            .find_map(|location| pipeline::sample_grid(&binary, location, &self.grid_sampler).ok())
    }

    fn pass(&self, image: &PixelBuffer<'_>) -> Result<PassResult, DecodeFailure> {
        decode_pass(image, &self.pixel_sampler, &self.grid_sampler, &self.options)
    }
}

fn build_symbol(result: PassResult, inverted: bool) -> DecodedSymbol {
    let PassResult {
        location,
        grid,
        decoded,
    } = result;
    let content = decoded.content;
    log::debug!(
        "decode: {} bytes, version {}, {} corrected codewords{}",
        content.payload.len(),
        decoded.version.number(),
        decoded.corrected_errors,
        if inverted { ", inverted" } else { "" }
    );

    DecodedSymbol {
        text: payload_text(&content.payload, content.eci),
        payload: content.payload,
        version: decoded.version,
        ec_level: decoded.ec_level,
        mask_pattern: decoded.mask_pattern,
        corners: location.corners,
        segments: content.segments,
        eci: content.eci,
        structured_append: content.structured_append,
        fnc1: content.fnc1,
        corrected_errors: decoded.corrected_errors,
        inverted,
        grid,
    }
}

/// Decode an RGBA buffer with default collaborators
///
/// # Arguments
/// * `rgba` - Raw RGBA bytes (4 bytes per pixel, row-major)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `options` - Inversion policy and tuning
pub fn decode(
    rgba: &[u8],
    width: usize,
    height: usize,
    options: &DecodeOptions,
) -> Result<DecodedSymbol, QrError> {
    let image = PixelBuffer::new(rgba, width, height)?;
    Ok(QrReader::new(*options).decode(&image)?)
}
