//! One locate -> extract -> decode pass over an image

use crate::config::DecodeOptions;
use crate::decoder::version::{VERSION_INFO_MIN_DIMENSION, VersionInfo};
use crate::decoder::{GridDecode, SymbolDecoder};
use crate::detector::{FinderDetector, GridSampler, RunTable, SymbolLocation, SymbolLocator};
use crate::error::DecodeFailure;
use crate::models::{BitMatrix, ModuleGrid, PixelBuffer};
use crate::utils::binarization::{PixelSampler, binarize};

/// Successful pass: where the symbol is, its grid and what it says
#[derive(Debug, Clone)]
pub(crate) struct PassResult {
    pub location: SymbolLocation,
    pub grid: ModuleGrid,
    pub decoded: GridDecode,
}

/// Run the full pipeline once. Hypotheses are tried in locator order and
/// the first that decodes wins; otherwise the most advanced failure is
/// reported.
pub(crate) fn decode_pass<P, G>(
    image: &PixelBuffer<'_>,
    pixel_sampler: &P,
    grid_sampler: &G,
    options: &DecodeOptions,
) -> Result<PassResult, DecodeFailure>
where
    P: PixelSampler + ?Sized,
    G: GridSampler + ?Sized,
{
    let binary = binarize(image, pixel_sampler);
    let runs = RunTable::scan(&binary);
    let candidates = FinderDetector::detect(&runs);
    let hypotheses = SymbolLocator::hypotheses(&candidates, &options.locator_params());
    log::debug!(
        "pass: {} finder candidates, {} location hypotheses",
        candidates.len(),
        hypotheses.len()
    );

    let mut failure = DecodeFailure::NotLocated;
    for (i, location) in hypotheses.into_iter().enumerate() {
        match attempt(&binary, &location, grid_sampler) {
            Ok((grid, decoded)) => {
                log::debug!("pass: hypothesis {} decoded", i);
                return Ok(PassResult {
                    location,
                    grid,
                    decoded,
                });
            }
            Err(err) => {
                log::debug!("pass: hypothesis {} failed: {}", i, err);
                failure = more_advanced(failure, err);
            }
        }
    }

    Err(failure)
}

/// Sample the grid for one location and decode it
pub(crate) fn attempt<G: GridSampler + ?Sized>(
    binary: &BitMatrix,
    location: &SymbolLocation,
    grid_sampler: &G,
) -> Result<(ModuleGrid, GridDecode), DecodeFailure> {
    let grid = sample_grid(binary, location, grid_sampler)?;
    let decoded = SymbolDecoder::decode(&grid)?;
    Ok((grid, decoded))
}

/// Estimate the dimension and sample. From version 7 up the grid carries
/// its own version; when that disagrees with the estimate, sample again
/// at the encoded size.
pub(crate) fn sample_grid<G: GridSampler + ?Sized>(
    binary: &BitMatrix,
    location: &SymbolLocation,
    grid_sampler: &G,
) -> Result<ModuleGrid, DecodeFailure> {
    let dimension = grid_sampler
        .estimate_dimension(binary, location)
        .ok_or(DecodeFailure::NotLocated)?;
    let grid = grid_sampler
        .sample(binary, location, dimension)
        .ok_or(DecodeFailure::NotLocated)?;

    if dimension < VERSION_INFO_MIN_DIMENSION {
        return Ok(grid);
    }
    match VersionInfo::read(&grid) {
        Ok(version) if version.dimension() != dimension => {
            log::debug!(
                "pass: version info says {}, resampling at {} instead of {}",
                version.number(),
                version.dimension(),
                dimension
            );
            Ok(grid_sampler
                .sample(binary, location, version.dimension())
                .unwrap_or(grid))
        }
        _ => Ok(grid),
    }
}

fn stage_rank(failure: &DecodeFailure) -> u8 {
    match failure {
        DecodeFailure::NotLocated => 0,
        DecodeFailure::MalformedFormatInfo(_) => 1,
        DecodeFailure::UncorrectableData(_) => 2,
        DecodeFailure::MalformedPayload(_) => 3,
    }
}

/// The failure from the later pipeline stage; `current` wins ties
pub(crate) fn more_advanced(current: DecodeFailure, next: DecodeFailure) -> DecodeFailure {
    if stage_rank(&next) > stage_rank(&current) {
        next
    } else {
        current
    }
}
