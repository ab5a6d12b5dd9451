/// Grouping of finder candidates into symbol locations
use crate::detector::finder::FinderCandidate;
use crate::error::DecodeFailure;
use crate::models::{Corners, Point};

/// Modules between a finder-pattern centre and the symbol's outer edge
pub const FINDER_CENTER_OFFSET: f32 = 3.5;

/// Resolved placement of one QR symbol
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolLocation {
    /// Outer corners of the symbol
    pub corners: Corners,
    /// Module size in pixels, consistent across the three finders
    pub module_size: f32,
    /// Finder centres: top-left, top-right, bottom-left
    pub finders: [Point; 3],
    /// Side length in modules implied by the finder spacing
    pub estimated_dimension: usize,
}

/// Geometry knobs for grouping
#[derive(Debug, Clone, Copy)]
pub struct LocatorParams {
    /// See [`FINDER_CENTER_OFFSET`]
    pub finder_center_offset: f32,
    /// Stop after this many valid hypotheses
    pub max_hypotheses: usize,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            finder_center_offset: FINDER_CENTER_OFFSET,
            max_hypotheses: 40,
        }
    }
}

pub struct SymbolLocator;

impl SymbolLocator {
    /// First valid location, in the fixed hypothesis order
    pub fn locate(
        candidates: &[FinderCandidate],
        params: &LocatorParams,
    ) -> Result<SymbolLocation, DecodeFailure> {
        let first = LocatorParams {
            max_hypotheses: 1,
            ..*params
        };
        Self::hypotheses(candidates, &first)
            .into_iter()
            .next()
            .ok_or(DecodeFailure::NotLocated)
    }

    /// Valid locations in deterministic order, at most `params.max_hypotheses`.
    ///
    /// Candidates are binned by module size; each bin is searched together
    /// with the next larger one, and triples are enumerated in candidate
    /// (scan) order within that set.
    pub fn hypotheses(
        candidates: &[FinderCandidate],
        params: &LocatorParams,
    ) -> Vec<SymbolLocation> {
        let mut found = Vec::new();
        if candidates.len() < 3 || params.max_hypotheses == 0 {
            return found;
        }

        let bins = Self::size_bins(candidates);
        log::debug!(
            "locator: {} candidates in {} size bins",
            candidates.len(),
            bins.len()
        );

        for (i, bin) in bins.iter().enumerate() {
            let mut indices = bin.clone();
            if let Some(next) = bins.get(i + 1) {
                indices.extend_from_slice(next);
            }
            if indices.len() < 3 {
                continue;
            }
            indices.sort_unstable();

            for (a_pos, &a) in indices.iter().enumerate() {
                for (b_pos, &b) in indices.iter().enumerate().skip(a_pos + 1) {
                    for &c in indices.iter().skip(b_pos + 1) {
                        // Triples entirely inside the next bin belong to its own pass
                        if !(bin.contains(&a) || bin.contains(&b) || bin.contains(&c)) {
                            continue;
                        }
                        if let Some(location) = Self::validate_triple(
                            &candidates[a],
                            &candidates[b],
                            &candidates[c],
                            params.finder_center_offset,
                        ) {
                            found.push(location);
                            if found.len() >= params.max_hypotheses {
                                return found;
                            }
                        }
                    }
                }
            }
        }

        found
    }

    /// Single-link bins over module size: a candidate joins the current bin
    /// while it is within 1.25x of the bin's smallest member
    fn size_bins(candidates: &[FinderCandidate]) -> Vec<Vec<usize>> {
        let mut indexed: Vec<(usize, f32)> = candidates
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.module_size))
            .collect();
        indexed.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut bins: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut bin_min = 0.0f32;
        const BIN_RATIO: f32 = 1.25;

        for (idx, size) in indexed {
            if current.is_empty() {
                bin_min = size;
            } else if size > bin_min * BIN_RATIO {
                bins.push(std::mem::take(&mut current));
                bin_min = size;
            }
            current.push(idx);
        }
        if !current.is_empty() {
            bins.push(current);
        }
        bins
    }

    fn validate_triple(
        a: &FinderCandidate,
        b: &FinderCandidate,
        c: &FinderCandidate,
        offset: f32,
    ) -> Option<SymbolLocation> {
        let patterns = [a, b, c];
        if patterns.iter().any(|p| p.module_size < 1.0) {
            return None;
        }

        let sizes = [a.module_size, b.module_size, c.module_size];
        let min_size = sizes.iter().copied().fold(f32::INFINITY, f32::min);
        let max_size = sizes.iter().copied().fold(0.0f32, f32::max);
        if max_size / min_size > 2.0 {
            return None;
        }
        let avg_module = sizes.iter().sum::<f32>() / 3.0;

        // Finder centres of a real symbol are at least 14 modules apart
        let distances = [
            a.center.distance(&b.center),
            a.center.distance(&c.center),
            b.center.distance(&c.center),
        ];
        let min_d = distances.iter().copied().fold(f32::INFINITY, f32::min);
        if min_d < avg_module * 9.0 {
            return None;
        }

        let (tl, tr, bl) = Self::order_finders(a, b, c)?;

        // Horizontal/vertical runs through a rotated finder are stretched by
        // 1 / max(|cos|, |sin|) of the rotation
        let (ux, uy) = tl.center.direction_to(&tr.center)?;
        let stretch = ux.abs().max(uy.abs());
        let module_est = avg_module * stretch;

        let d_tr = tl.center.distance(&tr.center);
        let d_bl = tl.center.distance(&bl.center);
        let dim1 = estimate_dimension_from_distance(d_tr, module_est)?;
        let dim2 = estimate_dimension_from_distance(d_bl, module_est)?;
        let dimension = if dim1 == dim2 {
            dim1
        } else if dim1.abs_diff(dim2) <= 4 {
            (dim1 + dim2) / 2 / 4 * 4 + 1
        } else {
            log::trace!("locator: reject, side dimensions {} vs {}", dim1, dim2);
            return None;
        };

        let module_size = (d_tr + d_bl) / 2.0 / (dimension as f32 - 7.0);
        let module_ratio = module_size / module_est;
        if !(0.7..=1.3).contains(&module_ratio) {
            log::trace!("locator: reject, module ratio {:.2}", module_ratio);
            return None;
        }

        let corners = derive_corners(&tl.center, &tr.center, &bl.center, module_size, offset)?;
        Some(SymbolLocation {
            corners,
            module_size,
            finders: [tl.center, tr.center, bl.center],
            estimated_dimension: dimension,
        })
    }

    /// Top-left sits at the corner closest to a right angle; the cross
    /// product sign separates top-right from bottom-left (y grows down)
    fn order_finders<'a>(
        a: &'a FinderCandidate,
        b: &'a FinderCandidate,
        c: &'a FinderCandidate,
    ) -> Option<(
        &'a FinderCandidate,
        &'a FinderCandidate,
        &'a FinderCandidate,
    )> {
        let patterns = [a, b, c];

        let mut best_idx = None;
        let mut best_cos = f32::INFINITY;
        for i in 0..3 {
            let p = &patterns[i].center;
            let p1 = &patterns[(i + 1) % 3].center;
            let p2 = &patterns[(i + 2) % 3].center;

            let v1 = (p1.x - p.x, p1.y - p.y);
            let v2 = (p2.x - p.x, p2.y - p.y);
            let denom = (v1.0 * v1.0 + v1.1 * v1.1).sqrt() * (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
            if denom == 0.0 {
                continue;
            }
            let cos = ((v1.0 * v2.0 + v1.1 * v2.1) / denom).abs();
            if cos < best_cos {
                best_cos = cos;
                best_idx = Some(i);
            }
        }

        let best_idx = best_idx?;
        if best_cos >= 0.4 {
            return None;
        }

        let tl = patterns[best_idx];
        let p1 = patterns[(best_idx + 1) % 3];
        let p2 = patterns[(best_idx + 2) % 3];
        let cross = (p1.center.x - tl.center.x) * (p2.center.y - tl.center.y)
            - (p1.center.y - tl.center.y) * (p2.center.x - tl.center.x);

        Some(if cross > 0.0 {
            (tl, p1, p2)
        } else {
            (tl, p2, p1)
        })
    }
}

fn estimate_dimension_from_distance(distance: f32, module_size: f32) -> Option<usize> {
    if module_size <= 0.0 {
        return None;
    }
    let raw_dim = distance / module_size + 7.0;
    if raw_dim < 19.0 {
        return None;
    }
    let version = ((raw_dim - 17.0) / 4.0).round().max(1.0) as usize;
    if !(1..=40).contains(&version) {
        return None;
    }
    Some(17 + 4 * version)
}

/// Push each finder centre outward by `offset` modules along the symbol's
/// own axes; the fourth corner completes the parallelogram
pub fn derive_corners(
    tl: &Point,
    tr: &Point,
    bl: &Point,
    module_size: f32,
    offset: f32,
) -> Option<Corners> {
    let (ax, ay) = tl.direction_to(tr)?;
    let (bx, by) = tl.direction_to(bl)?;
    let d = offset * module_size;

    let top_left = tl.translate(-(ax + bx) * d, -(ay + by) * d);
    let top_right = tr.translate((ax - bx) * d, (ay - by) * d);
    let bottom_left = bl.translate((bx - ax) * d, (by - ay) * d);
    let bottom_right = Point::new(
        top_right.x + bottom_left.x - top_left.x,
        top_right.y + bottom_left.y - top_left.y,
    );

    Some(Corners {
        top_left,
        top_right,
        bottom_left,
        bottom_right,
    })
}
