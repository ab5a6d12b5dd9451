/// Extraction of the module grid from a located symbol
use crate::detector::locator::SymbolLocation;
use crate::models::{BitMatrix, Corners, ModuleGrid, Point, Version};

/// Maps grid cells to image positions and classifies them.
///
/// Only [`GridSampler::module_center`] is required; the blend, dimension
/// estimate and full-grid sampling have bilinear defaults.
pub trait GridSampler: Sync {
    /// Image position of the centre of module (`col`, `row`)
    fn module_center(&self, corners: &Corners, dimension: usize, col: usize, row: usize) -> Point;

    /// Fraction of dark among the four pixels around `point`, weighted
    /// bilinearly. Pixels outside the image count as light.
    fn darkness(&self, binary: &BitMatrix, point: Point) -> f32 {
        let fx = point.x - 0.5;
        let fy = point.y - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;

        let dark_at = |x: f32, y: f32| -> f32 {
            if x < 0.0 || y < 0.0 {
                return 0.0;
            }
            let (xi, yi) = (x as usize, y as usize);
            if xi < binary.width() && yi < binary.height() && binary.get(xi, yi) {
                1.0
            } else {
                0.0
            }
        };

        let top = dark_at(x0, y0) * (1.0 - tx) + dark_at(x0 + 1.0, y0) * tx;
        let bottom = dark_at(x0, y0 + 1.0) * (1.0 - tx) + dark_at(x0 + 1.0, y0 + 1.0) * tx;
        top * (1.0 - ty) + bottom * ty
    }

    /// Module value: blended darkness thresholded at one half
    fn is_dark_module(
        &self,
        binary: &BitMatrix,
        corners: &Corners,
        dimension: usize,
        col: usize,
        row: usize,
    ) -> bool {
        let center = self.module_center(corners, dimension, col, row);
        self.darkness(binary, center) >= 0.5
    }

    /// Sample every module at `dimension`; `None` if the dimension is not
    /// a legal QR size
    fn sample(
        &self,
        binary: &BitMatrix,
        location: &SymbolLocation,
        dimension: usize,
    ) -> Option<ModuleGrid> {
        Version::from_dimension(dimension)?;
        let mut bits = BitMatrix::new(dimension, dimension);
        for row in 0..dimension {
            for col in 0..dimension {
                if self.is_dark_module(binary, &location.corners, dimension, col, row) {
                    bits.set(col, row, true);
                }
            }
        }
        ModuleGrid::from_matrix(bits)
    }

    /// Side length in modules.
    ///
    /// The mean of the top and bottom edge lengths over the module size,
    /// rounded down and snapped to a legal size, then refined against the
    /// timing patterns of neighbouring versions.
    fn estimate_dimension(&self, binary: &BitMatrix, location: &SymbolLocation) -> Option<usize> {
        let c = &location.corners;
        if location.module_size <= 0.0 {
            return None;
        }
        let top = c.top_left.distance(&c.top_right);
        let bottom = c.bottom_left.distance(&c.bottom_right);
        let raw = ((top + bottom) / 2.0 / location.module_size).floor();
        let raw = raw.clamp(21.0, 177.0);
        let estimate = ((raw - 17.0) / 4.0).round().clamp(1.0, 40.0) as u8;

        let mut best = Version::new(estimate)?.dimension();
        let mut best_score = timing_score(self, binary, c, best);
        for delta in [-1i16, 1, -2, 2] {
            let number = estimate as i16 + delta;
            let Some(version) = u8::try_from(number).ok().and_then(Version::new) else {
                continue;
            };
            let score = timing_score(self, binary, c, version.dimension());
            if score > best_score {
                best = version.dimension();
                best_score = score;
            }
        }

        log::trace!(
            "grid: raw dimension {} -> {} (timing score {:.2})",
            raw,
            best,
            best_score
        );
        Some(best)
    }
}

/// Fraction of timing-pattern modules (row 6 and column 6, between the
/// finders) that alternate dark/light as expected at `dimension`
fn timing_score<S: GridSampler + ?Sized>(
    sampler: &S,
    binary: &BitMatrix,
    corners: &Corners,
    dimension: usize,
) -> f32 {
    let mut matches = 0usize;
    let mut total = 0usize;
    for i in 8..dimension - 8 {
        let expected = i % 2 == 0;
        if sampler.is_dark_module(binary, corners, dimension, i, 6) == expected {
            matches += 1;
        }
        if sampler.is_dark_module(binary, corners, dimension, 6, i) == expected {
            matches += 1;
        }
        total += 2;
    }
    if total == 0 {
        0.0
    } else {
        matches as f32 / total as f32
    }
}

/// Linear interpolation along the top and bottom edges for the column,
/// then between those two points for the row.
///
/// Exact for parallelograms; perspective-skewed symbols drift towards the
/// far corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct BilinearSampler;

impl GridSampler for BilinearSampler {
    fn module_center(&self, corners: &Corners, dimension: usize, col: usize, row: usize) -> Point {
        let u = (col as f32 + 0.5) / dimension as f32;
        let v = (row as f32 + 0.5) / dimension as f32;
        let top = corners.top_left.lerp(&corners.top_right, u);
        let bottom = corners.bottom_left.lerp(&corners.bottom_right, u);
        top.lerp(&bottom, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_location(origin: f32, side: f32, module_size: f32) -> SymbolLocation {
        let corners = Corners {
            top_left: Point::new(origin, origin),
            top_right: Point::new(origin + side, origin),
            bottom_left: Point::new(origin, origin + side),
            bottom_right: Point::new(origin + side, origin + side),
        };
        SymbolLocation {
            corners,
            module_size,
            finders: [corners.top_left, corners.top_right, corners.bottom_left],
            estimated_dimension: (side / module_size) as usize,
        }
    }

    /// Paint `modules` (dimension x dimension) at `scale` px/module with a
    /// quiet zone of `quiet` modules
    fn render(modules: &BitMatrix, scale: usize, quiet: usize) -> BitMatrix {
        let side = (modules.width() + 2 * quiet) * scale;
        let mut out = BitMatrix::new(side, side);
        for y in 0..modules.height() {
            for x in 0..modules.width() {
                if !modules.get(x, y) {
                    continue;
                }
                for py in 0..scale {
                    for px in 0..scale {
                        out.set((x + quiet) * scale + px, (y + quiet) * scale + py, true);
                    }
                }
            }
        }
        out
    }

    fn timing_only(dimension: usize) -> BitMatrix {
        let mut m = BitMatrix::new(dimension, dimension);
        for i in 0..dimension {
            if i % 2 == 0 {
                m.set(i, 6, true);
                m.set(6, i, true);
            }
        }
        m
    }

    #[test]
    fn test_module_centers_on_square() {
        let loc = square_location(32.0, 168.0, 8.0);
        let p = BilinearSampler.module_center(&loc.corners, 21, 0, 0);
        assert!(p.distance(&Point::new(36.0, 36.0)) < 1e-3);
        let p = BilinearSampler.module_center(&loc.corners, 21, 20, 10);
        assert!(p.distance(&Point::new(196.0, 116.0)) < 1e-3);
    }

    #[test]
    fn test_darkness_blend() {
        let mut m = BitMatrix::new(4, 4);
        m.set(1, 1, true);
        // Pixel centre
        assert_eq!(BilinearSampler.darkness(&m, Point::new(1.5, 1.5)), 1.0);
        // Shared corner of four pixels, one dark
        assert!((BilinearSampler.darkness(&m, Point::new(1.0, 1.0)) - 0.25).abs() < 1e-6);
        // Outside the image is light
        assert_eq!(BilinearSampler.darkness(&m, Point::new(-3.0, 10.0)), 0.0);
    }

    #[test]
    fn test_sample_recovers_grid() {
        let mut modules = timing_only(25);
        modules.set(3, 17, true);
        modules.set(20, 2, true);
        let image = render(&modules, 5, 4);
        let loc = square_location(20.0, 125.0, 5.0);

        let grid = BilinearSampler.sample(&image, &loc, 25).unwrap();
        assert_eq!(grid.dimension(), 25);
        assert_eq!(grid.as_matrix(), &modules);

        assert!(BilinearSampler.sample(&image, &loc, 24).is_none());
    }

    #[test]
    fn test_dimension_from_edges_and_timing() {
        let modules = timing_only(29);
        let image = render(&modules, 4, 4);
        let mut loc = square_location(16.0, 116.0, 4.0);
        assert_eq!(BilinearSampler.estimate_dimension(&image, &loc), Some(29));

        // A module size that is slightly off still lands on the timing match
        loc.module_size = 4.4;
        assert_eq!(BilinearSampler.estimate_dimension(&image, &loc), Some(29));
    }
}
