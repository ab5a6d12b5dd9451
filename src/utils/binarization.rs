/// Dark/light classification of image pixels
/// Luminance Y = 0.299*R + 0.587*G + 0.114*B against a fixed threshold
use crate::models::{BitMatrix, PixelBuffer};
use rayon::prelude::*;

/// Coefficients for grayscale conversion
const COEF_R: f32 = 0.299;
const COEF_G: f32 = 0.587;
const COEF_B: f32 = 0.114;

/// Luminance of one pixel in [0, 255]
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    COEF_R * r as f32 + COEF_G * g as f32 + COEF_B * b as f32
}

/// Default luminance threshold; pixels strictly darker are dark
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Classifies a single pixel as dark or light.
///
/// Implementations must be pure: the same pixel always gives the same answer.
pub trait PixelSampler: Sync {
    /// Whether the pixel at column `x`, row `y` is dark.
    /// Caller keeps (x, y) inside the image.
    fn is_dark(&self, image: &PixelBuffer<'_>, x: usize, y: usize) -> bool;
}

/// Fixed-threshold luminance classifier
#[derive(Debug, Clone, Copy)]
pub struct LuminanceSampler {
    threshold: u8,
}

impl LuminanceSampler {
    /// Classifier with the given threshold
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Current threshold
    pub fn threshold(&self) -> u8 {
        self.threshold
    }
}

impl Default for LuminanceSampler {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl PixelSampler for LuminanceSampler {
    #[inline]
    fn is_dark(&self, image: &PixelBuffer<'_>, x: usize, y: usize) -> bool {
        let [r, g, b, _] = image.rgba(x, y);
        luminance(r, g, b) < self.threshold as f32
    }
}

/// Classify every pixel of `image`
/// Returns a BitMatrix where true = dark, false = light
pub fn binarize<S: PixelSampler + ?Sized>(image: &PixelBuffer<'_>, sampler: &S) -> BitMatrix {
    let width = image.width();
    let height = image.height();

    let rows: Vec<Vec<bool>> = (0..height)
        .into_par_iter()
        .map(|y| (0..width).map(|x| sampler.is_dark(image, x, y)).collect())
        .collect();

    let mut binary = BitMatrix::new(width, height);
    for (y, row) in rows.iter().enumerate() {
        for (x, &dark) in row.iter().enumerate() {
            if dark {
                binary.set(x, y, true);
            }
        }
    }
    binary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_pixels(values: &[u8]) -> Vec<u8> {
        values.iter().flat_map(|&v| [v, v, v, 255]).collect()
    }

    #[test]
    fn test_luminance_weights() {
        assert!((luminance(255, 255, 255) - 255.0).abs() < 0.01);
        assert_eq!(luminance(0, 0, 0), 0.0);
        assert!((luminance(255, 0, 0) - 76.245).abs() < 0.01);
        assert!((luminance(0, 255, 0) - 149.685).abs() < 0.01);
    }

    #[test]
    fn test_threshold_binarize() {
        let data = gray_pixels(&[100, 150, 200, 50]); // 2x2 image
        let image = PixelBuffer::new(&data, 2, 2).unwrap();
        let binary = binarize(&image, &LuminanceSampler::default());

        // Pixels < 128 should be dark (true)
        assert!(binary.get(0, 0)); // 100 < 128
        assert!(!binary.get(1, 0)); // 150 >= 128
        assert!(!binary.get(0, 1)); // 200 >= 128
        assert!(binary.get(1, 1)); // 50 < 128
    }

    #[test]
    fn test_threshold_is_strict() {
        let data = gray_pixels(&[127, 128]);
        let image = PixelBuffer::new(&data, 2, 1).unwrap();
        let sampler = LuminanceSampler::default();
        assert!(sampler.is_dark(&image, 0, 0));
        assert!(!sampler.is_dark(&image, 1, 0));
    }

    #[test]
    fn test_colour_weights_matter() {
        // Pure red is dark (76), pure green is light (150)
        let data = [255u8, 0, 0, 255, 0, 255, 0, 255];
        let image = PixelBuffer::new(&data, 2, 1).unwrap();
        let binary = binarize(&image, &LuminanceSampler::new(128));
        assert!(binary.get(0, 0));
        assert!(!binary.get(1, 0));
    }
}
