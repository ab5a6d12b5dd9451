//! Utility functions for image processing
//!
//! Luminance conversion and dark/light binarization of RGBA pixels.

/// Pixel classification and whole-image binarization
pub mod binarization;
