//! Decode configuration

use std::str::FromStr;

use crate::detector::locator::{FINDER_CENTER_OFFSET, LocatorParams};
use crate::utils::binarization::DEFAULT_THRESHOLD;

/// Whether a failed pass is retried on a colour-inverted copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionAttempts {
    /// Only the image as given
    DoNotInvert,
    /// Retry once with every colour channel inverted (alpha untouched)
    #[default]
    AttemptInvertedOnFailure,
}

impl FromStr for InversionAttempts {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "off" | "false" | "do-not-invert" | "dontinvert" => Ok(Self::DoNotInvert),
            "1" | "on" | "true" | "attempt-inverted-on-failure" | "attemptboth" => {
                Ok(Self::AttemptInvertedOnFailure)
            }
            other => Err(format!("unknown inversion mode '{other}'")),
        }
    }
}

/// Options for one [`QrReader`](crate::QrReader)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeOptions {
    /// Inversion retry policy
    pub inversion: InversionAttempts,
    /// Pixels with luminance strictly below this are dark
    pub luminance_threshold: u8,
    /// Modules between a finder-pattern centre and the symbol edge
    pub finder_center_offset: f32,
    /// Location hypotheses tried per pass
    pub max_hypotheses: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            inversion: InversionAttempts::default(),
            luminance_threshold: DEFAULT_THRESHOLD,
            finder_center_offset: FINDER_CENTER_OFFSET,
            max_hypotheses: 40,
        }
    }
}

impl DecodeOptions {
    /// Set the inversion policy
    pub fn with_inversion(mut self, inversion: InversionAttempts) -> Self {
        self.inversion = inversion;
        self
    }

    /// Set the luminance threshold
    pub fn with_luminance_threshold(mut self, threshold: u8) -> Self {
        self.luminance_threshold = threshold;
        self
    }

    /// Set the finder-centre offset; non-finite or out-of-range values
    /// (outside 0-7 modules) keep the current one
    pub fn with_finder_center_offset(mut self, offset: f32) -> Self {
        if offset.is_finite() && offset > 0.0 && offset <= 7.0 {
            self.finder_center_offset = offset;
        } else {
            log::warn!("ignoring finder centre offset {offset}");
        }
        self
    }

    /// Set the per-pass hypothesis cap (at least 1)
    pub fn with_max_hypotheses(mut self, max: usize) -> Self {
        self.max_hypotheses = max.max(1);
        self
    }

    /// Defaults overlaid with `QR_INVERSION`, `QR_LUMA_THRESHOLD`,
    /// `QR_FINDER_OFFSET` and `QR_MAX_HYPOTHESES`. Unparsable values are
    /// ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let inversion = std::env::var("QR_INVERSION")
            .ok()
            .and_then(|v| v.parse::<InversionAttempts>().ok())
            .unwrap_or(defaults.inversion);

        defaults
            .with_inversion(inversion)
            .with_luminance_threshold(parse_env_u8("QR_LUMA_THRESHOLD", defaults.luminance_threshold))
            .with_finder_center_offset(parse_env_f32(
                "QR_FINDER_OFFSET",
                defaults.finder_center_offset,
            ))
            .with_max_hypotheses(parse_env_usize("QR_MAX_HYPOTHESES", defaults.max_hypotheses))
    }

    /// Whether a second, inverted pass is allowed
    pub fn retries_inverted(&self) -> bool {
        self.inversion == InversionAttempts::AttemptInvertedOnFailure
    }

    pub(crate) fn locator_params(&self) -> LocatorParams {
        LocatorParams {
            finder_center_offset: self.finder_center_offset,
            max_hypotheses: self.max_hypotheses,
        }
    }
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .unwrap_or(default)
}
