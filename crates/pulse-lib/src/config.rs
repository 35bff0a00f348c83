use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Upper bound on the refractory spacing in samples.
pub const MAX_MIN_DISTANCE: usize = u32::MAX as usize;

/// Tunables for the recorded-signal path of the analyzer.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Lower band-pass cutoff (Hz).
    pub lowcut_hz: f64,
    /// Upper band-pass cutoff (Hz).
    pub highcut_hz: f64,
    /// Butterworth order of the band-pass prototype.
    pub filter_order: usize,
    /// Sampling rate assumed when the time axis has fewer than two samples.
    pub fallback_fs: f64,
    /// Minimum spacing between accepted beats (seconds).
    pub min_rr_s: f64,
    /// Percentile of the normalised signal used as the peak threshold.
    pub threshold_percentile: f64,
    /// Rate reported when no usable beat intervals exist.
    pub default_bpm: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            lowcut_hz: 0.5,
            highcut_hz: 40.0,
            filter_order: 3,
            fallback_fs: 250.0,
            min_rr_s: 0.3,
            threshold_percentile: 85.0,
            default_bpm: 72.0,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: AnalyzerConfig = toml::from_str(text).context("parsing analyzer config")?;
        Ok(cfg)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("in {}", path.display()))
    }

    /// Refractory spacing in samples at the given rate, within `1..=MAX_MIN_DISTANCE`.
    pub fn min_distance(&self, fs: f64) -> usize {
        let samples = (self.min_rr_s * fs).round();
        if samples.is_nan() || samples < 1.0 {
            1
        } else if samples >= MAX_MIN_DISTANCE as f64 {
            MAX_MIN_DISTANCE
        } else {
            samples as usize
        }
    }
}
