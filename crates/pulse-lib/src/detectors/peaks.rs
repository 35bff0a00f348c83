use crate::signal::Events;
use serde::{Deserialize, Serialize};

/// Parameters of the windowed local-maximum detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakDetectorConfig {
    /// Half-width of the comparison window and minimum spacing between peaks (samples).
    pub min_distance: usize,
    /// Amplitude a peak must strictly exceed. `None` uses [`default_threshold`].
    pub threshold: Option<f64>,
}

impl Default for PeakDetectorConfig {
    fn default() -> Self {
        Self {
            min_distance: 50,
            threshold: None,
        }
    }
}

/// `mean + 0.5 * std` (population standard deviation).
pub fn default_threshold(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    mean + 0.5 * var.sqrt()
}

/// Percentile with linear interpolation between closest ranks, `q` in `[0, 100]`.
pub fn percentile(data: &[f64], q: f64) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

/// Detect peaks with the default 50-sample spacing and threshold.
pub fn find_peaks(data: &[f64]) -> Events {
    find_peaks_with_config(data, &PeakDetectorConfig::default())
}

/// Naive windowed scan.
///
/// Sample `i` is accepted when it is strictly greater than every other sample
/// within `min_distance` on either side, strictly above the threshold, and at
/// least `min_distance` samples after the previously accepted peak. Only
/// indices in `[min_distance, len - min_distance)` are candidates, so short
/// inputs yield no peaks. A zero spacing is treated as one; a spacing at or
/// beyond the input length yields nothing.
pub fn find_peaks_with_config(data: &[f64], cfg: &PeakDetectorConfig) -> Events {
    let d = cfg.min_distance.max(1);
    let n = data.len();
    if d >= n || n - d <= d {
        return Events::default();
    }
    let threshold = cfg.threshold.unwrap_or_else(|| default_threshold(data));

    let mut peaks: Vec<usize> = Vec::new();
    for i in d..n - d {
        let value = data[i];
        if !(value > threshold) {
            continue;
        }
        let dominates = data[i - d..i]
            .iter()
            .chain(&data[i + 1..=i + d])
            .all(|&other| value > other);
        if !dominates {
            continue;
        }
        match peaks.last() {
            Some(&last) if i - last < d => {}
            _ => peaks.push(i),
        }
    }
    Events::from_indices(peaks)
}
