use crate::signal::{Events, RRSeries};
use log::debug;
use serde::{Deserialize, Serialize};

/// Rate reported when beat intervals are unusable.
pub const DEFAULT_BPM: f64 = 72.0;

/// Heart-rate estimate and the RR intervals behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    pub bpm: f64,
    pub rr: RRSeries,
}

/// `60 / mean(RR)` using the real timestamps at each peak.
pub fn estimate_bpm(peaks: &Events, timestamps: &[f64]) -> RateEstimate {
    estimate_bpm_or(peaks, timestamps, DEFAULT_BPM)
}

/// As [`estimate_bpm`] with a caller-chosen default.
///
/// The default is returned for fewer than two peaks or a non-positive mean
/// interval.
pub fn estimate_bpm_or(peaks: &Events, timestamps: &[f64], default_bpm: f64) -> RateEstimate {
    if peaks.len() < 2 {
        debug!("{} peak(s), reporting default rate", peaks.len());
        return RateEstimate {
            bpm: default_bpm,
            rr: RRSeries::default(),
        };
    }
    let rr = RRSeries::from_events(peaks, timestamps);
    let bpm = match rr.mean() {
        Some(mean) if mean > 0.0 => 60.0 / mean,
        mean => {
            debug!("degenerate mean RR {:?}, reporting default rate", mean);
            default_bpm
        }
    };
    RateEstimate { bpm, rr }
}
