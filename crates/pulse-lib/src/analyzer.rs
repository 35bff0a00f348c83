//! Entry point tying loading, conditioning, detection and rate estimation
//! together.
//!
//! [`analyze`] always produces a result. A missing recording is replaced by
//! [`synth::primary`]; a recording that cannot be processed is replaced by
//! [`synth::fallback`]. The `source` field records which path was taken.

use crate::{
    config::AnalyzerConfig,
    detectors::peaks::{find_peaks_with_config, percentile, PeakDetectorConfig},
    error::{AnalysisError, Result},
    filter::{butter_bandpass, filtfilt, min_max_normalize, remove_mean},
    io::recording::read_recording_csv,
    metrics::rate::estimate_bpm_or,
    signal::{Events, RRSeries, Signal},
    synth::{self, SyntheticEcg},
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the returned waveform came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Recorded,
    SyntheticMissing,
    SyntheticFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub timestamps: Vec<f64>,
    /// Band-passed amplitudes for recordings, raw waveform for synthetic sources.
    pub amplitudes: Vec<f64>,
    pub bpm: f64,
    pub peaks: Events,
    pub rr: RRSeries,
    pub source: SignalSource,
}

impl Analysis {
    /// `(timestamps, amplitudes, bpm, peak_indices)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, f64, Vec<usize>) {
        (self.timestamps, self.amplitudes, self.bpm, self.peaks.indices)
    }

    fn from_synthetic(synth: SyntheticEcg, source: SignalSource) -> Self {
        let rr = RRSeries::from_events(&synth.peaks, &synth.signal.timestamps);
        Self {
            timestamps: synth.signal.timestamps,
            amplitudes: synth.signal.amplitudes,
            bpm: synth.bpm,
            peaks: synth.peaks,
            rr,
            source,
        }
    }
}

/// Band-passed recording plus the series peak detection runs on.
#[derive(Debug, Clone)]
pub struct Conditioned {
    pub fs: f64,
    pub filtered: Signal,
    /// Min-max scaled copy of `filtered`, or `filtered` itself when it is flat.
    pub detection: Vec<f64>,
}

pub fn analyze(path: impl AsRef<Path>) -> Analysis {
    analyze_with_config(path.as_ref(), &AnalyzerConfig::default())
}

pub fn analyze_with_config(path: &Path, cfg: &AnalyzerConfig) -> Analysis {
    match analyze_recording(path, cfg) {
        Ok(analysis) => analysis,
        Err(AnalysisError::MissingInput(missing)) => {
            info!("{} not found, using synthetic ECG", missing.display());
            Analysis::from_synthetic(synth::primary(), SignalSource::SyntheticMissing)
        }
        Err(err) => {
            warn!("analysis of {} failed: {}", path.display(), err);
            Analysis::from_synthetic(synth::fallback(), SignalSource::SyntheticFallback)
        }
    }
}

/// The recorded-signal path on its own; errors are returned rather than replaced.
pub fn analyze_recording(path: &Path, cfg: &AnalyzerConfig) -> Result<Analysis> {
    if !path.exists() {
        return Err(AnalysisError::MissingInput(path.to_path_buf()));
    }
    let raw = read_recording_csv(path)
        .map_err(|err| AnalysisError::malformed(format!("{:#}", err)))?;
    let conditioned = condition(&raw, cfg)?;

    let threshold = percentile(&conditioned.detection, cfg.threshold_percentile);
    let detector = PeakDetectorConfig {
        min_distance: cfg.min_distance(conditioned.fs),
        threshold,
    };
    let peaks = find_peaks_with_config(&conditioned.detection, &detector);
    let rate = estimate_bpm_or(&peaks, &raw.timestamps, cfg.default_bpm);
    info!(
        "{}: {} samples at {:.1} Hz, {} peaks, {:.1} bpm",
        path.display(),
        raw.len(),
        conditioned.fs,
        peaks.len(),
        rate.bpm
    );

    Ok(Analysis {
        timestamps: conditioned.filtered.timestamps,
        amplitudes: conditioned.filtered.amplitudes,
        bpm: rate.bpm,
        peaks,
        rr: rate.rr,
        source: SignalSource::Recorded,
    })
}

/// DC removal and zero-phase band-pass, sampling rate from the first time delta.
pub fn condition(raw: &Signal, cfg: &AnalyzerConfig) -> Result<Conditioned> {
    let fs = raw.inferred_fs().unwrap_or(cfg.fallback_fs);
    debug!("conditioning {} samples at {} Hz", raw.len(), fs);
    let centered = remove_mean(&raw.amplitudes);
    let tf = butter_bandpass(cfg.filter_order, cfg.lowcut_hz, cfg.highcut_hz, fs)?;
    let filtered = filtfilt(&tf, &centered)?;
    if filtered.iter().any(|x| !x.is_finite()) {
        return Err(AnalysisError::malformed("filter output is not finite"));
    }
    let detection = match min_max_normalize(&filtered) {
        Some(scaled) => scaled,
        None => {
            debug!("filtered signal is flat, detecting on unscaled samples");
            filtered.clone()
        }
    };
    Ok(Conditioned {
        fs,
        filtered: raw.with_amplitudes(filtered),
        detection,
    })
}
