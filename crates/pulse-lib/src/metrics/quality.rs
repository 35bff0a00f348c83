use crate::{filter::remove_mean, signal::RRSeries};
use realfft::RealFftPlanner;
use serde::{Deserialize, Serialize};

/// Informational quality indices for a conditioned recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalQuality {
    pub kurtosis: f64,
    pub spectral_entropy: f64,
    pub rr_cv: f64,
}

impl SignalQuality {
    /// Peaky waveform with a steady rhythm.
    pub fn looks_like_ecg(&self) -> bool {
        self.kurtosis >= 3.0 && self.rr_cv <= 0.2
    }
}

pub fn evaluate_quality(data: &[f64], rr: &RRSeries) -> SignalQuality {
    SignalQuality {
        kurtosis: kurtosis(data),
        spectral_entropy: spectral_entropy(data),
        rr_cv: rr_cv(rr),
    }
}

/// Non-excess kurtosis; 0 for empty or constant input.
pub fn kurtosis(data: &[f64]) -> f64 {
    let centered = remove_mean(data);
    if centered.is_empty() {
        return 0.0;
    }
    let (m2, m4) = centered.iter().fold((0.0, 0.0), |(m2, m4), x| {
        let sq = x * x;
        (m2 + sq, m4 + sq * sq)
    });
    if m2 == 0.0 {
        return 0.0;
    }
    // m2 and m4 are sums here, not means.
    centered.len() as f64 * m4 / (m2 * m2)
}

/// Shannon entropy (bits) of the normalised power spectrum.
pub fn spectral_entropy(data: &[f64]) -> f64 {
    let n = data.len();
    if n == 0 {
        return 0.0;
    }
    let mut planner = RealFftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer = data.to_vec();
    let mut spectrum = fft.make_output_vec();
    if fft.process(&mut buffer, &mut spectrum).is_err() {
        return 0.0;
    }
    let powers: Vec<f64> = spectrum.iter().map(|c| c.norm_sqr()).collect();
    let total: f64 = powers.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    powers
        .iter()
        .filter(|&&p| p > 0.0)
        .map(|&p| {
            let share = p / total;
            -share * share.log2()
        })
        .sum()
}

/// Coefficient of variation of the RR intervals, 0 without a usable mean.
pub fn rr_cv(rr: &RRSeries) -> f64 {
    match (rr.mean(), rr.std_dev()) {
        (Some(mean), Some(sd)) if mean != 0.0 => sd / mean,
        _ => 0.0,
    }
}
