//! Synthetic ECG-like waveforms used when no usable recording exists.
//!
//! There are two generators with different shapes. [`primary`] stands in for a
//! recording that is absent; [`fallback`] replaces one that could not be
//! processed. Callers and tests rely on the two being distinguishable, so they
//! are kept separate even though they serve the same purpose.

use crate::signal::{linspace, Events, Signal};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

pub const SYNTH_SAMPLES: usize = 1000;
pub const SYNTH_DURATION_S: f64 = 10.0;
/// Samples between beats; 72 bpm on the 10 s / 1000 sample grid.
pub const BEAT_STEP: usize = 83;
pub const PRIMARY_FIRST_BEAT: usize = 41;
pub const FALLBACK_FIRST_BEAT: usize = 20;
pub const SYNTHETIC_BPM: f64 = 72.0;

const R_AMPLITUDE: f64 = 1.5;
const P_AMPLITUDE: f64 = 0.1;
const P_FREQ_HZ: f64 = 1.2;
const T_AMPLITUDE: f64 = 0.3;
const T_START: usize = 15;
const T_WIDTH: usize = 20;
const NOISE_STD: f64 = 0.1;

const FALLBACK_SPIKE: f64 = 1.0;

/// A generated waveform together with the beat positions it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticEcg {
    pub signal: Signal,
    pub peaks: Events,
    pub bpm: f64,
}

fn beat_indices(first: usize) -> Vec<usize> {
    (first..SYNTH_SAMPLES).step_by(BEAT_STEP).collect()
}

/// Noisy 72 bpm rhythm with P, R and T components.
pub fn primary() -> SyntheticEcg {
    primary_with_rng(&mut rand::thread_rng())
}

/// [`primary`] with reproducible noise.
pub fn primary_seeded(seed: u64) -> SyntheticEcg {
    primary_with_rng(&mut StdRng::seed_from_u64(seed))
}

fn primary_with_rng<R: Rng + ?Sized>(rng: &mut R) -> SyntheticEcg {
    let t = linspace(0.0, SYNTH_DURATION_S, SYNTH_SAMPLES);
    let mut ecg: Vec<f64> = t
        .iter()
        .map(|&time| P_AMPLITUDE * (2.0 * PI * P_FREQ_HZ * time).sin())
        .collect();

    let peaks = beat_indices(PRIMARY_FIRST_BEAT);
    for &p in &peaks {
        ecg[p] += R_AMPLITUDE;
        for offset in T_START..T_START + T_WIDTH {
            if let Some(sample) = ecg.get_mut(p + offset) {
                *sample += T_AMPLITUDE * (PI * (offset - T_START) as f64 / T_WIDTH as f64).sin();
            }
        }
    }

    // Normal::new only rejects non-finite or negative deviations.
    if let Ok(noise) = Normal::new(0.0, NOISE_STD) {
        for sample in ecg.iter_mut() {
            *sample += noise.sample(rng);
        }
    }

    SyntheticEcg {
        signal: Signal::new(t, ecg),
        peaks: Events::from_indices(peaks),
        bpm: SYNTHETIC_BPM,
    }
}

/// Deterministic sinusoid composite with injected spikes.
// TODO: fold into `primary` once dashboards stop depending on the two distinct shapes.
pub fn fallback() -> SyntheticEcg {
    let t = linspace(0.0, SYNTH_DURATION_S, SYNTH_SAMPLES);
    let mut ecg: Vec<f64> = t.iter().map(|&time| fallback_base(time)).collect();
    let peaks = beat_indices(FALLBACK_FIRST_BEAT);
    for &p in &peaks {
        ecg[p] += FALLBACK_SPIKE;
    }
    SyntheticEcg {
        signal: Signal::new(t, ecg),
        peaks: Events::from_indices(peaks),
        bpm: SYNTHETIC_BPM,
    }
}

fn fallback_base(time: f64) -> f64 {
    (2.0 * PI * 1.2 * time).sin()
        + 0.3 * (2.0 * PI * 5.0 * time).sin()
        + 0.2 * (2.0 * PI * 0.5 * time).sin()
}
