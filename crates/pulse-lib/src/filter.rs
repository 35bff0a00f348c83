//! Signal conditioning: DC removal, Butterworth band-pass and zero-phase
//! application, min-max scaling.

use crate::error::{AnalysisError, Result};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Transfer function coefficients, `a[0] == 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}

impl TransferFunction {
    fn order_len(&self) -> usize {
        self.b.len().max(self.a.len())
    }

    /// Edge padding used by [`filtfilt`].
    pub fn padlen(&self) -> usize {
        3 * self.order_len()
    }
}

/// Subtract the arithmetic mean.
pub fn remove_mean(data: &[f64]) -> Vec<f64> {
    if data.is_empty() {
        return Vec::new();
    }
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    data.iter().map(|x| x - mean).collect()
}

/// Scale into `[0, 1]`. `None` when the data has no spread.
pub fn min_max_normalize(data: &[f64]) -> Option<Vec<f64>> {
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return None;
    }
    Some(data.iter().map(|x| (x - min) / range).collect())
}

/// Digital Butterworth band-pass for the given cutoffs in Hz.
///
/// The analog prototype is shifted to a band-pass and mapped to the z-plane
/// with a pre-warped bilinear transform.
pub fn butter_bandpass(
    order: usize,
    low_hz: f64,
    high_hz: f64,
    fs: f64,
) -> Result<TransferFunction> {
    if order == 0 {
        return Err(AnalysisError::FilterDesign("order must be > 0".into()));
    }
    if !fs.is_finite() || fs <= 0.0 {
        return Err(AnalysisError::FilterDesign(format!(
            "sampling rate must be positive, got {}",
            fs
        )));
    }
    let nyquist = fs / 2.0;
    let (w1, w2) = (low_hz / nyquist, high_hz / nyquist);
    if !(w1 > 0.0 && w1 < w2 && w2 < 1.0) {
        return Err(AnalysisError::FilterDesign(format!(
            "cutoffs {}..{} Hz must satisfy 0 < low < high < {} Hz",
            low_hz, high_hz, nyquist
        )));
    }

    // Pre-warp on the normalised (fs = 2) scale.
    let fs_design = 2.0;
    let warp = |w: f64| 2.0 * fs_design * (PI * w / fs_design).tan();
    let (wl, wh) = (warp(w1), warp(w2));
    let bw = wh - wl;
    let wo = (wl * wh).sqrt();

    let (zeros, poles, gain) = lp_to_bp(&butter_prototype(order), bw, wo);
    let (zeros, poles, gain) = bilinear(&zeros, &poles, gain, fs_design);

    let b: Vec<f64> = poly(&zeros).iter().map(|c| c.re * gain).collect();
    let a: Vec<f64> = poly(&poles).iter().map(|c| c.re).collect();
    Ok(TransferFunction { b, a })
}

/// Unit-cutoff analog Butterworth poles, left half-plane.
fn butter_prototype(order: usize) -> Vec<Complex64> {
    let n = order as i64;
    (0..order as i64)
        .map(|k| {
            let m = (-n + 1 + 2 * k) as f64;
            -Complex64::from_polar(1.0, PI * m / (2.0 * n as f64))
        })
        .collect()
}

/// Low-pass prototype (no finite zeros, unit gain) to band-pass.
fn lp_to_bp(poles: &[Complex64], bw: f64, wo: f64) -> (Vec<Complex64>, Vec<Complex64>, f64) {
    let wo2 = Complex64::new(wo * wo, 0.0);
    let mut bp_poles = Vec::with_capacity(poles.len() * 2);
    for &p in poles {
        let scaled = p * (bw / 2.0);
        let root = (scaled * scaled - wo2).sqrt();
        bp_poles.push(scaled + root);
        bp_poles.push(scaled - root);
    }
    let zeros = vec![Complex64::new(0.0, 0.0); poles.len()];
    let gain = bw.powi(poles.len() as i32);
    (zeros, bp_poles, gain)
}

fn bilinear(
    zeros: &[Complex64],
    poles: &[Complex64],
    gain: f64,
    fs: f64,
) -> (Vec<Complex64>, Vec<Complex64>, f64) {
    let fs2 = Complex64::new(2.0 * fs, 0.0);
    let mut z: Vec<Complex64> = zeros.iter().map(|&s| (fs2 + s) / (fs2 - s)).collect();
    let p: Vec<Complex64> = poles.iter().map(|&s| (fs2 + s) / (fs2 - s)).collect();
    // Zeros at infinity land on Nyquist.
    z.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(poles.len() - zeros.len()));
    let num: Complex64 = zeros.iter().map(|&s| fs2 - s).product();
    let den: Complex64 = poles.iter().map(|&s| fs2 - s).product();
    (z, p, gain * (num / den).re)
}

/// Monic polynomial coefficients (highest power first) with the given roots.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        let mut next = coeffs.clone();
        next.push(Complex64::new(0.0, 0.0));
        for i in 1..next.len() {
            next[i] -= r * coeffs[i - 1];
        }
        coeffs = next;
    }
    coeffs
}

/// Direct form II transposed filter with optional initial state.
pub fn lfilter(tf: &TransferFunction, data: &[f64], zi: Option<&[f64]>) -> Vec<f64> {
    let n = tf.order_len();
    let mut b = tf.b.clone();
    let mut a = tf.a.clone();
    b.resize(n, 0.0);
    a.resize(n, 0.0);
    let state_len = n.saturating_sub(1);
    let mut z = match zi {
        Some(init) if init.len() == state_len => init.to_vec(),
        _ => vec![0.0; state_len],
    };
    let mut out = Vec::with_capacity(data.len());
    for &x in data {
        let y = b[0] * x + z.first().copied().unwrap_or(0.0);
        for i in 0..state_len {
            let next = if i + 1 < state_len { z[i + 1] } else { 0.0 };
            z[i] = b[i + 1] * x - a[i + 1] * y + next;
        }
        out.push(y);
    }
    out
}

/// Initial state matching the steady-state response to a unit step.
pub fn lfilter_zi(tf: &TransferFunction) -> Result<Vec<f64>> {
    let n = tf.order_len();
    let mut b = tf.b.clone();
    let mut a = tf.a.clone();
    b.resize(n, 0.0);
    a.resize(n, 0.0);
    let a_sum: f64 = a.iter().sum();
    if a_sum.abs() < 1e-300 {
        return Err(AnalysisError::FilterDesign("filter has a pole at z = 1".into()));
    }
    let y_ss = b.iter().sum::<f64>() / a_sum;
    let zi = (0..n.saturating_sub(1))
        .map(|k| (k + 1..n).map(|j| b[j] - a[j] * y_ss).sum::<f64>())
        .collect();
    Ok(zi)
}

/// Zero-phase forward-backward filtering with odd extension at both edges.
pub fn filtfilt(tf: &TransferFunction, data: &[f64]) -> Result<Vec<f64>> {
    let padlen = tf.padlen();
    let len = data.len();
    if len <= padlen {
        return Err(AnalysisError::SignalTooShort { len, padlen });
    }

    let first = data[0];
    let last = data[len - 1];
    let mut ext = Vec::with_capacity(len + 2 * padlen);
    ext.extend((1..=padlen).rev().map(|i| 2.0 * first - data[i]));
    ext.extend_from_slice(data);
    ext.extend((1..=padlen).map(|i| 2.0 * last - data[len - 1 - i]));

    let zi = lfilter_zi(tf)?;
    let scaled = |x0: f64| zi.iter().map(|z| z * x0).collect::<Vec<f64>>();

    let forward = lfilter(tf, &ext, Some(scaled(ext[0]).as_slice()));
    let mut reversed: Vec<f64> = forward.into_iter().rev().collect();
    let y0 = reversed[0];
    reversed = lfilter(tf, &reversed, Some(scaled(y0).as_slice()));
    reversed.reverse();

    Ok(reversed[padlen..padlen + len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, fs: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    fn rms(data: &[f64]) -> f64 {
        (data.iter().map(|x| x * x).sum::<f64>() / data.len() as f64).sqrt()
    }

    #[test]
    fn bandpass_has_expected_shape() {
        let tf = butter_bandpass(3, 0.5, 40.0, 250.0).unwrap();
        assert_eq!(tf.b.len(), 7);
        assert_eq!(tf.a.len(), 7);
        assert!((tf.a[0] - 1.0).abs() < 1e-12);
        // Zeros at DC and Nyquist.
        assert!(tf.b.iter().sum::<f64>().abs() < 1e-9);
        let alt: f64 = tf
            .b
            .iter()
            .enumerate()
            .map(|(i, c)| if i % 2 == 0 { *c } else { -c })
            .sum();
        assert!(alt.abs() < 1e-9);
    }

    #[test]
    fn bandpass_rejects_cutoff_above_nyquist() {
        assert!(butter_bandpass(3, 0.5, 40.0, 60.0).is_err());
        assert!(butter_bandpass(3, 0.5, 40.0, -1.0).is_err());
        assert!(butter_bandpass(3, 0.5, 40.0, f64::INFINITY).is_err());
        assert!(butter_bandpass(0, 0.5, 40.0, 250.0).is_err());
    }

    #[test]
    fn filtfilt_passes_in_band_tone_without_shift() {
        let fs = 250.0;
        let x = sine(5.0, fs, 2500);
        let tf = butter_bandpass(3, 0.5, 40.0, fs).unwrap();
        let y = filtfilt(&tf, &x).unwrap();
        assert_eq!(y.len(), x.len());
        let mid = &y[500..2000];
        let err = mid
            .iter()
            .zip(&x[500..2000])
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        assert!(err < 0.02, "in-band distortion {}", err);
    }

    #[test]
    fn filtfilt_suppresses_out_of_band_components() {
        let fs = 250.0;
        let drift: Vec<f64> = sine(0.05, fs, 5000);
        let hum = sine(100.0, fs, 5000);
        let tf = butter_bandpass(3, 0.5, 40.0, fs).unwrap();
        let drift_out = filtfilt(&tf, &drift).unwrap();
        let hum_out = filtfilt(&tf, &hum).unwrap();
        assert!(rms(&drift_out[1000..4000]) < 0.05 * rms(&drift));
        assert!(rms(&hum_out[1000..4000]) < 0.05 * rms(&hum));
    }

    #[test]
    fn filtfilt_requires_more_than_padlen_samples() {
        let tf = butter_bandpass(3, 0.5, 40.0, 250.0).unwrap();
        assert_eq!(tf.padlen(), 21);
        assert!(matches!(
            filtfilt(&tf, &[0.0; 21]),
            Err(AnalysisError::SignalTooShort { len: 21, padlen: 21 })
        ));
        assert!(filtfilt(&tf, &[0.0; 22]).is_ok());
    }

    #[test]
    fn lfilter_zi_removes_step_transient() {
        let tf = TransferFunction {
            b: vec![0.2, 0.2],
            a: vec![1.0, -0.6],
        };
        let zi: Vec<f64> = lfilter_zi(&tf).unwrap().iter().map(|z| z * 3.0).collect();
        let y = lfilter(&tf, &[3.0; 10], Some(zi.as_slice()));
        for v in y {
            assert!((v - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn normalize_and_mean_removal() {
        assert_eq!(remove_mean(&[1.0, 2.0, 3.0]), vec![-1.0, 0.0, 1.0]);
        assert_eq!(
            min_max_normalize(&[2.0, 4.0, 3.0]).unwrap(),
            vec![0.0, 1.0, 0.5]
        );
        assert!(min_max_normalize(&[1.5; 4]).is_none());
        assert!(min_max_normalize(&[]).is_none());
    }
}
