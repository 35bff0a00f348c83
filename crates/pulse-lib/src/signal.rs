use serde::{Deserialize, Serialize};

/// Timestamped single-lead recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Sample times in seconds, strictly increasing
    pub timestamps: Vec<f64>,
    /// Amplitudes, one per timestamp
    pub amplitudes: Vec<f64>,
}

impl Signal {
    pub fn new(timestamps: Vec<f64>, amplitudes: Vec<f64>) -> Self {
        debug_assert_eq!(timestamps.len(), amplitudes.len());
        Self {
            timestamps,
            amplitudes,
        }
    }

    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Sampling rate implied by the first inter-sample delta.
    ///
    /// `None` when there are fewer than two samples.
    pub fn inferred_fs(&self) -> Option<f64> {
        match self.timestamps.as_slice() {
            [first, second, ..] => Some(1.0 / (second - first)),
            _ => None,
        }
    }

    /// Same time axis, new amplitudes.
    pub fn with_amplitudes(&self, amplitudes: Vec<f64>) -> Self {
        Self::new(self.timestamps.clone(), amplitudes)
    }
}

/// Evenly spaced points over `[start, stop]`, endpoint included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Point events on a timeline (e.g., R-peaks indices)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Events {
    pub indices: Vec<usize>,
}

impl Events {
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// RR intervals (seconds)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RRSeries {
    pub rr: Vec<f64>,
}

impl RRSeries {
    /// Intervals between consecutive events, measured on the real time axis.
    pub fn from_events(events: &Events, timestamps: &[f64]) -> Self {
        let rr = events
            .indices
            .windows(2)
            .filter_map(|w| Some(timestamps.get(w[1])? - timestamps.get(w[0])?))
            .collect();
        Self { rr }
    }

    pub fn mean(&self) -> Option<f64> {
        if self.rr.is_empty() {
            None
        } else {
            Some(self.rr.iter().sum::<f64>() / self.rr.len() as f64)
        }
    }

    /// Population standard deviation of the intervals.
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let var = self.rr.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / self.rr.len() as f64;
        Some(var.sqrt())
    }
}
