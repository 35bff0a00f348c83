pub mod analyzer;
pub mod config;
pub mod detectors;
pub mod error;
pub mod filter;
pub mod io;
pub mod metrics;
pub mod signal;
pub mod synth;

pub use analyzer::{analyze, analyze_with_config, Analysis, SignalSource};
pub use config::AnalyzerConfig;
pub use detectors::*;
pub use error::AnalysisError;
pub use metrics::*;
pub use signal::*;
