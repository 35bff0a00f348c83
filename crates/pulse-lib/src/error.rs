use std::path::PathBuf;
use thiserror::Error;

/// Failures that can occur while turning a recording into a rate estimate.
///
/// None of these cross [`crate::analyze`]; they select which fallback signal
/// is returned instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input {0} does not exist")]
    MissingInput(PathBuf),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("filter design failed: {0}")]
    FilterDesign(String),
    #[error("signal too short for filtering: {len} samples, need more than {padlen}")]
    SignalTooShort { len: usize, padlen: usize },
}

impl AnalysisError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        AnalysisError::MalformedInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
