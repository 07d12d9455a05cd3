use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the analysis pipeline.
///
/// Row-level problems in the input never show up here; the parser drops and
/// logs those rows. Everything below is fatal for the recording being processed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An operation that needs at least one sample was handed an empty series.
    #[error("{operation}: series is empty")]
    EmptySeries { operation: &'static str },

    /// Not enough samples to derive a quantity.
    #[error("{operation}: need at least {required} samples, got {actual}")]
    TooFewSamples {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    /// The first two timestamps do not give a usable sampling interval.
    #[error("sampling interval must be positive, got {interval}")]
    InvalidSamplingInterval { interval: f64 },

    /// Heart rate is undefined over a zero-length strip.
    #[error("cannot compute heart rate over a zero duration")]
    ZeroDuration,

    /// A peak index does not address a sample.
    #[error("peak index {index} out of range for {len} samples")]
    PeakOutOfRange { index: usize, len: usize },

    /// The external beat detector failed or returned unusable output.
    #[error("beat detector failed: {reason}")]
    Detector { reason: String },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn detector(reason: impl Into<String>) -> Self {
        AnalysisError::Detector {
            reason: reason.into(),
        }
    }
}
