//! Single-lead ECG strip analysis.
//!
//! Reads a `time,voltage` strip, drops malformed rows, and derives duration,
//! voltage extremes, beat count, mean heart rate and beat times. Beat detection
//! itself is delegated to an external routine behind [`detector::BeatDetector`].

pub mod analysis;
pub mod config;
pub mod detector;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod parser;
pub mod record;
pub mod storage;

pub use error::AnalysisError;
