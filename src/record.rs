use serde::{Deserialize, Serialize};
use tracing::info;

/// Key metrics of one ECG strip, as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Seconds between the first and last sample.
    pub duration: f64,
    /// `(min, max)` voltage in mV.
    pub voltage_extremes: (f64, f64),
    pub num_beats: usize,
    pub mean_hr_bpm: i64,
    /// Beat timestamps in seconds.
    pub beats: Vec<f64>,
}

/// Packages already-computed metrics into a [`MetricsRecord`].
pub fn create_record(
    duration: f64,
    extremes: (f64, f64),
    num_beats: usize,
    mean_hr_bpm: i64,
    beat_times: Vec<f64>,
) -> MetricsRecord {
    info!("assigning metrics record entries");
    MetricsRecord {
        duration,
        voltage_extremes: extremes,
        num_beats,
        mean_hr_bpm,
        beats: beat_times,
    }
}
