use crate::config::OutputConfig;
use crate::detector::BeatDetector;
use crate::error::AnalysisError;
use crate::metrics::{beats, duration, mean_hr_bpm, num_beats, voltage_extremes};
use crate::record::{create_record, MetricsRecord};
use crate::storage::save_json;
use std::path::Path;
use tracing::info;

/// Computes the metrics record for one cleaned strip and writes it to disk.
///
/// The output file is derived from `file` through `output`. Nothing is written
/// unless every metric was computed.
pub fn analyze(
    time: &[f64],
    voltage: &[f64],
    file: &Path,
    detector: &dyn BeatDetector,
    output: &OutputConfig,
) -> Result<MetricsRecord, AnalysisError> {
    info!(file = %file.display(), "starting analysis of new ECG trace");
    let timespan = duration(time)?;
    let extremes = voltage_extremes(voltage)?;
    let (numbeats, peaks) = num_beats(time, voltage, detector)?;
    let mean_hr = mean_hr_bpm(numbeats, timespan)?;
    let beat_times = beats(&peaks, time)?;
    let metrics = create_record(timespan, extremes, numbeats, mean_hr, beat_times);

    let out_path = output.output_path(file);
    save_json(&metrics, &out_path, output.pretty)?;
    info!(
        path = %out_path.display(),
        num_beats = metrics.num_beats,
        mean_hr_bpm = metrics.mean_hr_bpm,
        "analysis complete"
    );
    Ok(metrics)
}
