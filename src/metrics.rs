//! Summary metrics over a cleaned ECG strip.
//!
//! Each function is independent and works on the aligned `time`/`voltage`
//! series produced by the parser. Only [`num_beats`] reaches outside the
//! crate, through the injected [`BeatDetector`].

use crate::detector::BeatDetector;
use crate::error::AnalysisError;
use tracing::{debug, info};

/// Time span of the strip in seconds: last timestamp minus first.
pub fn duration(time: &[f64]) -> Result<f64, AnalysisError> {
    info!("calculating time span of ECG trace");
    match (time.first(), time.last()) {
        (Some(first), Some(last)) => Ok(last - first),
        _ => Err(AnalysisError::EmptySeries {
            operation: "duration",
        }),
    }
}

/// Minimum and maximum voltage, in that order.
pub fn voltage_extremes(voltage: &[f64]) -> Result<(f64, f64), AnalysisError> {
    info!("identifying voltage extremes of ECG trace");
    let (&first, rest) = voltage.split_first().ok_or(AnalysisError::EmptySeries {
        operation: "voltage_extremes",
    })?;
    Ok(rest
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))))
}

/// Sampling frequency in Hz, derived from the first two timestamps.
///
/// The strip is assumed to be uniformly sampled.
pub fn sampling_frequency(time: &[f64]) -> Result<f64, AnalysisError> {
    if time.len() < 2 {
        return Err(AnalysisError::TooFewSamples {
            operation: "sampling_frequency",
            required: 2,
            actual: time.len(),
        });
    }
    let interval = time[1] - time[0];
    if interval <= 0.0 {
        return Err(AnalysisError::InvalidSamplingInterval { interval });
    }
    Ok(1.0 / interval)
}

/// Runs the beat detector once and returns the beat count and peak indices.
pub fn num_beats(
    time: &[f64],
    voltage: &[f64],
    detector: &dyn BeatDetector,
) -> Result<(usize, Vec<usize>), AnalysisError> {
    info!("calculating number of beats in ECG trace");
    let fs = sampling_frequency(time)?;
    debug!(sampling_frequency = fs, samples = voltage.len(), "running beat detector");

    let peaks = detector.detect(voltage, fs)?;
    if let Some(&bad) = peaks.iter().find(|&&i| i >= voltage.len()) {
        return Err(AnalysisError::detector(format!(
            "peak index {} out of range for {} samples",
            bad,
            voltage.len()
        )));
    }
    Ok((peaks.len(), peaks))
}

/// Mean heart rate in beats per minute, rounded half to even.
pub fn mean_hr_bpm(num_beats: usize, duration_s: f64) -> Result<i64, AnalysisError> {
    info!("calculating mean HR of ECG trace");
    if duration_s == 0.0 {
        return Err(AnalysisError::ZeroDuration);
    }
    let minutes = duration_s / 60.0;
    Ok((num_beats as f64 / minutes).round_ties_even() as i64)
}

/// Timestamps of the detected beats, in the order of `peak_indices`.
pub fn beats(peak_indices: &[usize], time: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    info!("identifying time of beats in ECG trace");
    peak_indices
        .iter()
        .map(|&i| {
            time.get(i).copied().ok_or(AnalysisError::PeakOutOfRange {
                index: i,
                len: time.len(),
            })
        })
        .collect()
}
