use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{error, info, warn};

/// Voltages beyond +/- this many millivolts are flagged for review.
pub const VOLTAGE_LIMIT_MV: f64 = 300.0;

/// Why a row was left out of the recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// A field was missing or not a number.
    Unparseable,
    /// Both fields parsed but one of them is NaN or infinite.
    NotFinite,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Unparseable => write!(f, "value bad/missing"),
            RejectReason::NotFinite => write!(f, "value NaN"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based line number in the source text.
    pub line: usize,
    pub reason: RejectReason,
}

/// Cleaned samples of one ECG strip.
///
/// `time` and `voltage` are index-aligned and hold only finite values.
/// `high_voltages` lists every kept voltage whose magnitude exceeds
/// [`VOLTAGE_LIMIT_MV`]; those samples are still part of `time`/`voltage`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    pub time: Vec<f64>,
    pub voltage: Vec<f64>,
    pub high_voltages: Vec<f64>,
    pub rejected: Vec<RejectedRow>,
}

impl Recording {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Reads and cleans an ECG strip from disk.
pub fn read_data(path: &Path) -> Result<Recording, AnalysisError> {
    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
    let recording = parse_data(text.lines(), &path.display().to_string());
    info!(
        file = %path.display(),
        samples = recording.len(),
        rejected = recording.rejected.len(),
        "read ECG strip"
    );
    Ok(recording)
}

/// Parses raw rows into a [`Recording`].
///
/// Bad rows are skipped and logged one by one. Out-of-range voltages are
/// reported once, as a single warning naming `file`.
pub fn parse_data<I, S>(rows: I, file: &str) -> Recording
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut recording = Recording::default();

    for (idx, row) in rows.into_iter().enumerate() {
        let line = idx + 1;
        let (t, v) = match parse_row(row.as_ref()) {
            Some(pair) => pair,
            None => {
                reject(&mut recording, file, line, RejectReason::Unparseable);
                continue;
            }
        };
        if !t.is_finite() || !v.is_finite() {
            reject(&mut recording, file, line, RejectReason::NotFinite);
            continue;
        }

        recording.time.push(t);
        recording.voltage.push(v);
        if v > VOLTAGE_LIMIT_MV || v < -VOLTAGE_LIMIT_MV {
            recording.high_voltages.push(v);
        }
    }

    if !recording.high_voltages.is_empty() {
        warn!(
            file,
            high_voltages = ?recording.high_voltages,
            "voltages exceed +/- {} mV", VOLTAGE_LIMIT_MV
        );
    }
    recording
}

fn reject(recording: &mut Recording, file: &str, line: usize, reason: RejectReason) {
    error!(file, line, %reason, "skipping row");
    recording.rejected.push(RejectedRow { line, reason });
}

fn parse_row(row: &str) -> Option<(f64, f64)> {
    let (t, v) = extract_fields(row)?;
    Some((t.trim().parse().ok()?, v.trim().parse().ok()?))
}

/// Pulls the time and voltage fields out of one row.
///
/// The row is split on spaces and only the last token is kept; that token is
/// split on commas and its first two pieces are time and voltage. Anything in
/// front of the last space, and any comma piece after the second, is dropped.
pub fn extract_fields(row: &str) -> Option<(&str, &str)> {
    let token = row.split(' ').last()?;
    let mut fields = token.split(',');
    Some((fields.next()?, fields.next()?))
}
