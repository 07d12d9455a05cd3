//! Beat detection port and its adapters.
//!
//! The QRS detection algorithm lives outside this crate. The metrics engine
//! only sees [`BeatDetector`]: hand it a voltage series and its sampling
//! frequency, get back the indices of the detected beats in scan order.

use crate::config::DetectorConfig;
use crate::error::AnalysisError;
use serde::Serialize;
use std::io::Write;
use std::process::{Command, Stdio};

/// Port for the external beat detection routine.
pub trait BeatDetector {
    /// Returns the indices into `voltage` at which beats were detected.
    fn detect(&self, voltage: &[f64], sampling_frequency: f64) -> Result<Vec<usize>, AnalysisError>;
}

impl<F> BeatDetector for F
where
    F: Fn(&[f64], f64) -> Result<Vec<usize>, AnalysisError>,
{
    fn detect(&self, voltage: &[f64], sampling_frequency: f64) -> Result<Vec<usize>, AnalysisError> {
        self(voltage, sampling_frequency)
    }
}

#[derive(Serialize)]
struct DetectRequest<'a> {
    sampling_frequency: f64,
    voltage: &'a [f64],
}

/// Detector that shells out to an external program.
///
/// The program receives `{"sampling_frequency": .., "voltage": [..]}` as JSON
/// on stdin and must print a JSON array of sample indices on stdout.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
}

impl CommandDetector {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_config(cfg: &DetectorConfig) -> Self {
        Self::new(cfg.command.clone()).with_args(cfg.args.iter().cloned())
    }

    fn describe(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BeatDetector for CommandDetector {
    fn detect(&self, voltage: &[f64], sampling_frequency: f64) -> Result<Vec<usize>, AnalysisError> {
        let request = serde_json::to_vec(&DetectRequest {
            sampling_frequency,
            voltage,
        })?;

        tracing::debug!(command = %self.describe(), samples = voltage.len(), "spawning beat detector");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AnalysisError::detector(format!("failed to run `{}`: {e}", self.describe()))
            })?;

        // stdin is fed concurrently: the child may fill stdout before it has read all input
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| AnalysisError::detector("child stdin was not captured"))?;
        let writer = std::thread::spawn(move || stdin.write_all(&request));

        let output = child
            .wait_with_output()
            .map_err(|e| AnalysisError::detector(format!("waiting on `{}`: {e}", self.describe())))?;

        match writer.join() {
            Ok(Ok(())) => {}
            // the child may exit without draining stdin; its exit status says more
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => {
                return Err(AnalysisError::detector(format!("writing detector input: {e}")));
            }
            Err(_) => return Err(AnalysisError::detector("detector input writer panicked")),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AnalysisError::detector(format!(
                "`{}` exited with {}: {}",
                self.describe(),
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| AnalysisError::detector(format!("unreadable detector output: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_detector() {
        let detector = |voltage: &[f64], fs: f64| -> Result<Vec<usize>, AnalysisError> {
            assert_eq!(fs, 250.0);
            Ok(voltage
                .iter()
                .enumerate()
                .filter(|(_, v)| **v > 1.0)
                .map(|(i, _)| i)
                .collect())
        };
        let peaks = detector.detect(&[0.0, 1.5, 0.2, 2.0], 250.0).unwrap();
        assert_eq!(peaks, vec![1, 3]);
    }

    #[test]
    fn test_missing_program() {
        let detector = CommandDetector::new("/nonexistent/ecg-detector");
        let err = detector.detect(&[0.0, 1.0], 100.0).unwrap_err();
        assert!(matches!(err, AnalysisError::Detector { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_detector_reads_indices() {
        let detector = CommandDetector::new("sh").with_args(["-c", "cat > /dev/null; echo '[2, 5, 9]'"]);
        let peaks = detector.detect(&[0.0; 12], 360.0).unwrap();
        assert_eq!(peaks, vec![2, 5, 9]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_detector_sees_request() {
        let detector = CommandDetector::new("sh").with_args([
            "-c",
            "grep -q '\"sampling_frequency\":125.0' && echo '[0]' || echo 'bad request' >&2; exit 0",
        ]);
        let peaks = detector.detect(&[1.0, 2.0], 125.0).unwrap();
        assert_eq!(peaks, vec![0]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_detector_failure_status() {
        let detector = CommandDetector::new("sh").with_args(["-c", "echo boom >&2; exit 3"]);
        let err = detector.detect(&[0.0, 1.0], 100.0).unwrap_err();
        match err {
            AnalysisError::Detector { reason } => assert!(reason.contains("boom")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_detector_garbage_output() {
        let detector = CommandDetector::new("sh").with_args(["-c", "cat > /dev/null; echo not-json"]);
        let err = detector.detect(&[0.0, 1.0], 100.0).unwrap_err();
        assert!(matches!(err, AnalysisError::Detector { .. }));
    }
}
