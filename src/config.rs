use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where metrics records are written and how they are named.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default)]
    pub pretty: bool,
}

fn default_extension() -> String {
    "json".to_string()
}

impl OutputConfig {
    /// Maps an input recording to its output file.
    ///
    /// The directory part of `input` is dropped and the file name is cut at its
    /// first `.`, so `data/test_data7.csv` becomes `<dir>/test_data7.json`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = match name.split('.').next() {
            Some(s) if !s.is_empty() => s,
            _ => name.as_str(),
        };
        self.dir.join(format!("{}.{}", stem, self.extension))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    /// `EnvFilter` directive, e.g. `info` or `ecg_analysis=debug`.
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_echo_stderr")]
    pub echo_stderr: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_echo_stderr() -> bool {
    true
}

impl LoggingConfig {
    /// Log file for one recording: `<dir>/<input file name>.log`.
    pub fn log_path(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ecg_analysis".to_string());
        self.dir.join(format!("{}.log", name))
    }
}

/// External beat detector invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub detector: DetectorConfig,
}

impl AppConfig {
    pub fn load_default() -> anyhow::Result<Self> {
        let default = include_str!("../config/default.toml");
        let cfg: AppConfig = toml::from_str(default)?;
        Ok(cfg)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let p = path.into();
        let s = fs::read_to_string(&p)?;
        let cfg: AppConfig = toml::from_str(&s)?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_default() {
        let cfg = AppConfig::load_default().unwrap();
        assert_eq!(cfg.output.extension, "json");
        assert!(!cfg.output.pretty);
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.detector.command.is_empty());
    }

    #[test]
    fn test_load_from_applies_defaults() -> anyhow::Result<()> {
        let tmpdir = TempDir::new()?;
        let path = tmpdir.path().join("ecg.toml");
        fs::write(
            &path,
            r#"
[output]
dir = "out"

[logging]
dir = "logs"

[detector]
command = "detect-qrs"
"#,
        )?;

        let cfg = AppConfig::load_from(&path)?;
        assert_eq!(cfg.output.dir, PathBuf::from("out"));
        assert_eq!(cfg.output.extension, "json");
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.echo_stderr);
        assert_eq!(cfg.detector.command, "detect-qrs");
        assert!(cfg.detector.args.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_from_missing_file() {
        assert!(AppConfig::load_from("/nonexistent/ecg.toml").is_err());
    }

    #[test]
    fn test_output_path() {
        let out = OutputConfig {
            dir: PathBuf::from("results"),
            extension: "json".to_string(),
            pretty: false,
        };
        assert_eq!(
            out.output_path(Path::new("test_data/test_data7.csv")),
            PathBuf::from("results/test_data7.json")
        );
        assert_eq!(
            out.output_path(Path::new("strip.2024.csv")),
            PathBuf::from("results/strip.json")
        );
        assert_eq!(
            out.output_path(Path::new("noext")),
            PathBuf::from("results/noext.json")
        );
    }

    #[test]
    fn test_log_path() {
        let logging = LoggingConfig {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
            echo_stderr: false,
        };
        assert_eq!(
            logging.log_path(Path::new("test_data/test_data7.csv")),
            PathBuf::from("logs/test_data7.csv.log")
        );
    }
}
