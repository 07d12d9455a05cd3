use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Dispatch;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Log sink for a single recording.
///
/// Nothing is installed globally: events only reach this sink while code runs
/// inside [`RecordingLog::in_scope`], so two recordings never share a log file
/// or filter.
pub struct RecordingLog {
    path: PathBuf,
    dispatch: Dispatch,
}

impl RecordingLog {
    /// Opens (and truncates) the log file for `input` under `cfg.dir`.
    pub fn open(cfg: &LoggingConfig, input: &Path) -> Result<Self> {
        let filter = EnvFilter::try_new(&cfg.level)
            .with_context(|| format!("invalid log level `{}`", cfg.level))?;

        std::fs::create_dir_all(&cfg.dir)
            .with_context(|| format!("creating log dir {}", cfg.dir.display()))?;
        let path = cfg.log_path(input);
        let file = File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;

        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file));
        let stderr_layer = cfg.echo_stderr.then(|| {
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
        });

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(stderr_layer);

        Ok(RecordingLog {
            path,
            dispatch: Dispatch::new(subscriber),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` with this sink as the current thread's subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
