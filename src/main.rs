use anyhow::{Context, Result};
use clap::Parser;
use ecg_analysis::analysis::analyze;
use ecg_analysis::config::AppConfig;
use ecg_analysis::detector::CommandDetector;
use ecg_analysis::logging::RecordingLog;
use ecg_analysis::parser::read_data;
use ecg_analysis::record::MetricsRecord;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Summarises a single-lead ECG strip into a JSON metrics record.
#[derive(Parser, Debug)]
#[command(name = "ecg_analysis", version, about, long_about = None)]
struct Args {
    /// ECG strip: one `time,voltage` sample per line.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// TOML configuration file. The embedded defaults are used otherwise.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the output directory from the config.
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Override the log directory from the config.
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Override the beat detector program from the config.
    #[arg(long, value_name = "PROGRAM")]
    detector_cmd: Option<String>,

    /// Also print the metrics record to stdout.
    #[arg(long, default_value_t = false)]
    print: bool,
}

fn run(input: &Path, config: &AppConfig) -> Result<MetricsRecord> {
    let recording = read_data(input)?;
    if !recording.rejected.is_empty() {
        info!(rejected = recording.rejected.len(), "dropped malformed rows");
    }

    let detector = CommandDetector::from_config(&config.detector);
    let metrics = analyze(
        &recording.time,
        &recording.voltage,
        input,
        &detector,
        &config.output,
    )
    .with_context(|| format!("analyzing {}", input.display()))?;
    Ok(metrics)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::load_default()?,
    };
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }
    if let Some(dir) = args.log_dir {
        config.logging.dir = dir;
    }
    if let Some(cmd) = args.detector_cmd {
        config.detector.command = cmd;
        config.detector.args.clear();
    }

    let log = RecordingLog::open(&config.logging, &args.input)?;
    let metrics = log.in_scope(|| {
        info!(file = %args.input.display(), log = %log.path().display(), "starting ecg_analysis");
        let result = run(&args.input, &config);
        if let Err(e) = &result {
            error!("analysis failed: {:#}", e);
        }
        result
    })?;

    if args.print {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    }
    Ok(())
}
