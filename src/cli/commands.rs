//! Command implementation for the CZMIL noise filter CLI
//!
//! Opens the point file for update and its waveform file read-only, runs one
//! filtering pass, and reports the result on the console.

use crate::cli::args::Args;
use crate::config::FilterConfig;
use crate::processor::{FilterDriver, ProgressReporter, RunStats};
use crate::store::{OpenMode, PointFile, WaveformFile};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("czmil_noise_filter={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the filter over the file pair named by `args`
pub fn run(args: &Args, config: FilterConfig) -> Result<RunStats> {
    let point_path = args.point_path()?;
    let waveform_path = args.waveform_path()?;

    let progress = if args.show_progress() {
        ProgressReporter::stdout()
    } else {
        ProgressReporter::hidden()
    };

    let stats = filter_files(point_path, &waveform_path, config, progress)?;

    println!("100% processed, {} invalidated", stats.returns_invalidated);
    info!(
        "Processed {} in {}ms: {}",
        point_path.display(),
        stats.processing_time_ms,
        stats.summary()
    );

    Ok(stats)
}

/// Filter one point/waveform file pair in place
pub fn filter_files(
    point_path: &Path,
    waveform_path: &Path,
    config: FilterConfig,
    progress: ProgressReporter,
) -> Result<RunStats> {
    let mut points = PointFile::open(point_path, OpenMode::Update)
        .with_context(|| format!("Failed to open point file {}", point_path.display()))?;
    let mut waveforms = WaveformFile::open(waveform_path)
        .with_context(|| format!("Failed to open waveform file {}", waveform_path.display()))?;

    if progress.is_enabled() {
        eprintln!("\n{} {}\n", "File :".bold(), point_path.display().to_string().cyan());
    }

    let mut driver = FilterDriver::new(config).with_progress(progress);
    let stats = driver
        .run(&mut points, &mut waveforms)
        .with_context(|| format!("Filtering {} failed", point_path.display()))?;

    points
        .close()
        .with_context(|| format!("Failed to close point file {}", point_path.display()))?;

    Ok(stats)
}
