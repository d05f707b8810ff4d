//! Filter driver for a whole point/waveform file pair.
//!
//! Visits every record in index order, filters each enabled channel, and
//! writes back only the records whose statuses changed. The first read or
//! write failure ends the pass; records updated before it stay updated.

pub mod progress;

#[cfg(test)]
pub mod tests;

pub use progress::ProgressReporter;

use crate::config::FilterConfig;
use crate::error::Result;
use crate::filter::filter_record;
use crate::store::{PointStore, WaveformStore};

use std::time::Instant;
use tracing::{debug, info, warn};

/// Totals for one filtering pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Records visited
    pub records_processed: usize,
    /// Records written back
    pub records_updated: usize,
    /// Returns newly invalidated by either test
    pub returns_invalidated: usize,
    /// Of which by the noise detector
    pub noise_invalidated: usize,
    /// Of which by the amplitude gate
    pub amplitude_invalidated: usize,
    /// Stale digitizer-noise invalidations cleared before re-evaluation
    pub noise_resets: usize,
    pub processing_time_ms: u128,
}

impl RunStats {
    /// Change in the number of filter-invalid returns over the pass
    ///
    /// Noise invalidations are reset and re-applied on every noise-enabled
    /// pass, so a repeated run counts them again in `returns_invalidated`
    /// while this stays at zero.
    pub fn net_invalidated(&self) -> i64 {
        self.returns_invalidated as i64 - self.noise_resets as i64
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        format!(
            "{} records, {} updated | {} invalidated ({} digitizer noise, {} start amplitude) | {} noise flags reset",
            self.records_processed,
            self.records_updated,
            self.returns_invalidated,
            self.noise_invalidated,
            self.amplitude_invalidated,
            self.noise_resets
        )
    }
}

/// Runs the filter over every record of a store pair
pub struct FilterDriver {
    config: FilterConfig,
    progress: ProgressReporter,
}

impl FilterDriver {
    /// Create a driver with no progress output
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            progress: ProgressReporter::hidden(),
        }
    }

    /// Report progress through the given reporter
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Filter every record and persist the changed ones
    ///
    /// # Returns
    ///
    /// Totals for the pass; `returns_invalidated` is the number of returns
    /// newly invalidated
    pub fn run<P, W>(&mut self, points: &mut P, waveforms: &mut W) -> Result<RunStats>
    where
        P: PointStore + ?Sized,
        W: WaveformStore + ?Sized,
    {
        let result = self.run_pass(points, waveforms);
        match &result {
            Ok(_) => self.progress.finish(),
            Err(e) => self.progress.finish_with_error(&e.to_string()),
        }
        result
    }

    fn run_pass<P, W>(&mut self, points: &mut P, waveforms: &mut W) -> Result<RunStats>
    where
        P: PointStore + ?Sized,
        W: WaveformStore + ?Sized,
    {
        let start_time = Instant::now();
        let total = points.record_count();

        if waveforms.record_count() != total {
            warn!(
                "Point file holds {} records but waveform file holds {}",
                total,
                waveforms.record_count()
            );
        }

        info!("Filtering {} records: {}", total, self.config.summary());
        self.progress.setup_progress(total);

        let mut stats = RunStats::default();

        for index in 0..total {
            let mut record = points.read_point_record(index)?;
            let waveform = waveforms.read_waveform_record(index)?;

            let outcome = filter_record(&mut record, &waveform, &self.config)?;

            if outcome.changed {
                points.update_point_record(index, &record)?;
                stats.records_updated += 1;
                debug!(
                    "Record {}: {} invalidated, {} noise flags reset",
                    index,
                    outcome.invalidated(),
                    outcome.noise_resets
                );
            }

            stats.records_processed += 1;
            stats.returns_invalidated += outcome.invalidated();
            stats.noise_invalidated += outcome.noise_invalidated;
            stats.amplitude_invalidated += outcome.amplitude_invalidated;
            stats.noise_resets += outcome.noise_resets;

            self.progress.increment();
            if outcome.invalidated() > 0 {
                self.progress.set_invalidated(stats.returns_invalidated);
            }
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!("Filtering complete: {}", stats.summary());
        Ok(stats)
    }
}

/// Filter a store pair with a hidden progress reporter
///
/// Returns the number of returns newly invalidated.
pub fn run<P, W>(points: &mut P, waveforms: &mut W, config: &FilterConfig) -> Result<usize>
where
    P: PointStore + ?Sized,
    W: WaveformStore + ?Sized,
{
    let stats = FilterDriver::new(config.clone()).run(points, waveforms)?;
    Ok(stats.returns_invalidated)
}
