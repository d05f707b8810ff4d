//! Progress reporting for a filtering pass
//!
//! Shows the percentage of records processed on standard output. On a
//! terminal this is an indicatif bar; when stdout is piped or redirected the
//! bar would be hidden, so plain `NN% processed` lines are written instead.
//! Tests and quiet runs use a hidden reporter.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, IsTerminal, Write};
use tracing::debug;

enum Output {
    Hidden,
    Bar(ProgressBar),
    Plain {
        writer: Box<dyn Write>,
        last_percent: Option<usize>,
    },
}

/// Progress reporter for a record pass
pub struct ProgressReporter {
    output: Output,
    total_records: usize,
    processed: usize,
}

impl ProgressReporter {
    fn with_output(output: Output) -> Self {
        Self {
            output,
            total_records: 0,
            processed: 0,
        }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self::with_output(Output::Hidden)
    }

    /// Reporter for standard output: a bar on a terminal, percentage lines otherwise
    pub fn stdout() -> Self {
        if !io::stdout().is_terminal() {
            return Self::plain(io::stdout());
        }

        let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{percent:>3}% processed [{bar:40.cyan/blue}] {pos}/{len} records ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  "),
        );

        Self::with_output(Output::Bar(pb))
    }

    /// Reporter writing a `NN% processed` line each time the percentage changes
    pub fn plain(writer: impl Write + 'static) -> Self {
        Self::with_output(Output::Plain {
            writer: Box::new(writer),
            last_percent: None,
        })
    }

    /// Set the number of records the pass will visit
    pub fn setup_progress(&mut self, total_records: usize) {
        self.total_records = total_records;
        self.processed = 0;
        match &mut self.output {
            Output::Bar(pb) => {
                pb.set_length(total_records as u64);
                pb.set_position(0);
            }
            Output::Plain { last_percent, .. } => *last_percent = None,
            Output::Hidden => {}
        }
        debug!("Progress initialized for {} records", total_records);
    }

    /// Record that one more record has been processed
    pub fn increment(&mut self) {
        self.processed += 1;
        let percent = self.percent_before_current();

        match &mut self.output {
            Output::Bar(pb) => pb.inc(1),
            Output::Plain {
                writer,
                last_percent,
            } => {
                if *last_percent != Some(percent) {
                    *last_percent = Some(percent);
                    // Progress output is best effort
                    let _ = writeln!(writer, "{percent:>3}% processed");
                }
            }
            Output::Hidden => {}
        }
    }

    /// Show the running invalidation count next to the bar
    pub fn set_invalidated(&self, invalidated: usize) {
        if let Output::Bar(pb) = &self.output {
            pb.set_message(format!("{invalidated} invalidated"));
        }
    }

    /// Clear the bar once the pass completes
    pub fn finish(&mut self) {
        match &mut self.output {
            Output::Bar(pb) => pb.finish_and_clear(),
            Output::Plain { writer, .. } => {
                let _ = writer.flush();
            }
            Output::Hidden => {}
        }
    }

    /// Leave the bar in place with a failure message
    pub fn finish_with_error(&mut self, error_message: &str) {
        match &mut self.output {
            Output::Bar(pb) => pb.abandon_with_message(format!("Failed: {error_message}")),
            Output::Plain { writer, .. } => {
                let _ = writer.flush();
            }
            Output::Hidden => return,
        }
        debug!("Progress reporting finished with error: {}", error_message);
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.output, Output::Hidden)
    }

    /// Share of records visited before the latest one, rounded to a whole percent
    fn percent_before_current(&self) -> usize {
        if self.total_records == 0 {
            return 0;
        }
        let done = self.processed.saturating_sub(1) as f64;
        ((done / self.total_records as f64) * 100.0).round() as usize
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::hidden()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Output::Bar(pb) = &self.output {
            if !pb.is_finished() {
                pb.finish_and_clear();
            }
        }
    }
}
