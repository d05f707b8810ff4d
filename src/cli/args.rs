//! Command-line argument definitions for the CZMIL noise filter
//!
//! Single-letter flags select channels and thresholds; the only positional
//! argument is the point file to update in place.

use crate::config::FilterConfig;
use crate::constants::{POINT_EXTENSION, WAVEFORM_EXTENSION};
use crate::models::Channel;
use crate::{FilterError, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

/// CLI arguments for the CZMIL noise filter
///
/// Invalidates returns whose waveform shows digitizer noise or whose starting
/// amplitude exceeds a ceiling. The waveform file is found next to the point
/// file with the `.cwf` extension.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "czmil_noise_filter",
    version,
    about = "Flag CZMIL returns caused by digitizer noise or excessive starting amplitude",
    override_usage = "czmil_noise_filter [-1] [-2] [-3] [-4] [-5] [-6] [-7] [-9] [-a THRESHOLD] [-s SHAL_AMP] [-d DEEP_AMP] CZMIL_CPF_FILENAME"
)]
pub struct Args {
    /// Filter channel 1
    #[arg(short = '1')]
    pub channel_1: bool,

    /// Filter channel 2
    #[arg(short = '2')]
    pub channel_2: bool,

    /// Filter channel 3
    #[arg(short = '3')]
    pub channel_3: bool,

    /// Filter channel 4
    #[arg(short = '4')]
    pub channel_4: bool,

    /// Filter channel 5
    #[arg(short = '5')]
    pub channel_5: bool,

    /// Filter channel 6
    #[arg(short = '6')]
    pub channel_6: bool,

    /// Filter channel 7
    #[arg(short = '7')]
    pub channel_7: bool,

    /// Filter channel 9 (deep)
    #[arg(short = '9')]
    pub channel_9: bool,

    /// Waveform amplitude second difference change threshold
    ///
    /// Zero or below leaves the noise filter disabled.
    #[arg(
        short = 'a',
        value_name = "THRESHOLD",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub threshold: i32,

    /// Shallow channel starting amplitude threshold
    ///
    /// Zero or below leaves the shallow amplitude filter disabled.
    #[arg(
        short = 's',
        value_name = "SHAL_AMP",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub shal_amp: i32,

    /// Deep channel starting amplitude threshold
    ///
    /// Zero or below leaves the deep amplitude filter disabled.
    #[arg(
        short = 'd',
        value_name = "DEEP_AMP",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub deep_amp: i32,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress progress output and all logging below errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// CZMIL point file to filter in place
    #[arg(value_name = "CZMIL_CPF_FILENAME")]
    pub cpf_file: Option<PathBuf>,
}

impl Args {
    /// Channels selected by the numbered flags
    pub fn selected_channels(&self) -> Vec<Channel> {
        let flags = [
            (self.channel_1, Channel::Shallow1),
            (self.channel_2, Channel::Shallow2),
            (self.channel_3, Channel::Shallow3),
            (self.channel_4, Channel::Shallow4),
            (self.channel_5, Channel::Shallow5),
            (self.channel_6, Channel::Shallow6),
            (self.channel_7, Channel::Shallow7),
            (self.channel_9, Channel::Deep),
        ];

        flags
            .into_iter()
            .filter_map(|(selected, channel)| selected.then_some(channel))
            .collect()
    }

    /// Build the filter configuration from the flags
    pub fn to_config(&self) -> FilterConfig {
        FilterConfig::new()
            .with_channels(self.selected_channels())
            .with_noise_threshold(self.threshold)
            .with_shallow_ceiling(self.shal_amp)
            .with_deep_ceiling(self.deep_amp)
    }

    /// Check the arguments describe a run that can do work
    ///
    /// Returns the validated configuration so callers never filter with an
    /// unchecked one.
    pub fn validate(&self) -> Result<FilterConfig> {
        let config = self.to_config();
        config.validate()?;

        let path = self.point_path()?;
        let has_point_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == POINT_EXTENSION);
        if !has_point_extension {
            return Err(FilterError::usage(format!(
                "{} is not a .{} file",
                path.display(),
                POINT_EXTENSION
            )));
        }

        Ok(config)
    }

    /// The point file named on the command line
    pub fn point_path(&self) -> Result<&Path> {
        self.cpf_file
            .as_deref()
            .ok_or_else(|| FilterError::usage("CZMIL_CPF_FILENAME is required"))
    }

    /// The waveform file paired with the point file
    pub fn waveform_path(&self) -> Result<PathBuf> {
        Ok(waveform_path_for(self.point_path()?))
    }

    /// Get the log level string based on verbosity
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show the progress bar (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Waveform path for a point path: same name, `.cwf` extension
pub fn waveform_path_for(point_path: &Path) -> PathBuf {
    point_path.with_extension(WAVEFORM_EXTENSION)
}
