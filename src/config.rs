//! Filter configuration and validation.
//!
//! A configuration names the channels to filter and three independent
//! thresholds. A threshold of zero or below disables its test.

use crate::error::{FilterError, Result};
use crate::models::{CeilingClass, Channel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Settings for one filtering run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Channels to evaluate; empty makes the run a no-op
    pub channels: BTreeSet<Channel>,

    /// Second-difference threshold for digitizer noise detection
    pub noise_threshold: i32,

    /// Starting amplitude ceiling for shallow channels
    pub shallow_ceiling: i32,

    /// Starting amplitude ceiling for the deep channel
    pub deep_ceiling: i32,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable a channel
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.insert(channel);
        self
    }

    /// Enable several channels
    pub fn with_channels(mut self, channels: impl IntoIterator<Item = Channel>) -> Self {
        self.channels.extend(channels);
        self
    }

    pub fn with_noise_threshold(mut self, threshold: i32) -> Self {
        self.noise_threshold = threshold;
        self
    }

    pub fn with_shallow_ceiling(mut self, ceiling: i32) -> Self {
        self.shallow_ceiling = ceiling;
        self
    }

    pub fn with_deep_ceiling(mut self, ceiling: i32) -> Self {
        self.deep_ceiling = ceiling;
        self
    }

    /// Noise detection runs (and stale noise flags are reset) only when enabled
    pub fn noise_enabled(&self) -> bool {
        self.noise_threshold > 0
    }

    /// Amplitude ceiling for a channel, zero or below meaning disabled
    pub fn ceiling_for(&self, channel: Channel) -> i32 {
        match channel.ceiling_class() {
            CeilingClass::Shallow => self.shallow_ceiling,
            CeilingClass::Deep => self.deep_ceiling,
        }
    }

    /// True when at least one of the three tests is enabled
    pub fn has_active_test(&self) -> bool {
        self.noise_threshold > 0 || self.shallow_ceiling > 0 || self.deep_ceiling > 0
    }

    /// Reject configurations that cannot do any work
    pub fn validate(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(FilterError::usage("at least one channel must be selected"));
        }

        if !self.has_active_test() {
            return Err(FilterError::usage(
                "one of THRESHOLD, SHAL_AMP or DEEP_AMP must be greater than zero",
            ));
        }

        Ok(())
    }

    /// One-line description for logging
    pub fn summary(&self) -> String {
        let channels: Vec<String> = self.channels.iter().map(|c| c.to_string()).collect();
        format!(
            "channels [{}], noise threshold {}, shallow ceiling {}, deep ceiling {}",
            channels.join(", "),
            describe(self.noise_threshold),
            describe(self.shallow_ceiling),
            describe(self.deep_ceiling)
        )
    }
}

fn describe(value: i32) -> String {
    if value > 0 {
        value.to_string()
    } else {
        "disabled".to_string()
    }
}
