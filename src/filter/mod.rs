//! Filtering engine for CZMIL returns
//!
//! The engine is split into three small pieces that the driver in
//! [`crate::processor`] combines per channel:
//!
//! - [`noise`] - second-difference digitizer noise detector
//! - [`amplitude`] - starting amplitude gate with the deep/shallow ceiling split
//! - [`reconcile`] - status reconciliation and invalidation counting
//!
//! [`filter_record`] runs all three over every enabled channel of one record.

pub mod amplitude;
pub mod noise;
pub mod reconcile;

#[cfg(test)]
pub mod tests;

use crate::config::FilterConfig;
use crate::error::Result;
use crate::models::{PointRecord, WaveformRecord};
use tracing::debug;

pub use reconcile::{ChannelOutcome, ChannelVerdict, reconcile_channel};

/// Filter every enabled channel of one record in place
///
/// Channels are independent: condemning returns in one channel never affects
/// the evaluation of another.
pub fn filter_record(
    points: &mut PointRecord,
    waveform: &WaveformRecord,
    config: &FilterConfig,
) -> Result<ChannelOutcome> {
    let mut record_outcome = ChannelOutcome::default();

    for &channel in &config.channels {
        let samples = &waveform.samples[channel];

        let outcome = reconcile_channel(
            &mut points.returns[channel],
            config.noise_enabled(),
            || {
                Ok(ChannelVerdict {
                    noise: noise::detect(samples, config.noise_threshold)?,
                    amplitude: amplitude::channel_exceeds(waveform, channel, config),
                })
            },
        )?;

        if outcome.invalidated() > 0 {
            debug!(
                "Channel {}: {} noise, {} start amplitude invalidations",
                channel, outcome.noise_invalidated, outcome.amplitude_invalidated
            );
        }

        record_outcome += outcome;
    }

    Ok(record_outcome)
}
