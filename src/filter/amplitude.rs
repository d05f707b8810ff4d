//! Starting amplitude gate

use crate::config::FilterConfig;
use crate::models::{Channel, WaveformRecord};

/// True when the first sample is above an enabled ceiling
pub fn exceeds(first_sample: i16, ceiling: i32) -> bool {
    ceiling > 0 && i32::from(first_sample) > ceiling
}

/// Apply the gate to one channel of a waveform record
///
/// The deep channel is compared with the deep ceiling, every other channel
/// with the shallow ceiling. An empty waveform never exceeds.
pub fn channel_exceeds(waveform: &WaveformRecord, channel: Channel, config: &FilterConfig) -> bool {
    waveform.samples[channel]
        .first()
        .is_some_and(|&first| exceeds(first, config.ceiling_for(channel)))
}
