//! Tests for the filter driver
//!
//! Runs complete passes over in-memory stores, including stores that fail
//! part way through.


use crate::constants::PACKET_SIZE;
use crate::models::{Channel, FilterReason, PointRecord, Return, ReturnStatus, WaveformRecord};

/// Waveform with a single sharp spike on the given channel
pub fn noisy_waveform(channel: Channel) -> WaveformRecord {
    let mut samples = vec![0i16; PACKET_SIZE];
    samples[3] = 100;
    WaveformRecord::new().with_samples(channel, samples)
}

/// Waveform that is flat at `level` on every channel
pub fn flat_waveform(level: i16) -> WaveformRecord {
    let mut record = WaveformRecord::new();
    for channel in Channel::ALL {
        record.samples[channel] = vec![level; PACKET_SIZE];
    }
    record
}

/// Point record with `count` valid returns on the given channel
pub fn valid_returns(channel: Channel, count: usize) -> PointRecord {
    let returns = (0..count)
        .map(|i| Return::new(i as f32, ReturnStatus::Valid))
        .collect();
    PointRecord::new().with_returns(channel, returns)
}

/// Count returns across all channels with the given status
pub fn count_all(records: &[PointRecord], status: ReturnStatus) -> usize {
    records
        .iter()
        .flat_map(|record| record.returns.iter())
        .flat_map(|(_, returns)| returns.iter())
        .filter(|ret| ret.status == status)
        .count()
}

pub const NOISE: ReturnStatus = ReturnStatus::FilterInvalid(FilterReason::DigitizerNoise);
pub const START_AMP: ReturnStatus =
    ReturnStatus::FilterInvalid(FilterReason::StartAmplitudeExceeded);
