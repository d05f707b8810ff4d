//! Tests for record stores
//!
//! File tests write real `.cpf`/`.cwf` files into temporary directories.

pub mod memory_tests;

use crate::constants::PACKET_SIZE;
use crate::models::{
    Channel, FilterReason, PointRecord, Return, ReturnStatus, WaveformRecord,
};

/// A point record with a mix of statuses across two channels
pub fn sample_point_record(seed: f32) -> PointRecord {
    PointRecord::new()
        .with_returns(
            Channel::Shallow1,
            vec![
                Return::new(seed, ReturnStatus::Valid),
                Return::new(seed + 1.0, ReturnStatus::BaseInvalid),
            ],
        )
        .with_returns(
            Channel::Deep,
            vec![Return::new(
                seed - 10.0,
                ReturnStatus::FilterInvalid(FilterReason::DigitizerNoise),
            )],
        )
}

/// A waveform record with one packet on shallow 1 and two on deep
pub fn sample_waveform_record(offset: i16) -> WaveformRecord {
    let shallow: Vec<i16> = (0..PACKET_SIZE as i16).map(|i| i + offset).collect();
    let deep: Vec<i16> = (0..PACKET_SIZE as i16 * 2).map(|i| offset - i).collect();
    WaveformRecord::new()
        .with_samples(Channel::Shallow1, shallow)
        .with_samples(Channel::Deep, deep)
}
