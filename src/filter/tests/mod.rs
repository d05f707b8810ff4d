//! Tests for the filtering engine
//!
//! Unit tests for the detector, the gate and the reconciler, plus
//! per-record tests that combine them.

pub mod reconcile_tests;

use crate::constants::PACKET_SIZE;
use crate::models::{FilterReason, Return, ReturnStatus};

/// Pad a waveform with zeros up to a whole number of packets
pub fn packet_padded(samples: &[i16]) -> Vec<i16> {
    let packets = samples.len().div_ceil(PACKET_SIZE).max(1);
    let mut padded = samples.to_vec();
    padded.resize(packets * PACKET_SIZE, 0);
    padded
}

/// A flat waveform starting at the given amplitude
pub fn flat_waveform(level: i16) -> Vec<i16> {
    vec![level; PACKET_SIZE]
}

/// The single-spike waveform `[0, 0, 0, 100, 0, 0, 0]` padded to one packet
pub fn spike_waveform() -> Vec<i16> {
    packet_padded(&[0, 0, 0, 100, 0, 0, 0])
}

pub fn valid(elevation: f32) -> Return {
    Return::new(elevation, ReturnStatus::Valid)
}

pub fn base_invalid(elevation: f32) -> Return {
    Return::new(elevation, ReturnStatus::BaseInvalid)
}

pub fn filter_invalid(elevation: f32, reason: FilterReason) -> Return {
    Return::new(elevation, ReturnStatus::FilterInvalid(reason))
}

/// Count returns with the given status
pub fn count_status(returns: &[Return], status: ReturnStatus) -> usize {
    returns.iter().filter(|ret| ret.status == status).count()
}
