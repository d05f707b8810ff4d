//! Core data structures for CZMIL filtering.
//!
//! Defines channels, per-return status, and the paired point/waveform
//! records the filter reads and updates.

use crate::constants::{CHANNEL_COUNT, PACKET_SIZE, filter_reason, status};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Record channels in on-disk order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    Shallow1,
    Shallow2,
    Shallow3,
    Shallow4,
    Shallow5,
    Shallow6,
    Shallow7,
    Ir,
    Deep,
}

/// Which amplitude ceiling applies to a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CeilingClass {
    Shallow,
    Deep,
}

impl Channel {
    /// All channels in on-disk order
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::Shallow1,
        Channel::Shallow2,
        Channel::Shallow3,
        Channel::Shallow4,
        Channel::Shallow5,
        Channel::Shallow6,
        Channel::Shallow7,
        Channel::Ir,
        Channel::Deep,
    ];

    /// Position of the channel inside a record
    pub fn index(self) -> usize {
        match self {
            Channel::Shallow1 => 0,
            Channel::Shallow2 => 1,
            Channel::Shallow3 => 2,
            Channel::Shallow4 => 3,
            Channel::Shallow5 => 4,
            Channel::Shallow6 => 5,
            Channel::Shallow7 => 6,
            Channel::Ir => 7,
            Channel::Deep => 8,
        }
    }

    /// Ceiling class used by the amplitude gate
    pub fn ceiling_class(self) -> CeilingClass {
        match self {
            Channel::Deep => CeilingClass::Deep,
            _ => CeilingClass::Shallow,
        }
    }

    /// One-based channel number as used by the command-line flags
    pub fn number(self) -> usize {
        self.index() + 1
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Ir => write!(f, "IR"),
            Channel::Deep => write!(f, "deep"),
            other => write!(f, "shallow {}", other.number()),
        }
    }
}

/// Fixed per-channel storage keyed by [`Channel`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerChannel<T>([T; CHANNEL_COUNT]);

impl<T> PerChannel<T> {
    /// Build from a function of the channel
    pub fn from_fn(f: impl FnMut(Channel) -> T) -> Self {
        Self(Channel::ALL.map(f))
    }

    /// Iterate channels with their values in on-disk order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &T)> {
        Channel::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Channel> for PerChannel<T> {
    type Output = T;

    fn index(&self, channel: Channel) -> &T {
        &self.0[channel.index()]
    }
}

impl<T> IndexMut<Channel> for PerChannel<T> {
    fn index_mut(&mut self, channel: Channel) -> &mut T {
        &mut self.0[channel.index()]
    }
}

/// Why a filter invalidated a return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterReason {
    DigitizerNoise,
    StartAmplitudeExceeded,
    /// Reason written by some other filter; carried through untouched
    Other(u8),
}

impl FilterReason {
    pub fn from_code(code: u8) -> Self {
        match code {
            filter_reason::DIGITIZER_NOISE => FilterReason::DigitizerNoise,
            filter_reason::START_AMP_EXCEEDS_THRESHOLD => FilterReason::StartAmplitudeExceeded,
            other => FilterReason::Other(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            FilterReason::DigitizerNoise => filter_reason::DIGITIZER_NOISE,
            FilterReason::StartAmplitudeExceeded => filter_reason::START_AMP_EXCEEDS_THRESHOLD,
            FilterReason::Other(code) => code,
        }
    }
}

/// Validity of a single return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnStatus {
    Valid,
    /// Invalidated outside this filter; never modified here
    BaseInvalid,
    FilterInvalid(FilterReason),
}

impl ReturnStatus {
    /// Decode the validity bits of a status word and its reason byte
    pub fn from_raw(word: u16, reason: u8) -> Self {
        if word & status::MANUALLY_INVALID != 0 {
            ReturnStatus::BaseInvalid
        } else if word & status::FILTER_INVALID != 0 {
            ReturnStatus::FilterInvalid(FilterReason::from_code(reason))
        } else {
            ReturnStatus::Valid
        }
    }

    /// Validity bits and reason byte for this status
    pub fn to_raw(self) -> (u16, u8) {
        match self {
            ReturnStatus::Valid => (0, filter_reason::VALID),
            ReturnStatus::BaseInvalid => (status::MANUALLY_INVALID, filter_reason::VALID),
            ReturnStatus::FilterInvalid(reason) => (status::FILTER_INVALID, reason.code()),
        }
    }

    pub fn is_valid(self) -> bool {
        self == ReturnStatus::Valid
    }
}

/// A single laser return
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Return {
    /// Measured elevation; the filter never changes it
    pub elevation: f32,
    pub status: ReturnStatus,
    /// Status word bits other than the validity bits
    pub aux_flags: u16,
}

impl Return {
    pub fn new(elevation: f32, status: ReturnStatus) -> Self {
        Self {
            elevation,
            status,
            aux_flags: 0,
        }
    }

    /// Decode from the stored status word and reason byte
    pub fn from_raw(elevation: f32, word: u16, reason: u8) -> Self {
        Self {
            elevation,
            status: ReturnStatus::from_raw(word, reason),
            aux_flags: word & !status::VALIDITY_MASK,
        }
    }

    /// Status word and reason byte to store
    pub fn to_raw(&self) -> (u16, u8) {
        let (bits, reason) = self.status.to_raw();
        (self.aux_flags | bits, reason)
    }
}

/// Returns of one record, grouped by channel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointRecord {
    pub returns: PerChannel<Vec<Return>>,
}

impl PointRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used mostly by tests and file creation
    pub fn with_returns(mut self, channel: Channel, returns: Vec<Return>) -> Self {
        self.returns[channel] = returns;
        self
    }
}

/// Waveform samples of one record, grouped by channel
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaveformRecord {
    pub samples: PerChannel<Vec<i16>>,
}

impl WaveformRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, channel: Channel, samples: Vec<i16>) -> Self {
        self.samples[channel] = samples;
        self
    }

    /// Number of digitizer packets stored for a channel
    pub fn packet_count(&self, channel: Channel) -> usize {
        self.samples[channel].len() / PACKET_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deep_is_only_deep_class() {
        for channel in Channel::ALL {
            let expected = if channel == Channel::Deep {
                CeilingClass::Deep
            } else {
                CeilingClass::Shallow
            };
            assert_eq!(channel.ceiling_class(), expected);
        }
    }

    #[test]
    fn test_status_decoding_prefers_base_invalid() {
        let both = status::MANUALLY_INVALID | status::FILTER_INVALID;
        assert_eq!(
            ReturnStatus::from_raw(both, filter_reason::DIGITIZER_NOISE),
            ReturnStatus::BaseInvalid
        );
        assert_eq!(
            ReturnStatus::from_raw(status::FILTER_INVALID, 7),
            ReturnStatus::FilterInvalid(FilterReason::Other(7))
        );
        assert_eq!(ReturnStatus::from_raw(0x0100, 0), ReturnStatus::Valid);
    }

    #[test]
    fn test_aux_flags_preserved() {
        let ret = Return::from_raw(-3.5, 0x0100 | status::FILTER_INVALID, 1);
        assert_eq!(ret.aux_flags, 0x0100);
        assert_eq!(ret.status, ReturnStatus::FilterInvalid(FilterReason::DigitizerNoise));

        let mut cleared = ret;
        cleared.status = ReturnStatus::Valid;
        assert_eq!(cleared.to_raw(), (0x0100, filter_reason::VALID));
    }

    #[test]
    fn test_per_channel_indexing() {
        let per = PerChannel::from_fn(|channel| channel.number());
        assert_eq!(per[Channel::Shallow1], 1);
        assert_eq!(per[Channel::Deep], 9);
        assert_eq!(per.iter().count(), CHANNEL_COUNT);
    }
}
