//! Status reconciliation for one channel of a record
//!
//! Merges the noise detector and amplitude gate outcomes into the status of
//! each return. Only `Valid` returns are condemned and only digitizer-noise
//! invalidations are ever undone; base-invalid returns are never touched.

use crate::error::Result;
use crate::models::{FilterReason, Return, ReturnStatus};
use std::ops::AddAssign;

/// Outcome of the two waveform tests for one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelVerdict {
    /// Noise detector fired
    pub noise: bool,
    /// Amplitude gate fired
    pub amplitude: bool,
}

/// What reconciliation did to a channel (or, summed, to a record)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelOutcome {
    /// Any return's status was altered
    pub changed: bool,
    /// Stale digitizer-noise invalidations cleared before re-evaluation
    pub noise_resets: usize,
    /// Returns newly condemned as digitizer noise
    pub noise_invalidated: usize,
    /// Returns newly condemned for start amplitude
    pub amplitude_invalidated: usize,
}

impl ChannelOutcome {
    /// Returns newly invalidated by either test
    pub fn invalidated(&self) -> usize {
        self.noise_invalidated + self.amplitude_invalidated
    }
}

impl AddAssign for ChannelOutcome {
    fn add_assign(&mut self, other: Self) {
        self.changed |= other.changed;
        self.noise_resets += other.noise_resets;
        self.noise_invalidated += other.noise_invalidated;
        self.amplitude_invalidated += other.amplitude_invalidated;
    }
}

/// Reconcile the returns of one channel
///
/// # Arguments
///
/// * `returns` - Returns of the channel, updated in place
/// * `noise_enabled` - Noise filtering is on for this run; stale
///   digitizer-noise invalidations are reset first
/// * `evaluate` - Runs the detector and gate; only called when at least one
///   return is valid after the reset
///
/// # Returns
///
/// The channel outcome, or the error raised by `evaluate`
pub fn reconcile_channel<F>(
    returns: &mut [Return],
    noise_enabled: bool,
    evaluate: F,
) -> Result<ChannelOutcome>
where
    F: FnOnce() -> Result<ChannelVerdict>,
{
    let mut outcome = ChannelOutcome::default();

    if noise_enabled {
        outcome.noise_resets = reset_stale_noise(returns);
        outcome.changed = outcome.noise_resets > 0;
    }

    // Nothing to condemn
    if !has_valid_returns(returns) {
        return Ok(outcome);
    }

    let verdict = evaluate()?;

    if verdict.noise {
        outcome.noise_invalidated = condemn(returns, FilterReason::DigitizerNoise);
    }

    if verdict.amplitude {
        outcome.amplitude_invalidated = condemn(returns, FilterReason::StartAmplitudeExceeded);
    }

    outcome.changed |= outcome.invalidated() > 0;
    Ok(outcome)
}

/// True when at least one return is currently valid
pub fn has_valid_returns(returns: &[Return]) -> bool {
    returns.iter().any(|ret| ret.status.is_valid())
}

/// Clear digitizer-noise invalidations left by an earlier run
fn reset_stale_noise(returns: &mut [Return]) -> usize {
    let mut reset = 0;
    for ret in returns.iter_mut() {
        if ret.status == ReturnStatus::FilterInvalid(FilterReason::DigitizerNoise) {
            ret.status = ReturnStatus::Valid;
            reset += 1;
        }
    }
    reset
}

/// Mark every valid return as filter-invalid, returning how many were marked
fn condemn(returns: &mut [Return], reason: FilterReason) -> usize {
    let mut condemned = 0;
    for ret in returns.iter_mut().filter(|ret| ret.status.is_valid()) {
        ret.status = ReturnStatus::FilterInvalid(reason);
        condemned += 1;
    }
    condemned
}
