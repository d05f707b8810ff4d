//! Digitizer noise detection
//!
//! A channel is noisy when the discrete second difference of its waveform
//! exceeds the threshold anywhere. One exceedance condemns the whole channel;
//! no smoothing is applied.

use crate::error::{FilterError, Result};
use tracing::trace;

/// Check a channel's waveform for a digitizer noise transient
///
/// # Arguments
///
/// * `samples` - Waveform samples of one channel
/// * `threshold` - Second-difference threshold; zero or below disables detection
///
/// # Returns
///
/// True if `d[k] - d[k - 1] > threshold` for any k, where `d` is the first
/// difference of `samples`. Sequences shorter than three samples never fire.
pub fn detect(samples: &[i16], threshold: i32) -> Result<bool> {
    if threshold <= 0 || samples.len() < 3 {
        return Ok(false);
    }

    let diff = first_difference(samples)?;

    let hit = diff
        .windows(2)
        .position(|pair| pair[1] - pair[0] > threshold);

    if let Some(k) = hit {
        trace!(
            "Second difference {} at sample {} exceeds threshold {}",
            diff[k + 1] - diff[k],
            k + 1,
            threshold
        );
    }

    Ok(hit.is_some())
}

/// First difference of the waveform, widened so large swings cannot overflow
fn first_difference(samples: &[i16]) -> Result<Vec<i32>> {
    let requested = samples.len() - 1;
    let mut diff: Vec<i32> = Vec::new();
    diff.try_reserve_exact(requested)
        .map_err(|source| FilterError::Allocation { requested, source })?;

    diff.extend(
        samples
            .windows(2)
            .map(|pair| i32::from(pair[1]) - i32::from(pair[0])),
    );

    Ok(diff)
}
