//! Tests for per-channel status reconciliation

use super::*;
use crate::error::FilterError;
use crate::filter::reconcile::{
    ChannelOutcome, ChannelVerdict, has_valid_returns, reconcile_channel,
};

fn verdict(noise: bool, amplitude: bool) -> ChannelVerdict {
    ChannelVerdict { noise, amplitude }
}

#[test]
fn test_noise_condemns_every_valid_return() {
    let mut returns = vec![valid(1.0), valid(2.0), base_invalid(3.0)];

    let outcome = reconcile_channel(&mut returns, true, || Ok(verdict(true, false))).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.noise_invalidated, 2);
    assert_eq!(outcome.invalidated(), 2);
    assert_eq!(
        count_status(
            &returns,
            ReturnStatus::FilterInvalid(FilterReason::DigitizerNoise)
        ),
        2
    );
    assert_eq!(returns[2].status, ReturnStatus::BaseInvalid);
}

#[test]
fn test_amplitude_condemns_with_its_reason() {
    let mut returns = vec![valid(1.0), valid(2.0)];

    let outcome = reconcile_channel(&mut returns, false, || Ok(verdict(false, true))).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.amplitude_invalidated, 2);
    assert!(returns.iter().all(|ret| ret.status
        == ReturnStatus::FilterInvalid(FilterReason::StartAmplitudeExceeded)));
}

#[test]
fn test_noise_takes_precedence_without_double_count() {
    let mut returns = vec![valid(1.0), valid(2.0), valid(3.0)];

    let outcome = reconcile_channel(&mut returns, true, || Ok(verdict(true, true))).unwrap();

    assert_eq!(outcome.noise_invalidated, 3);
    assert_eq!(outcome.amplitude_invalidated, 0);
    assert_eq!(outcome.invalidated(), 3);
    assert_eq!(
        count_status(
            &returns,
            ReturnStatus::FilterInvalid(FilterReason::DigitizerNoise)
        ),
        3
    );
}

#[test]
fn test_stale_noise_reset_before_evaluation() {
    let mut returns = vec![
        filter_invalid(1.0, FilterReason::DigitizerNoise),
        filter_invalid(2.0, FilterReason::DigitizerNoise),
    ];

    let outcome = reconcile_channel(&mut returns, true, || Ok(verdict(false, false))).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.noise_resets, 2);
    assert_eq!(outcome.invalidated(), 0);
    assert!(returns.iter().all(|ret| ret.status == ReturnStatus::Valid));
}

#[test]
fn test_reset_then_recondemn_still_counts_as_change() {
    let mut returns = vec![filter_invalid(1.0, FilterReason::DigitizerNoise)];

    let outcome = reconcile_channel(&mut returns, true, || Ok(verdict(true, false))).unwrap();

    assert!(outcome.changed);
    assert_eq!(outcome.noise_resets, 1);
    assert_eq!(outcome.noise_invalidated, 1);
    assert_eq!(
        returns[0].status,
        ReturnStatus::FilterInvalid(FilterReason::DigitizerNoise)
    );
}

#[test]
fn test_no_reset_when_noise_disabled() {
    let mut returns = vec![
        filter_invalid(1.0, FilterReason::DigitizerNoise),
        valid(2.0),
    ];

    let outcome = reconcile_channel(&mut returns, false, || Ok(verdict(false, true))).unwrap();

    assert_eq!(outcome.noise_resets, 0);
    assert_eq!(outcome.amplitude_invalidated, 1);
    assert_eq!(
        returns[0].status,
        ReturnStatus::FilterInvalid(FilterReason::DigitizerNoise)
    );
}

#[test]
fn test_other_reasons_are_never_reset() {
    let mut returns = vec![
        filter_invalid(1.0, FilterReason::StartAmplitudeExceeded),
        filter_invalid(2.0, FilterReason::Other(9)),
    ];

    let outcome = reconcile_channel(&mut returns, true, || Ok(verdict(true, true))).unwrap();

    assert!(!outcome.changed);
    assert_eq!(outcome.noise_resets, 0);
    assert_eq!(
        returns[0].status,
        ReturnStatus::FilterInvalid(FilterReason::StartAmplitudeExceeded)
    );
    assert_eq!(
        returns[1].status,
        ReturnStatus::FilterInvalid(FilterReason::Other(9))
    );
}

#[test]
fn test_skip_channel_without_valid_returns() {
    let mut returns = vec![
        base_invalid(1.0),
        filter_invalid(2.0, FilterReason::StartAmplitudeExceeded),
    ];
    let mut evaluated = false;

    let outcome = reconcile_channel(&mut returns, true, || {
        evaluated = true;
        Ok(verdict(true, true))
    })
    .unwrap();

    assert!(!evaluated);
    assert_eq!(outcome, ChannelOutcome::default());
}

#[test]
fn test_empty_channel_is_skipped() {
    let mut returns: Vec<Return> = Vec::new();
    let outcome = reconcile_channel(&mut returns, true, || Ok(verdict(true, true))).unwrap();
    assert!(!outcome.changed);
    assert_eq!(outcome.invalidated(), 0);
}

#[test]
fn test_base_invalid_is_never_touched() {
    let mut returns = vec![base_invalid(1.0), base_invalid(2.0), valid(3.0)];

    reconcile_channel(&mut returns, true, || Ok(verdict(true, true))).unwrap();

    assert_eq!(returns[0].status, ReturnStatus::BaseInvalid);
    assert_eq!(returns[1].status, ReturnStatus::BaseInvalid);
}

#[test]
fn test_elevations_unchanged() {
    let mut returns = vec![valid(-12.25), valid(4.5)];
    reconcile_channel(&mut returns, true, || Ok(verdict(true, false))).unwrap();
    assert_eq!(returns[0].elevation, -12.25);
    assert_eq!(returns[1].elevation, 4.5);
}

#[test]
fn test_evaluation_error_propagates() {
    let mut returns = vec![valid(1.0)];

    let result = reconcile_channel(&mut returns, true, || {
        Err(FilterError::usage("evaluation failed"))
    });

    assert!(result.is_err());
    assert_eq!(returns[0].status, ReturnStatus::Valid);
}

#[test]
fn test_has_valid_returns() {
    assert!(!has_valid_returns(&[]));
    assert!(!has_valid_returns(&[base_invalid(0.0)]));
    assert!(has_valid_returns(&[base_invalid(0.0), valid(0.0)]));
}
