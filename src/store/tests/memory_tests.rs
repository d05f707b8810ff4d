//! Tests for the in-memory stores

use super::*;
use crate::error::FilterError;
use crate::store::{MemoryPointStore, MemoryWaveformStore, PointStore, WaveformStore};

#[test]
fn test_memory_point_store_update_tracks_indices() {
    let mut store = MemoryPointStore::new(vec![sample_point_record(1.0), sample_point_record(2.0)]);

    let mut record = store.read_point_record(1).unwrap();
    record.returns[Channel::Shallow1][0].status =
        ReturnStatus::FilterInvalid(FilterReason::StartAmplitudeExceeded);
    store.update_point_record(1, &record).unwrap();

    assert_eq!(store.updated_indices(), &[1]);
    assert_eq!(store.records()[1], record);
    assert_eq!(store.records()[0], sample_point_record(1.0));
}

#[test]
fn test_memory_point_store_out_of_range() {
    let mut store = MemoryPointStore::new(vec![sample_point_record(1.0)]);

    match store.read_point_record(3) {
        Err(FilterError::RecordOutOfRange { index, count, .. }) => {
            assert_eq!(index, 3);
            assert_eq!(count, 1);
        }
        other => panic!("Expected RecordOutOfRange, got {:?}", other),
    }

    let record = sample_point_record(1.0);
    assert!(matches!(
        store.update_point_record(3, &record),
        Err(FilterError::StoreWrite { index: 3, .. })
    ));
}

#[test]
fn test_memory_waveform_store_reads() {
    let mut store = MemoryWaveformStore::new(vec![sample_waveform_record(5)]);
    assert_eq!(store.record_count(), 1);
    assert_eq!(store.read_waveform_record(0).unwrap(), sample_waveform_record(5));
    assert!(store.read_waveform_record(1).is_err());
}
