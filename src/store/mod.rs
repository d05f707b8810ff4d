//! Record storage for paired point and waveform files
//!
//! The driver only sees the [`PointStore`] and [`WaveformStore`] traits.
//! File-backed implementations live in [`point_file`] and [`waveform_file`];
//! the in-memory stores here back the unit tests and library callers that
//! already hold their records.

pub mod point_file;
pub mod waveform_file;

#[cfg(test)]
pub mod tests;

use crate::error::{FilterError, Result, StoreKind};
use crate::models::{PointRecord, WaveformRecord};

pub use point_file::PointFile;
pub use waveform_file::WaveformFile;

/// Access mode for opening a point file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    Update,
}

/// Indexed access to point records with in-place status updates
pub trait PointStore {
    /// Number of records in the store
    fn record_count(&self) -> usize;

    /// Read the point record at `index`
    fn read_point_record(&mut self, index: usize) -> Result<PointRecord>;

    /// Persist the return statuses of a modified record
    fn update_point_record(&mut self, index: usize, record: &PointRecord) -> Result<()>;
}

/// Indexed read access to waveform records
pub trait WaveformStore {
    /// Number of records in the store
    fn record_count(&self) -> usize;

    /// Read the waveform record at `index`
    fn read_waveform_record(&mut self, index: usize) -> Result<WaveformRecord>;
}

/// Point records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPointStore {
    records: Vec<PointRecord>,
    updated: Vec<usize>,
}

impl MemoryPointStore {
    pub fn new(records: Vec<PointRecord>) -> Self {
        Self {
            records,
            updated: Vec::new(),
        }
    }

    /// Current records
    pub fn records(&self) -> &[PointRecord] {
        &self.records
    }

    /// Indices passed to `update_point_record`, in call order
    pub fn updated_indices(&self) -> &[usize] {
        &self.updated
    }
}

impl PointStore for MemoryPointStore {
    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn read_point_record(&mut self, index: usize) -> Result<PointRecord> {
        self.records
            .get(index)
            .cloned()
            .ok_or(FilterError::RecordOutOfRange {
                kind: StoreKind::Point,
                index,
                count: self.records.len(),
            })
    }

    fn update_point_record(&mut self, index: usize, record: &PointRecord) -> Result<()> {
        let slot = self
            .records
            .get_mut(index)
            .ok_or_else(|| FilterError::store_write(index, "record index out of range"))?;
        *slot = record.clone();
        self.updated.push(index);
        Ok(())
    }
}

/// Waveform records held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryWaveformStore {
    records: Vec<WaveformRecord>,
}

impl MemoryWaveformStore {
    pub fn new(records: Vec<WaveformRecord>) -> Self {
        Self { records }
    }
}

impl WaveformStore for MemoryWaveformStore {
    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn read_waveform_record(&mut self, index: usize) -> Result<WaveformRecord> {
        self.records
            .get(index)
            .cloned()
            .ok_or(FilterError::RecordOutOfRange {
                kind: StoreKind::Waveform,
                index,
                count: self.records.len(),
            })
    }
}
