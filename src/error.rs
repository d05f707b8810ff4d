//! Error handling for filtering operations.
//!
//! Every variant is fatal to a run: the driver stops at the first failure and
//! records already written for earlier indices stay written.

use std::path::PathBuf;
use thiserror::Error;

/// Which of the paired files an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Point,
    Waveform,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Point => write!(f, "point"),
            StoreKind::Waveform => write!(f, "waveform"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Usage error: {message}")]
    Usage { message: String },

    #[error("Unable to open {kind} file {path}")]
    StoreOpen {
        kind: StoreKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to read {kind} record {index}")]
    StoreRead {
        kind: StoreKind,
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to update point record {index}: {reason}")]
    StoreWrite {
        index: usize,
        reason: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid {kind} file format in {path}: {reason}")]
    InvalidFormat {
        kind: StoreKind,
        path: PathBuf,
        reason: String,
    },

    #[error("{kind} record {index} out of range (file holds {count} records)")]
    RecordOutOfRange {
        kind: StoreKind,
        index: usize,
        count: usize,
    },

    #[error("Unable to allocate {requested} difference samples")]
    Allocation {
        requested: usize,
        #[source]
        source: std::collections::TryReserveError,
    },
}

impl FilterError {
    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a write error for an update the store refused
    pub fn store_write(index: usize, reason: impl Into<String>) -> Self {
        Self::StoreWrite {
            index,
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a write error caused by an I/O failure
    pub fn store_write_io(index: usize, reason: impl Into<String>, source: std::io::Error) -> Self {
        Self::StoreWrite {
            index,
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Create a file format error
    pub fn invalid_format(
        kind: StoreKind,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFormat {
            kind,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by bad command-line input
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
