//! CZMIL Noise Filter Library
//!
//! Post-processing filter for CZMIL bathymetric lidar data. It inspects the
//! digitized waveform behind every laser return and invalidates returns
//! whose waveform shows a digitizer noise transient or whose starting
//! amplitude exceeds a per-channel-class ceiling.
//!
//! This library provides:
//! - Paired point (`.cpf`) and waveform (`.cwf`) record stores
//! - Second-difference noise detection and starting amplitude gating
//! - Status reconciliation that never touches manually invalidated returns
//! - A driver that filters a whole file pair and reports run totals

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod filter;
pub mod models;
pub mod processor;
pub mod store;

// Re-export commonly used types
pub use config::FilterConfig;
pub use error::{FilterError, Result, StoreKind};
pub use models::{
    CeilingClass, Channel, FilterReason, PerChannel, PointRecord, Return, ReturnStatus,
    WaveformRecord,
};
pub use processor::{FilterDriver, ProgressReporter, RunStats};
pub use store::{MemoryPointStore, MemoryWaveformStore, OpenMode, PointFile, PointStore, WaveformFile, WaveformStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
