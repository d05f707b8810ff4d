//! Application constants for the CZMIL noise filter
//!
//! File extensions, on-disk layout constants, and the status/reason codes
//! shared by the point file codec and the return model.

// =============================================================================
// File Naming
// =============================================================================

/// Extension of the point (return) file given on the command line
pub const POINT_EXTENSION: &str = "cpf";

/// Extension of the paired waveform file
pub const WAVEFORM_EXTENSION: &str = "cwf";

// =============================================================================
// Record Layout
// =============================================================================

/// Number of channels stored in every record
pub const CHANNEL_COUNT: usize = 9;

/// Waveform samples per digitizer packet
pub const PACKET_SIZE: usize = 64;

/// Point file magic bytes
pub const POINT_MAGIC: &[u8; 4] = b"CPF1";

/// Waveform file magic bytes
pub const WAVEFORM_MAGIC: &[u8; 4] = b"CWF1";

/// Current version written into both file headers
pub const FORMAT_VERSION: u16 = 1;

/// Size of both file headers in bytes
pub const HEADER_SIZE: u64 = 12;

/// Bytes per return slot in a point record: f32 elevation, u16 status, u8 reason
pub const RETURN_SLOT_SIZE: usize = 7;

// =============================================================================
// Return Status
// =============================================================================

/// Bits of the per-return status word
pub mod status {
    /// Return was invalidated outside this filter (manual edit or earlier processing)
    pub const MANUALLY_INVALID: u16 = 0x0001;

    /// Return was invalidated by a filter; the reason byte says which
    pub const FILTER_INVALID: u16 = 0x0002;

    /// Both validity bits
    pub const VALIDITY_MASK: u16 = MANUALLY_INVALID | FILTER_INVALID;
}

/// Filter reason codes stored next to the status word
pub mod filter_reason {
    /// Waveform valid, no filter reason
    pub const VALID: u8 = 0;

    /// Second difference of the waveform exceeded the noise threshold
    pub const DIGITIZER_NOISE: u8 = 1;

    /// First waveform sample exceeded the amplitude ceiling
    pub const START_AMP_EXCEEDS_THRESHOLD: u8 = 2;
}
