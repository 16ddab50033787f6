//! Error types for worldsave
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::cursor::PrimitiveTag;

/// Result type alias using SaveError
pub type Result<T> = std::result::Result<T, SaveError>;

/// Unified error type for worldsave operations
#[derive(Debug, Error)]
pub enum SaveError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Cursor Errors
    // -------------------------------------------------------------------------
    #[error("Unexpected end of data at offset {position}: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEndOfData {
        needed: usize,
        remaining: usize,
        position: usize,
    },

    #[error("Type mismatch at offset {position}: expected {expected:?}, found tag 0x{found:02x}")]
    TypeMismatch {
        expected: PrimitiveTag,
        found: u8,
        position: usize,
    },

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Unknown entity type: {0}")]
    UnknownType(String),

    #[error("Invalid field layout: {0}")]
    InvalidLayout(String),

    // -------------------------------------------------------------------------
    // Save File Errors
    // -------------------------------------------------------------------------
    #[error("Save file error: {0}")]
    SaveFile(String),

    #[error("Save worker failed: {0}")]
    Worker(String),

    // -------------------------------------------------------------------------
    // Metrics Errors
    // -------------------------------------------------------------------------
    #[error("Counter registration failed: {0}")]
    CounterRegistration(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SaveError {
    /// Build the error for a schema version outside `[0, max]`.
    pub fn version_out_of_range(kind: &str, version: i32, max: i32) -> Self {
        SaveError::CorruptRecord(format!(
            "{} version {} outside known range [0, {}]",
            kind, version, max
        ))
    }

    /// Whether the failure is confined to a single entity's record.
    ///
    /// The loader skips records failing with one of these and keeps going;
    /// anything else aborts the load.
    pub fn is_record_scoped(&self) -> bool {
        matches!(
            self,
            SaveError::UnexpectedEndOfData { .. }
                | SaveError::CorruptRecord(_)
                | SaveError::TypeMismatch { .. }
                | SaveError::UnknownType(_)
        )
    }
}
