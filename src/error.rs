//! Error types for logdex
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using LogdexError
pub type Result<T> = std::result::Result<T, LogdexError>;

/// Unified error type for logdex operations
#[derive(Debug, Error)]
pub enum LogdexError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Log Errors
    // -------------------------------------------------------------------------
    #[error("Key too long: {len} bytes (max {max})")]
    KeyTooLong { len: usize, max: usize },

    /// The index pointed at an offset that is not a live record header.
    ///
    /// Index and log have diverged; the engine must not be used further.
    #[error("Index/log desynchronized: no live record at offset {offset}")]
    IndexDesync { offset: u64 },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LogdexError {
    /// Whether the engine can keep serving after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, LogdexError::IndexDesync { .. } | LogdexError::Io(_))
    }
}
