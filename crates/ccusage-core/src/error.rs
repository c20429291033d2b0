//! Error types for ccusage
//!
//! This module defines the error types used throughout the ccusage workspace.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Per-line problems in usage logs are never errors: they are reported as
//! [`crate::types::ParseResult::Invalid`] and skipped by the loader. Only
//! I/O failures that prevent the pipeline from finishing end up here.
//!
//! # Example
//!
//! ```
//! use ccusage_core::error::{CcusageError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to CcusageError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ccusage operations
#[derive(Error, Debug)]
pub enum CcusageError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A directory walk failed for a reason other than missing permissions
    #[error("Failed to read directory {}: {source}", path.display())]
    Walk {
        /// The directory (or entry) the walker could not read
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },

    /// A usage log could not be read
    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        /// The file that failed to load
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },

    /// A date bound that is not exactly eight digits; holds the rejected input
    #[error("Date must be in YYYYMMDD format")]
    InvalidDate(String),

    /// Invalid timezone
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// Convenience type alias for Results in ccusage
///
/// # Example
///
/// ```
/// use ccusage_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, CcusageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CcusageError::InvalidDate("2024-1-1".to_string());
        assert_eq!(error.to_string(), "Date must be in YYYYMMDD format");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ccusage_error: CcusageError = io_error.into();
        assert!(matches!(ccusage_error, CcusageError::Io(_)));
    }

    #[test]
    fn test_read_file_error_mentions_path() {
        let error = CcusageError::ReadFile {
            path: PathBuf::from("/tmp/session.jsonl"),
            source: std::io::Error::other("boom"),
        };
        let message = error.to_string();
        assert!(message.contains("/tmp/session.jsonl"));
        assert!(message.contains("boom"));
    }
}
