//! Core types, aggregation, and filters for ccusage
//!
//! This crate holds everything that does not touch the filesystem: the
//! record and aggregate types, the daily and session folds, the date range
//! filter, totals, and timezone configuration.

pub mod aggregation;
pub mod aggregation_types;
pub mod error;
pub mod filters;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{CcusageError, Result};
pub use types::{DailyDate, ISOTimestamp, SessionKey, TokenCounts, UsageEntry, UsageRecord};
