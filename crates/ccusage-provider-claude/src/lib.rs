//! Claude Code log source for ccusage
//!
//! This crate locates Claude's data directory, discovers JSONL usage logs,
//! validates their lines, and feeds the resulting entries to the
//! aggregators in `ccusage-core`.

pub mod data_loader;
pub mod discovery;
pub mod parser;
pub mod paths;

pub use data_loader::{DataLoader, LoadOptions, load_daily_usage, load_session_usage};
