//! CLI interface for ccusage
//!
//! `ccusage [daily|session] [flags]`. When the report is omitted it
//! defaults to `daily`. All flags are global, so they may appear before or
//! after the subcommand.
//!
//! # Example
//!
//! ```bash
//! # Daily usage for January 2024
//! ccusage daily --since 20240101 --until 20240131
//!
//! # Sessions from a copied data directory, as JSON
//! ccusage session --path /backup/.claude --json
//! ```

use ccusage_core::error::{CcusageError, Result};
use ccusage_core::filters::DateFilter;
use ccusage_core::timezone::TimezoneConfig;
use ccusage_provider_claude::LoadOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Summarize Claude Code token usage and cost from local logs
#[derive(Parser, Debug, Clone)]
#[command(name = "ccusage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Filter from date (YYYYMMDD, inclusive)
    #[arg(long, short = 's', global = true, value_parser = parse_compact_date)]
    pub since: Option<String>,

    /// Filter until date (YYYYMMDD, inclusive)
    #[arg(long, short = 'u', global = true, value_parser = parse_compact_date)]
    pub until: Option<String>,

    /// Custom path to Claude data directory (default: ~/.claude)
    #[arg(long, short = 'p', global = true, env = "CLAUDE_DATA_PATH")]
    pub path: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Timezone for date grouping (e.g. "America/New_York", "Asia/Tokyo", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z', global = true)]
    pub timezone: Option<String>,

    /// Use UTC for date grouping (overrides --timezone)
    #[arg(long, global = true)]
    pub utc: bool,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Report to show
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available reports
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Show usage report grouped by date
    #[default]
    Daily,
    /// Show usage report grouped by conversation session
    Session,
}

impl Cli {
    /// The selected report, `daily` when none was given
    pub fn report(&self) -> Command {
        self.command.unwrap_or_default()
    }

    /// Date bounds from `--since` / `--until`
    pub fn date_filter(&self) -> DateFilter {
        DateFilter {
            since: self.since.clone(),
            until: self.until.clone(),
        }
    }

    /// Loader options built from the flags
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            filter: self.date_filter(),
            claude_path: self.path.clone(),
        }
    }

    /// Timezone from `--timezone` / `--utc`, defaulting to the local zone
    pub fn timezone_config(&self) -> Result<TimezoneConfig> {
        TimezoneConfig::from_cli(self.timezone.as_deref(), self.utc)
    }
}

/// Validate a `YYYYMMDD` date bound
///
/// Only the shape is checked: exactly eight ASCII digits. The value is kept
/// as a string because the range filter compares strings.
pub fn parse_compact_date(value: &str) -> Result<String> {
    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(CcusageError::InvalidDate(value.to_string()))
    }
}
