//! ccusage - Claude Code usage analysis
//!
//! Reads the JSONL logs Claude Code writes under `~/.claude/projects`,
//! aggregates token counts and cost per day or per session, and renders the
//! result as a table or JSON.
//!
//! Log discovery and parsing live in `ccusage-provider-claude`; the types,
//! aggregators, and filters in `ccusage-core`. This crate adds the
//! command-line surface and report formatting.
//!
//! # Example
//!
//! ```no_run
//! use ccusage::output::get_formatter;
//! use ccusage_core::aggregation_types::Totals;
//! use ccusage_core::timezone::TimezoneConfig;
//! use ccusage_provider_claude::{LoadOptions, load_daily_usage};
//!
//! # async fn example() -> ccusage_core::Result<()> {
//! let daily = load_daily_usage(&LoadOptions::new(), &TimezoneConfig::default()).await?;
//! let totals = Totals::from_daily(&daily);
//! println!("{}", get_formatter(false).format_daily(&daily, &totals)?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod output;
