//! Output formatting module for ccusage
//!
//! This module provides formatters for displaying usage data in different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use ccusage::output::get_formatter;
//! use ccusage_core::aggregation_types::{DailyUsage, Totals};
//! use ccusage_core::types::{DailyDate, TokenCounts};
//! use chrono::NaiveDate;
//!
//! let daily_data = vec![DailyUsage {
//!     date: DailyDate::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
//!     tokens: TokenCounts::new(1000, 500, 100, 50),
//!     total_cost: 0.025,
//! }];
//! let totals = Totals::from_daily(&daily_data);
//!
//! let table = get_formatter(false).format_daily(&daily_data, &totals).unwrap();
//! assert!(table.contains("1,000"));
//!
//! let json = get_formatter(true).format_daily(&daily_data, &totals).unwrap();
//! assert!(json.contains("\"totalTokens\": 1650"));
//! ```

use ccusage_core::aggregation_types::{
    DailyUsage, SessionUsage, Totals, TotalsDisplay, total_tokens,
};
use ccusage_core::error::Result;
use ccusage_core::types::{DailyDate, TokenCounts};
use colored::Colorize;
use prettytable::{Cell, Row, Table, format, row};
use serde::Serialize;

/// Heading printed above the daily table
pub const DAILY_TITLE: &str = "Claude Code Token Usage Report - Daily";

/// Heading printed above the session table
pub const SESSION_TITLE: &str = "Claude Code Token Usage Report - By Session";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format daily usage rows followed by their totals
    fn format_daily(&self, data: &[DailyUsage], totals: &Totals) -> Result<String>;

    /// Format session usage rows followed by their totals
    fn format_sessions(&self, data: &[SessionUsage], totals: &Totals) -> Result<String>;
}

/// Table formatter for human-readable output
///
/// Numbers are formatted with thousands separators and costs with a dollar
/// sign and two decimals.
pub struct TableFormatter;

impl TableFormatter {
    /// Format a number with thousands separators
    pub fn format_number(n: u64) -> String {
        let s = n.to_string();
        let mut result = String::new();

        for (count, ch) in s.chars().rev().enumerate() {
            if count > 0 && count % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }

        result.chars().rev().collect()
    }

    /// Format currency with dollar sign
    pub fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }

    fn heading(title: &str) -> String {
        format!("\n {}\n\n", title.cyan().bold())
    }

    fn new_table() -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table
    }
}

impl OutputFormatter for TableFormatter {
    fn format_daily(&self, data: &[DailyUsage], totals: &Totals) -> Result<String> {
        let mut table = Self::new_table();

        table.set_titles(row![
            b -> "Date",
            b -> "Input",
            b -> "Output",
            b -> "Cache Create",
            b -> "Cache Read",
            b -> "Total Tokens",
            b -> "Cost (USD)"
        ]);

        for entry in data {
            table.add_row(row![
                entry.date.to_string(),
                r -> Self::format_number(entry.tokens.input_tokens),
                r -> Self::format_number(entry.tokens.output_tokens),
                r -> Self::format_number(entry.tokens.cache_creation_tokens),
                r -> Self::format_number(entry.tokens.cache_read_tokens),
                r -> Self::format_number(total_tokens(entry)),
                r -> Self::format_currency(entry.total_cost)
            ]);
        }

        table.add_row(Row::new(vec![Cell::new(""); 7]));
        table.add_row(row![
            bFy -> "Total",
            bFyr -> Self::format_number(totals.tokens.input_tokens),
            bFyr -> Self::format_number(totals.tokens.output_tokens),
            bFyr -> Self::format_number(totals.tokens.cache_creation_tokens),
            bFyr -> Self::format_number(totals.tokens.cache_read_tokens),
            bFyr -> Self::format_number(total_tokens(totals)),
            bFyr -> Self::format_currency(totals.total_cost)
        ]);

        Ok(format!("{}{}", Self::heading(DAILY_TITLE), table))
    }

    fn format_sessions(&self, data: &[SessionUsage], totals: &Totals) -> Result<String> {
        let mut table = Self::new_table();

        table.set_titles(row![
            b -> "Project",
            b -> "Session",
            b -> "Input",
            b -> "Output",
            b -> "Cache Create",
            b -> "Cache Read",
            b -> "Total Tokens",
            b -> "Cost (USD)",
            b -> "Last Activity"
        ]);

        for session in data {
            table.add_row(row![
                session.project_path,
                session.session_id,
                r -> Self::format_number(session.tokens.input_tokens),
                r -> Self::format_number(session.tokens.output_tokens),
                r -> Self::format_number(session.tokens.cache_creation_tokens),
                r -> Self::format_number(session.tokens.cache_read_tokens),
                r -> Self::format_number(total_tokens(session)),
                r -> Self::format_currency(session.total_cost),
                session.last_activity.to_string()
            ]);
        }

        table.add_row(Row::new(vec![Cell::new(""); 9]));
        table.add_row(row![
            bFy -> "Total",
            "",
            bFyr -> Self::format_number(totals.tokens.input_tokens),
            bFyr -> Self::format_number(totals.tokens.output_tokens),
            bFyr -> Self::format_number(totals.tokens.cache_creation_tokens),
            bFyr -> Self::format_number(totals.tokens.cache_read_tokens),
            bFyr -> Self::format_number(total_tokens(totals)),
            bFyr -> Self::format_currency(totals.total_cost),
            ""
        ]);

        Ok(format!("{}{}", Self::heading(SESSION_TITLE), table))
    }
}

/// One day in the JSON report
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DailyRow {
    date: DailyDate,
    #[serde(flatten)]
    tokens: TokenCounts,
    total_tokens: u64,
    total_cost: f64,
}

/// One session in the JSON report
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRow<'a> {
    session_id: &'a str,
    project_path: &'a str,
    #[serde(flatten)]
    tokens: TokenCounts,
    total_tokens: u64,
    total_cost: f64,
    last_activity: DailyDate,
}

#[derive(Serialize)]
struct DailyReport {
    daily: Vec<DailyRow>,
    totals: TotalsDisplay,
}

#[derive(Serialize)]
struct SessionReport<'a> {
    sessions: Vec<SessionRow<'a>>,
    totals: TotalsDisplay,
}

/// JSON formatter for machine-readable output
///
/// Field names are camelCase and every row carries its `totalTokens`.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_daily(&self, data: &[DailyUsage], totals: &Totals) -> Result<String> {
        let report = DailyReport {
            daily: data
                .iter()
                .map(|d| DailyRow {
                    date: d.date,
                    tokens: d.tokens,
                    total_tokens: total_tokens(d),
                    total_cost: d.total_cost,
                })
                .collect(),
            totals: TotalsDisplay::from(*totals),
        };

        Ok(serde_json::to_string_pretty(&report)?)
    }

    fn format_sessions(&self, data: &[SessionUsage], totals: &Totals) -> Result<String> {
        let report = SessionReport {
            sessions: data
                .iter()
                .map(|s| SessionRow {
                    session_id: &s.session_id,
                    project_path: &s.project_path,
                    tokens: s.tokens,
                    total_tokens: total_tokens(s),
                    total_cost: s.total_cost,
                    last_activity: s.last_activity,
                })
                .collect(),
            totals: TotalsDisplay::from(*totals),
        };

        Ok(serde_json::to_string_pretty(&report)?)
    }
}

/// Get the formatter for the requested output mode
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter)
    }
}
