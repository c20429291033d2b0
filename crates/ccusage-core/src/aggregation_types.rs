//! Aggregation data types for ccusage
//!
//! Pure data structures for aggregated usage summaries, and the reductions
//! that turn any collection of them into report totals.

use crate::types::{DailyDate, TokenCounts, UsageRecord};
use serde::{Deserialize, Serialize};

/// Anything that carries the four token counters and a cost
///
/// Implemented by every aggregate so totals can be computed over any of
/// them with the same code.
pub trait TokenUsage {
    /// Token counts of this item
    fn tokens(&self) -> TokenCounts;

    /// Cost of this item in USD
    fn total_cost(&self) -> f64;
}

/// Sum of the four token fields of any token-bearing item
///
/// ```
/// use ccusage_core::aggregation_types::{Totals, total_tokens};
/// use ccusage_core::types::TokenCounts;
///
/// let totals = Totals { tokens: TokenCounts::new(100, 50, 25, 10), total_cost: 0.01 };
/// assert_eq!(total_tokens(&totals), 185);
/// ```
pub fn total_tokens<T: TokenUsage + ?Sized>(item: &T) -> u64 {
    item.tokens().total()
}

/// Daily usage summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsage {
    /// Local calendar date of usage
    pub date: DailyDate,
    /// Token counts for the day
    #[serde(flatten)]
    pub tokens: TokenCounts,
    /// Total cost for the day in USD
    pub total_cost: f64,
}

impl DailyUsage {
    /// Empty accumulator for `date`
    pub fn new(date: DailyDate) -> Self {
        Self {
            date,
            tokens: TokenCounts::default(),
            total_cost: 0.0,
        }
    }

    /// Fold one record into this day
    pub fn add_record(&mut self, record: &UsageRecord) {
        self.tokens += record.tokens;
        self.total_cost += record.cost_usd;
    }
}

impl TokenUsage for DailyUsage {
    fn tokens(&self) -> TokenCounts {
        self.tokens
    }

    fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

/// Session usage summary
///
/// Sessions are keyed by the directory layout of the log files, not by any
/// id inside the records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUsage {
    /// Name of the directory holding the session's log file
    pub session_id: String,
    /// Path segments above the session directory
    pub project_path: String,
    /// Token counts for the session
    #[serde(flatten)]
    pub tokens: TokenCounts,
    /// Total cost for the session in USD
    pub total_cost: f64,
    /// Local date of the record with the greatest raw timestamp
    pub last_activity: DailyDate,
}

impl TokenUsage for SessionUsage {
    fn tokens(&self) -> TokenCounts {
        self.tokens
    }

    fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

/// Calculate totals from aggregated data
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[serde(flatten)]
    pub tokens: TokenCounts,
    pub total_cost: f64,
}

impl Totals {
    /// Field-wise sum over `items`; all zeros for an empty slice
    pub fn from_records<T: TokenUsage>(items: &[T]) -> Self {
        let mut totals = Self::default();
        for item in items {
            totals.tokens += item.tokens();
            totals.total_cost += item.total_cost();
        }
        totals
    }

    pub fn from_daily(daily_usage: &[DailyUsage]) -> Self {
        Self::from_records(daily_usage)
    }

    pub fn from_sessions(sessions: &[SessionUsage]) -> Self {
        Self::from_records(sessions)
    }
}

impl TokenUsage for Totals {
    fn tokens(&self) -> TokenCounts {
        self.tokens
    }

    fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

/// Totals ready for display, with the derived token total
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDisplay {
    #[serde(flatten)]
    pub tokens: TokenCounts,
    pub total_tokens: u64,
    pub total_cost: f64,
}

impl From<Totals> for TotalsDisplay {
    fn from(totals: Totals) -> Self {
        Self {
            tokens: totals.tokens,
            total_tokens: total_tokens(&totals),
            total_cost: totals.total_cost,
        }
    }
}
