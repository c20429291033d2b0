//! Date range filtering for aggregated usage
//!
//! Bounds are `YYYYMMDD` strings, both inclusive. An aggregate's date is
//! rendered as `YYYY-MM-DD`, stripped of separators, and compared to the
//! bounds as a plain string. Because both sides are fixed-width and
//! zero-padded, string order equals date order.
//!
//! # Examples
//!
//! ```
//! use ccusage_core::filters::DateFilter;
//!
//! let filter = DateFilter::new().with_since("20240101").with_until("20240131");
//! assert!(filter.matches_compact("20240101"));
//! assert!(filter.matches_compact("20240131"));
//! assert!(!filter.matches_compact("20240201"));
//! ```

use crate::aggregation_types::{DailyUsage, SessionUsage};
use crate::types::DailyDate;

/// An aggregate that can be placed on the calendar
pub trait ActivityDate {
    /// The date the filter is applied to
    fn activity_date(&self) -> DailyDate;
}

impl ActivityDate for DailyUsage {
    fn activity_date(&self) -> DailyDate {
        self.date
    }
}

impl ActivityDate for SessionUsage {
    fn activity_date(&self) -> DailyDate {
        self.last_activity
    }
}

/// Optional inclusive `[since, until]` bound
///
/// The bounds are expected to already be eight-digit strings; no format
/// validation happens here.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DateFilter {
    /// Start date filter (inclusive), `YYYYMMDD`
    pub since: Option<String>,
    /// End date filter (inclusive), `YYYYMMDD`
    pub until: Option<String>,
}

impl DateFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start date filter
    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Set the end date filter
    pub fn with_until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    /// Whether neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Check a `YYYYMMDD` string against the bounds
    pub fn matches_compact(&self, date_str: &str) -> bool {
        if let Some(since) = &self.since
            && date_str < since.as_str()
        {
            return false;
        }
        if let Some(until) = &self.until
            && date_str > until.as_str()
        {
            return false;
        }
        true
    }

    /// Check a calendar date against the bounds
    pub fn matches_date(&self, date: &DailyDate) -> bool {
        self.matches_compact(&date.compact())
    }

    /// Keep only the items whose activity date is within the bounds,
    /// preserving their order
    pub fn apply<T: ActivityDate>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_unbounded() {
            return items;
        }
        items
            .into_iter()
            .filter(|item| self.matches_date(&item.activity_date()))
            .collect()
    }
}
