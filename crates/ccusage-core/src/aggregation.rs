//! Aggregation module for summarizing usage data
//!
//! Folds a stream of [`UsageEntry`] values into per-day and per-session
//! summaries, then orders them for reporting.
//!
//! Both folds accumulate into ordered maps and return the values in key
//! order. Callers that need report order must apply [`sort_daily`] or
//! [`sort_sessions`]; nothing downstream relies on map iteration order.
//!
//! # Examples
//!
//! ```
//! use ccusage_core::aggregation::{Aggregator, sort_daily};
//! use ccusage_core::timezone::TimezoneConfig;
//! use ccusage_core::types::UsageEntry;
//! use futures::stream;
//!
//! # async fn example(entries: Vec<UsageEntry>) -> ccusage_core::Result<()> {
//! let aggregator = Aggregator::new(TimezoneConfig::fixed(chrono_tz::UTC));
//! let mut daily = aggregator
//!     .aggregate_daily(stream::iter(entries.into_iter().map(Ok)))
//!     .await?;
//! sort_daily(&mut daily);
//! # Ok(())
//! # }
//! ```

use crate::aggregation_types::{DailyUsage, SessionUsage};
use crate::error::Result;
use crate::timezone::TimezoneConfig;
use crate::types::{DailyDate, SessionKey, TokenCounts, UsageEntry, UsageRecord};
use futures::stream::{Stream, StreamExt};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// Running totals for one session key
struct SessionAccumulator {
    tokens: TokenCounts,
    total_cost: f64,
    /// Greatest raw timestamp seen so far, compared lexically
    latest_timestamp: String,
    last_activity: DailyDate,
}

impl SessionAccumulator {
    fn new(record: &UsageRecord, date: DailyDate) -> Self {
        Self {
            tokens: record.tokens,
            total_cost: record.cost_usd,
            latest_timestamp: record.timestamp.clone(),
            last_activity: date,
        }
    }

    fn add(&mut self, record: &UsageRecord, date: DailyDate) {
        self.tokens += record.tokens;
        self.total_cost += record.cost_usd;

        if record.timestamp.as_str() > self.latest_timestamp.as_str() {
            self.latest_timestamp.clone_from(&record.timestamp);
            self.last_activity = date;
        }
    }

    fn finish(self, key: SessionKey) -> SessionUsage {
        SessionUsage {
            session_id: key.session_id,
            project_path: key.project_path,
            tokens: self.tokens,
            total_cost: self.total_cost,
            last_activity: self.last_activity,
        }
    }
}

/// Folds usage entries into daily and session summaries
#[derive(Debug, Clone)]
pub struct Aggregator {
    timezone_config: TimezoneConfig,
}

impl Aggregator {
    /// Create an aggregator that buckets dates in the configured timezone
    pub fn new(timezone_config: TimezoneConfig) -> Self {
        Self { timezone_config }
    }

    /// Timezone used for date bucketing
    pub fn timezone_config(&self) -> &TimezoneConfig {
        &self.timezone_config
    }

    /// Sum entries per local calendar date
    ///
    /// The result holds one [`DailyUsage`] per distinct date, in ascending
    /// date order. The first error in the stream aborts the fold.
    pub async fn aggregate_daily<S>(&self, entries: S) -> Result<Vec<DailyUsage>>
    where
        S: Stream<Item = Result<UsageEntry>>,
    {
        let tz = self.timezone_config.tz;
        let mut daily_map: BTreeMap<DailyDate, DailyUsage> = BTreeMap::new();
        let mut entries = std::pin::pin!(entries);

        while let Some(entry) = entries.next().await {
            let entry = entry?;
            let date = entry.record.daily_date(&tz);
            daily_map
                .entry(date)
                .or_insert_with(|| DailyUsage::new(date))
                .add_record(&entry.record);
        }

        debug!("Aggregated usage into {} days", daily_map.len());
        Ok(daily_map.into_values().collect())
    }

    /// Sum entries per `(project, session)` key
    ///
    /// `last_activity` is the local date of the record whose raw timestamp
    /// string is lexically greatest within the key. The result is in
    /// ascending key order.
    pub async fn aggregate_sessions<S>(&self, entries: S) -> Result<Vec<SessionUsage>>
    where
        S: Stream<Item = Result<UsageEntry>>,
    {
        let tz = self.timezone_config.tz;
        let mut session_map: BTreeMap<SessionKey, SessionAccumulator> = BTreeMap::new();
        let mut entries = std::pin::pin!(entries);

        while let Some(entry) = entries.next().await {
            let UsageEntry { session, record } = entry?;
            let date = record.daily_date(&tz);
            match session_map.get_mut(&session) {
                Some(acc) => acc.add(&record, date),
                None => {
                    session_map.insert(session, SessionAccumulator::new(&record, date));
                }
            }
        }

        debug!("Aggregated usage into {} sessions", session_map.len());
        Ok(session_map
            .into_iter()
            .map(|(key, acc)| acc.finish(key))
            .collect())
    }
}

/// Order days most recent first
pub fn sort_daily(daily: &mut [DailyUsage]) {
    daily.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Order sessions by cost, highest first; equal costs keep their order
pub fn sort_sessions(sessions: &mut [SessionUsage]) {
    sessions.sort_by(|a, b| {
        b.total_cost
            .partial_cmp(&a.total_cost)
            .unwrap_or(Ordering::Equal)
    });
}
