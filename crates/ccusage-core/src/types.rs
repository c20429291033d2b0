//! Core domain types for ccusage
//!
//! This module contains the fundamental types shared by the loader and the
//! aggregators: timestamps, calendar dates, token counts, validated usage
//! records, and the session key derived from a log file's location.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Session id used when a log path is too shallow to name a session
pub const UNKNOWN_SESSION: &str = "unknown";

/// Project path used when a log path has no segments above the session
pub const UNKNOWN_PROJECT: &str = "Unknown Project";

/// ISO timestamp wrapper for UTC timestamps
///
/// # Examples
/// ```
/// use ccusage_core::types::ISOTimestamp;
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// let timestamp = ISOTimestamp::new(dt);
///
/// let daily = timestamp.to_daily_date_with_tz(&chrono_tz::UTC);
/// assert_eq!(daily.to_string(), "2024-01-15");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ISOTimestamp(DateTime<Utc>);

impl ISOTimestamp {
    /// Create a new ISOTimestamp
    pub fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the inner DateTime
    pub fn inner(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Convert to the calendar date observed in `tz`
    pub fn to_daily_date_with_tz(&self, tz: &Tz) -> DailyDate {
        DailyDate::new(self.0.with_timezone(tz).date_naive())
    }
}

/// Calendar date used as the daily aggregation key
///
/// Always rendered as zero-padded `YYYY-MM-DD`. The date range filter strips
/// the separators from this rendering and compares the result as a string,
/// so the fixed width is load-bearing.
///
/// # Examples
/// ```
/// use ccusage_core::types::DailyDate;
/// use chrono::NaiveDate;
///
/// let daily = DailyDate::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
/// assert_eq!(daily.to_string(), "2024-03-05");
/// assert_eq!(daily.compact(), "20240305");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DailyDate(NaiveDate);

impl DailyDate {
    /// Create a new DailyDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }

    /// Format with a chrono format string
    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }

    /// The date as `YYYYMMDD`, the form date filters are expressed in
    pub fn compact(&self) -> String {
        self.format("%Y%m%d")
    }
}

impl fmt::Display for DailyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Token counts for usage tracking
///
/// # Examples
/// ```
/// use ccusage_core::types::TokenCounts;
///
/// let tokens = TokenCounts::new(100, 50, 10, 5);
/// assert_eq!(tokens.total(), 165);
///
/// let combined = tokens + TokenCounts::new(50, 25, 5, 2);
/// assert_eq!(combined.input_tokens, 150);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenCounts {
    /// Input tokens used
    pub input_tokens: u64,
    /// Output tokens generated
    pub output_tokens: u64,
    /// Cache creation tokens
    pub cache_creation_tokens: u64,
    /// Cache read tokens
    pub cache_read_tokens: u64,
}

impl TokenCounts {
    /// Create new TokenCounts
    pub fn new(
        input_tokens: u64,
        output_tokens: u64,
        cache_creation_tokens: u64,
        cache_read_tokens: u64,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            cache_creation_tokens,
            cache_read_tokens,
        }
    }

    /// Calculate total tokens, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.input_tokens
            .saturating_add(self.output_tokens)
            .saturating_add(self.cache_creation_tokens)
            .saturating_add(self.cache_read_tokens)
    }
}

impl Add for TokenCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            input_tokens: self.input_tokens.saturating_add(other.input_tokens),
            output_tokens: self.output_tokens.saturating_add(other.output_tokens),
            cache_creation_tokens: self
                .cache_creation_tokens
                .saturating_add(other.cache_creation_tokens),
            cache_read_tokens: self.cache_read_tokens.saturating_add(other.cache_read_tokens),
        }
    }
}

impl AddAssign for TokenCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// A validated usage event from one log line
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    /// Timestamp exactly as written in the log
    ///
    /// Session `lastActivity` tracking compares these strings lexically.
    pub timestamp: String,
    /// Parsed instant of `timestamp`
    pub instant: ISOTimestamp,
    /// Token counts; cache fields are zero when absent from the line
    pub tokens: TokenCounts,
    /// Cost in USD as recorded by the client
    pub cost_usd: f64,
}

impl UsageRecord {
    /// Calendar date of this record in `tz`
    pub fn daily_date(&self, tz: &Tz) -> DailyDate {
        self.instant.to_daily_date_with_tz(tz)
    }
}

/// Why a log line was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// The line is not valid JSON
    Malformed(String),
    /// A required field is missing or has the wrong type
    MissingField(&'static str),
    /// `timestamp` is present but cannot be parsed as a date-time
    InvalidTimestamp(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed JSON: {e}"),
            Self::MissingField(field) => write!(f, "missing or mistyped field `{field}`"),
            Self::InvalidTimestamp(ts) => write!(f, "unparseable timestamp `{ts}`"),
        }
    }
}

/// Outcome of parsing a single log line
#[derive(Debug, Clone, PartialEq)]
pub enum ParseResult {
    /// The line is a complete usage record
    Valid(UsageRecord),
    /// The line must be skipped
    Invalid(InvalidReason),
}

impl ParseResult {
    /// The record, if the line was valid
    pub fn into_record(self) -> Option<UsageRecord> {
        match self {
            Self::Valid(record) => Some(record),
            Self::Invalid(_) => None,
        }
    }
}

/// Composite key of a session aggregate
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionKey {
    /// Path segments preceding the session directory
    pub project_path: String,
    /// Name of the directory containing the log file
    pub session_id: String,
}

impl SessionKey {
    /// Create a key from explicit parts
    pub fn new(project_path: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            project_path: project_path.into(),
            session_id: session_id.into(),
        }
    }

    /// Derive a key from the segments of a log file path relative to the
    /// projects directory (the last segment is the file name)
    ///
    /// The second-to-last segment is the session id and every earlier segment,
    /// joined with `separator`, is the project path. Missing parts fall back to
    /// [`UNKNOWN_SESSION`] and [`UNKNOWN_PROJECT`].
    ///
    /// ```
    /// use ccusage_core::types::SessionKey;
    ///
    /// let key = SessionKey::from_segments(&["work", "api", "abc", "log.jsonl"], "/");
    /// assert_eq!(key.project_path, "work/api");
    /// assert_eq!(key.session_id, "abc");
    ///
    /// let shallow = SessionKey::from_segments(&["log.jsonl"], "/");
    /// assert_eq!(shallow.session_id, "unknown");
    /// assert_eq!(shallow.project_path, "Unknown Project");
    /// ```
    pub fn from_segments<S: AsRef<str>>(segments: &[S], separator: &str) -> Self {
        let session_id = segments
            .len()
            .checked_sub(2)
            .map(|i| segments[i].as_ref())
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SESSION);

        let project_path = segments[..segments.len().saturating_sub(2)]
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(separator);
        let project_path = if project_path.is_empty() {
            UNKNOWN_PROJECT.to_string()
        } else {
            project_path
        };

        Self::new(project_path, session_id)
    }
}

/// A usage record tagged with the session its log file belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct UsageEntry {
    /// Session derived from the log file path
    pub session: SessionKey,
    /// The validated record
    pub record: UsageRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_token_counts_arithmetic() {
        let tokens1 = TokenCounts::new(100, 50, 10, 5);
        let tokens2 = TokenCounts::new(200, 100, 20, 10);

        let sum = tokens1 + tokens2;
        assert_eq!(sum.input_tokens, 300);
        assert_eq!(sum.output_tokens, 150);
        assert_eq!(sum.cache_creation_tokens, 30);
        assert_eq!(sum.cache_read_tokens, 15);
        assert_eq!(sum.total(), 495);

        let mut acc = TokenCounts::default();
        acc += tokens1;
        acc += tokens2;
        assert_eq!(acc, sum);
    }

    #[test]
    fn test_token_counts_serialize_camel_case() {
        let json = serde_json::to_value(TokenCounts::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json["inputTokens"], 1);
        assert_eq!(json["outputTokens"], 2);
        assert_eq!(json["cacheCreationTokens"], 3);
        assert_eq!(json["cacheReadTokens"], 4);
    }

    #[test]
    fn test_daily_date_formatting_is_zero_padded() {
        let date = DailyDate::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(date.to_string(), "2024-01-05");
        assert_eq!(date.compact(), "20240105");
        assert_eq!(serde_json::to_value(date).unwrap(), "2024-01-05");
    }

    #[test]
    fn test_daily_date_respects_timezone() {
        let ts = ISOTimestamp::new(Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap());
        assert_eq!(ts.to_daily_date_with_tz(&chrono_tz::UTC).to_string(), "2024-01-01");
        assert_eq!(
            ts.to_daily_date_with_tz(&chrono_tz::America::New_York).to_string(),
            "2023-12-31"
        );
        assert_eq!(
            ts.to_daily_date_with_tz(&chrono_tz::Asia::Tokyo).to_string(),
            "2024-01-01"
        );
    }

    #[test]
    fn test_session_key_from_nested_segments() {
        let key = SessionKey::from_segments(&["a", "b", "c", "session-1", "log.jsonl"], "/");
        assert_eq!(key.project_path, "a/b/c");
        assert_eq!(key.session_id, "session-1");
    }

    #[test]
    fn test_session_key_without_project() {
        let key = SessionKey::from_segments(&["session-1", "log.jsonl"], "/");
        assert_eq!(key.project_path, UNKNOWN_PROJECT);
        assert_eq!(key.session_id, "session-1");
    }

    #[test]
    fn test_session_key_fallbacks() {
        let key = SessionKey::from_segments(&["log.jsonl"], "/");
        assert_eq!(key, SessionKey::new(UNKNOWN_PROJECT, UNKNOWN_SESSION));

        let empty: [&str; 0] = [];
        let key = SessionKey::from_segments(&empty, "/");
        assert_eq!(key, SessionKey::new(UNKNOWN_PROJECT, UNKNOWN_SESSION));
    }

    #[test]
    fn test_parse_result_into_record() {
        let record = UsageRecord {
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            instant: ISOTimestamp::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            tokens: TokenCounts::new(1, 1, 0, 0),
            cost_usd: 0.5,
        };
        assert_eq!(
            ParseResult::Valid(record.clone()).into_record(),
            Some(record)
        );
        assert_eq!(
            ParseResult::Invalid(InvalidReason::MissingField("timestamp")).into_record(),
            None
        );
    }

    #[test]
    fn test_token_counts_saturate() {
        let big = TokenCounts::new(10_000_000_000_000_000_000, 1, 0, 0);

        let sum = big + big;
        assert_eq!(sum.input_tokens, u64::MAX);
        assert_eq!(sum.output_tokens, 2);

        let mut acc = big;
        acc += big;
        assert_eq!(acc, sum);

        assert_eq!(TokenCounts::new(u64::MAX, 1, 1, 1).total(), u64::MAX);
    }
}
