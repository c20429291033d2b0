//! Parsing and validation of single JSONL log lines
//!
//! A line becomes a [`UsageRecord`] only when it is a JSON object carrying a
//! parseable `timestamp` string, a numeric `costUSD`, and a `message.usage`
//! object with integer `input_tokens` and `output_tokens`. The two cache
//! counters are optional and default to zero. Unknown fields are ignored.
//!
//! Anything else is reported as [`ParseResult::Invalid`]; the loader skips
//! such lines silently.

use ccusage_core::types::{ISOTimestamp, InvalidReason, ParseResult, TokenCounts, UsageRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

/// Top-level shape of a log line, before field validation
#[derive(Debug, Deserialize)]
struct RawLogLine {
    timestamp: Option<Value>,
    #[serde(rename = "costUSD")]
    cost_usd: Option<Value>,
    message: Option<Value>,
}

/// `message.usage` as written by Claude Code
#[derive(Debug, Default, Deserialize)]
struct RawUsage {
    input_tokens: Option<Value>,
    output_tokens: Option<Value>,
    cache_creation_input_tokens: Option<Value>,
    cache_read_input_tokens: Option<Value>,
}

/// A token count: a non-negative integer, possibly written as `100.0`
fn as_count(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
        .map(|f| f as u64)
}

fn required_count(value: Option<&Value>, field: &'static str) -> Result<u64, InvalidReason> {
    value
        .and_then(as_count)
        .ok_or(InvalidReason::MissingField(field))
}

fn optional_count(value: Option<&Value>, field: &'static str) -> Result<u64, InvalidReason> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(v) => as_count(v).ok_or(InvalidReason::MissingField(field)),
    }
}

/// Parse a log timestamp into a UTC instant
///
/// Accepted forms, tried in order:
/// - RFC 3339 with an offset or `Z`
/// - a date-time without offset, read as wall-clock time in `tz`; a time
///   skipped by a DST transition is moved forward by an hour
/// - a bare `YYYY-MM-DD`, read as UTC midnight
pub fn parse_timestamp(raw: &str, tz: &Tz) -> Option<ISOTimestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ISOTimestamp::new(dt.with_timezone(&Utc)));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
                .map(|dt| ISOTimestamp::new(dt.with_timezone(&Utc)));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| ISOTimestamp::new(naive.and_utc()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_value(value: Value, tz: &Tz) -> Result<UsageRecord, InvalidReason> {
    // Arrays would otherwise fill the struct positionally
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(InvalidReason::Malformed(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )));
        }
    };
    let raw: RawLogLine = serde_json::from_value(Value::Object(map))
        .map_err(|e| InvalidReason::Malformed(e.to_string()))?;

    let timestamp = match raw.timestamp {
        Some(Value::String(s)) => s,
        _ => return Err(InvalidReason::MissingField("timestamp")),
    };
    let instant = parse_timestamp(&timestamp, tz)
        .ok_or_else(|| InvalidReason::InvalidTimestamp(timestamp.clone()))?;

    let cost_usd = raw
        .cost_usd
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or(InvalidReason::MissingField("costUSD"))?;

    let usage = raw
        .message
        .and_then(|message| match message {
            Value::Object(mut map) => map.remove("usage"),
            _ => None,
        })
        .filter(Value::is_object)
        .ok_or(InvalidReason::MissingField("message.usage"))?;
    let usage: RawUsage = serde_json::from_value(usage).unwrap_or_default();

    let tokens = TokenCounts::new(
        required_count(usage.input_tokens.as_ref(), "message.usage.input_tokens")?,
        required_count(usage.output_tokens.as_ref(), "message.usage.output_tokens")?,
        optional_count(
            usage.cache_creation_input_tokens.as_ref(),
            "message.usage.cache_creation_input_tokens",
        )?,
        optional_count(
            usage.cache_read_input_tokens.as_ref(),
            "message.usage.cache_read_input_tokens",
        )?,
    );

    Ok(UsageRecord {
        timestamp,
        instant,
        tokens,
        cost_usd,
    })
}

/// Validate one log line
///
/// `tz` is only consulted for timestamps that carry no offset.
///
/// ```
/// use ccusage_core::types::ParseResult;
/// use ccusage_provider_claude::parser::parse_line;
///
/// let line = r#"{"timestamp":"2024-01-01T12:00:00Z","costUSD":0.01,
///     "message":{"usage":{"input_tokens":100,"output_tokens":50}}}"#;
/// let ParseResult::Valid(record) = parse_line(line, &chrono_tz::UTC) else {
///     panic!("line should be valid");
/// };
/// assert_eq!(record.tokens.total(), 150);
///
/// assert!(matches!(parse_line("not json", &chrono_tz::UTC), ParseResult::Invalid(_)));
/// ```
pub fn parse_line(line: &str, tz: &Tz) -> ParseResult {
    let value = match serde_json::from_str::<Value>(line) {
        Ok(value) => value,
        Err(e) => return ParseResult::Invalid(InvalidReason::Malformed(e.to_string())),
    };

    match parse_value(value, tz) {
        Ok(record) => ParseResult::Valid(record),
        Err(reason) => ParseResult::Invalid(reason),
    }
}
