//! The zone that turns usage instants into report dates
//!
//! A record counts toward the calendar day it falls on in this zone, and log
//! timestamps written without an offset are read as wall-clock time here.
//! `--utc` and `--timezone` override the zone found on the host.

use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Zone used for daily buckets and offset-less timestamps
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    /// Zone whose calendar days the reports use
    pub tz: Tz,
    /// Set when reports are bucketed by UTC day
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        let tz = get_local_timezone();
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }
}

impl TimezoneConfig {
    /// Bucket by `tz` without consulting the host
    pub fn fixed(tz: Tz) -> Self {
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }

    /// Resolve `--utc` and `--timezone`; `--utc` takes precedence
    ///
    /// Without either flag the host zone is used.
    pub fn from_cli(timezone_str: Option<&str>, use_utc: bool) -> crate::error::Result<Self> {
        if use_utc {
            return Ok(Self::fixed(Tz::UTC));
        }

        match timezone_str {
            Some(tz_str) => {
                let tz = Tz::from_str(tz_str).map_err(|_| {
                    crate::error::CcusageError::InvalidTimezone(format!(
                        "'{tz_str}'. Use format like 'America/New_York', 'Asia/Tokyo', or 'UTC'"
                    ))
                })?;
                Ok(Self::fixed(tz))
            }
            None => Ok(Self::default()),
        }
    }

    /// IANA name of the zone, or `UTC`
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }
}

/// Zone of the host running the report
///
/// Checks `TZ` first, then asks the OS through `iana-time-zone`. Falls back
/// to UTC when neither yields a known zone name.
pub fn get_local_timezone() -> Tz {
    if let Ok(tz_str) = std::env::var("TZ")
        && let Ok(tz) = Tz::from_str(&tz_str)
    {
        debug!("Bucketing dates in {} (from TZ)", tz_str);
        return tz;
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => match Tz::from_str(&tz_str) {
            Ok(tz) => {
                debug!("Bucketing dates in host zone {}", tz_str);
                tz
            }
            Err(_) => {
                debug!("Host reported unknown zone '{}', bucketing dates in UTC", tz_str);
                Tz::UTC
            }
        },
        Err(e) => {
            debug!("Host zone unavailable ({:?}), bucketing dates in UTC", e);
            Tz::UTC
        }
    }
}
