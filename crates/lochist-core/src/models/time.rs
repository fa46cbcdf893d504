//! Second-granular instants parsed from export timestamps.

use crate::error::{LochistError, Result};
use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike, Weekday};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Sub;

/// Fixed layout of the consulted timestamp prefix
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Number of leading characters of a timestamp that are parsed
pub const TIMESTAMP_PREFIX_LEN: usize = 19;

/// An instant truncated to whole seconds.
///
/// Only the `YYYY-MM-DDTHH:MM:SS` prefix of the source text is used, so timezone
/// suffixes and fractional seconds are dropped rather than rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(NaiveDateTime);

impl TimePoint {
    /// Parse the first 19 characters of `text`
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || LochistError::MalformedTimestamp { value: text.to_string() };

        let prefix = text.get(..TIMESTAMP_PREFIX_LEN).ok_or_else(malformed)?;
        if !has_timestamp_shape(prefix) {
            return Err(malformed());
        }

        let parsed = NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).map_err(|_| malformed())?;
        // chrono accepts `:60` as a leap second
        if parsed.nanosecond() != 0 {
            return Err(malformed());
        }
        Ok(TimePoint(parsed))
    }

    pub fn from_naive(datetime: NaiveDateTime) -> Self {
        // Sub-second precision is never carried
        Self(datetime.with_nanosecond(0).unwrap_or(datetime))
    }

    /// `dd.mm.YYYY HH:MM`, the layout used in printed reports
    pub fn format_report(&self) -> String {
        self.0.format("%d.%m.%Y %H:%M").to_string()
    }

    /// Abbreviated weekday name in the given locale
    pub fn weekday_short(&self, locale: WeekdayLocale) -> &'static str {
        locale.abbreviation(self.0.weekday())
    }
}

/// Language of weekday abbreviations in printed reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WeekdayLocale {
    #[default]
    English,
    Finnish,
}

impl WeekdayLocale {
    pub fn abbreviation(self, weekday: Weekday) -> &'static str {
        let index = weekday.num_days_from_monday() as usize;
        match self {
            WeekdayLocale::English => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"][index],
            WeekdayLocale::Finnish => ["ma", "ti", "ke", "to", "pe", "la", "su"][index],
        }
    }
}

/// `dddd-dd-ddTdd:dd:dd` with ASCII digits only
fn has_timestamp_shape(prefix: &str) -> bool {
    let bytes = prefix.as_bytes();
    bytes.len() == TIMESTAMP_PREFIX_LEN
        && bytes.iter().enumerate().all(|(i, &b)| match i {
            4 | 7 => b == b'-',
            10 => b == b'T',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        })
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl Sub for TimePoint {
    type Output = TimeDelta;

    fn sub(self, rhs: TimePoint) -> TimeDelta {
        self.0.signed_duration_since(rhs.0)
    }
}

/// Convert fractional hours into a duration (millisecond resolution)
pub fn hours(value: f64) -> TimeDelta {
    TimeDelta::milliseconds((value * 3_600_000.0).round() as i64)
}

/// Convert fractional minutes into a duration (millisecond resolution)
pub fn minutes(value: f64) -> TimeDelta {
    TimeDelta::milliseconds((value * 60_000.0).round() as i64)
}

/// Format a duration as `d h m`, e.g. ` 1 d  3 h 05 m`
pub fn format_duration(duration: TimeDelta) -> String {
    let total_minutes = duration.num_minutes();
    let days = total_minutes.div_euclid(24 * 60);
    let rem = total_minutes.rem_euclid(24 * 60);
    format!("{:2} d {:2} h {:02} m", days, rem / 60, rem % 60)
}

/// Serialize a duration as whole seconds
pub fn serialize_seconds<S: Serializer>(duration: &TimeDelta, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

/// Serialize an optional duration as whole seconds
pub fn serialize_opt_seconds<S: Serializer>(
    duration: &Option<TimeDelta>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_some(&d.num_seconds()),
        None => serializer.serialize_none(),
    }
}
