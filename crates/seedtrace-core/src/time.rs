//! Timestamp parsing and calendar-day keys
//!
//! Every date-keyed view (day groupings, next-N-days windows, month grids) joins
//! on [`DayKey`], so the key format lives in exactly one place.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

const DAY_FORMAT: &str = "%Y-%m-%d";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a loosely formatted timestamp into a UTC instant
///
/// Accepted inputs, tried in order:
/// - integer epoch milliseconds (`"1735689600000"`)
/// - RFC 3339 with offset (`"2025-01-01T00:00:00Z"`, `"2025-01-01T02:00:00+02:00"`)
/// - naive date-time, read as UTC (`"2025-01-01T08:30:00"`, `"2025-01-01 08:30"`)
/// - date only, read as UTC midnight (`"2025-01-01"`)
///
/// Returns `None` for anything else; never panics.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if is_integer(raw) {
        return raw
            .parse::<i64>()
            .ok()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, DAY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a timestamp and return it as epoch milliseconds
#[inline]
#[must_use]
pub fn epoch_millis(raw: &str) -> Option<i64> {
    parse_timestamp(raw).map(|instant| instant.timestamp_millis())
}

/// Resolve a raw date string to the calendar day it falls on in `tz`
///
/// A bare `YYYY-MM-DD` is already a calendar day and is taken verbatim; full
/// timestamps are converted into `tz` before truncation.
#[must_use]
pub fn parse_day<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DAY_FORMAT) {
        return Some(date);
    }
    parse_timestamp(trimmed).map(|instant| instant.with_timezone(tz).date_naive())
}

/// Truncate a reference time to its calendar day in its own time zone
#[inline]
#[must_use]
pub fn truncate_to_day<Tz: TimeZone>(reference: &DateTime<Tz>) -> NaiveDate {
    reference.date_naive()
}

/// Date shifted by a signed number of days
///
/// Returns `None` only when the result leaves chrono's representable range.
#[must_use]
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let step = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(step)
    } else {
        date.checked_sub_days(step)
    }
}

fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Error parsing a [`DayKey`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayKeyError {
    /// Input is not an ISO `YYYY-MM-DD` date
    #[error("invalid day key: '{0}' (expected YYYY-MM-DD)")]
    Invalid(String),
}

/// Calendar-day key rendered as ISO `YYYY-MM-DD`
///
/// Ordering follows the calendar, which coincides with lexical ordering of the
/// rendered key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Create key for a calendar date
    #[inline]
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Key of the day `instant` falls on in `tz`
    #[inline]
    #[must_use]
    pub fn from_instant<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> Self {
        Self(instant.with_timezone(tz).date_naive())
    }

    /// Underlying calendar date
    #[inline]
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Key shifted by a signed number of days
    ///
    /// Returns `None` only when the result leaves chrono's representable range.
    #[must_use]
    pub fn offset(&self, days: i64) -> Option<Self> {
        shift_days(self.0, days).map(Self)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Display for DayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DAY_FORMAT)
            .map(Self)
            .map_err(|_| DayKeyError::Invalid(s.to_string()))
    }
}

impl Serialize for DayKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let instant = parse_timestamp("2025-01-01T02:00:00+02:00").unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn parses_date_only_as_utc_midnight() {
        let instant = parse_timestamp("2025-03-02").unwrap();
        assert_eq!(instant.timestamp_millis(), 1_740_873_600_000);
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        let a = parse_timestamp("2025-01-01T08:30:00").unwrap();
        let b = parse_timestamp("2025-01-01 08:30").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parses_epoch_millis() {
        assert_eq!(epoch_millis("1735689600000"), Some(1_735_689_600_000));
        assert_eq!(
            parse_timestamp("1735689600000"),
            parse_timestamp("2025-01-01T00:00:00Z")
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("   ").is_none());
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("2025-13-45").is_none());
        assert!(parse_timestamp("-").is_none());
    }

    #[test]
    fn parse_day_keeps_bare_dates() {
        let east = FixedOffset::east_opt(14 * 3600).unwrap();
        assert_eq!(parse_day("2025-01-06", &east), Some(ymd(2025, 1, 6)));
    }

    #[test]
    fn parse_day_converts_timestamps_into_zone() {
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            parse_day("2025-01-01T03:00:00Z", &west),
            Some(ymd(2024, 12, 31))
        );
        assert_eq!(parse_day("2025-01-01T03:00:00Z", &Utc), Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn truncate_ignores_time_of_day() {
        let morning = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 1).unwrap();
        let night = Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 59).unwrap();
        assert_eq!(truncate_to_day(&morning), truncate_to_day(&night));
    }

    #[test]
    fn day_key_display_and_parse() {
        let key: DayKey = "2025-01-06".parse().unwrap();
        assert_eq!(key.date(), ymd(2025, 1, 6));
        assert_eq!(key.to_string(), "2025-01-06");
        assert!("06/01/2025".parse::<DayKey>().is_err());
    }

    #[test]
    fn day_key_offset_crosses_months() {
        let key = DayKey::new(ymd(2025, 1, 1));
        assert_eq!(key.offset(60).unwrap().to_string(), "2025-03-02");
        assert_eq!(key.offset(-1).unwrap().to_string(), "2024-12-31");
    }

    #[test]
    fn shift_days_is_signed_and_bounded() {
        assert_eq!(shift_days(ymd(2025, 1, 1), 14), Some(ymd(2025, 1, 15)));
        assert_eq!(shift_days(ymd(2025, 1, 1), -3), Some(ymd(2024, 12, 29)));
        assert_eq!(shift_days(ymd(2025, 1, 1), 0), Some(ymd(2025, 1, 1)));
        assert_eq!(shift_days(NaiveDate::MAX, 1), None);
        assert_eq!(shift_days(NaiveDate::MIN, i64::MIN), None);
    }

    #[test]
    fn day_key_serializes_as_string() {
        let key = DayKey::new(ymd(2025, 1, 15));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2025-01-15\"");
        let back: DayKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    proptest! {
        #[test]
        fn prop_parse_timestamp_is_total(raw in ".*") {
            let _ = parse_timestamp(&raw);
            let _ = parse_day(&raw, &Utc);
        }

        #[test]
        fn prop_day_key_order_matches_text_order(a in 0i64..20_000, b in 0i64..20_000) {
            let base = DayKey::new(ymd(1990, 1, 1));
            let ka = base.offset(a).unwrap();
            let kb = base.offset(b).unwrap();
            prop_assert_eq!(ka.cmp(&kb), ka.to_string().cmp(&kb.to_string()));
        }
    }
}
