//! Day grouping, rolling windows and month grids

use crate::types::{ScheduleKind, ScheduledEvent};
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use seedtrace_core::{parse_day, serde_helpers::lenient_string, truncate_to_day, DayKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Anything that can be placed on a calendar day
pub trait Dated {
    /// Calendar day of the item, `None` when its date cannot be read
    fn day(&self) -> Option<NaiveDate>;
}

impl Dated for ScheduledEvent {
    #[inline]
    fn day(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    #[inline]
    fn day(&self) -> Option<NaiveDate> {
        (**self).day()
    }
}

/// Calendar item from an external feed, date kept as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
    /// `YYYY-MM-DD` or a full timestamp
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: ScheduleKind,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FeedEvent {
    /// Create feed item
    #[must_use]
    pub fn new(date: impl Into<String>, label: impl Into<String>, kind: ScheduleKind) -> Self {
        Self {
            date: date.into(),
            label: label.into(),
            kind,
            href: None,
            description: None,
        }
    }

    /// Calendar day in `tz`; bare dates are taken as written
    #[must_use]
    pub fn day_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<NaiveDate> {
        parse_day(&self.date, tz)
    }

    /// Resolve into a [`ScheduledEvent`] using `tz`
    #[must_use]
    pub fn resolve<Tz: TimeZone>(&self, tz: &Tz) -> Option<ScheduledEvent> {
        let date = self.day_in(tz)?;
        Some(ScheduledEvent {
            date,
            label: self.label.clone(),
            kind: self.kind,
            href: self.href.clone(),
            description: self.description.clone(),
        })
    }
}

impl Dated for FeedEvent {
    /// Timestamps are read in the local zone
    fn day(&self) -> Option<NaiveDate> {
        self.day_in(&Local)
    }
}

/// Group items by calendar day
///
/// Input order is preserved within each day. Items without a readable date are
/// dropped.
#[must_use]
pub fn group_by_date<T: Dated + Clone>(events: &[T]) -> BTreeMap<DayKey, Vec<T>> {
    let mut groups: BTreeMap<DayKey, Vec<T>> = BTreeMap::new();
    let mut dropped = 0usize;

    for event in events {
        match event.day() {
            Some(date) => groups.entry(DayKey::new(date)).or_default().push(event.clone()),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!("Dropped {} events with unreadable dates", dropped);
    }
    groups
}

/// Events falling on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket<T> {
    pub key: DayKey,
    pub events: Vec<T>,
}

impl<T> DayBucket<T> {
    /// Calendar date of the bucket
    #[inline]
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.key.date()
    }

    /// Whether nothing falls on this day
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Longest window [`window_events`] will lay out (ten years)
pub const MAX_WINDOW_DAYS: i64 = 3660;

/// `n` consecutive day buckets starting at the calendar day of `reference`
///
/// Days without events are present with an empty list. `n <= 0` yields no
/// buckets; `n` above [`MAX_WINDOW_DAYS`] is clamped to it.
#[must_use]
pub fn window_events<T, Tz>(events: &[T], reference: &DateTime<Tz>, n: i64) -> Vec<DayBucket<T>>
where
    T: Dated + Clone,
    Tz: TimeZone,
{
    if n <= 0 {
        return Vec::new();
    }
    if n > MAX_WINDOW_DAYS {
        tracing::warn!("Window of {} days clamped to {}", n, MAX_WINDOW_DAYS);
    }
    let n = n.min(MAX_WINDOW_DAYS);

    let start = DayKey::new(truncate_to_day(reference));
    let mut groups = group_by_date(events);

    (0..n)
        .map_while(|i| start.offset(i))
        .map(|key| DayBucket {
            key,
            events: groups.remove(&key).unwrap_or_default(),
        })
        .collect()
}

/// One day cell of a [`MonthGrid`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell<T> {
    pub key: DayKey,
    /// False for leading and trailing days from adjacent months
    pub in_month: bool,
    pub events: Vec<T>,
}

/// Sunday-first month calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid<T> {
    pub year: i32,
    pub month: u32,
    /// Full weeks, each exactly seven cells
    pub weeks: Vec<Vec<GridCell<T>>>,
}

impl<T: Dated + Clone> MonthGrid<T> {
    /// Lay out `year`-`month` and join `events` onto their days
    ///
    /// Events outside the displayed weeks are ignored. Returns `None` for an
    /// invalid month.
    #[must_use]
    pub fn build(year: i32, month: u32, events: &[T]) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let last = next_month.pred_opt()?;

        let start = DayKey::new(first).offset(-i64::from(first.weekday().num_days_from_sunday()))?;
        let end = DayKey::new(last).offset(i64::from(6 - last.weekday().num_days_from_sunday()))?;

        let mut groups = group_by_date(events);
        let mut weeks = Vec::new();
        let mut week = Vec::with_capacity(7);
        let mut cursor = start;

        while cursor <= end {
            let date = cursor.date();
            week.push(GridCell {
                key: cursor,
                in_month: date.year() == year && date.month() == month,
                events: groups.remove(&cursor).unwrap_or_default(),
            });
            if week.len() == 7 {
                weeks.push(std::mem::replace(&mut week, Vec::with_capacity(7)));
            }
            cursor = cursor.offset(1)?;
        }

        Some(Self { year, month, weeks })
    }

    /// Cells that belong to the month itself
    pub fn days(&self) -> impl Iterator<Item = &GridCell<T>> {
        self.weeks.iter().flatten().filter(|cell| cell.in_month)
    }
}
