//! Structured values pulled out of operator text by the entity extractor.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::slot::{Priority, SlotStatus};

/// Everything the extractor recognised in one message. Each field is
/// independent; `None` means nothing in that category matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEntities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dates: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times: Option<TimeSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<DurationSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday_pattern: Option<WeekdaySet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<EntityContext>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.dates.is_none()
            && self.times.is_none()
            && self.duration.is_none()
            && self.weekday_pattern.is_none()
            && self.context.is_none()
    }

    pub fn status(&self) -> Option<SlotStatus> {
        self.context.as_ref().and_then(|c| c.status)
    }

    pub fn priority(&self) -> Option<Priority> {
        self.context.as_ref().and_then(|c| c.priority)
    }
}

/// Inclusive calendar range. A single day has `start_date == end_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            end_date: date,
        }
    }

    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self {
                start_date: a,
                end_date: b,
            }
        } else {
            Self {
                start_date: b,
                end_date: a,
            }
        }
    }

    /// Monday–Sunday ISO week containing `date`.
    pub fn iso_week_of(date: NaiveDate) -> Self {
        let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        Self {
            start_date: monday,
            end_date: monday + Duration::days(6),
        }
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Explicit or inferred time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpec {
    /// Explicit time mentions in order of appearance. Empty when the window
    /// came from a part-of-day word such as "morning".
    pub times: Vec<ClockTime>,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    /// True when `end_time` was derived from a duration rather than stated.
    pub end_inferred: bool,
}

impl TimeSpec {
    pub fn span_minutes(&self) -> i64 {
        self.start_time.minutes_until(self.end_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationSpec {
    pub minutes: u32,
}

/// How a weekday set was expressed in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekdayPatternKind {
    Weekdays,
    Weekends,
    Daily,
    Range,
    List,
}

/// Sorted, de-duplicated set of weekdays, 0 = Sunday … 6 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdaySet {
    pub days: Vec<u8>,
    pub kind: WeekdayPatternKind,
}

impl WeekdaySet {
    pub fn new(days: impl IntoIterator<Item = u8>, kind: WeekdayPatternKind) -> Self {
        let mut days: Vec<u8> = days.into_iter().filter(|d| *d <= 6).collect();
        days.sort_unstable();
        days.dedup();
        Self { days, kind }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.days.contains(&weekday_index(date.weekday()))
    }
}

/// Sunday-based weekday number used across the wire format.
pub fn weekday_index(day: Weekday) -> u8 {
    day.num_days_from_sunday() as u8
}

/// Status and priority keywords found in the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}
