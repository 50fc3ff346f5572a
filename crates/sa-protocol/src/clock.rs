use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Last representable minute of the day (23:59).
const LAST_MINUTE: u32 = 23 * 60 + 59;

/// Time of day with minute precision, serialized as 24-hour `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time '{0}', expected HH:MM")]
pub struct ParseClockTimeError(pub String);

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Add minutes, saturating at 23:59 so an end time never wraps
    /// around to before its start.
    pub fn plus_minutes(self, minutes: u32) -> Self {
        let total = self.minutes_since_midnight().saturating_add(minutes).min(LAST_MINUTE);
        Self::from_hm(total / 60, total % 60).unwrap_or(self)
    }

    /// Add minutes, or `None` when the result would pass 23:59.
    pub fn checked_plus_minutes(self, minutes: u32) -> Option<Self> {
        let total = self.minutes_since_midnight().checked_add(minutes)?;
        if total > LAST_MINUTE {
            return None;
        }
        Self::from_hm(total / 60, total % 60)
    }

    /// Signed number of minutes from `self` to `later`.
    pub fn minutes_until(&self, later: ClockTime) -> i64 {
        i64::from(later.minutes_since_midnight()) - i64::from(self.minutes_since_midnight())
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(t: NaiveTime) -> Self {
        // Drop seconds: the assistant works at minute granularity.
        Self::from_hm(t.hour(), t.minute()).unwrap_or(Self(t))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ParseClockTimeError(s.to_string()))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
