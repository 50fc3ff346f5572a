//! Relative and absolute date expressions resolved against "today".

use std::sync::LazyLock;

use chrono::{Datelike, Duration, Months, NaiveDate};
use regex::Regex;
use sa_protocol::{DateRange, weekday_index};

use crate::text::{WEEKDAY_ALT, parse_count, weekday_from_word};

const MONTH_ALT: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

static RE_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").unwrap());
static RE_US: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?\b").unwrap());
static RE_MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b({MONTH_ALT})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?\b"
    ))
    .unwrap()
});
static RE_DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTH_ALT})\b(?:,?\s+(\d{{4}}))?"
    ))
    .unwrap()
});
static RE_DAY_AFTER_TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bday\s+after\s+tomorrow\b").unwrap());
static RE_TODAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:today|tonight)\b").unwrap());
static RE_TOMORROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:tomorrow|tmrw|tmr)\b").unwrap());
static RE_YESTERDAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\byesterday\b").unwrap());
static RE_IN_N: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:in\s+(\w+)\s+(days?|weeks?)|(\w+)\s+(days?|weeks?)\s+from\s+now)\b").unwrap()
});
static RE_REST_OF_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\brest\s+of\s+(?:the|this)\s+week\b").unwrap());
static RE_WEEKEND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(this|next|coming)\s+weekend\b").unwrap());
static RE_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(this|next|last|coming|past)\s+week\b").unwrap());
static RE_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(this|next|last)\s+month\b").unwrap());
static RE_QUALIFIED_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(this|next|last|coming|past)\s+({WEEKDAY_ALT})\b")).unwrap()
});
static RE_BARE_WEEKDAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(every\s+|each\s+)?((?:{WEEKDAY_ALT})s?)\b")).unwrap()
});

/// First date expression found, as an inclusive range.
pub fn extract_dates(text: &str, today: NaiveDate) -> Option<DateRange> {
    dated_expression(text, today)
        .or_else(|| bare_weekday(text).map(|day| DateRange::single(upcoming_weekday(today, day))))
}

/// Every date form except a bare weekday name.
pub(crate) fn dated_expression(text: &str, today: NaiveDate) -> Option<DateRange> {
    if let Some(range) = absolute_dates(text, today) {
        return Some(range);
    }
    if RE_DAY_AFTER_TOMORROW.is_match(text) {
        return Some(DateRange::single(today + Duration::days(2)));
    }
    if RE_TODAY.is_match(text) {
        return Some(DateRange::single(today));
    }
    if RE_TOMORROW.is_match(text) {
        return Some(DateRange::single(today + Duration::days(1)));
    }
    if RE_YESTERDAY.is_match(text) {
        return Some(DateRange::single(today - Duration::days(1)));
    }
    if let Some(range) = in_n_units(text, today) {
        return Some(range);
    }
    if RE_REST_OF_WEEK.is_match(text) {
        let week = DateRange::iso_week_of(today);
        return Some(DateRange::new(today, week.end_date));
    }
    if let Some(caps) = RE_WEEKEND.captures(text) {
        let offset = if &caps[1] == "this" { 0 } else { 7 };
        let monday = DateRange::iso_week_of(today).start_date + Duration::days(offset);
        return Some(DateRange::new(
            monday + Duration::days(5),
            monday + Duration::days(6),
        ));
    }
    if let Some(caps) = RE_WEEK.captures(text) {
        let week = DateRange::iso_week_of(today);
        let shift = match &caps[1] {
            "next" | "coming" => 7,
            "last" | "past" => -7,
            _ => 0,
        };
        return Some(DateRange::new(
            week.start_date + Duration::days(shift),
            week.end_date + Duration::days(shift),
        ));
    }
    if let Some(caps) = RE_MONTH.captures(text) {
        let first = today.with_day(1)?;
        let start = match &caps[1] {
            "next" => first.checked_add_months(Months::new(1))?,
            "last" => first.checked_sub_months(Months::new(1))?,
            _ => first,
        };
        let end = start.checked_add_months(Months::new(1))? - Duration::days(1);
        return Some(DateRange::new(start, end));
    }
    if let Some(caps) = RE_QUALIFIED_WEEKDAY.captures(text) {
        let day = weekday_from_word(&caps[2])?;
        let date = match &caps[1] {
            "next" | "coming" => next_weekday(today, day),
            "last" | "past" => previous_weekday(today, day),
            _ => weekday_in_week(today, day),
        };
        return Some(DateRange::single(date));
    }
    None
}

/// First weekday named without "every"/"each" and not in plural form.
pub(crate) fn bare_weekday(text: &str) -> Option<u8> {
    RE_BARE_WEEKDAY.captures_iter(text).find_map(|caps| {
        let word = &caps[2];
        let plural = word.len() > 6 && word.ends_with('s');
        if caps.get(1).is_some() || plural {
            return None;
        }
        weekday_from_word(word)
    })
}

/// The given weekday 0–6 days from today (today included).
pub fn upcoming_weekday(today: NaiveDate, day: u8) -> NaiveDate {
    let current = weekday_index(today.weekday());
    let ahead = (i64::from(day) - i64::from(current)).rem_euclid(7);
    today + Duration::days(ahead)
}

/// The given weekday 1–7 days after today.
pub fn next_weekday(today: NaiveDate, day: u8) -> NaiveDate {
    upcoming_weekday(today + Duration::days(1), day)
}

/// The given weekday 1–7 days before today.
pub fn previous_weekday(today: NaiveDate, day: u8) -> NaiveDate {
    let current = weekday_index(today.weekday());
    let back = (i64::from(current) - i64::from(day)).rem_euclid(7);
    let back = if back == 0 { 7 } else { back };
    today - Duration::days(back)
}

/// The given weekday within today's Monday–Sunday week.
pub fn weekday_in_week(today: NaiveDate, day: u8) -> NaiveDate {
    let monday = DateRange::iso_week_of(today).start_date;
    monday + Duration::days((i64::from(day) + 6) % 7)
}

fn month_from_word(word: &str) -> Option<u32> {
    let m = match word.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(m)
}

fn parse_year(raw: Option<&str>, today: NaiveDate) -> Option<i32> {
    match raw {
        None => Some(today.year()),
        Some(y) if y.len() == 2 => y.parse::<i32>().ok().map(|y| 2000 + y),
        Some(y) => y.parse().ok(),
    }
}

/// ISO, US numeric, and month-name dates in order of appearance. One date
/// gives a single day; two or more give a range over the first two.
fn absolute_dates(text: &str, today: NaiveDate) -> Option<DateRange> {
    let mut found: Vec<(usize, NaiveDate)> = Vec::new();

    for caps in RE_ISO.captures_iter(text) {
        let date = caps[1].parse().ok().and_then(|y| {
            NaiveDate::from_ymd_opt(y, caps[2].parse().ok()?, caps[3].parse().ok()?)
        });
        if let (Some(date), Some(m)) = (date, caps.get(0)) {
            found.push((m.start(), date));
        }
    }
    for caps in RE_US.captures_iter(text) {
        let year = parse_year(caps.get(3).map(|m| m.as_str()), today);
        let date = year.and_then(|y| {
            NaiveDate::from_ymd_opt(y, caps[1].parse().ok()?, caps[2].parse().ok()?)
        });
        if let (Some(date), Some(m)) = (date, caps.get(0)) {
            found.push((m.start(), date));
        }
    }
    for caps in RE_MONTH_DAY.captures_iter(text) {
        let year = parse_year(caps.get(3).map(|m| m.as_str()), today);
        let date = year.and_then(|y| {
            NaiveDate::from_ymd_opt(y, month_from_word(&caps[1])?, caps[2].parse().ok()?)
        });
        if let (Some(date), Some(m)) = (date, caps.get(0)) {
            found.push((m.start(), date));
        }
    }
    for caps in RE_DAY_MONTH.captures_iter(text) {
        let year = parse_year(caps.get(3).map(|m| m.as_str()), today);
        let date = year.and_then(|y| {
            NaiveDate::from_ymd_opt(y, month_from_word(&caps[2])?, caps[1].parse().ok()?)
        });
        if let (Some(date), Some(m)) = (date, caps.get(0)) {
            found.push((m.start(), date));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.dedup_by_key(|(_, date)| *date);
    match found.as_slice() {
        [] => None,
        [(_, only)] => Some(DateRange::single(*only)),
        [(_, first), (_, second), ..] => Some(DateRange::new(*first, *second)),
    }
}

/// "in 3 days", "in two weeks", "5 days from now".
fn in_n_units(text: &str, today: NaiveDate) -> Option<DateRange> {
    let caps = RE_IN_N.captures(text)?;
    let (count, unit) = match (caps.get(1), caps.get(2)) {
        (Some(n), Some(u)) => (n.as_str(), u.as_str()),
        _ => (caps.get(3)?.as_str(), caps.get(4)?.as_str()),
    };
    let n = i64::from(parse_count(count)?);
    let days = if unit.starts_with("week") { n.checked_mul(7)? } else { n };
    today
        .checked_add_signed(Duration::try_days(days)?)
        .map(DateRange::single)
}
