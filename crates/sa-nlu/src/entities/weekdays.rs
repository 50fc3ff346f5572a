//! Recurring weekday patterns: "weekdays", "weekends", "daily",
//! "monday to friday", "every tue and thu", "mondays and wednesdays".

use std::sync::LazyLock;

use regex::Regex;
use sa_protocol::{WeekdayPatternKind, WeekdaySet};

use crate::text::{WEEKDAY_ALT, weekday_from_word};

static RE_WEEKDAYS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:(?:every|each)\s+)?(?:weekdays?|business\s+days?|work\s*days?)\b").unwrap()
});
static RE_WEEKENDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:every\s+)?weekends\b|\bevery\s+weekend\b").unwrap());
static RE_DAILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:daily|every\s*day|each\s+day)\b").unwrap());
static RE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?:from\s+)?({WEEKDAY_ALT})s?\s*(?:-|–|to|through|thru|until|till)\s*({WEEKDAY_ALT})s?\b"
    ))
    .unwrap()
});
static RE_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(every\s+|each\s+)?((?:{WEEKDAY_ALT})s?)\b")).unwrap()
});

/// First weekday pattern found, as a Sunday-based set.
///
/// A single bare weekday ("on friday") is a date, not a pattern, and yields
/// `None`; it takes "every", a plural, or two or more days to form a set.
pub fn extract_weekday_pattern(text: &str) -> Option<WeekdaySet> {
    if RE_WEEKDAYS.is_match(text) {
        return Some(WeekdaySet::new(1..=5, WeekdayPatternKind::Weekdays));
    }
    if RE_WEEKENDS.is_match(text) {
        return Some(WeekdaySet::new([0, 6], WeekdayPatternKind::Weekends));
    }
    if RE_DAILY.is_match(text) {
        return Some(WeekdaySet::new(0..=6, WeekdayPatternKind::Daily));
    }
    if let Some(set) = weekday_range(text) {
        return Some(set);
    }
    weekday_list(text)
}

/// "monday to friday" → 1..=5; "fri-mon" wraps → {5, 6, 0, 1}.
fn weekday_range(text: &str) -> Option<WeekdaySet> {
    let caps = RE_RANGE.captures(text)?;
    let from = weekday_from_word(&caps[1])?;
    let to = weekday_from_word(&caps[2])?;
    let mut days = Vec::with_capacity(7);
    let mut day = from;
    loop {
        days.push(day);
        if day == to {
            break;
        }
        day = (day + 1) % 7;
    }
    Some(WeekdaySet::new(days, WeekdayPatternKind::Range))
}

fn weekday_list(text: &str) -> Option<WeekdaySet> {
    let mut days = Vec::new();
    let mut recurring = false;
    for caps in RE_MENTION.captures_iter(text) {
        let word = &caps[2];
        let Some(day) = weekday_from_word(word) else {
            continue;
        };
        // Plural full names ("mondays") read as recurring; "tues" is an alias.
        let plural = word.len() > 6 && word.ends_with('s');
        recurring |= caps.get(1).is_some() || plural;
        days.push(day);
    }
    let mut distinct = days.clone();
    distinct.sort_unstable();
    distinct.dedup();
    (recurring || distinct.len() >= 2).then(|| WeekdaySet::new(days, WeekdayPatternKind::List))
}
