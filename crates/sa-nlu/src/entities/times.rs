//! Clock times normalized to 24-hour `HH:MM`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use sa_protocol::{ClockTime, TimeSpec};

use crate::text::contains_phrase;

static RE_SHARED_MERIDIEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(?:-|–|to)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").unwrap()
});
static RE_TWELVE_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").unwrap());
static RE_TWENTY_FOUR_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").unwrap());
static RE_NAMED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(noon|midday|midnight)\b").unwrap());
static RE_BARE_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:at|@|from|between|and|to|until|till|by)\s*(\d{1,2})\b").unwrap()
});
static RE_AT_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:at|@)\s*(\d{1,2})(?::(\d{2}))?\b").unwrap());
/// What may follow a number that is not an hour of day.
static RE_NOT_AN_HOUR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[:/.\-]\d|am\b|pm\b|h\b|hrs?\b|hours?\b|m\b|mins?\b|minutes?\b|days?\b|weeks?\b|months?\b|slots?\b|times?\b|%)").unwrap()
});

/// Part-of-day windows used when no explicit time is given.
const PARTS_OF_DAY: [(&[&str], (u32, u32)); 3] = [
    (&["morning"], (9, 12)),
    (&["afternoon"], (13, 17)),
    (&["evening", "tonight"], (17, 20)),
];

#[derive(Debug, Clone)]
struct Mention {
    span: Range<usize>,
    time: ClockTime,
}

/// Explicit times in order of appearance, or a part-of-day window.
///
/// One explicit time gets `end = start + fallback_minutes`, where the caller
/// supplies the stated duration or the contextual estimate.
pub fn extract_times(text: &str, fallback_minutes: u32) -> Option<TimeSpec> {
    let mentions = mentions(text);
    match mentions.as_slice() {
        [] => part_of_day(text),
        [only] => Some(TimeSpec {
            times: vec![only.time],
            start_time: only.time,
            end_time: only.time.plus_minutes(fallback_minutes),
            end_inferred: true,
        }),
        [first, second, ..] => Some(TimeSpec {
            times: mentions.iter().map(|m| m.time).collect(),
            start_time: first.time,
            end_time: second.time,
            end_inferred: false,
        }),
    }
}

/// Hour of the first "at N" with no am/pm that could be read either way.
pub fn find_ambiguous_hour(text: &str) -> Option<u32> {
    RE_AT_HOUR.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let tail = &text[whole.end()..];
        if RE_NOT_AN_HOUR.is_match(tail) {
            return None;
        }
        let raw = &caps[1];
        let hour: u32 = raw.parse().ok()?;
        // "at 09:30" is a deliberate 24-hour time.
        let zero_padded = caps.get(2).is_some() && raw.len() == 2;
        ((1..=11).contains(&hour) && !zero_padded).then_some(hour)
    })
}

fn mentions(text: &str) -> Vec<Mention> {
    let mut accepted: Vec<Mention> = Vec::new();
    let mut accept = |found: Vec<Mention>| {
        for m in found {
            let overlaps = accepted
                .iter()
                .any(|a| a.span.start < m.span.end && m.span.start < a.span.end);
            if !overlaps {
                accepted.push(m);
            }
        }
    };

    accept(shared_meridiem(text));
    accept(collect(&RE_TWELVE_HOUR, text, |c| {
        twelve_hour(c[1].parse().ok()?, minute(c.get(2))?, &c[3])
    }));
    accept(collect(&RE_TWENTY_FOUR_HOUR, text, |c| {
        let raw = &c[1];
        let hour: u32 = raw.parse().ok()?;
        let hour = if raw.len() == 1 { bare_hour(hour)? } else { hour };
        ClockTime::from_hm(hour, c[2].parse().ok()?)
    }));
    accept(collect(&RE_NAMED, text, |c| match &c[1] {
        "midnight" => ClockTime::from_hm(0, 0),
        _ => ClockTime::from_hm(12, 0),
    }));
    accept(bare_hours(text));

    accepted.sort_by_key(|m| m.span.start);
    accepted
}

fn collect(re: &Regex, text: &str, convert: impl Fn(&Captures<'_>) -> Option<ClockTime>) -> Vec<Mention> {
    re.captures_iter(text)
        .filter_map(|c| {
            let span = c.get(0)?.range();
            convert(&c).map(|time| Mention { span, time })
        })
        .collect()
}

/// "9-11am": the meridiem belongs to both ends unless that would put the
/// start after the end ("11-1pm" is 11:00–13:00).
fn shared_meridiem(text: &str) -> Vec<Mention> {
    RE_SHARED_MERIDIEM
        .captures_iter(text)
        .filter_map(|c| {
            let meridiem = &c[5];
            let end_hour: u32 = c[3].parse().ok()?;
            let end = twelve_hour(end_hour, minute(c.get(4))?, meridiem)?;
            let start_hour: u32 = c[1].parse().ok()?;
            let start_minute = minute(c.get(2))?;
            let mut start = twelve_hour(start_hour, start_minute, meridiem)?;
            if start > end {
                start = twelve_hour(start_hour, start_minute, if meridiem == "pm" { "am" } else { "pm" })?;
            }
            let first = c.get(1)?;
            let second = c.get(3)?;
            Some([
                Mention {
                    span: first.start()..first.end(),
                    time: start,
                },
                Mention {
                    span: second.start()..c.get(0)?.end(),
                    time: end,
                },
            ])
        })
        .flatten()
        .collect()
}

fn bare_hours(text: &str) -> Vec<Mention> {
    RE_BARE_HOUR
        .captures_iter(text)
        .filter_map(|c| {
            let digits = c.get(1)?;
            if RE_NOT_AN_HOUR.is_match(&text[digits.end()..]) {
                return None;
            }
            let hour = bare_hour(digits.as_str().parse().ok()?)?;
            Some(Mention {
                span: digits.range(),
                time: ClockTime::from_hm(hour, 0)?,
            })
        })
        .collect()
}

fn minute(raw: Option<regex::Match<'_>>) -> Option<u32> {
    match raw {
        Some(m) => m.as_str().parse().ok().filter(|m| *m < 60),
        None => Some(0),
    }
}

fn twelve_hour(hour: u32, minute: u32, meridiem: &str) -> Option<ClockTime> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match (meridiem, hour) {
        ("am", 12) => 0,
        ("am", h) => h,
        ("pm", 12) => 12,
        (_, h) => h + 12,
    };
    ClockTime::from_hm(hour, minute)
}

/// Reading of an hour given without am/pm: 1–7 are afternoon, 8–11 are
/// morning, 12 is noon, and 0 or 13–23 are already 24-hour.
fn bare_hour(hour: u32) -> Option<u32> {
    match hour {
        1..=7 => Some(hour + 12),
        0 | 8..=23 => Some(hour),
        _ => None,
    }
}

fn part_of_day(text: &str) -> Option<TimeSpec> {
    PARTS_OF_DAY.iter().find_map(|(words, (start, end))| {
        if !contains_phrase(text, words) {
            return None;
        }
        Some(TimeSpec {
            times: Vec::new(),
            start_time: ClockTime::from_hm(*start, 0)?,
            end_time: ClockTime::from_hm(*end, 0)?,
            end_inferred: false,
        })
    })
}
