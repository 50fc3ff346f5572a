//! Duration phrases: "2 hours", "90 min", "1.5h", "half an hour", "two-hour".

use std::sync::LazyLock;

use regex::{Captures, Regex};
use sa_protocol::DurationSpec;

use crate::text::{contains_phrase, number_word};

/// Duration assumed when none is stated and none can be inferred.
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

const MAX_MINUTES: u32 = 24 * 60;

type Rule = (LazyLock<Regex>, fn(&Captures<'_>) -> Option<u32>);

static RULES: [Rule; 8] = [
    // "1 hour 30 minutes", "2h 15m"
    (
        LazyLock::new(|| {
            Regex::new(r"\b(\d+)\s*(?:hours?|hrs?|h)\s*(?:and\s+)?(\d+)\s*(?:minutes?|mins?|m)\b")
                .unwrap()
        }),
        |c| {
            let hours: u32 = c[1].parse().ok()?;
            hours.checked_mul(60)?.checked_add(c[2].parse().ok()?)
        },
    ),
    // "an hour and a half", "one and a half hours"
    (
        LazyLock::new(|| {
            Regex::new(r"\b(?:an?|one)\s+(?:hour\s+and\s+a\s+half|and\s+a\s+half\s+hours?)\b")
                .unwrap()
        }),
        |_| Some(90),
    ),
    // "2 hours", "2-hour", "1.5h"
    (
        LazyLock::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*-?\s*(?:hours?|hrs?|h)\b").unwrap()),
        |c| {
            let hours: f64 = c[1].parse().ok()?;
            let minutes = (hours * 60.0).round();
            (minutes.is_finite() && (0.0..=f64::from(MAX_MINUTES)).contains(&minutes))
                .then_some(minutes as u32)
        },
    ),
    // "90 minutes", "45-min", "30m"
    (
        LazyLock::new(|| Regex::new(r"\b(\d+)\s*-?\s*(?:minutes?|mins?|m)\b").unwrap()),
        |c| c[1].parse().ok(),
    ),
    // "half an hour", "half-hour"
    (
        LazyLock::new(|| Regex::new(r"\bhalf\s*(?:-|an\s+)?\s*hour\b").unwrap()),
        |_| Some(30),
    ),
    // "quarter hour", "quarter of an hour"
    (
        LazyLock::new(|| Regex::new(r"\bquarter\s*(?:-|of\s+an\s+)?\s*hour\b").unwrap()),
        |_| Some(15),
    ),
    // "two hours", "an hour", "three-hour"
    (
        LazyLock::new(|| {
            Regex::new(r"\b(an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)\s*-?\s*hours?\b")
                .unwrap()
        }),
        |c| number_word(&c[1]).map(|n| n * 60),
    ),
    // "fifteen minutes", "thirty-minute"
    (
        LazyLock::new(|| {
            Regex::new(r"\b(ten|fifteen|twenty|thirty|forty[- ]five|forty|fifty|ninety)\s*-?\s*min(?:ute)?s?\b")
                .unwrap()
        }),
        |c| match &c[1] {
            "ten" => Some(10),
            "fifteen" => Some(15),
            "twenty" => Some(20),
            "thirty" => Some(30),
            "forty" => Some(40),
            "fifty" => Some(50),
            "ninety" => Some(90),
            _ => Some(45),
        },
    ),
];

/// First duration phrase in rule order, in minutes. The first rule that
/// matches decides: an out-of-range amount gives `None` rather than a
/// shorter phrase found later in the text.
pub fn extract_duration(text: &str) -> Option<DurationSpec> {
    let (caps, convert) = RULES
        .iter()
        .find_map(|(re, convert)| Some((re.captures(text)?, convert)))?;
    let minutes = convert(&caps)?;
    (minutes > 0 && minutes <= MAX_MINUTES).then_some(DurationSpec { minutes })
}

/// Duration guessed from descriptive words when no explicit duration exists.
///
/// Modifiers ("quick", "long") outrank the noun, so "quick meeting" is 30m.
pub fn contextual_duration(text: &str) -> u32 {
    if contains_phrase(text, &["quick", "short", "brief"]) {
        30
    } else if contains_phrase(text, &["long", "extended"]) {
        120
    } else if contains_phrase(text, &["meeting", "call", "session"]) {
        60
    } else {
        DEFAULT_DURATION_MINUTES
    }
}
