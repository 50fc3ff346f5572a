//! Pattern strategy: ordered rule table plus additive bonuses.

use std::sync::LazyLock;

use regex::Regex;
use sa_protocol::{IntentResult, Strategy};

use super::canned_response;
use super::rules::{IntentRule, first_match};
use crate::text::{contains_phrase, words};

/// Ceiling for any pattern-strategy confidence.
pub const PATTERN_CAP: f64 = 0.95;

const MAX_DENSITY_BONUS: f64 = 0.2;
const INDICATOR_BONUS: f64 = 0.1;
const LENGTH_BONUS: f64 = 0.05;
const TEMPORAL_BONUS: f64 = 0.08;

/// Phrases that mark a conversational request rather than a fragment.
const NL_INDICATORS: &[&str] = &[
    "please",
    "can you",
    "could you",
    "would you",
    "i want",
    "i'd like",
    "i would like",
    "i need",
    "help me",
    "let's",
];

static RE_TEMPORAL_PREPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:on|at|for|from|until|till|between|during|before|after|by)\b").unwrap()
});

/// Confidence for `text` under `rule`, or `None` if the rule does not match.
pub fn score(rule: &IntentRule, text: &str) -> Option<f64> {
    if !rule.matches(text) {
        return None;
    }
    let tokens = words(text);
    let mut confidence = rule.weight;

    if !tokens.is_empty() {
        let hits = tokens.iter().filter(|w| rule.keywords.contains(*w)).count();
        confidence += (hits as f64 / tokens.len() as f64).min(MAX_DENSITY_BONUS);
    }
    let indicators = NL_INDICATORS
        .iter()
        .filter(|p| contains_phrase(text, &[**p]))
        .count();
    confidence += indicators as f64 * INDICATOR_BONUS;
    if (3..=15).contains(&tokens.len()) {
        confidence += LENGTH_BONUS;
    }
    if RE_TEMPORAL_PREPOSITION.is_match(text) {
        confidence += TEMPORAL_BONUS;
    }
    Some(confidence.min(PATTERN_CAP))
}

/// Run the rule table against normalized text.
pub fn detect(text: &str) -> Option<IntentResult> {
    let rule = first_match(text)?;
    let confidence = score(rule, text)?;
    Some(IntentResult::new(
        rule.action,
        confidence,
        canned_response(rule.action),
        Strategy::Pattern,
    ))
}
