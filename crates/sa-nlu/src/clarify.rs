//! Ambiguity and completeness checks that run before intent detection.
//!
//! The first check that fires ends the turn with a question instead of a
//! guess. Priority: date ambiguity, time ambiguity, missing information,
//! unsupported capability.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use sa_protocol::{DateRange, SuggestedOption, ToolCatalog};
use serde::Serialize;

use crate::entities::{
    dates, extract_times, extract_weekday_pattern, find_ambiguous_hour, next_weekday,
    previous_weekday,
};
use crate::text::{normalize, weekday_label};

static RE_BARE_WEEK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bweek\b").unwrap());
static RE_QUALIFIED_WEEK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:this|next|last|coming|past|every|each|per|a|one|of\s+the)\s+week\b").unwrap()
});
static RE_VAGUE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:later|soon|sometime|some\s+time|eventually|someday|at\s+some\s+point)\b").unwrap()
});
static RE_CREATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:create|add|make|book|set\s+up|block)\b|\bschedule\s+(?:a|an|some|new|me)\b").unwrap()
});
static RE_MODIFY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:update|change|modify|move|reschedule|edit)\b").unwrap()
});
static RE_DELETE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:delete|remove|clear|cancel|erase|wipe)\b").unwrap()
});
static RE_ALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:all|everything|every)\b").unwrap());
static RE_ANALYZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:analy[sz]e|analysis)\b").unwrap());
static RE_OPTIMIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:optimi[sz]e|optimi[sz]ation)\b").unwrap());
static RE_EXPORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bexport\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarificationKind {
    DateAmbiguity,
    TimeAmbiguity,
    MissingInformation,
    UnsupportedCapability,
}

/// A question to put back to the operator, with ready-made replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clarification {
    pub kind: ClarificationKind,
    pub response: String,
    pub suggested_options: Vec<SuggestedOption>,
}

impl Clarification {
    fn new(kind: ClarificationKind, response: impl Into<String>, options: Vec<SuggestedOption>) -> Self {
        Self {
            kind,
            response: response.into(),
            suggested_options: options,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Proceed,
    Clarify(Clarification),
}

/// Pre-intent gate for ambiguous, incomplete, or unsupported requests.
pub struct ConversationalChecker;

impl ConversationalChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, text: &str, now: NaiveDateTime, catalog: &ToolCatalog) -> CheckOutcome {
        let text = normalize(text);
        let today = now.date();
        let found = date_ambiguity(&text, today)
            .or_else(|| time_ambiguity(&text))
            .or_else(|| missing_information(&text, today))
            .or_else(|| unsupported_capability(&text, catalog));
        match found {
            Some(clarification) => {
                tracing::debug!(kind = ?clarification.kind, "clarification needed");
                CheckOutcome::Clarify(clarification)
            }
            None => CheckOutcome::Proceed,
        }
    }
}

impl Default for ConversationalChecker {
    fn default() -> Self {
        Self::new()
    }
}

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

fn date_ambiguity(text: &str, today: NaiveDate) -> Option<Clarification> {
    if dates::dated_expression(text, today).is_some() || extract_weekday_pattern(text).is_some() {
        return None;
    }

    if let Some(day) = dates::bare_weekday(text) {
        let name = weekday_label(day);
        let upcoming = next_weekday(today, day);
        let recent = previous_weekday(today, day);
        let response = format!(
            "Which {name} do you mean: the upcoming one ({}) or the most recent one ({})?",
            long_date(upcoming),
            long_date(recent)
        );
        let options = vec![
            SuggestedOption::new(format!("Next {name} ({upcoming})"), format!("next {}", name.to_lowercase()))
                .with_dates(DateRange::single(upcoming)),
            SuggestedOption::new(format!("Last {name} ({recent})"), format!("last {}", name.to_lowercase()))
                .with_dates(DateRange::single(recent)),
        ];
        return Some(Clarification::new(ClarificationKind::DateAmbiguity, response, options));
    }

    if RE_BARE_WEEK.is_match(text) && !RE_QUALIFIED_WEEK.is_match(text) {
        let this_week = DateRange::iso_week_of(today);
        let next_week = DateRange::iso_week_of(today + Duration::days(7));
        let response = format!(
            "Do you mean this week ({} to {}) or next week ({} to {})?",
            this_week.start_date, this_week.end_date, next_week.start_date, next_week.end_date
        );
        let options = vec![
            SuggestedOption::new("This week", "this week").with_dates(this_week),
            SuggestedOption::new("Next week", "next week").with_dates(next_week),
        ];
        return Some(Clarification::new(ClarificationKind::DateAmbiguity, response, options));
    }
    None
}

fn time_ambiguity(text: &str) -> Option<Clarification> {
    let hour = find_ambiguous_hour(text)?;
    let response = format!("Did you mean {hour}:00 AM or {hour}:00 PM?");
    let options = vec![
        SuggestedOption::new(format!("{hour}:00 AM"), format!("at {hour}am")),
        SuggestedOption::new(format!("{hour}:00 PM"), format!("at {hour}pm")),
    ];
    Some(Clarification::new(ClarificationKind::TimeAmbiguity, response, options))
}

fn missing_information(text: &str, today: NaiveDate) -> Option<Clarification> {
    let creating = RE_CREATE.is_match(text);
    let modifying = RE_MODIFY.is_match(text);
    let deleting = RE_DELETE.is_match(text);
    if !(creating || modifying || deleting) {
        return None;
    }

    if RE_VAGUE_TIME.is_match(text) {
        return Some(Clarification::new(
            ClarificationKind::MissingInformation,
            "Could you be more specific about when? Give me a day and a time.",
            vec![
                SuggestedOption::new("Tomorrow at 10am", "tomorrow at 10am"),
                SuggestedOption::new("This Friday at 2pm", "this friday at 2pm"),
                SuggestedOption::new("Next week", "next week"),
            ],
        ));
    }

    if creating && extract_times(text, 60).is_none() {
        return Some(Clarification::new(
            ClarificationKind::MissingInformation,
            "What time should the slot start? For example \"at 9am\" or \"from 2pm to 4pm\".",
            vec![
                SuggestedOption::new("9:00 AM", format!("{text} at 9am")),
                SuggestedOption::new("2:00 PM", format!("{text} at 2pm")),
            ],
        ));
    }

    let scoped = dates::extract_dates(text, today).is_some()
        || extract_times(text, 60).is_some()
        || extract_weekday_pattern(text).is_some()
        || RE_ALL.is_match(text);
    if (modifying || deleting) && !creating && !scoped {
        let verb = if deleting { "delete" } else { "update" };
        return Some(Clarification::new(
            ClarificationKind::MissingInformation,
            format!("Which slots should I {verb}? Give me a date or a time, or say \"all\"."),
            vec![
                SuggestedOption::new("Tomorrow", format!("{text} tomorrow")),
                SuggestedOption::new("This week", format!("{text} this week")),
            ],
        ));
    }
    None
}

fn unsupported_capability(text: &str, catalog: &ToolCatalog) -> Option<Clarification> {
    let missing = if RE_ANALYZE.is_match(text) && !catalog.any_declares("includeAnalysis") {
        "analyze"
    } else if RE_OPTIMIZE.is_match(text) && !catalog.any_declares("includeOptimization") {
        "optimize"
    } else if RE_EXPORT.is_match(text) && !catalog.any_declares("exportFormat") {
        "export"
    } else {
        return None;
    };
    tracing::debug!(capability = missing, "capability not in catalog");
    Some(Clarification::new(
        ClarificationKind::UnsupportedCapability,
        format!(
            "I can't {missing} that directly, but I can pull up your availability data so you can review it."
        ),
        vec![
            SuggestedOption::new("Show this week", "show my availability this week"),
            SuggestedOption::new("Show next week", "show my availability next week"),
        ],
    ))
}
