//! Turn extracted entities into tool arguments.

use std::sync::LazyLock;

use regex::Regex;
use sa_protocol::{ExtractedEntities, SlotStatus, ToolCatalog, ToolName, WeekdayPatternKind};
use serde_json::{Map, Value, json};

use crate::entities::contextual_duration;
use crate::text::{contains_phrase, normalize};

/// Slots created by a recurring request that gives no count.
pub const DEFAULT_RECURRING_COUNT: u32 = 7;

static RE_EXPLICIT_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,3})\s+(?:slots?|times|occurrences|sessions|appointments)\b").unwrap()
});
static RE_ALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:all|everything)\b").unwrap());
static RE_MOVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:move|reschedule|shift|push|bring)\b").unwrap());

const ANALYSIS_WORDS: &[&str] = &["analyze", "analyse", "analysis", "insight", "insights", "breakdown", "trends"];
const METRICS_WORDS: &[&str] = &[
    "metrics", "stats", "statistics", "how many", "count", "utilization", "utilisation", "summary",
];
const OPTIMIZATION_WORDS: &[&str] = &[
    "optimize", "optimise", "optimization", "improve", "suggest", "recommend", "best time",
];
const UNBOOKED_WORDS: &[&str] = &["unbooked", "available", "free", "open", "empty", "unused"];
const CERTAINTY_WORDS: &[&str] = &[
    "definitely", "for sure", "go ahead", "just do it", "without asking", "no need to confirm",
    "right now", "immediately", "force",
];
const HEDGING_WORDS: &[&str] = &[
    "maybe", "perhaps", "i think", "might", "could you", "would you", "if possible", "not sure",
];

/// Builds schema-conforming arguments for a chosen tool.
pub struct ParameterBuilder;

impl ParameterBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Arguments for `action` from `entities` and the raw operator text.
    ///
    /// Only keys declared by the tool's definition survive; an action the
    /// catalog does not know gets an empty map.
    pub fn build(
        &self,
        entities: &ExtractedEntities,
        action: ToolName,
        raw_text: &str,
        catalog: &ToolCatalog,
    ) -> Map<String, Value> {
        let text = normalize(raw_text);
        let mut params = common(entities);

        match action {
            ToolName::GetAvailabilityData => query_flags(&mut params, &text),
            ToolName::CreateAvailabilitySlot => creation(&mut params, entities, &text),
            ToolName::CreateRecurringSlots => {
                creation(&mut params, entities, &text);
                recurrence(&mut params, entities, &text);
            }
            ToolName::UpdateAvailabilitySlot => update(&mut params, entities, &text),
            ToolName::DeleteAvailabilitySlots => deletion(&mut params, entities, &text),
        }

        let Some(definition) = catalog.get(action) else {
            tracing::warn!(tool = %action, "tool missing from catalog, no parameters built");
            return Map::new();
        };
        let declared = definition.retain_declared(params);
        tracing::debug!(tool = %action, params = ?declared, "parameters built");
        declared
    }
}

impl Default for ParameterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Entities copied verbatim under every name a tool might declare.
fn common(entities: &ExtractedEntities) -> Map<String, Value> {
    let mut params = Map::new();
    if let Some(range) = entities.dates {
        params.insert("date".into(), json!(range.start_date.to_string()));
        params.insert("startDate".into(), json!(range.start_date.to_string()));
        params.insert("endDate".into(), json!(range.end_date.to_string()));
    }
    if let Some(times) = &entities.times {
        params.insert("startTime".into(), json!(times.start_time.to_string()));
        params.insert("endTime".into(), json!(times.end_time.to_string()));
    }
    if let Some(duration) = entities.duration {
        params.insert("duration".into(), json!(duration.minutes));
    }
    if let Some(pattern) = &entities.weekday_pattern {
        params.insert("weekdays".into(), json!(pattern.days));
    }
    if let Some(status) = entities.status() {
        params.insert("status".into(), json!(status.as_str()));
    }
    if let Some(priority) = entities.priority() {
        params.insert("priority".into(), json!(priority.as_str()));
    }
    params
}

fn query_flags(params: &mut Map<String, Value>, text: &str) {
    if contains_phrase(text, ANALYSIS_WORDS) {
        params.insert("includeAnalysis".into(), Value::Bool(true));
    }
    if contains_phrase(text, METRICS_WORDS) {
        params.insert("includeMetrics".into(), Value::Bool(true));
    }
    if contains_phrase(text, OPTIMIZATION_WORDS) {
        params.insert("includeOptimization".into(), Value::Bool(true));
    }
}

/// Fill in a duration and make the end time agree with it.
fn creation(params: &mut Map<String, Value>, entities: &ExtractedEntities, text: &str) {
    let minutes = match (&entities.times, entities.duration) {
        (_, Some(d)) => d.minutes,
        (Some(times), None) if !times.end_inferred && times.span_minutes() > 0 => {
            times.span_minutes() as u32
        }
        _ => contextual_duration(text),
    };
    params.insert("duration".into(), json!(minutes));
    if let Some(times) = entities.times.as_ref().filter(|t| t.end_inferred) {
        // Past midnight the tool gets start + duration and rejects it.
        match times.start_time.checked_plus_minutes(minutes) {
            Some(end) => params.insert("endTime".into(), json!(end.to_string())),
            None => params.remove("endTime"),
        };
    }
}

/// A lone time picks the slot to change; it says nothing about the new end.
/// "move my 9am to 10am" picks the slot by the first time and moves it to
/// the second; a move naming one time only gives the destination.
fn update(params: &mut Map<String, Value>, entities: &ExtractedEntities, text: &str) {
    let Some(times) = &entities.times else {
        return;
    };
    if RE_MOVE.is_match(text) {
        match times.times.as_slice() {
            [from, to, ..] => {
                params.insert("startTime".into(), json!(from.to_string()));
                params.insert("newStartTime".into(), json!(to.to_string()));
            }
            [to] => {
                params.remove("startTime");
                params.insert("newStartTime".into(), json!(to.to_string()));
            }
            [] => {}
        }
        if !times.times.is_empty() {
            params.remove("endTime");
            return;
        }
    }
    if times.end_inferred {
        params.remove("endTime");
    }
}

fn recurrence(params: &mut Map<String, Value>, entities: &ExtractedEntities, text: &str) {
    let pattern = match &entities.weekday_pattern {
        Some(set) => match set.kind {
            WeekdayPatternKind::Daily => "daily",
            WeekdayPatternKind::Weekdays => "weekdays",
            WeekdayPatternKind::Weekends => "weekends",
            WeekdayPatternKind::List if set.days.len() == 1 => "weekly",
            WeekdayPatternKind::Range | WeekdayPatternKind::List => "custom",
        },
        None if contains_phrase(text, &["weekly", "every week"]) => "weekly",
        None => "daily",
    };
    params.insert("pattern".into(), json!(pattern));
    params.insert("count".into(), json!(recurring_count(text)));
}

/// Explicit count, else "many" = 10 and "few" = 5, else the default.
pub fn recurring_count(text: &str) -> u32 {
    if let Some(n) = RE_EXPLICIT_COUNT
        .captures(text)
        .and_then(|c| c[1].parse::<u32>().ok())
        .filter(|n| *n > 0)
    {
        return n;
    }
    if contains_phrase(text, &["many", "lots of", "a lot of"]) {
        10
    } else if contains_phrase(text, &["few", "a couple", "several"]) {
        5
    } else {
        DEFAULT_RECURRING_COUNT
    }
}

fn deletion(params: &mut Map<String, Value>, entities: &ExtractedEntities, text: &str) {
    let only_unbooked = entities.status() == Some(SlotStatus::Available)
        || contains_phrase(text, UNBOOKED_WORDS);
    params.insert("onlyUnbooked".into(), Value::Bool(only_unbooked));
    if only_unbooked {
        params.remove("status");
    }

    // Hedged requests get a preview first; certain ones run straight away.
    let confirm = contains_phrase(text, HEDGING_WORDS) && !contains_phrase(text, CERTAINTY_WORDS);
    params.insert("confirm".into(), Value::Bool(confirm));

    let unscoped = entities.dates.is_none()
        && entities.times.is_none()
        && entities.weekday_pattern.is_none();
    if unscoped && RE_ALL.is_match(text) {
        params.insert("deleteAll".into(), Value::Bool(true));
    }

    // A part-of-day window ("morning") does not pin a start time.
    if entities.times.as_ref().is_some_and(|t| t.times.is_empty()) {
        params.remove("startTime");
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::entities::extract;

    /// Monday 2024-01-15, 10:00.
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn build(text: &str, action: ToolName) -> Map<String, Value> {
        let entities = extract(text, now());
        ParameterBuilder::new().build(&entities, action, text, &sa_tools::catalog())
    }

    #[test]
    fn availability_tomorrow() {
        let p = build("show my availability tomorrow", ToolName::GetAvailabilityData);
        assert_eq!(p["startDate"], "2024-01-16");
        assert_eq!(p["endDate"], "2024-01-16");
        assert!(!p.contains_key("date"));
        assert!(!p.contains_key("includeAnalysis"));
    }

    #[test]
    fn analysis_flags_from_verbs() {
        let p = build("analyze my stats and suggest improvements this week", ToolName::GetAvailabilityData);
        assert_eq!(p["includeAnalysis"], true);
        assert_eq!(p["includeMetrics"], true);
        assert_eq!(p["includeOptimization"], true);
    }

    #[test]
    fn two_hour_slot_at_nine() {
        let p = build("create a 2 hour slot tomorrow at 9am", ToolName::CreateAvailabilitySlot);
        assert_eq!(p["date"], "2024-01-16");
        assert_eq!(p["startTime"], "09:00");
        assert_eq!(p["endTime"], "11:00");
        assert_eq!(p["duration"], 120);
        assert!(!p.contains_key("startDate"));
        assert!(!p.contains_key("weekdays"));
    }

    #[test]
    fn creation_infers_duration_from_context() {
        let p = build("create a quick call slot tomorrow at 3pm", ToolName::CreateAvailabilitySlot);
        assert_eq!(p["duration"], 30);
        assert_eq!(p["endTime"], "15:30");
    }

    #[test]
    fn creation_window_sets_duration() {
        let p = build("add a slot tomorrow from 2pm to 4:30pm", ToolName::CreateAvailabilitySlot);
        assert_eq!(p["duration"], 150);
        assert_eq!(p["endTime"], "16:30");
    }

    #[test]
    fn recurring_pattern_and_count() {
        let p = build("create 12 slots every weekday at 9am", ToolName::CreateRecurringSlots);
        assert_eq!(p["pattern"], "weekdays");
        assert_eq!(p["count"], 12);
        assert_eq!(p["weekdays"], json!([1, 2, 3, 4, 5]));
        assert_eq!(p["startTime"], "09:00");
        assert!(!p.contains_key("date"));
    }

    #[test]
    fn recurring_count_words() {
        assert_eq!(recurring_count("create many slots on mondays"), 10);
        assert_eq!(recurring_count("a few slots every friday"), 5);
        assert_eq!(recurring_count("slots every friday"), DEFAULT_RECURRING_COUNT);
    }

    #[test]
    fn single_weekday_recurrence_is_weekly() {
        let p = build("add slots every friday at 2pm", ToolName::CreateRecurringSlots);
        assert_eq!(p["pattern"], "weekly");
        assert_eq!(p["weekdays"], json!([5]));
    }

    #[test]
    fn delete_unbooked_this_week() {
        let p = build("delete all unbooked slots this week", ToolName::DeleteAvailabilitySlots);
        assert_eq!(p["startDate"], "2024-01-15");
        assert_eq!(p["endDate"], "2024-01-21");
        assert_eq!(p["onlyUnbooked"], true);
        assert_eq!(p["confirm"], false);
        assert!(!p.contains_key("deleteAll"));
        assert!(!p.contains_key("status"));
    }

    #[test]
    fn delete_booked_filters_by_status() {
        let p = build("delete booked slots tomorrow", ToolName::DeleteAvailabilitySlots);
        assert_eq!(p["status"], "booked");
        assert_eq!(p["onlyUnbooked"], false);
        assert_eq!(p["startDate"], "2024-01-16");
    }

    #[test]
    fn hedged_delete_asks_first() {
        let p = build("could you maybe delete tomorrow's slots", ToolName::DeleteAvailabilitySlots);
        assert_eq!(p["confirm"], true);
        assert_eq!(p["onlyUnbooked"], false);
    }

    #[test]
    fn unscoped_delete_all() {
        let p = build("delete all slots", ToolName::DeleteAvailabilitySlots);
        assert_eq!(p["deleteAll"], true);
    }

    #[test]
    fn undeclared_keys_are_dropped() {
        let p = build("update tomorrow's urgent slot at 9am", ToolName::UpdateAvailabilitySlot);
        assert_eq!(p["priority"], "high");
        assert_eq!(p["date"], "2024-01-16");
        assert!(!p.contains_key("startDate"));
        assert!(!p.contains_key("endDate"));
        assert_eq!(p["startTime"], "09:00");
        assert!(!p.contains_key("endTime"));
    }

    #[test]
    fn update_keeps_explicit_new_end() {
        let p = build("change tomorrow's slot from 9am to 11am", ToolName::UpdateAvailabilitySlot);
        assert_eq!(p["startTime"], "09:00");
        assert_eq!(p["endTime"], "11:00");
    }

    #[test]
    fn move_between_two_times() {
        let p = build("move my 9am slot tomorrow to 10am", ToolName::UpdateAvailabilitySlot);
        assert_eq!(p["date"], "2024-01-16");
        assert_eq!(p["startTime"], "09:00");
        assert_eq!(p["newStartTime"], "10:00");
        assert!(!p.contains_key("endTime"));
    }

    #[test]
    fn move_with_only_a_destination() {
        let p = build("reschedule tomorrow's slot to 4pm", ToolName::UpdateAvailabilitySlot);
        assert_eq!(p["newStartTime"], "16:00");
        assert!(!p.contains_key("startTime"));
        assert!(!p.contains_key("endTime"));
    }

    #[test]
    fn creation_past_midnight_leaves_end_to_the_tool() {
        let p = build("create a 2 hour slot tomorrow at 11pm", ToolName::CreateAvailabilitySlot);
        assert_eq!(p["startTime"], "23:00");
        assert_eq!(p["duration"], 120);
        assert!(!p.contains_key("endTime"));
    }

    #[test]
    fn unknown_action_builds_nothing() {
        let entities = extract("show my availability tomorrow", now());
        let p = ParameterBuilder::new().build(
            &entities,
            ToolName::GetAvailabilityData,
            "show my availability tomorrow",
            &ToolCatalog::default(),
        );
        assert!(p.is_empty());
    }
}
