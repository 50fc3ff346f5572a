//! Ordered pattern table for intent detection. The first matching rule wins,
//! so narrower intents (delete, update, recurring) sit above broader ones.

use std::sync::LazyLock;

use regex::Regex;
use sa_protocol::ToolName;

/// One row of the pattern table.
pub struct IntentRule {
    pub action: ToolName,
    pub pattern: LazyLock<Regex>,
    /// Base confidence before bonuses.
    pub weight: f64,
    /// Vocabulary counted for the keyword-density bonus.
    pub keywords: &'static [&'static str],
}

impl IntentRule {
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

const DELETE_WORDS: &[&str] = &["delete", "remove", "clear", "cancel", "erase", "wipe", "slot", "slots", "all"];
const UPDATE_WORDS: &[&str] = &[
    "update", "change", "modify", "move", "reschedule", "edit", "mark", "slot", "priority", "status",
];
const QUERY_WORDS: &[&str] = &[
    "show", "list", "display", "view", "see", "check", "find", "availability", "available", "slots",
    "schedule", "calendar", "free", "open", "booked",
];
const RECURRING_WORDS: &[&str] = &[
    "create", "add", "set", "schedule", "every", "each", "daily", "weekly", "recurring", "repeat",
    "weekdays", "weekends", "slots",
];
const CREATE_WORDS: &[&str] = &[
    "create", "add", "make", "set", "schedule", "open", "book", "block", "new", "slot", "availability",
];
const ANALYSIS_WORDS: &[&str] = &[
    "analyze", "analyse", "analysis", "metrics", "stats", "statistics", "optimize", "optimise",
    "insights", "utilization", "availability",
];

pub static RULES: [IntentRule; 9] = [
    IntentRule {
        action: ToolName::DeleteAvailabilitySlots,
        pattern: LazyLock::new(|| {
            Regex::new(r"\b(?:delete|remove|clear|cancel|erase|wipe|get rid of)\b.*\b(?:slots?|availability|appointments?|all|everything|them|it|times?)\b")
                .unwrap()
        }),
        weight: 0.7,
        keywords: DELETE_WORDS,
    },
    IntentRule {
        action: ToolName::UpdateAvailabilitySlot,
        pattern: LazyLock::new(|| {
            Regex::new(r"\b(?:update|change|modify|move|reschedule|edit|shift|mark)\b").unwrap()
        }),
        weight: 0.7,
        keywords: UPDATE_WORDS,
    },
    IntentRule {
        action: ToolName::GetAvailabilityData,
        pattern: LazyLock::new(|| {
            Regex::new(r"\b(?:show|list|display|view|see|check|find|what|when|which|how many|do i have|am i)\b.*\b(?:availability|available|slots?|schedule|calendar|free|open|booked|appointments?)\b")
                .unwrap()
        }),
        weight: 0.7,
        keywords: QUERY_WORDS,
    },
    IntentRule {
        action: ToolName::CreateRecurringSlots,
        pattern: LazyLock::new(|| {
            Regex::new(r"\b(?:create|add|make|set up|setup|schedule|open|block)\b.*\b(?:every|each|daily|weekly|recurring|repeating|weekdays|weekends|mondays|tuesdays|wednesdays|thursdays|fridays|saturdays|sundays)\b")
                .unwrap()
        }),
        weight: 0.7,
        keywords: RECURRING_WORDS,
    },
    IntentRule {
        action: ToolName::CreateRecurringSlots,
        pattern: LazyLock::new(|| Regex::new(r"\b(?:recurring|repeating)\s+(?:slots?|availability)\b").unwrap()),
        weight: 0.7,
        keywords: RECURRING_WORDS,
    },
    IntentRule {
        action: ToolName::CreateAvailabilitySlot,
        pattern: LazyLock::new(|| {
            Regex::new(r"\b(?:create|add|make|set up|setup|schedule|open|book|block|new)\b.*\b(?:slots?|availability|appointments?|time|meeting|call|session|block)\b")
                .unwrap()
        }),
        weight: 0.7,
        keywords: CREATE_WORDS,
    },
    IntentRule {
        action: ToolName::GetAvailabilityData,
        pattern: LazyLock::new(|| {
            Regex::new(r"\b(?:analy[sz]e|analysis|metrics|stats|statistics|optimi[sz]e|insights?|utili[sz]ation)\b").unwrap()
        }),
        weight: 0.7,
        keywords: ANALYSIS_WORDS,
    },
    IntentRule {
        action: ToolName::CreateAvailabilitySlot,
        pattern: LazyLock::new(|| Regex::new(r"\b(?:book|schedule)\b").unwrap()),
        weight: 0.6,
        keywords: CREATE_WORDS,
    },
    IntentRule {
        action: ToolName::GetAvailabilityData,
        pattern: LazyLock::new(|| {
            Regex::new(r"\b(?:availability|slots|schedule|calendar)\b").unwrap()
        }),
        weight: 0.6,
        keywords: QUERY_WORDS,
    },
];

/// First rule matching `text`, in table order.
pub fn first_match(text: &str) -> Option<&'static IntentRule> {
    RULES.iter().find(|rule| rule.matches(text))
}
