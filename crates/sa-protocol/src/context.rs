//! Per-conversation mutable state.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on the recent-action log.
pub const MAX_RECENT_ACTIONS: usize = 10;

/// One executed (or attempted) tool call, as remembered by the context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    /// Tool name as requested. May not name a registered tool.
    pub tool: String,
    pub parameters: serde_json::Value,
    pub success: bool,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl ActionLogEntry {
    pub fn log_line(&self) -> String {
        let outcome = if self.success { "ok" } else { "failed" };
        format!("{} [{outcome}] {} {}", self.tool, self.parameters, self.message)
    }
}

/// Conversation state owned by a single session and passed into every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub user_id: String,
    pub current_page: String,
    /// Operator's local wall-clock "now"; relative dates resolve against it.
    pub now: NaiveDateTime,
    /// Newest first, never longer than [`MAX_RECENT_ACTIONS`].
    #[serde(deserialize_with = "bounded_actions")]
    recent_actions: VecDeque<ActionLogEntry>,
}

/// Stored logs longer than the bound keep their newest entries.
fn bounded_actions<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<VecDeque<ActionLogEntry>, D::Error> {
    let mut actions = VecDeque::<ActionLogEntry>::deserialize(deserializer)?;
    actions.truncate(MAX_RECENT_ACTIONS);
    Ok(actions)
}

impl ConversationContext {
    pub fn new(
        user_id: impl Into<String>,
        current_page: impl Into<String>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            current_page: current_page.into(),
            now,
            recent_actions: VecDeque::with_capacity(MAX_RECENT_ACTIONS),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    pub fn set_now(&mut self, now: NaiveDateTime) {
        self.now = now;
    }

    pub fn set_page(&mut self, page: impl Into<String>) {
        self.current_page = page.into();
    }

    /// Push an entry to the front, evicting the oldest past the bound.
    pub fn record(&mut self, entry: ActionLogEntry) {
        self.recent_actions.push_front(entry);
        self.recent_actions.truncate(MAX_RECENT_ACTIONS);
    }

    /// Newest first.
    pub fn recent_actions(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.recent_actions.iter()
    }

    pub fn latest_action(&self) -> Option<&ActionLogEntry> {
        self.recent_actions.front()
    }

    pub fn has_recent_actions(&self) -> bool {
        !self.recent_actions.is_empty()
    }

    pub fn recent_action_count(&self) -> usize {
        self.recent_actions.len()
    }

    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            user_id: self.user_id.clone(),
            current_page: self.current_page.clone(),
            now: self.now,
            recent_actions: self.recent_actions.iter().map(|a| a.log_line()).collect(),
        }
    }
}

/// Frozen view of the context attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    pub user_id: String,
    pub current_page: String,
    pub now: NaiveDateTime,
    pub recent_actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> ConversationContext {
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        ConversationContext::new("user-1", "availability", now)
    }

    fn entry(n: usize) -> ActionLogEntry {
        ActionLogEntry {
            tool: format!("tool_{n}"),
            parameters: json!({}),
            success: true,
            message: String::new(),
            at: Utc::now(),
        }
    }

    #[test]
    fn record_keeps_newest_first() {
        let mut c = ctx();
        c.record(entry(1));
        c.record(entry(2));
        assert_eq!(c.latest_action().unwrap().tool, "tool_2");
    }

    #[test]
    fn record_evicts_oldest_past_bound() {
        let mut c = ctx();
        for n in 0..25 {
            c.record(entry(n));
        }
        assert_eq!(c.recent_action_count(), MAX_RECENT_ACTIONS);
        let tools: Vec<&str> = c.recent_actions().map(|a| a.tool.as_str()).collect();
        assert_eq!(tools.first(), Some(&"tool_24"));
        assert_eq!(tools.last(), Some(&"tool_15"));
    }

    #[test]
    fn deserialize_truncates_oversized_log() {
        let entries: Vec<ActionLogEntry> = (0..25).rev().map(entry).collect();
        let raw = json!({
            "userId": "user-1",
            "currentPage": "availability",
            "now": "2024-01-15T10:00:00",
            "recentActions": entries,
        });
        let c: ConversationContext = serde_json::from_value(raw).unwrap();
        assert_eq!(c.recent_action_count(), MAX_RECENT_ACTIONS);
        let tools: Vec<&str> = c.recent_actions().map(|a| a.tool.as_str()).collect();
        assert_eq!(tools.first(), Some(&"tool_24"));
        assert_eq!(tools.last(), Some(&"tool_15"));
    }

    #[test]
    fn snapshot_carries_log_lines() {
        let mut c = ctx();
        c.record(ActionLogEntry {
            tool: "get_availability_data".into(),
            parameters: json!({"startDate": "2024-01-16"}),
            success: false,
            message: "backend offline".into(),
            at: Utc::now(),
        });
        let snap = c.snapshot();
        assert_eq!(snap.recent_actions.len(), 1);
        assert!(snap.recent_actions[0].starts_with("get_availability_data [failed]"));
        assert!(snap.recent_actions[0].contains("2024-01-16"));
    }
}
