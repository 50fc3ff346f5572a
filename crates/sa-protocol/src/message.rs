use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::ContextSnapshot;
use crate::entities::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// Which path produced an assistant message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrigin {
    /// The remote completion service answered.
    Remote,
    /// The local rule-based pipeline answered.
    Local,
}

/// Structured result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn success(data: serde_json::Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
            error: Some(error.into()),
        }
    }
}

/// A tool call together with the parameters it ran with and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub parameters: serde_json::Value,
    pub result: ToolOutcome,
}

/// A choice offered to the operator by a clarification turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedOption {
    pub label: String,
    /// Text the operator can send back verbatim to pick this option.
    pub reply: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<DateRange>,
}

impl SuggestedOption {
    pub fn new(label: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reply: reply.into(),
            dates: None,
        }
    }

    pub fn with_dates(mut self, dates: DateRange) -> Self {
        self.dates = Some(dates);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_snapshot: Option<ContextSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_options: Vec<SuggestedOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<ResponseOrigin>,
}

/// One entry in a session's message log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: Uuid,
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<MessageMetadata>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: None,
        }
    }

    pub fn assistant(content: impl Into<String>, metadata: MessageMetadata) -> Self {
        Self {
            id: Uuid::now_v7(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            metadata: Some(metadata),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn metadata(&self) -> Option<&MessageMetadata> {
        self.metadata.as_ref()
    }

    pub fn tool_calls(&self) -> &[ToolCallRecord] {
        self.metadata
            .as_ref()
            .map(|m| m.tool_calls.as_slice())
            .unwrap_or_default()
    }

    pub fn suggested_options(&self) -> &[SuggestedOption] {
        self.metadata
            .as_ref()
            .map(|m| m.suggested_options.as_slice())
            .unwrap_or_default()
    }

    pub fn origin(&self) -> Option<ResponseOrigin> {
        self.metadata.as_ref().and_then(|m| m.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_message_has_no_metadata() {
        let msg = Message::user("show my slots");
        assert_eq!(msg.role(), Role::User);
        assert!(msg.metadata().is_none());
        assert!(msg.tool_calls().is_empty());
    }

    #[test]
    fn assistant_message_exposes_tool_calls() {
        let meta = MessageMetadata {
            tool_calls: vec![ToolCallRecord {
                tool_name: "get_availability_data".into(),
                parameters: json!({"startDate": "2024-01-16"}),
                result: ToolOutcome::success(json!({"total": 2}), "Found 2 slots"),
            }],
            origin: Some(ResponseOrigin::Local),
            ..Default::default()
        };
        let msg = Message::assistant("Here you go", meta);
        assert_eq!(msg.tool_calls().len(), 1);
        assert_eq!(msg.origin(), Some(ResponseOrigin::Local));
    }

    #[test]
    fn failure_outcome_serializes_error() {
        let outcome = ToolOutcome::failure("Tool not found", "unknown tool: export");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "unknown tool: export");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn message_timestamp_is_iso8601() {
        let msg = Message::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(ts.contains('T'));
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
