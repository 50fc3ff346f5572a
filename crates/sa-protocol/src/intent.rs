use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of operations the assistant can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    GetAvailabilityData,
    CreateAvailabilitySlot,
    CreateRecurringSlots,
    UpdateAvailabilitySlot,
    DeleteAvailabilitySlots,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        Self::GetAvailabilityData,
        Self::CreateAvailabilitySlot,
        Self::CreateRecurringSlots,
        Self::UpdateAvailabilitySlot,
        Self::DeleteAvailabilitySlots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetAvailabilityData => "get_availability_data",
            Self::CreateAvailabilitySlot => "create_availability_slot",
            Self::CreateRecurringSlots => "create_recurring_slots",
            Self::UpdateAvailabilitySlot => "update_availability_slot",
            Self::DeleteAvailabilitySlots => "delete_availability_slots",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool: {0}")]
pub struct UnknownToolError(pub String);

impl FromStr for ToolName {
    type Err = UnknownToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownToolError(s.to_string()))
    }
}

/// Which scoring strategy produced an intent.
///
/// Declaration order is the tie-break precedence: when two strategies
/// report the same confidence the earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Pattern,
    Semantic,
    Contextual,
}

/// Outcome of intent detection for a single message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    pub action: Option<ToolName>,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub canned_response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
}

impl IntentResult {
    pub fn new(
        action: ToolName,
        confidence: f64,
        canned_response: impl Into<String>,
        strategy: Strategy,
    ) -> Self {
        Self {
            action: Some(action),
            confidence: confidence.clamp(0.0, 1.0),
            canned_response: canned_response.into(),
            strategy: Some(strategy),
        }
    }

    /// No recognised action.
    pub fn none(canned_response: impl Into<String>) -> Self {
        Self {
            action: None,
            confidence: 0.0,
            canned_response: canned_response.into(),
            strategy: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.action.is_some()
    }
}
