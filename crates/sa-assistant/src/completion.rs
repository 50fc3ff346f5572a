//! Remote completion client.
//!
//! Posts the operator's message, a context snapshot, the tool catalog, and
//! recent history to the completion service and reads back a reply plus any
//! tool calls to run. Any failure here sends the turn to the local pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sa_protocol::{ContextSnapshot, Message, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RemoteConfig;
use crate::error::{CompletionError, CompletionResult};

/// Request body sent to the completion service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub message: String,
    pub context: ContextSnapshot,
    /// `[{name, description, parameters}]`.
    pub tools: Vec<Value>,
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
            timestamp: message.timestamp(),
        }
    }
}

/// Response body from the completion service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    pub response: String,
    #[serde(default)]
    pub tool_calls: Vec<RemoteToolCall>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

/// A tool the service wants run. The name is not validated here; unknown
/// names fail at execution time.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteToolCall {
    pub name: String,
    #[serde(default)]
    pub parameters: Value,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<CompletionResponse>;
}

/// HTTP client for the completion service.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionClient {
    pub fn new(config: &RemoteConfig) -> CompletionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> CompletionResult<CompletionResponse> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "completion service returned non-200");
            return Err(CompletionError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;
        if parsed.response.trim().is_empty() && parsed.tool_calls.is_empty() {
            return Err(CompletionError::InvalidResponse("empty response".into()));
        }

        tracing::debug!(tool_calls = parsed.tool_calls.len(), "completion received");
        Ok(parsed)
    }
}
