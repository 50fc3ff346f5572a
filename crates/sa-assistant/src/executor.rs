//! Tool executor: runs one named tool call and remembers it.
//!
//! Every call, successful or not, comes back as a `ToolCallRecord` and is
//! appended to the conversation's recent-action log. Unknown tools and tool
//! errors become structured failures; nothing here returns `Err`.

use std::time::Instant;

use chrono::Utc;
use sa_protocol::{ActionLogEntry, ConversationContext, ToolCallRecord, ToolOutcome};
use sa_tools::AvailabilityBackend;
use serde_json::Value;

use crate::registry::ToolRegistry;

pub struct ToolExecutor<'a> {
    registry: &'a ToolRegistry,
    backend: &'a dyn AvailabilityBackend,
}

impl<'a> ToolExecutor<'a> {
    pub fn new(registry: &'a ToolRegistry, backend: &'a dyn AvailabilityBackend) -> Self {
        Self { registry, backend }
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.registry
    }

    /// Execute `tool_name` with `parameters` and log it into `context`.
    pub async fn execute(
        &self,
        tool_name: &str,
        parameters: Value,
        context: &mut ConversationContext,
    ) -> ToolCallRecord {
        let start = Instant::now();

        let result = match self.registry.lookup(tool_name) {
            None => {
                tracing::warn!(tool = %tool_name, "unknown tool requested");
                ToolOutcome::failure(
                    format!("Tool '{tool_name}' not found"),
                    format!("unknown tool: {tool_name}"),
                )
            }
            Some(tool) => match tool.execute(parameters.clone(), self.backend).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(tool = %tool_name, error = %err, "tool execution failed");
                    ToolOutcome::failure(format!("{tool_name} failed"), err.to_string())
                }
            },
        };

        tracing::info!(
            tool = %tool_name,
            success = result.success,
            latency_ms = start.elapsed().as_millis() as u64,
            "tool call finished"
        );

        context.record(ActionLogEntry {
            tool: tool_name.to_string(),
            parameters: parameters.clone(),
            success: result.success,
            message: result.error.clone().unwrap_or_else(|| result.message.clone()),
            at: Utc::now(),
        });

        ToolCallRecord {
            tool_name: tool_name.to_string(),
            parameters,
            result,
        }
    }
}
