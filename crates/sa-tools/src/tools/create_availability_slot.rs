//! create_availability_slot: open a single slot.

use async_trait::async_trait;
use sa_protocol::{ParamKind, ParameterSpec, Slot, ToolDefinition, ToolName, ToolOutcome};
use serde_json::{Value, json};

use super::{opt_priority, req_date, req_time, resolve_end};
use crate::backend::AvailabilityBackend;
use crate::error::ToolResult;
use crate::types::AvailabilityTool;

pub struct CreateAvailabilitySlot;

#[async_trait]
impl AvailabilityTool for CreateAvailabilitySlot {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            ToolName::CreateAvailabilitySlot,
            "Create one availability slot on a given day",
        )
        .param(ParameterSpec::new("date", ParamKind::Date, "Day of the slot (YYYY-MM-DD)").required())
        .param(ParameterSpec::new("startTime", ParamKind::Time, "Start time (HH:MM, 24-hour)").required())
        .param(ParameterSpec::new("endTime", ParamKind::Time, "End time (HH:MM, 24-hour)"))
        .param(ParameterSpec::new(
            "duration",
            ParamKind::Integer,
            "Length in minutes when no end time is given",
        ))
        .param(
            ParameterSpec::new("priority", ParamKind::String, "Slot priority")
                .one_of(&["low", "normal", "high"]),
        )
    }

    async fn execute(
        &self,
        args: Value,
        backend: &dyn AvailabilityBackend,
    ) -> ToolResult<ToolOutcome> {
        let date = req_date(&args, "date")?;
        let start = req_time(&args, "startTime")?;
        let (end, minutes) = resolve_end(&args, start)?;

        let mut slot = Slot::new(date, start, end);
        if let Some(priority) = opt_priority(&args)? {
            slot.priority = priority;
        }
        let created = backend.insert_slots(vec![slot]).await?;
        tracing::info!(%date, %start, %end, "slot created");

        Ok(ToolOutcome::success(
            json!({ "slots": created, "created": created.len() }),
            format!("Created a {minutes}-minute slot on {date} from {start} to {end}"),
        ))
    }
}
