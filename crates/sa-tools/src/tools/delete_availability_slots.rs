//! delete_availability_slots: remove slots in a range, optionally only the
//! unbooked ones, optionally as a preview first.

use async_trait::async_trait;
use sa_protocol::{ParamKind, ParameterSpec, Slot, SlotStatus, ToolDefinition, ToolName, ToolOutcome};
use serde_json::{Value, json};
use uuid::Uuid;

use super::{flag, opt_date, opt_status, opt_time, opt_weekdays};
use crate::backend::AvailabilityBackend;
use crate::error::{ToolError, ToolResult};
use crate::types::{AvailabilityTool, SlotQuery};

pub struct DeleteAvailabilitySlots;

#[async_trait]
impl AvailabilityTool for DeleteAvailabilitySlots {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            ToolName::DeleteAvailabilitySlots,
            "Delete slots in a date range, or preview what would be deleted",
        )
        .param(ParameterSpec::new("startDate", ParamKind::Date, "First day to clear (YYYY-MM-DD)"))
        .param(ParameterSpec::new("endDate", ParamKind::Date, "Last day to clear (YYYY-MM-DD)"))
        .param(ParameterSpec::new("startTime", ParamKind::Time, "Only slots starting at this time"))
        .param(ParameterSpec::new(
            "weekdays",
            ParamKind::WeekdayList,
            "Only these weekdays, 0 = Sunday",
        ))
        .param(
            ParameterSpec::new("status", ParamKind::String, "Only slots with this status")
                .one_of(&["available", "booked", "cancelled"]),
        )
        .param(ParameterSpec::new(
            "onlyUnbooked",
            ParamKind::Boolean,
            "Keep booked slots",
        ))
        .param(ParameterSpec::new(
            "confirm",
            ParamKind::Boolean,
            "List the matching slots without deleting them",
        ))
        .param(ParameterSpec::new(
            "deleteAll",
            ParamKind::Boolean,
            "Allow a delete with no date or time scope",
        ))
    }

    async fn execute(
        &self,
        args: Value,
        backend: &dyn AvailabilityBackend,
    ) -> ToolResult<ToolOutcome> {
        let only_unbooked = flag(&args, "onlyUnbooked");
        let status = match (opt_status(&args)?, only_unbooked) {
            (Some(status), true) if status != SlotStatus::Available => {
                return Err(ToolError::invalid(
                    "status",
                    format!("onlyUnbooked keeps booked slots but status asks for {status} ones"),
                ));
            }
            (Some(status), _) => Some(status),
            (None, true) => Some(SlotStatus::Available),
            (None, false) => None,
        };
        let query = SlotQuery {
            start_date: opt_date(&args, "startDate")?,
            end_date: opt_date(&args, "endDate")?,
            start_time: opt_time(&args, "startTime")?,
            weekdays: opt_weekdays(&args)?,
            status,
        };
        if query.is_unscoped() && !flag(&args, "deleteAll") {
            return Err(ToolError::invalid(
                "startDate",
                "no date or time given; name the slots to delete or ask to delete all of them",
            ));
        }

        let matched = backend.list_slots(&query).await?;
        let booked = matched.iter().filter(|s| s.is_booked()).count();

        if flag(&args, "confirm") {
            tracing::debug!(matched = matched.len(), "delete preview");
            return Ok(ToolOutcome::success(
                json!({
                    "slots": matched,
                    "matched": matched.len(),
                    "deleted": 0,
                    "pendingConfirmation": true,
                }),
                preview_message(&matched, booked),
            ));
        }

        let ids: Vec<Uuid> = matched.iter().map(|s| s.id).collect();
        let deleted = if ids.is_empty() {
            0
        } else {
            backend.delete_slots(&ids).await?
        };
        tracing::info!(deleted, booked, only_unbooked, "slots deleted");

        let message = match (deleted, booked) {
            (0, _) => "No matching slots to delete".to_string(),
            (n, 0) => format!("Deleted {n} slots"),
            (n, b) => format!("Deleted {n} slots, including {b} booked"),
        };
        Ok(ToolOutcome::success(
            json!({ "matched": matched.len(), "deleted": deleted }),
            message,
        ))
    }
}

fn preview_message(matched: &[Slot], booked: usize) -> String {
    match (matched.first(), matched.last()) {
        (Some(first), Some(last)) => format!(
            "{} slots from {} to {} would be deleted ({booked} booked). Confirm to delete them.",
            matched.len(),
            first.date,
            last.date
        ),
        _ => "No matching slots to delete".to_string(),
    }
}
