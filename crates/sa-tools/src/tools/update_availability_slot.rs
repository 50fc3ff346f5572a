//! update_availability_slot: change one existing slot.

use async_trait::async_trait;
use sa_protocol::{ParamKind, ParameterSpec, Slot, ToolDefinition, ToolName, ToolOutcome};
use serde_json::{Value, json};

use super::{end_after, opt_priority, opt_status, opt_time, opt_u32, req_date};
use crate::backend::AvailabilityBackend;
use crate::error::{ToolError, ToolResult};
use crate::types::{AvailabilityTool, SlotPatch, SlotQuery};

pub struct UpdateAvailabilitySlot;

#[async_trait]
impl AvailabilityTool for UpdateAvailabilitySlot {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            ToolName::UpdateAvailabilitySlot,
            "Move one slot or change its end time, status, or priority",
        )
        .param(ParameterSpec::new("date", ParamKind::Date, "Day of the slot (YYYY-MM-DD)").required())
        .param(ParameterSpec::new(
            "startTime",
            ParamKind::Time,
            "Start time identifying the slot when the day has several",
        ))
        .param(ParameterSpec::new(
            "newStartTime",
            ParamKind::Time,
            "Move the slot to this start time, keeping its length unless an end is given",
        ))
        .param(ParameterSpec::new("endTime", ParamKind::Time, "New end time"))
        .param(ParameterSpec::new("duration", ParamKind::Integer, "New length in minutes"))
        .param(
            ParameterSpec::new("status", ParamKind::String, "New status")
                .one_of(&["available", "booked", "cancelled"]),
        )
        .param(
            ParameterSpec::new("priority", ParamKind::String, "New priority")
                .one_of(&["low", "normal", "high"]),
        )
    }

    async fn execute(
        &self,
        args: Value,
        backend: &dyn AvailabilityBackend,
    ) -> ToolResult<ToolOutcome> {
        let date = req_date(&args, "date")?;
        let query = SlotQuery {
            start_time: opt_time(&args, "startTime")?,
            ..SlotQuery::on(date)
        };
        let target = single_target(backend.list_slots(&query).await?, &query)?;

        let patch = patch_for(&args, &target)?;
        if patch.is_empty() {
            return Err(ToolError::invalid(
                "endTime",
                "nothing to change: give a new start, end time, duration, status, or priority",
            ));
        }
        let updated = backend.update_slot(target.id, &patch).await?;
        tracing::info!(slot_id = %updated.id, %date, "slot updated");

        Ok(ToolOutcome::success(
            json!({ "slot": updated, "previous": target }),
            format!(
                "Updated the {} slot on {date}: now {} to {}, {}, {} priority",
                target.start_time, updated.start_time, updated.end_time, updated.status, updated.priority
            ),
        ))
    }
}

fn single_target(mut found: Vec<Slot>, query: &SlotQuery) -> ToolResult<Slot> {
    match found.len() {
        0 => Err(ToolError::NotFound(match (query.start_date, query.start_time) {
            (Some(date), Some(time)) => format!("no slot on {date} at {time}"),
            (Some(date), None) => format!("no slot on {date}"),
            _ => "no matching slot".to_string(),
        })),
        1 => Ok(found.remove(0)),
        n => Err(ToolError::invalid(
            "startTime",
            format!("{n} slots match that day; give a start time to pick one"),
        )),
    }
}

fn patch_for(args: &Value, target: &Slot) -> ToolResult<SlotPatch> {
    let new_start = opt_time(args, "newStartTime")?.filter(|t| *t != target.start_time);
    let start = new_start.unwrap_or(target.start_time);
    let end_time = match (opt_time(args, "endTime")?, opt_u32(args, "duration")?) {
        (Some(end), _) => Some(end),
        (None, Some(minutes)) => Some(end_after(start, minutes)?),
        // A move keeps the slot's length.
        (None, None) if new_start.is_some() => {
            let length = u32::try_from(target.duration_minutes()).unwrap_or(0);
            Some(end_after(start, length)?)
        }
        (None, None) => None,
    };
    if let Some(end) = end_time.filter(|e| start.minutes_until(*e) <= 0) {
        return Err(ToolError::invalid(
            "endTime",
            format!("{end} is not after the start time {start}"),
        ));
    }
    Ok(SlotPatch {
        start_time: new_start,
        end_time,
        status: opt_status(args)?,
        priority: opt_priority(args)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sa_protocol::{Priority, SlotStatus};

    use super::*;
    use crate::mock::MockAvailabilityBackend;

    fn backend() -> MockAvailabilityBackend {
        MockAvailabilityBackend::with_sample_week(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    #[tokio::test]
    async fn updates_slot_picked_by_start_time() {
        let backend = backend();
        let result = UpdateAvailabilitySlot
            .execute(
                json!({ "date": "2024-01-16", "startTime": "14:00", "duration": 90, "priority": "high" }),
                &backend,
            )
            .await
            .unwrap();
        let slot = &result.data.as_ref().unwrap()["slot"];
        assert_eq!(slot["endTime"], "15:30");
        assert_eq!(slot["priority"], "high");
        assert!(result.message.contains("14:00 to 15:30"));

        let stored = backend.all_slots().await;
        let changed = stored
            .iter()
            .find(|s| s.date.to_string() == "2024-01-16" && s.start_time.to_string() == "14:00")
            .unwrap();
        assert_eq!(changed.priority, Priority::High);
    }

    #[tokio::test]
    async fn move_keeps_the_slot_length() {
        let backend = backend();
        let result = UpdateAvailabilitySlot
            .execute(
                json!({ "date": "2024-01-16", "startTime": "09:00", "newStartTime": "10:00" }),
                &backend,
            )
            .await
            .unwrap();
        let slot = &result.data.as_ref().unwrap()["slot"];
        assert_eq!(slot["startTime"], "10:00");
        assert_eq!(slot["endTime"], "11:00");
        assert!(result.message.starts_with("Updated the 09:00 slot on 2024-01-16: now 10:00 to 11:00"));

        let starts: Vec<String> = backend
            .all_slots()
            .await
            .iter()
            .filter(|s| s.date.to_string() == "2024-01-16")
            .map(|s| s.start_time.to_string())
            .collect();
        assert!(starts.contains(&"10:00".to_string()));
        assert!(!starts.contains(&"09:00".to_string()));
    }

    #[tokio::test]
    async fn move_with_new_end() {
        let backend = backend();
        let result = UpdateAvailabilitySlot
            .execute(
                json!({ "date": "2024-01-16", "startTime": "14:00", "newStartTime": "16:00", "endTime": "16:30" }),
                &backend,
            )
            .await
            .unwrap();
        let slot = &result.data.as_ref().unwrap()["slot"];
        assert_eq!(slot["startTime"], "16:00");
        assert_eq!(slot["endTime"], "16:30");
    }

    #[tokio::test]
    async fn move_past_midnight_is_rejected() {
        let backend = backend();
        let err = UpdateAvailabilitySlot
            .execute(
                json!({ "date": "2024-01-16", "startTime": "14:00", "newStartTime": "23:30" }),
                &backend,
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("past midnight"));
        assert!(
            backend
                .all_slots()
                .await
                .iter()
                .any(|s| s.date.to_string() == "2024-01-16" && s.start_time.to_string() == "14:00")
        );
    }

    #[tokio::test]
    async fn duration_past_midnight_is_rejected() {
        let backend = MockAvailabilityBackend::with_slots(vec![Slot::new(
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            "23:00".parse().unwrap(),
            "23:30".parse().unwrap(),
        )]);
        let err = UpdateAvailabilitySlot
            .execute(json!({ "date": "2024-01-20", "duration": 120 }), &backend)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("past midnight"));
        assert_eq!(backend.all_slots().await[0].end_time.to_string(), "23:30");
    }

    #[tokio::test]
    async fn several_slots_need_a_start_time() {
        let backend = backend();
        let err = UpdateAvailabilitySlot
            .execute(json!({ "date": "2024-01-16", "status": "booked" }), &backend)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("give a start time"));
    }

    #[tokio::test]
    async fn single_slot_day_needs_no_start_time() {
        let backend = MockAvailabilityBackend::with_slots(vec![Slot::new(
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            "10:00".parse().unwrap(),
            "11:00".parse().unwrap(),
        )]);
        UpdateAvailabilitySlot
            .execute(json!({ "date": "2024-01-20", "status": "cancelled" }), &backend)
            .await
            .unwrap();
        assert_eq!(backend.all_slots().await[0].status, SlotStatus::Cancelled);
    }

    #[tokio::test]
    async fn missing_slot_is_not_found() {
        let backend = backend();
        let err = UpdateAvailabilitySlot
            .execute(json!({ "date": "2024-02-01", "status": "booked" }), &backend)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "not found: no slot on 2024-02-01");
    }

    #[tokio::test]
    async fn empty_patch_is_rejected() {
        let backend = backend();
        let err = UpdateAvailabilitySlot
            .execute(json!({ "date": "2024-01-16", "startTime": "09:00" }), &backend)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nothing to change"));
    }
}
