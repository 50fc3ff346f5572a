//! get_availability_data: list slots with counts, the next open slot, and
//! optional analysis, metrics, and optimization sections.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Datelike;
use sa_protocol::{ParamKind, ParameterSpec, Slot, SlotStatus, ToolDefinition, ToolName, ToolOutcome, weekday_index};
use serde_json::{Value, json};

use super::{flag, opt_date, opt_status, opt_weekdays};
use crate::backend::AvailabilityBackend;
use crate::error::ToolResult;
use crate::types::{AvailabilityTool, SlotQuery};

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub struct GetAvailabilityData;

#[async_trait]
impl AvailabilityTool for GetAvailabilityData {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            ToolName::GetAvailabilityData,
            "Query availability slots in a date range with counts and optional analysis",
        )
        .param(ParameterSpec::new("startDate", ParamKind::Date, "First day to include (YYYY-MM-DD)"))
        .param(ParameterSpec::new("endDate", ParamKind::Date, "Last day to include (YYYY-MM-DD)"))
        .param(
            ParameterSpec::new("status", ParamKind::String, "Only slots with this status")
                .one_of(&["available", "booked", "cancelled"]),
        )
        .param(ParameterSpec::new(
            "weekdays",
            ParamKind::WeekdayList,
            "Only these weekdays, 0 = Sunday",
        ))
        .param(ParameterSpec::new(
            "includeAnalysis",
            ParamKind::Boolean,
            "Add a per-weekday breakdown",
        ))
        .param(ParameterSpec::new(
            "includeMetrics",
            ParamKind::Boolean,
            "Add utilization metrics",
        ))
        .param(ParameterSpec::new(
            "includeOptimization",
            ParamKind::Boolean,
            "Add scheduling suggestions",
        ))
    }

    async fn execute(
        &self,
        args: Value,
        backend: &dyn AvailabilityBackend,
    ) -> ToolResult<ToolOutcome> {
        let query = SlotQuery {
            start_date: opt_date(&args, "startDate")?,
            end_date: opt_date(&args, "endDate")?,
            status: opt_status(&args)?,
            weekdays: opt_weekdays(&args)?,
            start_time: None,
        };
        let slots = backend.list_slots(&query).await?;

        let available = count(&slots, SlotStatus::Available);
        let booked = count(&slots, SlotStatus::Booked);
        let next_available = slots.iter().find(|s| s.status == SlotStatus::Available);

        let mut data = json!({
            "slots": slots,
            "totalSlots": slots.len(),
            "availableSlots": available,
            "bookedSlots": booked,
            "nextAvailable": next_available,
        });
        if flag(&args, "includeAnalysis") {
            data["analysis"] = analysis(&slots);
        }
        if flag(&args, "includeMetrics") {
            data["metrics"] = metrics(&slots);
        }
        if flag(&args, "includeOptimization") {
            data["optimization"] = optimization(&slots);
        }

        let total = slots.len();
        Ok(ToolOutcome::success(
            data,
            format!("Found {total} slots: {available} available, {booked} booked"),
        ))
    }
}

fn count(slots: &[Slot], status: SlotStatus) -> usize {
    slots.iter().filter(|s| s.status == status).count()
}

fn analysis(slots: &[Slot]) -> Value {
    let mut by_weekday: BTreeMap<u8, (usize, usize)> = BTreeMap::new();
    for slot in slots {
        let entry = by_weekday.entry(weekday_index(slot.date.weekday())).or_default();
        entry.0 += 1;
        if slot.is_booked() {
            entry.1 += 1;
        }
    }
    let busiest = by_weekday
        .iter()
        .max_by_key(|(day, (_, booked))| (*booked, std::cmp::Reverse(**day)))
        .filter(|(_, (_, booked))| *booked > 0)
        .map(|(day, _)| WEEKDAY_NAMES[usize::from(*day)]);
    json!({
        "byWeekday": by_weekday
            .iter()
            .map(|(day, (total, booked))| json!({
                "weekday": WEEKDAY_NAMES[usize::from(*day)],
                "total": total,
                "booked": booked,
            }))
            .collect::<Vec<_>>(),
        "busiestWeekday": busiest,
    })
}

fn metrics(slots: &[Slot]) -> Value {
    let total_minutes: i64 = slots.iter().map(Slot::duration_minutes).sum();
    let booked_minutes: i64 = slots
        .iter()
        .filter(|s| s.is_booked())
        .map(Slot::duration_minutes)
        .sum();
    let utilization = if total_minutes > 0 {
        booked_minutes as f64 / total_minutes as f64
    } else {
        0.0
    };
    json!({
        "totalMinutes": total_minutes,
        "bookedMinutes": booked_minutes,
        "utilizationRate": (utilization * 100.0).round() / 100.0,
    })
}

fn optimization(slots: &[Slot]) -> Value {
    let mut suggestions = Vec::new();
    if slots.is_empty() {
        suggestions.push("No slots in this range. Consider opening a few to accept bookings.".to_string());
    } else {
        let booked = count(slots, SlotStatus::Booked);
        let ratio = booked as f64 / slots.len() as f64;
        if ratio >= 0.8 {
            suggestions.push("Most slots are booked. Consider adding more availability.".to_string());
        } else if ratio <= 0.2 {
            suggestions.push("Few slots are booked. Consider consolidating availability.".to_string());
        }
        let cancelled = count(slots, SlotStatus::Cancelled);
        if cancelled > 0 {
            suggestions.push(format!("{cancelled} cancelled slots could be reopened or removed."));
        }
    }
    json!({ "suggestions": suggestions })
}
