//! create_recurring_slots: open the same time window on a weekday pattern.

use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate};
use sa_protocol::{ParamKind, ParameterSpec, Slot, ToolDefinition, ToolName, ToolOutcome, weekday_index};
use serde_json::{Value, json};

use super::{opt_u32, opt_weekdays, req_date, req_time, resolve_end};
use crate::backend::AvailabilityBackend;
use crate::error::{ToolError, ToolResult};
use crate::types::AvailabilityTool;

/// Slots created when no count is given.
pub const DEFAULT_COUNT: u32 = 7;

/// Upper bound on slots per request.
pub const MAX_COUNT: u32 = 100;

/// How far ahead to look for matching days.
const SEARCH_DAYS: u64 = 2 * 366;

pub struct CreateRecurringSlots;

#[async_trait]
impl AvailabilityTool for CreateRecurringSlots {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            ToolName::CreateRecurringSlots,
            "Create a series of slots at the same time on a weekday pattern",
        )
        .param(ParameterSpec::new("startDate", ParamKind::Date, "First day of the series (YYYY-MM-DD)").required())
        .param(ParameterSpec::new("startTime", ParamKind::Time, "Start time (HH:MM, 24-hour)").required())
        .param(ParameterSpec::new("endTime", ParamKind::Time, "End time (HH:MM, 24-hour)"))
        .param(ParameterSpec::new("duration", ParamKind::Integer, "Length in minutes"))
        .param(ParameterSpec::new(
            "weekdays",
            ParamKind::WeekdayList,
            "Days to repeat on, 0 = Sunday",
        ))
        .param(
            ParameterSpec::new("pattern", ParamKind::String, "Repeat pattern")
                .one_of(&["daily", "weekdays", "weekends", "weekly", "custom"]),
        )
        .param(ParameterSpec::new("count", ParamKind::Integer, "Number of slots to create"))
    }

    async fn execute(
        &self,
        args: Value,
        backend: &dyn AvailabilityBackend,
    ) -> ToolResult<ToolOutcome> {
        let first_day = req_date(&args, "startDate")?;
        let start = req_time(&args, "startTime")?;
        let (end, _) = resolve_end(&args, start)?;
        let days = weekday_set(&args, first_day)?;
        let count = opt_u32(&args, "count")?.unwrap_or(DEFAULT_COUNT);
        if count == 0 || count > MAX_COUNT {
            return Err(ToolError::invalid("count", format!("must be between 1 and {MAX_COUNT}")));
        }

        let dates = series(first_day, &days, count as usize);
        let (Some(first), Some(last)) = (dates.first().copied(), dates.last().copied()) else {
            return Err(ToolError::Other("no matching days in the next two years".into()));
        };
        let slots = dates.into_iter().map(|d| Slot::new(d, start, end)).collect();
        let created = backend.insert_slots(slots).await?;
        tracing::info!(count = created.len(), %first, %last, "recurring slots created");

        Ok(ToolOutcome::success(
            json!({ "slots": created, "created": created.len(), "weekdays": days }),
            format!(
                "Created {} recurring slots from {first} to {last}, {start} to {end}",
                created.len()
            ),
        ))
    }
}

/// Explicit weekdays win; otherwise the pattern decides. "weekly" repeats on
/// the start day's weekday.
fn weekday_set(args: &Value, first_day: NaiveDate) -> ToolResult<Vec<u8>> {
    if let Some(days) = opt_weekdays(args)?.filter(|d| !d.is_empty()) {
        return Ok(days);
    }
    match args["pattern"].as_str().unwrap_or("daily") {
        "daily" => Ok((0..=6).collect()),
        "weekdays" => Ok((1..=5).collect()),
        "weekends" => Ok(vec![0, 6]),
        "weekly" => Ok(vec![weekday_index(first_day.weekday())]),
        "custom" => Err(ToolError::MissingArgument("weekdays")),
        other => Err(ToolError::invalid("pattern", format!("unknown pattern '{other}'"))),
    }
}

/// The first `count` days on or after `first_day` whose weekday is in `days`.
fn series(first_day: NaiveDate, days: &[u8], count: usize) -> Vec<NaiveDate> {
    (0..SEARCH_DAYS)
        .map_while(|offset| first_day.checked_add_days(Days::new(offset)))
        .filter(|d| days.contains(&weekday_index(d.weekday())))
        .take(count)
        .collect()
}
