//! The five availability tools and the argument helpers they share.

pub mod create_availability_slot;
pub mod create_recurring_slots;
pub mod delete_availability_slots;
pub mod get_availability_data;
pub mod update_availability_slot;

use chrono::NaiveDate;
use sa_protocol::{ClockTime, Priority, SlotStatus, ToolCatalog};
use serde_json::Value;

use crate::error::{ToolError, ToolResult};
use crate::types::AvailabilityTool;

pub use create_availability_slot::CreateAvailabilitySlot;
pub use create_recurring_slots::CreateRecurringSlots;
pub use delete_availability_slots::DeleteAvailabilitySlots;
pub use get_availability_data::GetAvailabilityData;
pub use update_availability_slot::UpdateAvailabilitySlot;

/// Slot length used when neither an end time nor a duration is given.
pub const DEFAULT_SLOT_MINUTES: u32 = 60;

/// Every tool, in catalog order.
pub fn all_tools() -> Vec<Box<dyn AvailabilityTool>> {
    vec![
        Box::new(GetAvailabilityData),
        Box::new(CreateAvailabilitySlot),
        Box::new(CreateRecurringSlots),
        Box::new(UpdateAvailabilitySlot),
        Box::new(DeleteAvailabilitySlots),
    ]
}

/// Definitions of every tool.
pub fn catalog() -> ToolCatalog {
    ToolCatalog::new(all_tools().iter().map(|t| t.definition()))
}

// ── Argument helpers ──────────────────────────────────────────

pub(crate) fn opt_date(args: &Value, name: &'static str) -> ToolResult<Option<NaiveDate>> {
    args[name]
        .as_str()
        .map(|s| {
            s.parse::<NaiveDate>()
                .map_err(|_| ToolError::invalid(name, format!("'{s}' is not a YYYY-MM-DD date")))
        })
        .transpose()
}

pub(crate) fn req_date(args: &Value, name: &'static str) -> ToolResult<NaiveDate> {
    opt_date(args, name)?.ok_or(ToolError::MissingArgument(name))
}

pub(crate) fn opt_time(args: &Value, name: &'static str) -> ToolResult<Option<ClockTime>> {
    args[name]
        .as_str()
        .map(|s| s.parse::<ClockTime>().map_err(|e| ToolError::invalid(name, e.to_string())))
        .transpose()
}

pub(crate) fn req_time(args: &Value, name: &'static str) -> ToolResult<ClockTime> {
    opt_time(args, name)?.ok_or(ToolError::MissingArgument(name))
}

pub(crate) fn opt_u32(args: &Value, name: &'static str) -> ToolResult<Option<u32>> {
    match &args[name] {
        Value::Null => Ok(None),
        v => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ToolError::invalid(name, format!("expected a positive integer, got {v}"))),
    }
}

pub(crate) fn flag(args: &Value, name: &str) -> bool {
    args[name].as_bool().unwrap_or(false)
}

pub(crate) fn opt_status(args: &Value) -> ToolResult<Option<SlotStatus>> {
    args["status"]
        .as_str()
        .map(|s| SlotStatus::parse(s).ok_or_else(|| ToolError::invalid("status", format!("unknown status '{s}'"))))
        .transpose()
}

pub(crate) fn opt_priority(args: &Value) -> ToolResult<Option<Priority>> {
    args["priority"]
        .as_str()
        .map(|s| {
            Priority::parse(s).ok_or_else(|| ToolError::invalid("priority", format!("unknown priority '{s}'")))
        })
        .transpose()
}

pub(crate) fn opt_weekdays(args: &Value) -> ToolResult<Option<Vec<u8>>> {
    let Some(items) = args["weekdays"].as_array() else {
        return Ok(None);
    };
    let mut days = Vec::with_capacity(items.len());
    for item in items {
        let day = item
            .as_u64()
            .filter(|d| *d <= 6)
            .ok_or_else(|| ToolError::invalid("weekdays", format!("{item} is not a weekday 0-6")))?;
        days.push(day as u8);
    }
    days.sort_unstable();
    days.dedup();
    Ok(Some(days))
}

/// End of a new slot: explicit `endTime`, else start plus `duration`, else
/// start plus the default length. The end must come after the start.
pub(crate) fn resolve_end(args: &Value, start: ClockTime) -> ToolResult<(ClockTime, u32)> {
    let end = match opt_time(args, "endTime")? {
        Some(end) => end,
        None => end_after(start, opt_u32(args, "duration")?.unwrap_or(DEFAULT_SLOT_MINUTES))?,
    };
    let minutes = start.minutes_until(end);
    if minutes <= 0 {
        return Err(ToolError::invalid(
            "endTime",
            format!("{end} is not after the start time {start}"),
        ));
    }
    Ok((end, minutes as u32))
}

/// `start + minutes`, refusing slots that would run past midnight.
pub(crate) fn end_after(start: ClockTime, minutes: u32) -> ToolResult<ClockTime> {
    start.checked_plus_minutes(minutes).ok_or_else(|| {
        ToolError::invalid(
            "duration",
            format!("a {minutes}-minute slot starting at {start} would run past midnight"),
        )
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use sa_protocol::ToolName;

    #[test]
    fn catalog_lists_every_tool_once() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 5);
        for name in ToolName::ALL {
            assert!(catalog.contains(name), "{name} missing");
        }
    }

    #[test]
    fn catalog_declares_capability_flags() {
        let catalog = catalog();
        assert!(catalog.any_declares("includeAnalysis"));
        assert!(catalog.any_declares("includeOptimization"));
        assert!(!catalog.any_declares("exportFormat"));
    }

    #[test]
    fn required_parameters_match_the_table() {
        let catalog = catalog();
        let required = |name| -> Vec<String> {
            catalog
                .get(name)
                .unwrap()
                .required_parameters()
                .map(|p| p.name.clone())
                .collect()
        };
        assert_eq!(required(ToolName::CreateAvailabilitySlot), vec!["date", "startTime"]);
        assert_eq!(required(ToolName::CreateRecurringSlots), vec!["startDate", "startTime"]);
        assert_eq!(required(ToolName::UpdateAvailabilitySlot), vec!["date"]);
        assert!(required(ToolName::GetAvailabilityData).is_empty());
        assert!(required(ToolName::DeleteAvailabilitySlots).is_empty());
    }

    #[test]
    fn end_from_duration_or_default() {
        let nine = ClockTime::from_hm(9, 0).unwrap();
        let (end, minutes) = resolve_end(&json!({ "duration": 90 }), nine).unwrap();
        assert_eq!((end.to_string().as_str(), minutes), ("10:30", 90));
        let (end, minutes) = resolve_end(&json!({}), nine).unwrap();
        assert_eq!((end.to_string().as_str(), minutes), ("10:00", 60));
    }

    #[test]
    fn duration_past_midnight_is_rejected() {
        let eleven_pm = ClockTime::from_hm(23, 0).unwrap();
        let err = resolve_end(&json!({ "duration": 120 }), eleven_pm).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { name: "duration", .. }));
        assert!(err.to_string().contains("past midnight"));
        let (end, _) = resolve_end(&json!({ "duration": 59 }), eleven_pm).unwrap();
        assert_eq!(end.to_string(), "23:59");
    }

    #[test]
    fn end_before_start_is_rejected() {
        let nine = ClockTime::from_hm(9, 0).unwrap();
        let err = resolve_end(&json!({ "endTime": "08:00" }), nine).unwrap_err();
        assert!(err.to_string().contains("endTime"));
    }

    #[test]
    fn weekdays_are_validated() {
        assert_eq!(opt_weekdays(&json!({ "weekdays": [5, 1, 1] })).unwrap(), Some(vec![1, 5]));
        assert!(opt_weekdays(&json!({ "weekdays": [9] })).is_err());
        assert_eq!(opt_weekdays(&json!({})).unwrap(), None);
    }

    #[test]
    fn bad_date_is_invalid_argument() {
        let err = req_date(&json!({ "date": "tomorrow" }), "date").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { name: "date", .. }));
        let err = req_date(&json!({}), "date").unwrap_err();
        assert!(matches!(err, ToolError::MissingArgument("date")));
    }
}
