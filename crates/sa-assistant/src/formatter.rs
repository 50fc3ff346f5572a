//! Turns an opening line and the turn's tool calls into reply text.

use sa_protocol::{ToolCallRecord, ToolName};
use serde_json::Value;

pub struct ResponseFormatter;

impl ResponseFormatter {
    pub fn new() -> Self {
        Self
    }

    /// `lead` followed by one summary per successful call and a bulleted
    /// list of failures.
    pub fn format(&self, lead: &str, calls: &[ToolCallRecord]) -> String {
        let summaries: Vec<String> = calls
            .iter()
            .filter(|c| c.result.success)
            .map(summarize)
            .collect();
        let failures: Vec<String> = calls
            .iter()
            .filter(|c| !c.result.success)
            .map(|c| {
                let detail = c.result.error.as_deref().unwrap_or(&c.result.message);
                format!("- {}: {detail}", c.tool_name)
            })
            .collect();

        let mut sections = Vec::new();
        if !lead.trim().is_empty() {
            sections.push(lead.trim().to_string());
        }
        sections.extend(summaries);
        if !failures.is_empty() {
            sections.push(format!("Some actions failed:\n{}", failures.join("\n")));
        }
        sections.join("\n\n")
    }
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(call: &ToolCallRecord) -> String {
    let is_query = call.tool_name == ToolName::GetAvailabilityData.as_str();
    match call.result.data.as_ref() {
        Some(data) if is_query => availability_summary(data),
        _ if !call.result.message.is_empty() => format!("{}.", call.result.message.trim_end_matches('.')),
        _ => format!("{} completed.", call.tool_name),
    }
}

fn availability_summary(data: &Value) -> String {
    let count = |key: &str| data[key].as_u64().unwrap_or(0);
    let mut text = format!(
        "You have {} slots: {} available and {} booked.",
        count("totalSlots"),
        count("availableSlots"),
        count("bookedSlots")
    );
    let next = &data["nextAvailable"];
    if let (Some(date), Some(start), Some(end)) = (
        next["date"].as_str(),
        next["startTime"].as_str(),
        next["endTime"].as_str(),
    ) {
        text.push_str(&format!(" Next available: {date} {start}-{end}."));
    }
    if let Some(day) = data["analysis"]["busiestWeekday"].as_str() {
        text.push_str(&format!(" Busiest day: {day}."));
    }
    if let Some(rate) = data["metrics"]["utilizationRate"].as_f64() {
        text.push_str(&format!(" Utilization: {:.0}%.", rate * 100.0));
    }
    if let Some(suggestions) = data["optimization"]["suggestions"].as_array() {
        for s in suggestions.iter().filter_map(Value::as_str) {
            text.push_str(&format!("\n- {s}"));
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use sa_protocol::ToolOutcome;
    use serde_json::json;

    use super::*;

    fn record(tool: &str, result: ToolOutcome) -> ToolCallRecord {
        ToolCallRecord {
            tool_name: tool.into(),
            parameters: json!({}),
            result,
        }
    }

    #[test]
    fn no_calls_is_just_the_lead() {
        let text = ResponseFormatter::new().format("Which Friday do you mean?", &[]);
        assert_eq!(text, "Which Friday do you mean?");
    }

    #[test]
    fn availability_counts_and_next_slot() {
        let call = record(
            "get_availability_data",
            ToolOutcome::success(
                json!({
                    "totalSlots": 2,
                    "availableSlots": 1,
                    "bookedSlots": 1,
                    "nextAvailable": { "date": "2024-01-16", "startTime": "14:00", "endTime": "15:00" },
                }),
                "Found 2 slots: 1 available, 1 booked",
            ),
        );
        let text = ResponseFormatter::new().format("Here's what I found in your availability.", &[call]);
        assert_eq!(
            text,
            "Here's what I found in your availability.\n\n\
             You have 2 slots: 1 available and 1 booked. Next available: 2024-01-16 14:00-15:00."
        );
    }

    #[test]
    fn other_tools_use_their_own_summary() {
        let call = record(
            "create_availability_slot",
            ToolOutcome::success(json!({}), "Created a 60-minute slot on 2024-01-16 from 09:00 to 10:00"),
        );
        let text = ResponseFormatter::new().format("I'll create that availability slot for you.", &[call]);
        assert!(text.ends_with("Created a 60-minute slot on 2024-01-16 from 09:00 to 10:00."));
    }

    #[test]
    fn empty_message_gets_generic_line() {
        let call = record("update_availability_slot", ToolOutcome::success(json!({}), ""));
        let text = ResponseFormatter::new().format("", &[call]);
        assert_eq!(text, "update_availability_slot completed.");
    }

    #[test]
    fn failures_are_listed() {
        let calls = [
            record(
                "export_calendar",
                ToolOutcome::failure("Tool 'export_calendar' not found", "unknown tool: export_calendar"),
            ),
            record(
                "create_availability_slot",
                ToolOutcome::failure("create_availability_slot failed", "missing required argument 'startTime'"),
            ),
        ];
        let text = ResponseFormatter::new().format("Working on it.", &calls);
        assert_eq!(
            text,
            "Working on it.\n\nSome actions failed:\n\
             - export_calendar: unknown tool: export_calendar\n\
             - create_availability_slot: missing required argument 'startTime'"
        );
    }
}
