//! Status and priority keywords.

use std::sync::LazyLock;

use regex::Regex;
use sa_protocol::{EntityContext, Priority, SlotStatus};

static RE_STATUS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(available|unbooked|free|open|booked|reserved|taken|cancelled|canceled)\b").unwrap()
});
static RE_PRIORITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(urgent|asap|important|high[- ]priority|top[- ]priority|low[- ]priority|normal[- ]priority)\b")
        .unwrap()
});

/// Status and priority, each taken from its earliest keyword in the text.
pub fn extract_context(text: &str) -> Option<EntityContext> {
    let status = RE_STATUS.find(text).and_then(|m| SlotStatus::parse(m.as_str()));
    let priority = RE_PRIORITY.find(text).map(|m| match m.as_str() {
        p if p.starts_with("low") => Priority::Low,
        p if p.starts_with("normal") => Priority::Normal,
        _ => Priority::High,
    });
    (status.is_some() || priority.is_some()).then_some(EntityContext { status, priority })
}
