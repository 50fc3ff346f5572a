//! Query/patch types shared by the tools and the `AvailabilityTool` trait.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sa_protocol::{
    ClockTime, Priority, Slot, SlotStatus, ToolDefinition, ToolName, ToolOutcome, weekday_index,
};

use crate::backend::AvailabilityBackend;
use crate::error::ToolResult;

// ── Slot Query ────────────────────────────────────────────────

/// Filter over stored slots. Every `None` field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<ClockTime>,
    pub status: Option<SlotStatus>,
    /// Sunday-based weekday numbers.
    pub weekdays: Option<Vec<u8>>,
}

impl SlotQuery {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            start_date: Some(date),
            end_date: Some(date),
            ..Self::default()
        }
    }

    pub fn matches(&self, slot: &Slot) -> bool {
        self.start_date.is_none_or(|d| slot.date >= d)
            && self.end_date.is_none_or(|d| slot.date <= d)
            && self.start_time.is_none_or(|t| slot.start_time == t)
            && self.status.is_none_or(|s| slot.status == s)
            && self
                .weekdays
                .as_ref()
                .is_none_or(|days| days.contains(&weekday_index(slot.date.weekday())))
    }

    /// True when no field narrows the query.
    pub fn is_unscoped(&self) -> bool {
        self.start_date.is_none()
            && self.end_date.is_none()
            && self.start_time.is_none()
            && self.weekdays.is_none()
    }
}

// ── Slot Patch ────────────────────────────────────────────────

/// Partial update applied to one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotPatch {
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub status: Option<SlotStatus>,
    pub priority: Option<Priority>,
}

impl SlotPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, slot: &mut Slot) {
        if let Some(t) = self.start_time {
            slot.start_time = t;
        }
        if let Some(t) = self.end_time {
            slot.end_time = t;
        }
        if let Some(s) = self.status {
            slot.status = s;
        }
        if let Some(p) = self.priority {
            slot.priority = p;
        }
    }
}

// ── AvailabilityTool Trait ────────────────────────────────────

/// One tool the assistant can call. The definition is what the remote
/// model and the parameter builder see; `execute` runs it.
#[async_trait]
pub trait AvailabilityTool: Send + Sync {
    fn name(&self) -> ToolName {
        self.definition().name
    }

    /// Name, description, and typed parameter list.
    fn definition(&self) -> ToolDefinition;

    /// Execute with JSON arguments against the slot store.
    async fn execute(
        &self,
        args: serde_json::Value,
        backend: &dyn AvailabilityBackend,
    ) -> ToolResult<ToolOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: u32, hour: u32, status: SlotStatus) -> Slot {
        let mut s = Slot::new(
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            ClockTime::from_hm(hour, 0).unwrap(),
            ClockTime::from_hm(hour + 1, 0).unwrap(),
        );
        s.status = status;
        s
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(SlotQuery::default().matches(&slot(15, 9, SlotStatus::Booked)));
        assert!(SlotQuery::default().is_unscoped());
    }

    #[test]
    fn query_filters_combine() {
        let q = SlotQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 21),
            status: Some(SlotStatus::Available),
            weekdays: Some(vec![1, 3]),
            ..SlotQuery::default()
        };
        // 2024-01-15 is a Monday, 2024-01-16 a Tuesday
        assert!(q.matches(&slot(15, 9, SlotStatus::Available)));
        assert!(!q.matches(&slot(16, 9, SlotStatus::Available)));
        assert!(!q.matches(&slot(15, 9, SlotStatus::Booked)));
        assert!(!q.matches(&slot(22, 9, SlotStatus::Available)));
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut s = slot(15, 9, SlotStatus::Available);
        let patch = SlotPatch {
            priority: Some(Priority::High),
            ..SlotPatch::default()
        };
        patch.apply(&mut s);
        assert_eq!(s.priority, Priority::High);
        assert_eq!(s.status, SlotStatus::Available);
        assert!(!patch.is_empty());
        assert!(SlotPatch::default().is_empty());
    }
}
