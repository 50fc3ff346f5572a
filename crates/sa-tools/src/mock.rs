//! In-memory slot store for tests and the demo REPL.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use sa_protocol::{ClockTime, Priority, Slot, SlotStatus};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::AvailabilityBackend;
use crate::error::{ToolError, ToolResult};
use crate::types::{SlotPatch, SlotQuery};

/// A slot store that keeps everything in memory.
pub struct MockAvailabilityBackend {
    slots: RwLock<Vec<Slot>>,
    /// When set, every call fails with this backend error.
    failure: RwLock<Option<String>>,
}

impl MockAvailabilityBackend {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
        }
    }

    pub fn with_slots(slots: Vec<Slot>) -> Self {
        Self {
            slots: RwLock::new(slots),
            failure: RwLock::new(None),
        }
    }

    /// A working week of sample slots starting at `first_day`: two slots a
    /// day (09:00 and 14:00) for five days, the morning ones booked on even
    /// offsets.
    pub fn with_sample_week(first_day: NaiveDate) -> Self {
        let mut slots = Vec::new();
        for offset in 0..5 {
            let date = first_day + Duration::days(offset);
            for (start, end) in [((9, 0), (10, 0)), ((14, 0), (15, 0))] {
                let (Some(start), Some(end)) = (
                    ClockTime::from_hm(start.0, start.1),
                    ClockTime::from_hm(end.0, end.1),
                ) else {
                    continue;
                };
                let mut slot = Slot::new(date, start, end);
                if start.hour() == 9 && offset % 2 == 0 {
                    slot.status = SlotStatus::Booked;
                    slot.priority = Priority::High;
                }
                slots.push(slot);
            }
        }
        Self::with_slots(slots)
    }

    /// Make every subsequent call fail with `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    /// Snapshot of everything stored.
    pub async fn all_slots(&self) -> Vec<Slot> {
        self.slots.read().await.clone()
    }

    async fn check_failure(&self) -> ToolResult<()> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(ToolError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockAvailabilityBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AvailabilityBackend for MockAvailabilityBackend {
    async fn list_slots(&self, query: &SlotQuery) -> ToolResult<Vec<Slot>> {
        self.check_failure().await?;
        let mut found: Vec<Slot> = self
            .slots
            .read()
            .await
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        found.sort_by_key(|s| (s.date, s.start_time));
        Ok(found)
    }

    async fn insert_slots(&self, slots: Vec<Slot>) -> ToolResult<Vec<Slot>> {
        self.check_failure().await?;
        self.slots.write().await.extend(slots.iter().cloned());
        Ok(slots)
    }

    async fn update_slot(&self, id: Uuid, patch: &SlotPatch) -> ToolResult<Slot> {
        self.check_failure().await?;
        let mut slots = self.slots.write().await;
        let slot = slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ToolError::NotFound(id.to_string()))?;
        patch.apply(slot);
        Ok(slot.clone())
    }

    async fn delete_slots(&self, ids: &[Uuid]) -> ToolResult<usize> {
        self.check_failure().await?;
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|s| !ids.contains(&s.id));
        Ok(before - slots.len())
    }
}
