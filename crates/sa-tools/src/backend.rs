//! Slot store abstraction. The real store lives outside this workspace; the
//! tools only ever reach it through this trait.

use async_trait::async_trait;
use sa_protocol::Slot;
use uuid::Uuid;

use crate::error::ToolResult;
use crate::types::{SlotPatch, SlotQuery};

/// Read/write access to availability slots.
///
/// Implemented by `MockAvailabilityBackend` for tests and the demo REPL.
#[async_trait]
pub trait AvailabilityBackend: Send + Sync {
    /// Slots matching `query`, ordered by date then start time.
    async fn list_slots(&self, query: &SlotQuery) -> ToolResult<Vec<Slot>>;

    /// Store new slots and return them as stored.
    async fn insert_slots(&self, slots: Vec<Slot>) -> ToolResult<Vec<Slot>>;

    /// Apply `patch` to the slot with `id` and return the updated slot.
    async fn update_slot(&self, id: Uuid, patch: &SlotPatch) -> ToolResult<Slot>;

    /// Remove the given slots and return how many were removed.
    async fn delete_slots(&self, ids: &[Uuid]) -> ToolResult<usize>;
}
