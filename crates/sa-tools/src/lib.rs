//! Availability tools for the slot assistant.
//!
//! Provides an `AvailabilityBackend` abstraction over the slot store, an
//! in-memory `MockAvailabilityBackend` for tests and demos, and 5 tools:
//! get_availability_data, create_availability_slot, create_recurring_slots,
//! update_availability_slot, delete_availability_slots.

pub mod backend;
pub mod error;
pub mod mock;
pub mod tools;
pub mod types;

pub use backend::AvailabilityBackend;
pub use error::{ToolError, ToolResult};
pub use mock::MockAvailabilityBackend;
pub use tools::{all_tools, catalog};
pub use types::{AvailabilityTool, SlotPatch, SlotQuery};
