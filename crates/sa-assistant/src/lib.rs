//! Slot Assistant runtime: library crate for the conversational turn loop.
//!
//! Re-exports all modules so external crates (e.g. `sa-e2e-tests`) can
//! reach `Orchestrator`, `ToolExecutor`, `ToolRegistry`, and the
//! completion client.

pub mod completion;
pub mod config;
pub mod error;
pub mod executor;
pub mod formatter;
pub mod history;
pub mod orchestrator;
pub mod pipeline;
pub mod registry;
pub mod storage;
