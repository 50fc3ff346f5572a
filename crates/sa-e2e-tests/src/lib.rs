//! End-to-end tests for the slot assistant live under `tests/`.
//!
//! They drive `Orchestrator::send_message_at` with a fixed clock against the
//! in-memory slot store, with and without a mocked completion service.
