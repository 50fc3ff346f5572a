//! Rule-based language understanding for the slot assistant.
//!
//! Turns operator text ("create a 2 hour slot tomorrow at 9am") into
//! extracted entities, a scored intent, and concrete tool parameters, or
//! into a clarification question when the text is ambiguous or incomplete.
//!
//! Everything here is synchronous and deterministic: the same text and
//! context always produce the same result.

pub mod clarify;
pub mod entities;
pub mod intent;
pub mod params;

mod text;

pub use clarify::{Clarification, ClarificationKind, ConversationalChecker, CheckOutcome};
pub use entities::extract;
pub use intent::{IntentDetector, MIN_ACTION_CONFIDENCE};
pub use params::ParameterBuilder;
