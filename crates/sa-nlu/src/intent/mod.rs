//! Intent detection.
//!
//! Three strategies score the text independently:
//! - **Pattern**: ordered rule table with additive bonuses, capped at 0.95.
//! - **Semantic**: keyword bags per action, capped at 0.8.
//! - **Contextual**: overlap with recent actions and messages.
//!
//! The highest confidence wins. Ties go to pattern, then semantic, then
//! contextual.

pub mod contextual;
pub mod pattern;
pub mod rules;
pub mod semantic;

use sa_protocol::{ConversationContext, IntentResult, Message, ToolName};

use crate::text::normalize;

/// Combined confidence must exceed this before an action is executed.
pub const MIN_ACTION_CONFIDENCE: f64 = 0.4;

/// Reply used when no strategy recognises the request.
pub const HELP_RESPONSE: &str = "I can show your availability, create single or recurring slots, \
update a slot, or delete slots. Try \"show my availability tomorrow\" or \
\"create a 1 hour slot friday at 10am\".";

/// Opening line for a turn that runs `action`.
pub fn canned_response(action: ToolName) -> &'static str {
    match action {
        ToolName::GetAvailabilityData => "Here's what I found in your availability.",
        ToolName::CreateAvailabilitySlot => "I'll create that availability slot for you.",
        ToolName::CreateRecurringSlots => "I'll set up those recurring slots.",
        ToolName::UpdateAvailabilitySlot => "I'll update that slot.",
        ToolName::DeleteAvailabilitySlots => "I'll remove those slots.",
    }
}

/// Deterministic multi-strategy intent detector.
pub struct IntentDetector;

impl IntentDetector {
    pub fn new() -> Self {
        Self
    }

    /// Score `text` with every strategy and keep the best result.
    ///
    /// `history` is the session log before this message.
    pub fn detect(
        &self,
        text: &str,
        context: &ConversationContext,
        history: &[Message],
    ) -> IntentResult {
        let text = normalize(text);
        let candidates = [
            pattern::detect(&text),
            semantic::detect(&text),
            contextual::detect(&text, context, history),
        ];
        match combine(candidates.into_iter().flatten()) {
            Some(best) => {
                tracing::debug!(
                    action = ?best.action,
                    confidence = best.confidence,
                    strategy = ?best.strategy,
                    "intent detected"
                );
                best
            }
            None => {
                tracing::debug!("no intent matched");
                IntentResult::none(HELP_RESPONSE)
            }
        }
    }
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Highest confidence wins; equal confidences fall back to strategy order.
pub fn combine(results: impl IntoIterator<Item = IntentResult>) -> Option<IntentResult> {
    results.into_iter().reduce(|best, next| {
        let better = next.confidence > best.confidence
            || (next.confidence == best.confidence && next.strategy < best.strategy);
        if better { next } else { best }
    })
}
