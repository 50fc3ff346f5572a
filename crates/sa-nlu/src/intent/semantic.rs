//! Semantic strategy: keyword bags per action, scored by hit count.

use sa_protocol::{IntentResult, Strategy, ToolName};

use super::canned_response;
use crate::text::words;

/// Ceiling for any semantic-strategy confidence.
pub const SEMANTIC_CAP: f64 = 0.8;

/// A bag must score strictly above this to fire.
const THRESHOLD: f64 = 0.3;

fn bag(action: ToolName) -> &'static [&'static str] {
    match action {
        ToolName::GetAvailabilityData => &[
            "show", "list", "view", "see", "display", "availability", "available", "free", "booked",
            "calendar", "when", "what", "check", "find", "how", "many", "analyze", "analysis",
            "metrics", "stats", "overview", "summary",
        ],
        ToolName::CreateAvailabilitySlot => &[
            "create", "add", "make", "new", "book", "block", "set", "slot", "single", "appointment",
            "meeting", "call", "session", "open",
        ],
        ToolName::CreateRecurringSlots => &[
            "every", "each", "daily", "weekly", "recurring", "repeat", "repeating", "weekdays",
            "weekends", "pattern", "multiple", "bulk", "series", "regular", "slots",
        ],
        ToolName::UpdateAvailabilitySlot => &[
            "update", "change", "modify", "move", "reschedule", "edit", "shift", "mark", "priority",
            "status", "instead", "different", "later", "earlier",
        ],
        ToolName::DeleteAvailabilitySlots => &[
            "delete", "remove", "clear", "cancel", "erase", "wipe", "rid", "unbooked", "drop",
            "purge", "all",
        ],
    }
}

/// Keyword hits per action for `text`, in catalog order.
pub fn hits(text: &str) -> [(ToolName, usize); 5] {
    let tokens = words(text);
    ToolName::ALL.map(|action| {
        let bag = bag(action);
        (action, tokens.iter().filter(|w| bag.contains(*w)).count())
    })
}

/// Best-scoring bag if it clears the threshold. Ties go to catalog order.
pub fn detect(text: &str) -> Option<IntentResult> {
    let (action, best) = hits(text)
        .into_iter()
        .fold(None::<(ToolName, usize)>, |acc, (action, n)| match acc {
            Some((_, top)) if top >= n => acc,
            _ => Some((action, n)),
        })?;
    let confidence = best as f64 / 10.0;
    (confidence > THRESHOLD).then(|| {
        IntentResult::new(
            action,
            confidence.min(SEMANTIC_CAP),
            canned_response(action),
            Strategy::Semantic,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_hits_do_not_fire() {
        assert!(detect("remove drop purge").is_none());
    }

    #[test]
    fn four_hits_fire() {
        let r = detect("remove drop purge wipe").unwrap();
        assert_eq!(r.action, Some(ToolName::DeleteAvailabilitySlots));
        assert!((r.confidence - 0.4).abs() < 1e-9);
        assert_eq!(r.strategy, Some(Strategy::Semantic));
    }

    #[test]
    fn confidence_is_capped() {
        let text = "every each daily weekly recurring repeat repeating weekdays weekends pattern";
        let r = detect(text).unwrap();
        assert_eq!(r.action, Some(ToolName::CreateRecurringSlots));
        assert_eq!(r.confidence, SEMANTIC_CAP);
    }

    #[test]
    fn hits_are_reported_per_action() {
        let counts = hits("show list delete remove");
        assert_eq!(counts[0], (ToolName::GetAvailabilityData, 2));
        assert_eq!(counts[4], (ToolName::DeleteAvailabilitySlots, 2));
        assert!(detect("show list delete remove").is_none());
    }

    #[test]
    fn equal_top_scores_prefer_first_action() {
        let r = detect("show list view check delete remove clear wipe").unwrap();
        assert_eq!(r.action, Some(ToolName::GetAvailabilityData));
    }
}
