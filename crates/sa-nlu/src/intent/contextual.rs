//! Contextual strategy: follow-ups that echo what was just done.

use std::collections::HashSet;

use sa_protocol::{ConversationContext, IntentResult, Message, Role, Strategy, ToolName};

use super::canned_response;
use crate::text::{normalize, words};

/// Confidence added per overlapping keyword.
const PER_OVERLAP: f64 = 0.2;

/// Overlap must score strictly above this to fire.
const THRESHOLD: f64 = 0.5;

/// How many prior user messages feed the overlap vocabulary.
const USER_MESSAGE_WINDOW: usize = 5;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "you", "your", "can", "could", "please", "would",
    "want", "like", "have", "has", "are", "was", "were", "will", "just", "also", "but", "not",
    "then", "than", "there", "what", "from", "into", "ok", "okay", "yes",
];

fn is_keyword(word: &str) -> bool {
    let numeric = word.chars().all(|c| c.is_ascii_digit());
    (numeric || word.len() >= 3) && !STOPWORDS.contains(&word)
}

/// Keywords from the action log and the most recent user messages.
fn vocabulary(context: &ConversationContext, history: &[Message]) -> HashSet<String> {
    let actions = context.recent_actions().map(|a| normalize(&a.log_line().replace('_', " ")));
    let messages = history
        .iter()
        .rev()
        .filter(|m| m.role() == Role::User)
        .take(USER_MESSAGE_WINDOW)
        .map(|m| normalize(m.content()));
    actions
        .chain(messages)
        .flat_map(|line| {
            words(&line)
                .into_iter()
                .filter(|w| is_keyword(w))
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Number of distinct keywords in `text` that also appear in recent context.
pub fn overlap(text: &str, context: &ConversationContext, history: &[Message]) -> usize {
    let vocabulary = vocabulary(context, history);
    let input: HashSet<&str> = words(text).into_iter().filter(|w| is_keyword(w)).collect();
    input.iter().filter(|w| vocabulary.contains(**w)).count()
}

/// Repeat the most recent action when the text leans on recent context.
/// Log entries naming tools outside [`ToolName`] (a remote call to an
/// unknown tool) are skipped. Inactive with no known action in the log.
pub fn detect(text: &str, context: &ConversationContext, history: &[Message]) -> Option<IntentResult> {
    let action = context
        .recent_actions()
        .find_map(|a| a.tool.parse::<ToolName>().ok())?;
    let n = overlap(text, context, history);
    let confidence = (n as f64 / 5.0).min(1.0);
    tracing::trace!(overlap = n, confidence, tool = %action, "contextual score");
    (confidence > THRESHOLD).then(|| {
        IntentResult::new(
            action,
            confidence,
            canned_response(action),
            Strategy::Contextual,
        )
    })
}
