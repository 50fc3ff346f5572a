//! Local rule-based turn: check → detect → build → execute → format.
//!
//! Every path ends with exactly one reply. Clarifications and the help
//! reply run no tools; an executed action runs exactly one.

use sa_nlu::intent::HELP_RESPONSE;
use sa_nlu::{
    CheckOutcome, ClarificationKind, ConversationalChecker, IntentDetector, MIN_ACTION_CONFIDENCE,
    ParameterBuilder, extract,
};
use sa_protocol::{
    ConversationContext, DateRange, IntentResult, Message, SuggestedOption, ToolCallRecord,
    ToolName,
};
use serde_json::Value;

use crate::executor::ToolExecutor;
use crate::formatter::ResponseFormatter;

/// What the local pipeline decided for one message.
#[derive(Debug, Clone)]
pub struct LocalReply {
    pub content: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub suggested_options: Vec<SuggestedOption>,
    /// Set when the turn ended in a clarification question.
    pub clarification: Option<ClarificationKind>,
    /// Set when intent detection ran.
    pub intent: Option<IntentResult>,
}

impl LocalReply {
    fn help(intent: IntentResult) -> Self {
        Self {
            content: HELP_RESPONSE.to_string(),
            tool_calls: Vec::new(),
            suggested_options: Vec::new(),
            clarification: None,
            intent: Some(intent),
        }
    }
}

pub struct LocalPipeline {
    checker: ConversationalChecker,
    detector: IntentDetector,
    builder: ParameterBuilder,
    formatter: ResponseFormatter,
}

impl LocalPipeline {
    pub fn new() -> Self {
        Self {
            checker: ConversationalChecker::new(),
            detector: IntentDetector::new(),
            builder: ParameterBuilder::new(),
            formatter: ResponseFormatter::new(),
        }
    }

    /// Run one message through the local pipeline.
    ///
    /// `history` is the session log before this message.
    pub async fn run(
        &self,
        text: &str,
        context: &mut ConversationContext,
        history: &[Message],
        executor: &ToolExecutor<'_>,
    ) -> LocalReply {
        let catalog = executor.registry().catalog();

        if let CheckOutcome::Clarify(clarification) = self.checker.check(text, context.now, catalog) {
            return LocalReply {
                content: clarification.response,
                tool_calls: Vec::new(),
                suggested_options: clarification.suggested_options,
                clarification: Some(clarification.kind),
                intent: None,
            };
        }

        let intent = self.detector.detect(text, context, history);
        let action = match intent.action {
            Some(action) if intent.confidence > MIN_ACTION_CONFIDENCE => action,
            _ => {
                tracing::debug!(confidence = intent.confidence, "no confident intent, sending help");
                return LocalReply::help(intent);
            }
        };

        let mut entities = extract(text, context.now);
        if entities.dates.is_none() && defaults_to_today(action) {
            entities.dates = Some(DateRange::single(context.today()));
        }
        let params = self.builder.build(&entities, action, text, catalog);
        let record = executor
            .execute(action.as_str(), Value::Object(params), context)
            .await;
        let content = self
            .formatter
            .format(&intent.canned_response, std::slice::from_ref(&record));

        LocalReply {
            content,
            tool_calls: vec![record],
            suggested_options: Vec::new(),
            clarification: None,
            intent: Some(intent),
        }
    }
}

impl Default for LocalPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Actions that act on a specific day, which is today unless one is named.
fn defaults_to_today(action: ToolName) -> bool {
    matches!(
        action,
        ToolName::CreateAvailabilitySlot
            | ToolName::CreateRecurringSlots
            | ToolName::UpdateAvailabilitySlot
    )
}
