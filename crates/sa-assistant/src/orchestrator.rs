//! Orchestrator: owns one conversation and runs its turns.
//!
//! A turn goes to the remote completion service first when one is
//! configured; any failure there gets exactly one local-pipeline attempt for
//! the same turn. Either way the turn appends one user message and one
//! assistant message to the session.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Local, NaiveDateTime};
use sa_protocol::{
    ConversationContext, Message, MessageMetadata, ResponseOrigin, Session, SuggestedOption,
    ToolCallRecord, UiState,
};
use sa_tools::AvailabilityBackend;
use tokio::sync::Mutex;

use crate::completion::{CompletionClient, CompletionRequest, HistoryEntry};
use crate::config::AssistantConfig;
use crate::error::{AssistantError, AssistantResult, CompletionResult};
use crate::executor::ToolExecutor;
use crate::formatter::ResponseFormatter;
use crate::history::HistoryStore;
use crate::pipeline::LocalPipeline;
use crate::registry::ToolRegistry;

/// Which path answered a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRoute {
    Remote,
    LocalFallback { reason: String },
}

/// Result of `send_message`: the appended assistant message and its route.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub message: Message,
    pub route: TurnRoute,
}

struct Conversation {
    session: Session,
    context: ConversationContext,
    ui: UiState,
}

/// Reply content before it becomes a `Message`.
struct Reply {
    content: String,
    tool_calls: Vec<ToolCallRecord>,
    suggested_options: Vec<SuggestedOption>,
}

pub struct Orchestrator {
    registry: ToolRegistry,
    backend: Arc<dyn AvailabilityBackend>,
    completion: Option<Box<dyn CompletionClient>>,
    history: Option<HistoryStore>,
    pipeline: LocalPipeline,
    formatter: ResponseFormatter,
    history_window: usize,
    conversation: Mutex<Conversation>,
    processing: AtomicBool,
}

impl Orchestrator {
    pub fn new(config: &AssistantConfig, backend: Arc<dyn AvailabilityBackend>) -> Self {
        let now = Local::now().naive_local();
        Self {
            registry: ToolRegistry::with_defaults(),
            backend,
            completion: None,
            history: None,
            pipeline: LocalPipeline::new(),
            formatter: ResponseFormatter::new(),
            history_window: config.history_window,
            conversation: Mutex::new(Conversation {
                session: Session::new(config.user_id.clone()),
                context: ConversationContext::new(config.user_id.clone(), config.current_page.clone(), now),
                ui: UiState::default(),
            }),
            processing: AtomicBool::new(false),
        }
    }

    /// Send turns to a remote completion service first.
    pub fn with_completion(mut self, client: Box<dyn CompletionClient>) -> Self {
        self.completion = Some(client);
        self
    }

    /// Persist the session and UI state after every change.
    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = Some(history);
        self
    }

    /// Load the persisted session and UI state, if any.
    ///
    /// Returns the number of restored messages.
    pub async fn restore(&self) -> AssistantResult<usize> {
        let Some(history) = &self.history else {
            return Ok(0);
        };
        let mut conversation = self.conversation.lock().await;
        conversation.ui = history.load_ui_state()?;
        if let Some(session) = history.load_session()? {
            conversation.session = session;
        }
        Ok(conversation.session.len())
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Handle one operator message at the current local time.
    pub async fn send_message(&self, text: &str) -> AssistantResult<TurnOutcome> {
        self.send_message_at(text, Local::now().naive_local()).await
    }

    /// Handle one operator message with `now` as the conversation's clock.
    ///
    /// Rejects with `Busy` while another message is in flight.
    pub async fn send_message_at(&self, text: &str, now: NaiveDateTime) -> AssistantResult<TurnOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        let _guard = ProcessingGuard::acquire(&self.processing).ok_or(AssistantError::Busy)?;

        let mut conversation = self.conversation.lock().await;
        let Conversation {
            session, context, ..
        } = &mut *conversation;
        context.set_now(now);
        let user_message = Message::user(text);
        let executor = ToolExecutor::new(&self.registry, self.backend.as_ref());

        let (reply, route) = match &self.completion {
            Some(client) => match self
                .remote_turn(client.as_ref(), text, context, session.messages(), &executor)
                .await
            {
                Ok(reply) => (reply, TurnRoute::Remote),
                Err(err) => {
                    tracing::warn!(error = %err, "remote completion failed, using local pipeline");
                    let reply = self.local_turn(text, context, session.messages(), &executor).await;
                    (reply, TurnRoute::LocalFallback { reason: err.to_string() })
                }
            },
            None => {
                let reply = self.local_turn(text, context, session.messages(), &executor).await;
                let reason = "remote completion not configured".to_string();
                (reply, TurnRoute::LocalFallback { reason })
            }
        };

        let origin = match route {
            TurnRoute::Remote => ResponseOrigin::Remote,
            TurnRoute::LocalFallback { .. } => ResponseOrigin::Local,
        };
        let message = Message::assistant(
            reply.content,
            MessageMetadata {
                tool_calls: reply.tool_calls,
                context_snapshot: Some(context.snapshot()),
                suggested_options: reply.suggested_options,
                origin: Some(origin),
            },
        );
        session.push(user_message);
        session.push(message.clone());
        tracing::info!(
            route = ?origin,
            tool_calls = message.tool_calls().len(),
            "turn complete"
        );

        if let Some(history) = &self.history {
            if let Err(err) = history.save_session(session) {
                tracing::warn!(error = %err, "failed to persist chat history");
            }
        }

        Ok(TurnOutcome { message, route })
    }

    async fn remote_turn(
        &self,
        client: &dyn CompletionClient,
        text: &str,
        context: &mut ConversationContext,
        history: &[Message],
        executor: &ToolExecutor<'_>,
    ) -> CompletionResult<Reply> {
        let window = history.len().saturating_sub(self.history_window);
        let request = CompletionRequest {
            message: text.to_string(),
            context: context.snapshot(),
            tools: self.registry.catalog().to_tool_specs(),
            conversation_history: history[window..].iter().map(HistoryEntry::from).collect(),
        };
        let response = client.complete(&request).await?;

        let mut tool_calls = Vec::with_capacity(response.tool_calls.len());
        for call in response.tool_calls {
            tool_calls.push(executor.execute(&call.name, call.parameters, context).await);
        }
        Ok(Reply {
            content: self.formatter.format(&response.response, &tool_calls),
            tool_calls,
            suggested_options: response
                .suggested_actions
                .into_iter()
                .map(|action| SuggestedOption::new(action.clone(), action))
                .collect(),
        })
    }

    async fn local_turn(
        &self,
        text: &str,
        context: &mut ConversationContext,
        history: &[Message],
        executor: &ToolExecutor<'_>,
    ) -> Reply {
        let local = self.pipeline.run(text, context, history, executor).await;
        Reply {
            content: local.content,
            tool_calls: local.tool_calls,
            suggested_options: local.suggested_options,
        }
    }

    // ── Session & UI state ───────────────────────────────────────

    /// Snapshot of the session log.
    pub async fn session(&self) -> Session {
        self.conversation.lock().await.session.clone()
    }

    /// Snapshot of the conversation context.
    pub async fn context(&self) -> ConversationContext {
        self.conversation.lock().await.context.clone()
    }

    pub async fn set_page(&self, page: &str) {
        self.conversation.lock().await.context.set_page(page);
    }

    pub async fn ui_state(&self) -> UiState {
        self.conversation.lock().await.ui
    }

    /// Apply `change` to the UI state and persist the result.
    pub async fn update_ui(&self, change: impl FnOnce(&mut UiState)) -> AssistantResult<UiState> {
        let mut conversation = self.conversation.lock().await;
        change(&mut conversation.ui);
        if let Some(history) = &self.history {
            history.save_ui_state(&conversation.ui)?;
        }
        Ok(conversation.ui)
    }

    /// Start a fresh session and drop the persisted history.
    pub async fn clear_history(&self) -> AssistantResult<()> {
        let mut conversation = self.conversation.lock().await;
        let user_id = conversation.session.user_id().to_string();
        conversation.session = Session::new(user_id);
        if let Some(history) = &self.history {
            history.clear_session()?;
        }
        Ok(())
    }
}

/// Holds the processing flag for one turn and clears it on drop.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
