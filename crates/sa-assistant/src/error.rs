//! Error types for the assistant runtime.

use thiserror::Error;

/// Failures talking to the remote completion service. Every variant is
/// resolved by falling back to the local pipeline.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned HTTP {0}")]
    Status(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failures reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Errors surfaced by `Orchestrator::send_message`.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("a message is already being processed")]
    Busy,

    #[error("message is empty")]
    EmptyMessage,

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type CompletionResult<T> = Result<T, CompletionError>;
pub type StorageResult<T> = Result<T, StorageError>;
pub type AssistantResult<T> = Result<T, AssistantError>;
