//! Tool execution error types.

use thiserror::Error;

/// Errors raised while validating arguments or talking to the slot store.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("missing required argument '{0}'")]
    MissingArgument(&'static str),

    #[error("invalid argument '{name}': {message}")]
    InvalidArgument { name: &'static str, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("{0}")]
    Other(String),
}

impl ToolError {
    pub fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}

/// Convenience alias for tool results.
pub type ToolResult<T> = Result<T, ToolError>;
