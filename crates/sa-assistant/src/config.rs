//! Assistant configuration, loadable from TOML with environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable that points the assistant at a completion service.
pub const REMOTE_ENDPOINT_ENV: &str = "SA_REMOTE_ENDPOINT";

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Operator the conversation belongs to.
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Page the operator is on when the conversation starts.
    #[serde(default = "default_current_page")]
    pub current_page: String,
    /// Directory for persisted UI state and chat history.
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Messages of history sent with each remote completion request.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Remote completion service. Optional; defaults to disabled.
    #[serde(default)]
    pub remote: RemoteConfig,
}

/// Remote completion endpoint settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_user_id() -> String {
    "operator".into()
}
fn default_current_page() -> String {
    "availability".into()
}
fn default_storage_dir() -> PathBuf {
    PathBuf::from(".slot-assistant")
}
fn default_history_window() -> usize {
    5
}
fn default_endpoint() -> String {
    "http://localhost:8787/api/assistant/chat".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            current_page: default_current_page(),
            storage_dir: default_storage_dir(),
            history_window: default_history_window(),
            remote: RemoteConfig::default(),
        }
    }
}

impl AssistantConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config.with_endpoint_override(std::env::var(REMOTE_ENDPOINT_ENV).ok()))
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default().with_endpoint_override(std::env::var(REMOTE_ENDPOINT_ENV).ok()))
        }
    }

    /// An explicit endpoint replaces the configured one and enables the
    /// remote path.
    pub fn with_endpoint_override(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.remote.endpoint = endpoint;
            self.remote.enabled = true;
        }
        self
    }
}
