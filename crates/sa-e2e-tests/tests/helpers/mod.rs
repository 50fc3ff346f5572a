//! Shared test harness for E2E integration tests.
//!
//! Wires an `Orchestrator` to an in-memory slot store seeded with a sample
//! week, optionally a mocked completion service and a history directory,
//! and pins the clock to Monday 2024-01-15 10:00.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use sa_assistant::completion::HttpCompletionClient;
use sa_assistant::config::{AssistantConfig, RemoteConfig};
use sa_assistant::history::HistoryStore;
use sa_assistant::orchestrator::{Orchestrator, TurnOutcome};
use sa_assistant::storage::FileStore;
use sa_tools::MockAvailabilityBackend;

/// Monday 2024-01-15, 10:00.
pub fn monday_morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap()
}

pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

/// A fresh scratch directory path (not created).
pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("sa-e2e-{}", uuid::Uuid::now_v7()))
}

/// End-to-end harness around one conversation.
pub struct TestHarness {
    pub orchestrator: Orchestrator,
    /// Slot store shared with the orchestrator.
    pub backend: Arc<MockAvailabilityBackend>,
    /// Clock used for every turn.
    pub now: NaiveDateTime,
}

impl TestHarness {
    /// Local pipeline only, sample week starting Monday 2024-01-15.
    pub fn local() -> Self {
        Self::build(AssistantConfig::default(), None, None)
    }

    /// Remote completion at `endpoint` with a short timeout.
    pub fn with_remote(endpoint: &str) -> Self {
        let config = AssistantConfig {
            remote: RemoteConfig {
                enabled: true,
                endpoint: endpoint.to_string(),
                timeout_secs: 1,
            },
            ..AssistantConfig::default()
        };
        Self::build(config, None, None)
    }

    /// Local pipeline with history persisted under `dir`.
    pub fn with_history_dir(dir: &Path) -> Self {
        Self::build(AssistantConfig::default(), Some(dir), None)
    }

    /// Same as `with_history_dir` but reusing an existing slot store.
    pub fn reopen(dir: &Path, backend: Arc<MockAvailabilityBackend>) -> Self {
        Self::build(AssistantConfig::default(), Some(dir), Some(backend))
    }

    fn build(
        config: AssistantConfig,
        history_dir: Option<&Path>,
        backend: Option<Arc<MockAvailabilityBackend>>,
    ) -> Self {
        let now = monday_morning();
        let backend = backend
            .unwrap_or_else(|| Arc::new(MockAvailabilityBackend::with_sample_week(now.date())));
        let mut orchestrator = Orchestrator::new(&config, backend.clone());
        if config.remote.enabled {
            orchestrator = orchestrator
                .with_completion(Box::new(HttpCompletionClient::new(&config.remote).unwrap()));
        }
        if let Some(dir) = history_dir {
            orchestrator = orchestrator.with_history(HistoryStore::new(Box::new(FileStore::new(dir))));
        }
        Self {
            orchestrator,
            backend,
            now,
        }
    }

    /// Send one message at the harness clock. Panics on `Busy`/empty input.
    pub async fn say(&self, text: &str) -> TurnOutcome {
        self.orchestrator
            .send_message_at(text, self.now)
            .await
            .unwrap_or_else(|e| panic!("send_message failed for {text:?}: {e}"))
    }

    /// Number of slots currently stored.
    pub async fn slot_count(&self) -> usize {
        self.backend.all_slots().await.len()
    }
}
