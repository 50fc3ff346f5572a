//! Slot Assistant: interactive REPL over the availability tools.
//!
//! Reads one operator message per line from stdin and prints the reply.
//! Uses an in-memory slot store seeded with a sample week.

use std::sync::Arc;

use chrono::{Datelike, Duration, Local};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use sa_assistant::completion::HttpCompletionClient;
use sa_assistant::config::AssistantConfig;
use sa_assistant::history::HistoryStore;
use sa_assistant::orchestrator::{Orchestrator, TurnRoute};
use sa_assistant::storage::FileStore;
use sa_tools::MockAvailabilityBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sa-assistant starting");

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slot-assistant.toml".to_string());
    let config = AssistantConfig::load_or_default(&config_path)?;
    tracing::info!(
        user_id = %config.user_id,
        remote = config.remote.enabled,
        "config loaded"
    );

    // ── Slot store (sample week starting this Monday) ───────────
    let today = Local::now().date_naive();
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let backend = Arc::new(MockAvailabilityBackend::with_sample_week(monday));

    // ── Orchestrator ────────────────────────────────────────────
    let mut orchestrator = Orchestrator::new(&config, backend)
        .with_history(HistoryStore::new(Box::new(FileStore::new(&config.storage_dir))));
    if config.remote.enabled {
        tracing::info!(endpoint = %config.remote.endpoint, "remote completion enabled");
        orchestrator = orchestrator.with_completion(Box::new(HttpCompletionClient::new(&config.remote)?));
    }
    match orchestrator.restore().await {
        Ok(restored) => tracing::info!(messages = restored, "chat history restored"),
        Err(err) => tracing::warn!(error = %err, "could not restore chat history, starting fresh"),
    }
    orchestrator.update_ui(|ui| ui.is_open = true).await?;

    println!("Slot assistant ready. Type a request, or /quit to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                orchestrator.clear_history().await?;
                println!("History cleared.");
                continue;
            }
            _ => {}
        }

        match orchestrator.send_message(line).await {
            Ok(outcome) => {
                println!("{}", outcome.message.content());
                for option in outcome.message.suggested_options() {
                    println!("  > {}  (reply: \"{}\")", option.label, option.reply);
                }
                if let TurnRoute::LocalFallback { reason } = &outcome.route {
                    tracing::debug!(%reason, "answered locally");
                }
            }
            Err(err) => println!("Error: {err}"),
        }
    }

    orchestrator.update_ui(|ui| ui.is_open = false).await?;
    tracing::info!("sa-assistant stopped");
    Ok(())
}
