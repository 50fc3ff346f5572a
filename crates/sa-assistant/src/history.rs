//! Persisted chat history and UI chrome state.
//!
//! Both are stored as JSON under fixed keys; timestamps serialize as
//! ISO-8601 through chrono's serde support.

use sa_protocol::{Session, UiState};

use crate::error::StorageResult;
use crate::storage::KeyValueStore;

pub const UI_STATE_KEY: &str = "slot-assistant.ui-state";
pub const CHAT_HISTORY_KEY: &str = "slot-assistant.chat-history";

pub struct HistoryStore {
    store: Box<dyn KeyValueStore>,
}

impl HistoryStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load_session(&self) -> StorageResult<Option<Session>> {
        self.store
            .get(CHAT_HISTORY_KEY)?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(Into::into)
    }

    pub fn save_session(&self, session: &Session) -> StorageResult<()> {
        self.store.set(CHAT_HISTORY_KEY, &serde_json::to_string(session)?)
    }

    /// Stored UI state, or the closed default when nothing was saved.
    pub fn load_ui_state(&self) -> StorageResult<UiState> {
        match self.store.get(UI_STATE_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(UiState::default()),
        }
    }

    pub fn save_ui_state(&self, state: &UiState) -> StorageResult<()> {
        self.store.set(UI_STATE_KEY, &serde_json::to_string(state)?)
    }

    pub fn clear_session(&self) -> StorageResult<()> {
        self.store.remove(CHAT_HISTORY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use sa_protocol::{Message, MessageMetadata, Position};

    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;

    #[test]
    fn session_round_trip_keeps_order_and_timestamps() {
        let history = HistoryStore::new(Box::new(MemoryStore::new()));
        let mut session = Session::new("operator");
        session.push(Message::user("show my availability tomorrow"));
        session.push(Message::assistant("You have 2 slots.", MessageMetadata::default()));

        history.save_session(&session).unwrap();
        let restored = history.load_session().unwrap().unwrap();

        assert_eq!(restored, session);
        assert_eq!(restored.messages()[0].timestamp(), session.messages()[0].timestamp());
        assert_eq!(restored.messages()[1].content(), "You have 2 slots.");
    }

    #[test]
    fn missing_history_is_none() {
        let history = HistoryStore::new(Box::new(MemoryStore::new()));
        assert!(history.load_session().unwrap().is_none());
    }

    #[test]
    fn corrupt_history_is_an_error() {
        let store = MemoryStore::new();
        store.set(CHAT_HISTORY_KEY, "{ not json").unwrap();
        let history = HistoryStore::new(Box::new(store));
        assert!(matches!(history.load_session(), Err(StorageError::Serde(_))));
    }

    #[test]
    fn ui_state_defaults_and_round_trip() {
        let history = HistoryStore::new(Box::new(MemoryStore::new()));
        assert_eq!(history.load_ui_state().unwrap(), UiState::default());

        let state = UiState {
            is_open: true,
            is_minimized: true,
            position: Position { x: 20, y: 480 },
        };
        history.save_ui_state(&state).unwrap();
        assert_eq!(history.load_ui_state().unwrap(), state);
    }

    #[test]
    fn timestamps_are_iso_8601() {
        let history = HistoryStore::new(Box::new(MemoryStore::new()));
        let mut session = Session::new("operator");
        session.push(Message::user("hi"));
        history.save_session(&session).unwrap();

        let json: serde_json::Value =
            serde_json::to_value(history.load_session().unwrap().unwrap()).unwrap();
        let stamp = json["messages"][0]["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
