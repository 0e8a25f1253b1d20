//! In-memory edit state
//!
//! When the user presses an edit button, the bot waits for their next text
//! message. What is being edited is tracked here, keyed by chat id. One
//! pending edit per chat; starting a new one replaces the old.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::keyboards::EditField;

/// An edit waiting for user input
#[derive(Debug, Clone, Copy)]
pub struct PendingEdit {
    pub entry_id: i64,
    /// The logged-entry message to re-render after the edit
    pub message_id: i64,
    pub field: EditField,
}

/// Pending edits by chat id
#[derive(Clone, Default)]
pub struct EditSessions {
    inner: Arc<Mutex<HashMap<i64, PendingEdit>>>,
}

impl EditSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or replace) a pending edit for a chat
    pub async fn begin(&self, chat_id: i64, edit: PendingEdit) {
        self.inner.lock().await.insert(chat_id, edit);
    }

    /// Current pending edit, left in place so failed input can be retried
    pub async fn get(&self, chat_id: i64) -> Option<PendingEdit> {
        self.inner.lock().await.get(&chat_id).copied()
    }

    /// Drop the pending edit; returns whether there was one
    pub async fn clear(&self, chat_id: i64) -> bool {
        self.inner.lock().await.remove(&chat_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_edit_session_lifecycle() {
        let sessions = EditSessions::new();
        assert!(sessions.get(1).await.is_none());
        assert!(!sessions.clear(1).await);

        sessions
            .begin(
                1,
                PendingEdit {
                    entry_id: 10,
                    message_id: 20,
                    field: EditField::Weight,
                },
            )
            .await;

        // get leaves the edit in place for retries
        let pending = sessions.get(1).await.unwrap();
        assert_eq!(pending.entry_id, 10);
        assert!(sessions.get(1).await.is_some());

        // A new edit replaces the old one
        sessions
            .begin(
                1,
                PendingEdit {
                    entry_id: 11,
                    message_id: 21,
                    field: EditField::Reps,
                },
            )
            .await;
        assert_eq!(sessions.get(1).await.unwrap().entry_id, 11);

        assert!(sessions.clear(1).await);
        assert!(sessions.get(1).await.is_none());
    }
}
