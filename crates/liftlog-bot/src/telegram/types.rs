//! The slice of the Telegram Bot API object model this bot uses
//!
//! Unknown fields are ignored on deserialization, so these structs stay
//! small while the API keeps growing.

use serde::{Deserialize, Serialize};

/// One incoming event from `getUpdates`
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
    pub voice: Option<Voice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub file_id: String,
    pub duration: Option<i64>,
}

/// A button press on an inline keyboard
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

/// File metadata from `getFile`; `file_path` feeds the download URL
#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_id: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl InlineKeyboardButton {
    pub fn new(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }
}

/// Envelope every Bot API method responds with
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_deserializes_with_unknown_fields() {
        let raw = r#"{
            "update_id": 10,
            "message": {
                "message_id": 5,
                "date": 1700000000,
                "from": {"id": 42, "is_bot": false, "first_name": "Ivan"},
                "chat": {"id": 42, "type": "private"},
                "voice": {"file_id": "abc", "file_unique_id": "u", "duration": 3}
            }
        }"#;
        let update: Update = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.voice.unwrap().file_id, "abc");
        assert!(message.text.is_none());
    }

    #[test]
    fn test_api_response_envelope() {
        let ok: ApiResponse<File> =
            serde_json::from_str(r#"{"ok": true, "result": {"file_id": "a", "file_path": "voice/a.oga"}}"#)
                .unwrap();
        assert!(ok.ok);
        assert_eq!(ok.result.unwrap().file_path.as_deref(), Some("voice/a.oga"));

        let err: ApiResponse<File> =
            serde_json::from_str(r#"{"ok": false, "error_code": 400, "description": "Bad Request"}"#)
                .unwrap();
        assert!(!err.ok);
        assert_eq!(err.description.as_deref(), Some("Bad Request"));
    }
}
