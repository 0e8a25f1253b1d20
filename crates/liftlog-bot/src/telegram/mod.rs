//! Minimal Telegram Bot API client
//!
//! Typed wrapper over the handful of methods the bot uses. Every method
//! posts JSON and unwraps the `{ok, result, description}` envelope;
//! `ok=false` surfaces as [`TelegramError::Api`] with Telegram's own
//! description.

pub mod types;

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

pub use types::{
    ApiResponse, CallbackQuery, Chat, File, InlineKeyboardButton, InlineKeyboardMarkup, Message,
    Update, User, Voice,
};

const API_BASE: &str = "https://api.telegram.org";

/// How long one `getUpdates` call waits server-side
pub const POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TelegramError>;

#[derive(Serialize)]
struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct EditMessageTextRequest<'a> {
    chat_id: i64,
    message_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Serialize)]
struct DeleteMessageRequest {
    chat_id: i64,
    message_id: i64,
}

#[derive(Serialize)]
struct AnswerCallbackQueryRequest<'a> {
    callback_query_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    show_alert: bool,
}

#[derive(Serialize)]
struct GetFileRequest<'a> {
    file_id: &'a str,
}

/// Telegram Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    http_client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self::with_base_url(token, API_BASE)
    }

    /// Point the client at a different server (tests)
    pub fn with_base_url(token: &str, base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &impl Serialize,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let url = format!("{}/bot{}/{}", self.base_url, self.token, method);
        let mut request = self.http_client.post(url).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let envelope: ApiResponse<T> = request.send().await?.json().await?;
        if !envelope.ok {
            return Err(TelegramError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| format!("{} failed without description", method)),
            ));
        }
        envelope
            .result
            .ok_or_else(|| TelegramError::Api(format!("{} returned ok without result", method)))
    }

    /// Long-poll for new updates
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: POLL_TIMEOUT_SECS,
        };
        // The request blocks server-side for up to POLL_TIMEOUT_SECS;
        // give the transport some slack on top
        let updates = self
            .call(
                "getUpdates",
                &request,
                Some(Duration::from_secs(POLL_TIMEOUT_SECS + 10)),
            )
            .await?;
        Ok(updates)
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        debug!(chat_id, chars = text.len(), "sendMessage");
        self.call(
            "sendMessage",
            &SendMessageRequest {
                chat_id,
                text,
                reply_markup,
            },
            None,
        )
        .await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<()> {
        debug!(chat_id, message_id, "editMessageText");
        // The result is the edited Message (or true for inline messages);
        // neither is needed here
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &EditMessageTextRequest {
                    chat_id,
                    message_id,
                    text,
                    reply_markup,
                },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "deleteMessage",
                &DeleteMessageRequest {
                    chat_id,
                    message_id,
                },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .call(
                "answerCallbackQuery",
                &AnswerCallbackQueryRequest {
                    callback_query_id,
                    text,
                    show_alert,
                },
                None,
            )
            .await?;
        Ok(())
    }

    pub async fn get_file(&self, file_id: &str) -> Result<File> {
        self.call("getFile", &GetFileRequest { file_id }, None).await
    }

    /// Download file content by the path `getFile` returned
    pub async fn download_file(&self, file_path: &str) -> Result<Vec<u8>> {
        let url = format!("{}/file/bot{}/{}", self.base_url, self.token, file_path);
        let response = self.http_client.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}
