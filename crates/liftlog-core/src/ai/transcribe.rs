//! OpenAI transcription backend
//!
//! Posts the voice-message bytes to the `/v1/audio/transcriptions` endpoint
//! and returns the plain-text transcript. The language is pinned to Russian.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::debug;

use super::SpeechBackend;
use crate::error::{Error, Result};

const API_URL: &str = "https://api.openai.com/v1/audio/transcriptions";
const DEFAULT_MODEL: &str = "whisper-1";

/// Speech-to-text client for the OpenAI transcription API
pub struct WhisperTranscriber {
    http_client: Client,
    api_key: String,
    model: String,
}

impl WhisperTranscriber {
    pub fn new(api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Use a different transcription model
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl SpeechBackend for WhisperTranscriber {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String> {
        let part = Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str("audio/ogg")?;

        let form = Form::new()
            .text("model", self.model.clone())
            .text("language", "ru")
            .text("response_format", "text")
            .part("file", part);

        let response = self
            .http_client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Api(format!(
                "Transcription API returned {}: {}",
                status, body
            )));
        }

        let transcript = body.trim().to_string();
        debug!(bytes = audio.len(), chars = transcript.len(), "Transcription complete");
        Ok(transcript)
    }
}
