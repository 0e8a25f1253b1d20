//! Speech and parsing backends
//!
//! Two pluggable backends turn a Telegram voice message into a structured
//! entry: `SpeechBackend` transcribes audio to Russian text, `ParserBackend`
//! extracts the exercise fields from that text. Real implementations call
//! the OpenAI transcription API and the Anthropic Messages API; tests use
//! the mocks.

mod mock;
mod parser;
mod transcribe;

pub use mock::{MockParser, MockSpeech};
pub use parser::{parse_entry_response, ClaudeParser, ParsedEntry};
pub use transcribe::WhisperTranscriber;

use async_trait::async_trait;

use crate::error::Result;

/// Speech-to-text over raw voice-message bytes
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Transcribe audio (OGG from Telegram) to text
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String>;
}

/// Structured-entry extraction from transcribed text
#[async_trait]
pub trait ParserBackend: Send + Sync {
    /// Parse one spoken set description into entry fields
    async fn parse_entry(&self, text: &str) -> Result<ParsedEntry>;

    /// Normalize an exercise name typed during an edit
    async fn normalize_exercise(&self, raw: &str) -> Result<String>;
}
