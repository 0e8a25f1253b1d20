//! Mock backends for testing
//!
//! Predictable speech/parser implementations for handler tests and
//! development without API keys.

use async_trait::async_trait;

use super::parser::ParsedEntry;
use super::{ParserBackend, SpeechBackend};
use crate::error::Result;

/// Speech backend returning a fixed transcript
#[derive(Clone, Default)]
pub struct MockSpeech {
    pub transcript: String,
}

impl MockSpeech {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
        }
    }
}

#[async_trait]
impl SpeechBackend for MockSpeech {
    async fn transcribe(&self, _audio: &[u8], _filename: &str) -> Result<String> {
        Ok(self.transcript.clone())
    }
}

/// Parser backend returning a fixed entry
#[derive(Clone)]
pub struct MockParser {
    pub entry: ParsedEntry,
}

impl MockParser {
    pub fn new(entry: ParsedEntry) -> Self {
        Self { entry }
    }

    /// A simple squat entry, enough for most tests
    pub fn squat() -> Self {
        Self::new(ParsedEntry {
            exercise: "присед".to_string(),
            exercise_raw: "Присед".to_string(),
            weight: Some(60.0),
            reps: Some(6),
            comment: None,
        })
    }
}

#[async_trait]
impl ParserBackend for MockParser {
    async fn parse_entry(&self, _text: &str) -> Result<ParsedEntry> {
        Ok(self.entry.clone())
    }

    async fn normalize_exercise(&self, raw: &str) -> Result<String> {
        Ok(raw.trim().to_lowercase())
    }
}
