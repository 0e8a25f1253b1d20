//! Liftlog Core Library
//!
//! Shared functionality for the Liftlog training diary bot:
//! - SQLite storage for users and training entries
//! - Insight engine comparing a new set against exercise history
//! - Russian presentation layer (formatting, pluralization, message catalog)
//! - Speech-to-text and entry-parsing backends

pub mod ai;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod text;

pub use ai::{
    ClaudeParser, MockParser, MockSpeech, ParsedEntry, ParserBackend, SpeechBackend,
    WhisperTranscriber,
};
pub use db::Database;
pub use error::{Error, Result};
pub use insights::{generate_insights, insights_for_entry, HistoryProvider, Insight};
pub use models::{Entry, EntryPatch, ExerciseStats, NewEntry, TotalStats};
