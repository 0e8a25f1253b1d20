//! Core types for insight generation

use serde::Serialize;

/// Glyphs classifying the nature of an insight
pub mod emoji {
    /// First time doing an exercise
    pub const NEW: &str = "🆕";
    /// New weight record
    pub const RECORD: &str = "🏆";
    /// New reps record at a known weight
    pub const STRONG: &str = "💪";
    /// Informational time gap
    pub const CALENDAR: &str = "📅";
    /// Long-break warning
    pub const WARNING: &str = "⚠️";
    /// Progress vs. last session
    pub const UP: &str = "📈";
    /// Regression vs. last session
    pub const DOWN: &str = "📉";
    /// Same result as last session
    pub const REPEAT: &str = "🔄";
    /// Week-over-week trend
    pub const CHART: &str = "📊";
}

/// A short prioritized observation about a newly logged entry
///
/// Created fresh per request, rendered, and discarded; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    /// Glyph classifying the insight (record, warning, progress, ...)
    pub emoji: &'static str,
    /// Fully rendered Russian message
    pub text: String,
    /// Lower = more important, shown first
    pub priority: u8,
}

impl Insight {
    pub fn new(emoji: &'static str, text: impl Into<String>, priority: u8) -> Self {
        Self {
            emoji,
            text: text.into(),
            priority,
        }
    }
}

impl std::fmt::Display for Insight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.emoji, self.text)
    }
}
