//! Insight generation for newly logged entries
//!
//! The engine is a pure function over an already-fetched history snapshot:
//! no queries, no clock reads, no shared state. Callers fetch the snapshot
//! through [`HistoryProvider`] (implemented by the database) and hand it in,
//! which keeps every rule testable without storage.

mod engine;
mod types;

pub use engine::{generate_insights, insights_for_entry, HISTORY_WINDOW};
pub use types::{emoji, Insight};

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Entry;

/// Read-only history access the engine's caller needs
///
/// Implemented by `Database`; tests can implement it over plain vectors.
pub trait HistoryProvider {
    /// Recent entries for one user+exercise, most recent first
    fn exercise_history(&self, user_id: i64, exercise: &str, limit: u32) -> Result<Vec<Entry>>;

    /// Most recent entry for an exercise strictly before a date
    fn last_entry_before(
        &self,
        user_id: i64,
        exercise: &str,
        before: NaiveDate,
    ) -> Result<Option<Entry>>;

    /// Maximum weight ever logged for an exercise
    fn max_weight(&self, user_id: i64, exercise: &str) -> Result<Option<f64>>;
}
