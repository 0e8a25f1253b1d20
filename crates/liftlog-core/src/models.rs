//! Domain models for Liftlog

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged set of an exercise
///
/// Entries sharing a calendar date form a training session. `exercise` is the
/// normalized name used as the grouping key for history and records;
/// `exercise_raw` keeps what the parser heard, for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub exercise: String,
    pub exercise_raw: String,
    /// Kilograms. None = bodyweight/unspecified
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entry {
    /// Calendar date of this set (the training session it belongs to)
    pub fn session_date(&self) -> NaiveDate {
        self.created_at.date_naive()
    }
}

/// Insert shape for a new entry
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub exercise: String,
    pub exercise_raw: String,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub comment: Option<String>,
}

/// Partial update for an existing entry
///
/// `None` fields are left untouched. Clearing the comment is expressed as
/// `comment: Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub exercise: Option<String>,
    pub exercise_raw: Option<String>,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub comment: Option<Option<String>>,
}

/// Aggregate statistics for one exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseStats {
    pub total_sets: i64,
    pub max_weight: Option<f64>,
    pub max_reps: Option<u32>,
    pub avg_weight: Option<f64>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Aggregate statistics across all exercises of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_sets: i64,
    pub total_exercises: i64,
    pub total_trainings: i64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}
