//! Training entry CRUD and history queries

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, OptionalExtension, Row};

use super::{parse_date, parse_datetime, Database};
use crate::error::Result;
use crate::insights::HistoryProvider;
use crate::models::{Entry, EntryPatch, ExerciseStats, NewEntry, TotalStats};

/// Storage format for entry timestamps
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        exercise: row.get("exercise")?,
        exercise_raw: row.get("exercise_raw")?,
        weight: row.get("weight")?,
        reps: row.get("reps")?,
        comment: row.get("comment")?,
        created_at: parse_datetime(&row.get::<_, String>("created_at")?),
    })
}

impl Database {
    /// Insert a new training entry, timestamped now
    pub fn add_entry(&self, user_id: i64, new: &NewEntry) -> Result<Entry> {
        self.add_entry_at(user_id, new, Utc::now())
    }

    /// Insert a training entry with an explicit timestamp (backdating)
    pub fn add_entry_at(
        &self,
        user_id: i64,
        new: &NewEntry,
        created_at: DateTime<Utc>,
    ) -> Result<Entry> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO entries (user_id, exercise, exercise_raw, weight, reps, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                new.exercise,
                new.exercise_raw,
                new.weight,
                new.reps,
                new.comment,
                created_at.format(DATETIME_FORMAT).to_string(),
            ],
        )?;

        let entry = conn.query_row(
            "SELECT * FROM entries WHERE id = ?",
            params![conn.last_insert_rowid()],
            entry_from_row,
        )?;
        Ok(entry)
    }

    /// Get an entry by id
    pub fn entry(&self, entry_id: i64) -> Result<Option<Entry>> {
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                "SELECT * FROM entries WHERE id = ?",
                params![entry_id],
                entry_from_row,
            )
            .optional()?)
    }

    /// Apply a partial update to an entry
    ///
    /// Returns the updated entry, or None if it does not exist.
    pub fn update_entry(&self, entry_id: i64, patch: &EntryPatch) -> Result<Option<Entry>> {
        let conn = self.conn()?;

        // Build dynamic SET clause
        let mut sets = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref exercise) = patch.exercise {
            sets.push("exercise = ?");
            values.push(Box::new(exercise.clone()));
        }
        if let Some(ref exercise_raw) = patch.exercise_raw {
            sets.push("exercise_raw = ?");
            values.push(Box::new(exercise_raw.clone()));
        }
        if let Some(weight) = patch.weight {
            sets.push("weight = ?");
            values.push(Box::new(weight));
        }
        if let Some(reps) = patch.reps {
            sets.push("reps = ?");
            values.push(Box::new(reps));
        }
        if let Some(ref comment) = patch.comment {
            sets.push("comment = ?");
            values.push(Box::new(comment.clone()));
        }

        if !sets.is_empty() {
            values.push(Box::new(entry_id));
            let sql = format!("UPDATE entries SET {} WHERE id = ?", sets.join(", "));
            let value_refs: Vec<&dyn rusqlite::ToSql> =
                values.iter().map(|v| v.as_ref()).collect();
            conn.execute(&sql, value_refs.as_slice())?;
        }

        drop(conn);
        self.entry(entry_id)
    }

    /// Delete an entry, returning whether it existed
    pub fn delete_entry(&self, entry_id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM entries WHERE id = ?", params![entry_id])?;
        Ok(affected > 0)
    }

    /// All entries of a user for one calendar date, in logging order
    pub fn entries_for_date(&self, user_id: i64, date: NaiveDate) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM entries
            WHERE user_id = ? AND date(created_at) = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )?;
        let entries = stmt
            .query_map(params![user_id, date.to_string()], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Training session number: count of distinct days with entries
    pub fn training_number(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row(
            "SELECT COUNT(DISTINCT date(created_at)) FROM entries WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?)
    }

    /// History for one exercise, most recent first
    pub fn exercise_history(&self, user_id: i64, exercise: &str, limit: u32) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM entries
            WHERE user_id = ? AND exercise = ?
            ORDER BY created_at DESC, id DESC LIMIT ?
            "#,
        )?;
        let entries = stmt
            .query_map(params![user_id, exercise, limit], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Maximum weight ever logged for an exercise
    pub fn max_weight(&self, user_id: i64, exercise: &str) -> Result<Option<f64>> {
        let conn = self.conn()?;
        Ok(conn.query_row(
            r#"
            SELECT MAX(weight) FROM entries
            WHERE user_id = ? AND exercise = ? AND weight IS NOT NULL
            "#,
            params![user_id, exercise],
            |row| row.get(0),
        )?)
    }

    /// Most recent entry for an exercise strictly before a date
    pub fn last_entry_before(
        &self,
        user_id: i64,
        exercise: &str,
        before: NaiveDate,
    ) -> Result<Option<Entry>> {
        let conn = self.conn()?;
        Ok(conn
            .query_row(
                r#"
                SELECT * FROM entries
                WHERE user_id = ? AND exercise = ? AND date(created_at) < ?
                ORDER BY created_at DESC, id DESC LIMIT 1
                "#,
                params![user_id, exercise, before.to_string()],
                entry_from_row,
            )
            .optional()?)
    }

    /// Recent training sessions, newest date first, entries chronological
    pub fn recent_trainings(
        &self,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<(NaiveDate, Vec<Entry>)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT date(created_at) AS training_date
            FROM entries WHERE user_id = ?
            ORDER BY training_date DESC LIMIT ?
            "#,
        )?;
        let dates = stmt
            .query_map(params![user_id, limit], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        drop(stmt);
        drop(conn);

        let mut result = Vec::with_capacity(dates.len());
        for raw in dates {
            let Some(date) = parse_date(&raw) else {
                continue;
            };
            result.push((date, self.entries_for_date(user_id, date)?));
        }
        Ok(result)
    }

    /// All distinct exercise names of a user, alphabetical
    pub fn exercises(&self, user_id: i64) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT exercise FROM entries WHERE user_id = ? ORDER BY exercise",
        )?;
        let names = stmt
            .query_map(params![user_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Aggregate statistics for one exercise
    pub fn exercise_stats(&self, user_id: i64, exercise: &str) -> Result<ExerciseStats> {
        let conn = self.conn()?;
        Ok(conn.query_row(
            r#"
            SELECT
                COUNT(*),
                MAX(weight),
                MAX(reps),
                AVG(weight),
                MIN(date(created_at)),
                MAX(date(created_at))
            FROM entries
            WHERE user_id = ? AND exercise = ?
            "#,
            params![user_id, exercise],
            |row| {
                Ok(ExerciseStats {
                    total_sets: row.get(0)?,
                    max_weight: row.get(1)?,
                    max_reps: row.get(2)?,
                    avg_weight: row
                        .get::<_, Option<f64>>(3)?
                        .map(|avg| (avg * 10.0).round() / 10.0),
                    first_date: row.get::<_, Option<String>>(4)?.as_deref().and_then(parse_date),
                    last_date: row.get::<_, Option<String>>(5)?.as_deref().and_then(parse_date),
                })
            },
        )?)
    }

    /// Aggregate statistics across all of a user's entries
    pub fn total_stats(&self, user_id: i64) -> Result<TotalStats> {
        let conn = self.conn()?;
        Ok(conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COUNT(DISTINCT exercise),
                COUNT(DISTINCT date(created_at)),
                MIN(date(created_at)),
                MAX(date(created_at))
            FROM entries WHERE user_id = ?
            "#,
            params![user_id],
            |row| {
                Ok(TotalStats {
                    total_sets: row.get(0)?,
                    total_exercises: row.get(1)?,
                    total_trainings: row.get(2)?,
                    first_date: row.get::<_, Option<String>>(3)?.as_deref().and_then(parse_date),
                    last_date: row.get::<_, Option<String>>(4)?.as_deref().and_then(parse_date),
                })
            },
        )?)
    }

    /// Total entry count across all users
    pub fn entry_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?)
    }
}

impl HistoryProvider for Database {
    fn exercise_history(&self, user_id: i64, exercise: &str, limit: u32) -> Result<Vec<Entry>> {
        Database::exercise_history(self, user_id, exercise, limit)
    }

    fn last_entry_before(
        &self,
        user_id: i64,
        exercise: &str,
        before: NaiveDate,
    ) -> Result<Option<Entry>> {
        Database::last_entry_before(self, user_id, exercise, before)
    }

    fn max_weight(&self, user_id: i64, exercise: &str) -> Result<Option<f64>> {
        Database::max_weight(self, user_id, exercise)
    }
}
