//! Telegram user bookkeeping

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::Result;

impl Database {
    /// Get the internal user id for a Telegram account, creating it if needed
    pub fn get_or_create_user(&self, telegram_id: i64) -> Result<i64> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE telegram_id = ?",
                params![telegram_id],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(id);
        }

        conn.execute(
            "INSERT INTO users (telegram_id) VALUES (?)",
            params![telegram_id],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Number of registered users
    pub fn user_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }
}
