//! Bot configuration from environment variables

use std::path::PathBuf;

use anyhow::Context;

/// Environment variable overriding the database location
pub const DB_PATH_ENV: &str = "LIFTLOG_DB";

#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram Bot API token (от @BotFather)
    pub telegram_bot_token: String,
    /// OpenAI key, used for voice transcription
    pub openai_api_key: String,
    /// Anthropic key, used for entry parsing
    pub anthropic_api_key: String,
    /// SQLite database location
    pub db_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `TELEGRAM_BOT_TOKEN`, `OPENAI_API_KEY` and `ANTHROPIC_API_KEY` are
    /// required; the database path falls back from `LIFTLOG_DB` to the
    /// platform data directory.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            telegram_bot_token: require_env("TELEGRAM_BOT_TOKEN")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            db_path: std::env::var(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_db_path()),
        })
    }
}

fn require_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{} is not set", name))
}

/// Default database location: ~/.local/share/liftlog/liftlog.db on
/// Linux/Mac, falling back to the working directory
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("liftlog").join("liftlog.db"))
        .unwrap_or_else(|| PathBuf::from("liftlog.db"))
}
