//! Liftlog Telegram transport
//!
//! Long-polling dispatcher around the Bot API: receives updates, routes them
//! to handlers, and keeps going when an individual update fails. All domain
//! logic lives in `liftlog-core`; this crate is transport and presentation
//! wiring only.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use liftlog_core::{ClaudeParser, Database, WhisperTranscriber};

pub mod config;
pub mod handlers;
pub mod keyboards;
pub mod replies;
pub mod state;
pub mod telegram;

pub use config::Config;
pub use handlers::BotContext;

use state::EditSessions;
use telegram::TelegramClient;

/// Pause after a failed getUpdates call before retrying
const POLL_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Build the runtime context from configuration
pub fn build_context(config: &Config) -> anyhow::Result<BotContext> {
    let db_path = config
        .db_path
        .to_str()
        .context("database path is not valid UTF-8")?;

    Ok(BotContext {
        api: TelegramClient::new(&config.telegram_bot_token),
        db: Database::new(db_path)?,
        speech: Arc::new(WhisperTranscriber::new(&config.openai_api_key)),
        parser: Arc::new(ClaudeParser::new(&config.anthropic_api_key)),
        edits: EditSessions::new(),
    })
}

/// Run the long-polling loop until the process is stopped
pub async fn run(config: Config) -> anyhow::Result<()> {
    let ctx = Arc::new(build_context(&config)?);
    info!(db = %config.db_path.display(), "Starting bot");

    let mut offset: Option<i64> = None;
    loop {
        let updates = match ctx.api.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "getUpdates failed, retrying");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move {
                handlers::handle_update(&ctx, update).await;
            });
        }
    }
}
