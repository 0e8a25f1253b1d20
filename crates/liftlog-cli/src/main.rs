//! Liftlog CLI - voice-first training diary
//!
//! Usage:
//!   liftlog init              Initialize database
//!   liftlog serve             Run the Telegram bot
//!   liftlog status            Show database status
//!   liftlog today --user ID   Show today's training

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let db = cli.db.as_deref();
    match cli.command {
        Commands::Init => commands::cmd_init(db),
        Commands::Serve => commands::cmd_serve(db).await,
        Commands::Status => commands::cmd_status(db),
        Commands::Today { user } => commands::cmd_today(db, user),
        Commands::History { user, limit } => commands::cmd_history(db, user, limit),
        Commands::Stats { user, exercise } => commands::cmd_stats(db, user, exercise.as_deref()),
    }
}
