//! CLI argument definitions using clap
//!
//! This module contains the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Liftlog - voice-first training diary
#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Telegram bot that logs strength-training sets from voice messages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (default: LIFTLOG_DB env var or the platform data dir)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Run the Telegram bot (long polling)
    ///
    /// Requires TELEGRAM_BOT_TOKEN, OPENAI_API_KEY and ANTHROPIC_API_KEY.
    Serve,

    /// Show database status
    Status,

    /// Show today's training for a user
    Today {
        /// Telegram user id
        #[arg(long)]
        user: i64,
    },

    /// Show recent trainings for a user
    History {
        /// Telegram user id
        #[arg(long)]
        user: i64,

        /// How many sessions to show
        #[arg(long, default_value = "5")]
        limit: u32,
    },

    /// Show statistics for a user, overall or for one exercise
    Stats {
        /// Telegram user id
        #[arg(long)]
        user: i64,

        /// Exercise name (substring match)
        exercise: Option<String>,
    },
}
