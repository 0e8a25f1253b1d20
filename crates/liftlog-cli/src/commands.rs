//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;

use liftlog_bot::config::{default_db_path, Config, DB_PATH_ENV};
use liftlog_core::text::{format_training_summary, format_weight};
use liftlog_core::Database;

/// Resolve the database path: flag > LIFTLOG_DB > platform data dir
pub fn resolve_db_path(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var(DB_PATH_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

/// Open (and migrate) the database
pub fn open_db(flag: Option<&Path>) -> anyhow::Result<Database> {
    let path = resolve_db_path(flag);
    let path = path.to_str().context("database path is not valid UTF-8")?;
    Ok(Database::new(path)?)
}

pub fn cmd_init(db_flag: Option<&Path>) -> anyhow::Result<()> {
    let db = open_db(db_flag)?;
    println!("Database ready: {}", db.path());
    Ok(())
}

pub async fn cmd_serve(db_flag: Option<&Path>) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(db) = db_flag {
        config.db_path = db.to_path_buf();
    }
    liftlog_bot::run(config).await
}

pub fn cmd_status(db_flag: Option<&Path>) -> anyhow::Result<()> {
    let db = open_db(db_flag)?;
    println!("Database: {}", db.path());
    println!("Users:    {}", db.user_count()?);
    println!("Entries:  {}", db.entry_count()?);
    Ok(())
}

pub fn cmd_today(db_flag: Option<&Path>, telegram_id: i64) -> anyhow::Result<()> {
    let db = open_db(db_flag)?;
    let user_id = db.get_or_create_user(telegram_id)?;
    let today = Utc::now().date_naive();

    let entries = db.entries_for_date(user_id, today)?;
    if entries.is_empty() {
        println!("Нет записей");
        return Ok(());
    }

    let training_num = db.training_number(user_id)?;
    println!("🏋️ Тренировка #{}", training_num);
    println!();
    println!("{}", format_training_summary(&entries, today, today));
    Ok(())
}

pub fn cmd_history(db_flag: Option<&Path>, telegram_id: i64, limit: u32) -> anyhow::Result<()> {
    let db = open_db(db_flag)?;
    let user_id = db.get_or_create_user(telegram_id)?;
    let today = Utc::now().date_naive();

    let trainings = db.recent_trainings(user_id, limit)?;
    if trainings.is_empty() {
        println!("История пуста");
        return Ok(());
    }

    for (date, entries) in &trainings {
        println!("{}", format_training_summary(entries, *date, today));
        println!();
    }
    Ok(())
}

pub fn cmd_stats(
    db_flag: Option<&Path>,
    telegram_id: i64,
    exercise: Option<&str>,
) -> anyhow::Result<()> {
    let db = open_db(db_flag)?;
    let user_id = db.get_or_create_user(telegram_id)?;

    match exercise {
        Some(query) => cmd_exercise_stats(&db, user_id, query),
        None => cmd_total_stats(&db, user_id),
    }
}

fn cmd_total_stats(db: &Database, user_id: i64) -> anyhow::Result<()> {
    let stats = db.total_stats(user_id)?;
    if stats.total_sets == 0 {
        println!("Статистика пуста");
        return Ok(());
    }

    println!("Всего подходов: {}", stats.total_sets);
    println!("Упражнений:     {}", stats.total_exercises);
    println!("Тренировок:     {}", stats.total_trainings);
    if let (Some(first), Some(last)) = (stats.first_date, stats.last_date) {
        println!("Первая: {}  Последняя: {}", first, last);
    }

    println!();
    println!("Упражнения:");
    for exercise in db.exercises(user_id)? {
        println!("  • {}", exercise);
    }
    Ok(())
}

fn cmd_exercise_stats(db: &Database, user_id: i64, query: &str) -> anyhow::Result<()> {
    let exercises = db.exercises(user_id)?;
    let needle = query.to_lowercase();
    let Some(exercise) = exercises.iter().find(|e| e.to_lowercase().contains(&needle)) else {
        bail!("Упражнение «{}» не найдено", query);
    };

    let stats = db.exercise_stats(user_id, exercise)?;
    let history = db.exercise_history(user_id, exercise, 5)?;

    println!("📊 {}", exercise);
    println!();
    println!("Всего подходов: {}", stats.total_sets);
    if stats.max_weight.is_some() {
        println!("Макс. вес:      {}", format_weight(stats.max_weight));
    }
    if let Some(reps) = stats.max_reps {
        println!("Макс. повторений: {}", reps);
    }
    if stats.avg_weight.is_some() {
        println!("Средний вес:    {}", format_weight(stats.avg_weight));
    }

    if !history.is_empty() {
        println!();
        println!("Последние подходы:");
        for entry in &history {
            let weight = entry
                .weight
                .map(|w| format_weight(Some(w)))
                .unwrap_or_default();
            let reps = entry.reps.map(|r| format!("×{}", r)).unwrap_or_default();
            let line = format!("  {}: {} {}", entry.created_at.format("%d.%m"), weight, reps);
            println!("{}", line.trim_end());
        }
    }
    Ok(())
}
