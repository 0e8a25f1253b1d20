//! Update handlers: commands, voice messages, callbacks, edit input

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use liftlog_core::text::{format_entry, format_training_summary, format_weight};
use liftlog_core::{
    insights_for_entry, Database, Entry, EntryPatch, NewEntry, ParserBackend, SpeechBackend,
};

use crate::keyboards::{
    cancel_keyboard, confirm_delete_keyboard, entry_edit_keyboard, exercise_list_keyboard,
    Callback, EditField,
};
use crate::replies;
use crate::state::{EditSessions, PendingEdit};
use crate::telegram::{CallbackQuery, Message, TelegramClient, Update, Voice};

/// How many insights a logged-entry message shows
const MAX_INSIGHTS: usize = 4;

/// How many past sessions /history shows
const HISTORY_SESSIONS: u32 = 5;

/// Everything a handler needs, constructed once at startup
pub struct BotContext {
    pub api: TelegramClient,
    pub db: Database,
    pub speech: Arc<dyn SpeechBackend>,
    pub parser: Arc<dyn ParserBackend>,
    pub edits: EditSessions,
}

/// Entry point for one update; failures are logged, never propagated
pub async fn handle_update(ctx: &BotContext, update: Update) {
    let update_id = update.update_id;
    let result = if let Some(message) = update.message {
        handle_message(ctx, message).await
    } else if let Some(query) = update.callback_query {
        handle_callback(ctx, query).await
    } else {
        Ok(())
    };

    if let Err(e) = result {
        error!(update_id, error = ?e, "Update handling failed");
    }
}

async fn handle_message(ctx: &BotContext, message: Message) -> anyhow::Result<()> {
    let Some(from) = message.from.clone() else {
        return Ok(());
    };

    if let Some(voice) = message.voice.clone() {
        return handle_voice(ctx, &message, from.id, &voice).await;
    }

    let Some(text) = message.text.clone() else {
        return Ok(());
    };

    if text.starts_with('/') {
        return handle_command(ctx, &message, from.id, &text).await;
    }

    if let Some(pending) = ctx.edits.get(message.chat.id).await {
        return handle_edit_input(ctx, &message, pending, &text).await;
    }

    // Plain text outside an edit: nothing to do
    Ok(())
}

/// Split "/exercise жим лёжа" into the command and its argument tail,
/// dropping a "@botname" suffix
fn split_command(text: &str) -> (&str, &str) {
    let mut parts = text.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();
    let command = command.split('@').next().unwrap_or(command);
    (command, args)
}

/// Render an optional stats date as an ISO date, or an em-dash when absent
fn date_or_dash(date: Option<chrono::NaiveDate>) -> String {
    match date {
        Some(d) => d.to_string(),
        None => "—".to_string(),
    }
}

async fn handle_command(
    ctx: &BotContext,
    message: &Message,
    telegram_id: i64,
    text: &str,
) -> anyhow::Result<()> {
    let chat_id = message.chat.id;
    let (command, args) = split_command(text);
    debug!(chat_id, command, "Handling command");

    match command {
        "/start" => {
            ctx.db.get_or_create_user(telegram_id)?;
            ctx.api.send_message(chat_id, replies::START, None).await?;
        }
        "/today" => cmd_today(ctx, chat_id, telegram_id).await?,
        "/history" => cmd_history(ctx, chat_id, telegram_id).await?,
        "/stats" => cmd_stats(ctx, chat_id, telegram_id).await?,
        "/exercise" => cmd_exercise(ctx, chat_id, telegram_id, args).await?,
        "/cancel" => {
            let reply = if ctx.edits.clear(chat_id).await {
                replies::CANCELLED
            } else {
                replies::NOTHING_TO_CANCEL
            };
            ctx.api.send_message(chat_id, reply, None).await?;
        }
        _ => {} // unknown commands are ignored
    }
    Ok(())
}

async fn cmd_today(ctx: &BotContext, chat_id: i64, telegram_id: i64) -> anyhow::Result<()> {
    let user_id = ctx.db.get_or_create_user(telegram_id)?;
    let today = Utc::now().date_naive();
    let entries = ctx.db.entries_for_date(user_id, today)?;

    if entries.is_empty() {
        ctx.api.send_message(chat_id, replies::TODAY_EMPTY, None).await?;
        return Ok(());
    }

    let summary = format_training_summary(&entries, today, today);
    let training_num = ctx.db.training_number(user_id)?;
    let text = format!("🏋️ Тренировка #{}\n\n{}", training_num, summary);
    ctx.api.send_message(chat_id, &text, None).await?;
    Ok(())
}

async fn cmd_history(ctx: &BotContext, chat_id: i64, telegram_id: i64) -> anyhow::Result<()> {
    let user_id = ctx.db.get_or_create_user(telegram_id)?;
    let trainings = ctx.db.recent_trainings(user_id, HISTORY_SESSIONS)?;

    if trainings.is_empty() {
        ctx.api.send_message(chat_id, replies::HISTORY_EMPTY, None).await?;
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let mut lines = vec![replies::HISTORY_HEADER.to_string(), String::new()];
    for (date, entries) in &trainings {
        lines.push(format_training_summary(entries, *date, today));
        lines.push(String::new());
    }

    ctx.api.send_message(chat_id, lines.join("\n").trim_end(), None).await?;
    Ok(())
}

async fn cmd_stats(ctx: &BotContext, chat_id: i64, telegram_id: i64) -> anyhow::Result<()> {
    let user_id = ctx.db.get_or_create_user(telegram_id)?;
    let stats = ctx.db.total_stats(user_id)?;

    if stats.total_sets == 0 {
        ctx.api.send_message(chat_id, replies::STATS_EMPTY, None).await?;
        return Ok(());
    }

    let text = format!(
        "📊 Общая статистика:\n\n\
         🏋️ Всего подходов: {}\n\
         📋 Упражнений: {}\n\
         📆 Тренировок: {}\n\n\
         📅 Первая тренировка: {}\n\
         📅 Последняя: {}\n\n\
         Выбери упражнение для детальной статистики:",
        stats.total_sets,
        stats.total_exercises,
        stats.total_trainings,
        date_or_dash(stats.first_date),
        date_or_dash(stats.last_date),
    );

    let exercises = ctx.db.exercises(user_id)?;
    let keyboard = exercise_list_keyboard(&exercises);
    ctx.api.send_message(chat_id, &text, Some(&keyboard)).await?;
    Ok(())
}

async fn cmd_exercise(
    ctx: &BotContext,
    chat_id: i64,
    telegram_id: i64,
    args: &str,
) -> anyhow::Result<()> {
    let user_id = ctx.db.get_or_create_user(telegram_id)?;
    let exercises = ctx.db.exercises(user_id)?;

    if args.is_empty() {
        let text = if exercises.is_empty() {
            replies::NO_EXERCISES.to_string()
        } else {
            replies::exercise_hint(&exercises)
        };
        ctx.api.send_message(chat_id, &text, None).await?;
        return Ok(());
    }

    let query = args.to_lowercase();
    let matching = exercises.iter().find(|e| e.to_lowercase().contains(&query));

    match matching {
        Some(exercise) => show_exercise_stats(ctx, chat_id, user_id, exercise).await?,
        None => {
            ctx.api
                .send_message(chat_id, &replies::exercise_not_found(args), None)
                .await?;
        }
    }
    Ok(())
}

async fn show_exercise_stats(
    ctx: &BotContext,
    chat_id: i64,
    user_id: i64,
    exercise: &str,
) -> anyhow::Result<()> {
    let stats = ctx.db.exercise_stats(user_id, exercise)?;
    let history = ctx.db.exercise_history(user_id, exercise, 5)?;

    let mut lines = vec![
        format!("📊 {}", exercise),
        String::new(),
        format!("🏋️ Всего подходов: {}", stats.total_sets),
    ];

    if let Some(weight) = stats.max_weight {
        lines.push(format!("💪 Макс. вес: {}", format_weight(Some(weight))));
    }
    if let Some(reps) = stats.max_reps {
        lines.push(format!("🔄 Макс. повторений: {}", reps));
    }
    if let Some(avg) = stats.avg_weight {
        lines.push(format!("📈 Средний вес: {}", format_weight(Some(avg))));
    }

    lines.push(String::new());
    lines.push(format!("📅 Первый раз: {}", date_or_dash(stats.first_date)));
    lines.push(format!("📅 Последний: {}", date_or_dash(stats.last_date)));

    if !history.is_empty() {
        lines.push(String::new());
        lines.push("Последние подходы:".to_string());
        for entry in &history {
            let weight = entry
                .weight
                .map(|w| format_weight(Some(w)))
                .unwrap_or_default();
            let reps = entry.reps.map(|r| format!("×{}", r)).unwrap_or_default();
            let line = format!("• {}: {} {}", entry.created_at.format("%d.%m"), weight, reps);
            lines.push(line.trim_end().to_string());
        }
    }

    ctx.api.send_message(chat_id, &lines.join("\n"), None).await?;
    Ok(())
}

// === Voice flow ===

async fn handle_voice(
    ctx: &BotContext,
    message: &Message,
    telegram_id: i64,
    voice: &Voice,
) -> anyhow::Result<()> {
    let chat_id = message.chat.id;
    let user_id = ctx.db.get_or_create_user(telegram_id)?;

    let processing = ctx.api.send_message(chat_id, replies::PROCESSING, None).await?;

    match process_voice(ctx, user_id, voice).await {
        Ok(Some(entry)) => {
            let text = build_entry_message(&ctx.db, &entry)?;
            ctx.api
                .edit_message_text(
                    chat_id,
                    processing.message_id,
                    &text,
                    Some(&entry_edit_keyboard(entry.id)),
                )
                .await?;
        }
        Ok(None) => {
            ctx.api
                .edit_message_text(chat_id, processing.message_id, replies::NO_SPEECH, None)
                .await?;
        }
        Err(e) => {
            error!(user_id, error = ?e, "Voice processing failed");
            ctx.api
                .edit_message_text(
                    chat_id,
                    processing.message_id,
                    &replies::processing_error(&e.to_string()),
                    None,
                )
                .await?;
        }
    }
    Ok(())
}

/// Download, transcribe, parse and store one voice message
///
/// Returns None when nothing intelligible was said.
async fn process_voice(
    ctx: &BotContext,
    user_id: i64,
    voice: &Voice,
) -> anyhow::Result<Option<Entry>> {
    let file = ctx.api.get_file(&voice.file_id).await?;
    let file_path = file
        .file_path
        .context("getFile response carried no file_path")?;
    let audio = ctx.api.download_file(&file_path).await?;

    info!(user_id, bytes = audio.len(), "Transcribing voice message");
    let transcript = ctx.speech.transcribe(&audio, "voice.ogg").await?;
    info!(transcript = %transcript, "Transcribed");

    if transcript.trim().is_empty() {
        return Ok(None);
    }

    let parsed = ctx.parser.parse_entry(&transcript).await?;
    debug!(?parsed, "Parsed exercise");

    let entry = ctx.db.add_entry(
        user_id,
        &NewEntry {
            exercise: parsed.exercise,
            exercise_raw: parsed.exercise_raw,
            weight: parsed.weight,
            reps: parsed.reps,
            comment: parsed.comment,
        },
    )?;
    Ok(Some(entry))
}

/// The message shown for a logged entry: confirmation header, entry card,
/// and the top insights
pub fn build_entry_message(db: &Database, entry: &Entry) -> anyhow::Result<String> {
    let today = Utc::now().date_naive();
    let training_num = db.training_number(entry.user_id)?;
    let today_entries = db.entries_for_date(entry.user_id, today)?;
    let set_num = today_entries
        .iter()
        .position(|e| e.id == entry.id)
        .map(|i| i + 1)
        .unwrap_or(today_entries.len());

    let mut lines = vec![
        format!("✅ Записано в тренировку #{} (подход {})", training_num, set_num),
        String::new(),
        format_entry(entry, false),
    ];

    let insights = insights_for_entry(db, entry, today)?;
    if !insights.is_empty() {
        lines.push(String::new());
        lines.push("📊 Аналитика:".to_string());
        for insight in insights.iter().take(MAX_INSIGHTS) {
            lines.push(insight.to_string());
        }
    }

    Ok(lines.join("\n"))
}

// === Callbacks ===

async fn handle_callback(ctx: &BotContext, query: CallbackQuery) -> anyhow::Result<()> {
    let Some(data) = query.data.clone() else {
        ctx.api.answer_callback_query(&query.id, None, false).await?;
        return Ok(());
    };
    let Some(callback) = Callback::parse(&data) else {
        warn!(data = %data, "Unknown callback data");
        ctx.api.answer_callback_query(&query.id, None, false).await?;
        return Ok(());
    };
    let Some(message) = query.message.clone() else {
        ctx.api.answer_callback_query(&query.id, None, false).await?;
        return Ok(());
    };
    let chat_id = message.chat.id;

    match callback {
        Callback::Edit { entry_id, field } => {
            let Some(entry) = ctx.db.entry(entry_id)? else {
                ctx.api
                    .answer_callback_query(&query.id, Some(replies::ENTRY_NOT_FOUND), true)
                    .await?;
                return Ok(());
            };

            ctx.edits
                .begin(
                    chat_id,
                    PendingEdit {
                        entry_id,
                        message_id: message.message_id,
                        field,
                    },
                )
                .await;

            ctx.api
                .send_message(chat_id, &replies::edit_prompt(&entry, field), Some(&cancel_keyboard()))
                .await?;
            ctx.api.answer_callback_query(&query.id, None, false).await?;
        }
        Callback::Delete { entry_id } => {
            let Some(entry) = ctx.db.entry(entry_id)? else {
                ctx.api
                    .answer_callback_query(&query.id, Some(replies::ENTRY_NOT_FOUND), true)
                    .await?;
                return Ok(());
            };

            ctx.api
                .send_message(
                    chat_id,
                    &replies::delete_confirmation(&format_entry(&entry, false)),
                    Some(&confirm_delete_keyboard(entry_id)),
                )
                .await?;
            ctx.api.answer_callback_query(&query.id, None, false).await?;
        }
        Callback::ConfirmDelete { entry_id } => {
            let reply = if ctx.db.delete_entry(entry_id)? {
                replies::ENTRY_DELETED
            } else {
                replies::ENTRY_DELETE_MISSING
            };
            ctx.api
                .edit_message_text(chat_id, message.message_id, reply, None)
                .await?;
            ctx.api.answer_callback_query(&query.id, None, false).await?;
        }
        Callback::CancelDelete { .. } => {
            ctx.api.delete_message(chat_id, message.message_id).await?;
            ctx.api
                .answer_callback_query(&query.id, Some(replies::CANCELLED_SHORT), false)
                .await?;
        }
        Callback::Cancel => {
            ctx.edits.clear(chat_id).await;
            ctx.api.delete_message(chat_id, message.message_id).await?;
            ctx.api
                .answer_callback_query(&query.id, Some(replies::CANCELLED_SHORT), false)
                .await?;
        }
        Callback::ExerciseStats { exercise } => {
            let user_id = ctx.db.get_or_create_user(query.from.id)?;
            show_exercise_stats(ctx, chat_id, user_id, &exercise).await?;
            ctx.api.answer_callback_query(&query.id, None, false).await?;
        }
        Callback::Noop => {
            ctx.api.answer_callback_query(&query.id, None, false).await?;
        }
    }
    Ok(())
}

// === Edit input ===

/// Parse weight input like "60", "72,5" or "80 кг"
fn parse_weight_input(text: &str) -> Option<f64> {
    let cleaned = text
        .trim()
        .to_lowercase()
        .replace(',', ".")
        .replace("кг", "")
        .replace("kg", "");
    cleaned.trim().parse().ok().filter(|w: &f64| *w >= 0.0)
}

/// Parse reps input: a positive integer
fn parse_reps_input(text: &str) -> Option<u32> {
    text.trim().parse().ok().filter(|r: &u32| *r > 0)
}

async fn handle_edit_input(
    ctx: &BotContext,
    message: &Message,
    pending: PendingEdit,
    text: &str,
) -> anyhow::Result<()> {
    let chat_id = message.chat.id;

    let patch = match pending.field {
        EditField::Exercise => {
            let raw = text.trim();
            // Failure keeps the pending edit so the user can retry
            let normalized = ctx.parser.normalize_exercise(raw).await?;
            EntryPatch {
                exercise: Some(normalized),
                exercise_raw: Some(raw.to_string()),
                ..Default::default()
            }
        }
        EditField::Weight => {
            let Some(weight) = parse_weight_input(text) else {
                ctx.api.send_message(chat_id, replies::WEIGHT_INPUT_ERROR, None).await?;
                return Ok(());
            };
            EntryPatch {
                weight: Some(weight),
                ..Default::default()
            }
        }
        EditField::Reps => {
            let Some(reps) = parse_reps_input(text) else {
                ctx.api.send_message(chat_id, replies::REPS_INPUT_ERROR, None).await?;
                return Ok(());
            };
            EntryPatch {
                reps: Some(reps),
                ..Default::default()
            }
        }
        EditField::Comment => {
            let comment = match text.trim() {
                "-" => None,
                other => Some(other.to_string()),
            };
            EntryPatch {
                comment: Some(comment),
                ..Default::default()
            }
        }
    };

    let old = ctx.db.entry(pending.entry_id)?;
    let Some(entry) = ctx.db.update_entry(pending.entry_id, &patch)? else {
        ctx.edits.clear(chat_id).await;
        ctx.api.send_message(chat_id, replies::ENTRY_DELETE_MISSING, None).await?;
        return Ok(());
    };
    ctx.edits.clear(chat_id).await;

    let confirmation = match pending.field {
        EditField::Exercise => replies::exercise_changed(&entry.exercise),
        EditField::Weight => {
            replies::weight_changed(old.and_then(|e| e.weight), entry.weight.unwrap_or_default())
        }
        EditField::Reps => {
            replies::reps_changed(old.and_then(|e| e.reps), entry.reps.unwrap_or_default())
        }
        EditField::Comment => replies::COMMENT_UPDATED.to_string(),
    };
    ctx.api.send_message(chat_id, &confirmation, None).await?;

    refresh_entry_message(ctx, chat_id, pending.message_id, &entry).await;
    Ok(())
}

/// Re-render the original logged-entry message after an edit
async fn refresh_entry_message(ctx: &BotContext, chat_id: i64, message_id: i64, entry: &Entry) {
    match build_entry_message(&ctx.db, entry) {
        Ok(text) => {
            if let Err(e) = ctx
                .api
                .edit_message_text(chat_id, message_id, &text, Some(&entry_edit_keyboard(entry.id)))
                .await
            {
                warn!(error = %e, "Could not update original entry message");
            }
        }
        Err(e) => warn!(error = ?e, "Could not rebuild entry message"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("/start"), ("/start", ""));
        assert_eq!(split_command("/exercise жим лёжа"), ("/exercise", "жим лёжа"));
        assert_eq!(split_command("/start@liftlog_bot"), ("/start", ""));
        assert_eq!(split_command("/exercise@liftlog_bot присед"), ("/exercise", "присед"));
    }

    #[test]
    fn test_parse_weight_input() {
        assert_eq!(parse_weight_input("60"), Some(60.0));
        assert_eq!(parse_weight_input("72,5"), Some(72.5));
        assert_eq!(parse_weight_input("80 кг"), Some(80.0));
        assert_eq!(parse_weight_input("80KG"), Some(80.0));
        assert_eq!(parse_weight_input("  62.5 "), Some(62.5));
        assert_eq!(parse_weight_input("тяжело"), None);
        assert_eq!(parse_weight_input("-5"), None);
    }

    #[test]
    fn test_parse_reps_input() {
        assert_eq!(parse_reps_input("8"), Some(8));
        assert_eq!(parse_reps_input(" 12 "), Some(12));
        assert_eq!(parse_reps_input("0"), None);
        assert_eq!(parse_reps_input("8.5"), None);
        assert_eq!(parse_reps_input("восемь"), None);
    }

    #[test]
    fn test_build_entry_message_first_time() {
        let db = Database::in_memory().unwrap();
        let user = db.get_or_create_user(1).unwrap();
        let entry = db
            .add_entry(
                user,
                &NewEntry {
                    exercise: "присед".to_string(),
                    exercise_raw: "Присед".to_string(),
                    weight: Some(60.0),
                    reps: Some(6),
                    comment: None,
                },
            )
            .unwrap();

        let text = build_entry_message(&db, &entry).unwrap();
        assert!(text.starts_with("✅ Записано в тренировку #1 (подход 1)"));
        assert!(text.contains("📋 присед"));
        assert!(text.contains("🏋️ 60 кг × 6 повт."));
        assert!(text.contains("📊 Аналитика:"));
        assert!(text.contains("🆕 Первое выполнение этого упражнения!"));
    }

    #[test]
    fn test_build_entry_message_caps_insights() {
        let db = Database::in_memory().unwrap();
        let user = db.get_or_create_user(1).unwrap();

        // Seed history that triggers record, trend, progress and gap insights
        let today = Utc::now().date_naive();
        let seed = |exercise: &str, weight: f64, days_ago: i64| {
            let created = (today - chrono::Duration::days(days_ago))
                .and_hms_opt(18, 0, 0)
                .unwrap()
                .and_utc();
            db.add_entry_at(
                user,
                &NewEntry {
                    exercise: exercise.to_string(),
                    exercise_raw: exercise.to_string(),
                    weight: Some(weight),
                    reps: Some(6),
                    comment: None,
                },
                created,
            )
            .unwrap();
        };
        seed("присед", 55.0, 7);
        seed("присед", 60.0, 2);

        let entry = db
            .add_entry(
                user,
                &NewEntry {
                    exercise: "присед".to_string(),
                    exercise_raw: "присед".to_string(),
                    weight: Some(65.0),
                    reps: Some(6),
                    comment: None,
                },
            )
            .unwrap();

        let text = build_entry_message(&db, &entry).unwrap();
        let insight_lines = text
            .lines()
            .skip_while(|l| *l != "📊 Аналитика:")
            .skip(1)
            .count();
        assert!(insight_lines <= MAX_INSIGHTS);
        assert!(text.contains("🏆"));
    }
}
