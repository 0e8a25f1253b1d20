//! Entry and session rendering

use chrono::{Datelike, NaiveDate};

use super::messages;
use crate::models::Entry;

/// Format a weight value for display
///
/// Whole kilograms render without a fraction ("60 кг"), anything else with
/// one decimal place ("72.5 кг"). An absent weight renders as an em-dash.
/// This is the single shared rule; insight texts and entry rendering both
/// go through it.
pub fn format_weight(weight: Option<f64>) -> String {
    match weight {
        None => "—".to_string(),
        Some(w) if w.fract() == 0.0 => format!("{} кг", w as i64),
        Some(w) => format!("{:.1} кг", w),
    }
}

/// Render an entry as a multi-line card
pub fn format_entry(entry: &Entry, include_time: bool) -> String {
    let mut parts = vec![format!("📋 {}", entry.exercise)];

    let mut weight_reps = Vec::new();
    if entry.weight.is_some() {
        weight_reps.push(format_weight(entry.weight));
    }
    if let Some(reps) = entry.reps {
        weight_reps.push(format!("{} повт.", reps));
    }
    if !weight_reps.is_empty() {
        parts.push(format!("🏋️ {}", weight_reps.join(" × ")));
    }

    if let Some(ref comment) = entry.comment {
        parts.push(format!("💬 {}", comment));
    }

    if include_time {
        parts.push(format!("🕐 {}", entry.created_at.format("%H:%M")));
    }

    parts.join("\n")
}

/// Render an entry on one line
pub fn format_entry_compact(entry: &Entry) -> String {
    let mut parts = vec![entry.exercise.clone()];
    if entry.weight.is_some() {
        parts.push(format_weight(entry.weight));
    }
    if let Some(reps) = entry.reps {
        parts.push(format!("×{}", reps));
    }
    if let Some(ref comment) = entry.comment {
        parts.push(format!("({})", comment));
    }
    parts.join(" ")
}

/// Render a date header relative to today
pub fn format_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        messages::TODAY.to_string()
    } else if today.pred_opt() == Some(date) {
        messages::YESTERDAY.to_string()
    } else {
        format!(
            "{} {}",
            date.day(),
            messages::MONTHS[date.month0() as usize]
        )
    }
}

/// Render a training session: date header plus numbered, timestamped lines
pub fn format_training_summary(entries: &[Entry], date: NaiveDate, today: NaiveDate) -> String {
    if entries.is_empty() {
        return messages::NO_ENTRIES.to_string();
    }

    let mut lines = vec![format!("📆 {}", format_date(date, today)), String::new()];

    for (i, entry) in entries.iter().enumerate() {
        lines.push(format!(
            "{}. [{}] {}",
            i + 1,
            entry.created_at.format("%H:%M"),
            format_entry_compact(entry)
        ));
    }

    lines.join("\n")
}
