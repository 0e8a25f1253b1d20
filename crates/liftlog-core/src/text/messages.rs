//! Russian message catalog
//!
//! The wording is a product requirement; keep it here rather than scattered
//! through the engine and handlers, so localization touches one file.

use super::format::format_weight;
use super::plural::{count_word, DAY_WORDS, WEEK_WORDS};

// Insight texts

pub const FIRST_TIME: &str = "Первое выполнение этого упражнения!";
pub const DONE_YESTERDAY: &str = "Вчера тоже делали это упражнение";
pub const SAME_RESULT: &str = "Тот же результат, что и в прошлый раз";

pub fn weight_record(previous: Option<f64>) -> String {
    format!("Личный рекорд веса! Было: {}", format_weight(previous))
}

pub fn reps_record(weight: f64, previous_reps: u32) -> String {
    format!(
        "Рекорд повторений на {}! Было: {}",
        format_weight(Some(weight)),
        previous_reps
    )
}

pub fn days_since_last(days: u64) -> String {
    format!("Последний раз: {} {} назад", days, count_word(days, &DAY_WORDS))
}

pub fn week_break(days: u64) -> String {
    format!("Больше недели перерыв ({} дней)", days)
}

pub fn long_break(weeks: u64) -> String {
    format!(
        "Давно не делали: {} {} назад",
        weeks,
        count_word(weeks, &WEEK_WORDS)
    )
}

pub fn weight_progress(diff: f64, prior_weight: f64) -> String {
    format!(
        "+{:.1} кг к прошлому разу ({})",
        diff,
        format_weight(Some(prior_weight))
    )
}

pub fn weight_regress(diff: f64, prior_weight: f64) -> String {
    // diff is negative; {:.1} renders the sign
    format!(
        "{:.1} кг к прошлому разу ({})",
        diff,
        format_weight(Some(prior_weight))
    )
}

pub fn reps_progress(extra_reps: u32) -> String {
    format!("+{} повторений при том же весе", extra_reps)
}

pub fn weekly_progress(diff: f64) -> String {
    format!("+{:.1} кг за неделю", diff)
}

// Entry/session rendering

pub const NO_ENTRIES: &str = "Нет записей";
pub const TODAY: &str = "Сегодня";
pub const YESTERDAY: &str = "Вчера";

/// Russian month names in the genitive case, as used after a day number
pub const MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];
