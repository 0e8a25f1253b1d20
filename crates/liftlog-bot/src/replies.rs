//! Russian reply catalog for the bot layer
//!
//! Transport-level wording (greetings, prompts, error replies) lives here;
//! insight and session wording lives in `liftlog_core::text::messages`.

use liftlog_core::text::format_weight;
use liftlog_core::Entry;

use crate::keyboards::EditField;

pub const START: &str = "👋 Привет! Я бот для логирования тренировок.

🎤 Отправь мне голосовое сообщение с описанием упражнения, и я запишу его в дневник.

Примеры:
• «присед 60 кг на 6 раз»
• «жим лёжа 80 на 5, тяжело»
• «подтягивания широким хватом 8 раз»

📝 Команды:
/today — текущая тренировка
/history — история тренировок
/stats — статистика
/exercise <название> — история упражнения

💡 После записи можно исправить любое поле кнопками.";

pub const PROCESSING: &str = "🎤 Обрабатываю...";
pub const NO_SPEECH: &str = "❌ Не удалось распознать речь. Попробуй ещё раз.";

pub const TODAY_EMPTY: &str =
    "📭 Сегодня ещё нет записей.\n\nОтправь голосовое сообщение, чтобы начать тренировку!";
pub const HISTORY_EMPTY: &str =
    "📭 История пуста.\n\nОтправь голосовое сообщение, чтобы начать!";
pub const STATS_EMPTY: &str =
    "📭 Статистика пуста.\n\nОтправь голосовое сообщение, чтобы начать!";
pub const HISTORY_HEADER: &str = "📚 Последние тренировки:";
pub const NO_EXERCISES: &str = "📭 У тебя пока нет записанных упражнений.";

pub const NOTHING_TO_CANCEL: &str = "Нечего отменять.";
pub const CANCELLED: &str = "❌ Действие отменено.";
pub const CANCELLED_SHORT: &str = "Отменено";

pub const ENTRY_NOT_FOUND: &str = "Запись не найдена";
pub const ENTRY_DELETED: &str = "✅ Запись удалена.";
pub const ENTRY_DELETE_MISSING: &str = "❌ Запись не найдена.";

pub const WEIGHT_INPUT_ERROR: &str = "❌ Введи число (например: 60 или 72.5)";
pub const REPS_INPUT_ERROR: &str = "❌ Введи целое число (например: 8)";
pub const COMMENT_UPDATED: &str = "✅ Комментарий изменён";

pub fn processing_error(error: &str) -> String {
    format!("❌ Ошибка обработки: {}\n\nПопробуй ещё раз.", error)
}

pub fn delete_confirmation(entry_card: &str) -> String {
    format!("Удалить запись?\n\n{}", entry_card)
}

pub fn exercise_not_found(query: &str) -> String {
    format!("❌ Упражнение «{}» не найдено.", query)
}

pub fn exercise_hint(exercises: &[String]) -> String {
    let mut text = String::from("📋 Укажи упражнение:\n/exercise <название>\n\nТвои упражнения:\n");
    let listed: Vec<String> = exercises
        .iter()
        .take(15)
        .map(|e| format!("• {}", e))
        .collect();
    text.push_str(&listed.join("\n"));
    text
}

pub fn exercise_changed(new_name: &str) -> String {
    format!("✅ Упражнение изменено: {}", new_name)
}

pub fn weight_changed(old: Option<f64>, new: f64) -> String {
    format!(
        "✅ Вес изменён: {} → {}",
        format_weight(old),
        format_weight(Some(new))
    )
}

pub fn reps_changed(old: Option<u32>, new: u32) -> String {
    format!("✅ Повторения изменены: {} → {}", reps_display(old), new)
}

/// Prompt shown when an edit button is pressed
pub fn edit_prompt(entry: &Entry, field: EditField) -> String {
    match field {
        EditField::Exercise => format!(
            "Текущее упражнение: {}\n\nВведи новое название:",
            entry.exercise
        ),
        EditField::Weight => format!(
            "Текущий вес: {}\n\nВведи новый вес (число в кг):",
            format_weight(entry.weight)
        ),
        EditField::Reps => format!(
            "Текущие повторения: {}\n\nВведи количество повторений:",
            reps_display(entry.reps)
        ),
        EditField::Comment => format!(
            "Текущий комментарий: {}\n\nВведи новый комментарий (или «-» для удаления):",
            entry.comment.as_deref().unwrap_or("—")
        ),
    }
}

fn reps_display(reps: Option<u32>) -> String {
    reps.map(|r| r.to_string()).unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_changed_renders_both_values() {
        assert_eq!(
            weight_changed(Some(60.0), 62.5),
            "✅ Вес изменён: 60 кг → 62.5 кг"
        );
        assert_eq!(weight_changed(None, 60.0), "✅ Вес изменён: — → 60 кг");
    }

    #[test]
    fn test_exercise_hint_limits_to_fifteen() {
        let exercises: Vec<String> = (0..20).map(|i| format!("упр {}", i)).collect();
        let hint = exercise_hint(&exercises);
        assert_eq!(hint.matches("• ").count(), 15);
    }
}
