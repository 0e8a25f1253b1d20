//! Inline keyboards and their callback-data grammar

use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Which entry field an edit button targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Exercise,
    Weight,
    Reps,
    Comment,
}

impl EditField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
            Self::Weight => "weight",
            Self::Reps => "reps",
            Self::Comment => "comment",
        }
    }
}

impl std::str::FromStr for EditField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "exercise" => Ok(Self::Exercise),
            "weight" => Ok(Self::Weight),
            "reps" => Ok(Self::Reps),
            "comment" => Ok(Self::Comment),
            _ => Err(format!("Unknown edit field: {}", s)),
        }
    }
}

/// Parsed callback data from an inline button press
///
/// The wire format is colon-separated: `edit:{id}:{field}`, `delete:{id}`,
/// `confirm_delete:{id}`, `cancel_delete:{id}`, `cancel`,
/// `exercise_stats:{name}`, `noop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Edit { entry_id: i64, field: EditField },
    Delete { entry_id: i64 },
    ConfirmDelete { entry_id: i64 },
    CancelDelete { entry_id: i64 },
    Cancel,
    ExerciseStats { exercise: String },
    Noop,
}

impl Callback {
    /// Serialize for the `callback_data` field
    pub fn as_data(&self) -> String {
        match self {
            Self::Edit { entry_id, field } => format!("edit:{}:{}", entry_id, field.as_str()),
            Self::Delete { entry_id } => format!("delete:{}", entry_id),
            Self::ConfirmDelete { entry_id } => format!("confirm_delete:{}", entry_id),
            Self::CancelDelete { entry_id } => format!("cancel_delete:{}", entry_id),
            Self::Cancel => "cancel".to_string(),
            Self::ExerciseStats { exercise } => format!("exercise_stats:{}", exercise),
            Self::Noop => "noop".to_string(),
        }
    }

    /// Parse incoming callback data; None for unknown/malformed data
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "cancel" => return Some(Self::Cancel),
            "noop" => return Some(Self::Noop),
            _ => {}
        }

        let (kind, rest) = data.split_once(':')?;
        match kind {
            "edit" => {
                let (id, field) = rest.split_once(':')?;
                Some(Self::Edit {
                    entry_id: id.parse().ok()?,
                    field: field.parse().ok()?,
                })
            }
            "delete" => Some(Self::Delete {
                entry_id: rest.parse().ok()?,
            }),
            "confirm_delete" => Some(Self::ConfirmDelete {
                entry_id: rest.parse().ok()?,
            }),
            "cancel_delete" => Some(Self::CancelDelete {
                entry_id: rest.parse().ok()?,
            }),
            "exercise_stats" => Some(Self::ExerciseStats {
                exercise: rest.to_string(),
            }),
            _ => None,
        }
    }
}

/// Keyboard under a freshly logged (or re-rendered) entry
pub fn entry_edit_keyboard(entry_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![
            vec![
                InlineKeyboardButton::new(
                    "Упражнение",
                    Callback::Edit {
                        entry_id,
                        field: EditField::Exercise,
                    }
                    .as_data(),
                ),
                InlineKeyboardButton::new(
                    "Вес",
                    Callback::Edit {
                        entry_id,
                        field: EditField::Weight,
                    }
                    .as_data(),
                ),
            ],
            vec![
                InlineKeyboardButton::new(
                    "Повторы",
                    Callback::Edit {
                        entry_id,
                        field: EditField::Reps,
                    }
                    .as_data(),
                ),
                InlineKeyboardButton::new(
                    "Коммент",
                    Callback::Edit {
                        entry_id,
                        field: EditField::Comment,
                    }
                    .as_data(),
                ),
            ],
            vec![InlineKeyboardButton::new(
                "🗑 Удалить",
                Callback::Delete { entry_id }.as_data(),
            )],
        ],
    }
}

/// Confirmation keyboard for deletion
pub fn confirm_delete_keyboard(entry_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![
            InlineKeyboardButton::new("✅ Да, удалить", Callback::ConfirmDelete { entry_id }.as_data()),
            InlineKeyboardButton::new("❌ Отмена", Callback::CancelDelete { entry_id }.as_data()),
        ]],
    }
}

/// Simple cancel keyboard
pub fn cancel_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![vec![InlineKeyboardButton::new(
            "❌ Отмена",
            Callback::Cancel.as_data(),
        )]],
    }
}

/// Keyboard with exercises for detailed stats
pub fn exercise_list_keyboard(exercises: &[String]) -> InlineKeyboardMarkup {
    let rows = exercises
        .iter()
        .take(10)
        .map(|exercise| {
            let display = truncate_chars(exercise, 25, true);
            // Callback data is size-limited; long names get cut
            let data = Callback::ExerciseStats {
                exercise: truncate_chars(exercise, 50, false),
            }
            .as_data();
            vec![InlineKeyboardButton::new(display, data)]
        })
        .collect();

    InlineKeyboardMarkup { inline_keyboard: rows }
}

/// Truncate by characters, not bytes (exercise names are Cyrillic)
fn truncate_chars(s: &str, max: usize, ellipsis: bool) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max).collect();
    if ellipsis {
        format!("{}...", cut)
    } else {
        cut
    }
}
