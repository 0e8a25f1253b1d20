//! Presentation layer: locale-correct display text
//!
//! Everything user-visible is rendered here: weight/date formatting, Russian
//! count-word inflection, and entry/session rendering. The wording itself
//! lives in `messages` so it can be reviewed and localized in one place.

mod format;
pub mod messages;
mod plural;

pub use format::{
    format_date, format_entry, format_entry_compact, format_training_summary, format_weight,
};
pub use plural::{count_word, plural_form, Plural, WordForms, DAY_WORDS, WEEK_WORDS};
