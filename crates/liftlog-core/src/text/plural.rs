//! Russian count-word inflection
//!
//! Russian count words take one of three grammatical forms depending on the
//! last digit of the count, with an exception for the teens: 1 день,
//! 2 дня, 5 дней, 11 дней, 21 день.

/// The three Russian plural forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plural {
    /// Last digit 1, except 11
    One,
    /// Last digit 2-4, except 12-14
    Few,
    /// Everything else, including 0 and the teens
    Many,
}

/// Select the plural form for a count
pub fn plural_form(n: u64) -> Plural {
    let teens = n % 100;
    match n % 10 {
        1 if teens != 11 => Plural::One,
        2..=4 if !(12..=14).contains(&teens) => Plural::Few,
        _ => Plural::Many,
    }
}

/// A word family: one form per [`Plural`] variant
#[derive(Debug, Clone, Copy)]
pub struct WordForms {
    pub one: &'static str,
    pub few: &'static str,
    pub many: &'static str,
}

pub const DAY_WORDS: WordForms = WordForms {
    one: "день",
    few: "дня",
    many: "дней",
};

pub const WEEK_WORDS: WordForms = WordForms {
    one: "неделю",
    few: "недели",
    many: "недель",
};

/// Pick the correctly inflected word for a count
pub fn count_word(n: u64, forms: &WordForms) -> &'static str {
    match plural_form(n) {
        Plural::One => forms.one,
        Plural::Few => forms.few,
        Plural::Many => forms.many,
    }
}
