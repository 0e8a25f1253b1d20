//! The insight rule pipeline
//!
//! Rules run in a fixed order; each appends zero or more insights, and the
//! result is stable-sorted by priority so equal priorities keep emission
//! order. All comparisons work on the snapshot the caller fetched; the
//! engine itself never touches storage or the clock.

use chrono::{Duration, NaiveDate};

use super::types::{emoji, Insight};
use super::HistoryProvider;
use crate::error::Result;
use crate::models::Entry;
use crate::text::messages;

/// How many history entries the caller fetches for one invocation
pub const HISTORY_WINDOW: u32 = 50;

/// Session-to-session weight changes below this are noise
const WEIGHT_DELTA_MIN: f64 = 0.5;

/// Week-over-week gain worth celebrating
const WEEKLY_DELTA_MIN: f64 = 2.5;

/// Generate insights for a newly logged entry
///
/// * `history`: entries for this user+exercise, most recent first; the
///   current entry is filtered out by id in case the caller's snapshot
///   already contains it.
/// * `last_prior`: most recent entry strictly before `today`, if any.
/// * `all_time_max_weight`: max weight ever logged for this exercise.
/// * `today`: passed in rather than read from the clock, so identical
///   inputs always produce identical output.
///
/// Missing optional data (weight, reps, prior entry) skips the affected
/// rule; the engine never fails.
pub fn generate_insights(
    entry: &Entry,
    history: &[Entry],
    last_prior: Option<&Entry>,
    all_time_max_weight: Option<f64>,
    today: NaiveDate,
) -> Vec<Insight> {
    let history: Vec<&Entry> = history.iter().filter(|e| e.id != entry.id).collect();

    let mut insights = Vec::new();

    // First ever set of this exercise: nothing to compare against
    if history.is_empty() {
        insights.push(Insight::new(emoji::NEW, messages::FIRST_TIME, 1));
        return insights;
    }

    weight_record(entry, &history, all_time_max_weight, &mut insights);
    reps_record(entry, &history, &mut insights);
    if let Some(prior) = last_prior {
        last_session(entry, prior, today, &mut insights);
    }
    weekly_trend(entry, &history, today, &mut insights);

    // Stable: equal priorities keep rule emission order
    insights.sort_by_key(|i| i.priority);
    insights
}

/// Fetch the history snapshot and run the engine over it
pub fn insights_for_entry(
    provider: &impl HistoryProvider,
    entry: &Entry,
    today: NaiveDate,
) -> Result<Vec<Insight>> {
    let history = provider.exercise_history(entry.user_id, &entry.exercise, HISTORY_WINDOW)?;
    let last_prior = provider.last_entry_before(entry.user_id, &entry.exercise, today)?;
    let max_weight = provider.max_weight(entry.user_id, &entry.exercise)?;

    let insights = generate_insights(entry, &history, last_prior.as_ref(), max_weight, today);
    tracing::debug!(
        entry_id = entry.id,
        exercise = %entry.exercise,
        count = insights.len(),
        "Insight generation complete"
    );
    Ok(insights)
}

/// New all-time weight record
fn weight_record(
    entry: &Entry,
    history: &[&Entry],
    all_time_max_weight: Option<f64>,
    out: &mut Vec<Insight>,
) {
    let (Some(weight), Some(_)) = (entry.weight, all_time_max_weight) else {
        return;
    };

    let previous_max = history.iter().filter_map(|e| e.weight).reduce(f64::max);
    match previous_max {
        Some(prev) if weight > prev => {
            out.push(Insight::new(emoji::RECORD, messages::weight_record(Some(prev)), 1));
        }
        // History exists but never with a weight: still a record
        None => out.push(Insight::new(emoji::RECORD, messages::weight_record(None), 1)),
        _ => {}
    }
}

/// New reps record at exactly this weight
fn reps_record(entry: &Entry, history: &[&Entry], out: &mut Vec<Insight>) {
    let (Some(weight), Some(reps)) = (entry.weight, entry.reps) else {
        return;
    };

    // Exact match on the stored weight value
    let max_reps_at_weight = history
        .iter()
        .filter(|e| e.weight == Some(weight))
        .filter_map(|e| e.reps)
        .max();

    if let Some(prev) = max_reps_at_weight {
        if reps > prev {
            out.push(Insight::new(emoji::STRONG, messages::reps_record(weight, prev), 2));
        }
    }
}

/// Time gap and result comparison against the last prior session
fn last_session(entry: &Entry, prior: &Entry, today: NaiveDate, out: &mut Vec<Insight>) {
    let days_ago = (today - prior.session_date()).num_days();

    match days_ago {
        d if d <= 0 => {} // same day; last_prior excludes today by contract
        1 => out.push(Insight::new(emoji::CALENDAR, messages::DONE_YESTERDAY, 5)),
        2..=7 => out.push(Insight::new(
            emoji::CALENDAR,
            messages::days_since_last(days_ago as u64),
            5,
        )),
        8..=14 => out.push(Insight::new(
            emoji::WARNING,
            messages::week_break(days_ago as u64),
            3,
        )),
        _ => out.push(Insight::new(
            emoji::WARNING,
            messages::long_break((days_ago / 7) as u64),
            3,
        )),
    }

    let (Some(current), Some(previous)) = (entry.weight, prior.weight) else {
        return;
    };

    let diff = current - previous;
    if diff.abs() >= WEIGHT_DELTA_MIN {
        if diff > 0.0 {
            out.push(Insight::new(emoji::UP, messages::weight_progress(diff, previous), 4));
        } else {
            out.push(Insight::new(emoji::DOWN, messages::weight_regress(diff, previous), 4));
        }
    } else if let (Some(cur_reps), Some(prev_reps)) = (entry.reps, prior.reps) {
        // Same weight: compare reps instead
        if cur_reps > prev_reps {
            out.push(Insight::new(
                emoji::UP,
                messages::reps_progress(cur_reps - prev_reps),
                4,
            ));
        } else if cur_reps == prev_reps {
            out.push(Insight::new(emoji::REPEAT, messages::SAME_RESULT, 6));
        }
    }
}

/// Week-over-week weight trend
///
/// Only the improvement direction is reported; a negative weekly diff is
/// deliberately not surfaced.
fn weekly_trend(entry: &Entry, history: &[&Entry], today: NaiveDate, out: &mut Vec<Insight>) {
    let Some(current) = entry.weight else {
        return;
    };

    let window_start = today - Duration::days(8);
    let window_end = today - Duration::days(6);

    let week_ago_max = history
        .iter()
        .filter(|e| {
            let date = e.session_date();
            date >= window_start && date <= window_end
        })
        .filter_map(|e| e.weight)
        .reduce(f64::max);

    if let Some(week_max) = week_ago_max {
        let diff = current - week_max;
        if diff >= WEEKLY_DELTA_MIN {
            out.push(Insight::new(emoji::CHART, messages::weekly_progress(diff), 3));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Utc};

    const TODAY: &str = "2026-03-14";

    fn today() -> NaiveDate {
        TODAY.parse().unwrap()
    }

    /// Entry logged `days_ago` days before TODAY
    fn entry_at(id: i64, weight: Option<f64>, reps: Option<u32>, days_ago: i64) -> Entry {
        let date = today() - Duration::days(days_ago);
        Entry {
            id,
            user_id: 1,
            exercise: "присед".to_string(),
            exercise_raw: "присед".to_string(),
            weight,
            reps,
            comment: None,
            created_at: Utc
                .with_ymd_and_hms(date.year(), date.month(), date.day(), 18, 0, 0)
                .unwrap(),
        }
    }

    fn current(weight: Option<f64>, reps: Option<u32>) -> Entry {
        entry_at(100, weight, reps, 0)
    }

    #[test]
    fn test_first_time_returns_single_insight() {
        let entry = current(Some(60.0), Some(6));
        let insights = generate_insights(&entry, &[], None, None, today());

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].priority, 1);
        assert_eq!(insights[0].emoji, emoji::NEW);
        assert_eq!(insights[0].text, messages::FIRST_TIME);
    }

    #[test]
    fn test_current_entry_is_excluded_from_history_by_id() {
        let entry = current(Some(60.0), Some(6));
        // The snapshot already contains the freshly stored entry itself
        let history = vec![entry.clone()];
        let insights = generate_insights(&entry, &history, None, Some(60.0), today());

        // With itself filtered out the history is empty: first-time fires,
        // and the entry never compares against its own weight
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].text, messages::FIRST_TIME);
    }

    #[test]
    fn test_weight_record() {
        let entry = current(Some(65.0), Some(5));
        let history = vec![entry_at(1, Some(60.0), Some(5), 3), entry_at(2, Some(55.0), Some(8), 5)];
        let insights = generate_insights(&entry, &history, None, Some(60.0), today());

        let records: Vec<_> = insights.iter().filter(|i| i.emoji == emoji::RECORD).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].priority, 1);
        assert_eq!(records[0].text, "Личный рекорд веса! Было: 60 кг");
    }

    #[test]
    fn test_no_weight_record_when_equal_or_below() {
        let history = vec![entry_at(1, Some(60.0), Some(5), 3)];

        let equal = current(Some(60.0), Some(5));
        let insights = generate_insights(&equal, &history, None, Some(60.0), today());
        assert!(insights.iter().all(|i| i.emoji != emoji::RECORD));

        let below = current(Some(55.0), Some(5));
        let insights = generate_insights(&below, &history, None, Some(60.0), today());
        assert!(insights.iter().all(|i| i.emoji != emoji::RECORD));
    }

    #[test]
    fn test_no_weight_record_without_weight() {
        let history = vec![entry_at(1, Some(60.0), Some(5), 3)];
        let entry = current(None, Some(12));
        let insights = generate_insights(&entry, &history, None, Some(60.0), today());
        assert!(insights.iter().all(|i| i.emoji != emoji::RECORD));
    }

    #[test]
    fn test_weight_record_placeholder_for_weightless_history() {
        // Bodyweight history, first weighted set
        let history = vec![entry_at(1, None, Some(10), 3)];
        let entry = current(Some(20.0), Some(8));
        let insights = generate_insights(&entry, &history, None, Some(20.0), today());

        let record = insights.iter().find(|i| i.emoji == emoji::RECORD).unwrap();
        assert_eq!(record.text, "Личный рекорд веса! Было: —");
    }

    #[test]
    fn test_reps_record_at_same_weight() {
        let entry = current(Some(60.0), Some(8));
        let history = vec![
            entry_at(1, Some(60.0), Some(6), 3),
            entry_at(2, Some(60.0), Some(7), 5),
            entry_at(3, Some(62.5), Some(10), 5), // different weight, ignored
        ];
        let insights = generate_insights(&entry, &history, None, Some(62.5), today());

        let reps: Vec<_> = insights.iter().filter(|i| i.emoji == emoji::STRONG).collect();
        assert_eq!(reps.len(), 1);
        assert_eq!(reps[0].priority, 2);
        assert_eq!(reps[0].text, "Рекорд повторений на 60 кг! Было: 7");
    }

    #[test]
    fn test_no_reps_record_when_weight_unseen_or_reps_equal() {
        let history = vec![entry_at(1, Some(60.0), Some(8), 3)];

        // No history entry shares this exact weight
        let unseen = current(Some(57.5), Some(12));
        let insights = generate_insights(&unseen, &history, None, Some(60.0), today());
        assert!(insights.iter().all(|i| i.emoji != emoji::STRONG));

        // Equal reps is not a record
        let equal = current(Some(60.0), Some(8));
        let insights = generate_insights(&equal, &history, None, Some(60.0), today());
        assert!(insights.iter().all(|i| i.emoji != emoji::STRONG));
    }

    #[test]
    fn test_day_gap_yesterday() {
        let prior = entry_at(1, Some(60.0), Some(6), 1);
        let entry = current(None, None);
        let insights =
            generate_insights(&entry, &[prior.clone()], Some(&prior), Some(60.0), today());

        let gap = insights.iter().find(|i| i.emoji == emoji::CALENDAR).unwrap();
        assert_eq!(gap.priority, 5);
        assert_eq!(gap.text, messages::DONE_YESTERDAY);
    }

    #[test]
    fn test_day_gap_within_week() {
        let prior = entry_at(1, None, None, 3);
        let entry = current(None, None);
        let insights = generate_insights(&entry, &[prior.clone()], Some(&prior), None, today());

        let gap = insights.iter().find(|i| i.emoji == emoji::CALENDAR).unwrap();
        assert_eq!(gap.text, "Последний раз: 3 дня назад");
    }

    #[test]
    fn test_day_gap_over_a_week_warns() {
        let prior = entry_at(1, None, None, 10);
        let entry = current(None, None);
        let insights = generate_insights(&entry, &[prior.clone()], Some(&prior), None, today());

        let warning = insights.iter().find(|i| i.emoji == emoji::WARNING).unwrap();
        assert_eq!(warning.priority, 3);
        assert_eq!(warning.text, "Больше недели перерыв (10 дней)");
    }

    #[test]
    fn test_day_gap_in_weeks_with_inflection() {
        let entry = current(None, None);

        let prior = entry_at(1, None, None, 21); // 3 weeks
        let insights = generate_insights(&entry, &[prior.clone()], Some(&prior), None, today());
        let warning = insights.iter().find(|i| i.emoji == emoji::WARNING).unwrap();
        assert_eq!(warning.text, "Давно не делали: 3 недели назад");

        let prior = entry_at(1, None, None, 15); // 15 / 7 = 2 weeks
        let insights = generate_insights(&entry, &[prior.clone()], Some(&prior), None, today());
        let warning = insights.iter().find(|i| i.emoji == emoji::WARNING).unwrap();
        assert_eq!(warning.text, "Давно не делали: 2 недели назад");
    }

    #[test]
    fn test_weight_progress_and_regress() {
        let prior = entry_at(1, Some(60.0), Some(6), 2);

        let up = current(Some(65.0), Some(5));
        let insights = generate_insights(&up, &[prior.clone()], Some(&prior), Some(60.0), today());
        let progress = insights.iter().find(|i| i.emoji == emoji::UP).unwrap();
        assert_eq!(progress.priority, 4);
        assert_eq!(progress.text, "+5.0 кг к прошлому разу (60 кг)");

        let down = current(Some(57.5), Some(5));
        let insights =
            generate_insights(&down, &[prior.clone()], Some(&prior), Some(60.0), today());
        let regress = insights.iter().find(|i| i.emoji == emoji::DOWN).unwrap();
        assert_eq!(regress.priority, 4);
        assert_eq!(regress.text, "-2.5 кг к прошлому разу (60 кг)");
    }

    #[test]
    fn test_tiny_weight_delta_falls_back_to_reps() {
        let prior = entry_at(1, Some(60.0), Some(6), 2);
        let entry = current(Some(60.0), Some(8));
        let insights =
            generate_insights(&entry, &[prior.clone()], Some(&prior), Some(60.0), today());

        // +2 reps at the same weight, not a ±kg message
        let progress = insights.iter().find(|i| i.emoji == emoji::UP).unwrap();
        assert_eq!(progress.text, "+2 повторений при том же весе");
        assert!(insights.iter().all(|i| i.emoji != emoji::DOWN));
    }

    #[test]
    fn test_same_result_as_last_time() {
        let prior = entry_at(1, Some(60.0), Some(8), 1);
        let entry = current(Some(60.0), Some(8));
        let insights =
            generate_insights(&entry, &[prior.clone()], Some(&prior), Some(60.0), today());

        let same = insights.iter().find(|i| i.emoji == emoji::REPEAT).unwrap();
        assert_eq!(same.priority, 6);
        assert_eq!(same.text, messages::SAME_RESULT);
        // Equal reps is neither a reps record nor progress
        assert!(insights.iter().all(|i| i.emoji != emoji::STRONG));
        assert!(insights.iter().all(|i| i.emoji != emoji::UP));
    }

    #[test]
    fn test_weekly_trend_fires_on_big_gain() {
        let entry = current(Some(60.5), Some(5));
        let history = vec![entry_at(1, Some(57.5), Some(5), 7)];
        let insights = generate_insights(&entry, &history, None, Some(57.5), today());

        let trend = insights.iter().find(|i| i.emoji == emoji::CHART).unwrap();
        assert_eq!(trend.priority, 3);
        assert_eq!(trend.text, "+3.0 кг за неделю");
    }

    #[test]
    fn test_weekly_trend_ignores_regression_and_small_gains() {
        let history = vec![entry_at(1, Some(60.0), Some(5), 7)];

        // Lower than a week ago: by design, nothing
        let lower = current(Some(55.0), Some(5));
        let insights = generate_insights(&lower, &history, None, Some(60.0), today());
        assert!(insights.iter().all(|i| i.emoji != emoji::CHART));

        // +2.0 is under the 2.5 threshold
        let small = current(Some(62.0), Some(5));
        let insights = generate_insights(&small, &history, None, Some(60.0), today());
        assert!(insights.iter().all(|i| i.emoji != emoji::CHART));
    }

    #[test]
    fn test_weekly_trend_window_is_six_to_eight_days() {
        let entry = current(Some(65.0), Some(5));

        for days_ago in [6, 7, 8] {
            let history = vec![entry_at(1, Some(57.5), Some(5), days_ago)];
            let insights = generate_insights(&entry, &history, None, Some(57.5), today());
            assert!(
                insights.iter().any(|i| i.emoji == emoji::CHART),
                "expected trend insight for {} days ago",
                days_ago
            );
        }

        for days_ago in [5, 9] {
            let history = vec![entry_at(1, Some(57.5), Some(5), days_ago)];
            let insights = generate_insights(&entry, &history, None, Some(57.5), today());
            assert!(
                insights.iter().all(|i| i.emoji != emoji::CHART),
                "expected no trend insight for {} days ago",
                days_ago
            );
        }
    }

    #[test]
    fn test_output_is_sorted_and_stable() {
        // Record (1), reps gap insights, weekly trend (3), day gap (5)
        let prior = entry_at(1, Some(60.0), Some(6), 2);
        let week_ago = entry_at(2, Some(57.5), Some(6), 7);
        let history = vec![prior.clone(), week_ago];
        let entry = current(Some(65.0), Some(6));

        let insights = generate_insights(&entry, &history, Some(&prior), Some(60.0), today());

        let priorities: Vec<u8> = insights.iter().map(|i| i.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort_unstable();
        assert_eq!(priorities, sorted, "not sorted by priority: {:?}", insights);
        assert!(insights.iter().any(|i| i.emoji == emoji::CHART));
    }

    #[test]
    fn test_equal_priorities_keep_rule_order() {
        // An 8-day gap produces a priority-3 warning (rule 4) and the same
        // entry sits in the weekly window, producing a priority-3 trend
        // (rule 5). The stable sort must keep rule 4 ahead of rule 5.
        let prior = entry_at(1, Some(57.5), Some(6), 8);
        let history = vec![prior.clone()];
        let entry = current(Some(61.0), Some(6));

        let insights = generate_insights(&entry, &history, Some(&prior), Some(57.5), today());

        let p3: Vec<_> = insights.iter().filter(|i| i.priority == 3).collect();
        assert_eq!(p3.len(), 2);
        assert_eq!(p3[0].emoji, emoji::WARNING);
        assert_eq!(p3[1].emoji, emoji::CHART);
    }

    #[test]
    fn test_determinism() {
        let prior = entry_at(1, Some(60.0), Some(6), 2);
        let history = vec![prior.clone(), entry_at(2, Some(57.5), Some(6), 7)];
        let entry = current(Some(65.0), Some(6));

        let first = generate_insights(&entry, &history, Some(&prior), Some(60.0), today());
        let second = generate_insights(&entry, &history, Some(&prior), Some(60.0), today());
        assert_eq!(first, second);
    }

    #[test]
    fn test_scenario_record_with_gap_and_progress() {
        // weight=65 vs prior max 60, prior entry 2 days ago at 60:
        // priority-1 record, priority-4 "+5.0", priority-5 day gap, in order
        let prior = entry_at(1, Some(60.0), Some(6), 2);
        let entry = current(Some(65.0), Some(6));
        let insights =
            generate_insights(&entry, &[prior.clone()], Some(&prior), Some(60.0), today());

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].priority, 1);
        assert_eq!(insights[0].emoji, emoji::RECORD);
        assert_eq!(insights[1].priority, 4);
        assert_eq!(insights[1].text, "+5.0 кг к прошлому разу (60 кг)");
        assert_eq!(insights[2].priority, 5);
        assert_eq!(insights[2].text, "Последний раз: 2 дня назад");
    }

    #[test]
    fn test_scenario_identical_to_yesterday() {
        // weight=60 reps=8 vs yesterday's 60×8: day gap (5) + same result (6)
        let prior = entry_at(1, Some(60.0), Some(8), 1);
        let entry = current(Some(60.0), Some(8));
        let insights =
            generate_insights(&entry, &[prior.clone()], Some(&prior), Some(60.0), today());

        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].priority, 5);
        assert_eq!(insights[0].text, messages::DONE_YESTERDAY);
        assert_eq!(insights[1].priority, 6);
        assert_eq!(insights[1].text, messages::SAME_RESULT);
    }

    #[test]
    fn test_engine_never_fails_on_sparse_data() {
        // No weight, no reps, weightless history, no prior entry
        let entry = current(None, None);
        let history = vec![entry_at(1, None, None, 30)];
        let insights = generate_insights(&entry, &history, None, None, today());
        assert!(insights.is_empty());
    }
}
