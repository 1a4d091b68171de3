//! The recurrence occurrence engine.
//!
//! This is the single source of truth for recurrence semantics: both the
//! display filter and the period aggregator derive a rule's concrete fire
//! dates from here. All functions are total over structurally valid rules
//! (end date after start date, enforced at the data-entry boundary) and
//! never allocate beyond the returned vector.

use chrono::{Datelike, Duration, NaiveDate};
use common::days_in_month;
use model::entities::recurring_rule::{Cadence, Model as RecurringRule};
use tracing::trace;

/// Generates the sorted calendar dates on which `rule` fires within the
/// inclusive `[period_start, period_end]` range.
///
/// Every returned date lies inside the period, inside the rule's own
/// `[start_date, end_date]` window, conforms to the cadence anchored at
/// `start_date`, and is not after `today` — occurrences that have not
/// happened yet are never projected into a summary, even when the queried
/// period extends past `today`.
pub fn generate_occurrences(
    rule: &RecurringRule,
    period_start: NaiveDate,
    period_end: NaiveDate,
    today: NaiveDate,
) -> Vec<NaiveDate> {
    // A rule that starts after the period or ends before it cannot fire.
    if rule.start_date > period_end {
        return Vec::new();
    }
    if let Some(end) = rule.end_date {
        if end < period_start {
            return Vec::new();
        }
    }

    // Effective search window: the overlap of the period and the rule's
    // own lifetime.
    let window_start = rule.start_date.max(period_start);
    let window_end = match rule.end_date {
        Some(end) => end.min(period_end),
        None => period_end,
    };
    if window_start > window_end {
        return Vec::new();
    }

    let occurrences = match rule.cadence {
        Cadence::Weekly => weekly_occurrences(rule.start_date, window_start, window_end, today),
        Cadence::Monthly => monthly_occurrences(rule.start_date, window_start, window_end, today),
    };

    trace!(
        "Rule id={} fires {} time(s) in {}..{} (today={})",
        rule.id,
        occurrences.len(),
        period_start,
        period_end,
        today
    );
    occurrences
}

/// Weekly cadence: fires on the weekday of the anchor date, every 7 days.
fn weekly_occurrences(
    anchor: NaiveDate,
    window_start: NaiveDate,
    window_end: NaiveDate,
    today: NaiveDate,
) -> Vec<NaiveDate> {
    let fire_weekday = anchor.weekday().num_days_from_monday();

    // Days from the window start to the first date with the fire weekday.
    let lead = (fire_weekday + 7 - window_start.weekday().num_days_from_monday()) % 7;
    let mut current = window_start + Duration::days(i64::from(lead));

    let mut occurrences = Vec::new();
    while current <= window_end {
        if current <= today {
            occurrences.push(current);
        }
        current += Duration::days(7);
    }
    occurrences
}

/// Monthly cadence: fires on the day-of-month of the anchor date, clamped
/// to the last day of shorter months (a rule anchored on the 31st fires
/// on Feb 28/29, never on Mar 2/3).
fn monthly_occurrences(
    anchor: NaiveDate,
    window_start: NaiveDate,
    window_end: NaiveDate,
    today: NaiveDate,
) -> Vec<NaiveDate> {
    let fire_day = anchor.day();

    let mut occurrences = Vec::new();
    let mut cursor = window_start.with_day(1).unwrap();
    while cursor <= window_end {
        let year = cursor.year();
        let month = cursor.month();
        let day = fire_day.min(days_in_month(year, month));
        let occurrence = NaiveDate::from_ymd_opt(year, month, day).unwrap();

        if occurrence >= window_start && occurrence <= window_end && occurrence <= today {
            occurrences.push(occurrence);
        }

        cursor = first_of_next_month(cursor);
    }
    occurrences
}

fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let year = date.year() + (date.month() / 12) as i32;
    let month = (date.month() % 12) + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Utc, Weekday};
    use model::entities::transaction::TransactionKind;
    use rust_decimal::Decimal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rule(cadence: Cadence, start: NaiveDate, end: Option<NaiveDate>) -> RecurringRule {
        let now = Utc::now();
        RecurringRule {
            id: 1,
            owner_id: 1,
            kind: TransactionKind::Expense,
            amount: Decimal::new(1000_00, 2),
            memo: None,
            cadence,
            start_date: start,
            end_date: end,
            last_generated_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    // A "today" far past every queried range, for tests where the accrual
    // cutoff is not the behavior under test.
    const FAR_FUTURE: (i32, u32, u32) = (2099, 12, 31);

    fn far_future() -> NaiveDate {
        d(FAR_FUTURE.0, FAR_FUTURE.1, FAR_FUTURE.2)
    }

    #[test]
    fn monthly_day_31_clamps_to_end_of_february() {
        let r = rule(Cadence::Monthly, d(2026, 1, 31), None);
        let occurrences = generate_occurrences(&r, d(2026, 2, 1), d(2026, 2, 28), far_future());
        assert_eq!(occurrences, vec![d(2026, 2, 28)]);
    }

    #[test]
    fn monthly_day_31_clamps_to_leap_day() {
        let r = rule(Cadence::Monthly, d(2027, 12, 31), None);
        let occurrences = generate_occurrences(&r, d(2028, 2, 1), d(2028, 2, 29), far_future());
        assert_eq!(occurrences, vec![d(2028, 2, 29)]);
    }

    #[test]
    fn monthly_day_31_clamps_in_thirty_day_months() {
        let r = rule(Cadence::Monthly, d(2026, 1, 31), None);
        let occurrences = generate_occurrences(&r, d(2026, 4, 1), d(2026, 4, 30), far_future());
        assert_eq!(occurrences, vec![d(2026, 4, 30)]);
    }

    #[test]
    fn weekly_rule_fires_on_anchor_weekday() {
        // 2026-01-07 is a Wednesday.
        let r = rule(Cadence::Weekly, d(2026, 1, 7), None);
        let occurrences = generate_occurrences(&r, d(2026, 2, 2), d(2026, 2, 15), far_future());
        assert_eq!(occurrences, vec![d(2026, 2, 4), d(2026, 2, 11)]);
        for date in &occurrences {
            assert_eq!(date.weekday(), Weekday::Wed);
        }
    }

    #[test]
    fn weekly_first_occurrence_found_from_window_start() {
        // Monday anchor; period starts on a Wednesday, so the first fire
        // date is the following Monday.
        let r = rule(Cadence::Weekly, d(2026, 1, 5), None);
        let occurrences = generate_occurrences(&r, d(2026, 3, 4), d(2026, 3, 17), far_future());
        assert_eq!(occurrences, vec![d(2026, 3, 9), d(2026, 3, 16)]);
    }

    #[test]
    fn future_cutoff_applies_per_occurrence() {
        // Monthly on the 15th, queried over three months; today sits
        // between the second and third occurrence.
        let r = rule(Cadence::Monthly, d(2025, 12, 15), None);
        let occurrences = generate_occurrences(&r, d(2026, 1, 1), d(2026, 3, 31), d(2026, 2, 20));
        assert_eq!(occurrences, vec![d(2026, 1, 15), d(2026, 2, 15)]);
    }

    #[test]
    fn future_cutoff_applies_within_a_week() {
        // Weekly on Wednesdays over two weeks, but today is the first
        // Wednesday: only one occurrence has happened.
        let r = rule(Cadence::Weekly, d(2026, 1, 7), None);
        let occurrences = generate_occurrences(&r, d(2026, 2, 2), d(2026, 2, 15), d(2026, 2, 4));
        assert_eq!(occurrences, vec![d(2026, 2, 4)]);
    }

    #[test]
    fn rule_ending_the_day_before_the_period_never_fires() {
        let r = rule(Cadence::Monthly, d(2025, 1, 1), Some(d(2026, 1, 31)));
        let occurrences = generate_occurrences(&r, d(2026, 2, 1), d(2026, 2, 28), far_future());
        assert!(occurrences.is_empty());
    }

    #[test]
    fn rule_starting_the_day_after_the_period_never_fires() {
        let r = rule(Cadence::Monthly, d(2026, 3, 1), None);
        let occurrences = generate_occurrences(&r, d(2026, 2, 1), d(2026, 2, 28), far_future());
        assert!(occurrences.is_empty());
    }

    #[test]
    fn rule_end_date_truncates_the_window() {
        // Weekly Mondays, rule ends mid-period.
        let r = rule(Cadence::Weekly, d(2026, 1, 5), Some(d(2026, 2, 10)));
        let occurrences = generate_occurrences(&r, d(2026, 2, 1), d(2026, 2, 28), far_future());
        assert_eq!(occurrences, vec![d(2026, 2, 2), d(2026, 2, 9)]);
    }

    #[test]
    fn monthly_occurrence_before_window_start_is_skipped() {
        // Fires on the 5th, but the queried window starts on the 10th.
        let r = rule(Cadence::Monthly, d(2026, 1, 5), None);
        let occurrences = generate_occurrences(&r, d(2026, 3, 10), d(2026, 3, 31), far_future());
        assert!(occurrences.is_empty());
    }

    #[test]
    fn occurrences_are_sorted_ascending() {
        let r = rule(Cadence::Weekly, d(2026, 1, 5), None);
        let occurrences = generate_occurrences(&r, d(2026, 1, 1), d(2026, 3, 31), far_future());
        assert!(occurrences.len() > 3);
        assert!(occurrences.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn engine_is_idempotent_for_identical_inputs() {
        let r = rule(Cadence::Monthly, d(2026, 1, 31), None);
        let first = generate_occurrences(&r, d(2026, 1, 1), d(2026, 6, 30), d(2026, 4, 15));
        let second = generate_occurrences(&r, d(2026, 1, 1), d(2026, 6, 30), d(2026, 4, 15));
        assert_eq!(first, second);
    }

    #[test]
    fn daily_sized_period_matches_only_the_fire_date() {
        let r = rule(Cadence::Monthly, d(2026, 1, 15), None);
        let hit = generate_occurrences(&r, d(2026, 3, 15), d(2026, 3, 15), far_future());
        assert_eq!(hit, vec![d(2026, 3, 15)]);

        let miss = generate_occurrences(&r, d(2026, 3, 14), d(2026, 3, 14), far_future());
        assert!(miss.is_empty());
    }
}
