//! Display filtering of recurring rules by period.

use chrono::NaiveDate;
use common::PeriodSelection;
use model::entities::recurring_rule::Model as RecurringRule;
use tracing::{debug, trace};

use crate::occurrence::generate_occurrences;

/// Keeps exactly the rules that actually fire at least once in the
/// selected period, so the UI does not show a card for a rule that is
/// dormant this period. Inactive rules are never kept. Input order is
/// preserved.
pub fn active_in_period(
    rules: Vec<RecurringRule>,
    selection: &PeriodSelection,
    today: NaiveDate,
) -> Vec<RecurringRule> {
    let range = selection.range(today);
    debug!(
        "Filtering {} rule(s) against period {}..{}",
        rules.len(),
        range.start,
        range.end
    );

    rules
        .into_iter()
        .filter(|rule| {
            if !rule.is_active {
                trace!("Dropping inactive rule id={}", rule.id);
                return false;
            }
            !generate_occurrences(rule, range.start, range.end, today).is_empty()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use model::entities::recurring_rule::Cadence;
    use model::entities::transaction::TransactionKind;
    use rust_decimal::Decimal;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn rule(id: i32, cadence: Cadence, start: NaiveDate, is_active: bool) -> RecurringRule {
        let now = Utc::now();
        RecurringRule {
            id,
            owner_id: 1,
            kind: TransactionKind::Expense,
            amount: Decimal::new(500_00, 2),
            memo: None,
            cadence,
            start_date: start,
            end_date: None,
            last_generated_at: None,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn keeps_rules_that_fire_in_the_period() {
        let today = d(2026, 3, 31);
        let rules = vec![
            rule(1, Cadence::Monthly, d(2026, 1, 15), true),
            // Starts after the queried month, cannot fire yet.
            rule(2, Cadence::Monthly, d(2026, 4, 1), true),
        ];

        let kept = active_in_period(rules, &PeriodSelection::Monthly { offset: 0 }, today);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
    }

    #[test]
    fn drops_inactive_rules_even_when_they_would_fire() {
        let today = d(2026, 3, 31);
        let rules = vec![
            rule(1, Cadence::Monthly, d(2026, 1, 15), false),
            rule(2, Cadence::Monthly, d(2026, 1, 20), true),
        ];

        let kept = active_in_period(rules, &PeriodSelection::Monthly { offset: 0 }, today);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 2);
    }

    #[test]
    fn preserves_input_order() {
        let today = d(2026, 3, 31);
        let rules = vec![
            rule(7, Cadence::Monthly, d(2026, 1, 20), true),
            rule(3, Cadence::Weekly, d(2026, 1, 5), true),
            rule(5, Cadence::Monthly, d(2026, 1, 1), true),
        ];

        let kept = active_in_period(rules, &PeriodSelection::Monthly { offset: 0 }, today);
        let ids: Vec<i32> = kept.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn rule_firing_only_later_in_the_period_is_hidden_until_it_happens() {
        // Monthly on the 25th; today is the 10th of the queried month, so
        // the occurrence has not happened yet.
        let today = d(2026, 3, 10);
        let rules = vec![rule(1, Cadence::Monthly, d(2026, 1, 25), true)];

        let kept = active_in_period(rules, &PeriodSelection::Monthly { offset: 0 }, today);
        assert!(kept.is_empty());
    }

    #[test]
    fn daily_selection_matches_rules_firing_that_day() {
        // 2026-03-16 is a Monday; the weekly rule is anchored on a Monday.
        let today = d(2026, 3, 31);
        let rules = vec![
            rule(1, Cadence::Weekly, d(2026, 1, 5), true),
            rule(2, Cadence::Monthly, d(2026, 1, 16), true),
        ];

        let kept = active_in_period(
            rules,
            &PeriodSelection::Daily { date: d(2026, 3, 16) },
            today,
        );
        let ids: Vec<i32> = kept.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
