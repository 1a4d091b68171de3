//! Period aggregation: persisted transactions plus projected recurring
//! occurrences, merged into one `PeriodSummary`.

use chrono::NaiveDate;
use common::{DateRange, PeriodSelection, PeriodSummary};
use model::entities::{recurring_rule, transaction};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::occurrence::generate_occurrences;

/// Computes profit summaries for arbitrary period selections.
///
/// Carries an injected "today" so the accrual cutoff and the period
/// anchoring are deterministic under test; `new()` anchors at the
/// current UTC date.
#[derive(Debug, Clone, Copy)]
pub struct SummaryCalculator {
    today: NaiveDate,
}

impl SummaryCalculator {
    pub fn new() -> Self {
        Self::new_with_today(common::today_utc())
    }

    pub fn new_with_today(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Summarizes one owner's activity over the selected period.
    ///
    /// Real transactions are summed from storage; recurring rules are
    /// projected through the occurrence engine and merged in as
    /// `occurrences * amount`, never materialized as rows. Inactive rules
    /// contribute nothing. A failed storage fetch aborts the whole
    /// aggregation with `ComputeError::Database` rather than surfacing a
    /// partially-summed zero.
    #[instrument(skip(db))]
    pub async fn summarize(
        &self,
        db: &DatabaseConnection,
        owner_id: i32,
        selection: &PeriodSelection,
    ) -> Result<PeriodSummary> {
        let range = selection.range(self.today);
        trace!(
            "Summarizing owner_id={} over {}..{} (today={})",
            owner_id, range.start, range.end, self.today
        );

        let transactions = fetch_transactions_in_range(db, owner_id, &range).await?;
        let rules = fetch_recurring_rules(db, owner_id).await?;
        debug!(
            "Fetched {} transaction(s) and {} recurring rule(s) for owner_id={}",
            transactions.len(),
            rules.len(),
            owner_id
        );

        let mut summary = PeriodSummary::empty();

        for tx in &transactions {
            match tx.kind {
                transaction::TransactionKind::Income => summary.total_income += tx.amount,
                transaction::TransactionKind::Expense => summary.total_expense += tx.amount,
            }
        }
        summary.transaction_count = transactions.len() as u64;

        for rule in &rules {
            if !rule.is_active {
                trace!("Skipping inactive rule id={} in aggregation", rule.id);
                continue;
            }

            let occurrences = generate_occurrences(rule, range.start, range.end, self.today);
            if occurrences.is_empty() {
                continue;
            }

            let contribution = rule.amount * Decimal::from(occurrences.len() as u64);
            match rule.kind {
                transaction::TransactionKind::Income => summary.total_income += contribution,
                transaction::TransactionKind::Expense => summary.total_expense += contribution,
            }
            summary.transaction_count += occurrences.len() as u64;
        }

        summary.net_profit = summary.total_income - summary.total_expense;

        debug!(
            "Summary for owner_id={}: income={}, expense={}, net={}, count={}",
            owner_id,
            summary.total_income,
            summary.total_expense,
            summary.net_profit,
            summary.transaction_count
        );
        Ok(summary)
    }
}

impl Default for SummaryCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches the owner's transactions whose date lies in the inclusive range.
async fn fetch_transactions_in_range(
    db: &DatabaseConnection,
    owner_id: i32,
    range: &DateRange,
) -> Result<Vec<transaction::Model>> {
    let transactions = transaction::Entity::find()
        .filter(transaction::Column::OwnerId.eq(owner_id))
        .filter(transaction::Column::Date.gte(range.start))
        .filter(transaction::Column::Date.lte(range.end))
        .all(db)
        .await?;
    Ok(transactions)
}

/// Fetches all of the owner's recurring rules, active or not; relevance
/// is decided here, not in the store.
async fn fetch_recurring_rules(
    db: &DatabaseConnection,
    owner_id: i32,
) -> Result<Vec<recurring_rule::Model>> {
    let rules = recurring_rule::Entity::find()
        .filter(recurring_rule::Column::OwnerId.eq(owner_id))
        .all(db)
        .await?;
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComputeError;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use model::entities::recurring_rule::Cadence;
    use model::entities::transaction::TransactionKind;
    use model::entities::user;
    use sea_orm::{ActiveModelTrait, Database, Set};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        db
    }

    async fn insert_user(db: &DatabaseConnection, username: &str) -> i32 {
        user::ActiveModel {
            username: Set(username.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert user")
        .id
    }

    async fn insert_transaction(
        db: &DatabaseConnection,
        owner_id: i32,
        kind: TransactionKind,
        amount: Decimal,
        date: NaiveDate,
    ) {
        let now = Utc::now();
        transaction::ActiveModel {
            owner_id: Set(owner_id),
            kind: Set(kind),
            amount: Set(amount),
            date: Set(date),
            memo: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert transaction");
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_rule(
        db: &DatabaseConnection,
        owner_id: i32,
        kind: TransactionKind,
        amount: Decimal,
        cadence: Cadence,
        start: NaiveDate,
        end: Option<NaiveDate>,
        is_active: bool,
    ) {
        let now = Utc::now();
        recurring_rule::ActiveModel {
            owner_id: Set(owner_id),
            kind: Set(kind),
            amount: Set(amount),
            memo: Set(None),
            cadence: Set(cadence),
            start_date: Set(start),
            end_date: Set(end),
            last_generated_at: Set(None),
            is_active: Set(is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to insert recurring rule");
    }

    /// Monthly expense of 300000 anchored 2026-01-01, queried over
    /// February 2026 with today=2026-02-15: exactly one occurrence on
    /// Feb 1, no other transactions.
    #[tokio::test]
    async fn rent_rule_alone_produces_a_negative_february() {
        let db = setup_db().await;
        let owner = insert_user(&db, "shopkeeper").await;
        insert_rule(
            &db,
            owner,
            TransactionKind::Expense,
            Decimal::new(300_000_00, 2),
            Cadence::Monthly,
            d(2026, 1, 1),
            None,
            true,
        )
        .await;

        let calculator = SummaryCalculator::new_with_today(d(2026, 2, 15));
        let summary = calculator
            .summarize(&db, owner, &PeriodSelection::Monthly { offset: 0 })
            .await
            .expect("summarize failed");

        assert_eq!(summary.total_expense, Decimal::new(300_000_00, 2));
        assert_eq!(summary.total_income, Decimal::ZERO);
        assert_eq!(summary.net_profit, Decimal::new(-300_000_00, 2));
        assert_eq!(summary.transaction_count, 1);
    }

    #[tokio::test]
    async fn real_and_recurring_amounts_merge_without_drift() {
        let db = setup_db().await;
        let owner = insert_user(&db, "shopkeeper").await;

        // Two real transactions inside March 2026, one outside.
        insert_transaction(&db, owner, TransactionKind::Income, Decimal::new(1234_56, 2), d(2026, 3, 5)).await;
        insert_transaction(&db, owner, TransactionKind::Expense, Decimal::new(234_56, 2), d(2026, 3, 20)).await;
        insert_transaction(&db, owner, TransactionKind::Income, Decimal::new(999_99, 2), d(2026, 4, 1)).await;

        // Weekly income anchored on a Monday: Mondays in March 2026 are
        // the 2nd, 9th, 16th, 23rd and 30th; today cuts off after the 23rd.
        insert_rule(
            &db,
            owner,
            TransactionKind::Income,
            Decimal::new(50_01, 2),
            Cadence::Weekly,
            d(2026, 1, 5),
            None,
            true,
        )
        .await;

        let calculator = SummaryCalculator::new_with_today(d(2026, 3, 25));
        let summary = calculator
            .summarize(&db, owner, &PeriodSelection::Monthly { offset: 0 })
            .await
            .expect("summarize failed");

        // 1234.56 + 4 * 50.01 = 1434.60, exact in cents.
        assert_eq!(summary.total_income, Decimal::new(1434_60, 2));
        assert_eq!(summary.total_expense, Decimal::new(234_56, 2));
        assert_eq!(
            summary.net_profit,
            summary.total_income - summary.total_expense
        );
        assert_eq!(summary.transaction_count, 2 + 4);
    }

    #[tokio::test]
    async fn inactive_rules_contribute_nothing() {
        let db = setup_db().await;
        let owner = insert_user(&db, "shopkeeper").await;
        insert_rule(
            &db,
            owner,
            TransactionKind::Expense,
            Decimal::new(500_00, 2),
            Cadence::Monthly,
            d(2026, 1, 1),
            None,
            false,
        )
        .await;

        let calculator = SummaryCalculator::new_with_today(d(2026, 3, 31));
        let summary = calculator
            .summarize(&db, owner, &PeriodSelection::Monthly { offset: 0 })
            .await
            .expect("summarize failed");

        assert_eq!(summary, PeriodSummary::empty());
    }

    #[tokio::test]
    async fn other_owners_data_is_invisible() {
        let db = setup_db().await;
        let owner = insert_user(&db, "shopkeeper").await;
        let neighbor = insert_user(&db, "neighbor").await;

        insert_transaction(&db, neighbor, TransactionKind::Income, Decimal::new(777_00, 2), d(2026, 3, 5)).await;
        insert_rule(
            &db,
            neighbor,
            TransactionKind::Expense,
            Decimal::new(100_00, 2),
            Cadence::Monthly,
            d(2026, 1, 1),
            None,
            true,
        )
        .await;

        let calculator = SummaryCalculator::new_with_today(d(2026, 3, 31));
        let summary = calculator
            .summarize(&db, owner, &PeriodSelection::Monthly { offset: 0 })
            .await
            .expect("summarize failed");

        assert_eq!(summary, PeriodSummary::empty());
    }

    #[tokio::test]
    async fn yearly_selection_counts_every_past_occurrence() {
        let db = setup_db().await;
        let owner = insert_user(&db, "shopkeeper").await;
        insert_rule(
            &db,
            owner,
            TransactionKind::Expense,
            Decimal::new(10_00, 2),
            Cadence::Monthly,
            d(2026, 1, 10),
            None,
            true,
        )
        .await;

        // Today is July 20th: seven fire dates (Jan..Jul 10th) have passed.
        let calculator = SummaryCalculator::new_with_today(d(2026, 7, 20));
        let summary = calculator
            .summarize(&db, owner, &PeriodSelection::Yearly { offset: 0 })
            .await
            .expect("summarize failed");

        assert_eq!(summary.total_expense, Decimal::new(70_00, 2));
        assert_eq!(summary.transaction_count, 7);
    }

    #[tokio::test]
    async fn failed_fetch_is_an_error_not_an_empty_summary() {
        let db = setup_db().await;
        let owner = insert_user(&db, "shopkeeper").await;

        // Pull the pool out from under the calculator; the handles share it.
        db.clone().close().await.expect("Failed to close connection");

        let calculator = SummaryCalculator::new_with_today(d(2026, 3, 31));
        let result = calculator
            .summarize(&db, owner, &PeriodSelection::Monthly { offset: 0 })
            .await;

        assert!(matches!(result, Err(ComputeError::Database(_))));
    }

    #[tokio::test]
    async fn offset_periods_look_at_the_right_month() {
        let db = setup_db().await;
        let owner = insert_user(&db, "shopkeeper").await;
        insert_transaction(&db, owner, TransactionKind::Income, Decimal::new(88_00, 2), d(2026, 2, 14)).await;

        let calculator = SummaryCalculator::new_with_today(d(2026, 3, 15));

        let previous = calculator
            .summarize(&db, owner, &PeriodSelection::Monthly { offset: -1 })
            .await
            .expect("summarize failed");
        assert_eq!(previous.total_income, Decimal::new(88_00, 2));
        assert_eq!(previous.transaction_count, 1);

        let current = calculator
            .summarize(&db, owner, &PeriodSelection::Monthly { offset: 0 })
            .await
            .expect("summarize failed");
        assert_eq!(current, PeriodSummary::empty());
    }
}
