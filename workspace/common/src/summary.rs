use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregated totals for one owner over one period.
///
/// Derived on every query from persisted transactions plus projected
/// recurring occurrences; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PeriodSummary {
    /// Sum of all income amounts in the period.
    pub total_income: Decimal,
    /// Sum of all expense amounts in the period.
    pub total_expense: Decimal,
    /// `total_income - total_expense`.
    pub net_profit: Decimal,
    /// Persisted transactions plus recurring occurrences in the period.
    pub transaction_count: u64,
}

impl PeriodSummary {
    /// A summary with all totals at zero, the starting point of the
    /// aggregation.
    pub fn empty() -> Self {
        Self {
            total_income: Decimal::ZERO,
            total_expense: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            transaction_count: 0,
        }
    }
}
