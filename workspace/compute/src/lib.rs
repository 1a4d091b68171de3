pub mod error;
pub mod occurrence;
pub mod recurring;
pub mod summary;

use chrono::NaiveDate;
use summary::SummaryCalculator;

/// Returns a pre-configured summary calculator.
///
/// Uses the provided date as "today", or the current UTC date if none is
/// given. Handlers call this with `None`; tests inject a fixed date.
pub fn default_summary(today: Option<NaiveDate>) -> SummaryCalculator {
    match today {
        Some(today) => SummaryCalculator::new_with_today(today),
        None => SummaryCalculator::new(),
    }
}
