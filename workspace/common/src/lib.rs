//! Shared types used by both the compute crate and the HTTP layer.
//! Everything here is pure data plus calendar arithmetic; no I/O.

mod period;
mod summary;

pub use period::{DateRange, PeriodSelection, days_in_month};
pub use summary::PeriodSummary;

use chrono::{DateTime, NaiveDate, Utc};

/// Strips the time-of-day component from a UTC timestamp, yielding the
/// calendar date the rest of the system operates on.
///
/// The whole service uses UTC-anchored calendar dates uniformly, so a
/// timestamp only ever crosses this boundary once.
pub fn calendar_date(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

/// The current UTC calendar date. Callers that need a deterministic
/// "today" (tests, the aggregator) inject a date instead of calling this.
pub fn today_utc() -> NaiveDate {
    calendar_date(Utc::now())
}
