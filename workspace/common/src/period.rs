use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An inclusive calendar-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if the given date falls within this range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// The period a caller wants a summary or a rule filter for.
///
/// Weekly/monthly/yearly carry a signed offset relative to "today":
/// 0 is the current period, -1 the previous one. Positive offsets are
/// unusual but resolve correctly, since the rest of the system treats
/// offsets as plain signed integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "period", rename_all = "lowercase")]
pub enum PeriodSelection {
    /// A single explicit calendar day.
    Daily { date: NaiveDate },
    /// A Monday-to-Sunday week, `offset` weeks away from the current one.
    Weekly { offset: i32 },
    /// A calendar month, `offset` months away from the current one.
    Monthly { offset: i32 },
    /// A calendar year, `offset` years away from the current one.
    Yearly { offset: i32 },
}

impl PeriodSelection {
    /// Resolves the selection into an inclusive calendar range, anchored
    /// at the supplied `today`. Total for every signed offset.
    pub fn range(&self, today: NaiveDate) -> DateRange {
        match *self {
            PeriodSelection::Daily { date } => DateRange::new(date, date),
            PeriodSelection::Weekly { offset } => {
                let shifted = today + Duration::days(i64::from(offset) * 7);
                // num_days_from_monday is 0 for Monday and 6 for Sunday,
                // which is exactly the rollback to the week's Monday.
                let monday =
                    shifted - Duration::days(i64::from(shifted.weekday().num_days_from_monday()));
                DateRange::new(monday, monday + Duration::days(6))
            }
            PeriodSelection::Monthly { offset } => {
                let months = i64::from(today.year()) * 12 + i64::from(today.month0()) + i64::from(offset);
                let year = months.div_euclid(12) as i32;
                let month = months.rem_euclid(12) as u32 + 1;
                let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)).unwrap();
                DateRange::new(start, end)
            }
            PeriodSelection::Yearly { offset } => {
                let year = today.year() + offset;
                DateRange::new(
                    NaiveDate::from_ymd_opt(year, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
                )
            }
        }
    }
}

/// Returns the number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month_year = year + (month / 12) as i32;
    let next_month = (month % 12) + 1;

    // First day of the following month, stepped back by one day.
    let first_day_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1).unwrap();
    first_day_next_month.pred_opt().unwrap().day()
}
