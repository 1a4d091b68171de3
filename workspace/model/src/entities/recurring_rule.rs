use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::transaction::TransactionKind;
use super::user;

/// How often a recurring rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(7))")]
pub enum Cadence {
    /// Fires every week on the weekday of `start_date`.
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Fires every month on the day-of-month of `start_date`, clamped
    /// to the last day in shorter months.
    #[sea_orm(string_value = "monthly")]
    Monthly,
}

/// A recurring transaction *rule* (rent, subscriptions), not an event.
///
/// Rules never materialize as transaction rows; their occurrences are
/// derived on demand from `start_date`, `end_date` and `cadence`.
/// Invariant, enforced at the data-entry boundary: `end_date`, when
/// present, is strictly later than `start_date`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_id: i32,
    pub kind: TransactionKind,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
    /// Optional note, at most 100 characters.
    pub memo: Option<String>,
    pub cadence: Cadence,
    /// The date of the first occurrence; anchors the fire-weekday or
    /// fire-day-of-month.
    pub start_date: NaiveDate,
    /// The date of the last occurrence. If null, repeats indefinitely.
    pub end_date: Option<NaiveDate>,
    /// Informational marker only; the occurrence engine never reads it.
    pub last_generated_at: Option<NaiveDate>,
    /// Toggling this off hides the rule and excludes it from summaries
    /// without deleting it.
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::OwnerId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
