use sea_orm::entity::prelude::*;

/// A user of the bookkeeping service. Every transaction and recurring
/// rule is owned by exactly one user; there is no sharing.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
    #[sea_orm(has_many = "super::recurring_rule::Entity")]
    RecurringRule,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<super::recurring_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringRule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
