//! Root module for the SeaORM entities of the bookkeeping service.

pub mod recurring_rule;
pub mod transaction;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::recurring_rule::Entity as RecurringRule;
    pub use super::transaction::Entity as Transaction;
    pub use super::user::Entity as User;
}
