pub mod health;
pub mod recurring;
pub mod summary;
pub mod transactions;
pub mod users;
