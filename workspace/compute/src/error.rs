use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// A storage fetch failed. Callers must treat this as "data
    /// unavailable", never as an empty period.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Runtime error for unexpected situations
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
