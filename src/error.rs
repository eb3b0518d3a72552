//! Error types for the store, the entry form and the application shell.

/// Errors surfaced by the transaction store.
///
/// SQLite failures (disk, permissions, locked files) are passed through as-is
/// and never retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row has a `type` column that is neither income nor expense.
    #[error("row {id} has an invalid transaction type: {value}")]
    InvalidType { id: i64, value: String },

    /// A stored row has an `amount` column that is not a decimal number.
    #[error("row {id} has an invalid amount: {value}")]
    InvalidAmount { id: i64, value: String },
}

/// Errors raised while recomputing the summary.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A running total left the representable decimal range.
    #[error("{0} is too large to add up")]
    Overflow(&'static str),
}

/// Errors returned when the entry form is submitted.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The amount field could not be parsed as a number. The form is unchanged.
    #[error("Please enter a valid amount!")]
    InvalidAmount(String),

    #[error("Failed to save transaction: {0}")]
    Store(#[from] StoreError),
}

/// Errors that end the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("could not set up logging: {0}")]
    Logging(String),
}
