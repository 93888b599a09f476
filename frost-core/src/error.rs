/// Error types for the frost forecasting crates
use chrono::NaiveDate;
use thiserror::Error;

/// Main error type shared by the store, the models and the engine.
///
/// Every variant is structural (bad or missing data, bad weights), so none
/// of them is worth retrying with the same inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Not enough daily records to build the requested window
    #[error("Insufficient history available (needed: {needed} days, found: {found})")]
    InsufficientHistory { needed: usize, found: usize },

    /// The last observed day is too far behind the query date to bridge
    #[error(
        "History is stale: last real date {last_real_date}, {missing_days} missing days exceeds the limit of {max_gap_days}"
    )]
    StaleHistory {
        last_real_date: NaiveDate,
        missing_days: i64,
        max_gap_days: i64,
    },

    /// Model weights could not be loaded or do not fit the feature layout
    #[error("Forecast engine unavailable: {0}")]
    ModelUnavailable(String),

    /// The history contains duplicate, unordered or unparsable rows
    #[error("Invalid history: {0}")]
    InvalidHistory(String),

    /// Engine configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The backing store failed while answering a query
    #[error("Store error: {0}")]
    Store(String),
}

/// Type alias for Results using ForecastError
pub type Result<T> = std::result::Result<T, ForecastError>;
