//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data parsing error
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// Ticker is not tracked by the store
    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    /// Invalid ticker symbol
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Missing data
    #[error("Missing data for {ticker}: {reason}")]
    MissingData {
        /// Ticker that was queried
        ticker: String,
        /// Reason for missing data
        reason: String,
    },
}
