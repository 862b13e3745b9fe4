//! Common error types for heddwch

use thiserror::Error;

/// Common result type for heddwch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across heddwch crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Claim or OpenGraph data could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A claim bucket holds fewer entries than sampling needs
    #[error(
        "Insufficient claim data: need {needed} per bucket, got {credible} credible and {not_credible} not credible"
    )]
    InsufficientData {
        needed: usize,
        credible: usize,
        not_credible: usize,
    },

    /// Debug event log reached its configured bound
    #[error("Debug log full: {0} entries")]
    DebugLogFull(usize),

    /// Invalid user input or message payload
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
