//! Error types for applicant-dedup
//!
//! The matching pipeline itself is total. Only the edges that touch the
//! outside world (loading records, loading configuration) can fail.

use thiserror::Error;

/// Result type alias for applicant-dedup operations
pub type Result<T> = std::result::Result<T, DedupError>;

/// Main error type for applicant-dedup operations
#[derive(Error, Debug)]
pub enum DedupError {
    /// Reading input failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON records or config could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV records could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML config could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
