use thiserror::Error;

/// Failures that can reach a caller. Insufficient data is deliberately not
/// here: engines signal it with absent values and skip counts, never as an
/// error.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),
}
