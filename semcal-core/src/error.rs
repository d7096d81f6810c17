//! Error types for semcal.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur in semcal operations.
#[derive(Error, Debug)]
pub enum SemcalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Feed request failed: {0}")]
    Feed(String),

    #[error("Feed request timed out after {}", humantime::format_duration(*.0))]
    FeedTimeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for semcal operations.
pub type SemcalResult<T> = Result<T, SemcalError>;
