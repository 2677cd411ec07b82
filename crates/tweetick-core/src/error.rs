use thiserror::Error;

use crate::tweet_source::SourceError;

/// Validation errors raised where external data enters the system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("timestamp '{value}' is not of the form YYYY-MM-DDTHH: {reason}")]
    InvalidTimestamp { value: String, reason: &'static str },

    #[error("month token must be two ASCII digits between 01 and 12: '{value}'")]
    InvalidMonthToken { value: String },

    #[error("tweet date must be a valid YYYYMMDD integer: '{value}'")]
    InvalidTweetDate { value: String },

    #[error("tweet time must be HH:MM:SS: '{value}'")]
    InvalidTweetTime { value: String },

    #[error("sentiment polarity must be one of -1, 0, 1: '{value}'")]
    InvalidPolarity { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be greater than zero")]
    ZeroCount { field: &'static str },

    #[error("credential '{name}' is missing or empty")]
    MissingCredential { name: String },

    #[error("sentiment was not computed for this alignment")]
    SentimentNotComputed,

    #[error("chart needs at least one day of data, got {days} after skipping")]
    NotEnoughDays { days: usize },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("price data unavailable from {url}: {reason}")]
    DataUnavailable { url: String, reason: String },

    #[error("malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("tweet client unavailable: {0}")]
    ClientUnavailable(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    /// A trailing-window search found no tweets and `days` days failed;
    /// `last` is the final failure.
    #[error("tweet search found nothing and failed on {days} days: {last}")]
    SearchFailed { days: usize, last: SourceError },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl CoreError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }

    pub fn unavailable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
