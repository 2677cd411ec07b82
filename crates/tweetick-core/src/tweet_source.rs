//! Tweet source contract and raw status payloads.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`user_timeline`](TweetSource::user_timeline) | Most recent statuses of one account |
//! | [`search`](TweetSource::search) | Statuses matching a query, created before `until` |
//!
//! Implementations return raw [`Status`] values; normalization into
//! [`TweetRecord`](crate::TweetRecord)s happens in the collector.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use time::Date;

/// Author fields carried by a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUser {
    pub followers_count: u64,
}

/// Raw status as returned by the Twitter v1.1 API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    /// e.g. `Wed Apr 21 10:00:00 +0000 2021`
    pub created_at: String,
    pub text: String,
    pub user: StatusUser,
}

/// Error classification for remote tweet fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    Unauthorized,
    InvalidRequest,
    Internal,
}

/// Structured tweet-source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unauthorized,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Unauthorized => "source.unauthorized",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Boxed future returned by [`TweetSource`] methods.
pub type StatusFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Status>, SourceError>> + Send + 'a>>;

/// Remote tweet provider.
///
/// Implementations must be `Send + Sync`; the collector holds them behind an
/// `Arc`.
pub trait TweetSource: Send + Sync {
    /// Up to `count` most recent statuses posted by `user`.
    fn user_timeline<'a>(&'a self, user: &'a str, count: usize) -> StatusFuture<'a>;

    /// Up to `count` statuses matching `query`, created before the start of `until`.
    fn search<'a>(&'a self, query: &'a str, until: Date, count: usize) -> StatusFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limits_are_retryable() {
        let error = SourceError::rate_limited("slow down");
        assert!(error.retryable());
        assert_eq!(error.code(), "source.rate_limited");
    }

    #[test]
    fn auth_failures_are_not_retryable() {
        let error = SourceError::unauthorized("bad token");
        assert!(!error.retryable());
        assert_eq!(error.to_string(), "bad token (source.unauthorized)");
    }

    #[test]
    fn status_deserializes_from_api_payload() {
        let status: Status = serde_json::from_str(
            r#"{"id": 42, "created_at": "Wed Apr 21 10:00:00 +0000 2021", "text": "gm",
                "user": {"followers_count": 12, "screen_name": "x"}, "lang": "en"}"#,
        )
        .expect("valid payload");
        assert_eq!(status.user.followers_count, 12);
    }
}
