//! Credentials and defaults.
//!
//! Secrets are read from the environment only and never printed; the `Debug`
//! implementations below redact them.

use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};

use crate::{CoreError, ValidationError};

pub const ENV_API_KEY: &str = "TWEETICK_TWITTER_API_KEY";
pub const ENV_API_SECRET: &str = "TWEETICK_TWITTER_API_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "TWEETICK_TWITTER_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "TWEETICK_TWITTER_ACCESS_TOKEN_SECRET";
pub const ENV_BEARER_TOKEN: &str = "TWEETICK_TWITTER_BEARER_TOKEN";

/// Default number of days in the trailing search window (today plus 7).
pub const SEARCH_WINDOW_DAYS: u32 = 8;

/// User-context OAuth 1.0a credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl OAuthCredentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let credentials = Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        };

        for (name, value) in [
            (ENV_API_KEY, &credentials.api_key),
            (ENV_API_SECRET, &credentials.api_secret),
            (ENV_ACCESS_TOKEN, &credentials.access_token),
            (ENV_ACCESS_TOKEN_SECRET, &credentials.access_token_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingCredential {
                    name: name.to_owned(),
                });
            }
        }

        Ok(credentials)
    }
}

impl Debug for OAuthCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// How the Twitter client authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum TwitterAuth {
    OAuth1(OAuthCredentials),
    Bearer(String),
}

impl TwitterAuth {
    /// Reads credentials from the process environment.
    ///
    /// A non-empty bearer token wins; otherwise all four OAuth values are
    /// required.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        if let Some(token) = lookup(ENV_BEARER_TOKEN).filter(|token| !token.trim().is_empty()) {
            return Ok(Self::Bearer(token));
        }

        let read = |name: &str| lookup(name).unwrap_or_default();
        OAuthCredentials::new(
            read(ENV_API_KEY),
            read(ENV_API_SECRET),
            read(ENV_ACCESS_TOKEN),
            read(ENV_ACCESS_TOKEN_SECRET),
        )
        .map(Self::OAuth1)
        .map_err(|error| CoreError::ClientUnavailable(error.to_string()))
    }
}

impl Debug for TwitterAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuth1(credentials) => f.debug_tuple("OAuth1").field(credentials).finish(),
            Self::Bearer(_) => f.debug_tuple("Bearer").field(&"<redacted>").finish(),
        }
    }
}

/// Default cache path for a text-search harvest: `<dir>/<TOKEN>_tweets<count>.csv`.
pub fn default_tweet_cache_path(data_dir: &Path, token: &str, count: usize) -> PathBuf {
    data_dir.join(format!("{}_tweets{count}.csv", token.to_ascii_uppercase()))
}

/// Default cache path for price history: `<dir>/<token>_prices.json`.
pub fn default_price_cache_path(data_dir: &Path, token: &str) -> PathBuf {
    data_dir.join(format!("{}_prices.json", token.to_ascii_lowercase()))
}
