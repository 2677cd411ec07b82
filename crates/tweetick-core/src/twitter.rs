//! Twitter v1.1 REST transport implementing [`TweetSource`].
//!
//! | Endpoint | Used by |
//! |----------|---------|
//! | `statuses/user_timeline.json` | [`TweetSource::user_timeline`] |
//! | `search/tweets.json` | [`TweetSource::search`] |
//!
//! Both endpoints are paged with `max_id`: each follow-up request asks for
//! statuses strictly older than the oldest one seen so far.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use time::Date;
use tracing::debug;

use crate::config::TwitterAuth;
use crate::http_client::{encode_query, HttpAuth, HttpClient, HttpRequest};
use crate::oauth::OAuthSigner;
use crate::tweet_source::{SourceError, Status, StatusFuture, TweetSource};
use crate::CoreError;

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com/1.1";

const TIMELINE_PAGE_LIMIT: usize = 200;
const SEARCH_PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone)]
enum Authorizer {
    OAuth(OAuthSigner),
    Bearer(String),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    statuses: Vec<Status>,
}

/// Authenticated Twitter client.
///
/// Construct it once and share it; it holds no per-request state.
#[derive(Clone)]
pub struct TwitterClient {
    http_client: Arc<dyn HttpClient>,
    authorizer: Authorizer,
    base_url: String,
    timeout_ms: u64,
}

impl TwitterClient {
    pub fn new(auth: TwitterAuth, http_client: Arc<dyn HttpClient>) -> Self {
        let authorizer = match auth {
            TwitterAuth::OAuth1(credentials) => Authorizer::OAuth(OAuthSigner::new(credentials)),
            TwitterAuth::Bearer(token) => Authorizer::Bearer(token),
        };

        Self {
            http_client,
            authorizer,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 10_000,
        }
    }

    /// Builds a client from environment credentials.
    ///
    /// Fails with [`CoreError::ClientUnavailable`] before any request is made
    /// when credentials are missing.
    pub fn from_env(http_client: Arc<dyn HttpClient>) -> Result<Self, CoreError> {
        Ok(Self::new(TwitterAuth::from_env()?, http_client))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value, SourceError> {
        let url = format!("{}/{path}", self.base_url);
        let mut request =
            HttpRequest::get(format!("{url}?{}", encode_query(params))).with_timeout_ms(self.timeout_ms);

        request = match &self.authorizer {
            Authorizer::OAuth(signer) => {
                let header = signer.authorization_header(&url, params)?;
                request.with_auth(&HttpAuth::Header {
                    name: String::from("Authorization"),
                    value: header,
                })
            }
            Authorizer::Bearer(token) => request.with_auth(&HttpAuth::BearerToken(token.clone())),
        };

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("twitter transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("twitter transport error: {}", error.message()))
            }
        })?;

        match response.status {
            200..=299 => {}
            401 | 403 => {
                return Err(SourceError::unauthorized(format!(
                    "twitter rejected credentials with status {}",
                    response.status
                )))
            }
            429 => return Err(SourceError::rate_limited("twitter rate limit exceeded")),
            status => {
                return Err(SourceError::unavailable(format!(
                    "twitter upstream returned status {status}"
                )))
            }
        }

        serde_json::from_str(&response.body)
            .map_err(|error| SourceError::internal(format!("twitter response is not JSON: {error}")))
    }

    /// Requests pages until `count` statuses are collected or a page is empty.
    async fn paginate(
        &self,
        path: &str,
        base_params: Vec<(String, String)>,
        count: usize,
        page_limit: usize,
        extract: fn(Value) -> Result<Vec<Status>, SourceError>,
    ) -> Result<Vec<Status>, SourceError> {
        let mut collected = Vec::with_capacity(count.min(page_limit));
        let mut max_id: Option<u64> = None;

        while collected.len() < count {
            let page_size = (count - collected.len()).min(page_limit);
            let mut params = base_params.clone();
            params.push((String::from("count"), page_size.to_string()));
            if let Some(max_id) = max_id {
                params.push((String::from("max_id"), max_id.to_string()));
            }

            let page = extract(self.get_json(path, &params).await?)?;
            debug!(path, statuses = page.len(), ?max_id, "fetched twitter page");
            if page.is_empty() {
                break;
            }

            let oldest = page.iter().map(|status| status.id).min();
            collected.extend(page.into_iter().take(count - collected.len()));

            match oldest.and_then(|id| id.checked_sub(1)) {
                Some(next) if max_id.map_or(true, |current| next < current) => max_id = Some(next),
                _ => break,
            }
        }

        Ok(collected)
    }
}

impl TweetSource for TwitterClient {
    fn user_timeline<'a>(&'a self, user: &'a str, count: usize) -> StatusFuture<'a> {
        Box::pin(async move {
            if user.trim().is_empty() {
                return Err(SourceError::invalid_request("user timeline requires a screen name"));
            }

            self.paginate(
                "statuses/user_timeline.json",
                vec![(String::from("screen_name"), user.trim().to_owned())],
                count,
                TIMELINE_PAGE_LIMIT,
                timeline_statuses,
            )
            .await
        })
    }

    fn search<'a>(&'a self, query: &'a str, until: Date, count: usize) -> StatusFuture<'a> {
        Box::pin(async move {
            if query.trim().is_empty() {
                return Err(SourceError::invalid_request("search requires a query"));
            }

            self.paginate(
                "search/tweets.json",
                vec![
                    (String::from("q"), query.to_owned()),
                    (String::from("until"), until_param(until)),
                ],
                count,
                SEARCH_PAGE_LIMIT,
                search_statuses,
            )
            .await
        })
    }
}

fn timeline_statuses(body: Value) -> Result<Vec<Status>, SourceError> {
    serde_json::from_value(body)
        .map_err(|error| SourceError::internal(format!("unexpected timeline payload: {error}")))
}

fn search_statuses(body: Value) -> Result<Vec<Status>, SourceError> {
    serde_json::from_value::<SearchResponse>(body)
        .map(|response| response.statuses)
        .map_err(|error| SourceError::internal(format!("unexpected search payload: {error}")))
}

/// `YYYY-MM-DD`, as the search endpoint expects.
fn until_param(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
