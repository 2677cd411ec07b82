//! Tweet collection: turns raw statuses from a [`TweetSource`] into scored
//! [`TweetRecord`]s.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use time::{format_description, Date, OffsetDateTime, UtcOffset};
use tracing::{info, warn};

use crate::config::SEARCH_WINDOW_DAYS;
use crate::domain::{TweetDate, TweetRecord};
use crate::sentiment::SentimentScorer;
use crate::tweet_source::{SourceError, Status, TweetSource};
use crate::{CoreError, ValidationError};

const CREATED_AT_FORMAT: &str = "[weekday repr:short] [month repr:short] [day] [hour]:[minute]:[second] [offset_hour sign:mandatory][offset_minute] [year]";

/// One day of the search window whose query failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFailure {
    pub until: Date,
    pub error: SourceError,
}

/// Outcome of a trailing-window text search.
///
/// `tweets` holds whatever the successful days returned; `failures` lists the
/// days that did not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchHarvest {
    pub tweets: Vec<TweetRecord>,
    pub failures: Vec<DayFailure>,
}

/// Fetches and normalizes tweets.
#[derive(Clone)]
pub struct TweetCollector {
    source: Arc<dyn TweetSource>,
    scorer: Arc<dyn SentimentScorer>,
    failure_pause: Duration,
}

impl TweetCollector {
    pub fn new(source: Arc<dyn TweetSource>, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self {
            source,
            scorer,
            failure_pause: Duration::from_secs(3),
        }
    }

    /// Pause taken after a failed day before moving on to the next one.
    pub fn with_failure_pause(mut self, pause: Duration) -> Self {
        self.failure_pause = pause;
        self
    }

    /// Most recent `count` tweets posted by `user`.
    pub async fn fetch_user_tweets(&self, user: &str, count: usize) -> Result<Vec<TweetRecord>, CoreError> {
        let user = user.trim();
        if user.is_empty() {
            return Err(ValidationError::EmptyField { field: "username" }.into());
        }
        if count == 0 {
            return Err(ValidationError::ZeroCount { field: "count" }.into());
        }

        info!(user, count, "fetching user timeline");
        let statuses = self.source.user_timeline(user, count).await?;
        statuses
            .into_iter()
            .enumerate()
            .map(|(index, status)| self.normalize(index, status))
            .collect()
    }

    /// Text search over the trailing window ending today (UTC).
    pub async fn fetch_text_search(&self, query: &str, count: usize) -> Result<SearchHarvest, CoreError> {
        let today = OffsetDateTime::now_utc().date();
        self.fetch_text_search_from(query, count, today).await
    }

    /// Text search with `until` set to `today` minus 0, 1, ... 7 days.
    ///
    /// Up to `count` tweets are requested per day. A day fails as a whole when
    /// the request fails or any of its statuses cannot be normalized; it is
    /// logged, followed by the configured pause, and recorded in the harvest
    /// while the remaining days still run. Tweets seen on an earlier day are
    /// not added again.
    pub async fn fetch_text_search_from(
        &self,
        query: &str,
        count: usize,
        today: Date,
    ) -> Result<SearchHarvest, CoreError> {
        if query.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "query" }.into());
        }
        if count == 0 {
            return Err(ValidationError::ZeroCount { field: "count" }.into());
        }

        info!(query, count, days = SEARCH_WINDOW_DAYS, "searching tweets");
        let mut harvest = SearchHarvest::default();
        let mut seen = HashSet::new();

        for offset in 0..SEARCH_WINDOW_DAYS {
            let Some(until) = today.checked_sub(time::Duration::days(i64::from(offset))) else {
                break;
            };

            match self.search_day(query, until, count).await {
                Ok(tweets) => {
                    let fresh = tweets.into_iter().filter(|tweet| seen.insert(tweet.id));
                    harvest.tweets.extend(fresh);
                }
                Err(error) => {
                    warn!(
                        %until,
                        code = error.code(),
                        error = %error,
                        "tweet search failed for day; continuing"
                    );
                    harvest.failures.push(DayFailure { until, error });
                    tokio::time::sleep(self.failure_pause).await;
                }
            }
        }

        info!(
            tweets = harvest.tweets.len(),
            failed_days = harvest.failures.len(),
            "tweet search finished"
        );
        Ok(harvest)
    }

    /// One day of the window, normalized in full or not at all.
    async fn search_day(
        &self,
        query: &str,
        until: Date,
        count: usize,
    ) -> Result<Vec<TweetRecord>, SourceError> {
        let statuses = self.source.search(query, until, count).await?;
        statuses
            .into_iter()
            .enumerate()
            .map(|(index, status)| {
                self.normalize(index, status).map_err(|error| {
                    SourceError::internal(format!("search results until {until}: {error}"))
                })
            })
            .collect()
    }

    /// Converts a raw status into a scored record, in UTC.
    ///
    /// `index` is the status position in its page; errors carry it together
    /// with the status id.
    pub fn normalize(&self, index: usize, status: Status) -> Result<TweetRecord, CoreError> {
        let id = status.id;
        let malformed = |reason: String| CoreError::malformed(index, format!("status {id}: {reason}"));

        let created = parse_created_at(&status.created_at)
            .map_err(&malformed)?
            .to_offset(UtcOffset::UTC);

        let clock = format!(
            "{:02}:{:02}:{:02}",
            created.hour(),
            created.minute(),
            created.second()
        );
        let sentiment = self.scorer.polarity(&status.text);

        TweetRecord::new(
            TweetDate::from_date(created.date()),
            clock,
            status.id,
            status.user.followers_count,
            status.text,
            Some(sentiment),
        )
        .map_err(|error| malformed(error.to_string()))
    }
}

/// Parses Twitter's `created_at`, e.g. `Wed Apr 21 10:00:00 +0000 2021`.
pub fn parse_created_at(value: &str) -> Result<OffsetDateTime, String> {
    let format = format_description::parse(CREATED_AT_FORMAT)
        .map_err(|error| format!("invalid created_at format description: {error}"))?;
    OffsetDateTime::parse(value.trim(), &format)
        .map_err(|error| format!("created_at '{value}' is not a Twitter timestamp: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twitter_timestamp() {
        let parsed = parse_created_at("Wed Apr 21 10:00:00 +0000 2021").expect("valid timestamp");
        assert_eq!(parsed.year(), 2021);
        assert_eq!(u8::from(parsed.month()), 4);
        assert_eq!(parsed.day(), 21);
        assert_eq!(parsed.hour(), 10);
    }

    #[test]
    fn converts_offsets_to_utc() {
        let parsed = parse_created_at("Wed Apr 21 23:30:00 -0200 2021")
            .expect("valid timestamp")
            .to_offset(UtcOffset::UTC);
        assert_eq!(parsed.day(), 22);
        assert_eq!(parsed.hour(), 1);
    }

    #[test]
    fn rejects_iso_timestamps() {
        assert!(parse_created_at("2021-04-21T10:00:00Z").is_err());
    }
}
