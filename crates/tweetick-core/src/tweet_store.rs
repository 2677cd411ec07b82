//! CSV persistence for tweet tables.
//!
//! Layout: `,date,time,id,followers,tweet,sentiment` with a leading 0-based
//! row index. Columns are located by header name, so files written without
//! the index column load as well.

use std::path::Path;

use tracing::{info, warn};

use crate::collector::{DayFailure, TweetCollector};
use crate::domain::{Polarity, TweetDate, TweetRecord};
use crate::CoreError;

const COLUMNS: [&str; 6] = ["date", "time", "id", "followers", "tweet", "sentiment"];

/// Tweets returned by [`load_text_tweets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTweets {
    pub tweets: Vec<TweetRecord>,
    pub from_cache: bool,
    /// Failed search days; always empty for a cache hit.
    pub failures: Vec<DayFailure>,
}

/// Reads and validates a tweet table.
///
/// # Errors
///
/// [`CoreError::MalformedRecord`] with the 0-based data row index when a row
/// does not validate, or when a required column is missing (index 0).
pub fn read_tweet_table(path: &Path) -> Result<Vec<TweetRecord>, CoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut positions = [0usize; COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| header.trim() == column)
            .ok_or_else(|| CoreError::malformed(0, format!("tweet table has no '{column}' column")))?;
    }
    let [date, time, id, followers, text, sentiment] = positions;

    let mut tweets = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let field = |position: usize| row.get(position).unwrap_or_default();

        let record = parse_row(
            field(date),
            field(time),
            field(id),
            field(followers),
            field(text),
            field(sentiment),
        )
        .map_err(|reason| CoreError::malformed(index, reason))?;
        tweets.push(record);
    }

    Ok(tweets)
}

/// Writes `tweets` with a 0-based index column, creating parent directories.
pub fn write_tweet_table(path: &Path, tweets: &[TweetRecord]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(std::iter::once("").chain(COLUMNS))?;
    for (index, tweet) in tweets.iter().enumerate() {
        let sentiment = tweet
            .sentiment
            .map(|label| label.value().to_string())
            .unwrap_or_default();
        writer.write_record([
            index.to_string(),
            tweet.date.to_string(),
            tweet.time.clone(),
            tweet.id.to_string(),
            tweet.followers.to_string(),
            tweet.text.clone(),
            sentiment,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Cache-first text search: reads `path` if it exists, otherwise searches for
/// `query` and writes the harvest to `path`.
///
/// A harvest with no tweets and at least one failed day is not cached and
/// fails with [`CoreError::SearchFailed`], so the next call searches again.
pub async fn load_text_tweets(
    collector: &TweetCollector,
    path: &Path,
    count: usize,
    query: &str,
) -> Result<LoadedTweets, CoreError> {
    if path.exists() {
        info!(path = %path.display(), "loading tweets from cache");
        return Ok(LoadedTweets {
            tweets: read_tweet_table(path)?,
            from_cache: true,
            failures: Vec::new(),
        });
    }

    let mut harvest = collector.fetch_text_search(query, count).await?;
    if harvest.tweets.is_empty() {
        let days = harvest.failures.len();
        if let Some(failure) = harvest.failures.pop() {
            warn!(path = %path.display(), days, "tweet search found nothing; cache not written");
            return Err(CoreError::SearchFailed {
                days,
                last: failure.error,
            });
        }
    }

    write_tweet_table(path, &harvest.tweets)?;
    info!(path = %path.display(), tweets = harvest.tweets.len(), "cached tweet search");

    Ok(LoadedTweets {
        tweets: harvest.tweets,
        from_cache: false,
        failures: harvest.failures,
    })
}

fn parse_row(
    date: &str,
    time: &str,
    id: &str,
    followers: &str,
    text: &str,
    sentiment: &str,
) -> Result<TweetRecord, String> {
    let date = parse_integer("date", date)?;
    let date = u32::try_from(date)
        .map_err(|_| format!("date {date} is out of range"))
        .and_then(|value| TweetDate::new(value).map_err(|error| error.to_string()))?;

    let id = id
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("id '{id}' is not an unsigned integer"))?;
    let followers = parse_integer("followers", followers)?;
    let sentiment = parse_sentiment(sentiment)?;

    TweetRecord::new(date, time.trim(), id, followers, text, sentiment).map_err(|error| error.to_string())
}

/// Integer column that may have been written with a float spelling (`12.0`).
fn parse_integer(column: &str, raw: &str) -> Result<u64, String> {
    let raw = raw.trim();
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < 9.0e15 => {
            Ok(value as u64)
        }
        _ => Err(format!("{column} '{raw}' is not an unsigned integer")),
    }
}

fn parse_sentiment(raw: &str) -> Result<Option<Polarity>, String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    let value = raw
        .parse::<f64>()
        .map_err(|_| format!("sentiment '{raw}' is not a number"))?;
    if value.fract() != 0.0 {
        return Err(format!("sentiment '{raw}' is not one of -1, 0, 1"));
    }

    Polarity::from_value(value as i64)
        .map(Some)
        .map_err(|error| error.to_string())
}
