//! # Tweetick Core
//!
//! Correlates a token's hourly price history with Twitter activity about it.
//!
//! ## Overview
//!
//! - **Price loading**: cache-first fetch of hourly prices, bucketed by day
//! - **Alignment**: per-day tweet volume, follower reach and mean sentiment
//! - **Tweet collection**: user timelines and trailing-window text search
//! - **Charting**: dual-axis bar + line comparison charts as SVG
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`aligner`] | Joins day buckets with tweets on the calendar date |
//! | [`chart`] | Comparison chart model and SVG rendering |
//! | [`collector`] | Status normalization and the 8-day search loop |
//! | [`config`] | Credentials from the environment, default cache paths |
//! | [`domain`] | Price points, day buckets, tweet records, polarity |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`oauth`] | OAuth 1.0a request signing |
//! | [`price_loader`] | Price fetch, cache and bucketing |
//! | [`sentiment`] | Tweet cleaning and lexicon polarity scoring |
//! | [`tweet_source`] | Tweet provider trait and raw status payloads |
//! | [`tweet_store`] | Tweet table CSV persistence |
//! | [`twitter`] | Twitter v1.1 REST client |
//!
//! ## Pipeline
//!
//! ```text
//! PriceLoader ──▶ DayBuckets ──┐
//!                              ├──▶ align() ──▶ Alignment ──▶ ComparisonChart
//! TweetCollector ─▶ tweets ────┘
//! ```
//!
//! ## Security
//!
//! - Twitter credentials are read from environment variables only
//! - `Debug` output of credentials is redacted

pub mod aligner;
pub mod chart;
pub mod collector;
pub mod config;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod oauth;
pub mod price_loader;
pub mod sentiment;
pub mod tweet_source;
pub mod tweet_store;
pub mod twitter;

pub use aligner::{align, non_neutral_mean, round2, Alignment, DayAggregate};
pub use chart::{ChartMetric, ChartOptions, ComparisonChart};
pub use collector::{parse_created_at, DayFailure, SearchHarvest, TweetCollector};
pub use config::{OAuthCredentials, TwitterAuth};
pub use domain::{
    BlockHour, DayBucket, DayBuckets, MonthToken, Polarity, PricePoint, TweetDate, TweetRecord,
};
pub use error::{CoreError, ValidationError};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use price_loader::{bucket_by_day, parse_price_records, DayRange, PriceFields, PriceLoad, PriceLoader};
pub use sentiment::{clean_tweet, Lexicon, LexiconScorer, SentimentScorer};
pub use tweet_source::{SourceError, SourceErrorKind, Status, StatusFuture, StatusUser, TweetSource};
pub use tweet_store::{load_text_tweets, read_tweet_table, write_tweet_table, LoadedTweets};
pub use twitter::TwitterClient;
