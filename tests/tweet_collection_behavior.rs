//! Behavior-driven tests for tweet collection and the tweet table cache.
//!
//! These tests verify normalization of raw statuses, the trailing-window
//! search loop and its partial-failure behavior, and the cache-first loader.

mod support;

use std::sync::Arc;
use std::time::Duration;

use support::{april, status, FakeTweetSource, FixedScorer};
use tweetick_core::{
    load_text_tweets, read_tweet_table, CoreError, LexiconScorer, Polarity, SourceError,
    SourceErrorKind, TweetCollector, ValidationError,
};

fn collector(source: FakeTweetSource) -> TweetCollector {
    TweetCollector::new(Arc::new(source), Arc::new(LexiconScorer::new()))
        .with_failure_pause(Duration::ZERO)
}

// =============================================================================
// Tweet Collection: User timeline
// =============================================================================

#[tokio::test]
async fn user_tweets_are_normalized_to_utc_date_and_clock() {
    // Given: A timeline with one status posted late in a UTC-5 evening
    let source = FakeTweetSource::default().with_timeline(Ok(vec![
        status(11, "Wed Apr 21 10:00:00 +0000 2021", "$COMP great gains today", 120),
        status(12, "Wed Apr 21 21:30:05 -0500 2021", "COMP dumping, looks like a scam", 40),
    ]));

    // When
    let tweets = collector(source)
        .fetch_user_tweets("compoundfinance", 10)
        .await
        .expect("timeline succeeds");

    // Then: Dates are YYYYMMDD in UTC, clocks HH:MM:SS, each tweet scored
    assert_eq!(tweets.len(), 2);
    assert_eq!(tweets[0].date.value(), 20210421);
    assert_eq!(tweets[0].time, "10:00:00");
    assert_eq!(tweets[0].followers, 120);
    assert_eq!(tweets[0].sentiment, Some(Polarity::Positive));

    assert_eq!(tweets[1].date.value(), 20210422);
    assert_eq!(tweets[1].time, "02:30:05");
    assert_eq!(tweets[1].sentiment, Some(Polarity::Negative));
}

#[tokio::test]
async fn user_timeline_failure_is_returned_to_the_caller() {
    let source = FakeTweetSource::default().with_timeline(Err(SourceError::unauthorized("401")));

    let error = collector(source)
        .fetch_user_tweets("compoundfinance", 10)
        .await
        .expect_err("must fail");

    match error {
        CoreError::Source(source) => assert_eq!(source.kind(), SourceErrorKind::Unauthorized),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_username_and_zero_count_are_rejected_before_fetching() {
    let collector = collector(FakeTweetSource::default());

    let empty = collector.fetch_user_tweets("  ", 10).await.expect_err("empty user");
    let zero = collector.fetch_user_tweets("compound", 0).await.expect_err("zero count");

    assert!(matches!(
        empty,
        CoreError::Validation(ValidationError::EmptyField { field: "username" })
    ));
    assert!(matches!(
        zero,
        CoreError::Validation(ValidationError::ZeroCount { field: "count" })
    ));
}

#[tokio::test]
async fn malformed_created_at_is_reported_with_its_position() {
    let source = FakeTweetSource::default().with_timeline(Ok(vec![
        status(1, "Wed Apr 21 10:00:00 +0000 2021", "ok", 1),
        status(2, "2021-04-21 10:00:00", "iso", 1),
    ]));

    let error = collector(source)
        .fetch_user_tweets("compound", 10)
        .await
        .expect_err("must fail");

    assert!(matches!(error, CoreError::MalformedRecord { index: 1, .. }), "{error:?}");
}

// =============================================================================
// Tweet Collection: Trailing-window text search
// =============================================================================

#[tokio::test]
async fn text_search_queries_each_day_of_the_eight_day_window() {
    // Given: A source with nothing scripted
    let source = Arc::new(FakeTweetSource::default());
    let collector = TweetCollector::new(source.clone(), Arc::new(FixedScorer(Polarity::Neutral)))
        .with_failure_pause(Duration::ZERO);

    // When: Searching from 2021-04-25
    collector
        .fetch_text_search_from("$COMP", 50, april(25))
        .await
        .expect("search runs");

    // Then: One call per day offset 0..=7, newest first, same query and count
    let calls = source.search_calls();
    let days = calls.iter().map(|(_, until, _)| until.day()).collect::<Vec<_>>();
    assert_eq!(days, vec![25, 24, 23, 22, 21, 20, 19, 18]);
    assert!(calls.iter().all(|(query, _, count)| query == "$COMP" && *count == 50));
}

#[tokio::test]
async fn a_failed_day_does_not_abort_the_other_days() {
    // Given: Day 24 is rate limited, days 25 and 23 return tweets
    let source = FakeTweetSource::default()
        .with_search_day(
            april(25),
            Ok(vec![status(3, "Sat Apr 24 18:00:00 +0000 2021", "bullish", 10)]),
        )
        .with_search_day(april(24), Err(SourceError::rate_limited("429")))
        .with_search_day(
            april(23),
            Ok(vec![status(1, "Thu Apr 22 08:00:00 +0000 2021", "bearish", 5)]),
        );

    // When
    let harvest = collector(source)
        .fetch_text_search_from("$COMP", 100, april(25))
        .await
        .expect("search runs");

    // Then: Tweets from healthy days are kept and the failure is recorded
    assert_eq!(harvest.tweets.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 1]);
    assert_eq!(harvest.failures.len(), 1);
    assert_eq!(harvest.failures[0].until, april(24));
    assert_eq!(harvest.failures[0].error.kind(), SourceErrorKind::RateLimited);
}

#[tokio::test]
async fn a_day_with_an_unparseable_status_fails_alone() {
    // Given: Day 24 returns a status whose created_at cannot be parsed
    let source = FakeTweetSource::default()
        .with_search_day(
            april(25),
            Ok(vec![status(3, "Sat Apr 24 18:00:00 +0000 2021", "bullish", 10)]),
        )
        .with_search_day(
            april(24),
            Ok(vec![
                status(2, "Fri Apr 23 09:00:00 +0000 2021", "fine", 4),
                status(42, "garbage", "broken", 4),
            ]),
        )
        .with_search_day(
            april(23),
            Ok(vec![status(1, "Thu Apr 22 08:00:00 +0000 2021", "bearish", 5)]),
        );

    // When
    let harvest = collector(source)
        .fetch_text_search_from("$COMP", 100, april(25))
        .await
        .expect("search runs");

    // Then: The other days are kept and the failure names the day and status
    assert_eq!(harvest.tweets.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 1]);
    assert_eq!(harvest.failures.len(), 1);
    let failure = &harvest.failures[0];
    assert_eq!(failure.until, april(24));
    assert_eq!(failure.error.kind(), SourceErrorKind::Internal);
    assert!(failure.error.message().contains("status 42"), "{}", failure.error);
    assert!(failure.error.message().contains("2021-04-24"), "{}", failure.error);
}

#[tokio::test]
async fn tweets_returned_for_several_days_are_kept_once() {
    let overlapping = status(7, "Tue Apr 20 12:00:00 +0000 2021", "gm", 1);
    let source = FakeTweetSource::default()
        .with_search_day(april(25), Ok(vec![overlapping.clone()]))
        .with_search_day(april(24), Ok(vec![overlapping]));

    let harvest = collector(source)
        .fetch_text_search_from("$COMP", 100, april(25))
        .await
        .expect("search runs");

    assert_eq!(harvest.tweets.len(), 1);
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let error = collector(FakeTweetSource::default())
        .fetch_text_search_from(" ", 10, april(25))
        .await
        .expect_err("must fail");

    assert!(matches!(
        error,
        CoreError::Validation(ValidationError::EmptyField { field: "query" })
    ));
}

#[tokio::test]
async fn failed_days_pause_before_continuing() {
    // Given: Every day fails and the pause is 20ms
    let mut source = FakeTweetSource::default();
    for day in 18..=25 {
        source = source.with_search_day(april(day), Err(SourceError::unavailable("down")));
    }
    let collector = TweetCollector::new(Arc::new(source), Arc::new(FixedScorer(Polarity::Neutral)))
        .with_failure_pause(Duration::from_millis(20));

    // When
    let started = std::time::Instant::now();
    let harvest = collector
        .fetch_text_search_from("$COMP", 10, april(25))
        .await
        .expect("search runs");

    // Then: All eight failures are recorded and each one paused
    assert_eq!(harvest.failures.len(), 8);
    assert!(harvest.tweets.is_empty());
    assert!(started.elapsed() >= Duration::from_millis(160));
}

// =============================================================================
// Tweet table cache
// =============================================================================

#[tokio::test]
async fn text_tweets_are_fetched_once_then_served_from_the_csv_cache() {
    // Given: A source returning one tweet per queried day and no cache yet
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("COMP_tweets100.csv");
    let today = time::OffsetDateTime::now_utc().date();
    let created_at = "Wed Apr 21 10:00:00 +0000 2021";
    let source = FakeTweetSource::default()
        .with_search_day(today, Ok(vec![status(5, created_at, "great", 9)]));
    let collector = collector(source);

    // When: Loaded twice
    let first = load_text_tweets(&collector, &path, 100, "$COMP")
        .await
        .expect("fetch succeeds");
    let second = load_text_tweets(&collector, &path, 100, "$COMP")
        .await
        .expect("cache read succeeds");

    // Then: The first call fetched and wrote the CSV, the second read it back
    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.tweets, second.tweets);
    assert_eq!(read_tweet_table(&path).expect("readable").len(), 1);
}

#[tokio::test]
async fn a_search_that_fails_every_day_is_not_cached() {
    // Given: Every day of the window is rejected with 401
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("COMP_tweets100.csv");
    let today = time::OffsetDateTime::now_utc().date();
    let mut source = FakeTweetSource::default();
    for offset in 0..=8 {
        let until = today - time::Duration::days(offset);
        source = source.with_search_day(until, Err(SourceError::unauthorized("401")));
    }
    let collector = collector(source);

    // When: Loaded twice
    let first = load_text_tweets(&collector, &path, 100, "$COMP")
        .await
        .expect_err("nothing harvested");
    let second = load_text_tweets(&collector, &path, 100, "$COMP")
        .await
        .expect_err("searches again");

    // Then: No cache file exists and both calls report the failed search
    assert!(!path.exists());
    for error in [first, second] {
        match error {
            CoreError::SearchFailed { days, last } => {
                assert_eq!(days, 8);
                assert_eq!(last.kind(), SourceErrorKind::Unauthorized);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[tokio::test]
async fn cached_tables_written_by_other_tools_are_accepted() {
    // Given: A table with float-spelled sentiment and an empty label
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tweets.csv");
    std::fs::write(
        &path,
        ",date,time,id,followers,tweet,sentiment\n\
         0,20210421,10:00:00,1385000000000000001,120,\"COMP, to the moon\",1.0\n\
         1,20210421,11:00:00,1385000000000000002,3,gm,\n",
    )
    .expect("write");

    // When
    let tweets = read_tweet_table(&path).expect("valid table");

    // Then
    assert_eq!(tweets.len(), 2);
    assert_eq!(tweets[0].id, 1_385_000_000_000_000_001);
    assert_eq!(tweets[0].text, "COMP, to the moon");
    assert_eq!(tweets[0].sentiment, Some(Polarity::Positive));
    assert_eq!(tweets[1].sentiment, None);
}
