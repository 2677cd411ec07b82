//! Behavior-driven tests for aligning day buckets with tweet tables.

use tweetick_core::{
    align, bucket_by_day, DayBuckets, DayRange, Polarity, PricePoint, TweetDate, TweetRecord,
};

fn buckets(rows: &[(&str, f64)]) -> DayBuckets {
    let points = rows
        .iter()
        .map(|(timestamp, price)| PricePoint::parse(timestamp, *price).expect("valid point"))
        .collect::<Vec<_>>();
    bucket_by_day(&points, DayRange::Inclusive)
}

fn tweet(date: u32, id: u64, followers: u64, sentiment: Option<i64>) -> TweetRecord {
    TweetRecord::new(
        TweetDate::new(date).expect("valid date"),
        "12:00:00",
        id,
        followers,
        "text",
        sentiment.map(|value| Polarity::from_value(value).expect("valid label")),
    )
    .expect("valid tweet")
}

// =============================================================================
// Alignment: Matching by comparison date
// =============================================================================

#[test]
fn when_three_tweets_share_a_day_counts_reach_and_sentiment_are_aggregated() {
    // Given: A bucket for 2021-04-05 and three tweets on that date
    let buckets = buckets(&[("2021-04-05T10:00:00", 100.0)]);
    let tweets = vec![
        tweet(20210405, 1, 10, Some(1)),
        tweet(20210405, 2, 20, Some(-1)),
        tweet(20210405, 3, 30, Some(0)),
    ];

    // When: The series are aligned with sentiment
    let alignment = align(&buckets, &tweets, true);

    // Then: All three count, reach sums, and the neutral label is ignored
    let day = alignment.day(5).expect("day 5 present");
    assert_eq!(day.comparison_date, 20210405);
    assert_eq!(day.tweet_count, 3);
    assert_eq!(day.total_reach, 60);
    assert_eq!(day.mean_sentiment, Some(0.0));
    assert_eq!(day.tweet_ids, vec![1, 2, 3]);
}

#[test]
fn when_no_tweet_matches_a_day_everything_is_zero() {
    // Given: A bucket for April 6th and tweets only on April 5th
    let buckets = buckets(&[("2021-04-06T10:00:00", 100.0)]);
    let tweets = vec![tweet(20210405, 1, 10, Some(1))];

    // When
    let alignment = align(&buckets, &tweets, true);

    // Then: The empty sentiment set is explicit, and defaults to zero
    let day = alignment.day(6).expect("day 6 present");
    assert_eq!(day.tweet_count, 0);
    assert_eq!(day.total_reach, 0);
    assert_eq!(day.mean_sentiment, None);
    assert_eq!(day.sentiment_or_zero(), 0.0);
    assert_eq!(alignment.mean_sentiment().expect("requested")[&6], 0.0);
}

#[test]
fn tweets_from_another_month_with_the_same_day_do_not_match() {
    let buckets = buckets(&[("2021-04-05T10:00:00", 100.0)]);
    let tweets = vec![tweet(20210305, 1, 10, None), tweet(20200405, 2, 10, None)];

    let alignment = align(&buckets, &tweets, false);

    assert_eq!(alignment.tweet_counts()[&5], 0);
}

#[test]
fn each_day_counts_exactly_the_rows_with_its_date() {
    // Given: Three days and tweets spread over them
    let buckets = buckets(&[
        ("2021-04-03T01:00:00", 1.0),
        ("2021-04-04T01:00:00", 2.0),
        ("2021-04-05T01:00:00", 3.0),
    ]);
    let tweets = vec![
        tweet(20210403, 1, 5, Some(1)),
        tweet(20210405, 2, 7, Some(-1)),
        tweet(20210405, 3, 11, Some(-1)),
        tweet(20210405, 4, 13, Some(1)),
    ];

    // When
    let alignment = align(&buckets, &tweets, true);

    // Then: The three parallel mappings agree on the same row subsets
    let counts = alignment.tweet_counts();
    let reach = alignment.total_reach();
    let sentiment = alignment.mean_sentiment().expect("requested");
    assert_eq!(counts.values().copied().collect::<Vec<_>>(), vec![1, 0, 3]);
    assert_eq!(reach.values().copied().collect::<Vec<_>>(), vec![5, 0, 31]);
    assert_eq!(sentiment[&3], 1.0);
    assert_eq!(sentiment[&4], 0.0);
    assert_eq!(sentiment[&5], -0.33);
}

// =============================================================================
// Alignment: Sentiment options
// =============================================================================

#[test]
fn when_sentiment_is_not_requested_no_mean_is_reported() {
    let buckets = buckets(&[("2021-04-05T10:00:00", 100.0)]);
    let tweets = vec![tweet(20210405, 1, 10, Some(1))];

    let alignment = align(&buckets, &tweets, false);

    assert!(!alignment.sentiment_included());
    assert!(alignment.mean_sentiment().is_none());
    assert_eq!(alignment.day(5).expect("present").mean_sentiment, None);
}

#[test]
fn unlabelled_tweets_add_volume_and_reach_but_not_sentiment() {
    let buckets = buckets(&[("2021-04-05T10:00:00", 100.0)]);
    let tweets = vec![tweet(20210405, 1, 10, None), tweet(20210405, 2, 5, Some(-1))];

    let alignment = align(&buckets, &tweets, true);

    let day = alignment.day(5).expect("present");
    assert_eq!(day.tweet_count, 2);
    assert_eq!(day.total_reach, 15);
    assert_eq!(day.mean_sentiment, Some(-1.0));
}

#[test]
fn alignment_is_pure_and_repeatable() {
    // Given
    let buckets = buckets(&[("2021-04-05T10:00:00", 100.0), ("2021-04-05T02:00:00", 90.0)]);
    let before = buckets.clone();
    let tweets = vec![tweet(20210405, 1, 10, Some(1))];

    // When: Aligned twice
    let first = align(&buckets, &tweets, true);
    let second = align(&buckets, &tweets, true);

    // Then: Same output, untouched input
    assert_eq!(first, second);
    assert_eq!(buckets, before);
}
