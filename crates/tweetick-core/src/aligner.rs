//! Joins day buckets with tweet rows on the calendar date.
//!
//! Each bucket contributes a comparison date `YYYYMMDD` built from its year,
//! month token and day key. A tweet belongs to a day when its `date` equals
//! that integer exactly. Per day the aligner reports the matched count, the
//! summed follower reach and, on request, the mean of the non-neutral
//! sentiment labels.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{DayBuckets, Polarity, TweetRecord};

/// Aggregates for one day-of-month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAggregate {
    pub comparison_date: u32,
    pub tweet_count: u64,
    pub total_reach: u64,
    /// Mean of the non-neutral labels, rounded to 2 decimals.
    ///
    /// `None` when sentiment was not requested or when every matching tweet
    /// was neutral or unlabelled.
    pub mean_sentiment: Option<f64>,
    pub tweet_ids: Vec<u64>,
}

impl DayAggregate {
    /// Mean sentiment with the empty-set default of `0.0`.
    pub fn sentiment_or_zero(&self) -> f64 {
        self.mean_sentiment.unwrap_or(0.0)
    }
}

/// Per-day aggregates produced by [`align`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    days: BTreeMap<u8, DayAggregate>,
    sentiment_included: bool,
}

impl Alignment {
    pub fn day(&self, day: u8) -> Option<&DayAggregate> {
        self.days.get(&day)
    }

    pub fn days(&self) -> &BTreeMap<u8, DayAggregate> {
        &self.days
    }

    pub const fn sentiment_included(&self) -> bool {
        self.sentiment_included
    }

    pub fn tweet_counts(&self) -> BTreeMap<u8, u64> {
        self.days
            .iter()
            .map(|(&day, aggregate)| (day, aggregate.tweet_count))
            .collect()
    }

    pub fn total_reach(&self) -> BTreeMap<u8, u64> {
        self.days
            .iter()
            .map(|(&day, aggregate)| (day, aggregate.total_reach))
            .collect()
    }

    /// Zero-defaulted mean sentiment per day, or `None` if it was not requested.
    pub fn mean_sentiment(&self) -> Option<BTreeMap<u8, f64>> {
        self.sentiment_included.then(|| {
            self.days
                .iter()
                .map(|(&day, aggregate)| (day, aggregate.sentiment_or_zero()))
                .collect()
        })
    }
}

/// Computes per-day aggregates for every bucket key.
///
/// Buckets and tweets are only read; a fresh [`Alignment`] is returned on each
/// call. Unlabelled tweets count towards volume and reach but never towards
/// the sentiment mean.
pub fn align(buckets: &DayBuckets, tweets: &[TweetRecord], include_sentiment: bool) -> Alignment {
    let days = buckets
        .iter()
        .map(|(&day, bucket)| {
            let comparison_date = bucket.comparison_date(day);
            let matched = tweets
                .iter()
                .filter(|tweet| tweet.date.value() == comparison_date)
                .collect::<Vec<_>>();

            let mean_sentiment = if include_sentiment {
                non_neutral_mean(matched.iter().filter_map(|tweet| tweet.sentiment))
            } else {
                None
            };

            let aggregate = DayAggregate {
                comparison_date,
                tweet_count: matched.len() as u64,
                total_reach: matched.iter().map(|tweet| tweet.followers).sum(),
                mean_sentiment,
                tweet_ids: matched.iter().map(|tweet| tweet.id).collect(),
            };
            (day, aggregate)
        })
        .collect();

    Alignment {
        days,
        sentiment_included: include_sentiment,
    }
}

/// Mean of the non-neutral labels rounded to 2 decimals, `None` if there are none.
pub fn non_neutral_mean(labels: impl IntoIterator<Item = Polarity>) -> Option<f64> {
    let (sum, count) = labels
        .into_iter()
        .filter(|label| !label.is_neutral())
        .fold((0i64, 0u64), |(sum, count), label| {
            (sum + i64::from(label.value()), count + 1)
        });

    (count > 0).then(|| round2(sum as f64 / count as f64))
}

/// Rounds to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
