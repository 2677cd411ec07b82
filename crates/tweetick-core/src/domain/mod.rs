//! # Domain Models
//!
//! Typed records for the two series being correlated.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`BlockHour`] | Parsed `YYYY-MM-DDTHH` price timestamp |
//! | [`MonthToken`] | Two-digit month kept as text, as the price feed reports it |
//! | [`PricePoint`] | One hourly price sample |
//! | [`DayBucket`] | All samples of one day-of-month, co-sorted by hour |
//! | [`TweetDate`] | Compact `YYYYMMDD` calendar date used as the join key |
//! | [`TweetRecord`] | One normalized tweet row |
//! | [`Polarity`] | Discrete sentiment label in {-1, 0, 1} |
//!
//! Every constructor validates its input, so values that reach the aligner are
//! already well formed.

mod bucket;
mod price;
mod tweet;

pub use bucket::{DayBucket, DayBuckets};
pub use price::{BlockHour, MonthToken, PricePoint};
pub use tweet::{Polarity, TweetDate, TweetRecord};
