use std::collections::BTreeMap;

use serde::Serialize;

use super::{MonthToken, PricePoint};

/// Day buckets keyed by day-of-month, iterated in ascending day order.
pub type DayBuckets = BTreeMap<u8, DayBucket>;

/// Price series for one day-of-month.
///
/// `hours` and `prices` always have the same length and are co-sorted by hour
/// ascending; samples sharing an hour keep their input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    year: i32,
    month: MonthToken,
    hours: Vec<u8>,
    prices: Vec<f64>,
}

impl DayBucket {
    /// Builds a bucket from the samples of a single day, in input order.
    ///
    /// Year and month are taken from the first sample. Returns `None` when
    /// `samples` is empty.
    pub fn from_samples(samples: &[&PricePoint]) -> Option<Self> {
        let first = samples.first()?;

        let mut ordered = samples.to_vec();
        ordered.sort_by_key(|point| point.hour);

        Some(Self {
            year: first.year,
            month: first.month.clone(),
            hours: ordered.iter().map(|point| point.hour).collect(),
            prices: ordered.iter().map(|point| point.price).collect(),
        })
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> &MonthToken {
        &self.month
    }

    pub fn hours(&self) -> &[u8] {
        &self.hours
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Integer `YYYYMMDD` used to join tweets to this bucket.
    ///
    /// Computed arithmetically rather than through [`TweetDate`](super::TweetDate) so that a day
    /// the calendar rejects still yields a key; it simply never matches.
    pub fn comparison_date(&self, day: u8) -> u32 {
        self.year as u32 * 10_000 + u32::from(self.month.number()) * 100 + u32::from(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(hour: u8, price: f64) -> PricePoint {
        PricePoint::parse(&format!("2021-04-05T{hour:02}:00:00"), price).expect("valid")
    }

    #[test]
    fn sorts_hours_and_carries_prices() {
        let a = point(10, 100.0);
        let b = point(2, 90.0);
        let bucket = DayBucket::from_samples(&[&a, &b]).expect("non-empty");

        assert_eq!(bucket.hours(), &[2, 10]);
        assert_eq!(bucket.prices(), &[90.0, 100.0]);
    }

    #[test]
    fn equal_hours_keep_input_order() {
        let a = point(4, 1.0);
        let b = point(4, 2.0);
        let c = point(1, 3.0);
        let bucket = DayBucket::from_samples(&[&a, &b, &c]).expect("non-empty");

        assert_eq!(bucket.prices(), &[3.0, 1.0, 2.0]);
    }

    #[test]
    fn comparison_date_zero_pads_day() {
        let a = point(0, 1.0);
        let bucket = DayBucket::from_samples(&[&a]).expect("non-empty");
        assert_eq!(bucket.comparison_date(5), 20210405);
    }

    #[test]
    fn empty_samples_yield_no_bucket() {
        assert!(DayBucket::from_samples(&[]).is_none());
    }
}
