use std::fmt::{Display, Formatter};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Month as the two-character token found in the price feed (`"04"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthToken(String);

impl MonthToken {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidMonthToken {
            value: input.to_owned(),
        };

        if input.len() != 2 || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        match input.parse::<u8>() {
            Ok(1..=12) => Ok(Self(input.to_owned())),
            _ => Err(invalid()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric month, 1 to 12.
    pub fn number(&self) -> u8 {
        // Validated at construction.
        self.0.parse().unwrap_or_default()
    }
}

impl Display for MonthToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for MonthToken {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MonthToken> for String {
    fn from(value: MonthToken) -> Self {
        value.0
    }
}

/// Calendar fields sliced out of a `YYYY-MM-DDTHH:mm:ss...` timestamp.
///
/// Only the fixed character positions are inspected: year `[0..4]`, month
/// `[5..7]`, day `[8..10]` and hour `[11..13]`. Anything after the hour is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHour {
    pub year: i32,
    pub month: MonthToken,
    pub day: u8,
    pub hour: u8,
}

impl BlockHour {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let year = digits(input, 0..4, "year out of range", "year is not numeric")?;
        let month = input
            .get(5..7)
            .ok_or_else(|| invalid_timestamp(input, "month out of range"))?;
        let month = MonthToken::parse(month)
            .map_err(|_| invalid_timestamp(input, "month must be 01-12"))?;
        let day = digits(input, 8..10, "day out of range", "day is not numeric")?;
        let hour = digits(input, 11..13, "hour out of range", "hour is not numeric")?;

        if !(1..=31).contains(&day) {
            return Err(invalid_timestamp(input, "day must be 01-31"));
        }
        if hour > 23 {
            return Err(invalid_timestamp(input, "hour must be 00-23"));
        }

        Ok(Self {
            year: year as i32,
            month,
            day: day as u8,
            hour: hour as u8,
        })
    }
}

fn digits(
    input: &str,
    range: Range<usize>,
    missing: &'static str,
    not_numeric: &'static str,
) -> Result<u32, ValidationError> {
    let slice = input
        .get(range)
        .ok_or_else(|| invalid_timestamp(input, missing))?;

    if !slice.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_timestamp(input, not_numeric));
    }

    slice
        .parse::<u32>()
        .map_err(|_| invalid_timestamp(input, "numeric field overflow"))
}

fn invalid_timestamp(input: &str, reason: &'static str) -> ValidationError {
    ValidationError::InvalidTimestamp {
        value: input.to_owned(),
        reason,
    }
}

/// One hourly price sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub year: i32,
    pub month: MonthToken,
    pub day: u8,
    pub hour: u8,
    pub price: f64,
}

impl PricePoint {
    pub fn new(block_hour: BlockHour, price: f64) -> Result<Self, ValidationError> {
        if !price.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "price" });
        }

        Ok(Self {
            year: block_hour.year,
            month: block_hour.month,
            day: block_hour.day,
            hour: block_hour.hour,
            price,
        })
    }

    pub fn parse(timestamp: &str, price: f64) -> Result<Self, ValidationError> {
        Self::new(BlockHour::parse(timestamp)?, price)
    }
}
