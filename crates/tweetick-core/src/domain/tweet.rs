use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::ValidationError;

/// Discrete sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum Polarity {
    Negative,
    Neutral,
    Positive,
}

impl Polarity {
    pub const fn value(self) -> i8 {
        match self {
            Self::Negative => -1,
            Self::Neutral => 0,
            Self::Positive => 1,
        }
    }

    pub fn from_value(value: i64) -> Result<Self, ValidationError> {
        match value {
            -1 => Ok(Self::Negative),
            0 => Ok(Self::Neutral),
            1 => Ok(Self::Positive),
            other => Err(ValidationError::InvalidPolarity {
                value: other.to_string(),
            }),
        }
    }

    /// Maps a continuous score onto its sign.
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Self::Positive
        } else if score < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }
}

impl TryFrom<i8> for Polarity {
    type Error = ValidationError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        Self::from_value(i64::from(value))
    }
}

impl From<Polarity> for i8 {
    fn from(value: Polarity) -> Self {
        value.value()
    }
}

/// Calendar date packed as the integer `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TweetDate(u32);

impl TweetDate {
    pub fn new(value: u32) -> Result<Self, ValidationError> {
        let year = (value / 10_000) as i32;
        let month = ((value / 100) % 100) as u8;
        let day = (value % 100) as u8;
        Self::from_ymd(year, month, day).map_err(|_| ValidationError::InvalidTweetDate {
            value: value.to_string(),
        })
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidTweetDate {
            value: format!("{year:04}{month:02}{day:02}"),
        };
        if !(1000..=9999).contains(&year) {
            return Err(invalid());
        }
        let month_value = Month::try_from(month).map_err(|_| invalid())?;
        let date = Date::from_calendar_date(year, month_value, day).map_err(|_| invalid())?;
        Ok(Self::from_date(date))
    }

    pub fn from_date(date: Date) -> Self {
        let packed = date.year() as u32 * 10_000 + u32::from(u8::from(date.month())) * 100
            + u32::from(date.day());
        Self(packed)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Display for TweetDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for TweetDate {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TweetDate> for u32 {
    fn from(value: TweetDate) -> Self {
        value.0
    }
}

/// One normalized tweet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetRecord {
    pub date: TweetDate,
    pub time: String,
    pub id: u64,
    pub followers: u64,
    pub text: String,
    pub sentiment: Option<Polarity>,
}

impl TweetRecord {
    pub fn new(
        date: TweetDate,
        time: impl Into<String>,
        id: u64,
        followers: u64,
        text: impl Into<String>,
        sentiment: Option<Polarity>,
    ) -> Result<Self, ValidationError> {
        let time = time.into();
        validate_clock(&time)?;

        Ok(Self {
            date,
            time,
            id,
            followers,
            text: text.into(),
            sentiment,
        })
    }
}

fn validate_clock(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidTweetTime {
        value: value.to_owned(),
    };

    let parts = value.split(':').collect::<Vec<_>>();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let limits = [23u8, 59, 59];
    for (part, limit) in parts.iter().zip(limits) {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        match part.parse::<u8>() {
            Ok(n) if n <= limit => {}
            _ => return Err(invalid()),
        }
    }

    Ok(())
}
