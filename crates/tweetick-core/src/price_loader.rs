//! Hourly price history: fetch or load from cache, validate, bucket by day.
//!
//! The loader is cache-first. When the cache file is missing it performs a
//! single GET against the configured URL; the response is validated record by
//! record and only a fully valid dataset is written back to the cache path. A
//! failed fetch never touches the cache.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{DayBucket, DayBuckets, PricePoint};
use crate::http_client::{HttpClient, HttpRequest};
use crate::CoreError;

/// JSON field names used to read each price record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFields {
    pub timestamp: String,
    pub price: String,
}

impl PriceFields {
    pub fn new(timestamp: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            price: price.into(),
        }
    }
}

impl Default for PriceFields {
    fn default() -> Self {
        Self::new("BLOCK_HOUR", "COMP_PRICE")
    }
}

/// Which days between the observed minimum and maximum become buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayRange {
    /// `[min, max]`: every observed day is kept.
    #[default]
    Inclusive,
    /// `[min, max)`: the highest observed day is dropped.
    ExcludeLast,
}

/// Result of a [`PriceLoader::load`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLoad {
    pub buckets: DayBuckets,
    pub records: usize,
    pub from_cache: bool,
}

/// Cache-first loader for hourly price records.
#[derive(Clone)]
pub struct PriceLoader {
    http_client: Arc<dyn HttpClient>,
    fields: PriceFields,
    day_range: DayRange,
    timeout_ms: u64,
}

impl PriceLoader {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            fields: PriceFields::default(),
            day_range: DayRange::default(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_fields(mut self, fields: PriceFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_day_range(mut self, day_range: DayRange) -> Self {
        self.day_range = day_range;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn fields(&self) -> &PriceFields {
        &self.fields
    }

    /// Loads the dataset from `cache_path` if present, otherwise from `url`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::DataUnavailable`] when there is no cache and the fetch
    ///   fails, returns a non-2xx status, or no URL was given.
    /// - [`CoreError::MalformedRecord`] when any record fails validation.
    /// - [`CoreError::Io`] / [`CoreError::Serialization`] for unreadable caches.
    pub async fn load(&self, url: Option<&str>, cache_path: &Path) -> Result<PriceLoad, CoreError> {
        if cache_path.exists() {
            info!(path = %cache_path.display(), "loading price history from cache");
            let raw = std::fs::read_to_string(cache_path)?;
            let values: Vec<Value> = serde_json::from_str(&raw)?;
            let points = parse_price_records(&values, &self.fields)?;
            return Ok(PriceLoad {
                buckets: bucket_by_day(&points, self.day_range),
                records: points.len(),
                from_cache: true,
            });
        }

        let url = url.ok_or_else(|| {
            CoreError::unavailable(
                "<none>",
                format!(
                    "no cache at {} and no price URL configured",
                    cache_path.display()
                ),
            )
        })?;

        let values = self.fetch(url).await?;
        let points = parse_price_records(&values, &self.fields)?;

        write_cache(cache_path, &values)?;
        info!(
            path = %cache_path.display(),
            records = values.len(),
            "cached fresh price history"
        );

        Ok(PriceLoad {
            buckets: bucket_by_day(&points, self.day_range),
            records: points.len(),
            from_cache: false,
        })
    }

    /// Performs one GET and returns the raw JSON array.
    pub async fn fetch(&self, url: &str) -> Result<Vec<Value>, CoreError> {
        debug!(%url, "fetching price history");
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(%url, error = %error, "price fetch failed");
            CoreError::unavailable(url, format!("transport error: {}", error.message()))
        })?;

        if !response.is_success() {
            warn!(%url, status = response.status, "price API returned an error status");
            return Err(CoreError::unavailable(
                url,
                format!("price API returned status {}", response.status),
            ));
        }

        let body: Value = serde_json::from_str(&response.body).map_err(|error| {
            CoreError::unavailable(url, format!("response is not JSON: {error}"))
        })?;

        match body {
            Value::Array(values) => Ok(values),
            other => Err(CoreError::unavailable(
                url,
                format!("expected a JSON array, got {}", json_kind(&other)),
            )),
        }
    }
}

/// Validates raw JSON records into price points.
///
/// The timestamp field must be a string; the price field may be a JSON number
/// or a numeric string. The first failing record aborts with its index.
pub fn parse_price_records(values: &[Value], fields: &PriceFields) -> Result<Vec<PricePoint>, CoreError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| parse_price_record(index, value, fields))
        .collect()
}

fn parse_price_record(index: usize, value: &Value, fields: &PriceFields) -> Result<PricePoint, CoreError> {
    let object = value
        .as_object()
        .ok_or_else(|| CoreError::malformed(index, format!("expected an object, got {}", json_kind(value))))?;

    let timestamp = object
        .get(&fields.timestamp)
        .ok_or_else(|| CoreError::malformed(index, format!("missing field '{}'", fields.timestamp)))?
        .as_str()
        .ok_or_else(|| CoreError::malformed(index, format!("field '{}' must be a string", fields.timestamp)))?;

    let raw_price = object
        .get(&fields.price)
        .ok_or_else(|| CoreError::malformed(index, format!("missing field '{}'", fields.price)))?;

    let price = match raw_price {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| {
        CoreError::malformed(index, format!("field '{}' is not numeric: {raw_price}", fields.price))
    })?;

    PricePoint::parse(timestamp, price).map_err(|error| CoreError::malformed(index, error.to_string()))
}

/// Groups points by day-of-month over the observed day range.
///
/// Days inside the range without any sample are left out.
pub fn bucket_by_day(points: &[PricePoint], day_range: DayRange) -> DayBuckets {
    let mut by_day: BTreeMap<u8, Vec<&PricePoint>> = BTreeMap::new();
    for point in points {
        by_day.entry(point.day).or_default().push(point);
    }

    let (Some(&min), Some(&max)) = (by_day.keys().next(), by_day.keys().next_back()) else {
        return DayBuckets::new();
    };

    let upper = match day_range {
        DayRange::Inclusive => max,
        DayRange::ExcludeLast => {
            if max == min {
                return DayBuckets::new();
            }
            max - 1
        }
    };

    by_day
        .range(min..=upper)
        .filter_map(|(&day, samples)| DayBucket::from_samples(samples).map(|bucket| (day, bucket)))
        .collect()
}

fn write_cache(path: &Path, values: &[Value]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, serde_json::to_string(values)?)?;
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
