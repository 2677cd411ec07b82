use serde::Serialize;

use crate::cli::PricesArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

#[derive(Debug, Serialize)]
struct PricesResponseData {
    cache: String,
    from_cache: bool,
    records: usize,
    rows: Vec<DayRow>,
}

#[derive(Debug, Serialize)]
struct DayRow {
    day: u8,
    year: i32,
    month: String,
    samples: usize,
    first_hour: Option<u8>,
    last_hour: Option<u8>,
    low: Option<f64>,
    high: Option<f64>,
}

pub async fn run(context: &Context<'_>, args: &PricesArgs) -> Result<CommandResult, CliError> {
    let (load, cache_path) = context.load_prices(&args.price).await?;

    let rows = load
        .buckets
        .iter()
        .map(|(&day, bucket)| DayRow {
            day,
            year: bucket.year(),
            month: bucket.month().as_str().to_owned(),
            samples: bucket.len(),
            first_hour: bucket.hours().first().copied(),
            last_hour: bucket.hours().last().copied(),
            low: bucket.prices().iter().copied().reduce(f64::min),
            high: bucket.prices().iter().copied().reduce(f64::max),
        })
        .collect::<Vec<_>>();

    let mut result = CommandResult::ok(serde_json::to_value(PricesResponseData {
        cache: cache_path.display().to_string(),
        from_cache: load.from_cache,
        records: load.records,
        rows,
    })?);
    if load.buckets.is_empty() {
        result = result.with_warning("price history produced no day buckets");
    }

    Ok(result)
}
