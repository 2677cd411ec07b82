use serde::Serialize;
use tracing::info;
use tweetick_core::{align, read_tweet_table, ChartMetric, ChartOptions, ComparisonChart, TweetRecord};

use crate::cli::CorrelateArgs;
use crate::error::CliError;

use super::{failure_warnings, CommandResult, Context};

const DEFAULT_USER_COUNT: usize = 10;
const DEFAULT_SEARCH_COUNT: usize = 1000;

#[derive(Debug, Serialize)]
struct CorrelateResponseData {
    metric: ChartMetric,
    tweet_source: String,
    tweets: usize,
    price_records: usize,
    prices_from_cache: bool,
    tweets_from_cache: bool,
    chart: Option<String>,
    rows: Vec<DayRow>,
}

#[derive(Debug, Serialize)]
struct DayRow {
    day: u8,
    date: u32,
    price_samples: usize,
    tweet_count: u64,
    total_reach: u64,
    mean_sentiment: Option<f64>,
}

struct TweetInput {
    label: String,
    tweets: Vec<TweetRecord>,
    from_cache: bool,
    warnings: Vec<String>,
}

pub async fn run(context: &Context<'_>, args: &CorrelateArgs) -> Result<CommandResult, CliError> {
    let metric = ChartMetric::from(args.metric);
    let include_sentiment = args.sentiment || metric == ChartMetric::Sentiment;

    let (prices, _) = context.load_prices(&args.price).await?;
    let input = load_tweets(context, args).await?;

    let alignment = align(&prices.buckets, &input.tweets, include_sentiment);
    let mut warnings = input.warnings;

    let matched = alignment
        .days()
        .values()
        .map(|aggregate| aggregate.tweet_count)
        .sum::<u64>();
    let outside = input.tweets.len() as u64 - matched.min(input.tweets.len() as u64);
    if outside > 0 {
        warnings.push(format!("{outside} tweets fall outside the price window"));
    }

    let chart = match &args.chart {
        Some(path) => {
            let options = ChartOptions {
                skip_first_day: !args.keep_first_day,
                token: context.cli.token.to_ascii_uppercase(),
                subject: input.label.clone(),
            };
            ComparisonChart::build(&prices.buckets, &alignment, metric, &options)?.write_svg(path)?;
            info!(path = %path.display(), "wrote comparison chart");
            Some(path.display().to_string())
        }
        None => None,
    };

    let rows = alignment
        .days()
        .iter()
        .map(|(&day, aggregate)| DayRow {
            day,
            date: aggregate.comparison_date,
            price_samples: prices.buckets.get(&day).map_or(0, |bucket| bucket.len()),
            tweet_count: aggregate.tweet_count,
            total_reach: aggregate.total_reach,
            mean_sentiment: include_sentiment.then(|| aggregate.sentiment_or_zero()),
        })
        .collect();

    let data = serde_json::to_value(CorrelateResponseData {
        metric,
        tweet_source: input.label,
        tweets: input.tweets.len(),
        price_records: prices.records,
        prices_from_cache: prices.from_cache,
        tweets_from_cache: input.from_cache,
        chart,
        rows,
    })?;

    Ok(CommandResult::ok(data).with_warnings(warnings))
}

async fn load_tweets(context: &Context<'_>, args: &CorrelateArgs) -> Result<TweetInput, CliError> {
    let source = &args.tweets;

    if let Some(user) = &source.user {
        let user = user.trim().trim_start_matches('@');
        let count = args.count.unwrap_or(DEFAULT_USER_COUNT);
        let tweets = context.collector()?.fetch_user_tweets(user, count).await?;
        return Ok(TweetInput {
            label: user.to_owned(),
            tweets,
            from_cache: false,
            warnings: Vec::new(),
        });
    }

    if let Some(query) = &source.query {
        let count = args.count.unwrap_or(DEFAULT_SEARCH_COUNT);
        let (loaded, _) = context
            .search_tweets(query, count, args.tweet_cache.clone())
            .await?;
        return Ok(TweetInput {
            label: query.clone(),
            warnings: failure_warnings(&loaded),
            from_cache: loaded.from_cache,
            tweets: loaded.tweets,
        });
    }

    if let Some(path) = &source.tweets_csv {
        return Ok(TweetInput {
            label: context.cli.token.to_ascii_uppercase(),
            tweets: read_tweet_table(path)?,
            from_cache: true,
            warnings: Vec::new(),
        });
    }

    Err(CliError::Usage(String::from(
        "one of --user, --query or --tweets-csv is required",
    )))
}
