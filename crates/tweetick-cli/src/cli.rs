//! CLI argument definitions for tweetick.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `prices` | Load hourly prices and show the day buckets |
//! | `tweets user` | Fetch an account's most recent tweets |
//! | `tweets search` | Search tweets over the trailing 8-day window |
//! | `correlate` | Align prices with tweets and optionally chart them |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--timeout-ms` | `10000` | Per-request timeout in ms |
//! | `--data-dir` | `data` | Directory for default cache files |
//! | `--token` | `COMP` | Token symbol used for cache names and chart titles |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! # Examples
//!
//! ```bash
//! tweetick prices --price-url "$PRICE_URL"
//! tweetick tweets search '$COMP' --count 500
//! tweetick correlate --query '$COMP' --metric sentiment --chart out/comp.svg
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tweetick_core::ChartMetric;

/// Correlate a token's price history with Twitter activity.
#[derive(Debug, Parser)]
#[command(
    name = "tweetick",
    author,
    version,
    about = "Correlate token prices with Twitter volume, reach and sentiment"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Directory holding price and tweet caches.
    #[arg(long, global = true, default_value = "data")]
    pub data_dir: PathBuf,

    /// Token symbol, e.g. COMP.
    #[arg(long, global = true, default_value = "COMP")]
    pub token: String,

    /// Log at debug level (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON object.
    Json,
    /// Human-readable table.
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load hourly prices (cache first) and print the day buckets.
    Prices(PricesArgs),

    /// Fetch tweets from Twitter.
    Tweets(TweetsArgs),

    /// Align prices with tweets per day and optionally write a chart.
    ///
    /// # Examples
    ///
    ///   tweetick correlate --user compoundfinance --count 200
    ///   tweetick correlate --tweets-csv data/COMP_tweets1000.csv --metric reach --chart comp.svg
    Correlate(CorrelateArgs),
}

/// Where price history comes from.
#[derive(Debug, Clone, Args)]
pub struct PriceSourceArgs {
    /// Price API URL, used only when the cache file is missing.
    #[arg(long, env = "TWEETICK_PRICE_URL")]
    pub price_url: Option<String>,

    /// Price cache file [default: <data-dir>/<token>_prices.json].
    #[arg(long)]
    pub price_cache: Option<PathBuf>,

    /// JSON field holding the `YYYY-MM-DDTHH...` timestamp.
    #[arg(long, default_value = "BLOCK_HOUR")]
    pub timestamp_field: String,

    /// JSON field holding the price.
    #[arg(long, default_value = "COMP_PRICE")]
    pub price_field: String,

    /// Drop the highest observed day from the buckets.
    #[arg(long, default_value_t = false)]
    pub exclude_last_day: bool,
}

#[derive(Debug, Args)]
pub struct PricesArgs {
    #[command(flatten)]
    pub price: PriceSourceArgs,
}

#[derive(Debug, Args)]
pub struct TweetsArgs {
    #[command(subcommand)]
    pub command: TweetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TweetsCommand {
    /// Most recent tweets of one account.
    User(UserTweetsArgs),

    /// Text search over the trailing 8 days (cache first).
    Search(SearchTweetsArgs),
}

#[derive(Debug, Args)]
pub struct UserTweetsArgs {
    /// Screen name, without the leading @.
    pub user: String,

    #[arg(long, default_value_t = 10)]
    pub count: usize,

    /// Also write the tweets to this CSV file.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SearchTweetsArgs {
    /// Search query, e.g. '$COMP'.
    pub query: String,

    /// Tweets requested per day of the window.
    #[arg(long, default_value_t = 1000)]
    pub count: usize,

    /// Tweet cache file [default: <data-dir>/<TOKEN>_tweets<count>.csv].
    #[arg(long)]
    pub cache: Option<PathBuf>,
}

/// Exactly one tweet source for `correlate`.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct TweetInputArgs {
    /// Use the most recent tweets of this account.
    #[arg(long)]
    pub user: Option<String>,

    /// Use a cached or fresh text search for this query.
    #[arg(long)]
    pub query: Option<String>,

    /// Use an existing tweet CSV.
    #[arg(long)]
    pub tweets_csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CorrelateArgs {
    #[command(flatten)]
    pub price: PriceSourceArgs,

    #[command(flatten)]
    pub tweets: TweetInputArgs,

    /// Tweets to fetch [default: 10 for --user, 1000 for --query].
    #[arg(long)]
    pub count: Option<usize>,

    /// Tweet cache file for --query [default: <data-dir>/<TOKEN>_tweets<count>.csv].
    #[arg(long)]
    pub tweet_cache: Option<PathBuf>,

    /// Aggregate drawn as bars.
    #[arg(long, value_enum, default_value_t = MetricArg::Count)]
    pub metric: MetricArg,

    /// Compute mean sentiment even when the metric does not need it.
    #[arg(long, default_value_t = false)]
    pub sentiment: bool,

    /// Write the comparison chart as SVG to this path.
    #[arg(long)]
    pub chart: Option<PathBuf>,

    /// Plot the first day as well.
    #[arg(long, default_value_t = false)]
    pub keep_first_day: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    /// Number of tweets per day.
    Count,
    /// Mean non-neutral sentiment per day.
    Sentiment,
    /// Summed follower count per day.
    Reach,
}

impl From<MetricArg> for ChartMetric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Count => Self::Count,
            MetricArg::Sentiment => Self::Sentiment,
            MetricArg::Reach => Self::Reach,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlate_requires_exactly_one_tweet_source() {
        assert!(Cli::try_parse_from(["tweetick", "correlate"]).is_err());
        assert!(Cli::try_parse_from(["tweetick", "correlate", "--user", "a", "--query", "b"]).is_err());
        assert!(Cli::try_parse_from(["tweetick", "correlate", "--query", "$COMP"]).is_ok());
    }

    #[test]
    fn global_options_follow_subcommands() {
        let cli = Cli::try_parse_from(["tweetick", "prices", "--format", "table", "--token", "uni"])
            .expect("parses");
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.token, "uni");
    }

    #[test]
    fn search_defaults_to_a_thousand_tweets() {
        let cli = Cli::try_parse_from(["tweetick", "tweets", "search", "$COMP"]).expect("parses");
        match cli.command {
            Command::Tweets(TweetsArgs {
                command: TweetsCommand::Search(args),
            }) => assert_eq!(args.count, 1000),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
