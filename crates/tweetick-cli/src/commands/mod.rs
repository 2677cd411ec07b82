mod correlate;
mod prices;
mod tweets;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tweetick_core::config::{default_price_cache_path, default_tweet_cache_path};
use tweetick_core::{
    DayRange, HttpClient, LexiconScorer, LoadedTweets, PriceFields, PriceLoad, PriceLoader,
    ReqwestHttpClient, TweetCollector, TwitterClient, ValidationError,
};

use crate::cli::{Cli, Command, PriceSourceArgs, TweetsCommand};
use crate::error::CliError;
use crate::output::Report;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Report, CliError> {
    if cli.token.trim().is_empty() {
        return Err(ValidationError::EmptyField { field: "token" }.into());
    }

    let http_client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let context = Context { cli, http_client };

    let (name, result) = match &cli.command {
        Command::Prices(args) => ("prices", prices::run(&context, args).await?),
        Command::Tweets(args) => match &args.command {
            TweetsCommand::User(user_args) => ("tweets.user", tweets::run_user(&context, user_args).await?),
            TweetsCommand::Search(search_args) => {
                ("tweets.search", tweets::run_search(&context, search_args).await?)
            }
        },
        Command::Correlate(args) => ("correlate", correlate::run(&context, args).await?),
    };

    Report::new(name, result.warnings, result.data)
}

/// Shared state handed to each command.
pub struct Context<'a> {
    pub cli: &'a Cli,
    pub http_client: Arc<dyn HttpClient>,
}

impl Context<'_> {
    pub async fn load_prices(&self, args: &PriceSourceArgs) -> Result<(PriceLoad, PathBuf), CliError> {
        let day_range = if args.exclude_last_day {
            DayRange::ExcludeLast
        } else {
            DayRange::Inclusive
        };
        let loader = PriceLoader::new(Arc::clone(&self.http_client))
            .with_fields(PriceFields::new(&args.timestamp_field, &args.price_field))
            .with_day_range(day_range)
            .with_timeout_ms(self.cli.timeout_ms);

        let cache_path = args
            .price_cache
            .clone()
            .unwrap_or_else(|| default_price_cache_path(&self.cli.data_dir, &self.cli.token));
        let load = loader.load(args.price_url.as_deref(), &cache_path).await?;
        Ok((load, cache_path))
    }

    /// Fails with `ClientUnavailable` when credentials are missing.
    pub fn collector(&self) -> Result<TweetCollector, CliError> {
        let client = TwitterClient::from_env(Arc::clone(&self.http_client))?
            .with_timeout_ms(self.cli.timeout_ms);
        Ok(TweetCollector::new(Arc::new(client), Arc::new(LexiconScorer::new())))
    }

    /// Cache-first text search; credentials are only needed on a cache miss.
    pub async fn search_tweets(
        &self,
        query: &str,
        count: usize,
        cache: Option<PathBuf>,
    ) -> Result<(LoadedTweets, PathBuf), CliError> {
        let path = cache.unwrap_or_else(|| default_tweet_cache_path(&self.cli.data_dir, &self.cli.token, count));
        let loaded = if path.exists() {
            LoadedTweets {
                tweets: tweetick_core::read_tweet_table(&path)?,
                from_cache: true,
                failures: Vec::new(),
            }
        } else {
            tweetick_core::load_text_tweets(&self.collector()?, &path, count, query).await?
        };
        Ok((loaded, path))
    }
}

pub fn failure_warnings(loaded: &LoadedTweets) -> Vec<String> {
    loaded
        .failures
        .iter()
        .map(|failure| format!("search until {} failed: {}", failure.until, failure.error))
        .collect()
}
