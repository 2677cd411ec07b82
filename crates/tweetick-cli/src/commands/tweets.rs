use serde::Serialize;
use tracing::info;
use tweetick_core::{write_tweet_table, TweetRecord};

use crate::cli::{SearchTweetsArgs, UserTweetsArgs};
use crate::error::CliError;

use super::{failure_warnings, CommandResult, Context};

#[derive(Debug, Serialize)]
struct TweetsResponseData {
    source: String,
    requested: usize,
    received: usize,
    from_cache: bool,
    file: Option<String>,
    rows: Vec<TweetRecord>,
}

pub async fn run_user(context: &Context<'_>, args: &UserTweetsArgs) -> Result<CommandResult, CliError> {
    let user = args.user.trim().trim_start_matches('@');
    let collector = context.collector()?;
    let tweets = collector.fetch_user_tweets(user, args.count).await?;

    if let Some(path) = &args.out {
        write_tweet_table(path, &tweets)?;
        info!(path = %path.display(), tweets = tweets.len(), "wrote user tweets");
    }

    let received = tweets.len();
    let mut result = CommandResult::ok(serde_json::to_value(TweetsResponseData {
        source: format!("@{user}"),
        requested: args.count,
        received,
        from_cache: false,
        file: args.out.as_ref().map(|path| path.display().to_string()),
        rows: tweets,
    })?);
    if received < args.count {
        result = result.with_warning(format!(
            "received {received} of {} requested tweets",
            args.count
        ));
    }

    Ok(result)
}

pub async fn run_search(context: &Context<'_>, args: &SearchTweetsArgs) -> Result<CommandResult, CliError> {
    let (loaded, path) = context
        .search_tweets(&args.query, args.count, args.cache.clone())
        .await?;

    let warnings = failure_warnings(&loaded);
    let data = serde_json::to_value(TweetsResponseData {
        source: args.query.clone(),
        requested: args.count,
        received: loaded.tweets.len(),
        from_cache: loaded.from_cache,
        file: Some(path.display().to_string()),
        rows: loaded.tweets,
    })?;

    Ok(CommandResult::ok(data).with_warnings(warnings))
}
