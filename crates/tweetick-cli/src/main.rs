mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::Cli;
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "tweetick=info,tweetick_core=info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let report = commands::run(cli).await?;
    output::render(&report, cli.format, cli.pretty)?;

    if cli.strict && !report.warnings.is_empty() {
        return Err(CliError::StrictModeViolation {
            warning_count: report.warnings.len(),
        });
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("tweetick=debug,tweetick_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact(),
        )
        .init();
}
