use thiserror::Error;
use tweetick_core::{CoreError, SourceErrorKind, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("usage error: {0}")]
    Usage(String),

    #[error("strict mode failed: warnings={warning_count}")]
    StrictModeViolation { warning_count: usize },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("cannot format timestamp: {0}")]
    Clock(#[from] time::error::Format),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Usage(_) => 2,
            Self::Core(error) => core_exit_code(error),
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) | Self::Io(_) | Self::Clock(_) => 10,
        }
    }
}

fn core_exit_code(error: &CoreError) -> u8 {
    match error {
        CoreError::Validation(_) => 2,
        CoreError::DataUnavailable { .. } => 3,
        CoreError::Source(source) if source.kind() == SourceErrorKind::Unauthorized => 4,
        CoreError::Source(_) => 3,
        CoreError::SearchFailed { last, .. } if last.kind() == SourceErrorKind::Unauthorized => 4,
        CoreError::SearchFailed { .. } => 3,
        CoreError::ClientUnavailable(_) => 4,
        CoreError::MalformedRecord { .. } => 6,
        CoreError::Io(_) | CoreError::Serialization(_) | CoreError::Csv(_) => 10,
    }
}
