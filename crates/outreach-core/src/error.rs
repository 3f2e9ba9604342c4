use crate::platform::PlatformError;
use thiserror::Error;

/// Failure of a call made through [`crate::retry::RetryExecutor`].
#[derive(Debug, Error)]
pub enum RetryError {
    /// The platform returned a non-retryable failure; no further attempts were made.
    #[error("request failed: {0}")]
    Fatal(PlatformError),

    #[error("maximum retries exceeded ({attempts}): {last}")]
    Exhausted { attempts: u32, last: PlatformError },
}

impl RetryError {
    /// The platform error behind this failure, whichever way it ended.
    pub fn platform_error(&self) -> &PlatformError {
        match self {
            RetryError::Fatal(e) => e,
            RetryError::Exhausted { last, .. } => last,
        }
    }
}

#[derive(Debug, Error)]
pub enum OutreachError {
    #[error("no target usernames to process")]
    NoTargets,

    #[error("message pool is empty")]
    NoMessages,

    #[error("login failed")]
    Login(#[source] PlatformError),

    #[error("target '{target}' failed")]
    Target {
        target: String,
        #[source]
        source: RetryError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OutreachError>;
