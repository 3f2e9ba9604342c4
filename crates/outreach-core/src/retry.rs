//! Bounded exponential-backoff retry around platform calls.
//!
//! Failures are classified by [`PlatformError::is_retryable`]: throttling and
//! authorization status codes back off and try again, anything else aborts on
//! the spot. The executor knows nothing about messages or the ledger.

use crate::error::RetryError;
use crate::platform::PlatformError;
use crate::sleep::Sleeper;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the second attempt, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Multiplier applied to the delay after every retryable failure.
    #[serde(default = "default_factor")]
    pub factor: u32,
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_factor() -> u32 {
    2
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            factor: default_factor(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: u64, factor: u32) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            factor,
        }
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

// ---------------------------------------------------------------------------
// RetryExecutor
// ---------------------------------------------------------------------------

pub struct RetryExecutor<S> {
    policy: RetryPolicy,
    sleeper: S,
}

impl<S: Sleeper> RetryExecutor<S> {
    pub fn new(policy: RetryPolicy, sleeper: S) -> Self {
        Self { policy, sleeper }
    }

    /// Run `operation` until it succeeds, fails fatally, or the attempt budget
    /// is spent. No sleep follows the final attempt.
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, PlatformError>>,
    {
        let attempts = self.policy.attempts();
        let mut delay = Duration::from_millis(self.policy.base_delay_ms);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !err.is_retryable() {
                debug!(attempt, error = %err, "non-retryable platform error");
                return Err(RetryError::Fatal(err));
            }

            if attempt >= attempts {
                error!(attempts, error = %err, "max retries exceeded");
                return Err(RetryError::Exhausted {
                    attempts,
                    last: err,
                });
            }

            if let PlatformError::Transport {
                status_code,
                body,
                endpoint,
            } = &err
            {
                warn!(
                    status_code = ?status_code,
                    body = %body,
                    endpoint = %endpoint,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "retryable platform error, backing off"
                );
            }

            self.sleeper.sleep(delay).await;
            delay = delay.saturating_mul(self.policy.factor);
        }
    }
}
