//! Seam between the delivery engine and the remote messaging platform.
//!
//! The engine never talks to the network directly. Everything it needs from
//! the platform goes through [`PlatformClient`], and every failure comes back
//! as a [`PlatformError`] that the retry executor can classify.

use crate::types::{Account, Follower, Session};
use async_trait::async_trait;
use thiserror::Error;

/// Status codes that indicate throttling or a transient authorization problem.
pub const RETRYABLE_STATUS_CODES: [u16; 3] = [429, 401, 403];

#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("account not found: {0}")]
    NotFound(String),

    #[error("{}", transport_message(.status_code, .body, .endpoint))]
    Transport {
        status_code: Option<u16>,
        body: String,
        endpoint: String,
    },
}

fn transport_message(status_code: &Option<u16>, body: &str, endpoint: &str) -> String {
    match status_code {
        Some(code) => format!("HTTP {code} from {endpoint}: {body}"),
        None => format!("transport error at {endpoint}: {body}"),
    }
}

impl PlatformError {
    pub fn transport(status_code: u16, body: impl Into<String>, endpoint: impl Into<String>) -> Self {
        PlatformError::Transport {
            status_code: Some(status_code),
            body: body.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            PlatformError::Transport { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Only rate-limit and authorization status codes are worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.status_code()
            .is_some_and(|code| RETRYABLE_STATUS_CODES.contains(&code))
    }
}

/// Operations the delivery engine consumes from the platform.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<Session, PlatformError>;

    /// Resolve an exact username to an account.
    async fn find_account(&self, username: &str) -> Result<Account, PlatformError>;

    async fn list_followers(&self, account_id: &str) -> Result<Vec<Follower>, PlatformError>;

    async fn send_direct_message(
        &self,
        recipient_ids: &[String],
        text: &str,
    ) -> Result<(), PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_auth_codes_are_retryable() {
        for code in [429, 401, 403] {
            assert!(PlatformError::transport(code, "", "/x").is_retryable());
        }
    }

    #[test]
    fn other_failures_are_fatal() {
        assert!(!PlatformError::transport(500, "boom", "/x").is_retryable());
        assert!(!PlatformError::transport(404, "", "/x").is_retryable());
        assert!(!PlatformError::NotFound("alice".into()).is_retryable());
        let no_code = PlatformError::Transport {
            status_code: None,
            body: "connection reset".into(),
            endpoint: "/x".into(),
        };
        assert!(!no_code.is_retryable());
    }

    #[test]
    fn transport_display_includes_endpoint() {
        let e = PlatformError::transport(429, "slow down", "/direct_v2/threads/broadcast/text/");
        assert_eq!(
            e.to_string(),
            "HTTP 429 from /direct_v2/threads/broadcast/text/: slow down"
        );
    }
}
