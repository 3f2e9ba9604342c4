use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Platform entities
// ---------------------------------------------------------------------------

/// An authenticated session returned by [`crate::platform::PlatformClient::login`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
}

/// An account resolved by username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    pub id: String,
    pub username: String,
}

// ---------------------------------------------------------------------------
// Delivery status
// ---------------------------------------------------------------------------

/// Recorded outcome for a (target, follower) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    #[serde(alias = "success")]
    Success,
    #[serde(alias = "error")]
    Error,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Success => f.write_str("success"),
            DeliveryStatus::Error => f.write_str("error"),
        }
    }
}

/// Ledger lookup result; `Unknown` means the pair was never attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientStatus {
    Success,
    Error,
    Unknown,
}

impl From<DeliveryStatus> for RecipientStatus {
    fn from(s: DeliveryStatus) -> Self {
        match s {
            DeliveryStatus::Success => RecipientStatus::Success,
            DeliveryStatus::Error => RecipientStatus::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_capitalized() {
        let json = serde_json::to_string(&DeliveryStatus::Success).unwrap();
        assert_eq!(json, "\"Success\"");
    }

    #[test]
    fn status_accepts_lowercase() {
        let s: DeliveryStatus = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(s, DeliveryStatus::Error);
    }
}
