//! Persisted record of delivery outcomes per (target, follower).
//!
//! The on-disk form is a pretty-printed JSON object keyed by target username,
//! then by follower username:
//!
//! ```json
//! {
//!   "alice": {
//!     "bob":   { "status": "Success", "user_id": "102" },
//!     "carol": { "status": "Error", "error": "HTTP 500 from /send: boom", "user_id": "103" }
//!   }
//! }
//! ```
//!
//! A `Success` entry is never downgraded. The store rewrites the whole file on
//! every save; loading never fails and falls back to an empty ledger.

use crate::error::Result;
use crate::io::{atomic_write, read_optional};
use crate::types::{DeliveryStatus, RecipientStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub status: DeliveryStatus,
    #[serde(
        default,
        alias = "error_detail",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    /// Platform id of the follower, when it was known at send time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A ledger entry whose last recorded outcome was an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecipient {
    pub target: String,
    pub username: String,
    pub user_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    pub target: String,
    pub succeeded: usize,
    pub failed: usize,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    targets: BTreeMap<String, BTreeMap<String, LedgerEntry>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.values().all(|m| m.is_empty())
    }

    /// Total number of recorded (target, follower) pairs.
    pub fn len(&self) -> usize {
        self.targets.values().map(|m| m.len()).sum()
    }

    pub fn entry(&self, target: &str, follower: &str) -> Option<&LedgerEntry> {
        self.targets.get(target).and_then(|m| m.get(follower))
    }

    pub fn get_status(&self, target: &str, follower: &str) -> RecipientStatus {
        self.entry(target, follower)
            .map(|e| e.status.into())
            .unwrap_or(RecipientStatus::Unknown)
    }

    /// Record an outcome. A `Success` already on file is kept and `false` is
    /// returned; any other write replaces the entry's status and detail.
    pub fn set_status(
        &mut self,
        target: &str,
        follower: &str,
        status: DeliveryStatus,
        detail: Option<String>,
    ) -> bool {
        let entries = self.targets.entry(target.to_string()).or_default();
        match entries.get_mut(follower) {
            Some(existing) if existing.status == DeliveryStatus::Success => {
                if status == DeliveryStatus::Error {
                    return false;
                }
                existing.updated_at = Some(Utc::now());
                true
            }
            Some(existing) => {
                existing.status = status;
                existing.error = error_detail(status, detail);
                existing.updated_at = Some(Utc::now());
                true
            }
            None => {
                entries.insert(
                    follower.to_string(),
                    LedgerEntry {
                        status,
                        error: error_detail(status, detail),
                        user_id: None,
                        updated_at: Some(Utc::now()),
                    },
                );
                true
            }
        }
    }

    /// Attach the follower's platform id to an existing entry.
    pub fn set_user_id(&mut self, target: &str, follower: &str, user_id: &str) {
        if let Some(entry) = self
            .targets
            .get_mut(target)
            .and_then(|m| m.get_mut(follower))
        {
            entry.user_id = Some(user_id.to_string());
        }
    }

    /// Snapshot of every entry currently marked `Error`, in ledger order.
    pub fn failed_entries(&self) -> Vec<FailedRecipient> {
        self.targets
            .iter()
            .flat_map(|(target, entries)| {
                entries
                    .iter()
                    .filter(|(_, e)| e.status == DeliveryStatus::Error)
                    .map(move |(username, e)| FailedRecipient {
                        target: target.clone(),
                        username: username.clone(),
                        user_id: e.user_id.clone(),
                        error: e.error.clone(),
                    })
            })
            .collect()
    }

    pub fn summary(&self) -> Vec<TargetSummary> {
        self.targets
            .iter()
            .map(|(target, entries)| {
                let succeeded = entries
                    .values()
                    .filter(|e| e.status == DeliveryStatus::Success)
                    .count();
                TargetSummary {
                    target: target.clone(),
                    succeeded,
                    failed: entries.len() - succeeded,
                }
            })
            .collect()
    }
}

fn error_detail(status: DeliveryStatus, detail: Option<String>) -> Option<String> {
    match status {
        DeliveryStatus::Success => None,
        DeliveryStatus::Error => detail,
    }
}

// ---------------------------------------------------------------------------
// LedgerStore
// ---------------------------------------------------------------------------

/// JSON file holding a [`Ledger`].
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the ledger; a missing or unreadable file yields an empty ledger.
    pub fn load(&self) -> Ledger {
        let data = match read_optional(&self.path) {
            Ok(Some(data)) => data,
            Ok(None) => {
                info!(path = %self.path.display(), "no ledger yet, starting empty");
                return Ledger::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ledger unreadable, starting empty");
                return Ledger::new();
            }
        };
        if data.trim().is_empty() {
            info!(path = %self.path.display(), "ledger file is empty, starting empty");
            return Ledger::new();
        }
        match serde_json::from_str(&data) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ledger is corrupt, starting empty");
                Ledger::new()
            }
        }
    }

    pub fn try_save(&self, ledger: &Ledger) -> Result<()> {
        let data = serde_json::to_string_pretty(ledger)?;
        atomic_write(&self.path, data.as_bytes())
    }

    /// Best-effort save: failures are logged, never returned.
    pub fn save(&self, ledger: &Ledger) -> bool {
        match self.try_save(ledger) {
            Ok(()) => {
                debug!(path = %self.path.display(), entries = ledger.len(), "ledger saved");
                true
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to save ledger");
                false
            }
        }
    }
}
