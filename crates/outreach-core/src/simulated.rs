//! In-memory [`PlatformClient`] with scripted accounts and failures.
//!
//! Used for dry runs and tests. Sends are recorded instead of delivered.

use crate::platform::{PlatformClient, PlatformError};
use crate::types::{Account, Follower, Session};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;
use tracing::info;

pub const SEND_ENDPOINT: &str = "/direct/threads/broadcast/text";
pub const FOLLOWERS_ENDPOINT: &str = "/friendships/followers";

/// A message accepted by the simulated platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient_ids: Vec<String>,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct SimulatedPlatform {
    accounts: BTreeMap<String, Account>,
    followers: HashMap<String, Vec<Follower>>,
    credentials: Option<(String, String)>,
    proxy_url: Option<String>,
    missing_followers: HashMap<String, PlatformError>,
    scripted: Mutex<HashMap<String, VecDeque<PlatformError>>>,
    always_fail: HashMap<String, PlatformError>,
    sent: Mutex<Vec<SentMessage>>,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only this username/password pair will be accepted by `login`.
    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Route every call through `url`. Only recorded and logged here.
    pub fn with_proxy(mut self, url: &str) -> Self {
        self.proxy_url = Some(url.to_string());
        self
    }

    pub fn proxy_url(&self) -> Option<&str> {
        self.proxy_url.as_deref()
    }

    /// Register an account and its followers. Followers become resolvable
    /// accounts too.
    pub fn with_account(mut self, username: &str, id: &str, followers: Vec<Follower>) -> Self {
        self.accounts.insert(
            username.to_string(),
            Account {
                id: id.to_string(),
                username: username.to_string(),
            },
        );
        for f in &followers {
            self.accounts
                .entry(f.username.clone())
                .or_insert_with(|| Account {
                    id: f.id.clone(),
                    username: f.username.clone(),
                });
        }
        self.followers.insert(id.to_string(), followers);
        self
    }

    /// Every send to `recipient_id` fails with `error`.
    pub fn fail_always(mut self, recipient_id: &str, error: PlatformError) -> Self {
        self.always_fail.insert(recipient_id.to_string(), error);
        self
    }

    /// The next sends to `recipient_id` fail with `errors`, in order.
    pub fn fail_next(self, recipient_id: &str, errors: Vec<PlatformError>) -> Self {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted
                .entry(recipient_id.to_string())
                .or_default()
                .extend(errors);
        }
        self
    }

    /// Follower listing for `account_id` fails with `error`.
    pub fn fail_followers(mut self, account_id: &str, error: PlatformError) -> Self {
        self.missing_followers.insert(account_id.to_string(), error);
        self
    }

    pub fn account_id(&self, username: &str) -> Option<&str> {
        self.accounts.get(username).map(|a| a.id.as_str())
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of accepted sends addressed to `recipient_id`.
    pub fn sent_to(&self, recipient_id: &str) -> usize {
        self.sent()
            .iter()
            .filter(|m| m.recipient_ids.iter().any(|id| id == recipient_id))
            .count()
    }

    fn scripted_failure(&self, recipient_id: &str) -> Option<PlatformError> {
        let mut scripted = self.scripted.lock().ok()?;
        scripted.get_mut(recipient_id).and_then(|q| q.pop_front())
    }
}

#[async_trait]
impl PlatformClient for SimulatedPlatform {
    async fn login(&self, username: &str, password: &str) -> Result<Session, PlatformError> {
        if let Some((u, p)) = &self.credentials {
            if u != username || p != password {
                return Err(PlatformError::Auth(format!(
                    "bad credentials for '{username}'"
                )));
            }
        }
        info!(
            username,
            proxy = self.proxy_url.as_deref().unwrap_or("none"),
            "simulated login"
        );
        Ok(Session {
            username: username.to_string(),
        })
    }

    async fn find_account(&self, username: &str) -> Result<Account, PlatformError> {
        self.accounts
            .get(username)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(username.to_string()))
    }

    async fn list_followers(&self, account_id: &str) -> Result<Vec<Follower>, PlatformError> {
        if let Some(err) = self.missing_followers.get(account_id) {
            return Err(err.clone());
        }
        Ok(self.followers.get(account_id).cloned().unwrap_or_default())
    }

    async fn send_direct_message(
        &self,
        recipient_ids: &[String],
        text: &str,
    ) -> Result<(), PlatformError> {
        for id in recipient_ids {
            if let Some(err) = self.scripted_failure(id) {
                return Err(err);
            }
            if let Some(err) = self.always_fail.get(id) {
                return Err(err.clone());
            }
        }
        info!(recipients = ?recipient_ids, text, "simulated send");
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage {
                recipient_ids: recipient_ids.to_vec(),
                text: text.to_string(),
            });
        }
        Ok(())
    }
}
