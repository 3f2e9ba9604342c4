use crate::error::{OutreachError, Result};
use crate::pacing::PacingConfig;
use crate::paths;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

impl ConfigWarning {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: WarnLevel::Error,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// FileLayout
// ---------------------------------------------------------------------------

/// Input and ledger files, relative to the project root unless absolute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLayout {
    #[serde(default = "default_targets")]
    pub targets: PathBuf,
    #[serde(default = "default_messages")]
    pub messages: PathBuf,
    #[serde(default = "default_ledger")]
    pub ledger: PathBuf,
}

fn default_targets() -> PathBuf {
    PathBuf::from(paths::TARGETS_FILE)
}

fn default_messages() -> PathBuf {
    PathBuf::from(paths::MESSAGES_FILE)
}

fn default_ledger() -> PathBuf {
    PathBuf::from(paths::LEDGER_FILE)
}

impl Default for FileLayout {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            messages: default_messages(),
            ledger: default_ledger(),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings (top-level)
// ---------------------------------------------------------------------------

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub files: FileLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Never written back to disk.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

impl Settings {
    /// Load `outreach.yaml` from `root`, or defaults when it does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::settings_path(root);
        match crate::io::read_optional(&path)? {
            Some(data) if !data.trim().is_empty() => Ok(serde_yaml::from_str(&data)?),
            _ => Ok(Self::default()),
        }
    }

    pub fn targets_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.files.targets)
    }

    pub fn messages_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.files.messages)
    }

    pub fn ledger_path(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.files.ledger)
    }

    /// Login credentials, or an error naming what is missing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() => Ok((u, p)),
            (None, _) | (Some(""), _) => Err(OutreachError::InvalidConfig(
                "login username is not set (LOGIN_USERNAME)".into(),
            )),
            _ => Err(OutreachError::InvalidConfig(
                "login password is not set (LOGIN_PASSWORD)".into(),
            )),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Err(e) = self.credentials() {
            warnings.push(ConfigWarning::error(e.to_string()));
        }

        let p = &self.pacing;
        if p.min_delay_ms > p.max_delay_ms {
            warnings.push(ConfigWarning::warning(format!(
                "MIN_DELAY ({}) is greater than MAX_DELAY ({}); bounds will be swapped",
                p.min_delay_ms, p.max_delay_ms
            )));
        }
        if p.min_pause_ms > p.max_pause_ms {
            warnings.push(ConfigWarning::warning(format!(
                "MIN_PAUSE_DURATION ({}) is greater than MAX_PAUSE_DURATION ({}); bounds will be swapped",
                p.min_pause_ms, p.max_pause_ms
            )));
        }
        if p.min_messages > p.max_messages {
            warnings.push(ConfigWarning::warning(format!(
                "MIN_MESSAGES_TO_SEND ({}) is greater than MAX_MESSAGES_TO_SEND ({}); bounds will be swapped",
                p.min_messages, p.max_messages
            )));
        }
        if p.min_messages == 0 {
            warnings.push(ConfigWarning::warning(
                "MIN_MESSAGES_TO_SEND is 0; a burst may end after a single send",
            ));
        }

        let r = &self.retry;
        if r.max_retries == 0 {
            warnings.push(ConfigWarning::warning(
                "RETRY_COUNT is 0; every call is attempted exactly once",
            ));
        }
        if r.max_retries > 10 {
            warnings.push(ConfigWarning::warning(format!(
                "RETRY_COUNT={} (>10 is unusual)",
                r.max_retries
            )));
        }
        if r.factor == 0 {
            warnings.push(ConfigWarning::warning(
                "RETRY_FACTOR is 0; retries after the first will not wait",
            ));
        }

        if let Some(proxy) = &self.proxy_url {
            let known = ["http://", "https://", "socks5://", "socks5h://"];
            if !known.iter().any(|s| proxy.starts_with(s)) {
                warnings.push(ConfigWarning::warning(format!(
                    "PROXY_URL '{proxy}' has an unrecognized scheme"
                )));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
