use anyhow::Context;
use clap::Args;
use outreach_core::config::Settings;
use std::path::{Path, PathBuf};

/// Settings that can be given as flags or environment variables. Anything
/// set here wins over `outreach.yaml`.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Attempts per platform call (including the first)
    #[arg(long, global = true, env = "RETRY_COUNT")]
    pub retry_count: Option<u32>,

    /// Initial backoff delay in milliseconds
    #[arg(long, global = true, env = "RETRY_DELAY")]
    pub retry_delay: Option<u64>,

    /// Backoff multiplier
    #[arg(long, global = true, env = "RETRY_FACTOR")]
    pub retry_factor: Option<u32>,

    /// Minimum wait between messages, in milliseconds
    #[arg(long, global = true, env = "MIN_DELAY")]
    pub min_delay: Option<u64>,

    /// Maximum wait between messages, in milliseconds
    #[arg(long, global = true, env = "MAX_DELAY")]
    pub max_delay: Option<u64>,

    /// Minimum pause after a burst, in milliseconds
    #[arg(long, global = true, env = "MIN_PAUSE_DURATION")]
    pub min_pause: Option<u64>,

    /// Maximum pause after a burst, in milliseconds
    #[arg(long, global = true, env = "MAX_PAUSE_DURATION")]
    pub max_pause: Option<u64>,

    /// Minimum messages per burst
    #[arg(long, global = true, env = "MIN_MESSAGES_TO_SEND")]
    pub min_messages: Option<u32>,

    /// Maximum messages per burst
    #[arg(long, global = true, env = "MAX_MESSAGES_TO_SEND")]
    pub max_messages: Option<u32>,

    /// Account used to send messages
    #[arg(long, global = true, env = "LOGIN_USERNAME")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "LOGIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Proxy handed to the platform client
    #[arg(long, global = true, env = "PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Target usernames, one per line
    #[arg(long, global = true, env = "TARGETS_FILE")]
    pub targets: Option<PathBuf>,

    /// Message pool, one message per line
    #[arg(long, global = true, env = "MESSAGES_FILE")]
    pub messages: Option<PathBuf>,

    /// Delivery ledger (JSON)
    #[arg(long, global = true, env = "LEDGER_FILE")]
    pub ledger: Option<PathBuf>,
}

impl SettingsArgs {
    pub fn apply(self, s: &mut Settings) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut s.retry.max_retries, self.retry_count);
        set(&mut s.retry.base_delay_ms, self.retry_delay);
        set(&mut s.retry.factor, self.retry_factor);
        set(&mut s.pacing.min_delay_ms, self.min_delay);
        set(&mut s.pacing.max_delay_ms, self.max_delay);
        set(&mut s.pacing.min_pause_ms, self.min_pause);
        set(&mut s.pacing.max_pause_ms, self.max_pause);
        set(&mut s.pacing.min_messages, self.min_messages);
        set(&mut s.pacing.max_messages, self.max_messages);
        set(&mut s.files.targets, self.targets);
        set(&mut s.files.messages, self.messages);
        set(&mut s.files.ledger, self.ledger);

        if self.username.is_some() {
            s.username = self.username;
        }
        if self.password.is_some() {
            s.password = self.password;
        }
        if self.proxy_url.is_some() {
            s.proxy_url = self.proxy_url;
        }
    }
}

/// Defaults, then `outreach.yaml`, then flags and environment.
pub fn resolve(root: &Path, args: SettingsArgs) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(root).context("failed to load outreach.yaml")?;
    args.apply(&mut settings);
    Ok(settings)
}
