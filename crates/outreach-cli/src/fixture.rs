//! YAML description of a simulated platform.
//!
//! ```yaml
//! login:
//!   username: sender
//!   password: secret
//! accounts:
//!   alice:
//!     id: "1"
//!     followers:
//!       - { id: "2", username: bob }
//!       - { id: "3", username: carol }
//! failures:            # every send to this user fails with the status code
//!   carol: 500
//! transient:           # the next sends fail with these codes, then succeed
//!   bob: [429, 429]
//! unavailable_followers:
//!   alice: 403
//! ```

use anyhow::{bail, Context};
use outreach_core::platform::PlatformError;
use outreach_core::simulated::{
    SimulatedPlatform, FOLLOWERS_ENDPOINT, SEND_ENDPOINT,
};
use outreach_core::types::Follower;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    login: Option<FixtureLogin>,
    #[serde(default)]
    accounts: BTreeMap<String, FixtureAccount>,
    #[serde(default)]
    failures: BTreeMap<String, u16>,
    #[serde(default)]
    transient: BTreeMap<String, Vec<u16>>,
    #[serde(default)]
    unavailable_followers: BTreeMap<String, u16>,
}

#[derive(Debug, Deserialize)]
struct FixtureLogin {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct FixtureAccount {
    id: String,
    #[serde(default)]
    followers: Vec<Follower>,
}

/// Build the platform described by the fixture at `path`, routed through
/// `proxy` when one is configured.
pub fn load(path: &Path, proxy: Option<&str>) -> anyhow::Result<SimulatedPlatform> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    let fixture: Fixture = serde_yaml::from_str(&data)
        .with_context(|| format!("failed to parse fixture {}", path.display()))?;
    let platform = build(fixture)?;
    Ok(match proxy {
        Some(url) => platform.with_proxy(url),
        None => platform,
    })
}

fn build(fixture: Fixture) -> anyhow::Result<SimulatedPlatform> {
    let mut platform = SimulatedPlatform::new();
    if let Some(login) = &fixture.login {
        platform = platform.with_credentials(&login.username, &login.password);
    }
    for (username, account) in fixture.accounts {
        platform = platform.with_account(&username, &account.id, account.followers);
    }

    for (username, code) in fixture.failures {
        let id = known_id(&platform, &username)?;
        let err = PlatformError::transport(code, "simulated failure", SEND_ENDPOINT);
        platform = platform.fail_always(&id, err);
    }
    for (username, codes) in fixture.transient {
        let id = known_id(&platform, &username)?;
        let errs = codes
            .into_iter()
            .map(|code| PlatformError::transport(code, "simulated failure", SEND_ENDPOINT))
            .collect();
        platform = platform.fail_next(&id, errs);
    }
    for (username, code) in fixture.unavailable_followers {
        let id = known_id(&platform, &username)?;
        let err = PlatformError::transport(code, "simulated failure", FOLLOWERS_ENDPOINT);
        platform = platform.fail_followers(&id, err);
    }
    Ok(platform)
}

fn known_id(platform: &SimulatedPlatform, username: &str) -> anyhow::Result<String> {
    match platform.account_id(username) {
        Some(id) => Ok(id.to_string()),
        None => bail!("fixture refers to unknown user '{username}'"),
    }
}
