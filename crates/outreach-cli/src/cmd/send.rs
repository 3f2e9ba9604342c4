use crate::fixture;
use crate::output::print_json;
use clap::Args;
use outreach_core::config::Settings;
use outreach_core::platform::PlatformClient;
use outreach_core::retry::RetryExecutor;
use outreach_core::sleep::TokioSleeper;
use outreach_core::OutreachError;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Recipient username
    pub recipient: String,

    /// Message text
    #[arg(long, short, default_value = "hi")]
    pub message: String,

    /// Simulated platform description (YAML) to deliver against
    #[arg(long, env = "OUTREACH_FIXTURE")]
    pub fixture: PathBuf,
}

/// Send a single message to one user. The ledger is not consulted or updated.
pub fn run(settings: &Settings, args: SendArgs, json: bool) -> anyhow::Result<()> {
    let (username, password) = settings.credentials()?;
    let platform = fixture::load(&args.fixture, settings.proxy_url.as_deref())?;
    let retry = RetryExecutor::new(settings.retry, TokioSleeper);
    let rt = tokio::runtime::Runtime::new()?;

    let platform = &platform;
    let name = args.recipient.as_str();
    let recipient = rt.block_on(async {
        platform
            .login(username, password)
            .await
            .map_err(OutreachError::Login)?;

        let account = retry
            .execute(move || platform.find_account(name))
            .await
            .map_err(|source| anyhow::anyhow!("cannot resolve '{name}': {source}"))?;

        let ids = [account.id.clone()];
        let ids = &ids[..];
        let text = args.message.as_str();
        retry
            .execute(move || platform.send_direct_message(ids, text))
            .await
            .map_err(|source| anyhow::anyhow!("failed to message '{name}': {source}"))?;
        anyhow::Ok(account)
    })?;

    if json {
        print_json(&serde_json::json!({
            "recipient": recipient,
            "message": args.message,
        }))?;
    } else {
        println!("Sent \"{}\" to {}", args.message, recipient.username);
    }
    Ok(())
}
