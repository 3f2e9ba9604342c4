use crate::fixture;
use crate::output::print_json;
use anyhow::Context;
use clap::Args;
use outreach_core::config::Settings;
use outreach_core::engine::{Campaign, DeliveryEngine, RunReport};
use outreach_core::inputs;
use outreach_core::ledger::LedgerStore;
use outreach_core::platform::PlatformClient;
use outreach_core::sleep::TokioSleeper;
use outreach_core::OutreachError;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Simulated platform description (YAML) to deliver against
    #[arg(long, env = "OUTREACH_FIXTURE")]
    pub fixture: PathBuf,

    /// Seed for message choice and pacing
    #[arg(long)]
    pub seed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(root: &Path, settings: &Settings, args: RunArgs, json: bool) -> anyhow::Result<()> {
    // Inputs are checked before anything touches the platform.
    let campaign = load_campaign(root, settings)?;
    let (username, password) = settings.credentials()?;
    let platform = fixture::load(&args.fixture, settings.proxy_url.as_deref())?;

    let store = LedgerStore::new(settings.ledger_path(root));
    let rt = tokio::runtime::Runtime::new()?;

    let report: RunReport = rt.block_on(async {
        let session = platform
            .login(username, password)
            .await
            .map_err(OutreachError::Login)?;
        tracing::info!(username = %session.username, "logged in");

        let mut ledger = store.load();
        let mut engine =
            DeliveryEngine::from_settings(&platform, &store, settings, TokioSleeper, args.seed);
        engine.run(&campaign, &mut ledger).await
    })?;

    if json {
        print_json(&report)?;
    } else {
        println!(
            "Delivered {} message(s) across {} target(s); {} already delivered, {} failed.",
            report.sent, report.targets_processed, report.skipped, report.failed
        );
        println!(
            "Error sweep: {} re-delivered, {} still failing.",
            report.resent, report.still_failing
        );
        println!("Ledger: {}", store.path().display());
    }
    Ok(())
}

/// Read the target list and message pool, dropping blank lines.
pub fn load_campaign(root: &Path, settings: &Settings) -> anyhow::Result<Campaign> {
    let targets_path = settings.targets_path(root);
    let messages_path = settings.messages_path(root);
    let targets = read_entries(&targets_path, "target")?;
    let messages = read_entries(&messages_path, "message")?;

    Campaign::new(targets, messages).map_err(|e| {
        let source = match e {
            OutreachError::NoTargets => &targets_path,
            _ => &messages_path,
        };
        anyhow::anyhow!("{e} (from {})", source.display())
    })
}

fn read_entries(path: &Path, kind: &str) -> anyhow::Result<Vec<String>> {
    let lines = inputs::read_lines(path)
        .with_context(|| format!("failed to read {kind} list {}", path.display()))?;
    let (entries, dropped) = inputs::drop_blank(lines);
    if dropped > 0 {
        tracing::debug!(file = %path.display(), dropped, "ignored blank lines");
    }
    Ok(entries)
}
