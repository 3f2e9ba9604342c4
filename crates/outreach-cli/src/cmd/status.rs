use crate::output::{print_json, print_table};
use clap::Args;
use outreach_core::config::Settings;
use outreach_core::ledger::LedgerStore;
use std::path::Path;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// List every recipient whose last delivery failed
    #[arg(long)]
    pub failed: bool,
}

pub fn run(root: &Path, settings: &Settings, args: StatusArgs, json: bool) -> anyhow::Result<()> {
    let store = LedgerStore::new(settings.ledger_path(root));
    let ledger = store.load();
    let summary = ledger.summary();
    let failed = ledger.failed_entries();

    if json {
        print_json(&serde_json::json!({
            "ledger": store.path(),
            "targets": summary,
            "failed": if args.failed { Some(&failed) } else { None },
        }))?;
        return Ok(());
    }

    if summary.is_empty() {
        println!("No deliveries recorded in {}.", store.path().display());
        return Ok(());
    }

    let rows = summary
        .iter()
        .map(|s| {
            vec![
                s.target.clone(),
                s.succeeded.to_string(),
                s.failed.to_string(),
            ]
        })
        .collect();
    print_table(&["TARGET", "DELIVERED", "FAILED"], rows);

    if args.failed && !failed.is_empty() {
        println!();
        let rows = failed
            .iter()
            .map(|f| {
                vec![
                    f.target.clone(),
                    f.username.clone(),
                    f.error.clone().unwrap_or_default(),
                ]
            })
            .collect();
        print_table(&["TARGET", "FOLLOWER", "ERROR"], rows);
    }
    Ok(())
}
