//! The delivery loop.
//!
//! For each target in input order the engine resolves the account, fetches
//! its followers and messages every follower the ledger does not already mark
//! as delivered. After the last target it sweeps the ledger once more and
//! retries every recipient still marked as failed.
//!
//! ```text
//! ResolveTarget ─▶ FetchFollowers ─▶ for each follower:
//!                                      Success in ledger ─▶ skip
//!                                      otherwise ─▶ send ─▶ record ─▶ pace
//!                ◀──────────── next target ───────────────┘
//! all targets done ─▶ ErrorSweep
//! ```
//!
//! Per-follower failures are recorded and never stop the run. A target that
//! cannot be resolved or whose followers cannot be listed aborts the run after
//! a final ledger save.

use crate::config::Settings;
use crate::error::{OutreachError, Result, RetryError};
use crate::ledger::{Ledger, LedgerStore};
use crate::pacing::{Pacer, Throttle};
use crate::platform::PlatformClient;
use crate::retry::RetryExecutor;
use crate::sleep::Sleeper;
use crate::types::{DeliveryStatus, RecipientStatus};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, error, info, warn};

// ---------------------------------------------------------------------------
// Campaign
// ---------------------------------------------------------------------------

/// Validated inputs for a run: at least one target and one message.
#[derive(Debug, Clone)]
pub struct Campaign {
    targets: Vec<String>,
    messages: Vec<String>,
}

impl Campaign {
    pub fn new(targets: Vec<String>, messages: Vec<String>) -> Result<Self> {
        if targets.is_empty() {
            return Err(OutreachError::NoTargets);
        }
        if messages.is_empty() {
            return Err(OutreachError::NoMessages);
        }
        Ok(Self { targets, messages })
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

// ---------------------------------------------------------------------------
// RunReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub targets_processed: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Recipients delivered during the error sweep.
    pub resent: usize,
    /// Recipients the error sweep could not deliver to.
    pub still_failing: usize,
}

// ---------------------------------------------------------------------------
// DeliveryEngine
// ---------------------------------------------------------------------------

pub struct DeliveryEngine<'a, C: ?Sized, S, R = StdRng> {
    client: &'a C,
    store: &'a LedgerStore,
    retry: RetryExecutor<S>,
    pacer: Pacer<R>,
    sleeper: S,
}

impl<'a, C, S> DeliveryEngine<'a, C, S, StdRng>
where
    C: PlatformClient + ?Sized,
    S: Sleeper + Clone,
{
    /// Build an engine from resolved settings. `seed` makes message choice and
    /// pacing reproducible.
    pub fn from_settings(
        client: &'a C,
        store: &'a LedgerStore,
        settings: &Settings,
        sleeper: S,
        seed: Option<u64>,
    ) -> Self {
        let pacer = match seed {
            Some(seed) => Pacer::seeded(settings.pacing, seed),
            None => Pacer::new(settings.pacing),
        };
        let retry = RetryExecutor::new(settings.retry, sleeper.clone());
        Self::new(client, store, retry, pacer, sleeper)
    }
}

impl<'a, C, S, R> DeliveryEngine<'a, C, S, R>
where
    C: PlatformClient + ?Sized,
    S: Sleeper,
    R: Rng,
{
    pub fn new(
        client: &'a C,
        store: &'a LedgerStore,
        retry: RetryExecutor<S>,
        pacer: Pacer<R>,
        sleeper: S,
    ) -> Self {
        Self {
            client,
            store,
            retry,
            pacer,
            sleeper,
        }
    }

    /// Deliver to every target's followers, then retry failed recipients.
    ///
    /// On a target-level failure the ledger is saved as-is and the error is
    /// returned; targets after the failing one are not processed.
    pub async fn run(&mut self, campaign: &Campaign, ledger: &mut Ledger) -> Result<RunReport> {
        info!(
            targets = campaign.targets().len(),
            messages = campaign.messages().len(),
            known_recipients = ledger.len(),
            "starting delivery run"
        );

        let mut report = RunReport::default();
        let mut throttle = Throttle::new();

        for target in campaign.targets() {
            if let Err(e) = self
                .deliver_to_followers(target, campaign, ledger, &mut throttle, &mut report)
                .await
            {
                error!(account = %target, error = %e, "aborting run");
                self.store.save(ledger);
                return Err(e);
            }
            report.targets_processed += 1;
        }

        info!(
            sent = report.sent,
            skipped = report.skipped,
            failed = report.failed,
            "all targets processed"
        );

        self.sweep_errors(campaign, ledger, &mut throttle, &mut report)
            .await;
        self.store.save(ledger);

        info!(
            resent = report.resent,
            still_failing = report.still_failing,
            "delivery run complete"
        );
        Ok(report)
    }

    async fn deliver_to_followers(
        &mut self,
        target: &str,
        campaign: &Campaign,
        ledger: &mut Ledger,
        throttle: &mut Throttle,
        report: &mut RunReport,
    ) -> Result<()> {
        let client = self.client;
        let account = self
            .retry
            .execute(move || client.find_account(target))
            .await
            .map_err(|source| target_error(target, source))?;

        let account_id = account.id.as_str();
        let followers = self
            .retry
            .execute(move || client.list_followers(account_id))
            .await
            .map_err(|source| target_error(target, source))?;

        info!(account = %target, followers = followers.len(), "fetched followers");

        for follower in &followers {
            if ledger.get_status(target, &follower.username) == RecipientStatus::Success {
                debug!(
                    account = %target,
                    follower = %follower.username,
                    "already delivered, skipping"
                );
                report.skipped += 1;
                continue;
            }

            match self.send(&follower.id, campaign).await {
                Ok(()) => {
                    info!(account = %target, follower = %follower.username, "message delivered");
                    report.sent += 1;
                    self.record_success(target, &follower.username, &follower.id, ledger);
                    self.pace(throttle).await;
                }
                Err(e) => {
                    warn!(
                        account = %target,
                        follower = %follower.username,
                        error = %e,
                        "delivery failed"
                    );
                    report.failed += 1;
                    self.record_failure(target, &follower.username, Some(&follower.id), &e, ledger);
                }
            }
        }
        Ok(())
    }

    /// Second pass over every ledger entry marked `Error`, including entries
    /// left by earlier runs. Nothing here aborts the run.
    async fn sweep_errors(
        &mut self,
        campaign: &Campaign,
        ledger: &mut Ledger,
        throttle: &mut Throttle,
        report: &mut RunReport,
    ) {
        let failed = ledger.failed_entries();
        if failed.is_empty() {
            info!("no failed recipients to retry");
            return;
        }
        info!(count = failed.len(), "retrying failed recipients");

        let client = self.client;
        for recipient in failed {
            let target = recipient.target.as_str();
            let username = recipient.username.as_str();

            let user_id = match recipient.user_id {
                Some(id) => id,
                None => match self.retry.execute(move || client.find_account(username)).await {
                    Ok(account) => account.id,
                    Err(e) => {
                        warn!(account = %target, follower = %username, error = %e, "cannot resolve recipient");
                        report.still_failing += 1;
                        self.record_failure(target, username, None, &e, ledger);
                        continue;
                    }
                },
            };

            match self.send(&user_id, campaign).await {
                Ok(()) => {
                    info!(account = %target, follower = %username, "message re-delivered");
                    report.resent += 1;
                    self.record_success(target, username, &user_id, ledger);
                    self.pace(throttle).await;
                }
                Err(e) => {
                    warn!(account = %target, follower = %username, error = %e, "re-delivery failed");
                    report.still_failing += 1;
                    self.record_failure(target, username, Some(&user_id), &e, ledger);
                }
            }
        }
    }

    async fn send(&mut self, recipient_id: &str, campaign: &Campaign) -> std::result::Result<(), RetryError> {
        // Campaign guarantees a non-empty pool.
        let text = self
            .pacer
            .choose(campaign.messages())
            .map(String::as_str)
            .unwrap_or_default();
        debug!(recipient = %recipient_id, text, "selected message");

        let client = self.client;
        let ids = [recipient_id.to_string()];
        let ids = &ids[..];
        self.retry
            .execute(move || client.send_direct_message(ids, text))
            .await
    }

    fn record_success(&self, target: &str, username: &str, user_id: &str, ledger: &mut Ledger) {
        ledger.set_status(target, username, DeliveryStatus::Success, None);
        ledger.set_user_id(target, username, user_id);
        self.store.save(ledger);
    }

    fn record_failure(
        &self,
        target: &str,
        username: &str,
        user_id: Option<&str>,
        err: &RetryError,
        ledger: &mut Ledger,
    ) {
        if !ledger.set_status(target, username, DeliveryStatus::Error, Some(err.to_string())) {
            debug!(account = %target, follower = %username, "already delivered, keeping success");
            return;
        }
        if let Some(id) = user_id {
            ledger.set_user_id(target, username, id);
        }
        self.store.save(ledger);
    }

    /// Wait between messages, and pause once the burst quota is reached.
    async fn pace(&mut self, throttle: &mut Throttle) {
        let delay = self.pacer.random_delay();
        info!(delay_ms = delay.as_millis() as u64, "waiting before next message");
        self.sleeper.sleep(delay).await;

        if throttle.record_send(&mut self.pacer) {
            let pause = self.pacer.random_pause_duration();
            info!(
                sent = throttle.sent_since_pause(),
                pause_ms = pause.as_millis() as u64,
                "burst quota reached, pausing"
            );
            self.sleeper.sleep(pause).await;
            throttle.reset();
        }
    }
}

fn target_error(target: &str, source: RetryError) -> OutreachError {
    OutreachError::Target {
        target: target.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::PacingConfig;
    use crate::platform::PlatformError;
    use crate::retry::RetryPolicy;
    use crate::simulated::{SimulatedPlatform, SEND_ENDPOINT};
    use crate::sleep::RecordingSleeper;
    use crate::types::{Account, Follower, Session};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    fn follower(id: &str, username: &str) -> Follower {
        Follower {
            id: id.into(),
            username: username.into(),
        }
    }

    fn alice_platform() -> SimulatedPlatform {
        SimulatedPlatform::new().with_account(
            "alice",
            "1",
            vec![follower("2", "bob"), follower("3", "carol")],
        )
    }

    fn campaign(targets: &[&str]) -> Campaign {
        Campaign::new(
            targets.iter().map(|s| s.to_string()).collect(),
            vec!["hi".to_string()],
        )
        .unwrap()
    }

    fn pacing(delay_ms: u64, quota: u32, pause_ms: u64) -> PacingConfig {
        PacingConfig {
            min_delay_ms: delay_ms,
            max_delay_ms: delay_ms,
            min_pause_ms: pause_ms,
            max_pause_ms: pause_ms,
            min_messages: quota,
            max_messages: quota,
        }
    }

    fn engine<'a>(
        platform: &'a SimulatedPlatform,
        store: &'a LedgerStore,
        sleeper: &'a RecordingSleeper,
        pacing: PacingConfig,
    ) -> DeliveryEngine<'a, SimulatedPlatform, &'a RecordingSleeper> {
        DeliveryEngine::new(
            platform,
            store,
            RetryExecutor::new(RetryPolicy::new(3, 50, 2), sleeper),
            Pacer::seeded(pacing, 11),
            sleeper,
        )
    }

    fn store() -> (LedgerStore, TempDir) {
        let dir = TempDir::new().unwrap();
        (LedgerStore::new(dir.path().join("ledger.json")), dir)
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(
            Campaign::new(vec![], vec!["hi".into()]),
            Err(OutreachError::NoTargets)
        ));
        assert!(matches!(
            Campaign::new(vec!["alice".into()], vec![]),
            Err(OutreachError::NoMessages)
        ));
    }

    #[tokio::test]
    async fn delivers_to_every_follower() {
        let platform = alice_platform();
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = store.load();

        let report = engine(&platform, &store, &sleeper, pacing(5, 100, 0))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        assert_eq!(report.sent, 2);
        assert_eq!(report.resent, 0);
        assert_eq!(report.targets_processed, 1);
        assert_eq!(ledger.get_status("alice", "bob"), RecipientStatus::Success);
        assert_eq!(ledger.get_status("alice", "carol"), RecipientStatus::Success);
        assert_eq!(platform.sent().len(), 2, "sweep sends nothing further");
        assert!(platform.sent().iter().all(|m| m.text == "hi"));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["alice"]["bob"]["status"], "Success");
        assert_eq!(raw["alice"]["carol"]["status"], "Success");
        assert_eq!(raw["alice"]["carol"]["user_id"], "3");
    }

    #[tokio::test]
    async fn second_run_sends_nothing() {
        let platform = alice_platform();
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();

        let mut ledger = store.load();
        engine(&platform, &store, &sleeper, pacing(0, 100, 0))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        let mut reloaded = store.load();
        let report = engine(&platform, &store, &sleeper, pacing(0, 100, 0))
            .run(&campaign(&["alice"]), &mut reloaded)
            .await
            .unwrap();

        assert_eq!(report.sent, 0);
        assert_eq!(report.skipped, 2);
        assert_eq!(platform.sent().len(), 2);
    }

    #[tokio::test]
    async fn fatal_failure_is_recorded_and_swept() {
        let platform = alice_platform()
            .fail_always("3", PlatformError::transport(500, "boom", SEND_ENDPOINT));
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();

        let report = engine(&platform, &store, &sleeper, pacing(0, 100, 0))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        assert_eq!(report.sent, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.still_failing, 1, "sweep attempted carol again");
        assert_eq!(ledger.get_status("alice", "bob"), RecipientStatus::Success);
        let carol = ledger.entry("alice", "carol").unwrap();
        assert_eq!(carol.status, DeliveryStatus::Error);
        assert!(carol.error.as_deref().unwrap().contains("500"));
        assert_eq!(carol.user_id.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn sweep_recovers_transient_failure() {
        // Three 429s exhaust the first attempt; the sweep then succeeds.
        let rate_limited = || PlatformError::transport(429, "slow down", SEND_ENDPOINT);
        let platform =
            alice_platform().fail_next("3", vec![rate_limited(), rate_limited(), rate_limited()]);
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();

        let report = engine(&platform, &store, &sleeper, pacing(0, 100, 0))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.resent, 1);
        assert_eq!(report.still_failing, 0);
        assert_eq!(ledger.get_status("alice", "carol"), RecipientStatus::Success);
        assert_eq!(ledger.entry("alice", "carol").unwrap().error, None);
        assert_eq!(platform.sent_to("3"), 1);
    }

    #[tokio::test]
    async fn success_survives_later_failure() {
        let platform = alice_platform()
            .fail_always("2", PlatformError::transport(500, "boom", SEND_ENDPOINT));
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();
        ledger.set_status("alice", "bob", DeliveryStatus::Success, None);

        engine(&platform, &store, &sleeper, pacing(0, 100, 0))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        assert_eq!(ledger.get_status("alice", "bob"), RecipientStatus::Success);
        assert_eq!(platform.sent_to("2"), 0);
    }

    #[tokio::test]
    async fn missing_target_aborts_run_and_saves() {
        let platform = alice_platform()
            .with_account("zoe", "9", vec![follower("10", "yan")]);
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();

        let err = engine(&platform, &store, &sleeper, pacing(0, 100, 0))
            .run(&campaign(&["alice", "ghost", "zoe"]), &mut ledger)
            .await
            .unwrap_err();

        match err {
            OutreachError::Target { target, source } => {
                assert_eq!(target, "ghost");
                assert!(matches!(source, RetryError::Fatal(PlatformError::NotFound(_))));
            }
            other => panic!("expected target error, got {other:?}"),
        }
        assert_eq!(platform.sent_to("10"), 0, "later targets are not processed");
        let saved = store.load();
        assert_eq!(saved.get_status("alice", "bob"), RecipientStatus::Success);
    }

    #[tokio::test]
    async fn follower_fetch_exhaustion_aborts_run() {
        let platform = alice_platform()
            .fail_followers("1", PlatformError::transport(429, "slow", "/followers"));
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();

        let err = engine(&platform, &store, &sleeper, pacing(0, 100, 0))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OutreachError::Target {
                source: RetryError::Exhausted { attempts: 3, .. },
                ..
            }
        ));
        assert_eq!(
            sleeper.calls(),
            vec![Duration::from_millis(50), Duration::from_millis(100)]
        );
    }

    #[tokio::test]
    async fn pauses_after_each_burst() {
        let platform = SimulatedPlatform::new().with_account(
            "alice",
            "1",
            vec![
                follower("2", "bob"),
                follower("3", "carol"),
                follower("4", "dan"),
                follower("5", "erin"),
            ],
        );
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();

        engine(&platform, &store, &sleeper, pacing(7, 2, 1000))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        let delay = Duration::from_millis(7);
        let pause = Duration::from_millis(1000);
        assert_eq!(
            sleeper.calls(),
            vec![delay, delay, pause, delay, delay, pause]
        );
    }

    #[tokio::test]
    async fn sweep_resolves_entries_without_user_id() {
        let platform = alice_platform();
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();
        // Left over from an earlier run against a target no longer listed.
        ledger.set_status("old-target", "carol", DeliveryStatus::Error, Some("x".into()));
        ledger.set_status("alice", "bob", DeliveryStatus::Success, None);
        ledger.set_status("alice", "carol", DeliveryStatus::Success, None);

        let report = engine(&platform, &store, &sleeper, pacing(0, 100, 0))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        assert_eq!(report.sent, 0);
        assert_eq!(report.resent, 1);
        assert_eq!(ledger.get_status("old-target", "carol"), RecipientStatus::Success);
        assert_eq!(platform.sent_to("3"), 1);
    }

    #[tokio::test]
    async fn from_settings_uses_configured_policy() {
        let platform = alice_platform();
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let settings = Settings {
            pacing: pacing(3, 100, 0),
            ..Settings::default()
        };
        let mut ledger = Ledger::new();

        DeliveryEngine::from_settings(&platform, &store, &settings, &sleeper, Some(1))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        assert_eq!(
            sleeper.calls(),
            vec![Duration::from_millis(3), Duration::from_millis(3)]
        );
    }

    /// Wraps a platform and reads the ledger file back at every send, so a
    /// test can see what a crash at that moment would have left behind.
    struct LedgerSnapshots<'a> {
        inner: &'a SimulatedPlatform,
        store: LedgerStore,
        seen: Mutex<Vec<(String, Ledger)>>,
    }

    impl<'a> LedgerSnapshots<'a> {
        fn new(inner: &'a SimulatedPlatform, store: &LedgerStore) -> Self {
            Self {
                inner,
                store: store.clone(),
                seen: Mutex::new(Vec::new()),
            }
        }

        /// Ledger on disk when the first send to `recipient_id` started.
        fn before_first_send_to(&self, recipient_id: &str) -> Ledger {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .find(|(id, _)| id == recipient_id)
                .map(|(_, ledger)| ledger.clone())
                .unwrap()
        }
    }

    #[async_trait]
    impl<'a> PlatformClient for LedgerSnapshots<'a> {
        async fn login(&self, username: &str, password: &str) -> std::result::Result<Session, PlatformError> {
            self.inner.login(username, password).await
        }

        async fn find_account(&self, username: &str) -> std::result::Result<Account, PlatformError> {
            self.inner.find_account(username).await
        }

        async fn list_followers(
            &self,
            account_id: &str,
        ) -> std::result::Result<Vec<Follower>, PlatformError> {
            self.inner.list_followers(account_id).await
        }

        async fn send_direct_message(
            &self,
            recipient_ids: &[String],
            text: &str,
        ) -> std::result::Result<(), PlatformError> {
            let on_disk = self.store.load();
            self.seen
                .lock()
                .unwrap()
                .push((recipient_ids.join(","), on_disk));
            self.inner.send_direct_message(recipient_ids, text).await
        }
    }

    #[tokio::test]
    async fn success_is_on_disk_before_next_send() {
        let platform = alice_platform();
        let (store, _dir) = store();
        let client = LedgerSnapshots::new(&platform, &store);
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();

        DeliveryEngine::new(
            &client,
            &store,
            RetryExecutor::new(RetryPolicy::new(3, 50, 2), &sleeper),
            Pacer::seeded(pacing(0, 100, 0), 11),
            &sleeper,
        )
        .run(&campaign(&["alice"]), &mut ledger)
        .await
        .unwrap();

        assert!(client.before_first_send_to("2").is_empty());
        let at_carol = client.before_first_send_to("3");
        assert_eq!(at_carol.get_status("alice", "bob"), RecipientStatus::Success);
        assert_eq!(at_carol.get_status("alice", "carol"), RecipientStatus::Unknown);
    }

    #[tokio::test]
    async fn failure_is_on_disk_before_next_send() {
        let platform = alice_platform()
            .fail_always("2", PlatformError::transport(500, "boom", SEND_ENDPOINT));
        let (store, _dir) = store();
        let client = LedgerSnapshots::new(&platform, &store);
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();

        DeliveryEngine::new(
            &client,
            &store,
            RetryExecutor::new(RetryPolicy::new(3, 50, 2), &sleeper),
            Pacer::seeded(pacing(0, 100, 0), 11),
            &sleeper,
        )
        .run(&campaign(&["alice"]), &mut ledger)
        .await
        .unwrap();

        let at_carol = client.before_first_send_to("3");
        let bob = at_carol.entry("alice", "bob").unwrap();
        assert_eq!(bob.status, DeliveryStatus::Error);
        assert!(bob.error.as_deref().unwrap().contains("500"));
        assert_eq!(bob.user_id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn sweep_pauses_after_each_burst() {
        let platform = alice_platform();
        let (store, _dir) = store();
        let sleeper = RecordingSleeper::new();
        let mut ledger = Ledger::new();
        ledger.set_status("alice", "bob", DeliveryStatus::Success, None);
        ledger.set_status("alice", "carol", DeliveryStatus::Success, None);
        ledger.set_status("old-target", "bob", DeliveryStatus::Error, Some("x".into()));
        ledger.set_status("old-target", "carol", DeliveryStatus::Error, Some("x".into()));

        let report = engine(&platform, &store, &sleeper, pacing(0, 1, 500))
            .run(&campaign(&["alice"]), &mut ledger)
            .await
            .unwrap();

        assert_eq!(report.sent, 0);
        assert_eq!(report.resent, 2);
        let delay = Duration::ZERO;
        let pause = Duration::from_millis(500);
        assert_eq!(sleeper.calls(), vec![delay, pause, delay, pause]);
    }
}
