//! Randomized send pacing: per-message delays, burst quotas and long pauses.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------------------------------------------------------------------
// PacingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Pausing is opt-in: both bounds default to zero.
    #[serde(default)]
    pub min_pause_ms: u64,
    #[serde(default)]
    pub max_pause_ms: u64,
    #[serde(default = "default_min_messages")]
    pub min_messages: u32,
    #[serde(default = "default_max_messages")]
    pub max_messages: u32,
}

fn default_min_delay_ms() -> u64 {
    10_000
}

fn default_max_delay_ms() -> u64 {
    40_000
}

fn default_min_messages() -> u32 {
    50
}

fn default_max_messages() -> u32 {
    100
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            min_pause_ms: 0,
            max_pause_ms: 0,
            min_messages: default_min_messages(),
            max_messages: default_max_messages(),
        }
    }
}

/// Uniform integer in `[min, max]`; inverted bounds are swapped.
fn random_between<R: Rng, T>(rng: &mut R, min: T, max: T) -> T
where
    T: rand::distributions::uniform::SampleUniform + PartialOrd + Copy,
{
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

// ---------------------------------------------------------------------------
// Pacer
// ---------------------------------------------------------------------------

/// Draws pacing values from configured bounds.
pub struct Pacer<R = StdRng> {
    config: PacingConfig,
    rng: R,
}

impl Pacer<StdRng> {
    pub fn new(config: PacingConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: PacingConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Pacer<R> {
    pub fn with_rng(config: PacingConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn random_delay(&mut self) -> Duration {
        let ms = random_between(
            &mut self.rng,
            self.config.min_delay_ms,
            self.config.max_delay_ms,
        );
        Duration::from_millis(ms)
    }

    /// How many successful sends make up one burst before a long pause.
    pub fn random_send_quota(&mut self) -> u32 {
        random_between(
            &mut self.rng,
            self.config.min_messages,
            self.config.max_messages,
        )
    }

    pub fn random_pause_duration(&mut self) -> Duration {
        let ms = random_between(
            &mut self.rng,
            self.config.min_pause_ms,
            self.config.max_pause_ms,
        );
        Duration::from_millis(ms)
    }

    /// Uniform pick from `items`; `None` only when `items` is empty.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..items.len());
        items.get(idx)
    }
}

// ---------------------------------------------------------------------------
// Throttle
// ---------------------------------------------------------------------------

/// Per-run burst counter. A quota is drawn when a burst starts and kept until
/// the burst ends with a pause.
#[derive(Debug, Default)]
pub struct Throttle {
    sent: u32,
    quota: Option<u32>,
}

impl Throttle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_since_pause(&self) -> u32 {
        self.sent
    }

    /// Count one successful send. Returns `true` when the burst quota has
    /// been reached and the caller should pause.
    pub fn record_send<R: Rng>(&mut self, pacer: &mut Pacer<R>) -> bool {
        let quota = *self.quota.get_or_insert_with(|| pacer.random_send_quota());
        self.sent += 1;
        self.sent >= quota
    }

    pub fn reset(&mut self) {
        self.sent = 0;
        self.quota = None;
    }
}
