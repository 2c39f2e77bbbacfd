//! Daily seed resolution
//!
//! Everyone playing on the same calendar date gets the same base seed, so
//! leaderboard comparisons are apples to apples. The canonical seed is the
//! FNV-1a hash of the ISO date string. When a provider fails, the caller
//! falls back to a weaker char-code-sum of the local date rather than
//! refusing to start a run.

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

/// A resolved daily seed and the date it derives from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedInfo {
    /// ISO date, `YYYY-MM-DD`
    pub date: String,
    pub seed: u32,
}

#[derive(Debug)]
pub struct SeedError(pub String);

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seed provider error: {}", self.0)
    }
}

impl std::error::Error for SeedError {}

/// Source of the daily seed. Implementations may consult a remote
/// authority; the bundled one hashes the local date.
pub trait SeedProvider {
    fn fetch(&self) -> Result<SeedInfo, SeedError>;
}

/// 32-bit FNV-1a over the UTF-8 bytes of a string
pub fn fnv1a(s: &str) -> u32 {
    let mut hash: u32 = 0x811C_9DC5;
    for b in s.bytes() {
        hash ^= b as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Sum of the char codes of a string; weak but dependency-free fallback.
/// Also drives the realm-of-the-day pick.
pub(crate) fn char_sum(s: &str) -> u32 {
    s.chars().map(|c| c as u32).sum()
}

fn local_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Canonical provider: FNV-1a of today's local date
#[derive(Debug, Default)]
pub struct FnvSeedProvider;

impl SeedProvider for FnvSeedProvider {
    fn fetch(&self) -> Result<SeedInfo, SeedError> {
        let date = local_date();
        let seed = fnv1a(&date);
        Ok(SeedInfo { date, seed })
    }
}

/// Resolve today's seed, degrading to the local fallback on provider
/// failure. Never fails: a run must always be startable.
pub fn resolve_daily_seed(provider: &dyn SeedProvider) -> SeedInfo {
    match provider.fetch() {
        Ok(info) => {
            log::info!("daily seed {:#010x} for {}", info.seed, info.date);
            info
        }
        Err(e) => {
            let date = local_date();
            let seed = char_sum(&date);
            log::warn!("{e}; falling back to local seed {seed:#010x} for {date}");
            SeedInfo { date, seed }
        }
    }
}
