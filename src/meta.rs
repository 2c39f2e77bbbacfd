//! Persistent legacy profile
//!
//! Cross-run progression: banked shards, best floor, permanent stat
//! upgrades and unlocked classes. Persisted as JSON on disk; a missing or
//! corrupt file yields the default profile rather than an error, so a bad
//! save never blocks play.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{ClassId, RunOutcome, StatBonuses};

/// The three purchasable upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    MaxHp,
    Damage,
    Speed,
}

/// Levels bought on each track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpgradeLevels {
    pub hp: u32,
    pub dmg: u32,
    pub spd: u32,
}

impl UpgradeLevels {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::MaxHp => self.hp,
            UpgradeKind::Damage => self.dmg,
            UpgradeKind::Speed => self.spd,
        }
    }

    /// Flat stat bonuses these levels grant at run start
    pub fn bonuses(&self) -> StatBonuses {
        StatBonuses {
            hp: self.hp as f32 * UPGRADE_HP_PER_LEVEL,
            damage: self.dmg as f32 * UPGRADE_DMG_PER_LEVEL,
            speed: self.spd as f32 * UPGRADE_SPD_PER_LEVEL,
        }
    }
}

/// Shard price of the next level on a track
pub fn upgrade_cost(current_level: u32) -> u64 {
    UPGRADE_BASE_COST * (current_level as u64 + 1)
}

/// Everything that survives between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaProfile {
    /// Banked shard balance
    pub shards: u64,
    /// Best floor value (floor * 10 + stage) ever reached
    pub best_floor: u32,
    pub upgrades: UpgradeLevels,
    pub unlocked: Vec<ClassId>,
    /// Date of the last run, for daily-streak display
    pub last_seed_date: Option<String>,
}

impl Default for MetaProfile {
    fn default() -> Self {
        Self {
            shards: 0,
            best_floor: 0,
            upgrades: UpgradeLevels::default(),
            unlocked: vec![ClassId::Warrior, ClassId::Mage, ClassId::Ranger],
            last_seed_date: None,
        }
    }
}

impl MetaProfile {
    pub fn is_unlocked(&self, class: ClassId) -> bool {
        self.unlocked.contains(&class)
    }

    /// Buy one level on a track. Rejects the purchase when shards fall
    /// short, leaving the profile untouched.
    pub fn purchase(&mut self, kind: UpgradeKind) -> bool {
        let cost = upgrade_cost(self.upgrades.level(kind));
        if self.shards < cost {
            log::warn!(
                "upgrade {kind:?} rejected: costs {cost}, have {}",
                self.shards
            );
            return false;
        }
        self.shards -= cost;
        match kind {
            UpgradeKind::MaxHp => self.upgrades.hp += 1,
            UpgradeKind::Damage => self.upgrades.dmg += 1,
            UpgradeKind::Speed => self.upgrades.spd += 1,
        }
        log::info!(
            "upgrade {kind:?} -> level {} ({} shards left)",
            self.upgrades.level(kind),
            self.shards
        );
        true
    }

    /// Bank a finished run: credit the reward and update the best floor
    /// value. Only the computed reward is banked; shards picked up during
    /// the run are already folded into it.
    pub fn record_outcome(&mut self, outcome: &RunOutcome, seed_date: &str) {
        self.shards += outcome.shards_gain as u64;
        self.best_floor = self.best_floor.max(outcome.floor_value);
        self.last_seed_date = Some(seed_date.to_string());
    }

    /// Load from disk; missing or corrupt files yield the default profile
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(profile) => {
                    log::info!("profile loaded from {}", path.display());
                    profile
                }
                Err(e) => {
                    log::warn!("corrupt profile at {}: {e}; starting fresh", path.display());
                    Self::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no profile at {}; starting fresh", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("cannot read {}: {e}; starting fresh", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)?;
        log::info!("profile saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RelicId, TerminationReason};

    fn outcome(floor: u32, shards_gain: u32) -> RunOutcome {
        RunOutcome {
            reason: TerminationReason::Defeat,
            floor,
            stage: 1,
            floor_value: floor * 10 + 1,
            shards_gain,
            relics: vec![RelicId::Godspark],
            run_shards: 12,
            elapsed: 60.0,
        }
    }

    #[test]
    fn default_unlocks_starter_classes() {
        let profile = MetaProfile::default();
        assert!(profile.is_unlocked(ClassId::Warrior));
        assert!(profile.is_unlocked(ClassId::Mage));
        assert!(profile.is_unlocked(ClassId::Ranger));
        assert!(!profile.is_unlocked(ClassId::Trickster));
    }

    #[test]
    fn cost_scales_with_level() {
        assert_eq!(upgrade_cost(0), 50);
        assert_eq!(upgrade_cost(1), 100);
        assert_eq!(upgrade_cost(4), 250);
    }

    #[test]
    fn purchase_spends_and_levels() {
        let mut profile = MetaProfile {
            shards: 160,
            ..Default::default()
        };
        assert!(profile.purchase(UpgradeKind::MaxHp));
        assert_eq!(profile.shards, 110);
        assert_eq!(profile.upgrades.hp, 1);

        // Second level costs 100
        assert!(profile.purchase(UpgradeKind::MaxHp));
        assert_eq!(profile.shards, 10);
        assert_eq!(profile.upgrades.hp, 2);
    }

    #[test]
    fn purchase_rejected_when_short() {
        let mut profile = MetaProfile {
            shards: 49,
            ..Default::default()
        };
        assert!(!profile.purchase(UpgradeKind::Damage));
        assert_eq!(profile.shards, 49);
        assert_eq!(profile.upgrades.dmg, 0);
    }

    #[test]
    fn bonuses_per_level() {
        let levels = UpgradeLevels {
            hp: 2,
            dmg: 3,
            spd: 1,
        };
        let b = levels.bonuses();
        assert_eq!(b.hp, 20.0);
        assert_eq!(b.damage, 6.0);
        assert_eq!(b.speed, 8.0);
    }

    #[test]
    fn record_outcome_banks_reward_only() {
        let mut profile = MetaProfile::default();
        profile.record_outcome(&outcome(4, 47), "2025-08-24");
        assert_eq!(profile.shards, 47);
        assert_eq!(profile.best_floor, 41);
        assert_eq!(profile.last_seed_date.as_deref(), Some("2025-08-24"));

        // Shallower run never lowers the best
        profile.record_outcome(&outcome(2, 11), "2025-08-25");
        assert_eq!(profile.best_floor, 41);
        assert_eq!(profile.shards, 58);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("shattered-labyrinth-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("profile-roundtrip.json");

        let mut profile = MetaProfile::default();
        profile.shards = 321;
        profile.upgrades.spd = 2;
        profile.save(&path).unwrap();

        assert_eq!(MetaProfile::load(&path), profile);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn corrupt_or_missing_file_yields_default() {
        let dir = std::env::temp_dir().join("shattered-labyrinth-test");
        fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("does-not-exist.json");
        assert_eq!(MetaProfile::load(&missing), MetaProfile::default());

        let corrupt = dir.join("profile-corrupt.json");
        fs::write(&corrupt, "{not json").unwrap();
        assert_eq!(MetaProfile::load(&corrupt), MetaProfile::default());
        fs::remove_file(&corrupt).ok();
    }
}
