//! Character classes: base stats, skill wiring, and the seed salt that
//! mixes the class choice into the daily seed.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Playable character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassId {
    Warrior,
    Mage,
    Ranger,
    Trickster,
    Engineer,
    Timekeeper,
}

/// Skill behavior dispatched on use
///
/// Classes whose skills are not wired into the rules fall back to
/// `Generic`: an 8-second cooldown with no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    /// Temporary invulnerability bubble
    ShieldDome,
    /// Single bolt fired at the nearest enemy
    ChronoBlast,
    /// Slowing ground trap at the player's position
    SnareTrap,
    Generic,
}

/// Base stats before permanent meta upgrades are applied
#[derive(Debug, Clone, Copy)]
pub struct ClassStats {
    pub max_hp: f32,
    pub damage: f32,
    pub speed: f32,
    pub skill_cooldown: f32,
    pub skill: SkillKind,
    pub skill_name: &'static str,
}

impl ClassId {
    pub const ALL: [ClassId; 6] = [
        ClassId::Warrior,
        ClassId::Mage,
        ClassId::Ranger,
        ClassId::Trickster,
        ClassId::Engineer,
        ClassId::Timekeeper,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ClassId::Warrior => "Warrior",
            ClassId::Mage => "Mage",
            ClassId::Ranger => "Ranger",
            ClassId::Trickster => "Trickster",
            ClassId::Engineer => "Engineer",
            ClassId::Timekeeper => "Timekeeper",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub fn stats(&self) -> ClassStats {
        match self {
            ClassId::Warrior => ClassStats {
                max_hp: 120.0,
                damage: 12.0,
                speed: 230.0,
                skill_cooldown: 8.0,
                skill: SkillKind::ShieldDome,
                skill_name: "Shield Dome",
            },
            ClassId::Mage => ClassStats {
                max_hp: 90.0,
                damage: 10.0,
                speed: 240.0,
                skill_cooldown: 6.0,
                skill: SkillKind::ChronoBlast,
                skill_name: "Chrono Blast",
            },
            ClassId::Ranger => ClassStats {
                max_hp: 100.0,
                damage: 11.0,
                speed: 250.0,
                skill_cooldown: 7.0,
                skill: SkillKind::SnareTrap,
                skill_name: "Snare Trap",
            },
            ClassId::Trickster => ClassStats {
                max_hp: 95.0,
                damage: 9.0,
                speed: 260.0,
                skill_cooldown: GENERIC_SKILL_COOLDOWN,
                skill: SkillKind::Generic,
                skill_name: "Decoy",
            },
            ClassId::Engineer => ClassStats {
                max_hp: 110.0,
                damage: 9.0,
                speed: 225.0,
                skill_cooldown: GENERIC_SKILL_COOLDOWN,
                skill: SkillKind::Generic,
                skill_name: "Turret",
            },
            ClassId::Timekeeper => ClassStats {
                max_hp: 85.0,
                damage: 10.0,
                speed: 240.0,
                skill_cooldown: GENERIC_SKILL_COOLDOWN,
                skill: SkillKind::Generic,
                skill_name: "Time Slow",
            },
        }
    }

    /// Mixed into the daily seed so each class gets its own run sequence
    pub fn seed_salt(&self) -> u32 {
        self.name().len() as u32 * 7919
    }
}
