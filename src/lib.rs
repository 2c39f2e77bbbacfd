//! Shattered Labyrinth - a roguelite arcade run simulator
//!
//! Core modules:
//! - `sim`: Deterministic run simulation (entities, combat, progression)
//! - `seed`: Daily seed/date provider with local calendar fallback
//! - `realm`: Deterministic realm-of-the-day selection
//! - `meta`: Persistent cross-run legacy profile (shards, upgrades, classes)
//! - `relic_log`: Fire-and-forget relic logging sink

pub mod meta;
pub mod realm;
pub mod relic_log;
pub mod seed;
pub mod sim;

pub use meta::MetaProfile;
pub use seed::SeedInfo;

/// Gameplay constants
///
/// Every tuning value the rules reference lives here by name so tests can
/// assert on them directly instead of chasing inlined literals.
pub mod consts {
    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 960.0;
    pub const ARENA_HEIGHT: f32 = 540.0;

    /// Maximum elapsed time consumed by a single tick (bounds integration
    /// error after a stall)
    pub const MAX_TICK_DT: f32 = 0.033;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_SPAWN_BOTTOM_MARGIN: f32 = 80.0;
    pub const DODGE_SPEED_MULT: f32 = 1.7;
    /// Invulnerability window granted after taking a hit
    pub const POST_HIT_INVULN: f32 = 0.8;

    /// Attacks
    pub const LIGHT_COOLDOWN: f32 = 0.35;
    pub const LIGHT_RADIUS: f32 = 50.0;
    pub const HEAVY_COOLDOWN: f32 = 1.0;
    pub const HEAVY_RADIUS: f32 = 70.0;
    /// Heavy attack hits for this multiple of player damage
    pub const HEAVY_DAMAGE_MULT: f32 = 2.0;
    /// Fallback skill cooldown for classes without a wired skill
    pub const GENERIC_SKILL_COOLDOWN: f32 = 8.0;
    pub const SHIELD_DOME_DURATION: f32 = 1.8;
    pub const CHRONO_BOLT_RADIUS: f32 = 6.0;
    pub const SNARE_TRAP_RADIUS: f32 = 40.0;
    pub const SNARE_TRAP_DURATION: f32 = 4.0;

    /// Spawn cadence: max(MIN, base - floor*FLOOR_STEP - stage*STAGE_STEP)
    pub const SPAWN_BASE_INTERVAL: f32 = 0.7;
    pub const SPAWN_BASE_INTERVAL_HARD: f32 = 0.55;
    pub const SPAWN_FLOOR_STEP: f32 = 0.02;
    pub const SPAWN_STAGE_STEP: f32 = 0.01;
    pub const SPAWN_MIN_INTERVAL: f32 = 0.15;
    /// Enemy kind roll: < GRUNT grunt, < SKITTER skitter, else brute
    pub const SPAWN_GRUNT_CUTOFF: f32 = 0.7;
    pub const SPAWN_SKITTER_CUTOFF: f32 = 0.9;
    pub const SPAWN_X_MARGIN: f32 = 20.0;
    pub const SPAWN_Y: f32 = -30.0;

    /// Enemies fall plus steer 35% of their speed toward the player on x
    pub const ENEMY_HOMING_FRAC: f32 = 0.35;
    /// Removed once below arena bottom by this margin
    pub const ENEMY_EXIT_MARGIN: f32 = 60.0;
    /// Snare traps push overlapped enemies back by this fraction of speed
    pub const TRAP_SLOW_FRAC: f32 = 0.6;

    /// Projectiles
    pub const PROJECTILE_LIFETIME: f32 = 2.0;
    pub const PROJECTILE_BOUNDS_MARGIN: f32 = 20.0;

    /// Boss
    pub const BOSS_STAGE: u32 = 3;
    pub const BOSS_BASE_HP: f32 = 600.0;
    pub const BOSS_HP_PER_FLOOR: f32 = 120.0;
    pub const BOSS_RADIUS: f32 = 40.0;
    pub const BOSS_SPAWN_Y: f32 = 100.0;
    pub const BOSS_CONTACT_DAMAGE: f32 = 14.0;
    /// Remaining-hp fractions that trigger phases 2 and 3
    pub const BOSS_PHASE2_FRAC: f32 = 0.66;
    pub const BOSS_PHASE3_FRAC: f32 = 0.33;
    pub const BOSS_CHASE_SPEED: [f32; 3] = [60.0, 90.0, 120.0];
    pub const BOSS_METEOR_CHANCE: [f32; 3] = [0.01, 0.02, 0.03];
    /// Forced stage advance when no boss shows up for this long
    pub const BOSS_PRESSURE_TIMEOUT: f32 = 30.0;

    /// Progression
    pub const STAGES_PER_FLOOR: u32 = 3;
    pub const FLOOR_CLEAR_HEAL: f32 = 20.0;

    /// Modifier choice cadence: BASE + rng * JITTER seconds
    pub const CHOICE_BASE_DELAY: f32 = 18.0;
    pub const CHOICE_DELAY_JITTER: f32 = 6.0;
    /// Shards granted immediately for accepting a curse
    pub const CURSE_SHARD_GRANT: u32 = 8;

    /// Kill rewards
    pub const KILL_SHARDS: u32 = 2;
    pub const HARD_MODE_KILL_BONUS: u32 = 1;
    pub const RELIC_DROP_CHANCE: f32 = 0.08;
    pub const BOSS_KILL_SHARDS: u32 = 30;

    /// End-of-run reward floor
    pub const MIN_REWARD_SHARDS: u32 = 5;

    /// Effect lifetimes (seconds)
    pub const SLASH_EFFECT_TIME: f32 = 0.15;
    pub const BOOM_EFFECT_TIME: f32 = 0.25;
    pub const HIT_EFFECT_TIME: f32 = 0.1;
    pub const HIT_EFFECT_RADIUS: f32 = 10.0;
    pub const CURSE_TICK_TIME: f32 = 9999.0;

    /// Meta upgrades: cost 50 * (level + 1), bonuses per level
    pub const UPGRADE_BASE_COST: u64 = 50;
    pub const UPGRADE_HP_PER_LEVEL: f32 = 10.0;
    pub const UPGRADE_DMG_PER_LEVEL: f32 = 2.0;
    pub const UPGRADE_SPD_PER_LEVEL: f32 = 8.0;
}
