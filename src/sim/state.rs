//! Run state and core simulation types
//!
//! The `Run` owns everything a session touches: the player, every entity
//! collection, the timers, the modifier accumulators and the RNG. There is
//! no ambient singleton; the tick driver and the choice-resolution handler
//! are the only two mutation paths, and they are mutually exclusive
//! (a pending choice makes ticks no-ops).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::classes::{ClassId, SkillKind};
use super::modifier::{self, ChoiceSet, OptionKind, RelicId};
use super::rng::Mulberry32;
use crate::consts::*;

/// Lifecycle state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Ticks advance the world
    Active,
    /// A modifier choice is open; ticks are suspended until it resolves
    ChoicePending,
    /// Run ended; no further mutation is accepted
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Player hp reached zero
    Defeat,
    /// External exit request
    Exit,
}

/// End-of-run payout, surfaced to the meta-progression store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub reason: TerminationReason,
    pub floor: u32,
    pub stage: u32,
    /// floor * 10 + stage
    pub floor_value: u32,
    /// max(5, elapsed/10 + relics*3 + floor_value)
    pub shards_gain: u32,
    pub relics: Vec<RelicId>,
    pub run_shards: u32,
    pub elapsed: f32,
}

/// The player avatar
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub max_hp: f32,
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
    /// Seconds of invulnerability remaining
    pub invulnerable: f32,
    pub cd_light: f32,
    pub cd_heavy: f32,
    pub cd_skill: f32,
    pub skill: SkillKind,
    pub skill_name: &'static str,
}

/// Hostile kinds and their fixed stat tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Skitter,
    Brute,
    /// Fast-falling hazard dropped by the boss
    Meteor,
}

impl EnemyKind {
    pub fn radius(&self) -> f32 {
        match self {
            EnemyKind::Grunt => 16.0,
            EnemyKind::Skitter => 12.0,
            EnemyKind::Brute => 20.0,
            EnemyKind::Meteor => 14.0,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Grunt => 90.0,
            EnemyKind::Skitter => 140.0,
            EnemyKind::Brute => 70.0,
            EnemyKind::Meteor => 200.0,
        }
    }

    pub fn max_hp(&self) -> f32 {
        match self {
            EnemyKind::Grunt => 25.0,
            EnemyKind::Skitter => 18.0,
            EnemyKind::Brute => 40.0,
            EnemyKind::Meteor => 20.0,
        }
    }

    pub fn contact_damage(&self) -> f32 {
        match self {
            EnemyKind::Brute => 16.0,
            EnemyKind::Meteor => 12.0,
            EnemyKind::Grunt | EnemyKind::Skitter => 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    /// Seconds alive in this run
    pub age: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        Self {
            kind,
            pos,
            radius: kind.radius(),
            hp: kind.max_hp(),
            speed: kind.speed(),
            age: 0.0,
        }
    }
}

/// Stage-3 boss; at most one per run at a time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub radius: f32,
    pub max_hp: f32,
    pub hp: f32,
    /// 1..=3, monotonically non-decreasing within a fight
    pub phase: u8,
    pub age: f32,
}

impl Boss {
    pub fn new(floor: u32) -> Self {
        let max_hp = BOSS_BASE_HP + BOSS_HP_PER_FLOOR * floor as f32;
        Self {
            pos: Vec2::new(ARENA_WIDTH / 2.0, BOSS_SPAWN_Y),
            radius: BOSS_RADIUS,
            max_hp,
            hp: max_hp,
            phase: 1,
            age: 0.0,
        }
    }

    /// Re-derive phase from the remaining-hp fraction; never reverts
    pub fn refresh_phase(&mut self) {
        let next = if self.hp <= self.max_hp * BOSS_PHASE3_FRAC {
            3
        } else if self.hp <= self.max_hp * BOSS_PHASE2_FRAC {
            2
        } else {
            1
        };
        self.phase = self.phase.max(next);
    }

    pub fn chase_speed(&self) -> f32 {
        BOSS_CHASE_SPEED[(self.phase - 1) as usize]
    }

    pub fn meteor_chance(&self) -> f32 {
        BOSS_METEOR_CHANCE[(self.phase - 1) as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Units per second
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub age: f32,
}

/// Transient visual/gameplay markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Slash,
    Boom,
    /// Slows enemies overlapping it each frame while alive
    Trap,
    Hit,
    CurseTick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub pos: Vec2,
    pub radius: f32,
    pub remaining: f32,
}

impl Effect {
    pub fn new(kind: EffectKind, pos: Vec2, radius: f32, remaining: f32) -> Self {
        Self {
            kind,
            pos,
            radius,
            remaining,
        }
    }

    /// Positionless marker (curse ticks)
    pub fn marker(kind: EffectKind, remaining: f32) -> Self {
        Self::new(kind, Vec2::ZERO, 0.0, remaining)
    }
}

/// Accumulated elapsed-time counters driving spawning and progression
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timers {
    /// Counts up to the spawn interval
    pub spawn: f32,
    /// Counts down to the next modifier choice
    pub choice: f32,
    /// Counts up while no boss is alive; forces stage advance at timeout
    pub boss: f32,
}

/// Flat stat bonuses from permanent meta upgrades
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBonuses {
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
}

/// Everything needed to start a run
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub class: ClassId,
    pub hard_mode: bool,
    /// External daily seed; mixed with the class salt inside the run
    pub daily_seed: u32,
    pub bonuses: StatBonuses,
}

/// One play session from start to terminal state
#[derive(Debug, Clone)]
pub struct Run {
    pub class: ClassId,
    pub hard_mode: bool,
    pub floor: u32,
    pub stage: u32,
    pub elapsed: f32,
    pub shards: u32,
    /// Ordered acquisition history
    pub relics: Vec<RelicId>,
    /// Fragile curse accumulator: extra fraction of damage taken
    pub extra_damage_taken: f32,
    /// Silenced curse accumulator: additive heavy-cooldown multiplier
    pub heavy_cooldown_mult: f32,
    /// Shard Magnet accumulator: extra shards per kill
    pub shard_bonus: u32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Effect>,
    pub boss: Option<Boss>,
    pub timers: Timers,
    pub phase: RunPhase,
    pub pending_choice: Option<ChoiceSet>,
    pub outcome: Option<RunOutcome>,
    pub(crate) rng: Mulberry32,
}

impl Run {
    /// Idle -> Active: build a run from the daily seed, class choice and
    /// permanent upgrade bonuses
    pub fn new(config: RunConfig) -> Self {
        let stats = config.class.stats();
        let mut rng = Mulberry32::new(config.daily_seed ^ config.class.seed_salt());
        let first_choice_delay = CHOICE_BASE_DELAY + rng.next_f32() * CHOICE_DELAY_JITTER;

        let max_hp = stats.max_hp + config.bonuses.hp;
        let player = Player {
            pos: Vec2::new(
                ARENA_WIDTH / 2.0,
                ARENA_HEIGHT - PLAYER_SPAWN_BOTTOM_MARGIN,
            ),
            radius: PLAYER_RADIUS,
            max_hp,
            hp: max_hp,
            damage: stats.damage + config.bonuses.damage,
            speed: stats.speed + config.bonuses.speed,
            invulnerable: 0.0,
            cd_light: 0.0,
            cd_heavy: 0.0,
            cd_skill: 0.0,
            skill: stats.skill,
            skill_name: stats.skill_name,
        };

        log::info!(
            "run started: class={} hard={} seed={:#010x}",
            config.class.name(),
            config.hard_mode,
            config.daily_seed ^ config.class.seed_salt()
        );

        Self {
            class: config.class,
            hard_mode: config.hard_mode,
            floor: 1,
            stage: 1,
            elapsed: 0.0,
            shards: 0,
            relics: Vec::new(),
            extra_damage_taken: 0.0,
            heavy_cooldown_mult: 0.0,
            shard_bonus: 0,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            boss: None,
            timers: Timers {
                spawn: 0.0,
                choice: first_choice_delay,
                boss: 0.0,
            },
            phase: RunPhase::Active,
            pending_choice: None,
            outcome: None,
            rng,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == RunPhase::Terminal
    }

    pub fn is_choice_pending(&self) -> bool {
        self.phase == RunPhase::ChoicePending
    }

    /// Heavy cooldown after curse inflation
    pub fn heavy_cooldown(&self) -> f32 {
        HEAVY_COOLDOWN * (1.0 + self.heavy_cooldown_mult)
    }

    /// Apply damage to the player, honoring invulnerability and the
    /// Fragile accumulator; clamps hp at zero
    pub(crate) fn damage_player(&mut self, amount: f32) {
        if self.player.invulnerable > 0.0 {
            return;
        }
        let scaled = amount * (1.0 + self.extra_damage_taken);
        self.player.hp = (self.player.hp - scaled).max(0.0);
        self.player.invulnerable = POST_HIT_INVULN;
    }

    /// Apply damage to one enemy; on the killing blow, grant shards and
    /// roll the automatic relic drop. The corpse is swept by the caller,
    /// so hits landing on it before the sweep grant nothing.
    pub(crate) fn damage_enemy(&mut self, idx: usize, amount: f32) {
        let (pos, died) = {
            let e = &mut self.enemies[idx];
            let was_alive = e.hp > 0.0;
            e.hp -= amount;
            (e.pos, was_alive && e.hp <= 0.0)
        };
        self.effects.push(Effect::new(
            EffectKind::Hit,
            pos,
            HIT_EFFECT_RADIUS,
            HIT_EFFECT_TIME,
        ));
        if died {
            let hard_bonus = if self.hard_mode { HARD_MODE_KILL_BONUS } else { 0 };
            self.shards += KILL_SHARDS + hard_bonus + self.shard_bonus;
            if self.rng.next_f32() < RELIC_DROP_CHANCE {
                self.relics.push(RelicId::ShardOfFate);
                log::debug!("relic drop at floor {}-{}", self.floor, self.stage);
            }
        }
    }

    pub(crate) fn spawn_enemy(&mut self, kind: EnemyKind, x: f32) {
        self.enemies.push(Enemy::new(kind, Vec2::new(x, SPAWN_Y)));
    }

    /// Stage += 1; past the last stage, wrap to the next floor and heal
    pub(crate) fn advance_stage(&mut self) {
        self.stage += 1;
        self.timers.boss = 0.0;
        if self.stage > STAGES_PER_FLOOR {
            self.stage = 1;
            self.floor += 1;
            self.player.hp = (self.player.hp + FLOOR_CLEAR_HEAL).min(self.player.max_hp);
            log::info!("floor {} reached", self.floor);
        }
    }

    /// Open a modifier choice, unless the run is already decided
    pub(crate) fn open_choice(&mut self) {
        if self.phase != RunPhase::Active || self.player.hp <= 0.0 {
            return;
        }
        let set = ChoiceSet::roll(&mut self.rng);
        self.pending_choice = Some(set);
        self.phase = RunPhase::ChoicePending;
    }

    /// Resolve the pending choice with the selected option index.
    ///
    /// Rejects out-of-range indices without touching run state. Resolving
    /// with no pending choice is an invariant violation: asserted in debug
    /// builds, ignored in release.
    pub fn resolve_choice(&mut self, index: usize) -> bool {
        debug_assert!(
            self.pending_choice.is_some(),
            "choice resolved with no pending choice"
        );
        let Some(set) = self.pending_choice.take() else {
            log::warn!("resolve_choice with no pending choice; ignored");
            return false;
        };
        let Some(option) = set.options.get(index).copied() else {
            log::warn!("choice index {index} out of range; ignored");
            self.pending_choice = Some(set);
            return false;
        };

        modifier::apply_effect(self, option.effect);
        match option.kind {
            OptionKind::Relic(id) => {
                self.relics.push(id);
                log::info!("relic chosen: {}", id.name());
            }
            OptionKind::Curse(id) => {
                self.shards += CURSE_SHARD_GRANT;
                log::info!("curse accepted: {}", id.name());
            }
        }

        self.phase = RunPhase::Active;
        true
    }

    /// Active -> Terminal. Idempotent: a second call returns the stored
    /// outcome untouched.
    pub fn finish(&mut self, reason: TerminationReason) -> &RunOutcome {
        if self.outcome.is_none() {
            let floor_value = self.floor * 10 + self.stage;
            let base =
                (self.elapsed / 10.0).floor() as u32 + self.relics.len() as u32 * 3 + floor_value;
            let shards_gain = base.max(MIN_REWARD_SHARDS);

            self.phase = RunPhase::Terminal;
            self.pending_choice = None;
            log::info!(
                "run over ({reason:?}): floor {}-{}, {} shards gained, {} relics",
                self.floor,
                self.stage,
                shards_gain,
                self.relics.len()
            );

            self.outcome = Some(RunOutcome {
                reason,
                floor: self.floor,
                stage: self.stage,
                floor_value,
                shards_gain,
                relics: self.relics.clone(),
                run_shards: self.shards,
                elapsed: self.elapsed,
            });
        }
        match &self.outcome {
            Some(outcome) => outcome,
            None => unreachable!("terminal run always stores an outcome"),
        }
    }

    /// Read-only view for the renderer; the core never reads back from it
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot {
            hud: Hud {
                floor: self.floor,
                stage: self.stage,
                relic_count: self.relics.len(),
                hp: self.player.hp,
                max_hp: self.player.max_hp,
                shards: self.shards,
            },
            player: self.player.clone(),
            enemies: self.enemies.clone(),
            boss: self.boss.clone(),
            projectiles: self.projectiles.clone(),
            effects: self.effects.clone(),
        }
    }
}

/// Derived HUD fields refreshed every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub floor: u32,
    pub stage: u32,
    pub relic_count: usize,
    pub hp: f32,
    pub max_hp: f32,
    pub shards: u32,
}

/// Per-tick read-only snapshot consumed by presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub hud: Hud,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<Effect>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_run() -> Run {
        Run::new(RunConfig {
            class: ClassId::Warrior,
            hard_mode: false,
            daily_seed: 0x1234,
            bonuses: StatBonuses::default(),
        })
    }

    #[test]
    fn new_run_applies_upgrade_bonuses() {
        let run = Run::new(RunConfig {
            class: ClassId::Mage,
            hard_mode: false,
            daily_seed: 1,
            bonuses: StatBonuses {
                hp: 20.0,
                damage: 4.0,
                speed: 16.0,
            },
        });
        assert_eq!(run.player.max_hp, 110.0);
        assert_eq!(run.player.damage, 14.0);
        assert_eq!(run.player.speed, 256.0);
        assert_eq!(run.player.hp, run.player.max_hp);
    }

    #[test]
    fn boss_phases_monotone_at_thresholds() {
        // floor 1 -> max_hp 720
        let mut boss = Boss::new(1);
        assert_eq!(boss.max_hp, 720.0);
        assert_eq!(boss.phase, 1);

        boss.hp = 480.0;
        boss.refresh_phase();
        assert_eq!(boss.phase, 1);

        boss.hp = 475.2;
        boss.refresh_phase();
        assert_eq!(boss.phase, 2);

        boss.hp = 240.0;
        boss.refresh_phase();
        assert_eq!(boss.phase, 2);

        boss.hp = 237.6;
        boss.refresh_phase();
        assert_eq!(boss.phase, 3);

        // Never reverts even if hp were restored
        boss.hp = boss.max_hp;
        boss.refresh_phase();
        assert_eq!(boss.phase, 3);
    }

    #[test]
    fn reward_formula_example() {
        let mut run = test_run();
        run.floor = 2;
        run.stage = 3;
        run.elapsed = 47.0;
        run.relics = vec![RelicId::AegisCore, RelicId::ShardOfFate];
        let outcome = run.finish(TerminationReason::Exit);
        assert_eq!(outcome.floor_value, 23);
        assert_eq!(outcome.shards_gain, 33);
    }

    #[test]
    fn reward_floor_applies() {
        let mut run = test_run();
        // floor 1, stage 1, no time, no relics -> 0 + 0 + 11 = 11 > 5
        let outcome = run.finish(TerminationReason::Exit).clone();
        assert_eq!(outcome.shards_gain, 11);

        // Formula floor: a value below MIN_REWARD_SHARDS is clamped up
        assert_eq!(MIN_REWARD_SHARDS, 5);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut run = test_run();
        run.floor = 3;
        run.elapsed = 25.0;
        let first = run.finish(TerminationReason::Defeat).clone();
        let second = run.finish(TerminationReason::Exit).clone();
        assert_eq!(first, second);
        assert_eq!(second.reason, TerminationReason::Defeat);
        assert!(run.is_terminal());
    }

    #[test]
    fn fragile_scales_player_damage() {
        let mut run = test_run();
        run.extra_damage_taken = 0.2;
        let hp0 = run.player.hp;
        run.damage_player(10.0);
        assert_eq!(run.player.hp, hp0 - 12.0);
        assert_eq!(run.player.invulnerable, POST_HIT_INVULN);

        // Second hit inside the invulnerability window is ignored
        run.damage_player(50.0);
        assert_eq!(run.player.hp, hp0 - 12.0);
    }

    #[test]
    fn player_hp_clamps_at_zero() {
        let mut run = test_run();
        run.damage_player(10_000.0);
        assert_eq!(run.player.hp, 0.0);
    }

    #[test]
    fn kill_rewards_include_hard_and_magnet_bonuses() {
        let mut run = Run::new(RunConfig {
            class: ClassId::Warrior,
            hard_mode: true,
            daily_seed: 5,
            bonuses: StatBonuses::default(),
        });
        run.shard_bonus = 1;
        run.spawn_enemy(EnemyKind::Grunt, 100.0);
        run.damage_enemy(0, 1_000.0);
        assert_eq!(run.shards, KILL_SHARDS + HARD_MODE_KILL_BONUS + 1);
    }

    #[test]
    fn stage_wrap_heals_and_advances_floor() {
        let mut run = test_run();
        run.player.hp = 50.0;
        run.stage = 3;
        run.advance_stage();
        assert_eq!(run.stage, 1);
        assert_eq!(run.floor, 2);
        assert_eq!(run.player.hp, 70.0);
        assert_eq!(run.timers.boss, 0.0);
    }

    #[test]
    fn resolve_choice_rejects_bad_index() {
        let mut run = test_run();
        run.open_choice();
        assert!(run.is_choice_pending());
        assert!(!run.resolve_choice(3));
        assert!(run.is_choice_pending());
        assert!(run.resolve_choice(0));
        assert_eq!(run.phase, RunPhase::Active);
    }

    #[test]
    fn choosing_a_curse_grants_shards() {
        let mut run = test_run();
        run.open_choice();
        // Index 2 is always the curse slot
        assert!(run.resolve_choice(2));
        assert_eq!(run.shards, CURSE_SHARD_GRANT);
        assert!(run.relics.is_empty());
        assert!(run.extra_damage_taken > 0.0 || run.heavy_cooldown_mult > 0.0);
    }

    #[test]
    fn choice_skipped_when_player_down() {
        let mut run = test_run();
        run.player.hp = 0.0;
        run.open_choice();
        assert!(!run.is_choice_pending());
    }

    #[test]
    #[should_panic(expected = "no pending choice")]
    fn resolve_without_pending_panics_in_debug() {
        let mut run = test_run();
        run.resolve_choice(0);
    }
}
