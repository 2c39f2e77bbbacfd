//! Fixed-order frame advancement
//!
//! One `tick` call advances the run by at most `MAX_TICK_DT` seconds,
//! applying the sub-steps in a fixed order so identical input streams on
//! identical seeds replay identically:
//!
//! 1. cooldown and invulnerability decay
//! 2. player movement
//! 3. attacks and skill activation
//! 4. enemy spawning
//! 5. enemy motion and corpse/exit sweep
//! 6. projectile motion and hits
//! 7. effect decay and trap slows
//! 8. boss logic
//! 9. enemy contact damage
//! 10. choice countdown
//! 11. boss pressure timeout
//! 12. terminal check
//!
//! A pending choice suspends everything: the call returns before step 1.

use glam::Vec2;

use super::classes::SkillKind;
use super::collision::{circles_hit, nearest_enemy};
use super::modifier::RelicId;
use super::state::{Effect, EffectKind, EnemyKind, Projectile, Run, TerminationReason};
use crate::consts::*;

/// Player intent for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub dodge: bool,
    pub light_attack: bool,
    pub heavy_attack: bool,
    pub skill: bool,
}

/// Advance the run by one frame.
///
/// Ticking a terminal run is an invariant violation: asserted in debug
/// builds, logged and ignored in release. Ticking while a choice is
/// pending is a normal no-op.
pub fn tick(run: &mut Run, input: &TickInput, dt: f32) {
    debug_assert!(!run.is_terminal(), "tick on terminal run");
    if run.is_terminal() {
        log::warn!("tick on terminal run; ignored");
        return;
    }
    if run.is_choice_pending() {
        return;
    }

    let dt = dt.clamp(0.0, MAX_TICK_DT);
    run.elapsed += dt;

    decay_cooldowns(run, dt);
    move_player(run, input, dt);
    apply_attacks(run, input);
    step_spawns(run, dt);
    step_enemies(run, dt);
    step_projectiles(run, dt);
    step_effects(run, dt);
    step_boss(run, dt);
    enemy_contacts(run);

    run.timers.choice -= dt;
    if run.timers.choice <= 0.0 {
        // Re-rolled at every firing, even when opening is skipped
        run.timers.choice = CHOICE_BASE_DELAY + run.rng.next_f32() * CHOICE_DELAY_JITTER;
        run.open_choice();
    }

    // Stalled progression without a boss forces the stage forward
    if run.boss.is_none() {
        run.timers.boss += dt;
        if run.timers.boss > BOSS_PRESSURE_TIMEOUT {
            log::debug!("pressure timeout at floor {}-{}", run.floor, run.stage);
            run.advance_stage();
        }
    }

    if run.player.hp <= 0.0 {
        run.finish(TerminationReason::Defeat);
    }
}

fn decay_cooldowns(run: &mut Run, dt: f32) {
    let p = &mut run.player;
    p.cd_light = (p.cd_light - dt).max(0.0);
    p.cd_heavy = (p.cd_heavy - dt).max(0.0);
    p.cd_skill = (p.cd_skill - dt).max(0.0);
    p.invulnerable = (p.invulnerable - dt).max(0.0);
}

fn move_player(run: &mut Run, input: &TickInput, dt: f32) {
    let mut dir = Vec2::ZERO;
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    let dir = dir.normalize_or_zero();
    let speed = run.player.speed * if input.dodge { DODGE_SPEED_MULT } else { 1.0 };

    let p = &mut run.player;
    p.pos += dir * speed * dt;
    p.pos.x = p.pos.x.clamp(p.radius, ARENA_WIDTH - p.radius);
    p.pos.y = p.pos.y.clamp(p.radius, ARENA_HEIGHT - p.radius);
}

/// Area strike centered on the player; hits every living enemy in range
/// and the boss
fn melee_strike(run: &mut Run, radius: f32, damage: f32) {
    let origin = run.player.pos;
    let hits: Vec<usize> = run
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.hp > 0.0 && circles_hit(origin, radius, e.pos, e.radius))
        .map(|(i, _)| i)
        .collect();
    for i in hits {
        run.damage_enemy(i, damage);
    }
    if let Some(boss) = run.boss.as_mut() {
        if circles_hit(origin, radius, boss.pos, boss.radius) {
            boss.hp -= damage;
            boss.refresh_phase();
            run.effects.push(Effect::new(
                EffectKind::Hit,
                boss.pos,
                HIT_EFFECT_RADIUS,
                HIT_EFFECT_TIME,
            ));
        }
    }
}

fn apply_attacks(run: &mut Run, input: &TickInput) {
    if input.light_attack && run.player.cd_light <= 0.0 {
        run.player.cd_light = LIGHT_COOLDOWN;
        run.effects.push(Effect::new(
            EffectKind::Slash,
            run.player.pos,
            LIGHT_RADIUS,
            SLASH_EFFECT_TIME,
        ));
        melee_strike(run, LIGHT_RADIUS, run.player.damage);
    }

    if input.heavy_attack && run.player.cd_heavy <= 0.0 {
        run.player.cd_heavy = run.heavy_cooldown();
        run.effects.push(Effect::new(
            EffectKind::Boom,
            run.player.pos,
            HEAVY_RADIUS,
            BOOM_EFFECT_TIME,
        ));
        melee_strike(run, HEAVY_RADIUS, run.player.damage * HEAVY_DAMAGE_MULT);
    }

    if input.skill && run.player.cd_skill <= 0.0 {
        use_skill(run);
    }
}

fn use_skill(run: &mut Run) {
    let cooldown = run.class.stats().skill_cooldown;
    match run.player.skill {
        SkillKind::ShieldDome => {
            run.player.invulnerable = run.player.invulnerable.max(SHIELD_DOME_DURATION);
        }
        SkillKind::ChronoBlast => {
            // Bolt crosses to its target in exactly one second
            let target = nearest_enemy(&run.enemies, run.player.pos)
                .map(|i| run.enemies[i].pos)
                .or_else(|| run.boss.as_ref().map(|b| b.pos));
            if let Some(target) = target {
                run.projectiles.push(Projectile {
                    pos: run.player.pos,
                    vel: target - run.player.pos,
                    radius: CHRONO_BOLT_RADIUS,
                    damage: run.player.damage * 2.0,
                    age: 0.0,
                });
            }
        }
        SkillKind::SnareTrap => {
            run.effects.push(Effect::new(
                EffectKind::Trap,
                run.player.pos,
                SNARE_TRAP_RADIUS,
                SNARE_TRAP_DURATION,
            ));
        }
        SkillKind::Generic => {}
    }
    run.player.cd_skill = cooldown;
    log::debug!("skill used: {}", run.player.skill_name);
}

/// Current spawn interval; tightens with floor and stage, never below the
/// minimum
fn spawn_interval(run: &Run) -> f32 {
    let base = if run.hard_mode {
        SPAWN_BASE_INTERVAL_HARD
    } else {
        SPAWN_BASE_INTERVAL
    };
    (base - SPAWN_FLOOR_STEP * run.floor as f32 - SPAWN_STAGE_STEP * run.stage as f32)
        .max(SPAWN_MIN_INTERVAL)
}

fn step_spawns(run: &mut Run, dt: f32) {
    run.timers.spawn += dt;
    if run.timers.spawn >= spawn_interval(run) {
        run.timers.spawn = 0.0;
        let roll = run.rng.next_f32();
        let kind = if roll < SPAWN_GRUNT_CUTOFF {
            EnemyKind::Grunt
        } else if roll < SPAWN_SKITTER_CUTOFF {
            EnemyKind::Skitter
        } else {
            EnemyKind::Brute
        };
        let x = SPAWN_X_MARGIN + run.rng.next_f32() * (ARENA_WIDTH - 2.0 * SPAWN_X_MARGIN);
        run.spawn_enemy(kind, x);
    }
}

fn step_enemies(run: &mut Run, dt: f32) {
    let player = run.player.pos;
    for e in &mut run.enemies {
        e.age += dt;
        e.pos.y += e.speed * dt;
        // Horizontal homing, scaled by the cosine toward the player
        let delta = player - e.pos;
        let d = delta.length();
        if d > 0.0 {
            e.pos.x += delta.x / d * e.speed * ENEMY_HOMING_FRAC * dt;
        }
    }
    run.enemies
        .retain(|e| e.hp > 0.0 && e.pos.y <= ARENA_HEIGHT + ENEMY_EXIT_MARGIN);
}

fn step_projectiles(run: &mut Run, dt: f32) {
    let mut i = 0;
    while i < run.projectiles.len() {
        {
            let p = &mut run.projectiles[i];
            p.pos += p.vel * dt;
            p.age += dt;
        }
        let p = run.projectiles[i].clone();

        // First hostile hit consumes the projectile
        let enemy_hit = run
            .enemies
            .iter()
            .position(|e| e.hp > 0.0 && circles_hit(p.pos, p.radius, e.pos, e.radius));
        if let Some(idx) = enemy_hit {
            run.projectiles.swap_remove(i);
            run.damage_enemy(idx, p.damage);
            continue;
        }
        if let Some(boss) = run.boss.as_mut() {
            if circles_hit(p.pos, p.radius, boss.pos, boss.radius) {
                boss.hp -= p.damage;
                boss.refresh_phase();
                run.projectiles.swap_remove(i);
                continue;
            }
        }

        let out_of_bounds = p.pos.x < -PROJECTILE_BOUNDS_MARGIN
            || p.pos.x > ARENA_WIDTH + PROJECTILE_BOUNDS_MARGIN
            || p.pos.y < -PROJECTILE_BOUNDS_MARGIN
            || p.pos.y > ARENA_HEIGHT + PROJECTILE_BOUNDS_MARGIN;
        if p.age > PROJECTILE_LIFETIME || out_of_bounds {
            run.projectiles.swap_remove(i);
            continue;
        }
        i += 1;
    }
}

fn step_effects(run: &mut Run, dt: f32) {
    for eff in &mut run.effects {
        eff.remaining -= dt;
    }

    // Active traps push overlapped enemies back against their fall
    let enemies = &mut run.enemies;
    for eff in run
        .effects
        .iter()
        .filter(|e| e.kind == EffectKind::Trap && e.remaining > 0.0)
    {
        for en in enemies.iter_mut() {
            if circles_hit(eff.pos, eff.radius, en.pos, en.radius) {
                en.pos.y -= en.speed * TRAP_SLOW_FRAC * dt;
            }
        }
    }

    run.effects.retain(|e| e.remaining > 0.0);
}

fn step_boss(run: &mut Run, dt: f32) {
    if run.boss.is_none() && run.stage >= BOSS_STAGE {
        let boss = super::state::Boss::new(run.floor);
        log::info!("boss spawned: floor {} ({} hp)", run.floor, boss.max_hp);
        run.boss = Some(boss);
        run.timers.boss = 0.0;
    }

    let mut meteor_x = None;
    let mut contact = false;
    let mut defeated = false;
    if let Some(boss) = run.boss.as_mut() {
        boss.age += dt;
        boss.refresh_phase();

        if boss.hp <= 0.0 {
            defeated = true;
        } else {
            let delta = run.player.pos - boss.pos;
            let d = delta.length();
            if d > 0.0 {
                boss.pos.x += delta.x / d * boss.chase_speed() * dt;
            }

            if run.rng.next_f32() < boss.meteor_chance() {
                meteor_x = Some(
                    SPAWN_X_MARGIN + run.rng.next_f32() * (ARENA_WIDTH - 2.0 * SPAWN_X_MARGIN),
                );
            }
            if circles_hit(boss.pos, boss.radius, run.player.pos, run.player.radius) {
                contact = true;
            }
        }
    }

    if let Some(x) = meteor_x {
        run.spawn_enemy(EnemyKind::Meteor, x);
    }
    if contact {
        run.damage_player(BOSS_CONTACT_DAMAGE);
    }
    if defeated {
        run.boss = None;
        run.shards += BOSS_KILL_SHARDS;
        run.relics.push(RelicId::Godspark);
        log::info!("boss defeated at floor {}-{}", run.floor, run.stage);
        run.advance_stage();
    }
}

fn enemy_contacts(run: &mut Run) {
    for i in 0..run.enemies.len() {
        let (pos, radius, dmg, alive) = {
            let e = &run.enemies[i];
            (e.pos, e.radius, e.kind.contact_damage(), e.hp > 0.0)
        };
        if alive && circles_hit(pos, radius, run.player.pos, run.player.radius) {
            run.damage_player(dmg);
        }
    }
}
