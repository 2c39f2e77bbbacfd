//! End-to-end run simulation tests
//!
//! Drives whole runs through the public API and checks the properties the
//! daily-seed format depends on: determinism, bounded state, and the
//! run-to-profile banking flow.

use proptest::prelude::*;

use shattered_labyrinth::consts::*;
use shattered_labyrinth::meta::{upgrade_cost, MetaProfile, UpgradeKind};
use shattered_labyrinth::sim::{
    tick, ClassId, Run, RunConfig, StatBonuses, TerminationReason, TickInput,
};

const DT: f32 = 1.0 / 60.0;

fn config(class: ClassId, seed: u32) -> RunConfig {
    RunConfig {
        class,
        hard_mode: false,
        daily_seed: seed,
        bonuses: StatBonuses::default(),
    }
}

/// Decode one byte of scripted intent into a frame input
fn input_from_mask(mask: u8) -> TickInput {
    TickInput {
        left: mask & 0x01 != 0,
        right: mask & 0x02 != 0,
        up: mask & 0x04 != 0,
        down: mask & 0x08 != 0,
        dodge: mask & 0x10 != 0,
        light_attack: mask & 0x20 != 0,
        heavy_attack: mask & 0x40 != 0,
        skill: mask & 0x80 != 0,
    }
}

/// Advance a run through a scripted input stream, resolving choices with
/// the script too. Stops at terminal.
fn drive(run: &mut Run, script: &[u8]) {
    for &mask in script {
        if run.is_terminal() {
            break;
        }
        if run.is_choice_pending() {
            run.resolve_choice(mask as usize % 3);
            continue;
        }
        tick(run, &input_from_mask(mask), DT);
    }
}

#[test]
fn identical_seeds_and_scripts_replay_identically() {
    let script: Vec<u8> = (0..4_000u32).map(|i| (i * 31 + 7) as u8).collect();

    let mut a = Run::new(config(ClassId::Mage, 0xDAF7_1E55));
    let mut b = Run::new(config(ClassId::Mage, 0xDAF7_1E55));
    drive(&mut a, &script);
    drive(&mut b, &script);

    let snap_a = serde_json::to_string(&a.snapshot()).unwrap();
    let snap_b = serde_json::to_string(&b.snapshot()).unwrap();
    assert_eq!(snap_a, snap_b);
    assert_eq!(a.shards, b.shards);
    assert_eq!(a.relics, b.relics);
    assert_eq!(a.floor, b.floor);
}

#[test]
fn different_classes_diverge_on_the_same_daily_seed() {
    let script: Vec<u8> = vec![0x22; 2_000];

    let mut a = Run::new(config(ClassId::Warrior, 42));
    let mut b = Run::new(config(ClassId::Ranger, 42));
    drive(&mut a, &script);
    drive(&mut b, &script);

    // Class salts split the RNG streams, so the worlds differ
    let snap_a = serde_json::to_string(&a.snapshot()).unwrap();
    let snap_b = serde_json::to_string(&b.snapshot()).unwrap();
    assert_ne!(snap_a, snap_b);
}

#[test]
fn long_run_progresses_and_pays_out() {
    // Aggressive script: hold every attack, strafe right
    let script: Vec<u8> = vec![0xE2; 36_000]; // ten minutes of frames

    let mut run = Run::new(config(ClassId::Warrior, 7));
    drive(&mut run, &script);

    let outcome = run.finish(TerminationReason::Exit).clone();
    assert!(outcome.shards_gain >= MIN_REWARD_SHARDS);
    assert!(outcome.floor >= 1);
    assert_eq!(outcome.floor_value, outcome.floor * 10 + outcome.stage);

    let mut profile = MetaProfile::default();
    profile.record_outcome(&outcome, "2025-08-24");
    assert_eq!(profile.shards, outcome.shards_gain as u64);
    assert_eq!(profile.best_floor, outcome.floor_value);
}

#[test]
fn banked_shards_buy_upgrades_that_feed_the_next_run() {
    let mut profile = MetaProfile::default();
    profile.shards = upgrade_cost(0);
    assert!(profile.purchase(UpgradeKind::MaxHp));

    let run = Run::new(RunConfig {
        class: ClassId::Warrior,
        hard_mode: false,
        daily_seed: 1,
        bonuses: profile.upgrades.bonuses(),
    });
    let base = ClassId::Warrior.stats().max_hp;
    assert_eq!(run.player.max_hp, base + UPGRADE_HP_PER_LEVEL);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever the script does, core state stays inside its envelope.
    #[test]
    fn state_stays_bounded(seed in any::<u32>(), script in prop::collection::vec(any::<u8>(), 1..600)) {
        let mut run = Run::new(config(ClassId::Warrior, seed));
        let mut last_shards = 0u32;

        for &mask in &script {
            if run.is_terminal() {
                break;
            }
            if run.is_choice_pending() {
                run.resolve_choice(mask as usize % 3);
                continue;
            }
            tick(&mut run, &input_from_mask(mask), DT);

            let p = &run.player;
            prop_assert!(p.pos.x >= p.radius && p.pos.x <= ARENA_WIDTH - p.radius);
            prop_assert!(p.pos.y >= p.radius && p.pos.y <= ARENA_HEIGHT - p.radius);
            prop_assert!(p.hp >= 0.0 && p.hp <= p.max_hp);
            prop_assert!(p.cd_light >= 0.0 && p.cd_heavy >= 0.0 && p.cd_skill >= 0.0);
            prop_assert!(run.shards >= last_shards, "shards never decrease in a run");
            last_shards = run.shards;
        }
    }

    /// Outcomes are a pure function of seed, class and script.
    #[test]
    fn outcome_is_reproducible(seed in any::<u32>(), script in prop::collection::vec(any::<u8>(), 1..400)) {
        let mut a = Run::new(config(ClassId::Ranger, seed));
        let mut b = Run::new(config(ClassId::Ranger, seed));
        drive(&mut a, &script);
        drive(&mut b, &script);
        let oa = a.finish(TerminationReason::Exit).clone();
        let ob = b.finish(TerminationReason::Exit).clone();
        prop_assert_eq!(oa, ob);
    }
}
