//! Shattered Labyrinth entry point
//!
//! Headless daily run: resolves today's seed and realm, loads the legacy
//! profile, drives a scripted pilot through one run and banks the reward.

use std::path::PathBuf;

use shattered_labyrinth::consts::*;
use shattered_labyrinth::realm::pick_realm_by_date;
use shattered_labyrinth::relic_log::{report, MemoryRelicSink, RelicRecord};
use shattered_labyrinth::seed::{resolve_daily_seed, FnvSeedProvider};
use shattered_labyrinth::sim::{tick, ClassId, Run, RunConfig, TerminationReason, TickInput};
use shattered_labyrinth::MetaProfile;

const DT: f32 = 1.0 / 60.0;
/// Hard cap so a lucky pilot cannot run forever
const MAX_RUN_SECONDS: f32 = 300.0;

fn profile_path() -> PathBuf {
    std::env::var_os("SHATTERED_PROFILE")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("profile.json"))
}

/// Scripted pilot: strafes toward the arena center, attacks on cooldown
/// and always takes the first option of a choice.
fn pilot_input(run: &Run, frame: u64) -> TickInput {
    let center = ARENA_WIDTH / 2.0;
    TickInput {
        left: run.player.pos.x > center + 50.0,
        right: run.player.pos.x < center - 50.0,
        up: false,
        down: false,
        dodge: frame % 240 < 30,
        light_attack: true,
        heavy_attack: true,
        skill: true,
    }
}

fn main() {
    env_logger::init();

    let seed_info = resolve_daily_seed(&FnvSeedProvider);
    let realm = pick_realm_by_date(&seed_info.date);
    log::info!(
        "realm of the day: {} (hazards: {})",
        realm.name,
        realm.hazards.join(", ")
    );

    let path = profile_path();
    let mut profile = MetaProfile::load(&path);
    let class = ClassId::Warrior;

    let mut run = Run::new(RunConfig {
        class,
        hard_mode: false,
        daily_seed: seed_info.seed,
        bonuses: profile.upgrades.bonuses(),
    });

    let mut relic_sink = MemoryRelicSink::default();
    let mut logged_relics = 0;
    let mut frame: u64 = 0;
    while !run.is_terminal() && run.elapsed < MAX_RUN_SECONDS {
        if run.is_choice_pending() {
            run.resolve_choice(0);
        }
        let input = pilot_input(&run, frame);
        tick(&mut run, &input, DT);
        frame += 1;

        for relic in &run.relics[logged_relics..] {
            report(
                &mut relic_sink,
                RelicRecord::now(relic.name(), class, run.floor),
            );
        }
        logged_relics = run.relics.len();
    }

    let outcome = run.finish(TerminationReason::Exit).clone();
    profile.record_outcome(&outcome, &seed_info.date);
    if let Err(e) = profile.save(&path) {
        log::error!("profile save failed: {e}");
    }

    println!(
        "{} | {} | floor {}-{} | {:.1}s | {} relics | +{} shards (bank: {})",
        seed_info.date,
        realm.name,
        outcome.floor,
        outcome.stage,
        outcome.elapsed,
        outcome.relics.len(),
        outcome.shards_gain,
        profile.shards
    );
}
