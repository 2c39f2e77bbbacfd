//! Deterministic run simulation
//!
//! Pure state plus a tick function: no clocks, no I/O, no global RNG.
//! Given the same seed, class and input stream, two runs are bit-identical,
//! which is what daily-seed competition relies on.

pub mod classes;
pub mod collision;
pub mod modifier;
pub mod rng;
pub mod state;
pub mod tick;

pub use classes::{ClassId, ClassStats, SkillKind};
pub use modifier::{ChoiceOption, ChoiceSet, CurseId, ModifierEffect, OptionKind, RelicId};
pub use rng::Mulberry32;
pub use state::{
    Boss, Effect, EffectKind, Enemy, EnemyKind, Hud, Player, Projectile, Run, RunConfig,
    RunOutcome, RunPhase, RunSnapshot, StatBonuses, TerminationReason, Timers,
};
pub use tick::{tick, TickInput};
