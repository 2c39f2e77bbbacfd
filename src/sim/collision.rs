//! Circle overlap tests
//!
//! Everything in the arena is a circle, so combat resolution reduces to one
//! predicate: squared center distance against squared radius sum. No
//! epsilon; touching counts as a hit.

use glam::Vec2;

/// True when two circles overlap or touch
#[inline]
pub fn circles_hit(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let r = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= r * r
}

/// Index of the living enemy nearest to `from`, by squared distance
pub fn nearest_enemy(enemies: &[super::state::Enemy], from: Vec2) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, e) in enemies.iter().enumerate() {
        if e.hp <= 0.0 {
            continue;
        }
        let d = from.distance_squared(e.pos);
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}
