//! Deterministic run RNG (mulberry32)
//!
//! The whole run derives from one 32-bit counter advanced by a fixed mixing
//! step. Two generators with the same seed produce bit-identical sequences,
//! which is what makes daily-seed runs reproducible. The generator also
//! implements `RngCore`/`SeedableRng` so rand adaptors work on it, but the
//! simulation only ever calls `next_f32`.

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

/// mulberry32 generator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance the counter and mix out 32 bits
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut r = (t ^ (t >> 15)).wrapping_mul(t | 1);
        r ^= r.wrapping_add((r ^ (r >> 7)).wrapping_mul(r | 61));
        r ^ (r >> 14)
    }

    /// Uniform sample in [0, 1)
    ///
    /// Divides in f64 before narrowing so the full 32 bits contribute,
    /// matching the canonical mulberry32 output exactly. Narrowing rounds
    /// raw words >= 0xFFFF_FF81 up to exactly 1.0, so those are pinned to
    /// the largest float below 1.0; callers scale-and-truncate for array
    /// indexing and must never see 1.0.
    pub fn next_f32(&mut self) -> f32 {
        let v = (self.next_u32() as f64 / 4_294_967_296.0) as f32;
        v.min(f32::from_bits(0x3F7F_FFFF))
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        Mulberry32::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = Mulberry32::next_u32(self) as u64;
        let hi = Mulberry32::next_u32(self) as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = Mulberry32::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
