//! Seeded pseudorandom source for map generation.
//!
//! The whole generation pipeline is a pure function of `(seed, rooms)`:
//! every consumer draws from this one engine in strict program order, so
//! identical inputs reproduce identical worlds.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub struct Dice {
    rng: SmallRng,
}

impl Dice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// A number 𝑛 such that `0 ≤ 𝑛 < max`.
    pub fn d(&mut self, max: i32) -> i32 {
        self.d_range(0, max)
    }

    /// A number 𝑛 such that `min ≤ 𝑛 < max`.
    pub fn d_range(&mut self, min: i32, max: i32) -> i32 {
        self.rng.gen_range(min..max)
    }

    /// A real 𝑥 such that `0 ≤ 𝑥 < max`.
    pub fn df(&mut self, max: f64) -> f64 {
        self.df_range(0.0, max)
    }

    /// A real 𝑥 such that `min ≤ 𝑥 < max`.
    pub fn df_range(&mut self, min: f64, max: f64) -> f64 {
        self.rng.gen_range(min..max)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.rng);
    }
}
