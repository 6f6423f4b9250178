//! Spawn context for particle initialization.
//!
//! Wraps a seeded RNG with the handful of helpers the particle store and
//! the spark pool need to place particles on a 2D surface.

use crate::particle::Bounds;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;

/// Random source and helpers used while filling particle slots.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(Some(7), Bounds::new(800.0, 600.0));
/// let position = ctx.random_in_bounds();
/// let velocity = ctx.random_velocity(0.25);
/// ```
pub struct SpawnContext {
    /// Surface bounds particles are spawned into.
    pub bounds: Bounds,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a spawn context.
    ///
    /// With `seed = None` the RNG is seeded from the wall clock, so every run
    /// looks different; pass a seed for reproducible layouts.
    pub fn new(seed: Option<u64>, bounds: Bounds) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            bounds,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `range`. An empty range yields its start; a range too
    /// wide to sample yields its midpoint, or its finite end.
    #[inline]
    pub fn random_range(&mut self, range: Range<f32>) -> f32 {
        if range.end <= range.start || range.start.is_nan() || range.end.is_nan() {
            return range.start;
        }
        if (range.end - range.start).is_finite() {
            return self.rng.gen_range(range);
        }
        match (range.start.is_finite(), range.end.is_finite()) {
            (true, true) => range.start * 0.5 + range.end * 0.5,
            (true, false) => range.start,
            (false, true) => range.end,
            (false, false) => 0.0,
        }
    }

    /// Random index in `0..len`. Returns 0 when `len` is 0.
    #[inline]
    pub fn random_index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.rng.gen_range(0..len)
        }
    }

    /// Uniform point inside the bounds. A zero-sized axis yields 0.
    pub fn random_in_bounds(&mut self) -> Vec2 {
        let Bounds { width, height } = self.bounds;
        Vec2::new(self.random_range(0.0..width), self.random_range(0.0..height))
    }

    /// Random velocity with each component in `[-max, max)`.
    pub fn random_velocity(&mut self, max: f32) -> Vec2 {
        let max = max.abs();
        Vec2::new(self.random_range(-max..max), self.random_range(-max..max))
    }
}
