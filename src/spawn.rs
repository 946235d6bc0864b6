//! Spawn context for particle initialization.
//!
//! Every reseed walks the population once and asks a spawner for each
//! particle's initial state. The spawner receives a [`SpawnContext`] with
//! helpers for common layouts, all drawing from the simulation's seeded RNG
//! so a given seed always reproduces the same population.
//!
//! ```ignore
//! let sim = Simulation::new(config)?.with_spawner(|ctx| Spawn {
//!     position: ctx.grid_position(10, 10),
//!     velocity: Vec2::ZERO,
//! });
//! ```

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;
use std::f32::consts::TAU;

/// Initial state of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawn {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Boxed spawner stored by the simulation and reused on every reseed.
pub type Spawner = Box<dyn Fn(&mut SpawnContext<'_>) -> Spawn + Send + Sync>;

/// Context provided to spawner functions.
pub struct SpawnContext<'a> {
    /// Index of the particle being spawned (0 to count-1).
    pub index: usize,
    /// Total number of particles being spawned.
    pub count: usize,
    /// Lower-left corner of the usable domain.
    pub bounds_min: Vec2,
    /// Upper-right corner of the usable domain.
    pub bounds_max: Vec2,
    /// Configured maximum spawn speed.
    pub initial_speed: f32,
    rng: &'a mut SmallRng,
}

impl<'a> SpawnContext<'a> {
    pub(crate) fn new(
        index: usize,
        count: usize,
        bounds_min: Vec2,
        bounds_max: Vec2,
        initial_speed: f32,
        rng: &'a mut SmallRng,
    ) -> Self {
        Self {
            index,
            count,
            bounds_min,
            bounds_max,
            initial_speed,
            rng,
        }
    }

    /// Normalized progress through the spawn (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.index as f32 / self.count as f32
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    // ========== Position helpers ==========

    /// Uniform random point inside the usable domain.
    pub fn random_in_domain(&mut self) -> Vec2 {
        Vec2::new(
            self.random_range(self.bounds_min.x, self.bounds_max.x),
            self.random_range(self.bounds_min.y, self.bounds_max.y),
        )
    }

    /// Uniform random point inside an axis-aligned rectangle, clipped to the domain.
    pub fn random_in_rect(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        let lo = min.max(self.bounds_min);
        let hi = max.min(self.bounds_max);
        Vec2::new(self.random_range(lo.x, hi.x), self.random_range(lo.y, hi.y))
    }

    /// Position on a regular grid spanning the domain.
    pub fn grid_position(&self, cols: usize, rows: usize) -> Vec2 {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let idx = self.index % (cols * rows);
        let x = idx % cols;
        let y = idx / cols;

        let fx = x as f32 / (cols - 1).max(1) as f32;
        let fy = y as f32 / (rows - 1).max(1) as f32;
        let extent = self.bounds_max - self.bounds_min;

        self.bounds_min + Vec2::new(fx, fy) * extent
    }

    // ========== Velocity helpers ==========

    /// Random velocity with a random heading and speed up to `max_speed`.
    pub fn random_velocity(&mut self, max_speed: f32) -> Vec2 {
        let angle = self.random_range(0.0, TAU);
        let speed = self.random_range(0.0, max_speed);
        Vec2::from_angle(angle) * speed
    }
}

/// Spawner used when none is supplied: uniform positions over the domain,
/// random headings up to the configured initial speed.
pub fn random_spawn(ctx: &mut SpawnContext<'_>) -> Spawn {
    let position = ctx.random_in_domain();
    let velocity = ctx.random_velocity(ctx.initial_speed);
    Spawn { position, velocity }
}
