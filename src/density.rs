//! Density and pressure estimation.
//!
//! Each particle's density is the sum of `(h - r)²` over every particle
//! (itself included) closer than the smoothing radius `h`. This quadratic
//! kernel is unnormalized; it only needs to rise monotonically as
//! neighbors crowd in. The sum is floored at the rest density so that an
//! isolated particle is never under-pressured, and pressure follows
//! linearly from the excess.
//!
//! A particle alone contributes `h²` to its own sum. Only when
//! `h² <= rest_density` does an isolated particle land exactly on the
//! floor with zero pressure; `SimulationConfig::validate` enforces that.
//! The estimator itself accepts any parameters.

use crate::particle::Particle;
use crate::spatial::{map_indices, SpatialGrid};

/// Computes density and pressure for every particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialDensityEstimator {
    pub smoothing_radius: f32,
    pub rest_density: f32,
    pub gas_constant: f32,
}

impl SpatialDensityEstimator {
    pub fn new(smoothing_radius: f32, rest_density: f32, gas_constant: f32) -> Self {
        Self {
            smoothing_radius,
            rest_density,
            gas_constant,
        }
    }

    /// Raw kernel sum for particle `i`, before the rest-density floor.
    pub fn kernel_sum(&self, particles: &[Particle], grid: &SpatialGrid, i: usize) -> f32 {
        let h = self.smoothing_radius;
        let h2 = h * h;
        let pos = particles[i].position;

        let mut sum = 0.0;
        grid.for_each_candidate(pos, |j| {
            let d2 = pos.distance_squared(particles[j].position);
            if d2 < h2 {
                let w = h - d2.sqrt();
                sum += w * w;
            }
        });
        sum
    }

    /// Pressure for a given (already floored) density.
    #[inline]
    pub fn pressure(&self, density: f32) -> f32 {
        self.gas_constant * (density - self.rest_density)
    }

    /// Recompute `density` and `pressure` of every particle in place.
    ///
    /// `grid` must have been rebuilt for the current positions.
    pub fn compute(&self, particles: &mut [Particle], grid: &SpatialGrid) {
        let densities = {
            let snapshot: &[Particle] = particles;
            map_indices(snapshot.len(), |i| {
                self.kernel_sum(snapshot, grid, i).max(self.rest_density)
            })
        };

        for (p, density) in particles.iter_mut().zip(densities) {
            p.density = density;
            p.pressure = self.pressure(density);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleId;
    use crate::spatial::NeighborSearch;
    use glam::{Vec2, Vec4};

    fn particles_at(points: &[Vec2]) -> Vec<Particle> {
        points
            .iter()
            .enumerate()
            .map(|(i, &p)| Particle::new(ParticleId(i as u64), p, Vec2::ZERO, 0.0, Vec4::ONE))
            .collect()
    }

    fn estimate(points: &[Vec2], search: NeighborSearch, estimator: &SpatialDensityEstimator) -> Vec<Particle> {
        let mut particles = particles_at(points);
        let mut grid = SpatialGrid::new();
        grid.rebuild(&particles, search, estimator.smoothing_radius, 400.0, 300.0);
        estimator.compute(&mut particles, &grid);
        particles
    }

    #[test]
    fn test_isolated_particle_gets_rest_density() {
        let estimator = SpatialDensityEstimator::new(25.0, 1000.0, 50.0);
        let particles = estimate(&[Vec2::new(100.0, 100.0)], NeighborSearch::Grid, &estimator);

        // Self contribution is h² = 625, below the floor
        assert_eq!(particles[0].density, 1000.0);
        assert_eq!(particles[0].pressure, 0.0);
    }

    #[test]
    fn test_isolated_particle_pressurized_when_kernel_exceeds_rest() {
        // h² = 1600 > rest 1000
        let estimator = SpatialDensityEstimator::new(40.0, 1000.0, 2.0);
        let particles = estimate(&[Vec2::new(100.0, 100.0)], NeighborSearch::BruteForce, &estimator);
        assert_eq!(particles[0].density, 1600.0);
        assert_eq!(particles[0].pressure, 1200.0);
    }

    #[test]
    fn test_self_contribution_counts() {
        let estimator = SpatialDensityEstimator::new(25.0, 0.0, 1.0);
        let particles = estimate(&[Vec2::new(100.0, 100.0)], NeighborSearch::Grid, &estimator);
        assert_eq!(particles[0].density, 625.0);
        assert_eq!(particles[0].pressure, 625.0);
    }

    #[test]
    fn test_close_pair_above_rest_density() {
        let estimator = SpatialDensityEstimator::new(25.0, 1000.0, 2.0);
        let particles = estimate(
            &[Vec2::new(100.0, 100.0), Vec2::new(105.0, 100.0)],
            NeighborSearch::Grid,
            &estimator,
        );

        // 625 (self) + (25 - 5)² = 1025
        for p in &particles {
            assert!((p.density - 1025.0).abs() < 1e-3);
            assert!((p.pressure - 50.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_neighbor_at_radius_excluded() {
        let estimator = SpatialDensityEstimator::new(25.0, 0.0, 1.0);
        let particles = estimate(
            &[Vec2::new(100.0, 100.0), Vec2::new(125.0, 100.0)],
            NeighborSearch::BruteForce,
            &estimator,
        );
        assert_eq!(particles[0].density, 625.0);
    }

    #[test]
    fn test_coincident_particles_no_nan() {
        let estimator = SpatialDensityEstimator::new(25.0, 100.0, 1.0);
        let particles = estimate(
            &[Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0)],
            NeighborSearch::Grid,
            &estimator,
        );
        assert_eq!(particles[0].density, 1250.0);
        assert!(particles[0].pressure.is_finite());
    }

    #[test]
    fn test_grid_matches_brute_force() {
        let estimator = SpatialDensityEstimator::new(25.0, 500.0, 3.0);
        let mut points = Vec::new();
        for i in 0..120 {
            let t = i as f32;
            points.push(Vec2::new(100.0 + (t * 7.3) % 80.0, 100.0 + (t * 11.1) % 60.0));
        }

        let grid = estimate(&points, NeighborSearch::Grid, &estimator);
        let brute = estimate(&points, NeighborSearch::BruteForce, &estimator);
        for (g, b) in grid.iter().zip(&brute) {
            assert!((g.density - b.density).abs() <= 1e-3 * b.density);
        }
    }
}
