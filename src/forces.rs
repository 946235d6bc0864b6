//! Net force accumulation and velocity update.
//!
//! For every particle the accumulator sums:
//!
//! - **Pressure**: for each neighbor `j` within `h`,
//!   `(pressure_i + pressure_j) / (2 * density_j) * influence` along the
//!   unit vector from `j` to `i`, where `influence = (h - r) / h`.
//! - **Viscosity**: `viscosity * influence / density_j * (v_j - v_i)`.
//! - **Force fields** and the **pointer force** (see [`field`](crate::field)).
//! - **Gravity** along +y.
//!
//! Forces are computed for all particles from the same pre-step state,
//! then folded into velocities: `v += f * dt`, followed by `v *= damping`.
//! Damping after the force is part of the visual tuning; do not reorder.

use glam::Vec2;

use crate::config::SimulationConfig;
use crate::field::{ForceFieldSet, PointerForce};
use crate::particle::Particle;
use crate::spatial::{map_indices, SpatialGrid};

/// External inputs read during one step.
#[derive(Clone, Copy, Debug)]
pub struct ExternalForces<'a> {
    pub fields: &'a ForceFieldSet,
    pub pointer: &'a PointerForce,
    /// Simulated time, drives wave fields.
    pub time: f32,
}

/// Combines internal and external forces into one force per particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceAccumulator {
    pub smoothing_radius: f32,
    pub viscosity: f32,
    pub gravity: f32,
    pub damping: f32,
    pub force_multiplier: f32,
}

impl ForceAccumulator {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            smoothing_radius: config.smoothing_radius,
            viscosity: config.viscosity,
            gravity: config.gravity,
            damping: config.damping,
            force_multiplier: config.force_multiplier,
        }
    }

    /// Pressure and viscosity force on particle `i` from its neighbors.
    pub fn pair_force(&self, particles: &[Particle], grid: &SpatialGrid, i: usize) -> Vec2 {
        let h = self.smoothing_radius;
        let h2 = h * h;
        let p_i = &particles[i];

        let mut force = Vec2::ZERO;
        grid.for_each_candidate(p_i.position, |j| {
            if j == i {
                return;
            }
            let p_j = &particles[j];
            let offset = p_i.position - p_j.position;
            let d2 = offset.length_squared();
            if d2 >= h2 {
                return;
            }

            let distance = d2.sqrt();
            let influence = (h - distance) / h;

            // Coincident particles have no direction to be pushed along
            if distance > 0.0 {
                let magnitude = (p_i.pressure + p_j.pressure) / (2.0 * p_j.density) * influence;
                force += offset / distance * magnitude;
            }

            force += (p_j.velocity - p_i.velocity) * (self.viscosity * influence / p_j.density);
        });
        force
    }

    /// Field, pointer and gravity force at `position`.
    pub fn external_force(&self, position: Vec2, external: &ExternalForces<'_>) -> Vec2 {
        let mut force = external
            .fields
            .force_at(position, external.time, self.force_multiplier);
        force += external.pointer.force_at(position, self.force_multiplier);
        force.y += self.gravity;
        force
    }

    /// Net force on every particle, in particle order.
    pub fn accumulate(
        &self,
        particles: &[Particle],
        grid: &SpatialGrid,
        external: &ExternalForces<'_>,
    ) -> Vec<Vec2> {
        map_indices(particles.len(), |i| {
            self.pair_force(particles, grid, i) + self.external_force(particles[i].position, external)
        })
    }

    /// Fold forces into velocities, then damp.
    pub fn apply(&self, particles: &mut [Particle], forces: &[Vec2], dt: f32) {
        for (p, force) in particles.iter_mut().zip(forces) {
            p.velocity += *force * dt;
            p.velocity *= self.damping;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::SpatialDensityEstimator;
    use crate::field::ForceField;
    use crate::particle::ParticleId;
    use crate::spatial::NeighborSearch;
    use glam::Vec4;

    fn accumulator() -> ForceAccumulator {
        ForceAccumulator {
            smoothing_radius: 25.0,
            viscosity: 0.0,
            gravity: 0.0,
            damping: 1.0,
            force_multiplier: 1.0,
        }
    }

    fn prepared(points: &[(Vec2, Vec2)], gas_constant: f32) -> (Vec<Particle>, SpatialGrid) {
        let mut particles: Vec<Particle> = points
            .iter()
            .enumerate()
            .map(|(i, &(p, v))| Particle::new(ParticleId(i as u64), p, v, 1000.0, Vec4::ONE))
            .collect();
        let mut grid = SpatialGrid::new();
        grid.rebuild(&particles, NeighborSearch::Grid, 25.0, 400.0, 300.0);
        SpatialDensityEstimator::new(25.0, 1000.0, gas_constant).compute(&mut particles, &grid);
        (particles, grid)
    }

    // ========== Pair forces ==========

    #[test]
    fn test_pressure_pushes_pair_apart() {
        let (particles, grid) = prepared(
            &[
                (Vec2::new(100.0, 100.0), Vec2::ZERO),
                (Vec2::new(105.0, 100.0), Vec2::ZERO),
            ],
            2.0,
        );
        let acc = accumulator();
        let f0 = acc.pair_force(&particles, &grid, 0);
        let f1 = acc.pair_force(&particles, &grid, 1);

        // pressure 50 each: (50 + 50) / (2 * 1025) * 0.8
        let expected = 100.0 / 2050.0 * 0.8;
        assert!((f0.x + expected).abs() < 1e-5);
        assert!((f1.x - expected).abs() < 1e-5);
        assert_eq!(f0.y, 0.0);
    }

    #[test]
    fn test_viscosity_relaxes_velocity_difference() {
        let (particles, grid) = prepared(
            &[
                (Vec2::new(100.0, 100.0), Vec2::new(10.0, 0.0)),
                (Vec2::new(110.0, 100.0), Vec2::new(-10.0, 0.0)),
            ],
            0.0,
        );
        let acc = ForceAccumulator {
            viscosity: 100.0,
            ..accumulator()
        };
        let f0 = acc.pair_force(&particles, &grid, 0);
        let f1 = acc.pair_force(&particles, &grid, 1);
        assert!(f0.x < 0.0);
        assert!(f1.x > 0.0);
    }

    #[test]
    fn test_coincident_pair_skips_direction_keeps_viscosity() {
        let (particles, grid) = prepared(
            &[
                (Vec2::new(100.0, 100.0), Vec2::new(0.0, 4.0)),
                (Vec2::new(100.0, 100.0), Vec2::ZERO),
            ],
            5.0,
        );
        let acc = ForceAccumulator {
            viscosity: 10.0,
            ..accumulator()
        };
        let f0 = acc.pair_force(&particles, &grid, 0);
        assert!(f0.is_finite());
        assert_eq!(f0.x, 0.0);
        // influence = 1, density = 1250: 10 / 1250 * (0 - 4)
        assert!((f0.y - (-0.032)).abs() < 1e-6);
    }

    #[test]
    fn test_self_is_not_a_neighbor() {
        let (particles, grid) = prepared(&[(Vec2::new(50.0, 50.0), Vec2::new(3.0, 0.0))], 1.0);
        let acc = ForceAccumulator {
            viscosity: 10.0,
            ..accumulator()
        };
        assert_eq!(acc.pair_force(&particles, &grid, 0), Vec2::ZERO);
    }

    // ========== External forces ==========

    #[test]
    fn test_gravity_is_position_independent() {
        let acc = ForceAccumulator {
            gravity: 9.8,
            ..accumulator()
        };
        let fields = ForceFieldSet::new();
        let pointer = PointerForce::default();
        let external = ExternalForces {
            fields: &fields,
            pointer: &pointer,
            time: 0.0,
        };
        assert_eq!(acc.external_force(Vec2::new(1.0, 1.0), &external), Vec2::new(0.0, 9.8));
        assert_eq!(acc.external_force(Vec2::new(300.0, 80.0), &external), Vec2::new(0.0, 9.8));
    }

    #[test]
    fn test_external_includes_fields_and_pointer() {
        let acc = accumulator();
        let mut fields = ForceFieldSet::new();
        fields.add(ForceField::push(Vec2::new(100.0, 100.0), 10.0, 50.0));
        let pointer = PointerForce {
            engaged: true,
            position: Vec2::new(150.0, 100.0),
            strength: 10.0,
            radius: 50.0,
        };
        let external = ExternalForces {
            fields: &fields,
            pointer: &pointer,
            time: 0.0,
        };
        // push from the left (+5) and pull toward the right (+5)
        let f = acc.external_force(Vec2::new(125.0, 100.0), &external);
        assert!((f - Vec2::new(10.0, 0.0)).length() < 1e-4);
    }

    // ========== Velocity update ==========

    #[test]
    fn test_apply_force_then_damp() {
        let mut particles = vec![Particle::new(
            ParticleId(0),
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            1.0,
            Vec4::ONE,
        )];
        let acc = ForceAccumulator {
            damping: 0.5,
            ..accumulator()
        };
        acc.apply(&mut particles, &[Vec2::new(100.0, 0.0)], 0.1);

        // (10 + 100 * 0.1) * 0.5 = 10; damping first would give 15
        assert!((particles[0].velocity.x - 10.0).abs() < 1e-5);
    }
}
