//! Particle records and the store that owns them.
//!
//! The store knows nothing about physics. It holds the population, hands
//! out identities, and produces renderer-friendly snapshots.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Stable identity of a particle, unique for the lifetime of a run.
///
/// Identities are never reused within one [`ParticleStore`]; a reseed hands
/// out fresh ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticleId(pub u64);

/// One fluid particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Kernel-sum density, never below the configured rest density.
    pub density: f32,
    /// Derived from density every step; not meaningful across steps.
    pub pressure: f32,
    /// Visual only, recomputed from speed after each step.
    pub color: Vec4,
}

impl Particle {
    /// Create a particle at rest density with zero pressure.
    pub fn new(id: ParticleId, position: Vec2, velocity: Vec2, rest_density: f32, color: Vec4) -> Self {
        Self {
            id,
            position,
            velocity,
            density: rest_density,
            pressure: 0.0,
            color,
        }
    }

    /// Current speed.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Kinetic energy with unit mass.
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.velocity.length_squared()
    }

    /// Position and color packed for GPU upload.
    #[inline]
    pub fn to_vertex(&self) -> ParticleVertex {
        ParticleVertex {
            position: self.position.to_array(),
            color: self.color.to_array(),
        }
    }
}

/// GPU-compatible particle layout used by snapshots and trail frames.
///
/// Slices of vertices can be uploaded with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ParticleVertex {
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::from_array(self.position)
    }

    #[inline]
    pub fn color(&self) -> Vec4 {
        Vec4::from_array(self.color)
    }
}

/// Owner of the particle population.
#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    next_id: u64,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every particle. Identities keep counting up.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Add a particle and return its fresh identity.
    pub fn spawn(&mut self, position: Vec2, velocity: Vec2, rest_density: f32, color: Vec4) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.particles
            .push(Particle::new(id, position, velocity, rest_density, color));
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.iter().find(|p| p.id == id)
    }

    /// Sum of kinetic energy over all particles (unit mass).
    pub fn kinetic_energy(&self) -> f32 {
        self.iter().map(Particle::kinetic_energy).sum()
    }

    /// Owned copy of every particle's position and color.
    pub fn snapshot(&self) -> Vec<ParticleVertex> {
        self.iter().map(Particle::to_vertex).collect()
    }
}
