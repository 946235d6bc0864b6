//! External force fields and the pointer force.
//!
//! Force fields are circular emitters placed by the host widget. Each
//! field affects particles within its radius with a linear falloff:
//! `amount = strength * (radius - distance) / radius * multiplier`.
//!
//! | Kind | Effect |
//! |------|--------|
//! | [`ForceFieldKind::Push`] | Away from the center |
//! | [`ForceFieldKind::Pull`] | Toward the center |
//! | [`ForceFieldKind::Vortex`] | Tangential swirl around the center |
//! | [`ForceFieldKind::Wave`] | Uniform `(sin t, cos t)` sway, same for every particle in range |
//!
//! Fields are only ever read during a step. The caller adds and removes
//! them between steps through [`Simulation`](crate::Simulation).
//!
//! # Example
//!
//! ```ignore
//! let id = sim.add_force_field(ForceField::vortex(Vec2::new(200.0, 150.0), 40.0, 80.0));
//! sim.tick();
//! sim.remove_force_field(id);
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Scale applied to the unnormalized tangent of vortex fields.
pub const VORTEX_FACTOR: f32 = 0.05;

/// Behavior of a force field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForceFieldKind {
    /// Repel particles from the center.
    #[default]
    Push,
    /// Attract particles to the center.
    Pull,
    /// Swirl particles around the center.
    Vortex,
    /// Sway every particle in range in one time-varying direction.
    Wave,
}

/// A circular force emitter.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForceField {
    pub kind: ForceFieldKind,
    pub position: Vec2,
    pub strength: f32,
    pub radius: f32,
}

impl ForceField {
    pub fn new(kind: ForceFieldKind, position: Vec2, strength: f32, radius: f32) -> Self {
        Self {
            kind,
            position,
            strength,
            radius,
        }
    }

    /// Field pushing particles away from `position`.
    pub fn push(position: Vec2, strength: f32, radius: f32) -> Self {
        Self::new(ForceFieldKind::Push, position, strength, radius)
    }

    /// Field pulling particles toward `position`.
    pub fn pull(position: Vec2, strength: f32, radius: f32) -> Self {
        Self::new(ForceFieldKind::Pull, position, strength, radius)
    }

    /// Field swirling particles around `position`.
    pub fn vortex(position: Vec2, strength: f32, radius: f32) -> Self {
        Self::new(ForceFieldKind::Vortex, position, strength, radius)
    }

    /// Field swaying particles near `position`.
    pub fn wave(position: Vec2, strength: f32, radius: f32) -> Self {
        Self::new(ForceFieldKind::Wave, position, strength, radius)
    }

    /// Force this field exerts on a particle at `position`.
    ///
    /// `time` is the simulated time driving wave fields. Particles at or
    /// beyond the radius receive nothing, and a particle exactly at the
    /// center receives no radial force.
    pub fn force_at(&self, position: Vec2, time: f32, multiplier: f32) -> Vec2 {
        if self.radius <= 0.0 {
            return Vec2::ZERO;
        }
        let offset = position - self.position;
        let distance = offset.length();
        if distance >= self.radius {
            return Vec2::ZERO;
        }

        let influence = (self.radius - distance) / self.radius;
        let amount = self.strength * influence * multiplier;

        match self.kind {
            ForceFieldKind::Push => radial(offset, distance) * amount,
            ForceFieldKind::Pull => -radial(offset, distance) * amount,
            ForceFieldKind::Vortex => offset.perp() * amount * VORTEX_FACTOR,
            ForceFieldKind::Wave => Vec2::new(time.sin(), time.cos()) * amount,
        }
    }
}

/// Unit vector along `offset`, or zero when the points coincide.
#[inline]
fn radial(offset: Vec2, distance: f32) -> Vec2 {
    if distance > 0.0 {
        offset / distance
    } else {
        Vec2::ZERO
    }
}

/// Identity of a force field inside a [`ForceFieldSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForceFieldId(pub u32);

/// The active force fields, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct ForceFieldSet {
    fields: Vec<(ForceFieldId, ForceField)>,
    next_id: u32,
}

impl ForceFieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field and return its identity.
    pub fn add(&mut self, field: ForceField) -> ForceFieldId {
        let id = ForceFieldId(self.next_id);
        self.next_id += 1;
        self.fields.push((id, field));
        id
    }

    /// Remove a field, returning it if it was present.
    pub fn remove(&mut self, id: ForceFieldId) -> Option<ForceField> {
        let idx = self.fields.iter().position(|(fid, _)| *fid == id)?;
        Some(self.fields.remove(idx).1)
    }

    /// Replace every field, returning the new identities in order.
    pub fn replace<I: IntoIterator<Item = ForceField>>(&mut self, fields: I) -> Vec<ForceFieldId> {
        self.fields.clear();
        fields.into_iter().map(|f| self.add(f)).collect()
    }

    pub fn get(&self, id: ForceFieldId) -> Option<&ForceField> {
        self.fields.iter().find(|(fid, _)| *fid == id).map(|(_, f)| f)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ForceFieldId, &ForceField)> {
        self.fields.iter().map(|(id, f)| (*id, f))
    }

    /// Sum of every field's force at `position`.
    pub fn force_at(&self, position: Vec2, time: f32, multiplier: f32) -> Vec2 {
        self.fields
            .iter()
            .map(|(_, f)| f.force_at(position, time, multiplier))
            .fold(Vec2::ZERO, |acc, f| acc + f)
    }
}

/// Pointer-interaction force.
///
/// Uses the pull math: positive strength draws particles toward the
/// pointer, negative strength pushes them away. Only active while
/// `engaged` is set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerForce {
    pub engaged: bool,
    pub position: Vec2,
    pub strength: f32,
    pub radius: f32,
}

impl Default for PointerForce {
    fn default() -> Self {
        Self {
            engaged: false,
            position: Vec2::ZERO,
            strength: 150.0,
            radius: 60.0,
        }
    }
}

impl PointerForce {
    /// Force on a particle at `position`, zero when disengaged.
    pub fn force_at(&self, position: Vec2, multiplier: f32) -> Vec2 {
        if !self.engaged {
            return Vec2::ZERO;
        }
        ForceField::pull(self.position, self.strength, self.radius).force_at(position, 0.0, multiplier)
    }
}
