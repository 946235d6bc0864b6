//! # SFPE - Smoothed Fluid Particle Engine
//!
//! A small 2D SPH fluid for interactive widgets. The simulator runs a fixed
//! step on the CPU and hands out particle snapshots; drawing them is up to
//! the host.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sfpe::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     let mut sim = Simulation::new(
//!         SimulationConfig::default()
//!             .with_particle_count(300)
//!             .with_domain(640.0, 360.0),
//!     )?;
//!
//!     sim.add_force_field(ForceField::vortex(Vec2::new(320.0, 180.0), 80.0, 120.0));
//!     sim.apply_preset("honey")?;
//!
//!     for _ in 0..120 {
//!         sim.tick();
//!     }
//!     let vertices = sim.snapshot();
//!     let bytes: &[u8] = bytemuck::cast_slice(&vertices);
//!     Ok(())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Each [`Particle`] carries a position, a velocity, a density (never below
//! the rest density), a pressure derived from it, and a color derived from
//! its speed. The population is created at start and on every reseed; it
//! never grows or shrinks on its own.
//!
//! ### One step
//!
//! Every step recomputes density and pressure from neighbors inside the
//! smoothing radius, sums pressure, viscosity, force-field, pointer and
//! gravity forces, integrates, and bounces particles off the walls. The y
//! axis grows downward.
//!
//! ### Force fields
//!
//! | Kind | Effect |
//! |------|--------|
//! | [`ForceFieldKind::Push`] | Away from the center |
//! | [`ForceFieldKind::Pull`] | Toward the center |
//! | [`ForceFieldKind::Vortex`] | Swirl around the center |
//! | [`ForceFieldKind::Wave`] | Time-varying uniform push |
//!
//! ### Presets
//!
//! `water`, `honey`, `mercury`, `gas` and `plasma` ship built in. Applying a
//! preset replaces viscosity, gravity, pressure stiffness, damping and base
//! color together and reseeds.
//!
//! ## Features
//!
//! - `parallel`: run the neighbor passes on rayon. Results are identical to
//!   the serial build.

pub mod clock;
pub mod config;
pub mod density;
pub mod error;
pub mod field;
pub mod forces;
pub mod integrator;
pub mod particle;
pub mod preset;
mod simulation;
pub mod spatial;
pub mod spawn;
pub mod trail;
pub mod visuals;

pub use bytemuck;
pub use clock::{SimulationClock, StepThrottle};
pub use config::SimulationConfig;
pub use error::{ConfigError, SimulationError};
pub use field::{ForceField, ForceFieldId, ForceFieldKind, ForceFieldSet, PointerForce};
pub use glam::{Vec2, Vec4};
pub use particle::{Particle, ParticleId, ParticleVertex};
pub use preset::{Preset, PresetCatalog};
pub use simulation::{DebugStats, Simulation};
pub use spatial::NeighborSearch;
pub use spawn::{Spawn, SpawnContext};
pub use trail::{TrailBuffer, TrailFrame};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use sfpe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clock::StepThrottle;
    pub use crate::config::SimulationConfig;
    pub use crate::error::{ConfigError, SimulationError};
    pub use crate::field::{ForceField, ForceFieldId, ForceFieldKind, PointerForce};
    pub use crate::particle::{Particle, ParticleVertex};
    pub use crate::preset::Preset;
    pub use crate::simulation::{DebugStats, Simulation};
    pub use crate::spatial::NeighborSearch;
    pub use crate::spawn::{Spawn, SpawnContext};
    pub use crate::{Vec2, Vec4};
}
