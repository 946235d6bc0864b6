//! The owned simulation facade.
//!
//! [`Simulation`] ties the pieces together and is the only type a host
//! needs to drive the fluid. One call to [`step`](Simulation::step) runs a
//! full fixed step:
//!
//! 1. rebuild the neighbor index
//! 2. recompute density and pressure
//! 3. accumulate pair, field, pointer and gravity forces
//! 4. fold forces into velocities and damp
//! 5. move, bounce and recolor
//! 6. record a trail frame if trails are enabled
//!
//! Force fields, the pointer and the trail settings may be changed freely
//! between steps. Applying a preset swaps the parameter tuple and reseeds
//! the entire population.

use std::fmt;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::clock::SimulationClock;
use crate::config::SimulationConfig;
use crate::density::SpatialDensityEstimator;
use crate::error::SimulationError;
use crate::field::{ForceField, ForceFieldId, ForceFieldSet, PointerForce};
use crate::forces::{ExternalForces, ForceAccumulator};
use crate::integrator::Integrator;
use crate::particle::{Particle, ParticleStore, ParticleVertex};
use crate::preset::PresetCatalog;
use crate::spatial::SpatialGrid;
use crate::spawn::{random_spawn, Spawn, SpawnContext, Spawner};
use crate::trail::TrailBuffer;
use crate::visuals::speed_tint;

/// Counters exposed for overlays and profiling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DebugStats {
    pub particle_count: usize,
    pub force_field_count: usize,
    /// Wall-clock time of the most recent step.
    pub last_step_duration: Duration,
    pub step_count: u64,
    pub simulated_time: f32,
    pub trail_len: usize,
}

/// A 2D SPH fluid.
///
/// # Example
///
/// ```ignore
/// let mut sim = Simulation::new(SimulationConfig::default())?;
/// sim.add_force_field(ForceField::vortex(Vec2::new(200.0, 150.0), 80.0, 100.0));
/// for _ in 0..60 {
///     sim.tick();
/// }
/// let vertices = sim.snapshot();
/// ```
pub struct Simulation {
    config: SimulationConfig,
    store: ParticleStore,
    fields: ForceFieldSet,
    pointer: PointerForce,
    trail: TrailBuffer,
    trail_enabled: bool,
    presets: PresetCatalog,
    spawner: Option<Spawner>,
    rng: SmallRng,
    grid: SpatialGrid,
    clock: SimulationClock,
}

impl Simulation {
    /// Validate `config` and populate a fresh simulation from it.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let mut sim = Self {
            rng: SmallRng::seed_from_u64(config.seed),
            trail: TrailBuffer::new(config.trail_length),
            config,
            store: ParticleStore::new(),
            fields: ForceFieldSet::new(),
            pointer: PointerForce::default(),
            trail_enabled: true,
            presets: PresetCatalog::new(),
            spawner: None,
            grid: SpatialGrid::new(),
            clock: SimulationClock::new(),
        };
        sim.reseed();
        Ok(sim)
    }

    /// Replace the initial layout. The population is regenerated from the
    /// start of the seeded stream, and every later reseed reuses `spawner`.
    pub fn with_spawner<F>(mut self, spawner: F) -> Self
    where
        F: Fn(&mut SpawnContext<'_>) -> Spawn + Send + Sync + 'static,
    {
        self.spawner = Some(Box::new(spawner));
        self.rng = SmallRng::seed_from_u64(self.config.seed);
        self.reseed();
        self
    }

    /// Restart with a new configuration.
    ///
    /// Force fields, the pointer and custom presets survive. The RNG
    /// restarts from `config.seed`, so equal configs give equal populations.
    pub fn initialize(&mut self, config: SimulationConfig) -> Result<(), SimulationError> {
        config.validate()?;
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.trail.set_capacity(config.trail_length);
        self.config = config;
        self.reseed();
        Ok(())
    }

    /// Throw away the population and spawn a new one.
    ///
    /// Draws from the continuing RNG stream, so consecutive reseeds differ.
    /// Identities are not preserved. Trails and step counters are cleared.
    pub fn reseed(&mut self) {
        let count = self.config.particle_count;
        let bounds_min = self.config.bounds_min();
        let bounds_max = self.config.bounds_max();

        let spawner: &dyn Fn(&mut SpawnContext<'_>) -> Spawn = match &self.spawner {
            Some(spawner) => spawner.as_ref(),
            None => &random_spawn,
        };

        self.store.clear();
        for index in 0..count {
            let mut ctx = SpawnContext::new(
                index,
                count,
                bounds_min,
                bounds_max,
                self.config.initial_speed,
                &mut self.rng,
            );
            let Spawn { position, velocity } = spawner(&mut ctx);

            // Custom spawners may place particles anywhere
            let position = position.clamp(bounds_min, bounds_max);
            let color = speed_tint(self.config.base_color, velocity.length(), self.config.speed_cap);
            self.store
                .spawn(position, velocity, self.config.rest_density, color);
        }

        self.trail.clear();
        self.clock.reset();
        log::debug!(
            "Reseeded {} particles in {}x{} domain",
            count,
            self.config.width,
            self.config.height
        );
    }

    // ========== Stepping ==========

    /// Advance the fluid by `dt` seconds.
    ///
    /// A non-positive or non-finite `dt` is ignored, as is any step while
    /// paused.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("Ignoring step with invalid time step {}", dt);
            return;
        }
        if self.clock.is_paused() {
            return;
        }

        let started = self.clock.begin_step();
        let config = &self.config;

        self.grid.rebuild(
            self.store.as_slice(),
            config.neighbor_search,
            config.smoothing_radius,
            config.width,
            config.height,
        );

        SpatialDensityEstimator::new(config.smoothing_radius, config.rest_density, config.gas_constant)
            .compute(self.store.as_mut_slice(), &self.grid);

        let accumulator = ForceAccumulator::from_config(config);
        let external = ExternalForces {
            fields: &self.fields,
            pointer: &self.pointer,
            time: self.clock.simulated_time(),
        };
        let forces = accumulator.accumulate(self.store.as_slice(), &self.grid, &external);
        accumulator.apply(self.store.as_mut_slice(), &forces, dt);

        Integrator::from_config(config).integrate(self.store.as_mut_slice(), dt);

        self.clock.finish_step(started, dt);
        if self.trail_enabled {
            self.trail.record(self.clock.step_count(), self.store.as_slice());
        }

        log::trace!(
            "Step {} took {:?}",
            self.clock.step_count(),
            self.clock.last_step_duration()
        );
    }

    /// Advance by the configured time step.
    pub fn tick(&mut self) {
        self.step(self.config.time_step);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.clock.set_paused(paused);
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    // ========== Force fields ==========

    /// Replace every force field, returning the new identities in order.
    pub fn set_force_fields<I>(&mut self, fields: I) -> Vec<ForceFieldId>
    where
        I: IntoIterator<Item = ForceField>,
    {
        self.fields.replace(fields)
    }

    pub fn add_force_field(&mut self, field: ForceField) -> ForceFieldId {
        self.fields.add(field)
    }

    /// Remove a field. Unknown identities are ignored.
    pub fn remove_force_field(&mut self, id: ForceFieldId) -> Option<ForceField> {
        self.fields.remove(id)
    }

    pub fn force_fields(&self) -> &ForceFieldSet {
        &self.fields
    }

    /// Engage or release the pointer force.
    ///
    /// Positive `strength` pulls toward `(x, y)`, negative pushes away.
    pub fn set_pointer_force(&mut self, active: bool, x: f32, y: f32, strength: f32, radius: f32) {
        self.pointer.engaged = active;
        self.pointer.position = glam::Vec2::new(x, y);
        self.pointer.strength = strength;
        self.pointer.radius = radius;
    }

    pub fn pointer(&self) -> &PointerForce {
        &self.pointer
    }

    // ========== Presets ==========

    /// Swap in a named preset and reseed.
    ///
    /// On error the simulation is left untouched.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), SimulationError> {
        let config = self.presets.resolve(name, &self.config)?;
        self.config = config;
        log::info!("Applied preset {:?}", name);
        self.reseed();
        Ok(())
    }

    pub fn presets(&self) -> &PresetCatalog {
        &self.presets
    }

    /// Catalog for registering custom presets.
    pub fn presets_mut(&mut self) -> &mut PresetCatalog {
        &mut self.presets
    }

    // ========== Trails ==========

    /// Enable or disable trail recording. Disabling drops recorded frames.
    pub fn set_trail_enabled(&mut self, enabled: bool) {
        self.trail_enabled = enabled;
        if !enabled {
            self.trail.clear();
        }
    }

    pub fn trail_enabled(&self) -> bool {
        self.trail_enabled
    }

    /// Change how many frames are kept. Existing frames beyond the new
    /// length are evicted oldest first.
    pub fn set_trail_length(&mut self, length: usize) {
        self.config.trail_length = length;
        self.trail.set_capacity(length);
    }

    /// Recorded frames, oldest first via [`TrailBuffer::iter`].
    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.as_slice()
    }

    /// Owned copy of positions and colors for a renderer.
    pub fn snapshot(&self) -> Vec<ParticleVertex> {
        self.store.snapshot()
    }

    /// Total kinetic energy (unit mass).
    pub fn kinetic_energy(&self) -> f32 {
        self.store.kinetic_energy()
    }

    pub fn debug_stats(&self) -> DebugStats {
        DebugStats {
            particle_count: self.store.len(),
            force_field_count: self.fields.len(),
            last_step_duration: self.clock.last_step_duration(),
            step_count: self.clock.step_count(),
            simulated_time: self.clock.simulated_time(),
            trail_len: self.trail.len(),
        }
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("particles", &self.store.len())
            .field("fields", &self.fields.len())
            .field("pointer", &self.pointer)
            .field("trail_enabled", &self.trail_enabled)
            .field("custom_spawner", &self.spawner.is_some())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
