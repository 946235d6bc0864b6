//! Simulation configuration.
//!
//! A [`SimulationConfig`] is validated once, when it enters a
//! [`Simulation`](crate::Simulation), and is then immutable for the run.
//! The only way to change it mid-run is to apply a preset, which swaps
//! the preset fields and reseeds the whole population.
//!
//! # Example
//!
//! ```ignore
//! let config = SimulationConfig::default()
//!     .with_particle_count(200)
//!     .with_domain(640.0, 360.0)
//!     .with_gravity(0.0)
//!     .with_seed(7);
//! config.validate()?;
//! ```

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimulationError};
use crate::spatial::NeighborSearch;

/// All tunables of one simulation run.
///
/// Units are simulation-space units (typically pixels of the host widget)
/// and seconds. The y axis grows downward, so a positive `gravity` pulls
/// particles toward the bottom edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of particles created by `initialize` and every reseed.
    pub particle_count: usize,

    /// Domain width.
    pub width: f32,

    /// Domain height.
    pub height: f32,

    /// Distance from each edge that particles are kept away from.
    pub margin: f32,

    /// Kernel support radius (h). Particles farther apart never interact.
    /// `h²` may not exceed `rest_density`.
    pub smoothing_radius: f32,

    /// Density floor; also the density at which pressure is zero.
    pub rest_density: f32,

    /// Pressure stiffness: `pressure = gas_constant * (density - rest_density)`.
    pub gas_constant: f32,

    /// Velocity diffusion coefficient between neighbors.
    pub viscosity: f32,

    /// Constant acceleration along +y.
    pub gravity: f32,

    /// Velocity multiplier applied after forces each step, in `(0, 1]`.
    pub damping: f32,

    /// Fixed step used by [`Simulation::tick`](crate::Simulation::tick).
    pub time_step: f32,

    /// Fraction of velocity kept (and reversed) on a wall hit.
    pub restitution: f32,

    /// Global multiplier for force fields and the pointer force.
    pub force_multiplier: f32,

    /// Speed mapped to the brightest tint.
    pub speed_cap: f32,

    /// Maximum speed of freshly spawned particles.
    pub initial_speed: f32,

    /// RGBA color of a particle at rest.
    pub base_color: Vec4,

    /// Seed of the spawn RNG.
    pub seed: u64,

    /// Number of snapshots kept for trails.
    pub trail_length: usize,

    /// Neighbor search strategy for the density and pair-force passes.
    pub neighbor_search: NeighborSearch,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: 150,
            width: 400.0,
            height: 300.0,
            margin: 5.0,
            smoothing_radius: 25.0,
            rest_density: 1000.0,
            gas_constant: 50.0,
            viscosity: 50.0,
            gravity: 300.0,
            damping: 0.99,
            time_step: 0.016,
            restitution: 0.5,
            force_multiplier: 1.0,
            speed_cap: 200.0,
            initial_speed: 20.0,
            base_color: Vec4::new(0.2, 0.5, 0.95, 1.0),
            seed: 0x5F1D,
            trail_length: 8,
            neighbor_search: NeighborSearch::Grid,
        }
    }
}

impl SimulationConfig {
    /// Set the particle count.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the domain size.
    pub fn with_domain(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the wall margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the kernel support radius.
    pub fn with_smoothing_radius(mut self, radius: f32) -> Self {
        self.smoothing_radius = radius;
        self
    }

    /// Set the rest density.
    pub fn with_rest_density(mut self, density: f32) -> Self {
        self.rest_density = density;
        self
    }

    /// Set the pressure stiffness.
    pub fn with_gas_constant(mut self, gas_constant: f32) -> Self {
        self.gas_constant = gas_constant;
        self
    }

    /// Set the viscosity coefficient.
    pub fn with_viscosity(mut self, viscosity: f32) -> Self {
        self.viscosity = viscosity;
        self
    }

    /// Set gravity along +y.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the velocity damping factor.
    pub fn with_damping(mut self, damping: f32) -> Self {
        self.damping = damping;
        self
    }

    /// Set the fixed time step.
    pub fn with_time_step(mut self, time_step: f32) -> Self {
        self.time_step = time_step;
        self
    }

    /// Set the wall restitution.
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the global force-field multiplier.
    pub fn with_force_multiplier(mut self, multiplier: f32) -> Self {
        self.force_multiplier = multiplier;
        self
    }

    /// Set the speed mapped to full tint.
    pub fn with_speed_cap(mut self, speed_cap: f32) -> Self {
        self.speed_cap = speed_cap;
        self
    }

    /// Set the maximum spawn speed.
    pub fn with_initial_speed(mut self, speed: f32) -> Self {
        self.initial_speed = speed;
        self
    }

    /// Set the base color.
    pub fn with_base_color(mut self, color: Vec4) -> Self {
        self.base_color = color;
        self
    }

    /// Set the spawn RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the trail length.
    pub fn with_trail_length(mut self, length: usize) -> Self {
        self.trail_length = length;
        self
    }

    /// Set the neighbor search strategy.
    pub fn with_neighbor_search(mut self, search: NeighborSearch) -> Self {
        self.neighbor_search = search;
        self
    }

    /// Lower-left corner of the region particles are kept in.
    #[inline]
    pub fn bounds_min(&self) -> Vec2 {
        Vec2::splat(self.margin)
    }

    /// Upper-right corner of the region particles are kept in.
    #[inline]
    pub fn bounds_max(&self) -> Vec2 {
        Vec2::new(self.width - self.margin, self.height - self.margin)
    }

    /// Check every field against its valid range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("width", self.width),
            ("height", self.height),
            ("margin", self.margin),
            ("smoothing_radius", self.smoothing_radius),
            ("rest_density", self.rest_density),
            ("gas_constant", self.gas_constant),
            ("viscosity", self.viscosity),
            ("gravity", self.gravity),
            ("damping", self.damping),
            ("restitution", self.restitution),
            ("force_multiplier", self.force_multiplier),
            ("speed_cap", self.speed_cap),
            ("initial_speed", self.initial_speed),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        if !self.base_color.is_finite() {
            return Err(ConfigError::NonFinite("base_color"));
        }

        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(ConfigError::TimeStep(self.time_step));
        }
        if self.smoothing_radius <= 0.0 {
            return Err(ConfigError::SmoothingRadius(self.smoothing_radius));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::Domain {
                width: self.width,
                height: self.height,
            });
        }
        if self.margin < 0.0 || 2.0 * self.margin >= self.width.min(self.height) {
            return Err(ConfigError::Margin {
                margin: self.margin,
                width: self.width,
                height: self.height,
            });
        }
        if self.damping <= 0.0 || self.damping > 1.0 {
            return Err(ConfigError::Damping(self.damping));
        }
        if self.rest_density < 0.0 {
            return Err(ConfigError::RestDensity(self.rest_density));
        }
        if self.smoothing_radius * self.smoothing_radius > self.rest_density {
            return Err(ConfigError::IsolatedPressure {
                smoothing_radius: self.smoothing_radius,
                rest_density: self.rest_density,
            });
        }
        if self.gas_constant < 0.0 {
            return Err(ConfigError::GasConstant(self.gas_constant));
        }
        if self.viscosity < 0.0 {
            return Err(ConfigError::Viscosity(self.viscosity));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(ConfigError::Restitution(self.restitution));
        }
        if self.speed_cap <= 0.0 {
            return Err(ConfigError::SpeedCap(self.speed_cap));
        }
        Ok(())
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
