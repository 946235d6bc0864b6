//! Error types for SFPE.
//!
//! The solver itself never fails mid-step: degenerate geometry is handled
//! locally. Errors only surface when a configuration is built, swapped in
//! through a preset, or parsed from JSON.

use std::fmt;

/// A configuration value that would make the solver produce NaNs or
/// otherwise misbehave.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Smoothing radius must be strictly positive.
    SmoothingRadius(f32),
    /// Time step must be strictly positive and finite.
    TimeStep(f32),
    /// Damping factor must lie in `(0, 1]`.
    Damping(f32),
    /// Domain width and height must be strictly positive.
    Domain { width: f32, height: f32 },
    /// Margin leaves no interior to place particles in.
    Margin { margin: f32, width: f32, height: f32 },
    /// Rest density must not be negative.
    RestDensity(f32),
    /// An isolated particle's own kernel term `h²` exceeds the rest
    /// density, so it would sit above rest with nonzero pressure.
    IsolatedPressure { smoothing_radius: f32, rest_density: f32 },
    /// Gas constant (pressure stiffness) must not be negative.
    GasConstant(f32),
    /// Viscosity coefficient must not be negative.
    Viscosity(f32),
    /// Restitution must lie in `[0, 1]`.
    Restitution(f32),
    /// Speed cap used for coloring must be strictly positive.
    SpeedCap(f32),
    /// A field holds NaN or infinity.
    NonFinite(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::SmoothingRadius(h) => {
                write!(f, "Smoothing radius must be positive, got {}", h)
            }
            ConfigError::TimeStep(dt) => write!(f, "Time step must be positive and finite, got {}", dt),
            ConfigError::Damping(d) => write!(f, "Damping factor must be in (0, 1], got {}", d),
            ConfigError::Domain { width, height } => {
                write!(f, "Domain must have positive size, got {}x{}", width, height)
            }
            ConfigError::Margin { margin, width, height } => write!(
                f,
                "Margin {} leaves no interior in a {}x{} domain",
                margin, width, height
            ),
            ConfigError::RestDensity(r) => write!(f, "Rest density must not be negative, got {}", r),
            ConfigError::IsolatedPressure {
                smoothing_radius,
                rest_density,
            } => write!(
                f,
                "Smoothing radius {} gives an isolated particle density {} above rest density {}",
                smoothing_radius,
                smoothing_radius * smoothing_radius,
                rest_density
            ),
            ConfigError::GasConstant(k) => write!(f, "Gas constant must not be negative, got {}", k),
            ConfigError::Viscosity(v) => write!(f, "Viscosity must not be negative, got {}", v),
            ConfigError::Restitution(r) => write!(f, "Restitution must be in [0, 1], got {}", r),
            ConfigError::SpeedCap(s) => write!(f, "Speed cap must be positive, got {}", s),
            ConfigError::NonFinite(name) => write!(f, "Config field `{}` is not finite", name),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors returned by [`Simulation`](crate::Simulation) operations.
#[derive(Debug)]
pub enum SimulationError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// No preset with this name is registered in the catalog.
    UnknownPreset(String),
    /// Failed to parse or produce JSON.
    Serialization(serde_json::Error),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "Invalid configuration: {}", e),
            SimulationError::UnknownPreset(name) => write!(f, "Unknown preset: {:?}", name),
            SimulationError::Serialization(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Serialization(e) => Some(e),
            SimulationError::UnknownPreset(_) => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Serialization(e)
    }
}
