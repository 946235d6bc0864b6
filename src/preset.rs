//! Named fluid presets.
//!
//! A preset is a complete bundle of the parameters that give a fluid its
//! character. Applying one replaces all of those fields at once; nothing
//! from the previous preset survives. Domain, population and trail
//! settings are not part of a preset and are left alone.
//!
//! | Preset | Feel |
//! |--------|------|
//! | `water` | Default, lively with gentle viscosity |
//! | `honey` | Thick, slow, heavily damped |
//! | `mercury` | Heavy, stiff, barely damped |
//! | `gas` | Light, rises slowly, soft pressure |
//! | `plasma` | Weightless, energetic, glowing |

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::error::SimulationError;

/// A complete parameter tuple for one kind of fluid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub viscosity: f32,
    pub gravity: f32,
    pub gas_constant: f32,
    pub damping: f32,
    pub base_color: Vec4,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        viscosity: f32,
        gravity: f32,
        gas_constant: f32,
        damping: f32,
        base_color: Vec4,
    ) -> Self {
        Self {
            name: name.into(),
            viscosity,
            gravity,
            gas_constant,
            damping,
            base_color,
        }
    }

    /// Copy of `config` with every preset field replaced.
    pub fn apply_to(&self, config: &SimulationConfig) -> SimulationConfig {
        SimulationConfig {
            viscosity: self.viscosity,
            gravity: self.gravity,
            gas_constant: self.gas_constant,
            damping: self.damping,
            base_color: self.base_color,
            ..config.clone()
        }
    }

    pub fn water() -> Self {
        Self::new("water", 50.0, 300.0, 50.0, 0.99, Vec4::new(0.2, 0.5, 0.95, 1.0))
    }

    pub fn honey() -> Self {
        Self::new("honey", 800.0, 250.0, 30.0, 0.95, Vec4::new(0.95, 0.7, 0.15, 1.0))
    }

    pub fn mercury() -> Self {
        Self::new("mercury", 20.0, 500.0, 120.0, 0.995, Vec4::new(0.75, 0.78, 0.82, 1.0))
    }

    pub fn gas() -> Self {
        Self::new("gas", 5.0, -40.0, 15.0, 0.985, Vec4::new(0.7, 0.9, 0.7, 0.6))
    }

    pub fn plasma() -> Self {
        Self::new("plasma", 10.0, 0.0, 80.0, 0.998, Vec4::new(0.9, 0.3, 0.95, 1.0))
    }
}

/// Lookup table of presets by name. Lookups ignore ASCII case.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetCatalog {
    presets: Vec<Preset>,
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self {
            presets: vec![
                Preset::water(),
                Preset::honey(),
                Preset::mercury(),
                Preset::gas(),
                Preset::plasma(),
            ],
        }
    }
}

impl PresetCatalog {
    /// Catalog with the built-in presets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with no presets.
    pub fn empty() -> Self {
        Self { presets: Vec::new() }
    }

    /// Parse a JSON array of presets into an otherwise empty catalog.
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let presets: Vec<Preset> = serde_json::from_str(json)?;
        let mut catalog = Self::empty();
        for preset in presets {
            catalog.insert(preset);
        }
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Add a preset, replacing any existing one with the same name.
    pub fn insert(&mut self, preset: Preset) -> Option<Preset> {
        match self
            .presets
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&preset.name))
        {
            Some(existing) => Some(std::mem::replace(existing, preset)),
            None => {
                self.presets.push(preset);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Preset> {
        let idx = self
            .presets
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))?;
        Some(self.presets.remove(idx))
    }

    /// Preset names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Build the config that results from applying `name` to `config`.
    ///
    /// The result is validated, so a preset can never put the simulation
    /// into a state that produces NaNs.
    pub fn resolve(&self, name: &str, config: &SimulationConfig) -> Result<SimulationConfig, SimulationError> {
        let preset = self
            .get(name)
            .ok_or_else(|| SimulationError::UnknownPreset(name.to_string()))?;
        let resolved = preset.apply_to(config);
        resolved.validate()?;
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_builtin_names() {
        let catalog = PresetCatalog::new();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["water", "honey", "mercury", "gas", "plasma"]);
    }

    #[test]
    fn test_builtins_are_valid() {
        let catalog = PresetCatalog::new();
        let base = SimulationConfig::default();
        for name in catalog.names() {
            assert!(catalog.resolve(name, &base).is_ok(), "preset {} invalid", name);
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let catalog = PresetCatalog::new();
        assert_eq!(catalog.get("HoNeY").map(|p| p.name.as_str()), Some("honey"));
    }

    #[test]
    fn test_apply_replaces_every_preset_field() {
        let base = SimulationConfig::default().with_particle_count(33).with_domain(640.0, 480.0);
        let honey = Preset::honey().apply_to(&base);
        let water = Preset::water().apply_to(&honey);

        let expected = Preset::water();
        assert_eq!(water.viscosity, expected.viscosity);
        assert_eq!(water.gravity, expected.gravity);
        assert_eq!(water.gas_constant, expected.gas_constant);
        assert_eq!(water.damping, expected.damping);
        assert_eq!(water.base_color, expected.base_color);

        // Non-preset fields untouched
        assert_eq!(water.particle_count, 33);
        assert_eq!(water.width, 640.0);
    }

    #[test]
    fn test_unknown_preset() {
        let catalog = PresetCatalog::new();
        let result = catalog.resolve("lava", &SimulationConfig::default());
        assert!(matches!(result, Err(SimulationError::UnknownPreset(name)) if name == "lava"));
    }

    #[test]
    fn test_invalid_custom_preset_rejected() {
        let mut catalog = PresetCatalog::new();
        catalog.insert(Preset::new("frozen", 1.0, 0.0, 1.0, 0.0, Vec4::ONE));
        let result = catalog.resolve("frozen", &SimulationConfig::default());
        assert!(matches!(
            result,
            Err(SimulationError::Config(ConfigError::Damping(_)))
        ));
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut catalog = PresetCatalog::new();
        let old = catalog.insert(Preset::new("Water", 1.0, 2.0, 3.0, 0.5, Vec4::ONE));
        assert_eq!(old, Some(Preset::water()));
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.get("water").unwrap().viscosity, 1.0);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            { "name": "oil", "viscosity": 200.0, "gravity": 280.0,
              "gas_constant": 40.0, "damping": 0.97, "base_color": [0.4, 0.3, 0.1, 1.0] }
        ]"#;
        let catalog = PresetCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let oil = catalog.get("oil").unwrap();
        assert_eq!(oil.base_color, Vec4::new(0.4, 0.3, 0.1, 1.0));
    }
}
