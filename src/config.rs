//! Startup configuration
//!
//! Read once before the simulation starts and treated as constant for the run.
//! Every field has a default, so a config file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::settings::Feature;

/// Accepted tick rates (ticks per second)
const TICK_RATE_RANGE: (f64, f64) = (1.0, 10_000.0);
/// Longest headless run (one day)
const MAX_DEMO_SECONDS: f64 = 86_400.0;

/// Per-run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Asteroids in the initial field
    pub num_asteroids: usize,
    /// Ticks per second
    pub tick_rate: f64,
    /// Half-size of the wrap cube around the ship
    pub wrap_bound: f64,
    /// Half-size of the cube the initial field is generated in
    pub generation_bound: f64,
    /// RNG seed; drawn from the OS when absent
    pub seed: Option<u64>,
    /// Start with tracer torpedoes enabled
    pub tracers: bool,
    /// Headless runner stops after this long
    pub demo_seconds: f64,
    /// Audio master volume, 0.0 - 1.0
    pub master_volume: f32,
    /// Cosmetic features to start switched off, by name
    pub disabled_features: Vec<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_asteroids: NUM_ASTEROIDS,
            tick_rate: TICKS_PER_SEC,
            wrap_bound: WRAP_BOUND,
            generation_bound: GENERATION_BOUND,
            seed: None,
            tracers: true,
            demo_seconds: 30.0,
            master_volume: 0.8,
            disabled_features: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: String) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        let (min_rate, max_rate) = TICK_RATE_RANGE;
        if !(min_rate..=max_rate).contains(&self.tick_rate) {
            return invalid(
                "tick_rate",
                format!("must be in [{min_rate}, {max_rate}], got {}", self.tick_rate),
            );
        }
        if !(self.wrap_bound.is_finite() && self.wrap_bound > WRAP_INSET) {
            return invalid(
                "wrap_bound",
                format!("must be greater than {}, got {}", WRAP_INSET, self.wrap_bound),
            );
        }
        if !(self.generation_bound.is_finite() && self.generation_bound > 0.0) {
            return invalid(
                "generation_bound",
                format!("must be positive, got {}", self.generation_bound),
            );
        }
        if self.generation_bound > self.wrap_bound {
            return invalid(
                "generation_bound",
                format!(
                    "must not exceed wrap_bound ({}), got {}",
                    self.wrap_bound, self.generation_bound
                ),
            );
        }
        if !(0.0..=MAX_DEMO_SECONDS).contains(&self.demo_seconds) {
            return invalid(
                "demo_seconds",
                format!("must be in [0, {MAX_DEMO_SECONDS}], got {}", self.demo_seconds),
            );
        }
        if !(0.0..=1.0).contains(&self.master_volume) {
            return invalid(
                "master_volume",
                format!("must be in [0, 1], got {}", self.master_volume),
            );
        }
        if let Some(name) = self
            .disabled_features
            .iter()
            .find(|name| Feature::from_str(name).is_none())
        {
            return invalid("disabled_features", format!("unknown feature {name:?}"));
        }
        Ok(())
    }

    /// Features named in `disabled_features`
    pub fn disabled(&self) -> impl Iterator<Item = Feature> + '_ {
        self.disabled_features
            .iter()
            .filter_map(|name| Feature::from_str(name))
    }

    /// Score scale relative to the standard field
    pub fn difficulty_multiplier(&self) -> f64 {
        self.num_asteroids as f64 / NUM_ASTEROIDS as f64
    }

    /// Fixed step length in seconds
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.difficulty_multiplier(), 1.0);
    }

    #[test]
    fn test_partial_json() {
        let config = SimConfig::from_json(r#"{"num_asteroids": 100, "seed": 42}"#).unwrap();
        assert_eq!(config.num_asteroids, 100);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.tick_rate, TICKS_PER_SEC);
        assert_eq!(config.difficulty_multiplier(), 2.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = SimConfig::from_json(r#"{"tick_rate": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tick_rate", .. }));

        let err = SimConfig::from_json(r#"{"generation_bound": 200}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "generation_bound", .. }));

        let err = SimConfig::from_json(r#"{"wrap_bound": 5, "generation_bound": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "wrap_bound", .. }));

        let err = SimConfig::from_json(r#"{"tick_rate": 1e-30}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tick_rate", .. }));

        let err = SimConfig::from_json(r#"{"tick_rate": 1e9}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tick_rate", .. }));

        let err = SimConfig::from_json(r#"{"demo_seconds": 1e30}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "demo_seconds", .. }));

        let err = SimConfig::from_json(r#"{"master_volume": 1.5}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "master_volume", .. }));

        let err = SimConfig::from_json(r#"{"disabled_features": ["warp_drive"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "disabled_features", .. }));
    }

    #[test]
    fn test_accepted_values_convert_to_durations() {
        for json in [
            r#"{"tick_rate": 1, "demo_seconds": 86400}"#,
            r#"{"tick_rate": 10000, "demo_seconds": 0}"#,
        ] {
            let config = SimConfig::from_json(json).unwrap();
            assert!(std::time::Duration::try_from_secs_f64(config.dt()).is_ok());
            assert!(std::time::Duration::try_from_secs_f64(config.demo_seconds).is_ok());
        }
    }

    #[test]
    fn test_disabled_features() {
        let config =
            SimConfig::from_json(r#"{"disabled_features": ["dust", "Tracers"]}"#).unwrap();
        let disabled: Vec<Feature> = config.disabled().collect();
        assert_eq!(disabled, vec![Feature::Dust, Feature::Tracers]);
    }

    #[test]
    fn test_parse_error() {
        let err = SimConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_missing_file() {
        let err = SimConfig::load("/nonexistent/asteroid-drift.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/asteroid-drift.json"));
    }
}
