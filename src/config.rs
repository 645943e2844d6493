//! World configuration
//!
//! Everything tunable about a simulation, loadable from TOML. Missing fields
//! fall back to the defaults in `constants`. Values are validated when a
//! world is built from a config; the runtime setters on `RigidBodyWorld`
//! stay unchecked.

use crate::constants::*;
use crate::error::{invalid_config, PhysicsError, PhysicsResult};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contact solver tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Penetration left alone by positional correction
    pub slop: f32,
    /// Share of the remaining penetration removed per sub-step
    pub correction_percent: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            slop: PENETRATION_SLOP,
            correction_percent: CORRECTION_PERCENT,
        }
    }
}

/// Sleep heuristic tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepSettings {
    pub velocity_threshold: f32,
    pub time_threshold: f32,
}

impl Default for SleepSettings {
    fn default() -> Self {
        Self {
            velocity_threshold: SLEEP_VELOCITY_THRESHOLD,
            time_threshold: SLEEP_TIME_THRESHOLD,
        }
    }
}

/// 2D spatial grid settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_GRID_CELL_SIZE,
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub gravity: Vec3,
    pub fixed_timestep: f32,
    pub max_substeps: u32,
    pub solver: SolverSettings,
    pub sleep: SleepSettings,
    pub grid: GridConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::from_array(DEFAULT_GRAVITY),
            fixed_timestep: DEFAULT_FIXED_TIMESTEP,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            solver: SolverSettings::default(),
            sleep: SleepSettings::default(),
            grid: GridConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> PhysicsResult<Self> {
        let config: WorldConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> PhysicsResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| PhysicsError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        log::info!("Loading physics config from {}", path.display());
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> PhysicsResult<String> {
        toml::to_string(self).map_err(|e| PhysicsError::Serialization {
            context: "toml".to_string(),
            error: e.to_string(),
        })
    }

    pub fn to_json(&self) -> PhysicsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings that would stall or corrupt the fixed-step loop
    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.gravity.is_finite() {
            return Err(invalid_config("gravity", format!("{:?}", self.gravity), "must be finite"));
        }
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(invalid_config(
                "fixed_timestep",
                self.fixed_timestep,
                "must be a positive finite number",
            ));
        }
        if self.max_substeps == 0 {
            return Err(invalid_config("max_substeps", 0, "must be at least 1"));
        }
        if self.solver.slop < 0.0 {
            return Err(invalid_config("solver.slop", self.solver.slop, "must not be negative"));
        }
        if self.solver.correction_percent <= 0.0 || self.solver.correction_percent > 1.0 {
            return Err(invalid_config(
                "solver.correction_percent",
                self.solver.correction_percent,
                "must be in (0, 1]",
            ));
        }
        if self.sleep.velocity_threshold < 0.0 {
            return Err(invalid_config(
                "sleep.velocity_threshold",
                self.sleep.velocity_threshold,
                "must not be negative",
            ));
        }
        if self.sleep.time_threshold < 0.0 {
            return Err(invalid_config(
                "sleep.time_threshold",
                self.sleep.time_threshold,
                "must not be negative",
            ));
        }
        if !self.grid.cell_size.is_finite() || self.grid.cell_size <= 0.0 {
            return Err(invalid_config(
                "grid.cell_size",
                self.grid.cell_size,
                "must be a positive finite number",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_substeps, 4);
        assert_eq!(config.gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = WorldConfig::from_toml_str(
            r#"
            fixed_timestep = 0.01
            gravity = [0.0, -1.62, 0.0]

            [sleep]
            time_threshold = 1.0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.fixed_timestep, 0.01);
        assert_eq!(config.gravity.y, -1.62);
        assert_eq!(config.sleep.time_threshold, 1.0);
        assert_eq!(config.sleep.velocity_threshold, SLEEP_VELOCITY_THRESHOLD);
        assert_eq!(config.solver, SolverSettings::default());
        assert_eq!(config.max_substeps, DEFAULT_MAX_SUBSTEPS);
    }

    #[test]
    fn test_rejects_non_positive_timestep() {
        let err = WorldConfig::from_toml_str("fixed_timestep = 0.0").unwrap_err();
        match err {
            PhysicsError::InvalidConfig { field, .. } => assert_eq!(field, "fixed_timestep"),
            other => panic!("unexpected error: {}", other),
        }
        assert!(WorldConfig::from_toml_str("fixed_timestep = -0.5").is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(WorldConfig::from_toml_str("max_substeps = 0").is_err());
        assert!(WorldConfig::from_toml_str("[solver]\ncorrection_percent = 1.5").is_err());
        assert!(WorldConfig::from_toml_str("[solver]\nslop = -0.1").is_err());
        assert!(WorldConfig::from_toml_str("[grid]\ncell_size = 0.0").is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = WorldConfig::from_toml_str("fixed_timestep = \"fast\"").unwrap_err();
        assert!(matches!(err, PhysicsError::ConfigParse { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = WorldConfig::default();
        config.max_substeps = 8;
        config.grid.cell_size = 32.0;
        let text = config.to_toml_string().expect("serializes");
        let back = WorldConfig::from_toml_str(&text).expect("parses back");
        assert_eq!(back, config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "max_substeps = 2").expect("write config");

        let config = WorldConfig::from_toml_file(file.path()).expect("loads");
        assert_eq!(config.max_substeps, 2);

        let missing = WorldConfig::from_toml_file(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(PhysicsError::Io { .. })));
    }
}
