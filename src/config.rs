//! Aggregated, file-loadable configuration.

use serde::Deserialize;
use std::path::Path;

use crate::algorithms::localization::ParticleFilterConfig;
use crate::algorithms::mapping::MapperConfig;
use crate::core::types::Pose2D;
use crate::engine::exploration::ExplorationConfig;
use crate::error::{Result, SlamError};

/// Simulated range sensor parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Angular spacing between scan rays (degrees).
    pub angular_step_deg: f32,

    /// Returns closer than this are discarded (m).
    pub min_range: f32,

    /// Ray length; clear rays report exactly this distance (m).
    pub max_range: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            angular_step_deg: 1.0,
            min_range: 0.1,
            max_range: 5.0,
        }
    }
}

/// Top-level configuration for the SLAM engine.
///
/// Every field has a sensible default, so a partial TOML file (or none at
/// all) yields a working setup. Call [`validate`](SlamConfig::validate)
/// before handing the config to constructors; invalid configuration is
/// the only fatal condition in the crate.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlamConfig {
    /// Estimation cycle period (s).
    pub cycle_period_s: f32,

    /// Pose the particle filter starts from.
    pub initial_pose: Pose2D,

    /// Particle filter settings.
    pub particle_filter: ParticleFilterConfig,

    /// Occupancy grid and landmark tracker settings.
    pub mapper: MapperConfig,

    /// Exploration policy settings.
    pub exploration: ExplorationConfig,

    /// Simulated sensor settings.
    pub sensor: SensorConfig,
}

impl Default for SlamConfig {
    fn default() -> Self {
        Self {
            cycle_period_s: 0.1,
            initial_pose: Pose2D::identity(),
            particle_filter: ParticleFilterConfig::default(),
            mapper: MapperConfig::default(),
            exploration: ExplorationConfig::default(),
            sensor: SensorConfig::default(),
        }
    }
}

impl SlamConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SlamConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check construction-time invariants.
    pub fn validate(&self) -> Result<()> {
        if self.cycle_period_s <= 0.0 || !self.cycle_period_s.is_finite() {
            return Err(SlamError::Config("cycle period must be positive".into()));
        }
        if self.particle_filter.num_particles == 0 {
            return Err(SlamError::Config("particle count must be positive".into()));
        }
        if self.mapper.grid.resolution <= 0.0 || !self.mapper.grid.resolution.is_finite() {
            return Err(SlamError::Config("grid resolution must be positive".into()));
        }
        if self.mapper.grid.width == 0 || self.mapper.grid.height == 0 {
            return Err(SlamError::Config("grid extent must be positive".into()));
        }
        if self.mapper.landmarks.gating_distance <= 0.0 {
            return Err(SlamError::Config("gating distance must be positive".into()));
        }
        if self.sensor.max_range <= self.sensor.min_range {
            return Err(SlamError::Config(
                "max sensor range must exceed min range".into(),
            ));
        }
        Ok(())
    }
}
