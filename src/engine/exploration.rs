//! Exploration policy driven by map uncertainty.

use serde::Deserialize;

use crate::algorithms::mapping::LandmarkEstimate;
use crate::core::types::{Pose2D, Twist2D};

/// Configuration for the exploration policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExplorationConfig {
    /// Whether the orchestrator emits control commands at all.
    pub enabled: bool,

    /// Proportional gain from x-distance to linear speed (1/s).
    pub gain: f32,

    /// Saturation limit for the linear command (m/s).
    pub max_speed: f32,

    /// Linear speed of the search pattern used before any landmark is
    /// tracked (m/s).
    pub search_linear: f32,

    /// Angular speed of the search pattern (rad/s).
    pub search_angular: f32,
}

impl Default for ExplorationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gain: 0.3,
            max_speed: 0.2,
            search_linear: 0.1,
            search_angular: 0.2,
        }
    }
}

/// Picks the next control command from the current map state.
///
/// With no landmarks tracked yet, the robot slowly rotates and advances to
/// find one. Otherwise it drives toward the landmark with the largest
/// covariance determinant, so observation effort goes where positional
/// uncertainty is highest.
#[derive(Debug, Clone)]
pub struct ExplorationPolicy {
    config: ExplorationConfig,
}

impl ExplorationPolicy {
    /// Create a policy with the given configuration.
    pub fn new(config: ExplorationConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ExplorationConfig {
        &self.config
    }

    /// Choose the next command, or `None` when the policy is disabled.
    pub fn next_command(
        &self,
        pose: &Pose2D,
        landmarks: &[LandmarkEstimate],
    ) -> Option<Twist2D> {
        if !self.config.enabled {
            return None;
        }

        let Some(target) = self.most_uncertain(landmarks) else {
            return Some(Twist2D::new(
                self.config.search_linear,
                0.0,
                self.config.search_angular,
            ));
        };

        let dx = target.position.x - pose.x;
        let linear_x = dx.signum() * (self.config.gain * dx.abs()).min(self.config.max_speed);
        Some(Twist2D::new(linear_x, 0.0, 0.0))
    }

    fn most_uncertain<'a>(
        &self,
        landmarks: &'a [LandmarkEstimate],
    ) -> Option<&'a LandmarkEstimate> {
        landmarks.iter().reduce(|best, lm| {
            if lm.covariance.det() > best.covariance.det() {
                lm
            } else {
                best
            }
        })
    }
}
