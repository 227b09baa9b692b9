//! Velocity-based motion model for the particle filter.
//!
//! Integrates a planar velocity command over a fixed timestep and adds
//! independent Gaussian noise to each position component. The robot model
//! is heading-free, so the angular component is never integrated and each
//! particle keeps its heading.

use crate::core::types::{Pose2D, Twist2D};

/// Configuration for the velocity motion model.
#[derive(Debug, Clone, Copy)]
pub struct MotionModelConfig {
    /// Standard deviation of position process noise per step (m).
    /// Typical: 0.05-0.2 for a slow indoor platform.
    pub position_std_dev: f32,

    /// Integration timestep (s). Matches the estimation cycle period.
    pub timestep: f32,
}

impl Default for MotionModelConfig {
    fn default() -> Self {
        Self {
            position_std_dev: 0.1,
            timestep: 0.1,
        }
    }
}

/// Velocity motion model for sampling particle poses.
#[derive(Debug, Clone)]
pub struct MotionModel {
    config: MotionModelConfig,
}

impl MotionModel {
    /// Create a new motion model with the given configuration.
    pub fn new(config: MotionModelConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &MotionModelConfig {
        &self.config
    }

    /// Sample a new pose given the current pose and a velocity command.
    ///
    /// Non-finite commands are treated as zero velocity for the step.
    pub fn sample<R: Rng>(&self, pose: &Pose2D, control: &Twist2D, rng: &mut R) -> Pose2D {
        let control = control.sanitized();
        let dt = self.config.timestep;
        let x = pose.x + control.linear_x * dt + sample_gaussian(rng, self.config.position_std_dev);
        let y = pose.y + control.linear_y * dt + sample_gaussian(rng, self.config.position_std_dev);
        Pose2D::new(x, y, pose.theta)
    }
}

/// Trait for random number generation (abstracted for testing).
pub trait Rng {
    /// Generate a random f32 in [0, 1).
    fn gen_f32(&mut self) -> f32;

    /// Generate a random f32 from standard normal distribution.
    fn gen_standard_normal(&mut self) -> f32;
}

/// Simple LCG-based RNG for deterministic, dependency-free sampling.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    /// Create a new generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        // LCG parameters from Numerical Recipes
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }
}

impl Rng for SimpleRng {
    fn gen_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    fn gen_standard_normal(&mut self) -> f32 {
        // Box-Muller transform
        let u1 = self.gen_f32().max(1e-10);
        let u2 = self.gen_f32();
        let r = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * std::f32::consts::PI * u2;
        r * theta.cos()
    }
}

/// Sample from a zero-mean Gaussian.
fn sample_gaussian<R: Rng>(rng: &mut R, sigma: f32) -> f32 {
    if sigma < 1e-10 {
        return 0.0;
    }
    rng.gen_standard_normal() * sigma
}
