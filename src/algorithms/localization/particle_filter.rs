//! Particle filter (Monte Carlo) pose estimation from landmark observations.

use crate::algorithms::mapping::LandmarkEstimate;
use crate::core::math::gaussian_likelihood;
use crate::core::types::{Covariance3, Point2D, Pose2D, Twist2D};
use crate::error::{Result, SlamError};

use super::motion_model::{MotionModel, MotionModelConfig, Rng, SimpleRng};

/// A single particle representing a possible robot pose.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Hypothesized robot pose.
    pub pose: Pose2D,
    /// Normalized importance weight.
    pub weight: f64,
}

/// Configuration for the particle filter.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct ParticleFilterConfig {
    /// Number of particles. Fixed for the lifetime of the filter.
    /// Typical: 50-500.
    pub num_particles: usize,

    /// Effective particle ratio threshold for resampling.
    /// Resample when Neff / num_particles < this value.
    /// Typical: 0.5
    pub resampling_threshold: f64,

    /// Standard deviation of position process noise per step (m).
    pub position_std_dev: f32,

    /// Integration timestep (s). Matches the cycle period.
    pub timestep: f32,

    /// Standard deviation of the landmark observation likelihood (m).
    /// Typical: 0.2-0.5.
    pub measurement_std_dev: f32,

    /// Lower bound on any single observation's likelihood factor,
    /// so one outlier observation cannot zero a particle's weight.
    pub likelihood_floor: f64,

    /// Random seed for deterministic behavior (0 for time-based).
    pub seed: u64,
}

impl Default for ParticleFilterConfig {
    fn default() -> Self {
        Self {
            num_particles: 100,
            resampling_threshold: 0.5,
            position_std_dev: 0.1,
            timestep: 0.1,
            measurement_std_dev: 0.3,
            likelihood_floor: 1e-9,
            seed: 0,
        }
    }
}

/// Per-cycle filter diagnostics.
#[derive(Debug, Clone, Default)]
pub struct ParticleFilterState {
    /// Effective number of particles after weighting.
    pub neff: f64,
    /// Whether resampling occurred this cycle.
    pub resampled: bool,
    /// Largest normalized particle weight.
    pub max_weight: f64,
    /// Total number of update cycles run.
    pub iterations: u64,
}

/// Monte Carlo localizer over a fixed-size particle arena.
///
/// Each [`update`](ParticleFilter::update) runs the full
/// predict / weight / normalize / estimate / resample sequence and always
/// produces an estimate; every degenerate condition recovers locally.
#[derive(Debug)]
pub struct ParticleFilter {
    config: ParticleFilterConfig,
    particles: Vec<Particle>,
    motion_model: MotionModel,
    rng: SimpleRng,
    state: ParticleFilterState,
}

impl ParticleFilter {
    /// Create a new particle filter with all particles at the initial pose.
    ///
    /// Fails fast on a zero particle count or non-positive timestep; these
    /// are the only fatal conditions in the filter.
    pub fn new(config: ParticleFilterConfig, initial_pose: Pose2D) -> Result<Self> {
        if config.num_particles == 0 {
            return Err(SlamError::Config("particle count must be positive".into()));
        }
        if config.timestep <= 0.0 {
            return Err(SlamError::Config("timestep must be positive".into()));
        }

        let seed = if config.seed == 0 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(12345)
        } else {
            config.seed
        };

        let motion_model = MotionModel::new(MotionModelConfig {
            position_std_dev: config.position_std_dev,
            timestep: config.timestep,
        });

        let n = config.num_particles;
        let particles = vec![
            Particle {
                pose: initial_pose,
                weight: 1.0 / n as f64,
            };
            n
        ];

        Ok(Self {
            config,
            particles,
            motion_model,
            rng: SimpleRng::new(seed),
            state: ParticleFilterState::default(),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ParticleFilterConfig {
        &self.config
    }

    /// Current particles (for inspection and visualization).
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Current filter diagnostics.
    pub fn state(&self) -> &ParticleFilterState {
        &self.state
    }

    /// Run one full estimation cycle.
    ///
    /// Propagates every particle by the control command, reweights against
    /// the observed landmark offsets matched to the tracked `landmarks`,
    /// normalizes, and resamples when the effective sample size collapses.
    /// With no observations or no tracked landmarks the weighting step is
    /// skipped and the cycle is pure propagation.
    ///
    /// Returns the weighted mean pose (heading pinned at 0) and the
    /// regularized weighted sample covariance.
    pub fn update(
        &mut self,
        control: &Twist2D,
        observations: &[Point2D],
        landmarks: &[LandmarkEstimate],
    ) -> (Pose2D, Covariance3) {
        self.state.iterations += 1;
        self.state.resampled = false;

        self.predict(control);
        if !observations.is_empty() && !landmarks.is_empty() {
            self.weight(observations, landmarks);
        }
        self.normalize();

        let estimate = self.estimate();
        let covariance = self.covariance(&estimate);

        let sum_sq: f64 = self.particles.iter().map(|p| p.weight * p.weight).sum();
        self.state.neff = if sum_sq > 1e-12 { 1.0 / sum_sq } else { 0.0 };
        self.state.max_weight = self.particles.iter().map(|p| p.weight).fold(0.0, f64::max);

        let threshold = self.config.resampling_threshold * self.particles.len() as f64;
        if self.state.neff < threshold {
            self.resample();
            self.state.resampled = true;
        }

        (estimate, covariance)
    }

    fn predict(&mut self, control: &Twist2D) {
        for particle in &mut self.particles {
            particle.pose = self
                .motion_model
                .sample(&particle.pose, control, &mut self.rng);
        }
    }

    fn weight(&mut self, observations: &[Point2D], landmarks: &[LandmarkEstimate]) {
        let variance = (self.config.measurement_std_dev as f64).powi(2);
        let floor = self.config.likelihood_floor;

        for particle in &mut self.particles {
            let mut likelihood = 1.0f64;
            for observed in observations {
                // Match the landmark whose predicted offset from this
                // particle is closest to the observation.
                let mut best_residual_sq = f64::INFINITY;
                for landmark in landmarks {
                    let predicted = particle.pose.inverse_transform_point(&landmark.position);
                    let residual_sq = observed.distance_squared(&predicted) as f64;
                    if residual_sq < best_residual_sq {
                        best_residual_sq = residual_sq;
                    }
                }
                likelihood *= gaussian_likelihood(best_residual_sq, variance).max(floor);
            }
            particle.weight *= likelihood;
        }
    }

    fn normalize(&mut self) {
        let sum: f64 = self.particles.iter().map(|p| p.weight).sum();
        if sum <= 0.0 || !sum.is_finite() {
            log::warn!("Particle weights degenerate (sum = {sum}), resetting to uniform");
            let uniform = 1.0 / self.particles.len() as f64;
            for particle in &mut self.particles {
                particle.weight = uniform;
            }
            return;
        }
        for particle in &mut self.particles {
            particle.weight /= sum;
        }
    }

    /// Weighted mean pose with heading pinned at 0.
    fn estimate(&self) -> Pose2D {
        let mut sum_x = 0.0f64;
        let mut sum_y = 0.0f64;
        for p in &self.particles {
            sum_x += p.weight * p.pose.x as f64;
            sum_y += p.weight * p.pose.y as f64;
        }
        // Weights sum to 1 after normalization.
        Pose2D::new(sum_x as f32, sum_y as f32, 0.0)
    }

    /// Weighted sample covariance around the mean, regularized so a
    /// collapsed particle set still reports the process-noise floor.
    fn covariance(&self, mean: &Pose2D) -> Covariance3 {
        let mut cov_xx = 0.0f64;
        let mut cov_xy = 0.0f64;
        let mut cov_yy = 0.0f64;
        for p in &self.particles {
            let dx = (p.pose.x - mean.x) as f64;
            let dy = (p.pose.y - mean.y) as f64;
            cov_xx += p.weight * dx * dx;
            cov_xy += p.weight * dx * dy;
            cov_yy += p.weight * dy * dy;
        }

        let min_var = self.config.position_std_dev * self.config.position_std_dev;
        Covariance3::from_array([
            cov_xx as f32,
            cov_xy as f32,
            0.0,
            cov_xy as f32,
            cov_yy as f32,
            0.0,
            0.0,
            0.0,
            0.0,
        ])
        .regularized(min_var)
    }

    /// Low-variance resampling; weights reset to uniform afterwards.
    fn resample(&mut self) {
        let n = self.particles.len();
        let mut cumulative: Vec<f64> = Vec::with_capacity(n);
        let mut sum = 0.0;
        for p in &self.particles {
            sum += p.weight;
            cumulative.push(sum);
        }

        if sum > 1e-12 {
            for c in &mut cumulative {
                *c /= sum;
            }
        } else {
            for (i, c) in cumulative.iter_mut().enumerate() {
                *c = (i + 1) as f64 / n as f64;
            }
        }

        let step = 1.0 / n as f64;
        let mut r = self.rng.gen_f32() as f64 * step;
        let mut idx = 0;
        let uniform = 1.0 / n as f64;

        let mut new_particles = Vec::with_capacity(n);
        for _ in 0..n {
            while r > cumulative[idx] && idx < n - 1 {
                idx += 1;
            }
            let mut picked = self.particles[idx];
            picked.weight = uniform;
            new_particles.push(picked);
            r += step;
        }
        self.particles = new_particles;
    }
}
