//! Landmark tracking with Kalman-style position fusion.

use crate::core::types::{Covariance2, Covariance3, Point2D};

/// A tracked landmark: estimated position, uncertainty, stable identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkEstimate {
    /// Identity assigned at creation, stable for the run's lifetime.
    pub id: u32,
    /// Estimated world position.
    pub position: Point2D,
    /// 2x2 position covariance.
    pub covariance: Covariance2,
}

/// Configuration for the landmark tracker.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct LandmarkTrackerConfig {
    /// Maximum distance for associating an observation to an existing
    /// estimate (m). Beyond this a new landmark is created. Typical: 0.5-2.0.
    pub gating_distance: f32,

    /// Standard deviation seeding a new landmark's covariance (m).
    pub initial_std_dev: f32,

    /// Standard deviation of a single landmark observation (m).
    pub measurement_std_dev: f32,
}

impl Default for LandmarkTrackerConfig {
    fn default() -> Self {
        Self {
            gating_distance: 1.0,
            initial_std_dev: 0.5,
            measurement_std_dev: 0.2,
        }
    }
}

/// Maintains the set of landmark estimates.
///
/// Estimates are appended, never removed; association is nearest-estimate
/// within the gating distance. Each fusion step shrinks (never grows) the
/// matched estimate's covariance.
#[derive(Debug, Clone)]
pub struct LandmarkTracker {
    config: LandmarkTrackerConfig,
    landmarks: Vec<LandmarkEstimate>,
    next_id: u32,
}

impl LandmarkTracker {
    /// Create an empty tracker.
    pub fn new(config: LandmarkTrackerConfig) -> Self {
        Self {
            config,
            landmarks: Vec::new(),
            next_id: 0,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LandmarkTrackerConfig {
        &self.config
    }

    /// The tracked landmark estimates.
    #[inline]
    pub fn landmarks(&self) -> &[LandmarkEstimate] {
        &self.landmarks
    }

    /// Number of tracked landmarks.
    #[inline]
    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    /// Whether any landmarks are tracked yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Fuse one observed landmark position (world frame).
    ///
    /// The observation noise combines the configured measurement variance
    /// with the position block of the pose covariance, so an uncertain pose
    /// pulls estimates less. Non-finite observations are dropped.
    pub fn observe(&mut self, observed: Point2D, pose_covariance: &Covariance3) {
        if !observed.is_finite() {
            log::warn!("Dropping non-finite landmark observation");
            return;
        }

        let meas_var = self.config.measurement_std_dev * self.config.measurement_std_dev;
        let noise = Covariance2::isotropic(meas_var).add(&pose_covariance.position_block());

        match self.associate(&observed) {
            Some(idx) => self.fuse(idx, &observed, &noise),
            None => {
                let id = self.next_id;
                self.next_id += 1;
                let initial_var = self.config.initial_std_dev * self.config.initial_std_dev;
                self.landmarks.push(LandmarkEstimate {
                    id,
                    position: observed,
                    covariance: Covariance2::isotropic(initial_var),
                });
                log::debug!(
                    "Created landmark {id} at ({:.2}, {:.2})",
                    observed.x,
                    observed.y
                );
            }
        }
    }

    /// Nearest estimate within the gating distance, if any.
    fn associate(&self, observed: &Point2D) -> Option<usize> {
        let gate_sq = self.config.gating_distance * self.config.gating_distance;
        let mut best: Option<(usize, f32)> = None;
        for (idx, lm) in self.landmarks.iter().enumerate() {
            let d_sq = lm.position.distance_squared(observed);
            if d_sq <= gate_sq && best.map_or(true, |(_, b)| d_sq < b) {
                best = Some((idx, d_sq));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Kalman update of a single estimate with identity measurement model.
    fn fuse(&mut self, idx: usize, observed: &Point2D, noise: &Covariance2) {
        let lm = &mut self.landmarks[idx];
        let p = lm.covariance;

        // K = P (P + R)^-1
        let innovation_cov = p.add(noise);
        let gain = p.mul(&innovation_cov.inverse_regularized(1e-6));

        let dx = observed.x - lm.position.x;
        let dy = observed.y - lm.position.y;
        let (cx, cy) = gain.mul_vec(dx, dy);
        lm.position = Point2D::new(lm.position.x + cx, lm.position.y + cy);

        // P = (I - K) P
        let g = gain.as_slice();
        let i_minus_k = Covariance2::from_array([1.0 - g[0], -g[1], -g[2], 1.0 - g[3]]);
        lm.covariance = i_minus_k.mul(&p).symmetrized();
    }
}
