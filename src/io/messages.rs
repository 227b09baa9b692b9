//! Output message types for the transport layer.
//!
//! These are plain serializable values; how they are carried (topics,
//! sockets, files) is up to the embedding application.

use serde::{Deserialize, Serialize};

use crate::algorithms::mapping::{LandmarkEstimate, OccupancyGrid};
use crate::core::math::log_odds_to_probability;
use crate::core::types::{Covariance3, Point2D, Pose2D, Twist2D};

/// Pose estimate published every cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseEstimate {
    /// Estimated pose (heading pinned at 0).
    pub pose: Pose2D,
    /// 3x3 pose covariance.
    pub covariance: Covariance3,
}

/// Occupancy grid snapshot with integer-percentage cells.
///
/// Cells are row-major, scaled 0-100 through the logistic transform;
/// untouched cells read 50.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Cell size in meters.
    pub resolution: f32,
    /// World X of the lower-left corner.
    pub origin_x: f32,
    /// World Y of the lower-left corner.
    pub origin_y: f32,
    /// Row-major occupancy percentages, 0-100.
    pub cells: Vec<u8>,
}

impl GridSnapshot {
    /// Export a grid's current state.
    pub fn from_grid(grid: &OccupancyGrid) -> Self {
        let (width, height) = grid.dimensions();
        let (origin_x, origin_y) = grid.origin();
        let cells = grid
            .cells()
            .iter()
            .map(|&lo| (log_odds_to_probability(lo) * 100.0).round() as u8)
            .collect();
        Self {
            width,
            height,
            resolution: grid.resolution(),
            origin_x,
            origin_y,
            cells,
        }
    }
}

/// One tracked landmark, published every cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkMessage {
    /// Stable landmark identity.
    pub id: u32,
    /// Estimated world position.
    pub position: Point2D,
    /// Row-major 2x2 position covariance.
    pub covariance: [f32; 4],
}

impl From<&LandmarkEstimate> for LandmarkMessage {
    fn from(estimate: &LandmarkEstimate) -> Self {
        Self {
            id: estimate.id,
            position: estimate.position,
            covariance: *estimate.covariance.as_slice(),
        }
    }
}

/// Everything one estimation cycle produced, for publishing and diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResult {
    /// The cycle's pose estimate.
    pub estimate: PoseEstimate,
    /// Tracked landmarks after this cycle's map update.
    pub landmarks: Vec<LandmarkMessage>,
    /// Effective sample size of the particle set.
    pub neff: f64,
    /// Whether the filter resampled this cycle.
    pub resampled: bool,
    /// Control command chosen by the exploration policy, when enabled.
    pub command: Option<Twist2D>,
}
