//! Combined occupancy-grid and landmark mapping.

use crate::core::types::{Covariance3, Point2D, Pose2D};
use crate::error::Result;

use super::landmark_tracker::{LandmarkEstimate, LandmarkTracker, LandmarkTrackerConfig};
use super::occupancy_grid::{OccupancyGrid, OccupancyGridConfig};
use super::ray_tracer::RayTracer;

/// Configuration for the mapper.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Occupancy grid configuration.
    pub grid: OccupancyGridConfig,
    /// Landmark tracker configuration.
    pub landmarks: LandmarkTrackerConfig,
}

/// Fuses estimated poses, range returns, and landmark observations into a
/// persistent map.
///
/// Both sub-updates reference the estimated pose, never ground truth. Map
/// state only accumulates; neither cells nor landmarks are ever removed.
#[derive(Debug, Clone)]
pub struct Mapper {
    grid: OccupancyGrid,
    tracker: LandmarkTracker,
    ray_tracer: RayTracer,
}

impl Mapper {
    /// Create a mapper with an empty grid and no landmarks.
    pub fn new(config: MapperConfig) -> Result<Self> {
        Ok(Self {
            grid: OccupancyGrid::new(config.grid)?,
            tracker: LandmarkTracker::new(config.landmarks),
            ray_tracer: RayTracer::default(),
        })
    }

    /// The occupancy grid.
    #[inline]
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// The tracked landmark estimates.
    #[inline]
    pub fn landmarks(&self) -> &[LandmarkEstimate] {
        self.tracker.landmarks()
    }

    /// Apply one cycle of map updates.
    ///
    /// `range_points` and `landmark_observations` are offsets in the robot
    /// frame; each is transformed into the world frame through `pose`
    /// before fusion. Non-finite inputs are dropped individually.
    pub fn update(
        &mut self,
        pose: &Pose2D,
        pose_covariance: &Covariance3,
        range_points: &[Point2D],
        landmark_observations: &[Point2D],
    ) {
        let origin = pose.position();
        for point in range_points {
            if !point.is_finite() {
                continue;
            }
            let hit = pose.transform_point(point);
            self.ray_tracer.trace_ray(&mut self.grid, &origin, &hit);
        }

        for offset in landmark_observations {
            if !offset.is_finite() {
                continue;
            }
            let observed = pose.transform_point(offset);
            self.tracker.observe(observed, pose_covariance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> Mapper {
        Mapper::new(MapperConfig {
            grid: OccupancyGridConfig {
                width: 40,
                height: 40,
                resolution: 0.5,
                origin_x: -10.0,
                origin_y: -10.0,
                ..Default::default()
            },
            landmarks: LandmarkTrackerConfig::default(),
        })
        .expect("valid config")
    }

    #[test]
    fn test_range_point_carves_line() {
        let mut m = mapper();
        let pose = Pose2D::identity();
        // Single return at 3 m along angle 0.
        m.update(
            &pose,
            &Covariance3::zero(),
            &[Point2D::new(3.0, 0.0)],
            &[],
        );

        let grid = m.grid();
        let (px, py) = grid.world_to_cell_signed(0.0, 0.0);
        let (hx, hy) = grid.world_to_cell_signed(3.0, 0.0);
        assert_eq!(py, hy);
        // Every traversed cell except the last went free, the last occupied.
        for cx in px..hx {
            assert!(grid.log_odds(cx, py).unwrap() < 0.0, "cell {cx} not free");
        }
        assert!(grid.log_odds(hx, hy).unwrap() > 0.0);
    }

    #[test]
    fn test_landmark_observation_tracked_in_world_frame() {
        let mut m = mapper();
        let pose = Pose2D::new(1.0, 2.0, 0.0);
        m.update(
            &pose,
            &Covariance3::zero(),
            &[],
            &[Point2D::new(4.0, -2.0)],
        );
        assert_eq!(m.landmarks().len(), 1);
        assert_eq!(m.landmarks()[0].position, Point2D::new(5.0, 0.0));
    }

    #[test]
    fn test_non_finite_inputs_dropped() {
        let mut m = mapper();
        let pose = Pose2D::identity();
        m.update(
            &pose,
            &Covariance3::zero(),
            &[Point2D::new(f32::NAN, 0.0)],
            &[Point2D::new(0.0, f32::INFINITY)],
        );
        assert!(m.landmarks().is_empty());
        let (free, _, occupied) = m.grid().count_cells();
        assert_eq!(free, 0);
        assert_eq!(occupied, 0);
    }

    #[test]
    fn test_map_state_accumulates() {
        let mut m = mapper();
        let pose = Pose2D::identity();
        let scan = [Point2D::new(2.0, 0.0)];
        let obs = [Point2D::new(0.0, 3.0)];
        for _ in 0..5 {
            m.update(&pose, &Covariance3::zero(), &scan, &obs);
        }
        assert_eq!(m.landmarks().len(), 1);
        let (free, _, occupied) = m.grid().count_cells();
        assert!(free > 0);
        assert!(occupied > 0);
    }
}
