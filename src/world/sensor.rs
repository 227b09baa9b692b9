//! Simulated sensing against the ground-truth world.

use crate::core::types::{Point2D, Pose2D};
use crate::world::geometry::Geometry;
use crate::world::model::WorldModel;

/// Synthesizes the readings a robot at a known true pose would receive.
///
/// Owns the ground-truth world it measures against. All outputs are in the
/// robot frame (offsets relative to the given pose).
#[derive(Debug, Clone)]
pub struct SensorSynthesizer {
    world: WorldModel,
}

impl SensorSynthesizer {
    /// Create a synthesizer over a ground-truth world.
    pub fn new(world: WorldModel) -> Self {
        Self { world }
    }

    /// The underlying world model.
    #[inline]
    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    /// Simulate a 360-degree range scan from a true pose.
    ///
    /// Casts one ray of length `max_range` per angle in [0, 360) stepped by
    /// `step_deg` and keeps the nearest hit along each ray. A hit within
    /// [min_range, max_range] yields its offset from the pose; a clear ray
    /// yields the far endpoint (a maximum-range return); a hit closer than
    /// `min_range` drops that ray's reading. Output is ordered by ray angle.
    pub fn simulate_range_scan(
        &self,
        true_pose: &Pose2D,
        step_deg: f32,
        min_range: f32,
        max_range: f32,
    ) -> Vec<Point2D> {
        if step_deg <= 0.0 || !step_deg.is_finite() {
            log::warn!("Invalid scan step {step_deg} deg, returning empty scan");
            return Vec::new();
        }

        let origin = true_pose.position();
        let ray_count = (360.0 / step_deg).ceil() as usize;
        let mut scan = Vec::with_capacity(ray_count);

        // Angles come from an integer ray index; accumulating the step in
        // f32 drifts below 360 for non-representable steps and emits a
        // duplicate of the 0-degree ray.
        let mut ray = 0u32;
        loop {
            let angle_deg = ray as f32 * step_deg;
            if angle_deg >= 360.0 {
                break;
            }
            let theta = true_pose.theta + angle_deg.to_radians();
            let far = Point2D::new(
                origin.x + max_range * theta.cos(),
                origin.y + max_range * theta.sin(),
            );

            let hits = self.world.intersections(&Geometry::segment(origin, far));
            // Strict less-than keeps the first of equally-near hits.
            let mut nearest: Option<(Point2D, f32)> = None;
            for hit in hits {
                let d = origin.distance(&hit);
                if nearest.map_or(true, |(_, best)| d < best) {
                    nearest = Some((hit, d));
                }
            }

            match nearest {
                Some((hit, d)) => {
                    if d >= min_range {
                        scan.push(true_pose.inverse_transform_point(&hit));
                    }
                }
                None => scan.push(true_pose.inverse_transform_point(&far)),
            }

            ray += 1;
        }
        scan
    }

    /// Simulate landmark observations from a true pose.
    ///
    /// Emits one offset per beacon with unobstructed line of sight from the
    /// pose. Occluded beacons are silently omitted, modelling occlusion
    /// rather than sensor error.
    pub fn simulate_landmark_observations(&self, true_pose: &Pose2D) -> Vec<Point2D> {
        let origin = true_pose.position();
        self.world
            .beacons()
            .iter()
            .filter(|beacon| self.world.is_visible(&origin, beacon))
            .map(|beacon| true_pose.inverse_transform_point(beacon))
            .collect()
    }
}
