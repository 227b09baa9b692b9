//! Ground-truth world model: boundary, obstacles, beacons.

use crate::core::types::Point2D;
use crate::world::geometry::{
    segment_polygon_intersection, segment_segment_intersection, Geometry, Polygon2D, Segment2D,
};

/// A fixed 2D world: rectangular boundary, filled polygonal obstacles, and
/// point beacons.
///
/// The boundary acts as a closed polyline (its edges block and intersect,
/// its interior does not), while obstacles are filled regions. Construct the
/// world once, add obstacles and beacons before use, then treat it as
/// immutable.
#[derive(Debug, Clone)]
pub struct WorldModel {
    boundary: Polygon2D,
    obstacles: Vec<Polygon2D>,
    beacons: Vec<Point2D>,
}

impl WorldModel {
    /// Create a world bounded by an axis-aligned rectangle.
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            boundary: Polygon2D::rectangle(x_min, y_min, x_max, y_max),
            obstacles: Vec::new(),
            beacons: Vec::new(),
        }
    }

    /// Add a filled obstacle polygon.
    pub fn add_obstacle(&mut self, obstacle: Polygon2D) {
        self.obstacles.push(obstacle);
    }

    /// Add a ground-truth beacon position.
    pub fn add_beacon(&mut self, beacon: Point2D) {
        self.beacons.push(beacon);
    }

    /// The boundary rectangle.
    #[inline]
    pub fn boundary(&self) -> &Polygon2D {
        &self.boundary
    }

    /// The obstacle set.
    #[inline]
    pub fn obstacles(&self) -> &[Polygon2D] {
        &self.obstacles
    }

    /// The beacon positions.
    #[inline]
    pub fn beacons(&self) -> &[Point2D] {
        &self.beacons
    }

    /// All intersection points of a query geometry with the boundary edges
    /// and every obstacle.
    ///
    /// Points are collected in encounter order: boundary edges first, then
    /// obstacles in insertion order; within each shape the hits are ordered
    /// along the query segment. Degenerate (zero-length) queries intersect
    /// nothing.
    pub fn intersections(&self, query: &Geometry) -> Vec<Point2D> {
        let mut out = Vec::new();
        self.collect_intersections(query, &mut out);
        out
    }

    /// Whether the straight segment between two points is unobstructed.
    #[inline]
    pub fn is_visible(&self, from: &Point2D, to: &Point2D) -> bool {
        self.intersections(&Geometry::segment(*from, *to)).is_empty()
    }

    fn collect_intersections(&self, query: &Geometry, out: &mut Vec<Point2D>) {
        match query {
            Geometry::Segment(seg) => self.collect_segment_intersections(seg, out),
            Geometry::Point(p) => {
                if self.boundary.edges().any(|e| e.contains_point(p))
                    || self.obstacles.iter().any(|o| o.contains(p))
                {
                    out.push(*p);
                }
            }
            Geometry::MultiPoint(pts) => {
                for p in pts {
                    self.collect_intersections(&Geometry::Point(*p), out);
                }
            }
            Geometry::Polygon(poly) => {
                // A polygon query intersects through its outline.
                for edge in poly.edges() {
                    self.collect_segment_intersections(&edge, out);
                }
            }
            Geometry::Collection(geoms) => {
                for g in geoms {
                    self.collect_intersections(g, out);
                }
            }
        }
    }

    fn collect_segment_intersections(&self, seg: &Segment2D, out: &mut Vec<Point2D>) {
        if seg.is_degenerate() {
            return;
        }
        let mut found = Vec::new();
        for edge in self.boundary.edges() {
            if let Some(hit) = segment_segment_intersection(seg, &edge) {
                hit.collect_into(&mut found);
            }
        }
        for obstacle in &self.obstacles {
            if let Some(hit) = segment_polygon_intersection(seg, obstacle) {
                hit.collect_into(&mut found);
            }
        }
        // Adjacent boundary edges report a shared corner once each; keep
        // the first of any near-coincident pair so the result reads as an
        // ordered set.
        for p in found {
            if !out
                .iter()
                .any(|q| q.distance(&p) < crate::world::geometry::GEOM_EPS)
            {
                out.push(p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn open_world() -> WorldModel {
        WorldModel::new(-10.0, -10.0, 10.0, 10.0)
    }

    #[test]
    fn test_query_outside_everything_is_empty() {
        let mut world = open_world();
        world.add_obstacle(Polygon2D::square(Point2D::new(4.0, 4.0), 1.0));
        let query = Geometry::segment(Point2D::new(20.0, 20.0), Point2D::new(25.0, 20.0));
        assert!(world.intersections(&query).is_empty());
    }

    #[test]
    fn test_interior_segment_misses_boundary() {
        let world = open_world();
        let query = Geometry::segment(Point2D::new(-5.0, 0.0), Point2D::new(5.0, 0.0));
        assert!(world.intersections(&query).is_empty());
    }

    #[test]
    fn test_segment_crossing_boundary() {
        let world = open_world();
        let query = Geometry::segment(Point2D::new(5.0, 0.0), Point2D::new(15.0, 0.0));
        let hits = world.intersections(&query);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].x, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_segment_through_obstacle() {
        let mut world = open_world();
        world.add_obstacle(Polygon2D::square(Point2D::new(0.0, 0.0), 1.0));
        let query = Geometry::segment(Point2D::new(-5.0, 0.0), Point2D::new(5.0, 0.0));
        let hits = world.intersections(&query);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_boundary_corner_reported_once() {
        // A query through the corner at (10, 10) touches both adjacent
        // boundary edges; the shared point appears once, not per edge.
        let world = open_world();
        let query = Geometry::segment(Point2D::new(9.0, 9.0), Point2D::new(11.0, 11.0));
        let hits = world.intersections(&query);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(hits[0].y, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_visibility_open_world() {
        let world = open_world();
        assert!(world.is_visible(&Point2D::new(0.0, 0.0), &Point2D::new(5.0, 0.0)));
    }

    #[test]
    fn test_visibility_blocked_by_obstacle() {
        let mut world = open_world();
        world.add_obstacle(Polygon2D::square(Point2D::new(2.5, 0.0), 1.0));
        assert!(!world.is_visible(&Point2D::new(0.0, 0.0), &Point2D::new(5.0, 0.0)));
    }

    #[test]
    fn test_point_on_edge_is_included() {
        let world = open_world();
        let on_edge = Point2D::new(10.0, 3.0);
        let hits = world.intersections(&Geometry::Point(on_edge));
        assert_eq!(hits, vec![on_edge]);
    }

    #[test]
    fn test_degenerate_query_is_empty() {
        let mut world = open_world();
        world.add_obstacle(Polygon2D::square(Point2D::new(0.0, 0.0), 1.0));
        let p = Point2D::new(0.0, 0.0);
        assert!(world.intersections(&Geometry::segment(p, p)).is_empty());
    }
}
