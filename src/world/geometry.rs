//! Geometry primitives for the ground-truth world model.
//!
//! Intersection queries are answered with a closed tagged-variant
//! [`Geometry`] type and a pattern-match point-extraction function, instead
//! of open-ended dynamic dispatch on shape types. Segments carry their
//! endpoints only (no parametric form), which keeps transforms and
//! intersection math free of trig.

use crate::core::types::Point2D;

/// Tolerance for geometric predicates, in meters.
///
/// World extents here are tens of meters, so 1e-5 is far below sensor
/// resolution while staying well above f32 rounding noise.
pub const GEOM_EPS: f32 = 1e-5;

/// A 2D line segment defined by its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2D {
    /// Start point of the segment.
    pub start: Point2D,
    /// End point of the segment.
    pub end: Point2D,
}

impl Segment2D {
    /// Create a new segment from two points.
    #[inline]
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    /// Direction vector from start to end (not normalized).
    #[inline]
    pub fn direction(&self) -> Point2D {
        self.end - self.start
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> f32 {
        self.direction().length()
    }

    /// Whether the segment is (numerically) zero-length.
    ///
    /// Degenerate segments intersect nothing.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length() < GEOM_EPS
    }

    /// Point along the segment at parameter t (0 = start, 1 = end).
    #[inline]
    pub fn point_at(&self, t: f32) -> Point2D {
        Point2D::new(
            self.start.x + t * (self.end.x - self.start.x),
            self.start.y + t * (self.end.y - self.start.y),
        )
    }

    /// Distance from a point to the segment.
    pub fn distance_to_point(&self, p: &Point2D) -> f32 {
        let d = self.direction();
        let len_sq = d.dot(&d);
        if len_sq < GEOM_EPS * GEOM_EPS {
            return self.start.distance(p);
        }
        let t = ((*p - self.start).dot(&d) / len_sq).clamp(0.0, 1.0);
        self.point_at(t).distance(p)
    }

    /// Whether a point lies on the segment (within tolerance).
    #[inline]
    pub fn contains_point(&self, p: &Point2D) -> bool {
        self.distance_to_point(p) < GEOM_EPS
    }
}

/// A simple polygon given by its ring of vertices (not repeated at the end).
///
/// Obstacles are treated as filled: a segment passing through the interior
/// intersects the polygon even if it crosses no edge endpoint exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    vertices: Vec<Point2D>,
}

impl Polygon2D {
    /// Create a polygon from at least three vertices.
    pub fn new(vertices: Vec<Point2D>) -> Self {
        assert!(vertices.len() >= 3, "polygon needs at least 3 vertices");
        Self { vertices }
    }

    /// Axis-aligned rectangle from corner coordinates.
    pub fn rectangle(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self::new(vec![
            Point2D::new(x_min, y_min),
            Point2D::new(x_max, y_min),
            Point2D::new(x_max, y_max),
            Point2D::new(x_min, y_max),
        ])
    }

    /// Axis-aligned square around a center point.
    pub fn square(center: Point2D, half_width: f32) -> Self {
        Self::rectangle(
            center.x - half_width,
            center.y - half_width,
            center.x + half_width,
            center.y + half_width,
        )
    }

    /// The vertex ring.
    #[inline]
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Iterate the polygon's edges, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Segment2D> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment2D::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Whether a point lies inside the polygon or on its boundary.
    pub fn contains(&self, p: &Point2D) -> bool {
        // Boundary points count as inside.
        if self.edges().any(|e| e.contains_point(p)) {
            return true;
        }

        // Ray casting toward +x.
        let mut inside = false;
        let n = self.vertices.len();
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if (vi.y > p.y) != (vj.y > p.y) {
                let x_cross = vj.x + (p.y - vj.y) / (vi.y - vj.y) * (vi.x - vj.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// Centroid of the vertex ring.
    pub fn centroid(&self) -> Point2D {
        let n = self.vertices.len() as f32;
        let mut cx = 0.0;
        let mut cy = 0.0;
        for v in &self.vertices {
            cx += v.x;
            cy += v.y;
        }
        Point2D::new(cx / n, cy / n)
    }
}

/// Closed set of geometry variants that can result from intersection queries.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single point.
    Point(Point2D),
    /// A set of points.
    MultiPoint(Vec<Point2D>),
    /// A line segment.
    Segment(Segment2D),
    /// A filled polygon.
    Polygon(Polygon2D),
    /// A nested collection of geometries.
    Collection(Vec<Geometry>),
}

impl Geometry {
    /// Convenience constructor for a segment query between two points.
    #[inline]
    pub fn segment(start: Point2D, end: Point2D) -> Self {
        Geometry::Segment(Segment2D::new(start, end))
    }

    /// Extract representative points from the geometry.
    ///
    /// Points and multi-points contribute themselves, segments their two
    /// endpoints, polygons their ring vertices, collections recurse.
    pub fn extract_points(&self) -> Vec<Point2D> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    /// Append this geometry's representative points to an existing buffer.
    pub fn collect_into(&self, out: &mut Vec<Point2D>) {
        match self {
            Geometry::Point(p) => out.push(*p),
            Geometry::MultiPoint(pts) => out.extend_from_slice(pts),
            Geometry::Segment(s) => {
                out.push(s.start);
                out.push(s.end);
            }
            Geometry::Polygon(poly) => out.extend_from_slice(poly.vertices()),
            Geometry::Collection(geoms) => {
                for g in geoms {
                    g.collect_into(out);
                }
            }
        }
    }
}

/// Intersection of two segments.
///
/// Returns a [`Geometry::Point`] for a proper crossing or endpoint touch,
/// a [`Geometry::Segment`] for a collinear overlap, and `None` when the
/// segments are disjoint or either input is degenerate.
pub fn segment_segment_intersection(a: &Segment2D, b: &Segment2D) -> Option<Geometry> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }

    let d1 = a.direction();
    let d2 = b.direction();
    let delta = b.start - a.start;
    let denom = d1.cross(&d2);

    // Scale-aware tolerance for the cross products.
    let eps = GEOM_EPS * (1.0 + d1.length() * d2.length());

    if denom.abs() < eps {
        // Parallel. Collinear only if b.start lies on the line through a.
        if delta.cross(&d1).abs() > eps {
            return None;
        }

        // Project b's endpoints onto a's parameter space.
        let len_sq = d1.dot(&d1);
        let t0 = delta.dot(&d1) / len_sq;
        let t1 = (b.end - a.start).dot(&d1) / len_sq;
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);

        if hi < lo - GEOM_EPS {
            return None;
        }
        if hi - lo < GEOM_EPS {
            return Some(Geometry::Point(a.point_at(lo.clamp(0.0, 1.0))));
        }
        return Some(Geometry::Segment(Segment2D::new(
            a.point_at(lo),
            a.point_at(hi),
        )));
    }

    let t = delta.cross(&d2) / denom;
    let u = delta.cross(&d1) / denom;
    let tol = GEOM_EPS;
    if (-tol..=1.0 + tol).contains(&t) && (-tol..=1.0 + tol).contains(&u) {
        return Some(Geometry::Point(a.point_at(t.clamp(0.0, 1.0))));
    }
    None
}

/// Intersection of a segment with a filled polygon.
///
/// Collects every edge crossing plus any segment endpoint inside the
/// polygon, ordered along the segment (so the point nearest `seg.start`
/// comes first). Returns `None` when the segment misses the polygon
/// entirely or is degenerate.
pub fn segment_polygon_intersection(seg: &Segment2D, poly: &Polygon2D) -> Option<Geometry> {
    if seg.is_degenerate() {
        return None;
    }

    let mut points: Vec<Point2D> = Vec::new();

    for edge in poly.edges() {
        match segment_segment_intersection(seg, &edge) {
            Some(Geometry::Point(p)) => points.push(p),
            Some(Geometry::Segment(s)) => {
                points.push(s.start);
                points.push(s.end);
            }
            _ => {}
        }
    }

    if poly.contains(&seg.start) {
        points.push(seg.start);
    }
    if poly.contains(&seg.end) {
        points.push(seg.end);
    }

    if points.is_empty() {
        return None;
    }

    // Order along the segment and drop near-duplicates (shared corners,
    // endpoint-on-edge cases produce the same point twice).
    let d = seg.direction();
    let len_sq = d.dot(&d);
    points.sort_by(|p, q| {
        let tp = (*p - seg.start).dot(&d) / len_sq;
        let tq = (*q - seg.start).dot(&d) / len_sq;
        tp.partial_cmp(&tq).unwrap_or(std::cmp::Ordering::Equal)
    });
    points.dedup_by(|p, q| p.distance(q) < GEOM_EPS);

    if points.len() == 1 {
        return Some(Geometry::Point(points[0]));
    }
    Some(Geometry::MultiPoint(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x0: f32, y0: f32, x1: f32, y1: f32) -> Segment2D {
        Segment2D::new(Point2D::new(x0, y0), Point2D::new(x1, y1))
    }

    #[test]
    fn test_segment_crossing() {
        let a = seg(-1.0, 0.0, 1.0, 0.0);
        let b = seg(0.0, -1.0, 0.0, 1.0);
        match segment_segment_intersection(&a, &b) {
            Some(Geometry::Point(p)) => {
                assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
                assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
            }
            other => panic!("expected point intersection, got {other:?}"),
        }
    }

    #[test]
    fn test_segment_disjoint() {
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(0.0, 1.0, 1.0, 1.0);
        assert!(segment_segment_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_segment_endpoint_touch() {
        // Touching exactly at an endpoint counts as an intersection.
        let a = seg(0.0, 0.0, 1.0, 0.0);
        let b = seg(1.0, 0.0, 1.0, 1.0);
        match segment_segment_intersection(&a, &b) {
            Some(Geometry::Point(p)) => {
                assert_relative_eq!(p.x, 1.0, epsilon = 1e-5);
                assert_relative_eq!(p.y, 0.0, epsilon = 1e-5);
            }
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_segment_collinear_overlap() {
        let a = seg(0.0, 0.0, 2.0, 0.0);
        let b = seg(1.0, 0.0, 3.0, 0.0);
        match segment_segment_intersection(&a, &b) {
            Some(Geometry::Segment(s)) => {
                assert_relative_eq!(s.start.x, 1.0, epsilon = 1e-5);
                assert_relative_eq!(s.end.x, 2.0, epsilon = 1e-5);
            }
            other => panic!("expected overlap segment, got {other:?}"),
        }
    }

    #[test]
    fn test_degenerate_segment_intersects_nothing() {
        let degenerate = seg(0.5, 0.0, 0.5, 0.0);
        let b = seg(0.0, 0.0, 1.0, 0.0);
        assert!(segment_segment_intersection(&degenerate, &b).is_none());
        assert!(segment_segment_intersection(&b, &degenerate).is_none());
    }

    #[test]
    fn test_polygon_contains() {
        let poly = Polygon2D::square(Point2D::new(0.0, 0.0), 1.0);
        assert!(poly.contains(&Point2D::new(0.0, 0.0)));
        assert!(poly.contains(&Point2D::new(0.9, 0.9)));
        // Boundary counts as inside.
        assert!(poly.contains(&Point2D::new(1.0, 0.0)));
        assert!(!poly.contains(&Point2D::new(1.1, 0.0)));
    }

    #[test]
    fn test_segment_through_polygon_two_crossings() {
        let poly = Polygon2D::square(Point2D::new(0.0, 0.0), 1.0);
        let query = seg(-2.0, 0.0, 2.0, 0.0);
        match segment_polygon_intersection(&query, &poly) {
            Some(Geometry::MultiPoint(pts)) => {
                assert_eq!(pts.len(), 2);
                // Ordered along the segment.
                assert_relative_eq!(pts[0].x, -1.0, epsilon = 1e-4);
                assert_relative_eq!(pts[1].x, 1.0, epsilon = 1e-4);
            }
            other => panic!("expected two crossings, got {other:?}"),
        }
    }

    #[test]
    fn test_segment_ending_inside_polygon() {
        let poly = Polygon2D::square(Point2D::new(0.0, 0.0), 1.0);
        let query = seg(-2.0, 0.0, 0.0, 0.0);
        let points = segment_polygon_intersection(&query, &poly)
            .expect("should intersect")
            .extract_points();
        // Entry crossing plus the interior endpoint.
        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0].x, -1.0, epsilon = 1e-4);
        assert_relative_eq!(points[1].x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_segment_missing_polygon() {
        let poly = Polygon2D::square(Point2D::new(0.0, 0.0), 1.0);
        let query = seg(-2.0, 2.0, 2.0, 2.0);
        assert!(segment_polygon_intersection(&query, &poly).is_none());
    }

    #[test]
    fn test_segment_inside_polygon() {
        let poly = Polygon2D::square(Point2D::new(0.0, 0.0), 2.0);
        let query = seg(-1.0, 0.0, 1.0, 0.0);
        let points = segment_polygon_intersection(&query, &poly)
            .expect("fully interior segment intersects")
            .extract_points();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_extract_points_collection_flattens() {
        let g = Geometry::Collection(vec![
            Geometry::Point(Point2D::new(1.0, 1.0)),
            Geometry::Collection(vec![Geometry::MultiPoint(vec![
                Point2D::new(2.0, 2.0),
                Point2D::new(3.0, 3.0),
            ])]),
            Geometry::segment(Point2D::new(4.0, 4.0), Point2D::new(5.0, 5.0)),
        ]);
        assert_eq!(g.extract_points().len(), 5);
    }

    #[test]
    fn test_polygon_centroid() {
        let poly = Polygon2D::square(Point2D::new(2.0, -1.0), 1.5);
        let c = poly.centroid();
        assert_relative_eq!(c.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(c.y, -1.0, epsilon = 1e-5);
    }
}
