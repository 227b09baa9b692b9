//! Bresenham ray tracing for carving free space into the occupancy grid.
//!
//! A range return at distance D means every cell between the sensor and D
//! is free and the cell at D is occupied. The trace walks the discrete
//! cell line with integer arithmetic only.

use super::OccupancyGrid;
use crate::core::types::Point2D;

/// Ray tracer for applying range returns to an occupancy grid.
#[derive(Debug, Clone)]
pub struct RayTracer {
    /// Maximum ray length in cells, bounding a single trace.
    max_ray_length: usize,
}

impl Default for RayTracer {
    fn default() -> Self {
        Self {
            // 100 m at 10 cm resolution
            max_ray_length: 1000,
        }
    }
}

impl RayTracer {
    /// Create a ray tracer with a custom cell-length bound.
    pub fn new(max_ray_length: usize) -> Self {
        Self { max_ray_length }
    }

    /// Trace from `start` to `end` (world coordinates), marking every
    /// traversed cell free and the final cell occupied.
    ///
    /// Cells outside the grid extent are skipped without ending the trace.
    pub fn trace_ray(&self, grid: &mut OccupancyGrid, start: &Point2D, end: &Point2D) {
        let (sx, sy) = grid.world_to_cell_signed(start.x, start.y);
        let (ex, ey) = grid.world_to_cell_signed(end.x, end.y);
        self.bresenham(grid, sx, sy, ex, ey);
    }

    fn bresenham(&self, grid: &mut OccupancyGrid, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };

        let mut x = x0;
        let mut y = y0;
        let mut err = dx - dy;
        let mut steps = 0;

        loop {
            if x == x1 && y == y1 {
                grid.update_cell_signed(x, y, true);
                break;
            }

            grid.update_cell_signed(x, y, false);

            steps += 1;
            if steps >= self.max_ray_length {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::mapping::OccupancyGridConfig;

    fn grid_at_origin() -> OccupancyGrid {
        OccupancyGrid::new(OccupancyGridConfig {
            width: 20,
            height: 20,
            resolution: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
            ..Default::default()
        })
        .expect("valid config")
    }

    #[test]
    fn test_horizontal_ray_marks_free_then_occupied() {
        let mut grid = grid_at_origin();
        let tracer = RayTracer::default();
        tracer.trace_ray(&mut grid, &Point2D::new(0.5, 0.5), &Point2D::new(3.5, 0.5));

        // Cells (0,0), (1,0), (2,0) are free, (3,0) is occupied.
        for cx in 0..3 {
            assert!(grid.log_odds(cx, 0).unwrap() < 0.0, "cell {cx} not free");
        }
        assert!(grid.log_odds(3, 0).unwrap() > 0.0);
        // Nothing past the hit is touched.
        assert_eq!(grid.log_odds(4, 0), Some(0.0));
    }

    #[test]
    fn test_diagonal_ray_touches_contiguous_cells() {
        let mut grid = grid_at_origin();
        let tracer = RayTracer::default();
        tracer.trace_ray(&mut grid, &Point2D::new(0.5, 0.5), &Point2D::new(4.5, 4.5));

        for i in 0..4 {
            assert!(grid.log_odds(i, i).unwrap() < 0.0);
        }
        assert!(grid.log_odds(4, 4).unwrap() > 0.0);
    }

    #[test]
    fn test_ray_leaving_grid_is_partial() {
        let mut grid = grid_at_origin();
        let tracer = RayTracer::default();
        // Endpoint far outside the extent; in-grid cells still get carved.
        tracer.trace_ray(&mut grid, &Point2D::new(0.5, 0.5), &Point2D::new(30.5, 0.5));

        for cx in 0..20 {
            assert!(grid.log_odds(cx, 0).unwrap() < 0.0, "cell {cx} not free");
        }
    }

    #[test]
    fn test_zero_length_ray_marks_single_cell_occupied() {
        let mut grid = grid_at_origin();
        let tracer = RayTracer::default();
        tracer.trace_ray(&mut grid, &Point2D::new(5.5, 5.5), &Point2D::new(5.5, 5.5));
        assert!(grid.log_odds(5, 5).unwrap() > 0.0);
    }

    #[test]
    fn test_ray_length_bound_stops_trace() {
        let mut grid = grid_at_origin();
        let tracer = RayTracer::new(3);
        tracer.trace_ray(&mut grid, &Point2D::new(0.5, 0.5), &Point2D::new(10.5, 0.5));

        assert!(grid.log_odds(0, 0).unwrap() < 0.0);
        assert!(grid.log_odds(2, 0).unwrap() < 0.0);
        // Trace stopped before reaching the endpoint.
        assert_eq!(grid.log_odds(10, 0), Some(0.0));
    }
}
