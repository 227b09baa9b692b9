//! Mapping: occupancy grid, ray tracing, and landmark tracking.

pub mod landmark_tracker;
pub mod mapper;
pub mod occupancy_grid;
pub mod ray_tracer;

pub use landmark_tracker::{LandmarkEstimate, LandmarkTracker, LandmarkTrackerConfig};
pub use mapper::{Mapper, MapperConfig};
pub use occupancy_grid::{CellState, OccupancyGrid, OccupancyGridConfig};
pub use ray_tracer::RayTracer;
