//! TarakaSLAM - Beacon-based planar SLAM with a simulated world
//!
//! # Architecture
//!
//! The crate is organized into 5 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← Snapshot cells, messages
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Orchestration
//! │              (cycle loop, exploration)              │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Core algorithms
//! │            (localization, mapping)                  │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    world/                           │  ← Ground truth + sensing
//! │           (geometry, model, sensor)                 │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                (types, math)                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Data flow per cycle
//!
//! Control input and landmark observations feed the particle filter, whose
//! pose estimate (with covariance) drives the occupancy-grid and landmark
//! map update; the exploration policy then turns map uncertainty into the
//! next control command. The `world` layer stands in for real hardware by
//! synthesizing range scans and beacon sightings from a known ground-truth
//! scene.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Ground-truth world and simulated sensing (depends on core)
// ============================================================================
pub mod world;

// ============================================================================
// Layer 3: Algorithms (depends on core)
// ============================================================================
pub mod algorithms;

// ============================================================================
// Layer 4: Engine (depends on core, algorithms, io)
// ============================================================================
pub mod engine;

// ============================================================================
// Layer 5: I/O infrastructure (depends on core, algorithms)
// ============================================================================
pub mod io;

pub mod config;
pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::math;
pub use crate::core::types::{Covariance2, Covariance3, Point2D, Pose2D, Twist2D};

// World model and simulated sensing
pub use world::{Geometry, Polygon2D, Segment2D, SensorSynthesizer, WorldModel};

// Algorithms - Localization
pub use algorithms::localization::{
    MotionModel, MotionModelConfig, Particle, ParticleFilter, ParticleFilterConfig,
    ParticleFilterState, Rng, SimpleRng,
};

// Algorithms - Mapping
pub use algorithms::mapping::{
    CellState, LandmarkEstimate, LandmarkTracker, LandmarkTrackerConfig, Mapper, MapperConfig,
    OccupancyGrid, OccupancyGridConfig, RayTracer,
};

// Engine
pub use engine::{ExplorationConfig, ExplorationPolicy, SlamInputs, SlamOrchestrator};

// I/O
pub use io::{CycleResult, GridSnapshot, LandmarkMessage, PoseEstimate, SnapshotCell};

// Configuration and errors
pub use config::{SensorConfig, SlamConfig};
pub use error::{Result, SlamError};
