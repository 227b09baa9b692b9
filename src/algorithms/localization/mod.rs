//! Localization: particle filter pose estimation.

pub mod motion_model;
pub mod particle_filter;

pub use motion_model::{MotionModel, MotionModelConfig, Rng, SimpleRng};
pub use particle_filter::{Particle, ParticleFilter, ParticleFilterConfig, ParticleFilterState};
