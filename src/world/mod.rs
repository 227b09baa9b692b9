//! Ground-truth world representation and simulated sensing.
//!
//! The world model is an explicit immutable value handed to whoever needs
//! it; nothing in this crate holds it as shared global state.

pub mod geometry;
pub mod model;
pub mod sensor;

pub use geometry::{Geometry, Polygon2D, Segment2D};
pub use model::WorldModel;
pub use sensor::SensorSynthesizer;
