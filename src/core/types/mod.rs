//! Core data types shared across all layers.

mod covariance;
mod pose;
mod twist;

pub use covariance::{Covariance2, Covariance3};
pub use pose::{Point2D, Pose2D};
pub use twist::Twist2D;
