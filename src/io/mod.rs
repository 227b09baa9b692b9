//! Input snapshot cells and output message types.

pub mod messages;
pub mod snapshot;

pub use messages::{CycleResult, GridSnapshot, LandmarkMessage, PoseEstimate};
pub use snapshot::SnapshotCell;
