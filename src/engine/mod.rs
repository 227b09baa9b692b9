//! Engine layer: the fixed-period SLAM cycle and exploration policy.

pub mod exploration;
pub mod orchestrator;

pub use exploration::{ExplorationConfig, ExplorationPolicy};
pub use orchestrator::{SlamInputs, SlamOrchestrator};
