//! Foundation layer: types and math with no internal dependencies.

pub mod math;
pub mod types;
