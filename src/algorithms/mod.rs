//! Estimation algorithms: localization and mapping.

pub mod localization;
pub mod mapping;
