//! Error types for taraka-slam.

use thiserror::Error;

/// Crate error type.
///
/// Only construction-time configuration problems are fatal; everything the
/// estimation core encounters at runtime (degenerate weights, singular
/// covariances, out-of-grid rays) is recovered locally and never surfaces
/// here.
#[derive(Error, Debug)]
pub enum SlamError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for SlamError {
    fn from(e: toml::de::Error) -> Self {
        SlamError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SlamError>;
