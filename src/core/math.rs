//! Mathematical primitives for planar SLAM.
//!
//! Angle normalization, Gaussian likelihoods, and the logistic transform
//! used by the occupancy grid.

use std::f32::consts::PI;

/// Normalize angle to [-π, π].
///
/// # Example
/// ```
/// use taraka_slam::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Unnormalized Gaussian likelihood of a squared residual.
///
/// `exp(-0.5 * residual_sq / variance)`. The normalization constant is
/// irrelevant for importance weights that get renormalized anyway.
/// Returns 1.0 for a zero residual and 0.0 when the variance is
/// (numerically) zero but the residual is not.
#[inline]
pub fn gaussian_likelihood(residual_sq: f64, variance: f64) -> f64 {
    if variance < 1e-12 {
        if residual_sq < 1e-12 {
            return 1.0;
        }
        return 0.0;
    }
    (-0.5 * residual_sq / variance).exp()
}

/// Logistic transform from log-odds to probability.
///
/// `P(occupied) = 1 / (1 + exp(-log_odds))`; 0 log-odds maps to 0.5.
#[inline]
pub fn log_odds_to_probability(log_odds: f32) -> f32 {
    1.0 / (1.0 + (-log_odds).exp())
}
