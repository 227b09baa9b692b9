//! Planar velocity command type.

use serde::{Deserialize, Serialize};

/// Planar velocity: linear components in m/s, angular in rad/s.
///
/// The robot model is heading-free (heading pinned at 0), so the linear
/// components are expressed directly in the world frame and the angular
/// component is carried for completeness but never integrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Twist2D {
    /// Linear velocity along world X (m/s)
    pub linear_x: f32,
    /// Linear velocity along world Y (m/s)
    pub linear_y: f32,
    /// Angular velocity (rad/s)
    pub angular: f32,
}

impl Twist2D {
    /// Create a new velocity command.
    #[inline]
    pub fn new(linear_x: f32, linear_y: f32, angular: f32) -> Self {
        Self {
            linear_x,
            linear_y,
            angular,
        }
    }

    /// Zero velocity.
    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Whether every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.linear_x.is_finite() && self.linear_y.is_finite() && self.angular.is_finite()
    }

    /// Replace a non-finite command with zero velocity.
    ///
    /// Malformed control input is treated as "hold still" for the cycle
    /// rather than aborting it.
    #[inline]
    pub fn sanitized(&self) -> Twist2D {
        if self.is_finite() {
            *self
        } else {
            Twist2D::zero()
        }
    }
}

impl Default for Twist2D {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_passes_finite() {
        let t = Twist2D::new(0.1, -0.2, 0.0);
        assert_eq!(t.sanitized(), t);
    }

    #[test]
    fn test_sanitized_zeroes_nan() {
        let t = Twist2D::new(f32::NAN, 0.0, 0.0);
        assert_eq!(t.sanitized(), Twist2D::zero());

        let t = Twist2D::new(0.0, f32::INFINITY, 0.0);
        assert_eq!(t.sanitized(), Twist2D::zero());
    }
}
