//! Covariance matrix types for pose and landmark estimates.

use serde::{Deserialize, Serialize};

/// 3x3 pose covariance over (x, y, theta).
///
/// Row-major storage. Symmetric positive-semi-definite by construction;
/// degenerate values are repaired via [`Covariance3::regularized`] before
/// they are handed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Covariance3 {
    /// Row-major 3x3 matrix data
    data: [f32; 9],
}

impl Covariance3 {
    /// Create a zero covariance matrix.
    #[inline]
    pub fn zero() -> Self {
        Self { data: [0.0; 9] }
    }

    /// Create a diagonal covariance matrix.
    ///
    /// Parameters are variances: xx = σ²_x, yy = σ²_y, tt = σ²_θ
    #[inline]
    pub fn diagonal(xx: f32, yy: f32, tt: f32) -> Self {
        Self {
            data: [xx, 0.0, 0.0, 0.0, yy, 0.0, 0.0, 0.0, tt],
        }
    }

    /// Create from row-major array.
    #[inline]
    pub fn from_array(data: [f32; 9]) -> Self {
        Self { data }
    }

    /// Get variance of x (element [0,0]).
    #[inline]
    pub fn var_x(&self) -> f32 {
        self.data[0]
    }

    /// Get variance of y (element [1,1]).
    #[inline]
    pub fn var_y(&self) -> f32 {
        self.data[4]
    }

    /// Get variance of theta (element [2,2]).
    #[inline]
    pub fn var_theta(&self) -> f32 {
        self.data[8]
    }

    /// Get raw data as slice.
    #[inline]
    pub fn as_slice(&self) -> &[f32; 9] {
        &self.data
    }

    /// Whether every entry is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// The x/y position block as a 2x2 covariance.
    #[inline]
    pub fn position_block(&self) -> Covariance2 {
        Covariance2::from_array([self.data[0], self.data[1], self.data[3], self.data[4]])
    }

    /// Repair a degenerate matrix so NaN/Inf never propagates downstream.
    ///
    /// Non-finite matrices collapse to `diagonal(min_var, min_var, 0)`;
    /// otherwise the x/y diagonal is floored at `min_var`. The theta
    /// variance is left alone (the consuming system pins heading).
    pub fn regularized(&self, min_var: f32) -> Self {
        if !self.is_finite() {
            return Self::diagonal(min_var, min_var, 0.0);
        }
        let mut data = self.data;
        data[0] = data[0].max(min_var);
        data[4] = data[4].max(min_var);
        Self { data }
    }
}

impl Default for Covariance3 {
    fn default() -> Self {
        Self::zero()
    }
}

/// 2x2 position covariance for landmark estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Covariance2 {
    /// Row-major 2x2 matrix data
    data: [f32; 4],
}

impl Covariance2 {
    /// Create a zero covariance matrix.
    #[inline]
    pub fn zero() -> Self {
        Self { data: [0.0; 4] }
    }

    /// Create an isotropic covariance: `variance * I`.
    #[inline]
    pub fn isotropic(variance: f32) -> Self {
        Self {
            data: [variance, 0.0, 0.0, variance],
        }
    }

    /// Create from row-major array.
    #[inline]
    pub fn from_array(data: [f32; 4]) -> Self {
        Self { data }
    }

    /// Get raw data as slice.
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.data
    }

    /// Determinant of the matrix.
    #[inline]
    pub fn det(&self) -> f32 {
        self.data[0] * self.data[3] - self.data[1] * self.data[2]
    }

    /// Trace of the matrix.
    #[inline]
    pub fn trace(&self) -> f32 {
        self.data[0] + self.data[3]
    }

    /// Matrix sum.
    #[inline]
    pub fn add(&self, other: &Covariance2) -> Covariance2 {
        Covariance2::from_array([
            self.data[0] + other.data[0],
            self.data[1] + other.data[1],
            self.data[2] + other.data[2],
            self.data[3] + other.data[3],
        ])
    }

    /// Matrix inverse, regularizing near-singular input.
    ///
    /// A matrix with |det| below `eps` gets `eps` added on its diagonal
    /// first so the inverse always exists.
    pub fn inverse_regularized(&self, eps: f32) -> Covariance2 {
        let mut m = self.data;
        let mut det = m[0] * m[3] - m[1] * m[2];
        if det.abs() < eps || !det.is_finite() {
            m[0] += eps;
            m[3] += eps;
            det = m[0] * m[3] - m[1] * m[2];
        }
        let inv_det = 1.0 / det;
        Covariance2::from_array([
            m[3] * inv_det,
            -m[1] * inv_det,
            -m[2] * inv_det,
            m[0] * inv_det,
        ])
    }

    /// Matrix product.
    #[inline]
    pub fn mul(&self, other: &Covariance2) -> Covariance2 {
        let a = &self.data;
        let b = &other.data;
        Covariance2::from_array([
            a[0] * b[0] + a[1] * b[2],
            a[0] * b[1] + a[1] * b[3],
            a[2] * b[0] + a[3] * b[2],
            a[2] * b[1] + a[3] * b[3],
        ])
    }

    /// Multiply this matrix by a column vector (x, y).
    #[inline]
    pub fn mul_vec(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.data[0] * x + self.data[1] * y,
            self.data[2] * x + self.data[3] * y,
        )
    }

    /// Force exact symmetry by averaging the off-diagonal entries.
    #[inline]
    pub fn symmetrized(&self) -> Covariance2 {
        let off = 0.5 * (self.data[1] + self.data[2]);
        Covariance2::from_array([self.data[0], off, off, self.data[3]])
    }
}

impl Default for Covariance2 {
    fn default() -> Self {
        Self::zero()
    }
}
