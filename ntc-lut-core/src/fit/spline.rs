//! Piecewise cubic interpolation
//!
//! A C²-continuous cubic spline through every sample with "not-a-knot" end
//! conditions (the third derivative is continuous across the second and the
//! second-to-last knot). Outside the sample range the first or last cubic
//! piece is extended, so extrapolation works but loses accuracy quickly.
//!
//! ## Formulation
//!
//! With knot spacing `hᵢ = xᵢ₊₁ - xᵢ` and second derivatives `Mᵢ`:
//!
//! ```text
//! interior:   hᵢ₋₁·Mᵢ₋₁ + 2(hᵢ₋₁ + hᵢ)·Mᵢ + hᵢ·Mᵢ₊₁ = 6(Δᵢ - Δᵢ₋₁),  Δᵢ = (yᵢ₊₁ - yᵢ)/hᵢ
//! first row:  h₁·M₀ - (h₀ + h₁)·M₁ + h₀·M₂ = 0
//! last row:   hₙ₋₂·Mₙ₋₃ - (hₙ₋₃ + hₙ₋₂)·Mₙ₋₂ + hₙ₋₃·Mₙ₋₁ = 0
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::{
    errors::{LutError, LutResult},
    fit::matrix::solve_dense,
};

/// Minimum knots for a not-a-knot cubic
pub const MIN_KNOTS: usize = 4;

/// Cubic spline through `(x, y)` knots
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    knots: Vec<f64>,
    values: Vec<f64>,
    second_derivatives: Vec<f64>,
}

impl CubicSpline {
    /// Build a not-a-knot spline. `x` must be strictly increasing.
    pub fn not_a_knot(x: &[f64], y: &[f64]) -> LutResult<Self> {
        let n = x.len().min(y.len());
        if n < MIN_KNOTS {
            return Err(LutError::InsufficientData { required: MIN_KNOTS, available: n });
        }
        for pair in x[..n].windows(2) {
            if !(pair[1] > pair[0]) {
                return Err(LutError::DuplicateResistance { resistance: pair[1] });
            }
        }

        let h: Vec<f64> = x[..n].windows(2).map(|p| p[1] - p[0]).collect();
        let slopes: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

        let mut a = vec![vec![0.0; n]; n];
        let mut b = vec![0.0; n];

        a[0][0] = h[1];
        a[0][1] = -(h[0] + h[1]);
        a[0][2] = h[0];

        for i in 1..n - 1 {
            a[i][i - 1] = h[i - 1];
            a[i][i] = 2.0 * (h[i - 1] + h[i]);
            a[i][i + 1] = h[i];
            b[i] = 6.0 * (slopes[i] - slopes[i - 1]);
        }

        a[n - 1][n - 3] = h[n - 2];
        a[n - 1][n - 2] = -(h[n - 3] + h[n - 2]);
        a[n - 1][n - 1] = h[n - 3];

        let second_derivatives = solve_dense(a, b)?;

        Ok(Self {
            knots: x[..n].to_vec(),
            values: y[..n].to_vec(),
            second_derivatives,
        })
    }

    /// Knot positions
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Evaluate the spline, extrapolating with the end pieces
    pub fn evaluate(&self, x: f64) -> f64 {
        let last_piece = self.knots.len() - 2;
        // Index of the first knot greater than x, minus one
        let i = self.knots.partition_point(|&k| k <= x).saturating_sub(1).min(last_piece);

        let (x0, x1) = (self.knots[i], self.knots[i + 1]);
        let (y0, y1) = (self.values[i], self.values[i + 1]);
        let (m0, m1) = (self.second_derivatives[i], self.second_derivatives[i + 1]);
        let h = x1 - x0;
        let left = x1 - x;
        let right = x - x0;

        m0 * left * left * left / (6.0 * h)
            + m1 * right * right * right / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * left
            + (y1 / h - m1 * h / 6.0) * right
    }
}
