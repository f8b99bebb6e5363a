//! Curve fitting for manufacturer sample data
//!
//! - [`least_squares`]: Levenberg-Marquardt regression for the Steinhart-Hart form
//! - [`spline`]: not-a-knot cubic spline for piecewise-cubic interpolation
//! - [`matrix`]: the dense linear algebra both rely on

pub mod least_squares;
pub mod matrix;
pub mod spline;

pub use least_squares::{fit_inverse_log_polynomial, InversePolynomialFit};
pub use spline::CubicSpline;
