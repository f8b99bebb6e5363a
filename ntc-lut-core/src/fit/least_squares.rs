//! Levenberg-Marquardt regression of inverse log-polynomials
//!
//! Fits `T(R) = 1 / Σ pⱼ·ln(R)^eⱼ` to `(R, T)` samples by minimizing the sum
//! of squared temperature residuals, which is the Steinhart-Hart equation
//! with exponents `[0, 1, 3]` (3 terms) or `[0, 1, 2, 3]` (4 terms).
//!
//! ## Algorithm
//!
//! ```text
//! rᵢ   = T(Rᵢ; p) - Tᵢ
//! Jᵢⱼ  = ∂T/∂pⱼ = -T(Rᵢ; p)² · ln(Rᵢ)^eⱼ
//! step = -(D⁻¹JᵀJD⁻¹ + λI)⁻¹ D⁻¹Jᵀr, scaled back by D⁻¹
//! ```
//!
//! `D = sqrt(diag(JᵀJ))` equilibrates the normal equations; without it the
//! columns differ by several orders of magnitude (`1` vs `ln(R)³`). The seed
//! is the linear least-squares solution in the inverse-temperature domain,
//! falling back to [`FALLBACK_SEED`] when that system is singular.
//!
//! The reported covariance matches the usual curve-fit convention:
//! `(JᵀJ)⁻¹ · SSR / (m - n)`, infinite when there are no spare degrees of
//! freedom.

use crate::{
    errors::{LutError, LutResult},
    fit::matrix::{invert, make_symmetric, solve, SquareMatrix, Vector},
};

/// Seed used when the linearized system cannot be solved
pub const FALLBACK_SEED: f64 = 1e-3;

/// Iteration cap for the Levenberg-Marquardt loop
pub const MAX_ITERATIONS: usize = 200;

/// Relative reduction of the residual sum below which the fit has converged
const FTOL: f64 = 1.49012e-8;

/// Relative parameter change below which the fit has converged
const XTOL: f64 = 1.49012e-8;

const INITIAL_DAMPING: f64 = 1e-3;
const MAX_DAMPING: f64 = 1e16;

/// Result of a successful regression
#[derive(Debug, Clone, PartialEq)]
pub struct InversePolynomialFit<const N: usize> {
    /// Fitted coefficients, ordered like the exponents
    pub coefficients: Vector<N>,
    /// Parameter covariance estimate
    pub covariance: SquareMatrix<N>,
    /// Levenberg-Marquardt iterations used
    pub iterations: usize,
    /// Sum of squared temperature residuals at the solution
    pub residual_sum_squares: f64,
}

impl<const N: usize> InversePolynomialFit<N> {
    /// Standard error of each coefficient (square root of the covariance diagonal)
    pub fn standard_errors(&self) -> Vector<N> {
        let mut errors = [0.0; N];
        for (i, e) in errors.iter_mut().enumerate() {
            *e = libm::sqrt(self.covariance[i][i]);
        }
        errors
    }
}

fn basis<const N: usize>(resistance: f64, exponents: &[u32; N]) -> Vector<N> {
    let ln_r = libm::log(resistance);
    let mut row = [0.0; N];
    for (value, &exponent) in row.iter_mut().zip(exponents.iter()) {
        *value = (0..exponent).fold(1.0, |acc, _| acc * ln_r);
    }
    row
}

fn dot<const N: usize>(a: &Vector<N>, b: &Vector<N>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Sum of squared residuals, or infinity if the model is undefined anywhere
fn residual_sum<const N: usize>(p: &Vector<N>, rows: &[Vector<N>], kelvin: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (row, &t) in rows.iter().zip(kelvin) {
        let denominator = dot(p, row);
        if !(denominator > 0.0) {
            return f64::INFINITY;
        }
        let r = 1.0 / denominator - t;
        sum += r * r;
    }
    if sum.is_finite() {
        sum
    } else {
        f64::INFINITY
    }
}

/// Normal matrix JᵀJ and gradient Jᵀr at `p`
fn normal_equations<const N: usize>(
    p: &Vector<N>,
    rows: &[Vector<N>],
    kelvin: &[f64],
) -> (SquareMatrix<N>, Vector<N>) {
    let mut jtj = [[0.0; N]; N];
    let mut jtr = [0.0; N];
    for (row, &t) in rows.iter().zip(kelvin) {
        let model = 1.0 / dot(p, row);
        let r = model - t;
        let mut jacobian = [0.0; N];
        for (j, value) in jacobian.iter_mut().enumerate() {
            *value = -model * model * row[j];
        }
        for i in 0..N {
            jtr[i] += jacobian[i] * r;
            for j in 0..N {
                jtj[i][j] += jacobian[i] * jacobian[j];
            }
        }
    }
    (jtj, jtr)
}

/// Column scaling factors `sqrt(diag(A))`
fn equilibration<const N: usize>(a: &SquareMatrix<N>) -> LutResult<Vector<N>> {
    let mut d = [0.0; N];
    for (i, value) in d.iter_mut().enumerate() {
        let diag = libm::sqrt(a[i][i]);
        if !(diag > 0.0) || !diag.is_finite() {
            return Err(LutError::SingularSystem);
        }
        *value = diag;
    }
    Ok(d)
}

fn scaled<const N: usize>(a: &SquareMatrix<N>, d: &Vector<N>) -> SquareMatrix<N> {
    let mut out = *a;
    for i in 0..N {
        for j in 0..N {
            out[i][j] /= d[i] * d[j];
        }
    }
    out
}

/// Linear least squares for `1/T = p·φ(R)`, used to seed the iteration
fn linearized_seed<const N: usize>(rows: &[Vector<N>], kelvin: &[f64]) -> Option<Vector<N>> {
    let mut ata = [[0.0; N]; N];
    let mut atb = [0.0; N];
    for (row, &t) in rows.iter().zip(kelvin) {
        let target = 1.0 / t;
        for i in 0..N {
            atb[i] += row[i] * target;
            for j in 0..N {
                ata[i][j] += row[i] * row[j];
            }
        }
    }
    let d = equilibration(&ata).ok()?;
    let mut rhs = atb;
    for (value, scale) in rhs.iter_mut().zip(d.iter()) {
        *value /= scale;
    }
    let z = solve(&scaled(&ata, &d), &rhs)?;
    let mut p = [0.0; N];
    for i in 0..N {
        p[i] = z[i] / d[i];
    }
    Some(p)
}

/// Fit `T(R) = 1 / Σ pⱼ·ln(R)^eⱼ` to the samples
///
/// `resistances` and `kelvin` must be the same length; resistances must be
/// positive.
pub fn fit_inverse_log_polynomial<const N: usize>(
    resistances: &[f64],
    kelvin: &[f64],
    exponents: [u32; N],
) -> LutResult<InversePolynomialFit<N>> {
    let m = resistances.len().min(kelvin.len());
    if m < N {
        return Err(LutError::InsufficientData { required: N, available: m });
    }

    let mut rows = alloc::vec::Vec::with_capacity(m);
    for &r in &resistances[..m] {
        if !(r > 0.0) || !r.is_finite() {
            return Err(LutError::domain("resistance", r));
        }
        rows.push(basis(r, &exponents));
    }
    let kelvin = &kelvin[..m];

    let mut p = match linearized_seed(&rows, kelvin) {
        Some(seed) if residual_sum(&seed, &rows, kelvin).is_finite() => seed,
        _ => {
            log_debug!("Linearized seed unusable, starting from {:e}", FALLBACK_SEED);
            [FALLBACK_SEED; N]
        }
    };
    let mut ssr = residual_sum(&p, &rows, kelvin);
    if !ssr.is_finite() {
        return Err(LutError::FitDidNotConverge { iterations: 0 });
    }

    let mut lambda = INITIAL_DAMPING;
    let mut iterations = 0;
    let mut converged = ssr == 0.0;

    while !converged {
        if iterations >= MAX_ITERATIONS {
            return Err(LutError::FitDidNotConverge { iterations });
        }
        iterations += 1;

        let (jtj, jtr) = normal_equations(&p, &rows, kelvin);
        let d = equilibration(&jtj)?;
        let mut a = scaled(&jtj, &d);
        for (i, row) in a.iter_mut().enumerate() {
            row[i] += lambda;
        }
        let mut g = [0.0; N];
        for i in 0..N {
            g[i] = -jtr[i] / d[i];
        }
        let z = solve(&a, &g).ok_or(LutError::SingularSystem)?;

        let mut candidate = p;
        let mut max_relative_step = 0.0f64;
        for i in 0..N {
            let step = z[i] / d[i];
            candidate[i] += step;
            let reference = p[i].abs().max(f64::MIN_POSITIVE);
            max_relative_step = max_relative_step.max(step.abs() / reference);
        }

        let candidate_ssr = residual_sum(&candidate, &rows, kelvin);
        if candidate_ssr < ssr {
            let reduction = ssr - candidate_ssr;
            p = candidate;
            converged = reduction <= FTOL * ssr || max_relative_step <= XTOL || candidate_ssr == 0.0;
            ssr = candidate_ssr;
            lambda = (lambda / 10.0).max(f64::EPSILON);
        } else {
            lambda *= 10.0;
            // No step direction improves the fit any further
            converged = lambda > MAX_DAMPING || max_relative_step <= XTOL;
        }
    }

    log_debug!("Steinhart-Hart fit converged after {} iterations, SSR {:e}", iterations, ssr);

    let (jtj, _) = normal_equations(&p, &rows, kelvin);
    let d = equilibration(&jtj)?;
    let inverse = invert(&scaled(&jtj, &d)).ok_or(LutError::SingularSystem)?;
    let variance = if m > N { ssr / (m - N) as f64 } else { f64::INFINITY };
    let mut covariance = [[0.0; N]; N];
    for i in 0..N {
        for j in 0..N {
            covariance[i][j] = inverse[i][j] / (d[i] * d[j]) * variance;
        }
    }
    make_symmetric(&mut covariance);

    Ok(InversePolynomialFit {
        coefficients: p,
        covariance,
        iterations,
        residual_sum_squares: ssr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    const A: f64 = 1.009249522e-3;
    const B: f64 = 2.378405444e-4;
    const C: f64 = 2.019202697e-7;

    fn exact_samples() -> (Vec<f64>, Vec<f64>) {
        // Log-spaced resistances from ~330 Ω to ~330 kΩ
        let resistances: Vec<f64> = (0..31).map(|i| 330.0 * libm::pow(10.0, i as f64 / 10.0)).collect();
        let kelvin = resistances
            .iter()
            .map(|&r| {
                let l = libm::log(r);
                1.0 / (A + B * l + C * l * l * l)
            })
            .collect();
        (resistances, kelvin)
    }

    #[test]
    fn recovers_three_term_coefficients() {
        let (r, t) = exact_samples();
        let fit = fit_inverse_log_polynomial(&r, &t, [0, 1, 3]).unwrap();
        assert!((fit.coefficients[0] - A).abs() / A < 1e-6);
        assert!((fit.coefficients[1] - B).abs() / B < 1e-6);
        assert!((fit.coefficients[2] - C).abs() / C < 1e-5);
        assert!(fit.residual_sum_squares < 1e-12);
    }

    #[test]
    fn four_term_fit_finds_no_quadratic() {
        let (r, t) = exact_samples();
        let fit = fit_inverse_log_polynomial(&r, &t, [0, 1, 2, 3]).unwrap();
        assert!(fit.coefficients[2].abs() < 1e-8);
        assert!(fit.residual_sum_squares < 1e-12);
    }

    #[test]
    fn covariance_is_symmetric_and_non_negative() {
        let (r, mut t) = exact_samples();
        // Perturb so the residual is not zero
        for (i, k) in t.iter_mut().enumerate() {
            *k += if i % 2 == 0 { 0.05 } else { -0.05 };
        }
        let fit = fit_inverse_log_polynomial(&r, &t, [0, 1, 3]).unwrap();
        for i in 0..3 {
            assert!(fit.covariance[i][i] >= 0.0);
            for j in 0..3 {
                assert_eq!(fit.covariance[i][j], fit.covariance[j][i]);
            }
        }
        assert!(fit.standard_errors().iter().all(|e| e.is_finite()));
    }

    #[test]
    fn exact_determination_has_infinite_covariance() {
        let (r, t) = exact_samples();
        let fit = fit_inverse_log_polynomial(&r[..3], &t[..3], [0, 1, 3]).unwrap();
        assert!(fit.covariance[0][0].is_infinite() || fit.covariance[0][0].is_nan());
    }

    #[test]
    fn too_few_samples() {
        let err = fit_inverse_log_polynomial(&[1000.0, 2000.0], &[300.0, 290.0], [0, 1, 2, 3]).unwrap_err();
        assert_eq!(err, LutError::InsufficientData { required: 4, available: 2 });
    }

    #[test]
    fn non_positive_resistance_rejected() {
        let r = [1000.0, -5.0, 3000.0, 4000.0];
        let t = [300.0, 295.0, 290.0, 285.0];
        assert!(matches!(
            fit_inverse_log_polynomial(&r, &t, [0, 1, 3]),
            Err(LutError::DomainError { .. })
        ));
    }
}
