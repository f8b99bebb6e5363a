//! Small dense linear algebra for the curve fits
//!
//! Fixed-size operations use const generics and stack arrays; the spline
//! solver needs a system sized by the sample count and works on `Vec`s.

use alloc::vec::Vec;

use crate::errors::{LutError, LutResult};

/// Matrix type using const generics
pub type Matrix<const R: usize, const C: usize> = [[f64; C]; R];

/// Square matrix type
pub type SquareMatrix<const N: usize> = Matrix<N, N>;

/// Vector type
pub type Vector<const N: usize> = [f64; N];

/// Pivots smaller than this fraction of the largest matrix entry are
/// treated as zero
const RELATIVE_PIVOT_EPSILON: f64 = 1e-13;

/// Identity matrix
pub fn identity<const N: usize>() -> SquareMatrix<N> {
    let mut m = [[0.0; N]; N];
    for (i, row) in m.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    m
}

/// Make matrix symmetric: A = (A + Aᵀ) / 2
pub fn make_symmetric<const N: usize>(matrix: &mut SquareMatrix<N>) {
    for i in 0..N {
        for j in i + 1..N {
            let avg = (matrix[i][j] + matrix[j][i]) * 0.5;
            matrix[i][j] = avg;
            matrix[j][i] = avg;
        }
    }
}

fn max_abs<const N: usize>(a: &SquareMatrix<N>) -> f64 {
    a.iter().flatten().fold(0.0f64, |acc, v| acc.max(v.abs()))
}

/// Matrix inversion using Gauss-Jordan elimination with partial pivoting
///
/// Returns `None` if the matrix is singular.
pub fn invert<const N: usize>(a: &SquareMatrix<N>) -> Option<SquareMatrix<N>> {
    let mut left = *a;
    let mut right = identity::<N>();
    let threshold = max_abs(a) * RELATIVE_PIVOT_EPSILON;

    for k in 0..N {
        // Find pivot
        let mut max_row = k;
        let mut max_val = left[k][k].abs();
        for (i, row) in left.iter().enumerate().skip(k + 1) {
            if row[k].abs() > max_val {
                max_val = row[k].abs();
                max_row = i;
            }
        }

        if !(max_val > threshold) {
            return None;
        }

        if max_row != k {
            left.swap(k, max_row);
            right.swap(k, max_row);
        }

        // Scale pivot row
        let pivot = left[k][k];
        for j in 0..N {
            left[k][j] /= pivot;
            right[k][j] /= pivot;
        }

        // Eliminate column
        for i in 0..N {
            if i != k {
                let factor = left[i][k];
                if factor != 0.0 {
                    for j in 0..N {
                        left[i][j] -= factor * left[k][j];
                        right[i][j] -= factor * right[k][j];
                    }
                }
            }
        }
    }

    Some(right)
}

/// Solve A×x = b for a fixed-size system
///
/// Returns `None` if the matrix is singular.
pub fn solve<const N: usize>(a: &SquareMatrix<N>, b: &Vector<N>) -> Option<Vector<N>> {
    let inv = invert(a)?;
    let mut x = [0.0; N];
    for (xi, row) in x.iter_mut().zip(inv.iter()) {
        *xi = row.iter().zip(b.iter()).map(|(m, v)| m * v).sum();
    }
    Some(x)
}

/// Solve a dense n×n system by Gaussian elimination with partial pivoting
///
/// `a` is row-major with `b.len()` rows.
pub fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> LutResult<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(LutError::SingularSystem);
    }
    let scale = a.iter().flatten().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let threshold = scale * RELATIVE_PIVOT_EPSILON;

    // Forward elimination
    for k in 0..n {
        let mut max_row = k;
        let mut max_val = a[k][k].abs();
        for (i, row) in a.iter().enumerate().skip(k + 1) {
            if row[k].abs() > max_val {
                max_val = row[k].abs();
                max_row = i;
            }
        }
        if !(max_val > threshold) {
            return Err(LutError::SingularSystem);
        }
        if max_row != k {
            a.swap(k, max_row);
            b.swap(k, max_row);
        }

        let pivot_row = a[k][k..].to_vec();
        let pivot_rhs = b[k];
        for i in k + 1..n {
            let factor = a[i][k] / pivot_row[0];
            if factor == 0.0 {
                continue;
            }
            for (target, pivot) in a[i][k..].iter_mut().zip(pivot_row.iter()) {
                *target -= factor * pivot;
            }
            b[i] -= factor * pivot_rhs;
        }
    }

    // Back substitution
    let mut x = alloc::vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|j| a[i][j] * x[j]).sum();
        x[i] = (b[i] - sum) / a[i][i];
    }
    Ok(x)
}
