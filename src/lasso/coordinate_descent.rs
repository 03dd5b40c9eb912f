//! Cyclic coordinate descent for L1-penalized least squares.
//!
//! Solves `minimize_β  (1/(2m))‖y − Xβ‖² + λ‖β‖₁` by sweeping the
//! coordinates in order, applying the soft-thresholding update
//! `β_j ← S(ρ_j, λ) / (‖x_j‖²/m)` with `ρ_j = x_jᵀr/m + β_j·‖x_j‖²/m`,
//! and maintaining the residual `r = y − Xβ` incrementally. Convergence is
//! declared when the largest coefficient update in a sweep falls below the
//! tolerance.
//!
//! Conventions:
//! - Columns are used as-is; no internal standardization. Column norms enter
//!   the update explicitly, so unequal scales are handled correctly.
//! - Zero-norm columns keep a zero coefficient.
//! - `λ = 0` reduces to ordinary least squares solved coordinate-wise.

use crate::lasso::{errors::LassoResult, validation::validate_lasso_inputs};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Solver options for [`fit_lasso`].
///
/// # Fields
/// - `max_iter`: maximum number of full coordinate sweeps. Defaults to 1000.
/// - `tol`: convergence threshold on the largest absolute coefficient update
///   within a sweep. Defaults to 1e-4.
#[derive(Debug, Clone, PartialEq)]
pub struct LassoOptions {
    pub max_iter: usize,
    pub tol: f64,
}

impl LassoOptions {
    /// Options with the documented defaults (`max_iter = 1000`, `tol = 1e-4`).
    pub fn new() -> Self {
        LassoOptions { max_iter: 1000, tol: 1e-4 }
    }
}

impl Default for LassoOptions {
    fn default() -> Self {
        LassoOptions::new()
    }
}

/// Fit an L1-penalized linear regression by cyclic coordinate descent.
///
/// # Arguments
/// - `x`: design matrix (m×k).
/// - `y`: target vector of length m.
/// - `penalty`: L1 penalty λ ≥ 0 in the `(1/(2m))‖y − Xβ‖² + λ‖β‖₁`
///   objective.
/// - `opts`: sweep budget and convergence tolerance.
///
/// # Returns
/// The coefficient vector β (length k). Coefficients are exactly zero
/// wherever the soft threshold removes them, so the support can be read off
/// with `β_j != 0`.
///
/// # Errors
/// Everything [`validate_lasso_inputs`] rejects: empty designs, shape
/// mismatches, and invalid penalty/tolerance/sweep settings.
pub fn fit_lasso(
    x: &ArrayView2<f64>, y: &ArrayView1<f64>, penalty: f64, opts: &LassoOptions,
) -> LassoResult<Array1<f64>> {
    validate_lasso_inputs(x, y, penalty, opts)?;
    let (n_rows, n_coeffs) = x.dim();
    let m = n_rows as f64;

    let col_norms: Vec<f64> =
        (0..n_coeffs).map(|j| x.column(j).iter().map(|v| v * v).sum::<f64>() / m).collect();

    let mut coeffs = Array1::<f64>::zeros(n_coeffs);
    let mut residual = y.to_owned();

    for _sweep in 0..opts.max_iter {
        let mut max_update = 0.0_f64;
        for j in 0..n_coeffs {
            if col_norms[j] <= f64::EPSILON {
                continue;
            }
            let column = x.column(j);
            let rho = column.dot(&residual) / m + coeffs[j] * col_norms[j];
            let updated = soft_threshold(rho, penalty) / col_norms[j];
            let delta = updated - coeffs[j];
            if delta != 0.0 {
                residual.zip_mut_with(&column, |r, &xj| *r -= delta * xj);
                coeffs[j] = updated;
                max_update = max_update.max(delta.abs());
            }
        }
        if max_update < opts.tol {
            break;
        }
    }

    Ok(coeffs)
}

/// Soft-thresholding operator `S(z, λ) = sign(z)·max(|z| − λ, 0)`.
#[inline]
fn soft_threshold(z: f64, lambda: f64) -> f64 {
    if z > lambda {
        z - lambda
    } else if z < -lambda {
        z + lambda
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The soft-thresholding operator.
    // - The all-zero solution at and above the critical penalty.
    // - OLS recovery at λ = 0 on a well-conditioned design.
    // - Zero-norm column handling and support sparsity under heavy penalty.
    //
    // They intentionally DO NOT cover:
    // - Validation branches; see `lasso::validation`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify the three regimes of the soft-thresholding operator.
    //
    // Given
    // -----
    // - z above, inside, and below the threshold band.
    //
    // Expect
    // ------
    // - Shrinkage toward zero by λ outside the band, exact zero inside.
    fn soft_threshold_shrinks_and_zeroes() {
        // Act & Assert
        assert_relative_eq!(soft_threshold(3.0, 1.0), 2.0);
        assert_relative_eq!(soft_threshold(-3.0, 1.0), -2.0);
        assert_eq!(soft_threshold(0.5, 1.0), 0.0);
        assert_eq!(soft_threshold(-0.5, 1.0), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a penalty at the critical value λ_max = max|x_jᵀy|/m
    // produces the all-zero solution.
    //
    // Given
    // -----
    // - A small design, its λ_max, and a slightly larger penalty.
    //
    // Expect
    // ------
    // - Every coefficient is exactly zero.
    fn penalty_at_lambda_max_gives_null_model() {
        // Arrange
        let x = array![[1.0, 0.5], [-1.0, 0.25], [0.5, -0.75], [0.25, 1.0]];
        let y: Array1<f64> = array![1.0, -0.5, 0.25, 0.75];
        let m = y.len() as f64;
        let lambda_max = (0..x.ncols())
            .map(|j| x.column(j).dot(&y).abs() / m)
            .fold(0.0_f64, f64::max);

        // Act
        let coeffs =
            fit_lasso(&x.view(), &y.view(), lambda_max * 1.001, &LassoOptions::new())
                .expect("valid inputs");

        // Assert
        assert!(coeffs.iter().all(|&c| c == 0.0), "expected null model, got {coeffs:?}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that λ = 0 recovers the least-squares solution on an
    // orthogonal design.
    //
    // Given
    // -----
    // - An orthogonal 4×2 design and y built from known coefficients.
    //
    // Expect
    // ------
    // - Coefficients match the generating values to tight tolerance.
    fn zero_penalty_recovers_ols_on_orthogonal_design() {
        // Arrange
        let x = array![
            [1.0, 1.0],
            [1.0, -1.0],
            [-1.0, 1.0],
            [-1.0, -1.0]
        ];
        let true_coeffs = array![2.0, -0.5];
        let y = x.dot(&true_coeffs);

        let mut opts = LassoOptions::new();
        opts.tol = 1e-10;

        // Act
        let coeffs = fit_lasso(&x.view(), &y.view(), 0.0, &opts).expect("valid inputs");

        // Assert
        assert_relative_eq!(coeffs[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(coeffs[1], -0.5, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Verify that an all-zero column keeps a zero coefficient instead of
    // dividing by a zero norm.
    //
    // Given
    // -----
    // - A design whose second column is identically zero.
    //
    // Expect
    // ------
    // - The first coefficient is fit; the second stays exactly zero.
    fn zero_norm_column_keeps_zero_coefficient() {
        // Arrange
        let x = array![[1.0, 0.0], [2.0, 0.0], [-1.0, 0.0]];
        let y = array![2.0, 4.0, -2.0];

        // Act
        let coeffs = fit_lasso(&x.view(), &y.view(), 0.0, &LassoOptions::new())
            .expect("valid inputs");

        // Assert
        assert_relative_eq!(coeffs[0], 2.0, epsilon = 1e-4);
        assert_eq!(coeffs[1], 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Verify the support endpoints of the penalty path: full at λ = 0 on a
    // generic design, empty at λ above the critical value.
    //
    // Given
    // -----
    // - A correlated 6×3 design, λ = 0, and λ slightly above λ_max.
    //
    // Expect
    // ------
    // - All three coefficients active at λ = 0; none above λ_max.
    fn support_endpoints_match_penalty_path() {
        // Arrange
        let x = Array2::from_shape_vec(
            (6, 3),
            vec![
                1.0, 0.9, 0.1, //
                -1.0, -0.8, 0.2, //
                0.5, 0.6, -0.3, //
                -0.5, -0.4, 0.4, //
                0.25, 0.3, -0.5, //
                -0.25, -0.2, 0.6,
            ],
        )
        .expect("static shape");
        let y: Array1<f64> = array![1.0, -1.0, 0.6, -0.4, 0.3, -0.2];
        let m = y.len() as f64;
        let lambda_max = (0..x.ncols())
            .map(|j| x.column(j).dot(&y).abs() / m)
            .fold(0.0_f64, f64::max);
        let support_at = |lambda: f64| {
            fit_lasso(&x.view(), &y.view(), lambda, &LassoOptions::new())
                .expect("valid inputs")
                .iter()
                .filter(|&&c| c != 0.0)
                .count()
        };

        // Act & Assert
        assert_eq!(support_at(0.0), 3);
        assert_eq!(support_at(lambda_max * 1.001), 0);
    }
}
