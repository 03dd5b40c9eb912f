//! Unpenalized least-squares refits for the multivariate inference mode.
//!
//! Solves the support-restricted normal equations by Cholesky factorization
//! (`nalgebra`) and converts per-coefficient t statistics into two-sided
//! p-values with `statrs`. Degenerate systems — fewer held-out rows than
//! regressors, or a Gram matrix that is not positive definite — yield `None`
//! so the caller can degrade that split to its sentinel row instead of
//! aborting the ensemble.

use nalgebra::{Cholesky, DMatrix, DVector};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// ols_pvalues — two-sided coefficient p-values from an OLS refit.
///
/// Purpose
/// -------
/// Regress `y` on the columns of `x` without an intercept (both live in the
/// centered, standardized space recorded at fit time), then test each
/// coefficient against zero with a two-sided t-test on
/// `n_rows − n_coefs` degrees of freedom.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayView2<f64>`
///   Regressor matrix (m×k); in the inference pipeline these are the
///   support-restricted cluster-mean columns of the held-out rows.
/// - `y`: `&ArrayView1<f64>`
///   Length-m response. Callers guarantee `y.len() == x.nrows()`.
///
/// Returns
/// -------
/// `Option<Array1<f64>>`
///   Length-k p-values, or `None` when the system is degenerate:
///   `m ≤ k` (no residual degrees of freedom) or a Gram matrix the
///   Cholesky factorization rejects as not positive definite.
///
/// Notes
/// -----
/// - A perfect fit drives the residual variance to zero and the t statistic
///   out of the finite range; such coefficients take p-value 0 when nonzero
///   and 1 when exactly zero, rather than propagating NaN.
/// - The Gram inverse comes from the same Cholesky factor that solves the
///   normal equations, so the diagonal used for standard errors is
///   consistent with the fitted coefficients.
pub(crate) fn ols_pvalues(x: &ArrayView2<f64>, y: &ArrayView1<f64>) -> Option<Array1<f64>> {
    let n_rows = x.nrows();
    let n_coefs = x.ncols();
    if n_rows <= n_coefs {
        return None;
    }
    let dof = (n_rows - n_coefs) as f64;

    let gram = x.t().dot(x);
    let moment = x.t().dot(y);
    let moment_nalg = DVector::from_iterator(n_coefs, moment.iter().copied());

    let chol = Cholesky::new(to_dmatrix(&gram))?;
    let beta_nalg = chol.solve(&moment_nalg);
    let gram_inv = chol.inverse();
    let beta = Array1::from_iter(beta_nalg.iter().copied());

    let fitted = x.dot(&beta);
    let mut rss = 0.0;
    for (observed, predicted) in y.iter().zip(fitted.iter()) {
        let residual = observed - predicted;
        rss += residual * residual;
    }
    let sigma_sq = rss / dof;

    let dist = StudentsT::new(0.0, 1.0, dof).ok()?;
    let mut pvalues = Array1::<f64>::zeros(n_coefs);
    for j in 0..n_coefs {
        let t_stat = beta[j] / (sigma_sq * gram_inv[(j, j)]).sqrt();
        pvalues[j] = if t_stat.is_finite() {
            2.0 * (1.0 - dist.cdf(t_stat.abs()))
        } else if beta[j] != 0.0 {
            0.0
        } else {
            1.0
        };
    }
    Some(pvalues)
}

/// Copy a symmetric Gram matrix into a `nalgebra::DMatrix`.
///
/// Column-major writes to match `DMatrix` storage; symmetry of the input is
/// preserved, not enforced.
fn to_dmatrix(gram: &Array2<f64>) -> DMatrix<f64> {
    let n = gram.ncols();
    let mut out = DMatrix::<f64>::zeros(n, n);
    for j in 0..n {
        for i in j..n {
            if i == j {
                out[(i, i)] = gram[[i, i]];
            } else {
                out[(i, j)] = gram[[i, j]];
                out[(j, i)] = gram[[j, i]];
            }
        }
    }
    out
}
