//! Input guards for the coordinate-descent solver.
//!
//! Centralizes shape and parameter checks so the sweep loop can assume
//! well-formed inputs. Purely validation; no allocation beyond error
//! construction.

use crate::lasso::{
    coordinate_descent::LassoOptions,
    errors::{LassoError, LassoResult},
};
use ndarray::{ArrayView1, ArrayView2};

/// Validate inputs to [`fit_lasso`](crate::lasso::fit_lasso).
///
/// # Arguments
/// - `x`: design matrix (m×k); must be non-empty.
/// - `y`: target vector; must have exactly `m` entries.
/// - `penalty`: L1 penalty λ; must be finite and ≥ 0.
/// - `opts`: solver options; tolerance must be finite and positive, sweep
///   budget at least 1.
///
/// # Errors
/// - `LassoError::EmptyDesign`, `LassoError::DimensionMismatch`,
///   `LassoError::InvalidPenalty`, `LassoError::InvalidTolerance`,
///   `LassoError::ZeroMaxIter` for the corresponding violations.
pub fn validate_lasso_inputs(
    x: &ArrayView2<f64>, y: &ArrayView1<f64>, penalty: f64, opts: &LassoOptions,
) -> LassoResult<()> {
    let (rows, cols) = x.dim();
    if rows == 0 || cols == 0 {
        return Err(LassoError::EmptyDesign);
    }
    if rows != y.len() {
        return Err(LassoError::DimensionMismatch { rows, targets: y.len() });
    }
    if !penalty.is_finite() || penalty < 0.0 {
        return Err(LassoError::InvalidPenalty(penalty));
    }
    if !opts.tol.is_finite() || opts.tol <= 0.0 {
        return Err(LassoError::InvalidTolerance(opts.tol));
    }
    if opts.max_iter == 0 {
        return Err(LassoError::ZeroMaxIter);
    }
    Ok(())
}
