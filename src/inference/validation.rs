//! inference::validation — input checks for split-based inference.
//!
//! Purpose
//! -------
//! Centralize the checks every inference mode performs before touching the
//! evidence arrays: the supplied data must match the fitted shapes exactly,
//! contain only finite values, and any strategy options must be well formed.
//!
//! Key behaviors
//! -------------
//! - [`validate_inference_inputs`] compares the supplied `(X, y)` against
//!   the sample and feature counts recorded at fit time, then scans for
//!   non-finite entries, returning the first violation as an
//!   [`InferenceError`].
//! - [`validate_univariate_options`] rejects a permutation strategy with
//!   zero draws.
//!
//! Invariants & assumptions
//! ------------------------
//! - Passing validation guarantees the split and cluster bookkeeping stored
//!   in the fit indexes the supplied data without bounds failures.
//!
//! Conventions
//! -----------
//! - Checks fail fast: the first violated constraint is reported.
//!
//! Testing notes
//! -------------
//! - Unit tests walk every rejection branch and one accepting call against a
//!   small fitted ensemble.

use ndarray::{ArrayView1, ArrayView2};

use crate::inference::errors::{InferenceError, InferenceResult};
use crate::inference::univariate::{UnivariateOptions, UnivariateStrategy};
use crate::stability::StabilityFit;

/// Compare supplied data against the fitted shapes and scan for non-finite
/// entries.
///
/// # Arguments
/// * `fit` - Fitted ensemble whose evidence arrays will index the data.
/// * `x` - Design matrix to test against the fitted `(n, p)`.
/// * `y` - Response vector to test against the fitted `n`.
///
/// # Errors
/// * `SampleCountMismatch`, `FeatureCountMismatch` on shape disagreement.
/// * `NonFiniteData`, `NonFiniteTarget` with the offending coordinates.
pub fn validate_inference_inputs(
    fit: &StabilityFit, x: &ArrayView2<f64>, y: &ArrayView1<f64>,
) -> InferenceResult<()> {
    if x.nrows() != fit.n_samples() {
        return Err(InferenceError::SampleCountMismatch {
            expected: fit.n_samples(),
            found: x.nrows(),
        });
    }
    if x.ncols() != fit.n_features() {
        return Err(InferenceError::FeatureCountMismatch {
            expected: fit.n_features(),
            found: x.ncols(),
        });
    }
    if y.len() != fit.n_samples() {
        return Err(InferenceError::SampleCountMismatch {
            expected: fit.n_samples(),
            found: y.len(),
        });
    }
    for ((row, col), &value) in x.indexed_iter() {
        if !value.is_finite() {
            return Err(InferenceError::NonFiniteData { row, col, value });
        }
    }
    for (index, &value) in y.indexed_iter() {
        if !value.is_finite() {
            return Err(InferenceError::NonFiniteTarget { index, value });
        }
    }
    Ok(())
}

/// Reject strategy configurations that cannot produce a statistic.
///
/// # Arguments
/// * `options` - Univariate strategy selection.
///
/// # Errors
/// * `ZeroPermutations` when the permutation strategy has no draws.
pub fn validate_univariate_options(
    options: &UnivariateOptions,
) -> InferenceResult<()> {
    if let UnivariateStrategy::Permutation { n_perm, .. } = options.strategy {
        if n_perm == 0 {
            return Err(InferenceError::ZeroPermutations);
        }
    }
    Ok(())
}
