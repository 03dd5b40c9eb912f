//! inference — split-based significance for stability-selected features.
//!
//! Purpose
//! -------
//! Turn a fitted ensemble into feature-level evidence: per-split p-value
//! and score matrices from either a support-restricted OLS refit
//! (multivariate) or marginal correlation statistics (univariate), plus the
//! quantile aggregation that collapses them into one calibrated vector per
//! feature.
//!
//! Key behaviors
//! -------------
//! - Inherent methods on `StabilityFit`: `multivariate_pvalues`,
//!   `multivariate_scores`, `univariate_pvalues`, and `univariate_scores`,
//!   each returning a [`SplitStatistics`] pair of per-split matrix and
//!   aggregated vector.
//! - Supplied data is re-standardized with the parameters recorded at fit
//!   time, so callers pass raw-unit arrays exactly as they did to `fit()`.
//! - Degenerate splits degrade to sentinel rows (all ones for p-values, the
//!   feature count for multivariate scores) instead of failing the call.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every output matrix is `n_split × n_features` with within-row
//!   constancy across features sharing a cluster.
//! - A single-split ensemble bypasses aggregation; its aggregated vector is
//!   the lone row verbatim.
//!
//! Conventions
//! -----------
//! - Shape and finiteness rejection lives in `validation`; numeric kernels
//!   (`ols`, the Pearson and permutation statistics) assume validated
//!   input.
//! - Wrapped `Cluster` and `Aggregation` causes convert via `From`, so `?`
//!   composes across subsystem boundaries.
//!
//! Downstream usage
//! ----------------
//! - A typical univariate pass:
//!
//!   ```rust
//!   use ndarray::{Array1, Array2};
//!   use rust_stabsel::inference::UnivariateOptions;
//!   use rust_stabsel::stability::{ClusterCount, SelectionMode, StabilityModel};
//!
//!   let x = Array2::from_shape_fn((12, 4), |(row, col)| {
//!       ((row * 4 + col) as f64 * 0.29).sin()
//!   });
//!   let y = Array1::from_shape_fn(12, |row| (row as f64 * 0.53).cos());
//!   let model = StabilityModel::new(
//!       0.1,
//!       3,
//!       0.5,
//!       ClusterCount::Fixed(2),
//!       SelectionMode::Univariate,
//!       5,
//!   );
//!   let fit = model.fit(&x.view(), &y.view(), None)?;
//!   let stats = fit.univariate_pvalues(
//!       &x.view(),
//!       &y.view(),
//!       &UnivariateOptions::default(),
//!   )?;
//!   assert_eq!(stats.aggregated().len(), 4);
//!   # Ok::<(), Box<dyn std::error::Error>>(())
//!   ```
//!
//! - Aggregated vectors feed `selection::select_model_fdr` and friends for
//!   the final thresholding decision.
//!
//! Testing notes
//! -------------
//! - `ols` and `univariate` pin their statistics against closed forms;
//!   `multivariate` pins a hand-wired single-split refit; `statistics`
//!   covers aggregation dispatch and the held-out complement walk.

pub mod errors;
pub mod multivariate;
pub mod ols;
pub mod statistics;
pub mod univariate;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::statistics::SplitStatistics;
pub use self::univariate::{
    DEFAULT_PERMUTATIONS, UnivariateOptions, UnivariateStrategy,
};
pub use self::validation::{validate_inference_inputs, validate_univariate_options};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_stabsel::inference::prelude::*;
//
// to import the inference surface in a single line.

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::statistics::SplitStatistics;
    pub use super::univariate::{
        DEFAULT_PERMUTATIONS, UnivariateOptions, UnivariateStrategy,
    };
}
