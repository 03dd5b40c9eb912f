//! stability::errors — error types for model configuration and fitting.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for the stability-selection
//! ensemble: configuration checks, data validation at `fit()` entry, and the
//! wrapped causes raised by the clustering and lasso stages, plus the
//! conversion layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`StabilityResult`] and [`StabilityError`] as the canonical
//!   result and error types under `stability`.
//! - Wrap [`ClusterError`] and [`LassoError`] via `From` impls so stage
//!   failures flow through `?` unchanged.
//! - Attach human-readable `Display` messages phrased as domain constraints.
//! - Implement `From<StabilityError> for PyErr` behind `python-bindings`.
//!
//! Conventions
//! -----------
//! - Every variant is raised before any split work begins; `fit()` either
//!   returns a fully populated record or nothing at all.
//!
//! Testing notes
//! -------------
//! - Unit tests verify `Display` payload embedding and the wrapping
//!   conversions.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::clustering::errors::ClusterError;
use crate::lasso::errors::LassoError;

pub type StabilityResult<T> = Result<T, StabilityError>;

/// StabilityError — invalid configuration or data for the ensemble fit.
///
/// Variants
/// --------
/// - `InvalidTheta(theta)`
///   The penalty scale is non-finite or ≤ 0.
/// - `InvalidSplitCount(n_split)`
///   The ensemble needs at least one split.
/// - `InvalidSplitRatio(ratio)`
///   The selection-subset ratio is non-finite or outside (0, 1).
/// - `InvalidClusterProportion(proportion)`
///   A proportional cluster count is non-finite or outside (0, 1].
/// - `ClusterCountOutOfRange { requested, n_features }`
///   The resolved cluster count is 0 or exceeds the feature count.
/// - `SplitSmallerThanClusters { split_size, n_clusters }`
///   The per-split regression would be underdetermined.
/// - `EmptySplit`
///   The rounded selection-subset size is 0.
/// - `NoHeldOutRows { split_size, n_rows }`
///   The selection subset consumes every sample, leaving no held-out rows
///   for split-based inference.
/// - `DimensionMismatch { n_rows, n_targets }`
///   The design matrix and response disagree on the sample count.
/// - `FeatureCountMismatch { expected, found }`
///   A matrix handed to a fitted model has the wrong number of columns.
/// - `ConnectivitySize { expected, found }`
///   The connectivity graph covers a different number of features than the
///   design matrix.
/// - `NonFiniteData { row, col, value }` / `NonFiniteTarget { index, value }`
///   The design matrix or response contains NaN or ±∞.
/// - `EmptyData`
///   The design matrix has zero rows or zero columns.
/// - `Cluster(source)` / `Lasso(source)`
///   A per-split stage failed; the wrapped cause carries the detail.
#[derive(Debug, Clone, PartialEq)]
pub enum StabilityError {
    //------ Configuration errors ------
    InvalidTheta(f64),
    InvalidSplitCount(usize),
    InvalidSplitRatio(f64),
    InvalidClusterProportion(f64),
    ClusterCountOutOfRange { requested: usize, n_features: usize },
    SplitSmallerThanClusters { split_size: usize, n_clusters: usize },
    EmptySplit,
    NoHeldOutRows { split_size: usize, n_rows: usize },

    //------ Data validation errors ------
    DimensionMismatch { n_rows: usize, n_targets: usize },
    FeatureCountMismatch { expected: usize, found: usize },
    ConnectivitySize { expected: usize, found: usize },
    NonFiniteData { row: usize, col: usize, value: f64 },
    NonFiniteTarget { index: usize, value: f64 },
    EmptyData,

    //------ Wrapped stage errors ------
    Cluster(ClusterError),
    Lasso(LassoError),
}

impl std::error::Error for StabilityError {}

impl std::fmt::Display for StabilityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StabilityError::InvalidTheta(theta) => {
                write!(f, "Invalid penalty scale theta: {theta}. Must be finite and > 0.")
            }
            StabilityError::InvalidSplitCount(n_split) => {
                write!(f, "Invalid split count: {n_split}. Need at least 1 split.")
            }
            StabilityError::InvalidSplitRatio(ratio) => {
                write!(
                    f,
                    "Invalid split ratio: {ratio}. Must lie strictly in (0, 1)."
                )
            }
            StabilityError::InvalidClusterProportion(proportion) => {
                write!(
                    f,
                    "Invalid cluster proportion: {proportion}. Must lie in (0, 1]."
                )
            }
            StabilityError::ClusterCountOutOfRange { requested, n_features } => {
                write!(
                    f,
                    "Resolved cluster count {requested} is outside 1..={n_features} \
                     (the feature count)."
                )
            }
            StabilityError::SplitSmallerThanClusters { split_size, n_clusters } => {
                write!(
                    f,
                    "Selection subset of {split_size} rows cannot support a regression \
                     on {n_clusters} cluster features."
                )
            }
            StabilityError::EmptySplit => {
                write!(f, "Selection subset rounds to 0 rows; increase ratio_split or n.")
            }
            StabilityError::NoHeldOutRows { split_size, n_rows } => {
                write!(
                    f,
                    "Selection subset of {split_size} rows consumes all {n_rows} samples; \
                     split-based inference needs a non-empty held-out set."
                )
            }
            StabilityError::DimensionMismatch { n_rows, n_targets } => {
                write!(
                    f,
                    "Design matrix has {n_rows} rows but the response has {n_targets} \
                     entries."
                )
            }
            StabilityError::FeatureCountMismatch { expected, found } => {
                write!(
                    f,
                    "Expected {expected} feature columns to match the fitted model, \
                     found {found}."
                )
            }
            StabilityError::ConnectivitySize { expected, found } => {
                write!(
                    f,
                    "Connectivity graph covers {found} features but the design matrix \
                     has {expected}."
                )
            }
            StabilityError::NonFiniteData { row, col, value } => {
                write!(
                    f,
                    "Design matrix contains a non-finite value {value} at \
                     ({row}, {col})."
                )
            }
            StabilityError::NonFiniteTarget { index, value } => {
                write!(
                    f,
                    "Response contains a non-finite value {value} at index {index}."
                )
            }
            StabilityError::EmptyData => {
                write!(f, "Design matrix must have at least one row and one column.")
            }
            StabilityError::Cluster(source) => {
                write!(f, "Clustering stage failed: {source}")
            }
            StabilityError::Lasso(source) => {
                write!(f, "Penalized regression stage failed: {source}")
            }
        }
    }
}

impl From<ClusterError> for StabilityError {
    fn from(err: ClusterError) -> StabilityError {
        StabilityError::Cluster(err)
    }
}

impl From<LassoError> for StabilityError {
    fn from(err: LassoError) -> StabilityError {
        StabilityError::Lasso(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<StabilityError> for PyErr {
    fn from(err: StabilityError) -> PyErr {
        PyValueError::new_err(format!("StabilityError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` formatting and payload embedding for StabilityError.
    // - The `From` conversions wrapping stage errors.
    //
    // They intentionally DO NOT cover:
    // - The PyErr conversion (needs the Python C API; covered by Python-level
    //   tests).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `SplitSmallerThanClusters` embeds both counts.
    //
    // Given
    // -----
    // - A `SplitSmallerThanClusters` with split_size = 10, n_clusters = 25.
    //
    // Expect
    // ------
    // - The Display output contains "10" and "25".
    fn stability_error_split_smaller_than_clusters_includes_payload() {
        // Arrange
        let err = StabilityError::SplitSmallerThanClusters { split_size: 10, n_clusters: 25 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("10"), "split size missing from message: {msg}");
        assert!(msg.contains("25"), "cluster count missing from message: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `NonFiniteData` reports the offending coordinate.
    //
    // Given
    // -----
    // - A `NonFiniteData` at (3, 7) with value NaN.
    //
    // Expect
    // ------
    // - The Display output contains "3", "7", and "NaN".
    fn stability_error_non_finite_data_includes_coordinates() {
        // Arrange
        let err = StabilityError::NonFiniteData { row: 3, col: 7, value: f64::NAN };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('3'), "row missing from message: {msg}");
        assert!(msg.contains('7'), "column missing from message: {msg}");
        assert!(msg.contains("NaN"), "value missing from message: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify the wrapping conversions preserve the stage cause.
    //
    // Given
    // -----
    // - A `ClusterError::ZeroClusters` and a `LassoError::ZeroMaxIter`.
    //
    // Expect
    // ------
    // - `From` produces the matching wrapped variants and Display chains the
    //   inner message.
    fn stability_error_wraps_stage_errors() {
        // Arrange
        let cluster: StabilityError = ClusterError::ZeroClusters.into();
        let lasso: StabilityError = LassoError::ZeroMaxIter.into();

        // Act + Assert
        assert_eq!(cluster, StabilityError::Cluster(ClusterError::ZeroClusters));
        assert_eq!(lasso, StabilityError::Lasso(LassoError::ZeroMaxIter));
        assert!(cluster.to_string().contains("Clustering stage failed"));
        assert!(lasso.to_string().contains("Penalized regression stage failed"));
    }
}
