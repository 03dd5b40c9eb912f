//! clustering::errors — error types for feature agglomeration and projection.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the connectivity graph,
//! the constrained Ward agglomeration, and the projection-pair construction,
//! plus a conversion layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`ClusterResult`] and [`ClusterError`] as the canonical result and
//!   error types for everything under `clustering`.
//! - Attach human-readable `Display` messages to each variant so diagnostics
//!   are meaningful without additional context.
//! - Implement `From<ClusterError> for PyErr` (behind `python-bindings`) to
//!   surface failures as `ValueError` in Python.
//!
//! Conventions
//! -----------
//! - Variants are grouped by concern (cluster count, connectivity, labels)
//!   with section comments, and carry just enough payload to identify the
//!   offending quantity.
//! - Error messages are phrased in terms of domain constraints ("1 ≤ k ≤ p",
//!   "adjacency must be symmetric") rather than implementation details.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that `Display` messages embed their payloads.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type ClusterResult<T> = Result<T, ClusterError>;

/// ClusterError — failure conditions for clustering and projection.
///
/// Variants
/// --------
/// - `ZeroClusters`
///   A cluster count of zero was requested; at least one cluster is required.
/// - `TooManyClusters { requested, n_features }`
///   More clusters than features were requested; merging can only reduce the
///   group count, never increase it past `p`.
/// - `DisconnectedGraph { requested, n_components }`
///   The connectivity graph splits the features into more connected
///   components than the requested cluster count, so no sequence of
///   adjacency-respecting merges can reach it.
/// - `NotSquare { rows, cols }`
///   A dense adjacency matrix was not square.
/// - `Asymmetric { row, col }`
///   A dense adjacency matrix had `a[i][j] != a[j][i]` at the given position.
/// - `EdgeOutOfBounds { index, n_features }`
///   An edge endpoint referenced a feature index `>= n_features`.
/// - `FeatureMismatch { expected, found }`
///   A connectivity graph or label vector was sized for a different feature
///   count than the data it was paired with.
/// - `NonContiguousLabels { missing }`
///   A label vector skipped the cluster id `missing`; labels must cover
///   `0..n_clusters` with every cluster non-empty.
/// - `EmptyInput`
///   The data matrix or label vector had zero rows or zero columns.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterError {
    // ---- Cluster count ----
    ZeroClusters,
    TooManyClusters { requested: usize, n_features: usize },

    // ---- Connectivity ----
    DisconnectedGraph { requested: usize, n_components: usize },
    NotSquare { rows: usize, cols: usize },
    Asymmetric { row: usize, col: usize },
    EdgeOutOfBounds { index: usize, n_features: usize },

    // ---- Labels and shapes ----
    FeatureMismatch { expected: usize, found: usize },
    NonContiguousLabels { missing: usize },
    EmptyInput,
}

impl std::error::Error for ClusterError {}

impl std::fmt::Display for ClusterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClusterError::ZeroClusters => {
                write!(f, "Cluster count must be at least 1.")
            }
            ClusterError::TooManyClusters { requested, n_features } => {
                write!(
                    f,
                    "Requested {requested} clusters but only {n_features} features are available; \
                     must satisfy 1 ≤ k ≤ p."
                )
            }
            ClusterError::DisconnectedGraph { requested, n_components } => {
                write!(
                    f,
                    "Connectivity graph has {n_components} connected components, \
                     more than the {requested} requested clusters; merging cannot bridge components."
                )
            }
            ClusterError::NotSquare { rows, cols } => {
                write!(f, "Adjacency matrix must be square; got {rows}×{cols}.")
            }
            ClusterError::Asymmetric { row, col } => {
                write!(f, "Adjacency matrix must be symmetric; entries ({row}, {col}) and ({col}, {row}) differ.")
            }
            ClusterError::EdgeOutOfBounds { index, n_features } => {
                write!(f, "Edge endpoint {index} is out of bounds for {n_features} features.")
            }
            ClusterError::FeatureMismatch { expected, found } => {
                write!(f, "Expected {expected} features but got {found}.")
            }
            ClusterError::NonContiguousLabels { missing } => {
                write!(f, "Label vector never assigns cluster id {missing}; labels must cover 0..n_clusters.")
            }
            ClusterError::EmptyInput => {
                write!(f, "Input must have at least one row and one column.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ClusterError> for PyErr {
    fn from(err: ClusterError) -> PyErr {
        PyValueError::new_err(format!("ClusterError: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `Display` formatting for ClusterError variants and payload embedding.
    //
    // They intentionally DO NOT cover:
    // - The `From<ClusterError> for PyErr` conversion, which requires linking
    //   against the Python C API and is exercised by Python-level tests.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that `TooManyClusters` embeds both the requested count and the
    // feature count in its message.
    //
    // Given
    // -----
    // - A `TooManyClusters` error with requested = 12, n_features = 7.
    //
    // Expect
    // ------
    // - The Display output contains "12" and "7".
    fn cluster_error_too_many_clusters_includes_payload_in_display() {
        // Arrange
        let err = ClusterError::TooManyClusters { requested: 12, n_features: 7 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("12") && msg.contains('7'), "payload missing from message: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `DisconnectedGraph` reports the component count so callers
    // can see how far the graph falls short of the requested clustering.
    //
    // Given
    // -----
    // - A `DisconnectedGraph` error with requested = 2, n_components = 5.
    //
    // Expect
    // ------
    // - The Display output contains "5" and "2".
    fn cluster_error_disconnected_graph_includes_component_count() {
        // Arrange
        let err = ClusterError::DisconnectedGraph { requested: 2, n_components: 5 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('5') && msg.contains('2'), "payload missing from message: {msg}");
    }

    #[test]
    // Purpose
    // -------
    // Verify that `Asymmetric` names the offending matrix position.
    //
    // Given
    // -----
    // - An `Asymmetric` error at (3, 9).
    //
    // Expect
    // ------
    // - The Display output contains "3" and "9".
    fn cluster_error_asymmetric_includes_position() {
        // Arrange
        let err = ClusterError::Asymmetric { row: 3, col: 9 };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains('3') && msg.contains('9'), "payload missing from message: {msg}");
    }
}
