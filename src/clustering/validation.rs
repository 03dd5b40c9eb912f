//! clustering::validation — shared input guards for agglomeration.
//!
//! Purpose
//! -------
//! Centralize the precondition checks for connectivity-constrained Ward
//! clustering so the agglomeration loop can assume well-formed inputs.
//!
//! Key behaviors
//! -------------
//! - Enforce shape and cluster-count constraints before any merge work.
//! - Reject connectivity graphs that cannot reach the requested cluster
//!   count by merging (more components than clusters).
//!
//! Conventions
//! -----------
//! - Purely validation; no allocation beyond error construction.
//! - Errors are reported via [`ClusterError`]; callers layer model-level
//!   checks (split sizes, standardization) elsewhere.
//!
//! Testing notes
//! -------------
//! - Unit tests cover every error branch and a success path with and
//!   without a connectivity constraint.

use crate::clustering::{
    agglomeration::Connectivity,
    errors::{ClusterError, ClusterResult},
};
use ndarray::ArrayView2;

/// Validate inputs to [`cluster_features`](crate::clustering::cluster_features).
///
/// Parameters
/// ----------
/// - `x`: `&ArrayView2<f64>`
///   Subsample matrix (m×p) whose columns are the features to agglomerate.
///   Must have at least one row and one column.
/// - `n_clusters`: `usize`
///   Target cluster count. Must satisfy `1 ≤ n_clusters ≤ p`.
/// - `connectivity`: `Option<&Connectivity>`
///   Optional merge constraint. When present it must be sized for exactly
///   `p` features and have at most `n_clusters` connected components.
///
/// Returns
/// -------
/// `ClusterResult<()>`
///   `Ok(())` when all constraints hold, otherwise the specific
///   [`ClusterError`].
///
/// Errors
/// ------
/// - `ClusterError::EmptyInput` when `x` has zero rows or columns.
/// - `ClusterError::ZeroClusters` when `n_clusters == 0`.
/// - `ClusterError::TooManyClusters` when `n_clusters > p`.
/// - `ClusterError::FeatureMismatch` when the connectivity graph is sized
///   for a different feature count.
/// - `ClusterError::DisconnectedGraph` when the graph has more connected
///   components than `n_clusters`.
pub fn validate_clustering_inputs(
    x: &ArrayView2<f64>, n_clusters: usize, connectivity: Option<&Connectivity>,
) -> ClusterResult<()> {
    let (n_rows, n_features) = x.dim();
    if n_rows == 0 || n_features == 0 {
        return Err(ClusterError::EmptyInput);
    }
    if n_clusters == 0 {
        return Err(ClusterError::ZeroClusters);
    }
    if n_clusters > n_features {
        return Err(ClusterError::TooManyClusters { requested: n_clusters, n_features });
    }
    if let Some(graph) = connectivity {
        if graph.n_features() != n_features {
            return Err(ClusterError::FeatureMismatch {
                expected: n_features,
                found: graph.n_features(),
            });
        }
        let n_components = graph.n_components();
        if n_components > n_clusters {
            return Err(ClusterError::DisconnectedGraph {
                requested: n_clusters,
                n_components,
            });
        }
    }
    Ok(())
}
