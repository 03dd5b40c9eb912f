//! Cluster-mean projection operators and their broadcast inverse.
//!
//! Purpose
//! -------
//! Turn a label vector into the pair of linear operators the rest of the
//! pipeline works with: the row-stochastic coarsening matrix `P`
//! (n_clusters×p) that maps feature-resolution data onto cluster means, and
//! the indicator transpose `P_inv` (p×n_clusters) that broadcasts one value
//! per cluster back to every member feature unchanged.
//!
//! Key behaviors
//! -------------
//! - [`ProjectionPair::from_labels`] builds both operators from a contiguous
//!   label vector, rejecting gaps and empty clusters.
//! - [`ProjectionPair::reduce`] computes `X·Pᵀ` (per-row cluster means);
//!   [`ProjectionPair::broadcast`] computes `P_inv·v`.
//! - Both dense matrices are exposed read-only for property checks.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every row of `P` sums to 1 (entries are `1/|cluster|` over members).
//! - Every row of `P_inv` holds exactly one entry equal to 1.
//! - For any vector `v` constant within each cluster,
//!   `broadcast(reduce(v))` recovers `v`: bit-exactly when member counts
//!   are powers of two, within rounding of the `1/|cluster|` weights
//!   otherwise.
//!
//! Conventions
//! -----------
//! - Labels must be contiguous `0..n_clusters`; producers in this crate
//!   number clusters by smallest member feature, but any contiguous
//!   labelling is accepted.
//! - Operators are dense `ndarray` matrices; at coarse cluster counts they
//!   are small, and at `n_clusters == p` they are permutation-free
//!   identities.
//!
//! Downstream usage
//! ----------------
//! - The ensemble fit reduces each selection subsample before the penalized
//!   regression and broadcasts per-cluster coefficients back to feature
//!   resolution.
//! - Split-based inference rebuilds the pair from stored labels, reduces
//!   held-out rows, and broadcasts per-cluster statistics.
//!
//! Testing notes
//! -------------
//! - Unit tests verify row-stochasticity, the unit-indicator structure of
//!   `P_inv`, the exact cluster-constant round trip, and rejection of
//!   malformed label vectors.

use crate::clustering::errors::{ClusterError, ClusterResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// ProjectionPair — cluster-mean coarsening operator and broadcast inverse.
///
/// Purpose
/// -------
/// Hold `P` (n_clusters×p, row-stochastic) and `P_inv` (p×n_clusters, unit
/// indicator rows) for one clustering, plus the shape bookkeeping the
/// pipeline needs when moving between feature and cluster resolution.
///
/// Fields
/// ------
/// - `reduce_op`: `Array2<f64>`
///   The matrix `P`; row c holds `1/|cluster c|` at every member feature.
/// - `broadcast_op`: `Array2<f64>`
///   The matrix `P_inv`; row j holds a single 1 at feature j's cluster.
/// - `n_clusters`, `n_features`: shape bookkeeping.
///
/// Invariants
/// ----------
/// - `reduce_op.dim() == (n_clusters, n_features)` and
///   `broadcast_op.dim() == (n_features, n_clusters)`.
/// - `reduce_op` rows sum to 1; `broadcast_op` rows are unit indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPair {
    reduce_op: Array2<f64>,
    broadcast_op: Array2<f64>,
    n_clusters: usize,
    n_features: usize,
}

impl ProjectionPair {
    /// Build the operator pair from a contiguous label vector.
    ///
    /// Parameters
    /// ----------
    /// - `labels`: `&ArrayView1<usize>`
    ///   Length-p cluster assignment. Labels must cover `0..n_clusters`
    ///   (where `n_clusters = max(labels) + 1`) with every cluster
    ///   non-empty.
    ///
    /// Returns
    /// -------
    /// `ClusterResult<ProjectionPair>` with both operators materialized.
    ///
    /// Errors
    /// ------
    /// - `ClusterError::EmptyInput` when `labels` is empty.
    /// - `ClusterError::NonContiguousLabels` when some id below the maximum
    ///   label never occurs.
    pub fn from_labels(labels: &ArrayView1<usize>) -> ClusterResult<Self> {
        let n_features = labels.len();
        if n_features == 0 {
            return Err(ClusterError::EmptyInput);
        }
        let n_clusters = labels.iter().max().copied().unwrap_or(0) + 1;

        let mut member_counts = vec![0usize; n_clusters];
        for &label in labels {
            member_counts[label] += 1;
        }
        if let Some(missing) = member_counts.iter().position(|&count| count == 0) {
            return Err(ClusterError::NonContiguousLabels { missing });
        }

        let mut reduce_op = Array2::<f64>::zeros((n_clusters, n_features));
        let mut broadcast_op = Array2::<f64>::zeros((n_features, n_clusters));
        for (feature, &label) in labels.iter().enumerate() {
            reduce_op[(label, feature)] = 1.0 / member_counts[label] as f64;
            broadcast_op[(feature, label)] = 1.0;
        }

        Ok(ProjectionPair { reduce_op, broadcast_op, n_clusters, n_features })
    }

    /// Number of clusters (rows of `P`).
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Number of features (columns of `P`).
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Read-only view of `P`.
    pub fn reduce_op(&self) -> ArrayView2<f64> {
        self.reduce_op.view()
    }

    /// Read-only view of `P_inv`.
    pub fn broadcast_op(&self) -> ArrayView2<f64> {
        self.broadcast_op.view()
    }

    /// Project feature-resolution rows onto cluster means: `X·Pᵀ`.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&ArrayView2<f64>`
    ///   Data matrix (m×p) with one column per feature.
    ///
    /// Returns
    /// -------
    /// The reduced matrix (m×n_clusters); entry (i, c) is the mean over
    /// cluster c's member features of row i.
    ///
    /// Panics
    /// ------
    /// - Panics on shape mismatch (`x.ncols() != n_features`); callers
    ///   validate shapes before projecting.
    pub fn reduce(&self, x: &ArrayView2<f64>) -> Array2<f64> {
        x.dot(&self.reduce_op.t())
    }

    /// Broadcast one value per cluster to every member feature: `P_inv·v`.
    ///
    /// Parameters
    /// ----------
    /// - `per_cluster`: `&ArrayView1<f64>`
    ///   Length-n_clusters vector.
    ///
    /// Returns
    /// -------
    /// Length-p vector carrying each feature its cluster's value verbatim.
    ///
    /// Panics
    /// ------
    /// - Panics on length mismatch; callers validate shapes first.
    pub fn broadcast(&self, per_cluster: &ArrayView1<f64>) -> Array1<f64> {
        self.broadcast_op.dot(per_cluster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Operator structure: row-stochastic P, unit-indicator P_inv.
    // - The exact round trip on cluster-constant vectors.
    // - Reduction to per-row cluster means.
    // - Rejection of empty and gapped label vectors.
    //
    // They intentionally DO NOT cover:
    // - Label production; see `clustering::agglomeration`.
    // -------------------------------------------------------------------------

    fn pair_for(labels: &[usize]) -> ProjectionPair {
        let labels = Array1::from(labels.to_vec());
        ProjectionPair::from_labels(&labels.view()).expect("contiguous labels")
    }

    #[test]
    // Purpose
    // -------
    // Verify that every row of P sums to 1 and every row of P_inv holds a
    // single unit entry.
    //
    // Given
    // -----
    // - Labels [0, 0, 1, 2, 2, 2] over 6 features.
    //
    // Expect
    // ------
    // - Row sums of P are all 1; each row of P_inv contains exactly one 1
    //   and zeros elsewhere.
    fn projection_rows_are_stochastic_and_indicator() {
        // Arrange
        let pair = pair_for(&[0, 0, 1, 2, 2, 2]);

        // Act
        let row_sums: Vec<f64> =
            pair.reduce_op().rows().into_iter().map(|row| row.sum()).collect();

        // Assert
        for sum in row_sums {
            assert_relative_eq!(sum, 1.0, epsilon = 1e-12);
        }
        for row in pair.broadcast_op().rows() {
            let ones = row.iter().filter(|&&v| v == 1.0).count();
            let zeros = row.iter().filter(|&&v| v == 0.0).count();
            assert_eq!(ones, 1);
            assert_eq!(ones + zeros, row.len());
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify the round trip broadcast(reduce(v)) == v on a cluster-constant
    // vector whose member counts make the averaging weights exact.
    //
    // Given
    // -----
    // - Labels [0, 0, 1, 1] (2-member clusters, so 1/|cluster| is exact)
    //   and v = [3.5, 3.5, -2.0, -2.0].
    //
    // Expect
    // ------
    // - The round trip reproduces v bit-for-bit.
    fn projection_round_trip_is_exact_on_cluster_constant_vectors() {
        // Arrange
        let pair = pair_for(&[0, 0, 1, 1]);
        let v = array![[3.5, 3.5, -2.0, -2.0]];

        // Act
        let reduced = pair.reduce(&v.view());
        let restored = pair.broadcast(&reduced.row(0));

        // Assert
        assert_eq!(restored.to_vec(), vec![3.5, 3.5, -2.0, -2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that reduce computes per-row cluster means.
    //
    // Given
    // -----
    // - Labels [0, 0, 1] and a 2×3 matrix.
    //
    // Expect
    // ------
    // - Column 0 of the result averages features {0, 1}; column 1 carries
    //   feature 2 verbatim.
    fn reduce_computes_cluster_means() {
        // Arrange
        let pair = pair_for(&[0, 0, 1]);
        let x = Array2::from_shape_vec((2, 3), vec![1.0, 3.0, 10.0, 5.0, 7.0, 20.0])
            .expect("static shape");

        // Act
        let reduced = pair.reduce(&x.view());

        // Assert
        assert_relative_eq!(reduced[(0, 0)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(reduced[(0, 1)], 10.0, epsilon = 1e-12);
        assert_relative_eq!(reduced[(1, 0)], 6.0, epsilon = 1e-12);
        assert_relative_eq!(reduced[(1, 1)], 20.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify that broadcast copies each cluster value to every member.
    //
    // Given
    // -----
    // - Labels [0, 1, 1, 0] and per-cluster values [0.25, -4.0].
    //
    // Expect
    // ------
    // - The feature vector is [0.25, -4.0, -4.0, 0.25].
    fn broadcast_copies_values_to_members() {
        // Arrange
        let pair = pair_for(&[0, 1, 1, 0]);
        let per_cluster = array![0.25, -4.0];

        // Act
        let features = pair.broadcast(&per_cluster.view());

        // Assert
        assert_eq!(features.to_vec(), vec![0.25, -4.0, -4.0, 0.25]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that empty and gapped label vectors are rejected.
    //
    // Given
    // -----
    // - An empty label vector, and labels [0, 2] skipping id 1.
    //
    // Expect
    // ------
    // - `EmptyInput` and `NonContiguousLabels { missing: 1 }` respectively.
    fn from_labels_rejects_malformed_label_vectors() {
        // Arrange
        let empty = Array1::<usize>::from(vec![]);
        let gapped = Array1::from(vec![0usize, 2]);

        // Act & Assert
        assert_eq!(
            ProjectionPair::from_labels(&empty.view()),
            Err(ClusterError::EmptyInput)
        );
        assert_eq!(
            ProjectionPair::from_labels(&gapped.view()),
            Err(ClusterError::NonContiguousLabels { missing: 1 })
        );
    }
}
