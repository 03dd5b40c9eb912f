//! stability::validation — input validation for the ensemble fit.
//!
//! Purpose
//! -------
//! Centralize every check `fit()` performs before drawing the first split:
//! configuration scalars, data shapes and finiteness, connectivity
//! compatibility, cluster-count resolution, and the split-size arithmetic.
//! A `StabilityModel` that passes this gate runs the whole ensemble without
//! further configuration failures.
//!
//! Key behaviors
//! -------------
//! - [`validate_fit_inputs`] walks the checks in order from cheap scalar
//!   comparisons to the full non-finite scan and the graph component count,
//!   returning the first violation as a [`StabilityError`].
//! - [`resolved_split_size`] is the single definition of the selection-subset
//!   size (`round(ratio_split · n)`), shared with the fit loop.
//!
//! Invariants & assumptions
//! ------------------------
//! - Passing validation guarantees: finite data, matching shapes, a resolved
//!   cluster count in `1..=p` reachable under the connectivity constraint,
//!   and a split size in `1..n` that supports a `k`-column regression.
//!
//! Conventions
//! -----------
//! - Checks fail fast: the first violated constraint is reported, not all of
//!   them.
//!
//! Testing notes
//! -------------
//! - Unit tests walk every rejection branch and one accepting configuration.

use ndarray::{ArrayView1, ArrayView2};

use crate::clustering::Connectivity;
use crate::stability::config::{ClusterCount, StabilityModel};
use crate::stability::errors::{StabilityError, StabilityResult};

/// Selection-subset size for a given ratio and sample count.
///
/// # Arguments
/// * `ratio_split` - Fraction of samples in the selection subset.
/// * `n_rows` - Total sample count.
///
/// # Returns
/// * `round(ratio_split · n_rows)` as a row count.
pub(crate) fn resolved_split_size(ratio_split: f64, n_rows: usize) -> usize {
    (ratio_split * n_rows as f64).round() as usize
}

/// Validate configuration, data, and connectivity before any split work.
///
/// Parameters
/// ----------
/// - `model`: hyperparameter record to check.
/// - `x`: `(n, p)` design matrix.
/// - `y`: length-`n` response.
/// - `connectivity`: optional adjacency constraint over the `p` features.
///
/// Returns
/// -------
/// - `Ok(())` when every constraint holds.
///
/// Errors
/// ------
/// - `StabilityError::InvalidTheta`, `InvalidSplitCount`,
///   `InvalidSplitRatio`, `InvalidClusterProportion`: configuration scalars
///   out of range.
/// - `StabilityError::EmptyData`, `DimensionMismatch`, `NonFiniteData`,
///   `NonFiniteTarget`: malformed data.
/// - `StabilityError::ConnectivitySize`: connectivity covers a different
///   feature count than `x`.
/// - `StabilityError::ClusterCountOutOfRange`: resolved count is 0 or
///   exceeds `p`.
/// - `StabilityError::EmptySplit`, `NoHeldOutRows`,
///   `SplitSmallerThanClusters`: split-size arithmetic leaves no usable
///   selection or held-out subset.
/// - `StabilityError::Cluster` wrapping
///   [`crate::clustering::ClusterError::DisconnectedGraph`]: the constraint
///   graph has more connected components than the requested cluster count.
pub fn validate_fit_inputs(
    model: &StabilityModel, x: &ArrayView2<f64>, y: &ArrayView1<f64>,
    connectivity: Option<&Connectivity>,
) -> StabilityResult<()> {
    if !model.theta.is_finite() || model.theta <= 0.0 {
        return Err(StabilityError::InvalidTheta(model.theta));
    }
    if model.n_split == 0 {
        return Err(StabilityError::InvalidSplitCount(model.n_split));
    }
    if !model.ratio_split.is_finite()
        || !(model.ratio_split > 0.0 && model.ratio_split < 1.0)
    {
        return Err(StabilityError::InvalidSplitRatio(model.ratio_split));
    }
    if let ClusterCount::Proportional(proportion) = model.cluster_count {
        if !proportion.is_finite() || !(proportion > 0.0 && proportion <= 1.0) {
            return Err(StabilityError::InvalidClusterProportion(proportion));
        }
    }

    let (n_rows, n_features) = x.dim();
    if n_rows == 0 || n_features == 0 {
        return Err(StabilityError::EmptyData);
    }
    if y.len() != n_rows {
        return Err(StabilityError::DimensionMismatch {
            n_rows,
            n_targets: y.len(),
        });
    }
    for ((row, col), &value) in x.indexed_iter() {
        if !value.is_finite() {
            return Err(StabilityError::NonFiniteData { row, col, value });
        }
    }
    for (index, &value) in y.indexed_iter() {
        if !value.is_finite() {
            return Err(StabilityError::NonFiniteTarget { index, value });
        }
    }

    if let Some(graph) = connectivity {
        if graph.n_features() != n_features {
            return Err(StabilityError::ConnectivitySize {
                expected: n_features,
                found: graph.n_features(),
            });
        }
    }

    let n_clusters = model.cluster_count.resolve(n_features);
    if n_clusters == 0 || n_clusters > n_features {
        return Err(StabilityError::ClusterCountOutOfRange {
            requested: n_clusters,
            n_features,
        });
    }

    let split_size = resolved_split_size(model.ratio_split, n_rows);
    if split_size == 0 {
        return Err(StabilityError::EmptySplit);
    }
    if split_size >= n_rows {
        return Err(StabilityError::NoHeldOutRows { split_size, n_rows });
    }
    if split_size < n_clusters {
        return Err(StabilityError::SplitSmallerThanClusters { split_size, n_clusters });
    }

    if let Some(graph) = connectivity {
        let n_components = graph.n_components();
        if n_components > n_clusters {
            return Err(StabilityError::Cluster(
                crate::clustering::ClusterError::DisconnectedGraph {
                    requested: n_clusters,
                    n_components,
                },
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    use crate::stability::config::SelectionMode;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Every rejection branch of `validate_fit_inputs`, grouped by concern.
    // - One accepting configuration.
    //
    // They intentionally DO NOT cover:
    // - The fit loop itself (owned by `stability::model` tests).
    // -------------------------------------------------------------------------

    /// Valid 10×6 data with a matching response.
    fn valid_data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((10, 6), |(row, col)| (row * 6 + col) as f64 * 0.1);
        let y = Array1::from_shape_fn(10, |row| row as f64 * 0.5);
        (x, y)
    }

    /// Model that passes validation against `valid_data`.
    fn valid_model() -> StabilityModel {
        StabilityModel::new(0.1, 4, 0.5, ClusterCount::Fixed(3), SelectionMode::Multivariate, 7)
    }

    #[test]
    // Purpose
    // -------
    // Walk the configuration-scalar rejections.
    //
    // Given
    // -----
    // - Models with theta ≤ 0 or NaN, zero splits, ratio at the closed
    //   boundary, and a proportional count of 0.
    //
    // Expect
    // ------
    // - Each maps to its dedicated configuration variant.
    fn validate_fit_inputs_rejects_bad_scalars() {
        // Arrange
        let (x, y) = valid_data();

        // Act + Assert
        let mut model = valid_model();
        model.theta = 0.0;
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::InvalidTheta(0.0)
        );

        let mut model = valid_model();
        model.theta = f64::NAN;
        assert!(matches!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::InvalidTheta(_)
        ));

        let mut model = valid_model();
        model.n_split = 0;
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::InvalidSplitCount(0)
        );

        let mut model = valid_model();
        model.ratio_split = 1.0;
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::InvalidSplitRatio(1.0)
        );

        let mut model = valid_model();
        model.cluster_count = ClusterCount::Proportional(0.0);
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::InvalidClusterProportion(0.0)
        );
    }

    #[test]
    // Purpose
    // -------
    // Walk the data rejections.
    //
    // Given
    // -----
    // - An empty matrix, a response of the wrong length, a NaN in X, and an
    //   infinity in y.
    //
    // Expect
    // ------
    // - EmptyData, DimensionMismatch, NonFiniteData, NonFiniteTarget with
    //   the offending coordinates.
    fn validate_fit_inputs_rejects_bad_data() {
        // Arrange
        let model = valid_model();
        let (x, y) = valid_data();

        // Act + Assert
        let empty = Array2::<f64>::zeros((0, 6));
        assert_eq!(
            validate_fit_inputs(&model, &empty.view(), &y.view(), None).unwrap_err(),
            StabilityError::EmptyData
        );

        let short = Array1::<f64>::zeros(4);
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &short.view(), None).unwrap_err(),
            StabilityError::DimensionMismatch { n_rows: 10, n_targets: 4 }
        );

        let mut poisoned = x.clone();
        poisoned[(2, 5)] = f64::NAN;
        assert!(matches!(
            validate_fit_inputs(&model, &poisoned.view(), &y.view(), None).unwrap_err(),
            StabilityError::NonFiniteData { row: 2, col: 5, .. }
        ));

        let mut poisoned = y.clone();
        poisoned[8] = f64::INFINITY;
        assert!(matches!(
            validate_fit_inputs(&model, &x.view(), &poisoned.view(), None).unwrap_err(),
            StabilityError::NonFiniteTarget { index: 8, .. }
        ));
    }

    #[test]
    // Purpose
    // -------
    // Walk the connectivity rejections.
    //
    // Given
    // -----
    // - A graph over the wrong feature count, and a graph with more
    //   components than the requested cluster count.
    //
    // Expect
    // ------
    // - ConnectivitySize, then a wrapped DisconnectedGraph.
    fn validate_fit_inputs_rejects_bad_connectivity() {
        // Arrange
        let model = valid_model();
        let (x, y) = valid_data();

        // Act + Assert
        let wrong_size = Connectivity::from_edges(4, &[(0, 1)]).expect("valid edges");
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), Some(&wrong_size)).unwrap_err(),
            StabilityError::ConnectivitySize { expected: 6, found: 4 }
        );

        // 6 features, one edge: components {0,1}, {2}, {3}, {4}, {5} = 5 > 3.
        let sparse = Connectivity::from_edges(6, &[(0, 1)]).expect("valid edges");
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), Some(&sparse)).unwrap_err(),
            StabilityError::Cluster(crate::clustering::ClusterError::DisconnectedGraph {
                requested: 3,
                n_components: 5,
            })
        );
    }

    #[test]
    // Purpose
    // -------
    // Walk the sizing rejections.
    //
    // Given
    // -----
    // - A resolved cluster count above p, a ratio rounding to zero rows, a
    //   ratio rounding to all rows, and a split smaller than the cluster
    //   count.
    //
    // Expect
    // ------
    // - ClusterCountOutOfRange, EmptySplit, NoHeldOutRows,
    //   SplitSmallerThanClusters.
    fn validate_fit_inputs_rejects_bad_sizing() {
        // Arrange
        let (x, y) = valid_data();

        // Act + Assert
        let mut model = valid_model();
        model.cluster_count = ClusterCount::Fixed(7);
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::ClusterCountOutOfRange { requested: 7, n_features: 6 }
        );

        let mut model = valid_model();
        model.ratio_split = 0.04;
        model.cluster_count = ClusterCount::Fixed(1);
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::EmptySplit
        );

        let mut model = valid_model();
        model.ratio_split = 0.97;
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::NoHeldOutRows { split_size: 10, n_rows: 10 }
        );

        let mut model = valid_model();
        model.ratio_split = 0.2;
        model.cluster_count = ClusterCount::Fixed(5);
        assert_eq!(
            validate_fit_inputs(&model, &x.view(), &y.view(), None).unwrap_err(),
            StabilityError::SplitSmallerThanClusters { split_size: 2, n_clusters: 5 }
        );
    }

    #[test]
    // Purpose
    // -------
    // Verify a well-formed configuration passes.
    //
    // Given
    // -----
    // - The valid model, valid data, and a full path graph.
    //
    // Expect
    // ------
    // - `Ok(())`.
    fn validate_fit_inputs_accepts_valid_configuration() {
        // Arrange
        let model = valid_model();
        let (x, y) = valid_data();
        let path = Connectivity::from_edges(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)])
            .expect("valid edges");

        // Act
        let outcome = validate_fit_inputs(&model, &x.view(), &y.view(), Some(&path));

        // Assert
        assert!(outcome.is_ok());
    }
}
