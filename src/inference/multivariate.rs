//! inference::multivariate — held-out OLS refits over the fitted support.
//!
//! Purpose
//! -------
//! Turn the evidence arrays of a fitted ensemble into per-split,
//! per-feature significance statistics. For every split the complement of
//! the selection subset is projected onto that split's cluster means, an
//! unpenalized regression is refitted on the clusters the penalized fit
//! selected, and the per-coefficient p-values are Bonferroni-adjusted and
//! broadcast back to feature resolution.
//!
//! Key behaviors
//! -------------
//! - [`StabilityFit::multivariate_pvalues`] emits support-size-corrected,
//!   clipped p-values; clusters outside the support carry p-value 1.
//! - [`StabilityFit::multivariate_scores`] emits uncorrected ranking scores
//!   scaled by the feature-level support size; clusters outside the support
//!   carry the uninformative score `p` (the feature count).
//! - Degenerate splits — empty support, too few held-out rows, or a
//!   singular refit — degrade to their sentinel row instead of failing the
//!   call.
//!
//! Invariants & assumptions
//! ------------------------
//! - Supplied data must match the fitted shapes; both are re-standardized
//!   with the parameters recorded at fit time before any refit.
//! - p-value matrices stay within [0, 1]; score matrices are nonnegative
//!   but unbounded above.
//!
//! Conventions
//! -----------
//! - Rows of every output matrix are indexed by split id; columns by
//!   feature. Within one row, features sharing a cluster share a value.
//! - Sentinel rows are all-ones for p-values and all-`p` for scores.
//!
//! Downstream usage
//! ----------------
//! - Aggregated vectors feed `selection::select_model_fdr` and friends; the
//!   per-split matrices are exposed for diagnostics and the Python facade.
//!
//! Testing notes
//! -------------
//! - Unit tests pin a hand-wired single-split ensemble against closed-form
//!   t-tails, walk each sentinel cause, and check broadcast structure on a
//!   fitted ensemble.

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::clustering::ProjectionPair;
use crate::inference::errors::InferenceResult;
use crate::inference::ols::ols_pvalues;
use crate::inference::statistics::{AggregationRule, SplitStatistics, held_out_rows};
use crate::inference::validation::validate_inference_inputs;
use crate::stability::StabilityFit;

/// One split's successful refit: the projection pair, the support cluster
/// ids, and the raw per-support OLS p-values.
struct SplitRefit {
    pair: ProjectionPair,
    support: Vec<usize>,
    pvalues: Array1<f64>,
}

impl StabilityFit {
    /// multivariate_pvalues — per-split OLS p-values on held-out rows.
    ///
    /// Purpose
    /// -------
    /// For each split, refit an unpenalized regression of the held-out
    /// response on the held-out cluster-mean columns the penalized fit
    /// selected, multiply each coefficient's two-sided p-value by the
    /// support size, clip to [0, 1], and broadcast per-cluster values to
    /// every member feature. Splits whose refit is degenerate keep the
    /// all-ones sentinel row.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&ArrayView2<f64>`
    ///   Design matrix with the fitted shape `(n, p)`; re-standardized
    ///   internally with the recorded parameters.
    /// - `y`: `&ArrayView1<f64>`
    ///   Length-`n` response; re-standardized likewise.
    ///
    /// Returns
    /// -------
    /// `InferenceResult<SplitStatistics>`
    ///   The n_split×p p-value matrix and its aggregated length-p vector
    ///   (the single row itself when the ensemble holds one split).
    ///
    /// Errors
    /// ------
    /// - `SampleCountMismatch`, `FeatureCountMismatch`, `NonFiniteData`,
    ///   `NonFiniteTarget`: supplied data disagrees with the fitted shapes
    ///   or is not finite.
    /// - `Cluster`: stored labels failed to rebuild a projection pair.
    /// - `Aggregation`: the quantile combinator rejected its input.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use ndarray::{Array1, Array2};
    /// use rust_stabsel::stability::{ClusterCount, SelectionMode, StabilityModel};
    ///
    /// let x = Array2::from_shape_fn((12, 4), |(i, j)| ((i * 4 + j) as f64 * 0.29).sin());
    /// let y = Array1::from_shape_fn(12, |i| (i as f64 * 0.53).cos());
    /// let model = StabilityModel::new(
    ///     0.1, 3, 0.5, ClusterCount::Fixed(2), SelectionMode::Multivariate, 5,
    /// );
    /// let fit = model.fit(&x.view(), &y.view(), None)?;
    /// let stats = fit.multivariate_pvalues(&x.view(), &y.view())?;
    /// assert_eq!(stats.per_split().dim(), (3, 4));
    /// assert!(stats.aggregated().iter().all(|&p| (0.0..=1.0).contains(&p)));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn multivariate_pvalues(
        &self, x: &ArrayView2<f64>, y: &ArrayView1<f64>,
    ) -> InferenceResult<SplitStatistics> {
        validate_inference_inputs(self, x, y)?;
        let x_std = self.standardization().apply_x(x);
        let y_std = self.standardization().apply_y(y);

        let n_split = self.config().n_split;
        let mut per_split = Array2::<f64>::ones((n_split, self.n_features()));
        for split_id in 0..n_split {
            let Some(refit) = self.refit_split(split_id, &x_std, &y_std)? else {
                continue;
            };
            let support_size = refit.support.len() as f64;
            let mut per_cluster = Array1::<f64>::ones(self.n_clusters());
            for (position, &cluster) in refit.support.iter().enumerate() {
                per_cluster[cluster] =
                    (support_size * refit.pvalues[position]).clamp(0.0, 1.0);
            }
            per_split
                .row_mut(split_id)
                .assign(&refit.pair.broadcast(&per_cluster.view()));
        }
        SplitStatistics::from_rows(per_split, AggregationRule::PValue)
    }

    /// multivariate_scores — per-split ranking scores on held-out rows.
    ///
    /// Same refit as [`StabilityFit::multivariate_pvalues`], but each
    /// support cluster's score is the OLS p-value scaled by the number of
    /// nonzero back-projected coefficients (a feature-level support count),
    /// with no clipping, and non-support clusters carry the uninformative
    /// score `p`. Scores order candidate features; they are not calibrated
    /// p-values.
    ///
    /// Errors mirror [`StabilityFit::multivariate_pvalues`].
    pub fn multivariate_scores(
        &self, x: &ArrayView2<f64>, y: &ArrayView1<f64>,
    ) -> InferenceResult<SplitStatistics> {
        validate_inference_inputs(self, x, y)?;
        let x_std = self.standardization().apply_x(x);
        let y_std = self.standardization().apply_y(y);

        let n_split = self.config().n_split;
        let uninformative = self.n_features() as f64;
        let mut per_split =
            Array2::<f64>::from_elem((n_split, self.n_features()), uninformative);
        for split_id in 0..n_split {
            let Some(refit) = self.refit_split(split_id, &x_std, &y_std)? else {
                continue;
            };
            let beta_features =
                refit.pair.broadcast(&self.beta_array().row(split_id));
            let model_size =
                beta_features.iter().filter(|&&coef| coef != 0.0).count() as f64;
            let mut per_cluster =
                Array1::<f64>::from_elem(self.n_clusters(), uninformative);
            for (position, &cluster) in refit.support.iter().enumerate() {
                per_cluster[cluster] = model_size * refit.pvalues[position];
            }
            per_split
                .row_mut(split_id)
                .assign(&refit.pair.broadcast(&per_cluster.view()));
        }
        SplitStatistics::from_rows(per_split, AggregationRule::Score)
    }

    /// Refit one split on its held-out complement.
    ///
    /// Returns `Ok(None)` when the split degrades to its sentinel row: the
    /// penalized fit selected nothing, or the restricted system has no
    /// residual degrees of freedom, or its Gram matrix is not positive
    /// definite.
    fn refit_split(
        &self, split_id: usize, x_std: &Array2<f64>, y_std: &Array1<f64>,
    ) -> InferenceResult<Option<SplitRefit>> {
        let labels = self.clust_array().row(split_id);
        let pair = ProjectionPair::from_labels(&labels)?;
        let held = held_out_rows(&self.split_array().row(split_id), self.n_samples());
        let y_held = y_std.select(Axis(0), &held);
        let x_held_proj = pair.reduce(&x_std.select(Axis(0), &held).view());

        let support: Vec<usize> = self
            .beta_array()
            .row(split_id)
            .iter()
            .enumerate()
            .filter(|(_, &coef)| coef != 0.0)
            .map(|(cluster, _)| cluster)
            .collect();
        if support.is_empty() {
            debug!("split {}: empty support, sentinel row", split_id + 1);
            return Ok(None);
        }

        let x_model = x_held_proj.select(Axis(1), &support);
        match ols_pvalues(&x_model.view(), &y_held.view()) {
            Some(pvalues) => Ok(Some(SplitRefit { pair, support, pvalues })),
            None => {
                debug!(
                    "split {}: degenerate refit ({} regressors, {} held-out rows), \
                     sentinel row",
                    split_id + 1,
                    support.len(),
                    held.len()
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    use crate::stability::{
        ClusterCount, SelectionMode, StabilityModel, Standardization,
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closed-form p-values and scores on a hand-wired single-split
    //   ensemble.
    // - Sentinel degradation for empty supports and underdetermined refits.
    // - Broadcast structure and bounds on a fitted ensemble.
    // - Shape validation at the public surface.
    //
    // They intentionally DO NOT cover:
    // - The OLS arithmetic itself; see `inference::ols`.
    // -------------------------------------------------------------------------

    /// Hand-wired single-split ensemble over 4 samples and 4 features.
    ///
    /// Split rows {0, 1} are selected, so inference sees held-out rows
    /// {2, 3}; clusters are {0, 1} and {2, 3} with identity standardization,
    /// and the per-split coefficients mark only cluster 0.
    fn literal_fit(beta_row: [f64; 2]) -> StabilityFit {
        StabilityFit {
            config: StabilityModel::new(
                0.1,
                1,
                0.5,
                ClusterCount::Fixed(2),
                SelectionMode::Multivariate,
                1,
            ),
            n_samples: 4,
            n_features: 4,
            n_clusters: 2,
            split_size: 2,
            beta_array: array![[beta_row[0], beta_row[1]]],
            split_array: array![[0usize, 1]],
            clust_array: array![[0usize, 0, 1, 1]],
            consensus: Array1::zeros(4),
            standardization: Standardization {
                x_mean: Array1::zeros(4),
                x_scale: Array1::from_elem(4, 1.0),
                y_mean: 0.0,
                y_scale: 1.0,
            },
        }
    }

    /// Data whose held-out projection of cluster 0 is the column [1, 2].
    fn literal_data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [0.0, 0.0, 5.0, 5.0],
            [0.0, 0.0, 5.0, 5.0],
            [1.0, 1.0, 2.0, 2.0],
            [2.0, 2.0, 3.0, 3.0],
        ];
        let y = array![0.0, 0.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    // Purpose
    // -------
    // Pin the single-support refit against the df = 1 closed form, through
    // Bonferroni scaling, broadcasting, and the single-split aggregation
    // bypass.
    //
    // Given
    // -----
    // - The literal ensemble with support {cluster 0}; held-out rows give
    //   the regression of [1, 1] on [1, 2], whose two-sided p-value is
    //   1 − 2·atan(3)/π.
    //
    // Expect
    // ------
    // - p-value row [p, p, 1, 1] with support size 1 leaving p unscaled.
    // - Score row [2p, 2p, 4, 4]: two member features make model_size 2,
    //   and non-support clusters carry the feature count.
    fn literal_ensemble_matches_closed_forms() {
        // Arrange
        let fit = literal_fit([1.0, 0.0]);
        let (x, y) = literal_data();
        let cauchy = 1.0 - 2.0 * 3f64.atan() / std::f64::consts::PI;

        // Act
        let pvalues = fit
            .multivariate_pvalues(&x.view(), &y.view())
            .expect("well-formed inputs");
        let scores = fit
            .multivariate_scores(&x.view(), &y.view())
            .expect("well-formed inputs");

        // Assert
        let row = pvalues.per_split().row(0);
        assert_relative_eq!(row[0], cauchy, epsilon = 1e-9);
        assert_relative_eq!(row[1], cauchy, epsilon = 1e-9);
        assert_eq!(row[2], 1.0);
        assert_eq!(row[3], 1.0);
        assert_eq!(pvalues.aggregated().to_vec(), row.to_vec());

        let row = scores.per_split().row(0);
        assert_relative_eq!(row[0], 2.0 * cauchy, epsilon = 1e-9);
        assert_relative_eq!(row[1], 2.0 * cauchy, epsilon = 1e-9);
        assert_eq!(row[2], 4.0);
        assert_eq!(row[3], 4.0);
        assert_eq!(scores.aggregated().to_vec(), row.to_vec());
    }

    #[test]
    // Purpose
    // -------
    // Verify both sentinel causes: an empty support and a refit with no
    // residual degrees of freedom.
    //
    // Given
    // -----
    // - The literal ensemble with all-zero coefficients, then with both
    //   clusters selected (2 regressors on 2 held-out rows).
    //
    // Expect
    // ------
    // - All-ones p-value rows and all-4 score rows in both cases.
    fn degenerate_splits_keep_sentinel_rows() {
        // Arrange
        let (x, y) = literal_data();

        for beta_row in [[0.0, 0.0], [1.0, -1.0]] {
            let fit = literal_fit(beta_row);

            // Act
            let pvalues = fit
                .multivariate_pvalues(&x.view(), &y.view())
                .expect("well-formed inputs");
            let scores = fit
                .multivariate_scores(&x.view(), &y.view())
                .expect("well-formed inputs");

            // Assert
            assert_eq!(pvalues.per_split().row(0).to_vec(), vec![1.0; 4]);
            assert_eq!(scores.per_split().row(0).to_vec(), vec![4.0; 4]);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify structure on a genuinely fitted ensemble: shapes, bounds, and
    // within-cluster constancy of every row.
    //
    // Given
    // -----
    // - A 3-split ensemble fitted on smooth 12×4 data.
    //
    // Expect
    // ------
    // - (3, 4) matrices; p-values within [0, 1]; scores finite and
    //   nonnegative; features sharing a split's cluster share that row's
    //   value exactly.
    fn fitted_ensemble_produces_structured_rows() {
        // Arrange
        let x = Array2::from_shape_fn((12, 4), |(row, col)| {
            ((row * 4 + col) as f64 * 0.29).sin()
        });
        let y = Array1::from_shape_fn(12, |row| (row as f64 * 0.53).cos());
        let model = StabilityModel::new(
            0.1,
            3,
            0.5,
            ClusterCount::Fixed(2),
            SelectionMode::Multivariate,
            5,
        );
        let fit = model.fit(&x.view(), &y.view(), None).expect("toy ensemble fits");

        // Act
        let pvalues = fit
            .multivariate_pvalues(&x.view(), &y.view())
            .expect("well-formed inputs");
        let scores = fit
            .multivariate_scores(&x.view(), &y.view())
            .expect("well-formed inputs");

        // Assert
        assert_eq!(pvalues.per_split().dim(), (3, 4));
        assert_eq!(scores.per_split().dim(), (3, 4));
        assert!(pvalues.per_split().iter().all(|&p| (0.0..=1.0).contains(&p)));
        assert!(scores.per_split().iter().all(|&s| s.is_finite() && s >= 0.0));
        for split_id in 0..3 {
            let labels = fit.clust_array().row(split_id);
            let row = pvalues.per_split().row(split_id);
            for feature in 0..4 {
                for other in 0..4 {
                    if labels[feature] == labels[other] {
                        assert_eq!(row[feature], row[other]);
                    }
                }
            }
        }
        assert_eq!(pvalues.aggregated().len(), 4);
    }

    #[test]
    // Purpose
    // -------
    // Verify shape validation runs before any refit.
    //
    // Given
    // -----
    // - The literal ensemble and a 4×3 design.
    //
    // Expect
    // ------
    // - FeatureCountMismatch { expected: 4, found: 3 }.
    fn shape_mismatch_is_rejected() {
        // Arrange
        let fit = literal_fit([1.0, 0.0]);
        let narrow = Array2::<f64>::zeros((4, 3));
        let y = Array1::<f64>::zeros(4);

        // Act
        let outcome = fit.multivariate_pvalues(&narrow.view(), &y.view());

        // Assert
        assert_eq!(
            outcome.unwrap_err(),
            crate::inference::errors::InferenceError::FeatureCountMismatch {
                expected: 4,
                found: 3,
            }
        );
    }
}
