//! stability::model — the ensemble fit and its immutable result record.
//!
//! Purpose
//! -------
//! Implement `StabilityModel::fit`: draw `n_split` random selection
//! subsets, cluster each subset's features under the connectivity
//! constraint, fit an L1-penalized regression on the cluster means with a
//! data-dependent penalty, and accumulate the back-projected coefficients
//! into a consensus estimate. The outcome is a [`StabilityFit`] — evidence
//! arrays, consensus coefficients, and the standardization record — that
//! split-based inference reads but never mutates.
//!
//! Key behaviors
//! -------------
//! - Data are standardized once (zero mean, unit variance per column,
//!   population scaling) before any split work; the response mean is
//!   retained as the intercept ([`Standardization`]).
//! - Each split stores its sorted sample indices, its label vector, and its
//!   per-cluster coefficients, so inference can replay the exact geometry
//!   of every trial.
//! - The per-split penalty is `λ = theta · max_j |⟨x_proj_j, y_sel⟩| / n`
//!   with `n` the full sample count.
//! - `fit()` validates everything first and then either returns a fully
//!   populated record or an error; no partial state escapes.
//!
//! Invariants & assumptions
//! ------------------------
//! - One seeded RNG advances across splits; identical configuration and
//!   inputs reproduce bit-identical evidence arrays and consensus.
//! - `split_array` rows are strictly ascending sample indices drawn without
//!   replacement.
//! - `consensus = Σ_i P_inv·beta_proj_i / n_split`, accumulated in split
//!   order.
//!
//! Conventions
//! -----------
//! - All arrays are `ndarray` types; shapes follow (n_split, n_clusters),
//!   (n_split, split_size), (n_split, n_features).
//! - Per-split progress is reported through `log::debug!`.
//!
//! Downstream usage
//! ----------------
//! - `inference::multivariate` / `inference::univariate` consume the
//!   evidence arrays; `predict` and the Python facade consume the consensus
//!   and the standardization record.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the standardization arithmetic, determinism across
//!   repeated fits, evidence-array bookkeeping, signal recovery on a sparse
//!   synthetic model, and prediction round-trips.

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::{SeedableRng, rngs::StdRng};

use crate::clustering::{Connectivity, ProjectionPair, cluster_features};
use crate::lasso::{LassoOptions, fit_lasso};
use crate::stability::config::StabilityModel;
use crate::stability::errors::{StabilityError, StabilityResult};
use crate::stability::validation::{resolved_split_size, validate_fit_inputs};

/// Per-column standardization recorded at fit time.
///
/// Holds the statistics that map raw data into the standardized space the
/// ensemble was fitted in: per-feature means and scales for the design
/// matrix, and a scalar mean and scale for the response. Scales use the
/// population convention (divide by `n`), and a zero-variance column keeps
/// scale 1 so constant features pass through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardization {
    /// Per-feature means of the design matrix.
    pub x_mean: Array1<f64>,
    /// Per-feature scales (population standard deviation, 1 for constants).
    pub x_scale: Array1<f64>,
    /// Mean of the response; doubles as the recovered intercept.
    pub y_mean: f64,
    /// Scale of the response (population standard deviation, 1 if constant).
    pub y_scale: f64,
}

impl Standardization {
    /// Estimate standardization statistics from raw data.
    ///
    /// # Arguments
    /// * `x` - `(n, p)` design matrix with `n ≥ 1`.
    /// * `y` - Length-`n` response.
    ///
    /// # Returns
    /// * The per-column and response statistics, with zero scales replaced
    ///   by 1.
    pub(crate) fn estimate(x: &ArrayView2<f64>, y: &ArrayView1<f64>) -> Standardization {
        let n = x.nrows() as f64;

        let x_mean = x.sum_axis(Axis(0)) / n;
        let mut x_var = Array1::<f64>::zeros(x.ncols());
        for row in x.rows() {
            for (acc, (&value, &mean)) in
                x_var.iter_mut().zip(row.iter().zip(x_mean.iter()))
            {
                let centered = value - mean;
                *acc += centered * centered;
            }
        }
        let x_scale = x_var.mapv(|acc| nonzero_scale((acc / n).sqrt()));

        let y_mean = y.sum() / n;
        let y_var = y.iter().map(|&value| (value - y_mean).powi(2)).sum::<f64>() / n;
        let y_scale = nonzero_scale(y_var.sqrt());

        Standardization { x_mean, x_scale, y_mean, y_scale }
    }

    /// Map a raw design matrix into the standardized space.
    ///
    /// # Arguments
    /// * `x` - `(m, p)` matrix with the fitted feature count.
    ///
    /// # Returns
    /// * `(x - x_mean) / x_scale`, column by column.
    pub(crate) fn apply_x(&self, x: &ArrayView2<f64>) -> Array2<f64> {
        let mut standardized = x.to_owned();
        for mut row in standardized.rows_mut() {
            for (value, (&mean, &scale)) in
                row.iter_mut().zip(self.x_mean.iter().zip(self.x_scale.iter()))
            {
                *value = (*value - mean) / scale;
            }
        }
        standardized
    }

    /// Map a raw response into the standardized space.
    ///
    /// # Arguments
    /// * `y` - Response vector.
    ///
    /// # Returns
    /// * `(y - y_mean) / y_scale`.
    pub(crate) fn apply_y(&self, y: &ArrayView1<f64>) -> Array1<f64> {
        y.mapv(|value| (value - self.y_mean) / self.y_scale)
    }
}

/// Replace a zero scale by 1 so constant columns pass through unchanged.
#[inline]
fn nonzero_scale(scale: f64) -> f64 {
    if scale == 0.0 { 1.0 } else { scale }
}

/// StabilityFit — immutable result of the ensemble fit.
///
/// Fields
/// ------
/// - `config`: the [`StabilityModel`] that produced this fit.
/// - `beta_array`: `(n_split, n_clusters)` per-cluster lasso coefficients.
/// - `split_array`: `(n_split, split_size)` ascending selection indices.
/// - `clust_array`: `(n_split, n_features)` per-split cluster labels.
/// - `consensus`: length-`n_features` averaged back-projected coefficients.
/// - `standardization`: the [`Standardization`] applied before fitting.
///
/// Invariants
/// ----------
/// - All arrays are fully populated; a `StabilityFit` never represents a
///   partially completed ensemble.
/// - Everything here is read-only after construction; inference derives new
///   vectors without touching the evidence.
///
/// Notes
/// -----
/// - The consensus is a point estimate, not a selection: thresholding it
///   directly has no error control. Use the inference + selection pipeline
///   for calibrated decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityFit {
    pub(crate) config: StabilityModel,
    pub(crate) n_samples: usize,
    pub(crate) n_features: usize,
    pub(crate) n_clusters: usize,
    pub(crate) split_size: usize,
    pub(crate) beta_array: Array2<f64>,
    pub(crate) split_array: Array2<usize>,
    pub(crate) clust_array: Array2<usize>,
    pub(crate) consensus: Array1<f64>,
    pub(crate) standardization: Standardization,
}

impl StabilityFit {
    /// Configuration that produced this fit.
    pub fn config(&self) -> &StabilityModel {
        &self.config
    }

    /// Sample count of the fitted data.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Feature count of the fitted data.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Resolved cluster count used by every split.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Row count of each selection subset.
    pub fn split_size(&self) -> usize {
        self.split_size
    }

    /// Per-cluster lasso coefficients, one row per split.
    pub fn beta_array(&self) -> &Array2<f64> {
        &self.beta_array
    }

    /// Ascending selection indices, one row per split.
    pub fn split_array(&self) -> &Array2<usize> {
        &self.split_array
    }

    /// Cluster labels over all features, one row per split.
    pub fn clust_array(&self) -> &Array2<usize> {
        &self.clust_array
    }

    /// Consensus coefficients in the standardized space.
    pub fn coefficients(&self) -> &Array1<f64> {
        &self.consensus
    }

    /// Recovered intercept (the response mean before standardization).
    pub fn intercept(&self) -> f64 {
        self.standardization.y_mean
    }

    /// Standardization recorded at fit time.
    pub fn standardization(&self) -> &Standardization {
        &self.standardization
    }

    /// Predict responses for new rows in original units.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `(m, p)` matrix with the fitted feature count.
    ///
    /// Returns
    /// -------
    /// - `Ok(Array1<f64>)`: `y_mean + y_scale · (standardize(x) · consensus)`.
    ///
    /// Errors
    /// ------
    /// - [`StabilityError::FeatureCountMismatch`]: `x` has a different
    ///   column count than the fitted data.
    pub fn predict(&self, x: &ArrayView2<f64>) -> StabilityResult<Array1<f64>> {
        if x.ncols() != self.n_features {
            return Err(StabilityError::FeatureCountMismatch {
                expected: self.n_features,
                found: x.ncols(),
            });
        }
        let standardized = self.standardization.apply_x(x);
        let fitted = standardized.dot(&self.consensus);
        Ok(fitted
            .mapv(|value| self.standardization.y_mean + self.standardization.y_scale * value))
    }
}

impl StabilityModel {
    /// Fit the stability ensemble.
    ///
    /// Standardizes the data, then draws `n_split` selection subsets of
    /// `round(ratio_split · n)` rows without replacement. Each subset's
    /// features are agglomerated into the resolved cluster count under the
    /// connectivity constraint, the subset is projected onto cluster means,
    /// and an L1-penalized regression with penalty
    /// `theta · max_j |⟨x_proj_j, y_sel⟩| / n` yields sparse per-cluster
    /// coefficients. Coefficients are broadcast back to feature resolution
    /// and averaged across splits into the consensus.
    ///
    /// Parameters
    /// ----------
    /// - `x`: `(n, p)` design matrix.
    /// - `y`: length-`n` response.
    /// - `connectivity`: optional adjacency constraint over the `p`
    ///   features; `None` allows any merge.
    ///
    /// Returns
    /// -------
    /// - `Ok(StabilityFit)`: the fully populated evidence record.
    ///
    /// Errors
    /// ------
    /// - Every [`StabilityError`] raised by
    ///   [`crate::stability::validation::validate_fit_inputs`]; all are
    ///   reported before the first split is drawn.
    /// - [`StabilityError::Cluster`] / [`StabilityError::Lasso`]: a
    ///   per-split stage failed after validation (not expected for inputs
    ///   that pass the gate).
    ///
    /// Notes
    /// -----
    /// - Identical configuration and inputs reproduce bit-identical fits;
    ///   the seed drives a single `StdRng` advancing across splits.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use ndarray::{Array1, Array2};
    /// use rust_stabsel::stability::{ClusterCount, SelectionMode, StabilityModel};
    ///
    /// let x = Array2::from_shape_fn((12, 4), |(row, col)| ((row * 4 + col) % 7) as f64);
    /// let y = Array1::from_shape_fn(12, |row| row as f64);
    /// let model = StabilityModel::new(
    ///     0.5,
    ///     3,
    ///     0.5,
    ///     ClusterCount::Fixed(2),
    ///     SelectionMode::Multivariate,
    ///     9,
    /// );
    /// let fit = model.fit(&x.view(), &y.view(), None)?;
    /// assert_eq!(fit.coefficients().len(), 4);
    /// # Ok::<(), rust_stabsel::stability::StabilityError>(())
    /// ```
    pub fn fit(
        &self, x: &ArrayView2<f64>, y: &ArrayView1<f64>, connectivity: Option<&Connectivity>,
    ) -> StabilityResult<StabilityFit> {
        validate_fit_inputs(self, x, y, connectivity)?;

        let (n_samples, n_features) = x.dim();
        let n_clusters = self.cluster_count.resolve(n_features);
        let split_size = resolved_split_size(self.ratio_split, n_samples);

        let standardization = Standardization::estimate(x, y);
        let x_std = standardization.apply_x(x);
        let y_std = standardization.apply_y(y);

        let mut beta_array = Array2::<f64>::zeros((self.n_split, n_clusters));
        let mut split_array = Array2::<usize>::zeros((self.n_split, split_size));
        let mut clust_array = Array2::<usize>::zeros((self.n_split, n_features));
        let mut consensus = Array1::<f64>::zeros(n_features);

        let solver_opts = LassoOptions::default();
        let mut rng = StdRng::seed_from_u64(self.seed);

        for split_id in 0..self.n_split {
            let mut split =
                rand::seq::index::sample(&mut rng, n_samples, split_size).into_vec();
            split.sort_unstable();

            let x_sel = x_std.select(Axis(0), &split);
            let y_sel = y_std.select(Axis(0), &split);

            let labels = cluster_features(&x_sel.view(), n_clusters, connectivity)?;
            let projection = ProjectionPair::from_labels(&labels.view())?;
            let x_proj = projection.reduce(&x_sel.view());

            let correlations = x_proj.t().dot(&y_sel);
            let max_correlation =
                correlations.iter().fold(0.0_f64, |acc, &value| acc.max(value.abs()));
            let penalty = self.theta * max_correlation / n_samples as f64;

            let beta_proj = fit_lasso(&x_proj.view(), &y_sel.view(), penalty, &solver_opts)?;
            let beta = projection.broadcast(&beta_proj.view());

            let support_size = beta_proj.iter().filter(|&&coef| coef != 0.0).count();
            debug!(
                "split {}/{}: penalty = {:.4e}, support = {} of {} clusters",
                split_id + 1,
                self.n_split,
                penalty,
                support_size,
                n_clusters
            );

            beta_array.row_mut(split_id).assign(&beta_proj);
            clust_array.row_mut(split_id).assign(&labels);
            for (slot, &sample) in
                split_array.row_mut(split_id).iter_mut().zip(split.iter())
            {
                *slot = sample;
            }
            consensus += &beta;
        }

        consensus.mapv_inplace(|value| value / self.n_split as f64);
        debug!(
            "ensemble complete: {} splits, {} clusters over {} features",
            self.n_split, n_clusters, n_features
        );

        Ok(StabilityFit {
            config: *self,
            n_samples,
            n_features,
            n_clusters,
            split_size,
            beta_array,
            split_array,
            clust_array,
            consensus,
            standardization,
        })
    }
}
