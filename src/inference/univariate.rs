//! inference::univariate — marginal significance per cluster-mean feature.
//!
//! Purpose
//! -------
//! Provide the support-agnostic inference mode: for every split, measure the
//! marginal association between the response and each cluster-mean column,
//! either with an exact Pearson-correlation t-test or with an empirical
//! permutation null, and broadcast per-cluster values back to feature
//! resolution.
//!
//! Key behaviors
//! -------------
//! - [`StabilityFit::univariate_pvalues`] tests the full-sample projected
//!   columns under the marginal strategy (held-out rows under the
//!   permutation strategy) and Bonferroni-corrects the whole matrix by the
//!   cluster count, clipped to [0, 1], after the split loop.
//! - [`StabilityFit::univariate_scores`] always works on held-out rows and
//!   applies no correction and no clip; its entries are raw per-split
//!   p-values meant for ranking, aggregated with the calibrated p-value
//!   combinator.
//! - [`UnivariateOptions`] selects the strategy; the permutation generator
//!   is seeded explicitly and advances across splits.
//!
//! Invariants & assumptions
//! ------------------------
//! - Supplied data must match the fitted shapes; both are re-standardized
//!   with the parameters recorded at fit time. Pearson statistics are
//!   invariant to that affine map; the permutation statistic is not, so the
//!   standardized space is the reference.
//! - Degenerate columns (zero variance, or fewer than 3 observations) take
//!   the sentinel p-value 1; perfectly correlated columns take 0.
//!
//! Conventions
//! -----------
//! - Rows of every output matrix are indexed by split id; columns by
//!   feature. Within one row, features sharing a cluster share a value.
//!
//! Downstream usage
//! ----------------
//! - Aggregated vectors feed `selection::select_model_fwer` and the FDR
//!   procedures; the facade dispatches here when the configuration says
//!   `SelectionMode::Univariate`.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the Pearson tail against a closed form, the Bonferroni
//!   and clip step, the held-out/no-correction score contract, permutation
//!   determinism, and the zero-draw rejection.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::clustering::ProjectionPair;
use crate::inference::errors::InferenceResult;
use crate::inference::statistics::{AggregationRule, SplitStatistics, held_out_rows};
use crate::inference::validation::{validate_inference_inputs, validate_univariate_options};
use crate::stability::StabilityFit;

/// Default number of permutation draws, matching the reference analysis.
pub const DEFAULT_PERMUTATIONS: usize = 10_000;

/// How a univariate statistic is computed for each cluster-mean column.
///
/// `Marginal` is the exact Pearson t-test; `Permutation` builds an empirical
/// null by shuffling held-out responses `n_perm` times with a generator
/// seeded from `seed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnivariateStrategy {
    Marginal,
    Permutation { n_perm: usize, seed: u64 },
}

/// UnivariateOptions — strategy selection for univariate inference.
///
/// Purpose
/// -------
/// Carry the statistic choice through the univariate entry points so the
/// facade can thread user configuration down to the split loop in one
/// value.
///
/// Fields
/// ------
/// - `strategy`: [`UnivariateStrategy`]
///   The statistic applied per cluster-mean column.
///
/// Invariants
/// ----------
/// - A permutation strategy must carry `n_perm ≥ 1`; the entry points
///   reject zero draws.
///
/// Notes
/// -----
/// - `Default` selects the marginal Pearson test, the reference behavior.
/// - One generator is seeded per call and advances across splits, so a
///   fixed seed reproduces the full matrix, not each row independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnivariateOptions {
    /// Statistic applied per cluster-mean column.
    pub strategy: UnivariateStrategy,
}

impl UnivariateOptions {
    /// Construct options from an explicit strategy.
    ///
    /// Parameters
    /// ----------
    /// - `strategy`: [`UnivariateStrategy`]
    ///   Marginal Pearson test or seeded permutation null.
    ///
    /// Returns
    /// -------
    /// `UnivariateOptions`
    ///   The configuration value; validation happens at the entry points.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use rust_stabsel::inference::{UnivariateOptions, UnivariateStrategy};
    ///
    /// let marginal = UnivariateOptions::default();
    /// let permuted = UnivariateOptions::new(UnivariateStrategy::Permutation {
    ///     n_perm: 500,
    ///     seed: 42,
    /// });
    /// assert_eq!(marginal.strategy, UnivariateStrategy::Marginal);
    /// assert_ne!(marginal, permuted);
    /// ```
    pub fn new(strategy: UnivariateStrategy) -> UnivariateOptions {
        UnivariateOptions { strategy }
    }
}

impl Default for UnivariateOptions {
    fn default() -> UnivariateOptions {
        UnivariateOptions { strategy: UnivariateStrategy::Marginal }
    }
}

impl StabilityFit {
    /// univariate_pvalues — Bonferroni-corrected marginal p-values.
    ///
    /// Purpose
    /// -------
    /// For each split, compute one p-value per cluster-mean column — the
    /// Pearson tail over the full standardized sample under
    /// [`UnivariateStrategy::Marginal`], or the empirical permutation tail
    /// over held-out rows under [`UnivariateStrategy::Permutation`] — and
    /// broadcast to feature resolution. After the loop the whole matrix is
    /// multiplied by the cluster count and clipped to [0, 1].
    ///
    /// Parameters
    /// ----------
    /// - `x`: `&ArrayView2<f64>`
    ///   Design matrix with the fitted shape `(n, p)`.
    /// - `y`: `&ArrayView1<f64>`
    ///   Length-`n` response.
    /// - `options`: `&UnivariateOptions`
    ///   Statistic selection.
    ///
    /// Returns
    /// -------
    /// `InferenceResult<SplitStatistics>`
    ///   The n_split×p corrected p-value matrix and its aggregated vector.
    ///
    /// Errors
    /// ------
    /// - Shape and finiteness violations as in
    ///   [`StabilityFit::multivariate_pvalues`].
    /// - `ZeroPermutations` when the permutation strategy has no draws.
    ///
    /// Notes
    /// -----
    /// - Under the marginal strategy the split only enters through its
    ///   cluster labels; identical labellings produce identical rows.
    pub fn univariate_pvalues(
        &self, x: &ArrayView2<f64>, y: &ArrayView1<f64>, options: &UnivariateOptions,
    ) -> InferenceResult<SplitStatistics> {
        validate_inference_inputs(self, x, y)?;
        validate_univariate_options(options)?;
        let x_std = self.standardization().apply_x(x);
        let y_std = self.standardization().apply_y(y);

        let n_split = self.config().n_split;
        let mut rng = permutation_rng(options);
        let mut per_split = Array2::<f64>::zeros((n_split, self.n_features()));
        for split_id in 0..n_split {
            let labels = self.clust_array().row(split_id);
            let pair = ProjectionPair::from_labels(&labels)?;
            let per_cluster = match options.strategy {
                UnivariateStrategy::Marginal => {
                    let x_proj = pair.reduce(&x_std.view());
                    marginal_pvalues(&y_std.view(), &x_proj.view())
                }
                UnivariateStrategy::Permutation { n_perm, .. } => {
                    let held =
                        held_out_rows(&self.split_array().row(split_id), self.n_samples());
                    let y_held = y_std.select(Axis(0), &held);
                    let x_held_proj = pair.reduce(&x_std.select(Axis(0), &held).view());
                    permutation_pvalues(
                        &y_held.view(),
                        &x_held_proj.view(),
                        n_perm,
                        rng.as_mut().expect("permutation strategy seeds a generator"),
                    )
                }
            };
            per_split
                .row_mut(split_id)
                .assign(&pair.broadcast(&per_cluster.view()));
        }

        let bonferroni = self.n_clusters() as f64;
        per_split.mapv_inplace(|value| (value * bonferroni).clamp(0.0, 1.0));
        SplitStatistics::from_rows(per_split, AggregationRule::PValue)
    }

    /// univariate_scores — uncorrected held-out marginal p-values.
    ///
    /// Same statistics as [`StabilityFit::univariate_pvalues`] but always
    /// restricted to each split's held-out rows, with no Bonferroni factor
    /// and no clip; the raw per-split p-values are aggregated with the
    /// calibrated p-value combinator and serve as ranking scores.
    ///
    /// Errors mirror [`StabilityFit::univariate_pvalues`].
    pub fn univariate_scores(
        &self, x: &ArrayView2<f64>, y: &ArrayView1<f64>, options: &UnivariateOptions,
    ) -> InferenceResult<SplitStatistics> {
        validate_inference_inputs(self, x, y)?;
        validate_univariate_options(options)?;
        let x_std = self.standardization().apply_x(x);
        let y_std = self.standardization().apply_y(y);

        let n_split = self.config().n_split;
        let mut rng = permutation_rng(options);
        let mut per_split = Array2::<f64>::zeros((n_split, self.n_features()));
        for split_id in 0..n_split {
            let labels = self.clust_array().row(split_id);
            let pair = ProjectionPair::from_labels(&labels)?;
            let held = held_out_rows(&self.split_array().row(split_id), self.n_samples());
            let y_held = y_std.select(Axis(0), &held);
            let x_held_proj = pair.reduce(&x_std.select(Axis(0), &held).view());
            let per_cluster = match options.strategy {
                UnivariateStrategy::Marginal => {
                    marginal_pvalues(&y_held.view(), &x_held_proj.view())
                }
                UnivariateStrategy::Permutation { n_perm, .. } => permutation_pvalues(
                    &y_held.view(),
                    &x_held_proj.view(),
                    n_perm,
                    rng.as_mut().expect("permutation strategy seeds a generator"),
                ),
            };
            per_split
                .row_mut(split_id)
                .assign(&pair.broadcast(&per_cluster.view()));
        }
        SplitStatistics::from_rows(per_split, AggregationRule::PValue)
    }
}

/// Generator for the permutation strategy, `None` under the marginal one.
fn permutation_rng(options: &UnivariateOptions) -> Option<StdRng> {
    match options.strategy {
        UnivariateStrategy::Permutation { seed, .. } => {
            Some(StdRng::seed_from_u64(seed))
        }
        UnivariateStrategy::Marginal => None,
    }
}

/// One Pearson p-value per column of `x_proj` against `y`.
fn marginal_pvalues(y: &ArrayView1<f64>, x_proj: &ArrayView2<f64>) -> Array1<f64> {
    Array1::from_iter(
        x_proj.columns().into_iter().map(|column| pearson_pvalue(y, &column)),
    )
}

/// Empirical two-sided permutation p-values per column.
///
/// # Arguments
/// * `y_held` - Held-out responses.
/// * `x_held_proj` - Held-out cluster-mean columns (m×k).
/// * `n_perm` - Number of shuffles; the caller rejects 0.
/// * `rng` - Seeded generator advancing across splits.
///
/// # Returns
/// * Per column, the fraction of shuffles whose absolute inner product with
///   the response strictly exceeds the observed one.
fn permutation_pvalues(
    y_held: &ArrayView1<f64>, x_held_proj: &ArrayView2<f64>, n_perm: usize,
    rng: &mut StdRng,
) -> Array1<f64> {
    let n_rows = y_held.len();
    let n_clusters = x_held_proj.ncols();
    let corr_true = x_held_proj.t().dot(y_held).mapv(f64::abs);

    let mut order: Vec<usize> = (0..n_rows).collect();
    let mut y_aligned = Array1::<f64>::zeros(n_rows);
    let mut exceed = vec![0usize; n_clusters];
    for _ in 0..n_perm {
        order.shuffle(rng);
        for (position, &row) in order.iter().enumerate() {
            y_aligned[row] = y_held[position];
        }
        let corr_perm = x_held_proj.t().dot(&y_aligned);
        for (cluster, &value) in corr_perm.iter().enumerate() {
            if corr_true[cluster] < value.abs() {
                exceed[cluster] += 1;
            }
        }
    }
    Array1::from_iter(
        exceed.into_iter().map(|count| count as f64 / n_perm as f64),
    )
}

/// Two-sided Pearson-correlation p-value via the exact t-transform.
///
/// # Arguments
/// * `y` - Response column.
/// * `x` - Feature column of the same length.
///
/// # Returns
/// * `2·(1 − F_t(|t|))` with `t = r·√(df/(1−r²))` on `df = n − 2`; the
///   sentinel 1 when either column is constant or `n < 3`, and 0 when the
///   correlation is exactly ±1.
fn pearson_pvalue(y: &ArrayView1<f64>, x: &ArrayView1<f64>) -> f64 {
    let n = y.len();
    if n < 3 {
        return 1.0;
    }
    let mean_y = y.sum() / n as f64;
    let mean_x = x.sum() / n as f64;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&x_value, &y_value) in x.iter().zip(y.iter()) {
        let dx = x_value - mean_x;
        let dy = y_value - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return 1.0;
    }
    let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
    if r.abs() == 1.0 {
        return 0.0;
    }
    let dof = (n - 2) as f64;
    let t_stat = r * (dof / (1.0 - r * r)).sqrt();
    let dist = match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => dist,
        Err(_) => return 1.0,
    };
    2.0 * (1.0 - dist.cdf(t_stat.abs()))
}
