//! stability::config — immutable configuration for the stability ensemble.
//!
//! Purpose
//! -------
//! Define the hyperparameter record that drives the ensemble fit: penalty
//! scale, split schedule, cluster-count specifier, inference mode, and RNG
//! seed. The record is inert — construction never fails, and every
//! constraint is enforced once at `fit()` entry by
//! [`crate::stability::validation`].
//!
//! Key behaviors
//! -------------
//! - [`ClusterCount`] expresses the cluster-count specifier as a tagged
//!   variant (absolute count, proportion of the feature count, or no
//!   reduction) and resolves it to a concrete count per data set.
//! - [`SelectionMode`] names the inference variant a facade should dispatch
//!   to after fitting.
//! - [`StabilityModel`] bundles the hyperparameters and exposes `fit()`
//!   (implemented in [`crate::stability::model`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - A `StabilityModel` is immutable after construction; refitting with
//!   different settings means building a new record.
//! - `ClusterCount::resolve` is a pure function of the feature count; the
//!   ensemble resolves it exactly once per `fit()`.
//!
//! Conventions
//! -----------
//! - Proportional resolution truncates (`⌊proportion · p⌋`), so requesting
//!   a tenth of 25 features yields 2 clusters, not 3.
//!
//! Downstream usage
//! ----------------
//! - `StabilityModel::fit` consumes the record; the Python facade parses
//!   its string-typed `n_clusters` / `model_selection` arguments into
//!   [`ClusterCount`] / [`SelectionMode`] before constructing one.
//!
//! Testing notes
//! -------------
//! - Unit tests pin the resolution rules and the documented defaults.

/// Cluster-count specifier for the per-split feature agglomeration.
///
/// Fields
/// ------
/// - `Fixed(count)`: use exactly `count` clusters.
/// - `Proportional(proportion)`: use `⌊proportion · p⌋` clusters for a
///   data set with `p` features.
/// - `Auto`: one cluster per feature (no dimensionality reduction).
///
/// Notes
/// -----
/// - Resolution does not validate; `fit()` rejects resolved counts of 0 or
///   above the feature count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClusterCount {
    Fixed(usize),
    Proportional(f64),
    Auto,
}

impl ClusterCount {
    /// Resolve the specifier to a concrete cluster count.
    ///
    /// Parameters
    /// ----------
    /// - `n_features`: number of feature columns `p` in the design matrix.
    ///
    /// Returns
    /// -------
    /// `usize`
    ///   The resolved count: `count` for `Fixed`, `⌊proportion · p⌋` for
    ///   `Proportional`, and `p` for `Auto`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use rust_stabsel::stability::ClusterCount;
    ///
    /// assert_eq!(ClusterCount::Fixed(7).resolve(50), 7);
    /// assert_eq!(ClusterCount::Proportional(0.1).resolve(25), 2);
    /// assert_eq!(ClusterCount::Auto.resolve(50), 50);
    /// ```
    pub fn resolve(&self, n_features: usize) -> usize {
        match self {
            ClusterCount::Fixed(count) => *count,
            ClusterCount::Proportional(proportion) => {
                (proportion * n_features as f64) as usize
            }
            ClusterCount::Auto => n_features,
        }
    }
}

/// Inference variant a fitted model dispatches to.
///
/// `Multivariate` refits a support-restricted OLS model on the held-out
/// rows of each split; `Univariate` computes marginal correlation
/// significance per cluster feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Multivariate,
    Univariate,
}

/// StabilityModel — immutable hyperparameters of the stability ensemble.
///
/// Fields
/// ------
/// - `theta`: `f64`
///   Scale of the data-dependent L1 penalty; each split uses
///   `λ = theta · max_j |⟨x_proj_j, y_sel⟩| / n`.
/// - `n_split`: `usize`
///   Number of random selection subsets to draw.
/// - `ratio_split`: `f64`
///   Fraction of samples in each selection subset; the complement is held
///   out for inference.
/// - `cluster_count`: [`ClusterCount`]
///   Cluster-count specifier, resolved once per `fit()`.
/// - `mode`: [`SelectionMode`]
///   Inference variant a facade dispatches to after fitting.
/// - `seed`: `u64`
///   Seed of the single RNG advancing across splits.
///
/// Invariants
/// ----------
/// - `fit()` validates every field before drawing the first split; an
///   invalid record never produces a partially fitted result.
/// - Identical records and inputs reproduce bit-identical fits.
///
/// Performance
/// -----------
/// - This type is a small, cheap-to-copy configuration struct intended to
///   be passed by reference where possible.
///
/// Notes
/// -----
/// - `with_defaults` mirrors the conventional settings: 100 splits, ratio
///   0.5, a tenth of the features as clusters, multivariate inference,
///   seed 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilityModel {
    /// Scale of the data-dependent L1 penalty.
    pub theta: f64,
    /// Number of random selection subsets.
    pub n_split: usize,
    /// Fraction of samples in each selection subset.
    pub ratio_split: f64,
    /// Cluster-count specifier.
    pub cluster_count: ClusterCount,
    /// Inference variant for facade dispatch.
    pub mode: SelectionMode,
    /// Seed of the split-drawing RNG.
    pub seed: u64,
}

impl StabilityModel {
    /// Construct a `StabilityModel` from explicit settings.
    ///
    /// Parameters
    /// ----------
    /// - `theta`: `f64`
    ///   Penalty scale; must be finite and > 0 at `fit()` time.
    /// - `n_split`: `usize`
    ///   Number of splits; must be ≥ 1 at `fit()` time.
    /// - `ratio_split`: `f64`
    ///   Selection-subset fraction; must lie in (0, 1) at `fit()` time.
    /// - `cluster_count`: [`ClusterCount`]
    ///   Cluster-count specifier.
    /// - `mode`: [`SelectionMode`]
    ///   Inference variant for facade dispatch.
    /// - `seed`: `u64`
    ///   RNG seed.
    ///
    /// Returns
    /// -------
    /// `StabilityModel`
    ///   An immutable configuration record.
    ///
    /// Errors
    /// ------
    /// - `None`
    ///   Construction never fails; `fit()` owns validation.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use rust_stabsel::stability::{ClusterCount, SelectionMode, StabilityModel};
    ///
    /// let model = StabilityModel::new(
    ///     0.1,
    ///     10,
    ///     0.5,
    ///     ClusterCount::Fixed(25),
    ///     SelectionMode::Multivariate,
    ///     42,
    /// );
    /// assert_eq!(model.n_split, 10);
    /// ```
    pub fn new(
        theta: f64, n_split: usize, ratio_split: f64, cluster_count: ClusterCount,
        mode: SelectionMode, seed: u64,
    ) -> StabilityModel {
        StabilityModel { theta, n_split, ratio_split, cluster_count, mode, seed }
    }

    /// Construct a `StabilityModel` with the conventional defaults.
    ///
    /// Parameters
    /// ----------
    /// - `theta`: `f64`
    ///   Penalty scale; the one hyperparameter without a conventional
    ///   default.
    ///
    /// Returns
    /// -------
    /// `StabilityModel`
    ///   A configuration with `n_split = 100`, `ratio_split = 0.5`,
    ///   `cluster_count = Proportional(0.1)`,
    ///   `mode = Multivariate`, and `seed = 1`.
    ///
    /// Errors
    /// ------
    /// - `None`
    ///   Construction never fails; `fit()` owns validation.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use rust_stabsel::stability::{ClusterCount, StabilityModel};
    ///
    /// let model = StabilityModel::with_defaults(0.2);
    /// assert_eq!(model.n_split, 100);
    /// assert_eq!(model.cluster_count, ClusterCount::Proportional(0.1));
    /// ```
    pub fn with_defaults(theta: f64) -> StabilityModel {
        StabilityModel::new(
            theta,
            100,
            0.5,
            ClusterCount::Proportional(0.1),
            SelectionMode::Multivariate,
            1,
        )
    }
}
