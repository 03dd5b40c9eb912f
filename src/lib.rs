//! rust_stabsel — stability selection with spatial clustering and Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the stability-selection pipeline to Python via the `_rust_stabsel` extension
//! module. When the `python-bindings` feature is enabled, this module defines
//! the Python-facing `StabilityLasso` class and the module-level selection
//! helpers used by the `rust_stabsel` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`clustering`, `inference`, `lasso`,
//!   `selection`, and `stability`) as the public crate surface.
//! - Define the `#[pyclass]` wrapper and the `#[pymodule]` initializer for the
//!   `_rust_stabsel` Python extension.
//! - Expose `select_model_fdr`, `select_model_fdr_bounds`, and
//!   `select_model_fwer_bounds` as free Python functions operating on plain
//!   p-value vectors.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is implemented in the inner Rust modules; this
//!   file performs only FFI glue, input conversion, and error mapping.
//! - When `python-bindings` is enabled, the Python-visible class mirrors the
//!   invariants of its Rust counterparts (`StabilityModel`, `StabilityFit`).
//! - On successful conversion from Python objects to Rust arrays, the
//!   invariants documented in the core modules are assumed to hold.
//!
//! Conventions
//! -----------
//! - The Python-exposed class lives under `_rust_stabsel` and is typically
//!   wrapped by a thin pure-Python facade in the top-level `rust_stabsel`
//!   package.
//! - Indexing and statistical conventions follow the documentation of the
//!   underlying Rust modules (`stability`, `inference`, `selection`).
//! - Errors from core Rust code are propagated as rich error types internally
//!   and converted to `PyErr` values at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should usually depend directly on the inner modules and
//!   can ignore the PyO3 items guarded by the `python-bindings` feature.
//! - The Python packaging layer imports the `_rust_stabsel` module defined
//!   here and wraps its class in a user-facing Python API.
//! - External users are expected to interact with either the safe Rust APIs or
//!   the pure-Python wrapper; the PyO3 plumbing is considered internal.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in the inner modules and
//!   by the integration suite under `tests/`, which exercises the full
//!   fit → inference → aggregation → selection pipeline through the Rust API.
//! - Smoke tests for the PyO3 bindings verify that the class can be
//!   constructed, fitted, and queried from Python.

pub mod clustering;
pub mod inference;
pub mod lasso;
pub mod selection;
pub mod stability;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::{DEFAULT_PERMUTATIONS, UnivariateOptions, UnivariateStrategy},
    stability::{StabilityFit, StabilityModel},
    utils::{
        extract_connectivity, extract_f64_matrix, extract_f64_vector,
        parse_cluster_count, parse_selection_mode,
    },
};

/// StabilityLasso — Python-facing wrapper for the stability-selection pipeline.
///
/// Purpose
/// -------
/// Expose the [`StabilityModel`] / [`StabilityFit`] API to Python callers in
/// the shape of a single estimator object with scikit-learn flavored
/// conventions (`fit`, `predict`, `coef_`, `intercept_`).
///
/// Key behaviors
/// -------------
/// - Build an immutable [`StabilityModel`] from Python-friendly arguments,
///   including the string cluster-count specifiers `'auto'` and `'0.1'`.
/// - Provide `fit` plus the four split-inference methods, caching the most
///   recent aggregated p-values and scores for the selection methods.
/// - Expose FDR and FWER selection on the cached vectors, and model
///   coefficients, intercept, and predictions via properties and `predict`.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `StabilityLasso(theta, n_split=100, ratio_split=0.5, n_clusters='0.1',
/// model_selection='multivariate', random_state=1)`:
/// - `theta`: `f64`
///   Penalty factor in `λ = theta · max_j |⟨x_proj_j, y_sel⟩| / n`.
/// - `n_split`: `usize`
///   Number of random subsamples.
/// - `ratio_split`: `f64`
///   Relative size of each selection subset.
/// - `n_clusters`: `int | str | None`
///   Cluster specifier: an int, a float string like `'0.1'` (fraction of
///   features), or `'auto'` (one cluster per feature). `None` means `'0.1'`.
/// - `model_selection`: `str`
///   `'multivariate'` or `'univariate'`.
/// - `random_state`: `u64`
///   Seed for the subsampling generator.
///
/// Fields
/// ------
/// - `model`: [`StabilityModel`]
///   Immutable configuration shared by every fit.
/// - `fitted`: `Option<StabilityFit>`
///   Evidence record of the most recent `fit` call.
/// - `pvalues_aggregated` / `scores_aggregated`: `Option<Array1<f64>>`
///   Cached aggregated vectors from the most recent inference calls and the
///   inputs of the selection methods.
///
/// Invariants
/// ----------
/// - `fitted` is `Some` exactly after a successful `fit`; inference and
///   selection methods raise `ValueError` before that.
/// - Re-fitting clears both cached vectors.
///
/// Performance
/// -----------
/// - All numerical work happens in the core modules; this wrapper only
///   converts arrays at the boundary (one copy per input).
///
/// Notes
/// -----
/// - Native Rust callers should use [`StabilityModel`] and [`StabilityFit`]
///   directly; this type exists solely for the PyO3 binding surface.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_stabsel")]
pub struct StabilityLasso {
    /// Immutable ensemble configuration.
    model: StabilityModel,
    /// Evidence record of the most recent fit.
    fitted: Option<StabilityFit>,
    /// Aggregated p-values from the most recent `*_split_pval` call.
    pvalues_aggregated: Option<Array1<f64>>,
    /// Aggregated scores from the most recent `*_split_scores` call.
    scores_aggregated: Option<Array1<f64>>,
}

#[cfg(feature = "python-bindings")]
impl StabilityLasso {
    fn require_fitted(&self) -> PyResult<&StabilityFit> {
        self.fitted
            .as_ref()
            .ok_or_else(|| PyValueError::new_err("model must be fitted before inference"))
    }

    fn require_pvalues(&self) -> PyResult<&Array1<f64>> {
        self.pvalues_aggregated.as_ref().ok_or_else(|| {
            PyValueError::new_err(
                "no aggregated p-values cached; run multivariate_split_pval or \
                 univariate_split_pval first",
            )
        })
    }

    fn require_scores(&self) -> PyResult<&Array1<f64>> {
        self.scores_aggregated.as_ref().ok_or_else(|| {
            PyValueError::new_err(
                "no aggregated scores cached; run multivariate_split_scores or \
                 univariate_split_scores first",
            )
        })
    }

    fn univariate_options(
        permute: bool, n_perm: Option<usize>, perm_seed: u64,
    ) -> UnivariateOptions {
        if permute {
            UnivariateOptions::new(UnivariateStrategy::Permutation {
                n_perm: n_perm.unwrap_or(DEFAULT_PERMUTATIONS),
                seed: perm_seed,
            })
        } else {
            UnivariateOptions::default()
        }
    }
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl StabilityLasso {
    /// Stability-selection estimator over randomized splits and cluster means.
    #[new]
    #[pyo3(
        signature = (
            theta,
            n_split = 100,
            ratio_split = 0.5,
            n_clusters = None,
            model_selection = "multivariate",
            random_state = 1,
        ),
        text_signature = "(theta, /, n_split=100, ratio_split=0.5, n_clusters='0.1', \
                          model_selection='multivariate', random_state=1)"
    )]
    pub fn new<'py>(
        theta: f64, n_split: usize, ratio_split: f64, n_clusters: Option<&Bound<'py, PyAny>>,
        model_selection: &str, random_state: u64,
    ) -> PyResult<StabilityLasso> {
        let cluster_count = parse_cluster_count(n_clusters)?;
        let mode = parse_selection_mode(model_selection)?;
        let model = StabilityModel::new(
            theta,
            n_split,
            ratio_split,
            cluster_count,
            mode,
            random_state,
        );
        Ok(StabilityLasso {
            model,
            fitted: None,
            pvalues_aggregated: None,
            scores_aggregated: None,
        })
    }

    #[pyo3(
        signature = (x, y, connectivity = None),
        text_signature = "(self, X, y, /, connectivity=None)"
    )]
    pub fn fit<'py>(
        &mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
        connectivity: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<()> {
        let x_arr = extract_f64_matrix(x, "X")?;
        let y_arr = extract_f64_vector(y, "y")?;
        let connectivity = extract_connectivity(connectivity)?;

        let fitted = self.model.fit(&x_arr.view(), &y_arr.view(), connectivity.as_ref())?;
        self.fitted = Some(fitted);
        self.pvalues_aggregated = None;
        self.scores_aggregated = None;
        Ok(())
    }

    #[pyo3(text_signature = "(self, X, y, /)")]
    pub fn multivariate_split_pval<'py>(
        &mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let x_arr = extract_f64_matrix(x, "X")?;
        let y_arr = extract_f64_vector(y, "y")?;
        let stats = self.require_fitted()?.multivariate_pvalues(&x_arr.view(), &y_arr.view())?;
        let (_, aggregated) = stats.into_parts();
        let result = aggregated.to_vec();
        self.pvalues_aggregated = Some(aggregated);
        Ok(result)
    }

    #[pyo3(text_signature = "(self, X, y, /)")]
    pub fn multivariate_split_scores<'py>(
        &mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let x_arr = extract_f64_matrix(x, "X")?;
        let y_arr = extract_f64_vector(y, "y")?;
        let stats = self.require_fitted()?.multivariate_scores(&x_arr.view(), &y_arr.view())?;
        let (_, aggregated) = stats.into_parts();
        let result = aggregated.to_vec();
        self.scores_aggregated = Some(aggregated);
        Ok(result)
    }

    #[pyo3(
        signature = (x, y, permute = false, n_perm = None, perm_seed = 0),
        text_signature = "(self, X, y, /, permute=False, n_perm=10000, perm_seed=0)"
    )]
    pub fn univariate_split_pval<'py>(
        &mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>, permute: bool,
        n_perm: Option<usize>, perm_seed: u64,
    ) -> PyResult<Vec<f64>> {
        let x_arr = extract_f64_matrix(x, "X")?;
        let y_arr = extract_f64_vector(y, "y")?;
        let options = StabilityLasso::univariate_options(permute, n_perm, perm_seed);
        let stats = self
            .require_fitted()?
            .univariate_pvalues(&x_arr.view(), &y_arr.view(), &options)?;
        let (_, aggregated) = stats.into_parts();
        let result = aggregated.to_vec();
        self.pvalues_aggregated = Some(aggregated);
        Ok(result)
    }

    #[pyo3(
        signature = (x, y, permute = false, n_perm = None, perm_seed = 0),
        text_signature = "(self, X, y, /, permute=False, n_perm=10000, perm_seed=0)"
    )]
    pub fn univariate_split_scores<'py>(
        &mut self, x: &Bound<'py, PyAny>, y: &Bound<'py, PyAny>, permute: bool,
        n_perm: Option<usize>, perm_seed: u64,
    ) -> PyResult<Vec<f64>> {
        let x_arr = extract_f64_matrix(x, "X")?;
        let y_arr = extract_f64_vector(y, "y")?;
        let options = StabilityLasso::univariate_options(permute, n_perm, perm_seed);
        let stats = self
            .require_fitted()?
            .univariate_scores(&x_arr.view(), &y_arr.view(), &options)?;
        let (_, aggregated) = stats.into_parts();
        let result = aggregated.to_vec();
        self.scores_aggregated = Some(aggregated);
        Ok(result)
    }

    /// Bonferroni-corrected family-wise selection on the cached p-values.
    #[pyo3(text_signature = "(self, alpha, /)")]
    pub fn select_model_fwer(&self, alpha: f64) -> PyResult<Vec<bool>> {
        let pvalues = self.require_pvalues()?;
        Ok(selection::select_model_fwer(&pvalues.view(), alpha)?)
    }

    /// Benjamini–Hochberg selection on the cached aggregated p-values.
    #[pyo3(signature = (q, normalize = true), text_signature = "(self, q, /, normalize=True)")]
    pub fn select_model_fdr(&self, q: f64, normalize: bool) -> PyResult<Vec<bool>> {
        let pvalues = self.require_pvalues()?;
        Ok(selection::select_model_fdr(&pvalues.view(), q, false, normalize)?)
    }

    /// Benjamini–Hochberg selection on the cached aggregated scores.
    #[pyo3(signature = (q, normalize = true), text_signature = "(self, q, /, normalize=True)")]
    pub fn select_model_fdr_scores(&self, q: f64, normalize: bool) -> PyResult<Vec<bool>> {
        let scores = self.require_scores()?;
        Ok(selection::select_model_fdr(&scores.view(), q, false, normalize)?)
    }

    /// Per-feature critical FDR levels for the cached aggregated scores.
    #[pyo3(signature = (normalize = false), text_signature = "(self, /, normalize=False)")]
    pub fn select_model_fdr_bounds_scores(&self, normalize: bool) -> PyResult<Vec<f64>> {
        let scores = self.require_scores()?;
        let bounds = selection::select_model_fdr_bounds(&scores.view(), false, normalize)?;
        Ok(bounds.to_vec())
    }

    #[getter]
    pub fn coef_(&self) -> PyResult<Vec<f64>> {
        Ok(self.require_fitted()?.coefficients().to_vec())
    }

    #[getter]
    pub fn intercept_(&self) -> PyResult<f64> {
        Ok(self.require_fitted()?.intercept())
    }

    #[getter]
    pub fn n_clusters_(&self) -> PyResult<usize> {
        Ok(self.require_fitted()?.n_clusters())
    }

    #[pyo3(text_signature = "(self, X, /)")]
    pub fn predict<'py>(&self, x: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
        let x_arr = extract_f64_matrix(x, "X")?;
        let predicted = self.require_fitted()?.predict(&x_arr.view())?;
        Ok(predicted.to_vec())
    }
}

/// Benjamini–Hochberg selection over a plain p-value vector.
///
/// Parameters
/// ----------
/// - `pvalues`: 1-D array-like of p-values.
/// - `q`: target false-discovery rate.
/// - `independent`: skip the Benjamini–Yekutieli `ln(p)` deflation.
/// - `normalize`: additionally deflate the target by `p`; intended for
///   aggregated p-value vectors.
///
/// Returns
/// -------
/// A boolean list, `True` for selected features.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (pvalues, q, independent = false, normalize = false),
    text_signature = "(pvalues, q, /, independent=False, normalize=False)"
)]
pub fn select_model_fdr<'py>(
    pvalues: &Bound<'py, PyAny>, q: f64, independent: bool, normalize: bool,
) -> PyResult<Vec<bool>> {
    let pvalues = extract_f64_vector(pvalues, "pvalues")?;
    Ok(selection::select_model_fdr(&pvalues.view(), q, independent, normalize)?)
}

/// Per-feature critical levels dual to `select_model_fdr`.
///
/// Feature `i` is selected at level `q` exactly when the returned bound is
/// at most `q` (up to the clip to [0, 1]).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (pvalues, independent = false, normalize = true),
    text_signature = "(pvalues, /, independent=False, normalize=True)"
)]
pub fn select_model_fdr_bounds<'py>(
    pvalues: &Bound<'py, PyAny>, independent: bool, normalize: bool,
) -> PyResult<Vec<f64>> {
    let pvalues = extract_f64_vector(pvalues, "pvalues")?;
    let bounds = selection::select_model_fdr_bounds(&pvalues.view(), independent, normalize)?;
    Ok(bounds.to_vec())
}

/// Bonferroni bounds: `pvalues · p` clipped to [0, 1].
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(pvalues, /)")]
pub fn select_model_fwer_bounds<'py>(pvalues: &Bound<'py, PyAny>) -> PyResult<Vec<f64>> {
    let pvalues = extract_f64_vector(pvalues, "pvalues")?;
    let bounds = selection::select_model_fwer_bounds(&pvalues.view())?;
    Ok(bounds.to_vec())
}

/// _rust_stabsel — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_rust_stabsel` Python module consumed by the public
/// `rust_stabsel` package.
///
/// Key behaviors
/// -------------
/// - Register the `StabilityLasso` class.
/// - Register the module-level selection helpers (`select_model_fdr`,
///   `select_model_fdr_bounds`, `select_model_fwer_bounds`).
///
/// Parameters
/// ----------
/// - `m`: `&Bound<PyModule>`
///   Module object representing `_rust_stabsel`.
///
/// Returns
/// -------
/// `PyResult<()>`
///   `Ok(())` on success, or a Python exception if registration fails.
///
/// Notes
/// -----
/// - This function is invoked automatically by Python when importing the
///   compiled extension; it is not called directly by user code.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_stabsel<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<StabilityLasso>()?;
    m.add_function(wrap_pyfunction!(select_model_fdr, m)?)?;
    m.add_function(wrap_pyfunction!(select_model_fdr_bounds, m)?)?;
    m.add_function(wrap_pyfunction!(select_model_fwer_bounds, m)?)?;
    Ok(())
}
