//! selection::aggregation — quantile aggregation of per-split statistics.
//!
//! Purpose
//! -------
//! Collapse a matrix of per-split statistics (one row per random split, one
//! column per feature) into a single vector via the adaptive quantile rule:
//! scan the empirical γ-quantiles over γ ∈ [γ_min, 1], divide each by its
//! quantile level, and keep the smallest ratio.
//!
//! Key behaviors
//! -------------
//! - [`aggregate_pvalues`] applies the full rule: quantile scan, the
//!   `1 − ln(γ_min)` multiplicity correction, and a final clip to [0, 1] so
//!   the output is again a valid p-value vector.
//! - [`aggregate_scores`] applies only the leading step of the scan: it
//!   divides the γ_min-quantile by its level and returns that ratio raw,
//!   with no correction and no clipping, preserving the magnitude ordering
//!   that score-based ranking relies on.
//!
//! Invariants & assumptions
//! ------------------------
//! - Input matrices are shaped `(n_split, n_columns)` with `n_split ≥ 2`.
//! - `γ_min` lies strictly in (0, 1); the discard count
//!   `kmin = max(1, ⌊γ_min · n_split⌋)` then always leaves at least one
//!   order statistic.
//! - Aggregated p-values are monotone in each input entry: raising any
//!   per-split statistic never lowers the aggregate.
//!
//! Conventions
//! -----------
//! - Per-column sorting uses `f64::total_cmp`, so NaN inputs order
//!   deterministically instead of poisoning comparisons.
//! - Quantile levels are `(kmin + 1)/n_split, …, n_split/n_split`, matching
//!   one-indexed order statistics.
//!
//! Downstream usage
//! ----------------
//! - `inference::statistics` aggregates per-split p-value and score matrices
//!   before handing them to the selection procedures in [`crate::selection::fdr`].
//!
//! Testing notes
//! -------------
//! - Unit tests pin hand-computed aggregates on small matrices, the
//!   monotonicity property, the clip boundary, and every validation branch.

use ndarray::{Array1, ArrayView2};

use crate::selection::errors::{SelectionError, SelectionResult};

/// Default quantile floor for aggregation.
pub const DEFAULT_GAMMA_MIN: f64 = 0.05;

/// Aggregate per-split p-values into a single corrected p-value per column.
///
/// For each column, sorts the `n_split` p-values ascending, discards the
/// smallest `kmin = max(1, ⌊γ_min · n_split⌋)`, divides the remaining order
/// statistics by their quantile levels `(kmin + 1)/n_split, …, 1`, and keeps
/// the minimum ratio. The minimum is rescaled by `1 − ln(γ_min)` to account
/// for the adaptive choice of quantile and clipped back into [0, 1].
///
/// Parameters
/// ----------
/// - `per_split`: `(n_split, n_columns)` matrix of p-values, one row per
///   split.
/// - `gamma_min`: quantile floor, strictly in (0, 1). Use
///   [`DEFAULT_GAMMA_MIN`] unless the caller has a reason to deviate.
///
/// Returns
/// -------
/// - `Ok(Array1<f64>)`: aggregated p-values of length `n_columns`, each in
///   [0, 1].
///
/// Errors
/// ------
/// - [`SelectionError::EmptyStatistics`]: `per_split` has zero rows or zero
///   columns.
/// - [`SelectionError::InvalidGammaMin`]: `gamma_min` is outside (0, 1) or
///   NaN.
/// - [`SelectionError::TooFewSplits`]: discarding `kmin` rows leaves no
///   order statistics (only possible for a single split).
pub fn aggregate_pvalues(
    per_split: &ArrayView2<f64>,
    gamma_min: f64,
) -> SelectionResult<Array1<f64>> {
    let (n_split, kmin) = validate_aggregation(per_split, gamma_min)?;
    let correction = 1.0 - gamma_min.ln();

    let mut aggregated = Array1::<f64>::zeros(per_split.ncols());
    for (col, out) in per_split.columns().into_iter().zip(aggregated.iter_mut()) {
        let sorted = sorted_column(&col);
        let mut best = f64::INFINITY;
        for (rank, value) in sorted.iter().enumerate().skip(kmin) {
            let gamma = (rank + 1) as f64 / n_split as f64;
            let ratio = value / gamma;
            if ratio < best {
                best = ratio;
            }
        }
        *out = (best * correction).clamp(0.0, 1.0);
    }
    Ok(aggregated)
}

/// Aggregate per-split scores into a single score per column.
///
/// Applies only the leading step of the quantile scan: sorts each column
/// ascending, discards the smallest `kmin` entries, and divides the next
/// order statistic by its quantile level `(kmin + 1)/n_split`. No
/// multiplicity correction and no clipping are applied, so the output keeps
/// the raw scale of the inputs and is suitable for ranking rather than for
/// direct use as a p-value.
///
/// Parameters
/// ----------
/// - `per_split`: `(n_split, n_columns)` matrix of scores, one row per
///   split.
/// - `gamma_min`: quantile floor, strictly in (0, 1).
///
/// Returns
/// -------
/// - `Ok(Array1<f64>)`: aggregated scores of length `n_columns`, unclipped.
///
/// Errors
/// ------
/// - Same validation errors as [`aggregate_pvalues`].
pub fn aggregate_scores(
    per_split: &ArrayView2<f64>,
    gamma_min: f64,
) -> SelectionResult<Array1<f64>> {
    let (n_split, kmin) = validate_aggregation(per_split, gamma_min)?;
    let gamma = (kmin + 1) as f64 / n_split as f64;

    let mut aggregated = Array1::<f64>::zeros(per_split.ncols());
    for (col, out) in per_split.columns().into_iter().zip(aggregated.iter_mut()) {
        let sorted = sorted_column(&col);
        *out = sorted[kmin] / gamma;
    }
    Ok(aggregated)
}

/// Check aggregation inputs and derive the discard count.
///
/// # Arguments
/// * `per_split` - `(n_split, n_columns)` statistic matrix.
/// * `gamma_min` - Quantile floor.
///
/// # Returns
/// * `Ok((n_split, kmin))` when the matrix is non-empty, `gamma_min` lies in
///   (0, 1), and `kmin < n_split`.
fn validate_aggregation(
    per_split: &ArrayView2<f64>,
    gamma_min: f64,
) -> SelectionResult<(usize, usize)> {
    let n_split = per_split.nrows();
    if n_split == 0 || per_split.ncols() == 0 {
        return Err(SelectionError::EmptyStatistics);
    }
    if !(gamma_min > 0.0 && gamma_min < 1.0) {
        return Err(SelectionError::InvalidGammaMin(gamma_min));
    }
    let kmin = ((gamma_min * n_split as f64) as usize).max(1);
    if kmin >= n_split {
        return Err(SelectionError::TooFewSplits { n_split, kmin });
    }
    Ok((n_split, kmin))
}

/// Copy one column into a sorted buffer.
///
/// # Arguments
/// * `col` - Column view of per-split statistics.
///
/// # Returns
/// * Values sorted ascending under `f64::total_cmp`.
fn sorted_column(col: &ndarray::ArrayView1<f64>) -> Vec<f64> {
    let mut values: Vec<f64> = col.iter().copied().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}
