//! selection::fdr — step-up FDR selection and Bonferroni FWER control.
//!
//! Purpose
//! -------
//! Turn an aggregated p-value vector and a target error level into a boolean
//! selection mask, or into per-feature critical bounds that encode, for each
//! feature, the smallest level at which it would be selected.
//!
//! Key behaviors
//! -------------
//! - [`select_model_fdr`] runs the Benjamini–Hochberg step-up scan with two
//!   optional deflations of the target: divide by `ln(p)` when the tests are
//!   not independent (Benjamini–Yekutieli) and divide by `p` when the input
//!   is an aggregated p-value vector.
//! - [`select_model_fdr_bounds`] inverts the scan: per feature, the minimal
//!   level at which the step-up procedure would admit it, rescaled by the
//!   matching `×p` / `×ln(p)` factors and clipped to [0, 1].
//! - [`select_model_fwer`] / [`select_model_fwer_bounds`] apply the plain
//!   Bonferroni rule (strict `p_i < α/p` mask; `p_i · p` bounds).
//!
//! Invariants & assumptions
//! ------------------------
//! - Mask/bounds duality: for every q in (0, 1),
//!   `select_model_fdr(p, q, ind, norm)[i]` ⇔
//!   `select_model_fdr_bounds(p, ind, norm)[i] ≤ q`.
//! - Selections are nested in the level: raising q (or α) never drops a
//!   previously selected feature.
//! - An empty selection is a valid outcome, not an error; all-false masks
//!   flow through downstream consumers unchanged.
//!
//! Conventions
//! -----------
//! - Ranks are 1-indexed; sorting uses `f64::total_cmp`.
//! - The step-up bound is the raw sorted p-value at the last qualifying
//!   rank, so tied p-values are always admitted or rejected together.
//!
//! Downstream usage
//! ----------------
//! - Callers aggregate per-split statistics via
//!   [`crate::selection::aggregation`] first, then pass the aggregated
//!   vector here with `normalize = true`.
//!
//! Testing notes
//! -------------
//! - Unit tests pin a hand-computed Benjamini–Hochberg scenario, the
//!   dependence correction, the mask/bounds duality over 1000 random levels,
//!   nestedness in q, the q = 0 boundary, and Bonferroni strictness.

use ndarray::{Array1, ArrayView1};

use crate::selection::errors::{SelectionError, SelectionResult};

/// Select features by the Benjamini–Hochberg step-up procedure.
///
/// Sorts the p-values ascending, divides each by its 1-indexed rank, and
/// finds the last rank whose quotient is ≤ the adjusted target. The
/// selection bound is the raw sorted p-value at that rank (0 when no rank
/// qualifies) and every p-value ≤ the bound is selected.
///
/// Parameters
/// ----------
/// - `pvalues`: length-p vector of p-values.
/// - `q`: target false-discovery rate.
/// - `independent`: when `false`, the target is deflated by `ln(p)`
///   (Benjamini–Yekutieli correction for arbitrary dependence).
/// - `normalize`: when `true`, the target is further deflated by `p`;
///   intended for aggregated p-value vectors whose entries already carry a
///   multiplicity rescaling.
///
/// Returns
/// -------
/// - `Ok(Vec<bool>)`: selection mask, `true` for selected features.
///
/// Errors
/// ------
/// - [`SelectionError::EmptyPValues`]: `pvalues` is empty.
/// - [`SelectionError::InvalidLevel`]: `q` is NaN.
///
/// Notes
/// -----
/// - `q = 0` yields an all-false mask for strictly positive p-values; exact
///   zeros are still admitted, matching the bounds duality at the origin.
pub fn select_model_fdr(
    pvalues: &ArrayView1<f64>,
    q: f64,
    independent: bool,
    normalize: bool,
) -> SelectionResult<Vec<bool>> {
    let p = pvalues.len();
    if p == 0 {
        return Err(SelectionError::EmptyPValues);
    }
    if q.is_nan() {
        return Err(SelectionError::InvalidLevel(q));
    }

    let mut adjusted = q;
    if !independent {
        adjusted /= (p as f64).ln();
    }
    if normalize {
        adjusted /= p as f64;
    }

    let mut sorted: Vec<f64> = pvalues.iter().copied().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut bound = 0.0;
    for (rank, value) in sorted.iter().enumerate() {
        if *value / (rank + 1) as f64 <= adjusted {
            bound = *value;
        }
    }

    Ok(pvalues.iter().map(|&value| value <= bound).collect())
}

/// Compute per-feature critical FDR levels.
///
/// For each feature, returns the smallest target q at which
/// [`select_model_fdr`] (with the same flags) would select it: divide the
/// sorted p-values by their ranks, enforce a running minimum from the
/// largest rank downward so the bound is monotone along the sort order,
/// scatter back to the original feature order, rescale by `p` when
/// `normalize` and by `ln(p)` when not `independent`, and clip to [0, 1].
///
/// Parameters
/// ----------
/// - `pvalues`: length-p vector of p-values.
/// - `independent` / `normalize`: must match the flags later passed to
///   [`select_model_fdr`] for the duality to hold.
///
/// Returns
/// -------
/// - `Ok(Array1<f64>)`: per-feature critical levels in [0, 1].
///
/// Errors
/// ------
/// - [`SelectionError::EmptyPValues`]: `pvalues` is empty.
pub fn select_model_fdr_bounds(
    pvalues: &ArrayView1<f64>,
    independent: bool,
    normalize: bool,
) -> SelectionResult<Array1<f64>> {
    let p = pvalues.len();
    if p == 0 {
        return Err(SelectionError::EmptyPValues);
    }

    let mut order: Vec<usize> = (0..p).collect();
    order.sort_by(|&a, &b| pvalues[a].total_cmp(&pvalues[b]));

    let mut divided: Vec<f64> = order
        .iter()
        .enumerate()
        .map(|(rank, &idx)| pvalues[idx] / (rank + 1) as f64)
        .collect();
    for rank in (0..p - 1).rev() {
        if divided[rank + 1] < divided[rank] {
            divided[rank] = divided[rank + 1];
        }
    }

    let mut factor = 1.0;
    if normalize {
        factor *= p as f64;
    }
    if !independent {
        factor *= (p as f64).ln();
    }

    let mut bounds = Array1::<f64>::zeros(p);
    for (rank, &idx) in order.iter().enumerate() {
        bounds[idx] = (divided[rank] * factor).clamp(0.0, 1.0);
    }
    Ok(bounds)
}

/// Select features by the Bonferroni rule.
///
/// Parameters
/// ----------
/// - `pvalues`: length-p vector of p-values.
/// - `alpha`: target family-wise error rate.
///
/// Returns
/// -------
/// - `Ok(Vec<bool>)`: mask with `true` where `pvalues[i] < alpha / p`
///   (strict inequality).
///
/// Errors
/// ------
/// - [`SelectionError::EmptyPValues`]: `pvalues` is empty.
/// - [`SelectionError::InvalidLevel`]: `alpha` is NaN.
pub fn select_model_fwer(
    pvalues: &ArrayView1<f64>,
    alpha: f64,
) -> SelectionResult<Vec<bool>> {
    let p = pvalues.len();
    if p == 0 {
        return Err(SelectionError::EmptyPValues);
    }
    if alpha.is_nan() {
        return Err(SelectionError::InvalidLevel(alpha));
    }

    let cutoff = alpha / p as f64;
    Ok(pvalues.iter().map(|&value| value < cutoff).collect())
}

/// Compute per-feature Bonferroni bounds.
///
/// Parameters
/// ----------
/// - `pvalues`: length-p vector of p-values.
///
/// Returns
/// -------
/// - `Ok(Array1<f64>)`: `pvalues · p`, clipped to [0, 1].
///
/// Errors
/// ------
/// - [`SelectionError::EmptyPValues`]: `pvalues` is empty.
pub fn select_model_fwer_bounds(pvalues: &ArrayView1<f64>) -> SelectionResult<Array1<f64>> {
    let p = pvalues.len();
    if p == 0 {
        return Err(SelectionError::EmptyPValues);
    }
    Ok(pvalues.mapv(|value| (value * p as f64).clamp(0.0, 1.0)))
}
