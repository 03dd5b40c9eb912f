//! selection — cross-split aggregation and multiple-testing control.
//!
//! Purpose
//! -------
//! Collapse the per-split statistic matrices produced by split-based
//! inference into a single calibrated vector, and convert that vector plus a
//! target error level into a feature-selection decision. This is the final
//! stage of the stability-selection pipeline: everything upstream produces
//! evidence, this module decides.
//!
//! Key behaviors
//! -------------
//! - Adaptive quantile aggregation of per-split p-values, with the
//!   `1 − ln(γ_min)` multiplicity correction ([`aggregate_pvalues`]), and
//!   the cheaper uncorrected score variant ([`aggregate_scores`]).
//! - Benjamini–Hochberg / Benjamini–Yekutieli step-up selection
//!   ([`select_model_fdr`]) with its exact per-feature critical-level dual
//!   ([`select_model_fdr_bounds`]).
//! - Bonferroni FWER control ([`select_model_fwer`],
//!   [`select_model_fwer_bounds`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Aggregation is monotone: elementwise-dominant inputs produce
//!   elementwise-dominant aggregates.
//! - Mask/bounds duality: `select_model_fdr(p, q)` selects exactly the
//!   features whose `select_model_fdr_bounds(p)` entry is ≤ q, for every
//!   q in (0, 1) and matching flags.
//! - Selections are nested in the target level; an empty selection is a
//!   valid outcome, never an error.
//!
//! Conventions
//! -----------
//! - Statistic matrices are `(n_split, n_features)`; aggregated vectors are
//!   length `n_features`. Sorting uses `f64::total_cmp` throughout.
//! - Aggregated p-value vectors already carry a multiplicity rescaling, so
//!   the step-up procedures take `normalize = true` for them.
//!
//! Downstream usage
//! ----------------
//! - A caller thresholds aggregated inference output:
//!
//!   ```rust
//!   use rust_stabsel::selection::{aggregate_pvalues, select_model_fdr, DEFAULT_GAMMA_MIN};
//!   # use ndarray::Array2;
//!   # let per_split = Array2::<f64>::from_elem((10, 6), 0.5);
//!   let aggregated = aggregate_pvalues(&per_split.view(), DEFAULT_GAMMA_MIN)?;
//!   let mask = select_model_fdr(&aggregated.view(), 0.1, false, true)?;
//!   # Ok::<(), rust_stabsel::selection::SelectionError>(())
//!   ```
//!
//! Testing notes
//! -------------
//! - `aggregation` tests pin hand-computed aggregates, monotonicity, and the
//!   clip boundary.
//! - `fdr` tests pin a hand-computed Benjamini–Hochberg scenario, the
//!   mask/bounds duality over 1000 random levels, nestedness, and Bonferroni
//!   strictness.

pub mod aggregation;
pub mod errors;
pub mod fdr;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::aggregation::{DEFAULT_GAMMA_MIN, aggregate_pvalues, aggregate_scores};
pub use self::errors::{SelectionError, SelectionResult};
pub use self::fdr::{
    select_model_fdr, select_model_fdr_bounds, select_model_fwer, select_model_fwer_bounds,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_stabsel::selection::prelude::*;
//
// to import the selection surface in a single line.

pub mod prelude {
    pub use super::aggregation::{DEFAULT_GAMMA_MIN, aggregate_pvalues, aggregate_scores};
    pub use super::errors::{SelectionError, SelectionResult};
    pub use super::fdr::{
        select_model_fdr, select_model_fdr_bounds, select_model_fwer, select_model_fwer_bounds,
    };
}
