//! lasso — the per-split penalized regression solver.
//!
//! Purpose
//! -------
//! Provide the sparse linear-regression building block of the stability
//! ensemble: a cyclic coordinate-descent solver for the L1-penalized
//! least-squares objective `(1/(2m))‖y − Xβ‖² + λ‖β‖₁`, together with its
//! options, validation, and error surface.
//!
//! Key behaviors
//! -------------
//! - Expose [`fit_lasso`] with explicit penalty and [`LassoOptions`]
//!   (sweep budget, convergence tolerance).
//! - Return coefficient vectors whose zeros are exact, so callers read the
//!   selected support directly off `β_j != 0`.
//! - Centralize input guards in [`validate_lasso_inputs`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite; the ensemble validates data finiteness before
//!   dispatching per-split solves.
//! - The solver never standardizes internally; per-column norms enter the
//!   coordinate update explicitly.
//! - Failures are reported via [`LassoResult`]; nothing here panics on
//!   user-facing invalid input.
//!
//! Conventions
//! -----------
//! - This subtree is focused on the *solver*; the data-dependent penalty
//!   scale λ = θ·max|X_projᵀy|/n is computed by the `stability` fit loop.
//! - Errors are phrased in terms of domain constraints ("penalty must be
//!   finite and non-negative") rather than solver internals.
//!
//! Downstream usage
//! ----------------
//! - The ensemble fit solves one lasso per random split:
//!
//!   ```rust
//!   use rust_stabsel::lasso::{LassoOptions, fit_lasso};
//!   # use ndarray::{Array1, Array2};
//!   # let x_reduced = Array2::<f64>::zeros((8, 3));
//!   # let y_selected = Array1::<f64>::zeros(8);
//!   let beta = fit_lasso(&x_reduced.view(), &y_selected.view(), 0.05, &LassoOptions::new())?;
//!   let support: Vec<usize> = (0..beta.len()).filter(|&j| beta[j] != 0.0).collect();
//!   # Ok::<(), rust_stabsel::lasso::LassoError>(())
//!   ```
//!
//! Testing notes
//! -------------
//! - `coordinate_descent` tests pin the soft-threshold operator, the null
//!   model at λ_max, OLS recovery at λ = 0, and zero-norm column handling.
//! - `validation` tests walk every rejection branch.

pub mod coordinate_descent;
pub mod errors;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::coordinate_descent::{LassoOptions, fit_lasso};
pub use self::errors::{LassoError, LassoResult};
pub use self::validation::validate_lasso_inputs;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::coordinate_descent::{LassoOptions, fit_lasso};
    pub use super::errors::{LassoError, LassoResult};
}
