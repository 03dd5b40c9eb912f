//! stability — the randomized-split ensemble at the heart of the crate.
//!
//! Purpose
//! -------
//! Fit the stability-selection ensemble: repeated random subsampling,
//! per-split connectivity-constrained clustering, penalized regression on
//! cluster means, and consensus accumulation. The result is an immutable
//! evidence record that split-based inference and the selection procedures
//! consume.
//!
//! Key behaviors
//! -------------
//! - Immutable configuration ([`StabilityModel`]) with a tagged
//!   cluster-count specifier ([`ClusterCount`]) and an inference-mode flag
//!   ([`SelectionMode`]).
//! - A single validated `fit()` producing [`StabilityFit`]: per-split
//!   coefficients, sample indices, cluster labels, the consensus estimate,
//!   and the [`Standardization`] record.
//! - Fail-fast validation: every configuration and data error is raised
//!   before the first split is drawn.
//!
//! Invariants & assumptions
//! ------------------------
//! - Configuration is immutable after construction; a fit either completes
//!   fully or returns an error with no partial state.
//! - One seeded RNG advances across splits, so identical inputs reproduce
//!   bit-identical evidence arrays.
//!
//! Conventions
//! -----------
//! - Clustering and the L1 solver live in the `clustering` and `lasso`
//!   subtrees; their errors arrive here wrapped in [`StabilityError`].
//! - Validation is centralized in [`validate_fit_inputs`] and runs before
//!   any split work.
//!
//! Downstream usage
//! ----------------
//! - A typical fit:
//!
//!   ```rust
//!   use ndarray::{Array1, Array2};
//!   use rust_stabsel::stability::{ClusterCount, SelectionMode, StabilityModel};
//!
//!   let x = Array2::from_shape_fn((12, 4), |(row, col)| ((row * 3 + col) % 5) as f64);
//!   let y = Array1::from_shape_fn(12, |row| (row % 4) as f64);
//!   let model = StabilityModel::new(
//!       0.5,
//!       2,
//!       0.5,
//!       ClusterCount::Fixed(2),
//!       SelectionMode::Multivariate,
//!       1,
//!   );
//!   let fit = model.fit(&x.view(), &y.view(), None)?;
//!   assert_eq!(fit.coefficients().len(), 4);
//!   # Ok::<(), rust_stabsel::stability::StabilityError>(())
//!   ```
//!
//! - `inference` replays the stored splits and labels for significance
//!   computation; `selection` thresholds the aggregated output.
//!
//! Testing notes
//! -------------
//! - `config` tests pin resolution rules and defaults; `validation` tests
//!   walk every rejection branch; `model` tests cover determinism,
//!   bookkeeping, recovery, and prediction.

pub mod config;
pub mod errors;
pub mod model;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::config::{ClusterCount, SelectionMode, StabilityModel};
pub use self::errors::{StabilityError, StabilityResult};
pub use self::model::{StabilityFit, Standardization};
pub use self::validation::validate_fit_inputs;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_stabsel::stability::prelude::*;
//
// to import the stability surface in a single line.

pub mod prelude {
    pub use super::config::{ClusterCount, SelectionMode, StabilityModel};
    pub use super::errors::{StabilityError, StabilityResult};
    pub use super::model::{StabilityFit, Standardization};
}
