//! clustering — connectivity-constrained feature agglomeration and projection.
//!
//! Purpose
//! -------
//! Group the columns of a data matrix into spatially connected clusters and
//! expose the pair of linear operators that move data between feature
//! resolution and cluster resolution. This is the dimensionality-reduction
//! leaf of the stability-selection pipeline: every random split re-clusters
//! its subsample and works on cluster means until its statistics are
//! broadcast back to full feature resolution.
//!
//! Key behaviors
//! -------------
//! - Build symmetric adjacency constraints from edge lists or dense 0/1
//!   matrices via [`Connectivity`].
//! - Run bottom-up Ward-linkage agglomeration that merges only
//!   adjacency-connected groups, stopping at the requested cluster count
//!   ([`cluster_features`]).
//! - Materialize the row-stochastic coarsening operator `P` and the
//!   indicator broadcast operator `P_inv` from a label vector
//!   ([`ProjectionPair`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Clustering is a pure function of (subsample, cluster count,
//!   connectivity); no state survives between calls, so repeated splits
//!   cannot contaminate each other.
//! - Labels are contiguous `0..n_clusters`, numbered by each cluster's
//!   smallest member, and every cluster is a connected subgraph of the
//!   constraint.
//! - `P` rows sum to 1, `P_inv` rows are unit indicators, and
//!   `P_inv·(P·v)` recovers cluster-constant `v` up to the rounding of the
//!   averaging weights.
//! - All failures are reported via [`ClusterError`]; nothing in this module
//!   panics on user-facing invalid input.
//!
//! Conventions
//! -----------
//! - This subtree owns clustering concerns only; split bookkeeping,
//!   penalties, and statistics live in the `stability`, `lasso`, and
//!   `inference` subtrees.
//! - Validation is centralized in [`validate_clustering_inputs`] and runs
//!   before any merge work.
//! - Merge tie-breaking is deterministic (ordered neighbor sets, total
//!   candidate ordering), so identical inputs produce identical labels.
//!
//! Downstream usage
//! ----------------
//! - The ensemble fit clusters each selection subsample:
//!
//!   ```rust
//!   use rust_stabsel::clustering::{cluster_features, ProjectionPair};
//!   # use ndarray::Array2;
//!   # let x = Array2::<f64>::zeros((4, 6));
//!   let labels = cluster_features(&x.view(), 3, None)?;
//!   let projection = ProjectionPair::from_labels(&labels.view())?;
//!   let x_reduced = projection.reduce(&x.view());
//!   # Ok::<(), rust_stabsel::clustering::ClusterError>(())
//!   ```
//!
//! - Split-based inference rebuilds [`ProjectionPair`] from stored labels to
//!   broadcast per-cluster statistics back to features.
//!
//! Testing notes
//! -------------
//! - `agglomeration` tests cover graph construction, nearest-pair merging,
//!   constraint obedience on path graphs, and infeasible requests.
//! - `projection` tests cover the operator invariants and the exact
//!   cluster-constant round trip.
//! - `validation` tests cover every rejection branch.

pub mod agglomeration;
pub mod errors;
pub mod projection;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::agglomeration::{Connectivity, cluster_features};
pub use self::errors::{ClusterError, ClusterResult};
pub use self::projection::ProjectionPair;
pub use self::validation::validate_clustering_inputs;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_stabsel::clustering::prelude::*;
//
// to import the clustering surface in a single line.

pub mod prelude {
    pub use super::agglomeration::{Connectivity, cluster_features};
    pub use super::errors::{ClusterError, ClusterResult};
    pub use super::projection::ProjectionPair;
}
