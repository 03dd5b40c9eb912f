//! Unified error handling for split-based inference.
//!
//! This module defines `InferenceError`, the error type shared by the
//! multivariate and univariate inference routines, together with the
//! `InferenceResult<T>` alias used across the `inference` subtree. Variants
//! are grouped into shape errors, data errors, option errors, and wrapped
//! causes from collaborating stages; a feature-gated conversion surfaces
//! them as `ValueError` in Python bindings.

use crate::clustering::errors::ClusterError;
use crate::selection::errors::SelectionError;

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type InferenceResult<T> = Result<T, InferenceError>;

/// Error type for split-based inference.
///
/// Covers inputs whose shape disagrees with the fitted evidence arrays,
/// non-finite data, invalid permutation options, and failures propagated
/// from the projection and aggregation layers. Implements `Display` and
/// `std::error::Error` for idiomatic `?`-based propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Shapes ----
    /// Supplied sample count disagrees with the fitted sample count.
    SampleCountMismatch { expected: usize, found: usize },

    /// Supplied feature count disagrees with the fitted feature count.
    FeatureCountMismatch { expected: usize, found: usize },

    // ---- Data ----
    /// The design matrix contains a NaN or infinite entry.
    NonFiniteData { row: usize, col: usize, value: f64 },

    /// The response vector contains a NaN or infinite entry.
    NonFiniteTarget { index: usize, value: f64 },

    // ---- Options ----
    /// The permutation strategy was configured with zero draws.
    ZeroPermutations,

    // ---- Wrapped causes ----
    /// Rebuilding a projection pair from stored labels failed.
    Cluster(ClusterError),

    /// Aggregating per-split statistics failed.
    Aggregation(SelectionError),
}

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shapes ----
            InferenceError::SampleCountMismatch { expected, found } => {
                write!(
                    f,
                    "Inference Error: fitted on {expected} samples but received {found}"
                )
            }
            InferenceError::FeatureCountMismatch { expected, found } => {
                write!(
                    f,
                    "Inference Error: fitted on {expected} features but received {found}"
                )
            }

            // ---- Data ----
            InferenceError::NonFiniteData { row, col, value } => {
                write!(
                    f,
                    "Inference Error: design matrix holds non-finite value {value} at \
                     ({row}, {col})"
                )
            }
            InferenceError::NonFiniteTarget { index, value } => {
                write!(
                    f,
                    "Inference Error: response holds non-finite value {value} at index \
                     {index}"
                )
            }

            // ---- Options ----
            InferenceError::ZeroPermutations => {
                write!(f, "Inference Error: permutation draw count must be at least 1")
            }

            // ---- Wrapped causes ----
            InferenceError::Cluster(source) => {
                write!(f, "Inference Error: projection rebuild failed: {source}")
            }
            InferenceError::Aggregation(source) => {
                write!(f, "Inference Error: aggregation failed: {source}")
            }
        }
    }
}

impl From<ClusterError> for InferenceError {
    fn from(err: ClusterError) -> InferenceError {
        InferenceError::Cluster(err)
    }
}

impl From<SelectionError> for InferenceError {
    fn from(err: SelectionError) -> InferenceError {
        InferenceError::Aggregation(err)
    }
}

#[cfg(feature = "python-bindings")]
impl From<InferenceError> for PyErr {
    fn from(err: InferenceError) -> PyErr {
        PyValueError::new_err(format!("InferenceError: {err}"))
    }
}
