//! Unified error handling for the penalized-regression solver.
//!
//! This module defines `LassoError`, the error type shared by the
//! coordinate-descent solver and its input validation, together with the
//! `LassoResult<T>` alias used across the `lasso` subtree. Variants are
//! grouped into shape errors and parameter errors; a feature-gated
//! conversion surfaces them as `ValueError` in Python bindings.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type LassoResult<T> = Result<T, LassoError>;

/// Error type for the coordinate-descent lasso.
///
/// Covers design/target shape mismatches and invalid solver parameters.
/// Implements `Display` and `std::error::Error` for idiomatic `?`-based
/// propagation.
#[derive(Debug, Clone, PartialEq)]
pub enum LassoError {
    // ---- Shapes ----
    /// Design matrix row count and target length disagree.
    DimensionMismatch { rows: usize, targets: usize },

    /// Design matrix has zero rows or zero columns.
    EmptyDesign,

    // ---- Parameters ----
    /// Penalty is negative or non-finite.
    InvalidPenalty(f64),

    /// Convergence tolerance is non-positive or non-finite.
    InvalidTolerance(f64),

    /// Sweep budget is zero.
    ZeroMaxIter,
}

impl std::error::Error for LassoError {}

impl std::fmt::Display for LassoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shapes ----
            LassoError::DimensionMismatch { rows, targets } => {
                write!(f, "Lasso Error: design has {rows} rows but target has {targets} entries")
            }
            LassoError::EmptyDesign => {
                write!(f, "Lasso Error: design matrix must have at least one row and one column")
            }

            // ---- Parameters ----
            LassoError::InvalidPenalty(penalty) => {
                write!(f, "Lasso Error: penalty must be finite and non-negative, got {penalty}")
            }
            LassoError::InvalidTolerance(tol) => {
                write!(f, "Lasso Error: tolerance must be finite and positive, got {tol}")
            }
            LassoError::ZeroMaxIter => {
                write!(f, "Lasso Error: sweep budget must be at least 1")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<LassoError> for PyErr {
    fn from(err: LassoError) -> PyErr {
        PyValueError::new_err(format!("LassoError: {err}"))
    }
}
