//! selection::errors — error types for aggregation and multiple testing.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias shared by the quantile
//! aggregators and the FDR/FWER selection procedures, plus the conversion
//! layer to Python exceptions for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`SelectionResult`] and [`SelectionError`] as the canonical
//!   result and error types under `selection`.
//! - Attach human-readable `Display` messages phrased as domain constraints
//!   ("γ_min must lie in (0, 1)", "need at least 2 splits").
//! - Implement `From<SelectionError> for PyErr` behind `python-bindings`.
//!
//! Conventions
//! -----------
//! - An empty selection *result* is never an error: procedures return
//!   all-false masks freely. These variants cover malformed inputs only.
//!
//! Testing notes
//! -------------
//! - Unit tests verify `Display` payload embedding.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

pub type SelectionResult<T> = Result<T, SelectionError>;

/// SelectionError — invalid inputs to aggregation or selection procedures.
///
/// Variants
/// --------
/// - `EmptyPValues`
///   A selection procedure received a zero-length statistic vector.
/// - `EmptyStatistics`
///   An aggregator received a matrix with zero rows or zero columns.
/// - `InvalidLevel(level)`
///   The target level (q or α) is NaN.
/// - `InvalidGammaMin(gamma_min)`
///   The quantile floor is outside (0, 1) or non-finite.
/// - `TooFewSplits { n_split, kmin }`
///   After discarding the smallest `kmin` order statistics nothing remains;
///   aggregation needs `kmin < n_split` (and at least 2 splits).
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    //------ Input validation errors ------
    EmptyPValues,
    EmptyStatistics,
    InvalidLevel(f64),
    InvalidGammaMin(f64),
    TooFewSplits { n_split: usize, kmin: usize },
}

impl std::error::Error for SelectionError {}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionError::EmptyPValues => {
                write!(f, "p-value vector must not be empty.")
            }
            SelectionError::EmptyStatistics => {
                write!(f, "Statistic matrix must have at least one row and one column.")
            }
            SelectionError::InvalidLevel(level) => {
                write!(f, "Invalid target level: {level}. Must not be NaN.")
            }
            SelectionError::InvalidGammaMin(gamma_min) => {
                write!(f, "Invalid quantile floor: {gamma_min}. Must lie strictly in (0, 1).")
            }
            SelectionError::TooFewSplits { n_split, kmin } => {
                write!(
                    f,
                    "Aggregation over {n_split} splits discards the {kmin} smallest order \
                     statistics and leaves nothing; need kmin < n_split."
                )
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<SelectionError> for PyErr {
    fn from(err: SelectionError) -> PyErr {
        PyValueError::new_err(format!("SelectionError: {err}"))
    }
}
