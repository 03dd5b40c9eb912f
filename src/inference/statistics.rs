//! Per-split statistic containers and shared split bookkeeping.
//!
//! `SplitStatistics` pairs the raw per-split statistic matrix produced by an
//! inference mode with its aggregated length-p summary. Construction applies
//! the quantile aggregator matching the statistic kind, or bypasses
//! aggregation for single-split ensembles, whose lone row already is the
//! summary. `held_out_rows` computes the complement of a stored selection
//! subset and is shared by every split-based routine.

use crate::inference::errors::InferenceResult;
use crate::selection::{DEFAULT_GAMMA_MIN, aggregate_pvalues, aggregate_scores};
use ndarray::{Array1, Array2, ArrayView1};

/// Which quantile combinator summarizes a per-split matrix.
///
/// `PValue` applies the calibrated aggregator (discard, divide, rescale,
/// clip); `Score` applies the cheaper ranking combinator (single quantile,
/// no rescale, no clip). Univariate scores deliberately reuse `PValue`
/// because their entries are themselves p-values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AggregationRule {
    PValue,
    Score,
}

/// SplitStatistics — per-split inference output and its aggregate.
///
/// Purpose
/// -------
/// Carry the raw evidence an inference mode produced (one row per split, one
/// column per feature) next to the length-p aggregated vector downstream
/// selection procedures consume.
///
/// Fields
/// ------
/// - `per_split`: `Array2<f64>`
///   The n_split×p statistic matrix, rows indexed by split id.
/// - `aggregated`: `Array1<f64>`
///   The length-p quantile-aggregated summary; equal to the single row when
///   the ensemble holds one split.
///
/// Invariants
/// ----------
/// - `aggregated.len() == per_split.ncols()`.
/// - p-value matrices stay within `[0, 1]`; score matrices are unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitStatistics {
    per_split: Array2<f64>,
    aggregated: Array1<f64>,
}

impl SplitStatistics {
    /// Aggregate a per-split matrix under the given rule.
    ///
    /// Single-split matrices bypass the aggregator: their one row is the
    /// summary. Larger ensembles go through the quantile combinator with the
    /// default quantile floor.
    pub(crate) fn from_rows(
        per_split: Array2<f64>, rule: AggregationRule,
    ) -> InferenceResult<SplitStatistics> {
        let aggregated = if per_split.nrows() == 1 {
            per_split.row(0).to_owned()
        } else {
            match rule {
                AggregationRule::PValue => {
                    aggregate_pvalues(&per_split.view(), DEFAULT_GAMMA_MIN)?
                }
                AggregationRule::Score => {
                    aggregate_scores(&per_split.view(), DEFAULT_GAMMA_MIN)?
                }
            }
        };
        Ok(SplitStatistics { per_split, aggregated })
    }

    /// Read-only view of the n_split×p statistic matrix.
    pub fn per_split(&self) -> &Array2<f64> {
        &self.per_split
    }

    /// Read-only view of the length-p aggregated vector.
    pub fn aggregated(&self) -> &Array1<f64> {
        &self.aggregated
    }

    /// Consume the container, yielding `(per_split, aggregated)`.
    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>) {
        (self.per_split, self.aggregated)
    }
}

/// Complement of a sorted selection subset within `0..n_samples`.
///
/// `split` holds strictly ascending row indices as stored in the evidence
/// arrays; the result lists the held-out rows in ascending order.
pub(crate) fn held_out_rows(split: &ArrayView1<usize>, n_samples: usize) -> Vec<usize> {
    let mut held = Vec::with_capacity(n_samples - split.len());
    let mut cursor = split.iter().copied().peekable();
    for row in 0..n_samples {
        if cursor.peek() == Some(&row) {
            cursor.next();
        } else {
            held.push(row);
        }
    }
    held
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The single-split aggregation bypass.
    // - Rule dispatch: calibrated p-value combinator vs raw score combinator.
    // - Held-out complement bookkeeping.
    //
    // They intentionally DO NOT cover:
    // - Aggregator arithmetic in depth; see `selection::aggregation`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that a one-row matrix bypasses aggregation and reports its only
    // row as the aggregate.
    //
    // Given
    // -----
    // - A 1×3 per-split matrix.
    //
    // Expect
    // ------
    // - `aggregated` equals the row verbatim under either rule.
    fn single_split_bypasses_aggregation() {
        // Arrange
        let rows = array![[0.2, 0.8, 0.5]];

        // Act
        let stats = SplitStatistics::from_rows(rows.clone(), AggregationRule::PValue)
            .expect("one split is valid");
        let scores = SplitStatistics::from_rows(rows, AggregationRule::Score)
            .expect("one split is valid");

        // Assert
        assert_eq!(stats.aggregated().to_vec(), vec![0.2, 0.8, 0.5]);
        assert_eq!(scores.aggregated().to_vec(), vec![0.2, 0.8, 0.5]);
        assert_eq!(stats.per_split().dim(), (1, 3));
    }

    #[test]
    // Purpose
    // -------
    // Verify rule dispatch on a two-split matrix: the p-value rule rescales
    // and clips, the score rule reports the raw surviving quantile.
    //
    // Given
    // -----
    // - per_split = [[0.1, 0.5], [0.2, 0.25]], so the surviving order
    //   statistic per column is 0.2 and 0.5 (kmin = 1 of 2 splits, quantile
    //   divisor 1).
    //
    // Expect
    // ------
    // - PValue: 0.2·(1 − ln 0.05) ≈ 0.799 and clip(0.5·(1 − ln 0.05)) = 1.
    // - Score: 0.2 and 0.5 untouched.
    fn rules_dispatch_to_matching_aggregator() {
        // Arrange
        let rows = array![[0.1, 0.5], [0.2, 0.25]];
        let rescale = 1.0 - 0.05f64.ln();

        // Act
        let pvals = SplitStatistics::from_rows(rows.clone(), AggregationRule::PValue)
            .expect("two splits are valid");
        let scores = SplitStatistics::from_rows(rows, AggregationRule::Score)
            .expect("two splits are valid");

        // Assert
        assert_relative_eq!(pvals.aggregated()[0], 0.2 * rescale, epsilon = 1e-12);
        assert_relative_eq!(pvals.aggregated()[1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(scores.aggregated()[0], 0.2, epsilon = 1e-12);
        assert_relative_eq!(scores.aggregated()[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Verify the held-out complement walk, including prefix and suffix runs.
    //
    // Given
    // -----
    // - split = [1, 2, 5] within 7 samples, and an empty split.
    //
    // Expect
    // ------
    // - Complements [0, 3, 4, 6] and 0..7 respectively.
    fn held_out_rows_complements_the_split() {
        // Arrange
        let split = Array1::from(vec![1usize, 2, 5]);
        let empty = Array1::<usize>::from(vec![]);

        // Act & Assert
        assert_eq!(held_out_rows(&split.view(), 7), vec![0, 3, 4, 6]);
        assert_eq!(held_out_rows(&empty.view(), 7), vec![0, 1, 2, 3, 4, 5, 6]);
    }
}
