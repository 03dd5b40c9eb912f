//! Connectivity graphs and connectivity-constrained Ward agglomeration.
//!
//! This module provides:
//! - A [`Connectivity`] adjacency structure built from edge lists or dense
//!   symmetric 0/1 matrices, with `None` at the call sites meaning "no
//!   constraint" (every pair may merge).
//! - [`cluster_features`], a bottom-up Ward-linkage agglomeration over the
//!   *columns* of a data matrix, merging only adjacency-connected groups and
//!   stopping at the requested cluster count.
//!
//! Conventions:
//! - Features are points in Rᵐ (one coordinate per subsample row); the merge
//!   cost between groups A and B is the Ward variance increase
//!   `|A||B|/(|A|+|B|) · ‖μ_A − μ_B‖²`.
//! - Candidate merges live in a binary heap with lazy invalidation: every
//!   cluster carries a version counter, and candidates recorded against a
//!   stale version are discarded on pop.
//! - Neighbor sets are `BTreeSet`s so iteration order (and therefore merge
//!   tie-breaking) is deterministic across runs.
//! - Output labels are contiguous `0..n_clusters`, numbered by each
//!   cluster's smallest member feature.

use crate::clustering::{
    errors::{ClusterError, ClusterResult},
    validation::validate_clustering_inputs,
};
use ndarray::{Array1, ArrayView2};
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap};

/// Connectivity — symmetric adjacency over the feature set.
///
/// Purpose
/// -------
/// Constrain which features may end up in the same cluster: Ward merges are
/// only attempted between groups joined by at least one edge.
///
/// Key behaviors
/// -------------
/// - Construction from an edge list ([`Connectivity::from_edges`]) or a
///   dense symmetric matrix ([`Connectivity::from_dense`], nonzero ⇒ edge).
/// - Self-loops are ignored; edges are stored in both directions.
/// - [`Connectivity::n_components`] counts connected components, which is
///   the lower bound on any reachable cluster count.
///
/// Invariants
/// ----------
/// - `neighbors.len() == n_features` and every stored index is `< n_features`.
/// - `j ∈ neighbors[i]` iff `i ∈ neighbors[j]`, and never `i ∈ neighbors[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Connectivity {
    n_features: usize,
    neighbors: Vec<BTreeSet<usize>>,
}

impl Connectivity {
    /// Build a connectivity graph from an undirected edge list.
    ///
    /// Parameters
    /// ----------
    /// - `n_features`: `usize`
    ///   Number of graph nodes (features). Must be at least 1.
    /// - `edges`: `&[(usize, usize)]`
    ///   Undirected edges; duplicates are collapsed and self-loops skipped.
    ///
    /// Returns
    /// -------
    /// `ClusterResult<Connectivity>` with both directions of every edge
    /// recorded.
    ///
    /// Errors
    /// ------
    /// - `ClusterError::EmptyInput` when `n_features == 0`.
    /// - `ClusterError::EdgeOutOfBounds` when an endpoint is `>= n_features`.
    pub fn from_edges(n_features: usize, edges: &[(usize, usize)]) -> ClusterResult<Self> {
        if n_features == 0 {
            return Err(ClusterError::EmptyInput);
        }
        let mut neighbors = vec![BTreeSet::new(); n_features];
        for &(a, b) in edges {
            if a >= n_features {
                return Err(ClusterError::EdgeOutOfBounds { index: a, n_features });
            }
            if b >= n_features {
                return Err(ClusterError::EdgeOutOfBounds { index: b, n_features });
            }
            if a == b {
                continue;
            }
            neighbors[a].insert(b);
            neighbors[b].insert(a);
        }
        Ok(Connectivity { n_features, neighbors })
    }

    /// Build a connectivity graph from a dense adjacency matrix.
    ///
    /// Parameters
    /// ----------
    /// - `adjacency`: `&ArrayView2<f64>`
    ///   Square matrix; any nonzero entry denotes an edge. The nonzero
    ///   pattern must be symmetric. Diagonal entries are ignored.
    ///
    /// Returns
    /// -------
    /// `ClusterResult<Connectivity>` over `adjacency.nrows()` features.
    ///
    /// Errors
    /// ------
    /// - `ClusterError::EmptyInput` when the matrix is 0×0.
    /// - `ClusterError::NotSquare` when `rows != cols`.
    /// - `ClusterError::Asymmetric` when the nonzero pattern differs across
    ///   the diagonal.
    pub fn from_dense(adjacency: &ArrayView2<f64>) -> ClusterResult<Self> {
        let (rows, cols) = adjacency.dim();
        if rows != cols {
            return Err(ClusterError::NotSquare { rows, cols });
        }
        if rows == 0 {
            return Err(ClusterError::EmptyInput);
        }
        let mut neighbors = vec![BTreeSet::new(); rows];
        for i in 0..rows {
            for j in (i + 1)..cols {
                let forward = adjacency[(i, j)] != 0.0;
                let backward = adjacency[(j, i)] != 0.0;
                if forward != backward {
                    return Err(ClusterError::Asymmetric { row: i, col: j });
                }
                if forward {
                    neighbors[i].insert(j);
                    neighbors[j].insert(i);
                }
            }
        }
        Ok(Connectivity { n_features: rows, neighbors })
    }

    /// Number of features (graph nodes).
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Neighbors of feature `i`, in ascending order.
    pub fn neighbors(&self, i: usize) -> &BTreeSet<usize> {
        &self.neighbors[i]
    }

    /// Count connected components by depth-first traversal.
    pub fn n_components(&self) -> usize {
        let mut visited = vec![false; self.n_features];
        let mut components = 0;
        let mut stack = Vec::new();
        for start in 0..self.n_features {
            if visited[start] {
                continue;
            }
            components += 1;
            visited[start] = true;
            stack.push(start);
            while let Some(node) = stack.pop() {
                for &next in &self.neighbors[node] {
                    if !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
        components
    }
}

/// Partition the columns of `x` into `n_clusters` connected groups.
///
/// Parameters
/// ----------
/// - `x`: `&ArrayView2<f64>`
///   Subsample matrix (m×p); clustering operates on its p columns.
/// - `n_clusters`: `usize`
///   Target number of groups; must satisfy `1 ≤ n_clusters ≤ p`.
/// - `connectivity`: `Option<&Connectivity>`
///   Merge constraint over the p features. `None` allows every pair to
///   merge (plain Ward agglomeration).
///
/// Returns
/// -------
/// `ClusterResult<Array1<usize>>`
///   Length-p label vector with contiguous labels `0..n_clusters`, numbered
///   by each cluster's smallest member feature. Every labelled group is a
///   connected subgraph of the constraint.
///
/// Errors
/// ------
/// - Everything [`validate_clustering_inputs`] rejects: empty input, zero or
///   oversized cluster counts, mis-sized graphs, and graphs with more
///   components than `n_clusters`.
///
/// Notes
/// -----
/// - Pure function of its arguments; carries no state between calls.
/// - Runs the classic greedy agglomeration: repeatedly merge the
///   adjacency-connected pair with the smallest Ward cost until exactly
///   `n_clusters` groups remain.
pub fn cluster_features(
    x: &ArrayView2<f64>, n_clusters: usize, connectivity: Option<&Connectivity>,
) -> ClusterResult<Array1<usize>> {
    validate_clustering_inputs(x, n_clusters, connectivity)?;
    let n_features = x.ncols();

    let mut clusters = init_clusters(x, connectivity);
    let mut parent: Vec<usize> = (0..n_features).collect();
    let mut heap = init_candidates(&clusters);
    let mut n_active = n_features;

    while n_active > n_clusters {
        let Some(candidate) = heap.pop() else {
            // Validation bounds the component count, so running dry here means
            // the remaining groups are mutually disconnected.
            return Err(ClusterError::DisconnectedGraph {
                requested: n_clusters,
                n_components: n_active,
            });
        };
        let (a, b) = (candidate.first, candidate.second);
        if !clusters[a].active || !clusters[b].active {
            continue;
        }
        if clusters[a].version != candidate.first_version
            || clusters[b].version != candidate.second_version
        {
            continue;
        }

        merge_clusters(&mut clusters, a, b);
        parent[b] = a;
        push_neighbor_candidates(&clusters, a, &mut heap);
        n_active -= 1;
    }

    Ok(extract_labels(&mut parent))
}

// ---------- Private helpers (compact docs) ----------

/// One active group during agglomeration: member count, unnormalized
/// centroid (sum of member columns), current neighbor set, and a version
/// counter bumped on every composition change.
#[derive(Debug, Clone)]
struct ActiveCluster {
    size: usize,
    centroid_sum: Array1<f64>,
    neighbors: BTreeSet<usize>,
    version: u64,
    active: bool,
}

/// Candidate merge in the lazy-deletion heap. Ordering is reversed on cost
/// (BinaryHeap is a max-heap) with index tie-breaking so pops are total and
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
struct MergeCandidate {
    cost: f64,
    first: usize,
    second: usize,
    first_version: u64,
    second_version: u64,
}

impl Eq for MergeCandidate {}

impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.first.cmp(&self.first))
            .then_with(|| other.second.cmp(&self.second))
    }
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Seed one singleton cluster per feature, neighbors taken from the
/// constraint (or all other features when unconstrained).
fn init_clusters(x: &ArrayView2<f64>, connectivity: Option<&Connectivity>) -> Vec<ActiveCluster> {
    let n_features = x.ncols();
    (0..n_features)
        .map(|j| {
            let neighbors = match connectivity {
                Some(graph) => graph.neighbors(j).clone(),
                None => (0..n_features).filter(|&t| t != j).collect(),
            };
            ActiveCluster {
                size: 1,
                centroid_sum: x.column(j).to_owned(),
                neighbors,
                version: 0,
                active: true,
            }
        })
        .collect()
}

/// Push the initial candidate for every undirected adjacency (i < j).
fn init_candidates(clusters: &[ActiveCluster]) -> BinaryHeap<MergeCandidate> {
    let mut heap = BinaryHeap::new();
    for (i, cluster) in clusters.iter().enumerate() {
        for &j in cluster.neighbors.range((i + 1)..) {
            heap.push(MergeCandidate {
                cost: ward_cost(&clusters[i], &clusters[j]),
                first: i,
                second: j,
                first_version: 0,
                second_version: 0,
            });
        }
    }
    heap
}

/// Ward variance increase of merging `a` and `b`:
/// `|a||b|/(|a|+|b|) · ‖μ_a − μ_b‖²`.
#[inline]
fn ward_cost(a: &ActiveCluster, b: &ActiveCluster) -> f64 {
    let size_a = a.size as f64;
    let size_b = b.size as f64;
    let mut dist_sq = 0.0;
    for (sum_a, sum_b) in a.centroid_sum.iter().zip(b.centroid_sum.iter()) {
        let delta = sum_a / size_a - sum_b / size_b;
        dist_sq += delta * delta;
    }
    size_a * size_b / (size_a + size_b) * dist_sq
}

/// Fold cluster `b` into cluster `a`: union sizes, centroid sums, and
/// neighbor sets, rewire `b`'s neighbors to point at `a`, deactivate `b`,
/// and bump `a`'s version.
fn merge_clusters(clusters: &mut [ActiveCluster], a: usize, b: usize) {
    let absorbed_neighbors = std::mem::take(&mut clusters[b].neighbors);
    let absorbed_sum = clusters[b].centroid_sum.clone();
    let absorbed_size = clusters[b].size;
    clusters[b].active = false;

    for &t in &absorbed_neighbors {
        clusters[t].neighbors.remove(&b);
        if t != a {
            clusters[t].neighbors.insert(a);
        }
    }

    let merged = &mut clusters[a];
    merged.size += absorbed_size;
    merged.centroid_sum += &absorbed_sum;
    merged.neighbors.extend(absorbed_neighbors);
    merged.neighbors.remove(&a);
    merged.neighbors.remove(&b);
    merged.version += 1;
}

/// Re-score the merged cluster against each of its current neighbors.
fn push_neighbor_candidates(
    clusters: &[ActiveCluster], a: usize, heap: &mut BinaryHeap<MergeCandidate>,
) {
    for &t in &clusters[a].neighbors {
        heap.push(MergeCandidate {
            cost: ward_cost(&clusters[a], &clusters[t]),
            first: a,
            second: t,
            first_version: clusters[a].version,
            second_version: clusters[t].version,
        });
    }
}

/// Resolve every feature to its merge root (path-halving) and relabel roots
/// contiguously in order of first appearance, i.e. by smallest member.
fn extract_labels(parent: &mut [usize]) -> Array1<usize> {
    let n_features = parent.len();
    let mut labels = Array1::<usize>::zeros(n_features);
    let mut label_of_root: Vec<Option<usize>> = vec![None; n_features];
    let mut next_label = 0;
    for j in 0..n_features {
        let root = find_root(parent, j);
        let label = match label_of_root[root] {
            Some(existing) => existing,
            None => {
                let fresh = next_label;
                label_of_root[root] = Some(fresh);
                next_label += 1;
                fresh
            }
        };
        labels[j] = label;
    }
    labels
}

#[inline]
fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Connectivity construction (edges, dense matrices) and component
    //   counting, including the rejection branches.
    // - Ward agglomeration behavior: nearest-pair merging, identity at
    //   k == p, constraint obedience on a path graph, and label ordering.
    //
    // They intentionally DO NOT cover:
    // - Validation branches already exercised in `clustering::validation`.
    // - Projection-operator construction; see `clustering::projection`.
    // -------------------------------------------------------------------------

    /// Columns 0 and 1 nearly coincide; column 2 sits far away.
    fn two_close_one_far() -> Array2<f64> {
        Array2::from_shape_vec(
            (3, 3),
            vec![
                1.0, 1.1, 10.0, //
                2.0, 2.1, 12.0, //
                3.0, 2.9, 14.0,
            ],
        )
        .expect("static shape")
    }

    fn path_graph(p: usize) -> Connectivity {
        let edges: Vec<(usize, usize)> = (0..p - 1).map(|i| (i, i + 1)).collect();
        Connectivity::from_edges(p, &edges).expect("valid path edges")
    }

    #[test]
    // Purpose
    // -------
    // Verify that dense construction records the symmetric nonzero pattern
    // and ignores the diagonal.
    //
    // Given
    // -----
    // - A 3×3 symmetric adjacency with one edge (0,1) and a nonzero diagonal.
    //
    // Expect
    // ------
    // - Feature 0 and 1 are mutual neighbors; feature 2 has none.
    fn connectivity_from_dense_records_symmetric_edges() {
        // Arrange
        let adjacency = Array2::from_shape_vec(
            (3, 3),
            vec![
                1.0, 1.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
        )
        .expect("static shape");

        // Act
        let graph = Connectivity::from_dense(&adjacency.view()).expect("symmetric adjacency");

        // Assert
        assert!(graph.neighbors(0).contains(&1));
        assert!(graph.neighbors(1).contains(&0));
        assert!(graph.neighbors(2).is_empty());
        assert_eq!(graph.n_components(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Verify that an asymmetric nonzero pattern is rejected with the
    // offending position.
    //
    // Given
    // -----
    // - A 2×2 matrix with a[0][1] = 1 but a[1][0] = 0.
    //
    // Expect
    // ------
    // - `ClusterError::Asymmetric { row: 0, col: 1 }`.
    fn connectivity_from_dense_rejects_asymmetric_pattern() {
        // Arrange
        let adjacency =
            Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 0.0, 0.0]).expect("static shape");

        // Act
        let result = Connectivity::from_dense(&adjacency.view());

        // Assert
        assert_eq!(result, Err(ClusterError::Asymmetric { row: 0, col: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // Verify that edge endpoints outside the feature range are rejected.
    //
    // Given
    // -----
    // - 3 features and an edge touching index 5.
    //
    // Expect
    // ------
    // - `ClusterError::EdgeOutOfBounds`.
    fn connectivity_from_edges_rejects_out_of_bounds_endpoint() {
        // Arrange & Act
        let result = Connectivity::from_edges(3, &[(0, 5)]);

        // Assert
        assert_eq!(result, Err(ClusterError::EdgeOutOfBounds { index: 5, n_features: 3 }));
    }

    #[test]
    // Purpose
    // -------
    // Verify that self-loops are skipped rather than stored.
    //
    // Given
    // -----
    // - An edge list containing (1, 1).
    //
    // Expect
    // ------
    // - Feature 1 has no neighbors.
    fn connectivity_from_edges_skips_self_loops() {
        // Arrange & Act
        let graph = Connectivity::from_edges(3, &[(1, 1)]).expect("self-loop tolerated");

        // Assert
        assert!(graph.neighbors(1).is_empty());
        assert_eq!(graph.n_components(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Verify the greedy rule: the two nearly identical columns merge first.
    //
    // Given
    // -----
    // - Three columns, two of which almost coincide, unconstrained, k = 2.
    //
    // Expect
    // ------
    // - Columns 0 and 1 share a label; column 2 has its own.
    fn ward_merges_nearest_columns_first() {
        // Arrange
        let x = two_close_one_far();

        // Act
        let labels = cluster_features(&x.view(), 2, None).expect("feasible clustering");

        // Assert
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    // Purpose
    // -------
    // Verify the no-op boundary: requesting p clusters returns identity
    // labels in feature order.
    //
    // Given
    // -----
    // - Three columns with k = 3.
    //
    // Expect
    // ------
    // - Labels are exactly [0, 1, 2].
    fn ward_with_k_equal_p_returns_identity_labels() {
        // Arrange
        let x = two_close_one_far();

        // Act
        let labels = cluster_features(&x.view(), 3, None).expect("feasible clustering");

        // Assert
        assert_eq!(labels.to_vec(), vec![0, 1, 2]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that path-graph constraints force every cluster to be a
    // contiguous interval of features.
    //
    // Given
    // -----
    // - A 4×8 matrix with smoothly varying columns, a path graph, k = 3.
    //
    // Expect
    // ------
    // - Exactly 3 labels, each covering a consecutive index range.
    fn ward_respects_path_connectivity() {
        // Arrange
        let p = 8;
        let x = Array2::from_shape_fn((4, p), |(i, j)| (i as f64 + 1.0) * (j as f64).sin());
        let graph = path_graph(p);

        // Act
        let labels = cluster_features(&x.view(), 3, Some(&graph)).expect("feasible clustering");

        // Assert
        let n_labels = labels.iter().max().copied().unwrap_or(0) + 1;
        assert_eq!(n_labels, 3);
        for label in 0..n_labels {
            let members: Vec<usize> =
                (0..p).filter(|&j| labels[j] == label).collect();
            assert!(!members.is_empty(), "label {label} has no members");
            let lo = members[0];
            let hi = members[members.len() - 1];
            assert_eq!(
                hi - lo + 1,
                members.len(),
                "label {label} is not contiguous under the path constraint: {members:?}"
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that labels are numbered by first appearance, so feature 0
    // always carries label 0.
    //
    // Given
    // -----
    // - Any feasible clustering request.
    //
    // Expect
    // ------
    // - `labels[0] == 0` and the label set is contiguous.
    fn ward_labels_are_first_occurrence_ordered() {
        // Arrange
        let x = two_close_one_far();

        // Act
        let labels = cluster_features(&x.view(), 2, None).expect("feasible clustering");

        // Assert
        assert_eq!(labels[0], 0);
        let mut seen: Vec<usize> = labels.to_vec();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen, vec![0, 1]);
    }

    #[test]
    // Purpose
    // -------
    // Verify that a graph with more components than clusters is rejected up
    // front rather than looping forever.
    //
    // Given
    // -----
    // - Two disjoint edges over 4 features, k = 1.
    //
    // Expect
    // ------
    // - `ClusterError::DisconnectedGraph`.
    fn ward_rejects_unreachable_cluster_count() {
        // Arrange
        let x = Array2::from_shape_fn((2, 4), |(i, j)| (i * 4 + j) as f64);
        let graph = Connectivity::from_edges(4, &[(0, 1), (2, 3)]).expect("valid edges");

        // Act
        let result = cluster_features(&x.view(), 1, Some(&graph));

        // Assert
        assert_eq!(
            result,
            Err(ClusterError::DisconnectedGraph { requested: 1, n_components: 2 })
        );
    }
}
