use crate::error::{Error, Result};
use crate::hungarian::min_cost_assignment;
use crate::node::Node;

/// The cost of representing a single cluster by its majority label:
/// every point not in the majority class is "wrong".
fn majority_single(counts: &[u32]) -> f64 {
    let total: u32 = counts.iter().sum();
    let max = counts.iter().copied().max().unwrap_or(0);
    (total - max) as f64
}

/// Dynamic-programming table of the minimum total majority-cost achievable
/// by pruning `node`'s subtree into exactly `j` clusters, for every `j`
/// from `1` up to `min(subtree size, max_k)`.
///
/// `table[j]` holds that minimum; `table[0]` is unused and left at
/// infinity. A leaf can only be pruned into `1` part (itself, cost `0`);
/// an internal node's `j`-way pruning combines a `left_j`-way pruning of
/// its left subtree with a `right_j = j - left_j`-way pruning of its
/// right, for every split of `j` that leaves both sides non-empty.
fn majority_table(node: &Node, max_k: usize) -> Vec<f64> {
    let size = node.size() as usize;
    let cap = max_k.min(size);
    let mut table = vec![f64::INFINITY; max_k + 1];
    if cap == 0 {
        return table;
    }
    table[1] = majority_single(node.counts());

    if let Node::Internal { left, right, .. } = node {
        let left_table = majority_table(left, max_k);
        let right_table = majority_table(right, max_k);
        for k in 2..=cap {
            let mut best = f64::INFINITY;
            for left_k in 1..k {
                let right_k = k - left_k;
                if left_k >= left_table.len() || right_k >= right_table.len()
                {
                    continue;
                }
                let candidate = left_table[left_k] + right_table[right_k];
                if candidate < best {
                    best = candidate;
                }
            }
            table[k] = best;
        }
    }
    table
}

/// The minimum fraction of points misclassified by labeling each of `k`
/// clusters, chosen by pruning `root`'s dendrogram, with its majority
/// ground-truth class.
///
/// Normalized by the total number of points, so the result is in
/// `[0, 1]`.
pub fn majority_cost(root: &Node, k: usize) -> Result<f64> {
    let size = root.size() as usize;
    if k == 0 || k > size {
        return Err(Error::InvalidK { k, points: size });
    }
    let table = majority_table(root, k);
    Ok(table[k] / size as f64)
}

/// Every way to prune `node`'s subtree into exactly `j` clusters, each
/// represented as the list of subtree roots making up that pruning.
///
/// This is exhaustive (not a dynamic program): unlike majority cost,
/// Hamming cost depends on a global bipartite matching between clusters
/// and labels, so the optimal pruning for a given `k` cannot be built up
/// from optimal sub-prunings of each child independently. Every candidate
/// pruning has to be scored on its own.
fn all_prunings(node: &Node, j: usize) -> Vec<Vec<&Node>> {
    let mut results = Vec::new();
    if j == 1 {
        results.push(vec![node]);
    }
    if let Node::Internal { left, right, .. } = node {
        for left_j in 1..j {
            let right_j = j - left_j;
            let left_options = all_prunings(left, left_j);
            let right_options = all_prunings(right, right_j);
            for lp in &left_options {
                for rp in &right_options {
                    let mut combined = lp.clone();
                    combined.extend(rp.iter().copied());
                    results.push(combined);
                }
            }
        }
    }
    results
}

/// Build the `r x s` mismatch-count matrix for a pruning: `cost[r][s]` is
/// the number of points in pruning-cluster `r` that are *not* of
/// ground-truth class `s`. Padded to a square matrix with zero-cost dummy
/// rows or columns when the number of clusters and number of classes
/// differ, so the assignment problem is always well-posed.
fn mismatch_matrix(pruning: &[&Node], num_classes: usize) -> Vec<Vec<f64>> {
    let dim = pruning.len().max(num_classes);
    let mut matrix = vec![vec![0.0; dim]; dim];
    for (r, node) in pruning.iter().enumerate() {
        let counts = node.counts();
        let total: u32 = counts.iter().sum();
        for s in 0..num_classes {
            matrix[r][s] = (total - counts[s]) as f64;
        }
    }
    matrix
}

/// The minimum fraction of points misclassified by assigning each of `k`
/// clusters, chosen by pruning `root`'s dendrogram, to its own
/// ground-truth class under an optimal one-to-one matching (no two
/// clusters may claim the same class unless there are more clusters than
/// classes).
///
/// Normalized by the total number of points, so the result is in
/// `[0, 1]`.
pub fn hamming_cost(root: &Node, k: usize) -> Result<f64> {
    let size = root.size() as usize;
    if k == 0 || k > size {
        return Err(Error::InvalidK { k, points: size });
    }
    let num_classes = root.counts().len();
    let prunings = all_prunings(root, k);
    let mut best = f64::INFINITY;
    for pruning in &prunings {
        let matrix = mismatch_matrix(pruning, num_classes);
        let (cost, _) = min_cost_assignment(&matrix);
        if cost < best {
            best = cost;
        }
    }
    Ok(best / size as f64)
}
