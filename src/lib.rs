/*!
This crate enumerates the dendrograms produced by agglomerative
hierarchical clustering as a linkage criterion is swept continuously
between two endpoints, rather than fixed at a single choice.

Ordinary hierarchical clustering (see, for example, the
[`kodama`](https://crates.io/crates/kodama) crate) picks one linkage
criterion — single, complete, average, and so on — up front and produces
one dendrogram. Here, the dissimilarity between two clusters is itself a
function of a parameter `alpha` in `[0, 1]`:

```text
d_alpha(a, b) = (1 - alpha) * d_low(a, b) + alpha * d_high(a, b)
```

where `d_low` and `d_high` are two dissimilarities computed according to
two different rules (or, in [`Mode::RawPair`], two entirely different
caller-supplied matrices). As `alpha` sweeps from `0` to `1`, the
dendrogram that greedy linkage would produce changes only finitely often.
[`enumerate_points`] and [`enumerate_distances`] report every maximal
`alpha`-interval over which that dendrogram has a constant shape, handing
each one to a callback along with its root [`Node`].

# Example

```
use alphalink::{enumerate_points, Metric, Mode};

let points = vec![
    vec![0.0, 0.0],
    vec![0.1, 0.0],
    vec![5.0, 5.0],
    vec![5.1, 5.0],
];
let labels = vec![0, 0, 1, 1];

let mut intervals = Vec::new();
alphalink::enumerate_points(
    Mode::SingleComplete,
    Metric::Euclidean,
    false,
    &points,
    &labels,
    |lb, ub, _root| intervals.push((lb, ub)),
).unwrap();

assert!(!intervals.is_empty());
assert_eq!(intervals.first().unwrap().0, 0.0);
assert_eq!(intervals.last().unwrap().1, 1.0);
```

# Evaluating a sweep against ground truth

Once a dendrogram is in hand, [`majority_cost`] and [`hamming_cost`]
measure how well pruning it into `k` clusters recovers the ground-truth
labels passed to `enumerate_points`/`enumerate_distances`.
*/

#![deny(missing_docs)]

mod active;
mod condensed;
mod csv_input;
mod enumerate;
mod error;
mod hungarian;
mod linkage_update;
mod node;
mod oracle;
mod plain;
mod prune;
mod seed;
mod split;
mod state;
#[cfg(test)]
mod test_support;

use std::rc::Rc;

pub use crate::csv_input::{read_labeled_points, LabeledPoint};
pub use crate::error::{Error, Result};
pub use crate::node::Node;
pub use crate::prune::{hamming_cost, majority_cost};
pub use crate::seed::{cosine_dists, euclidean_dists};
pub use crate::state::{
    Interval, LinearFunction, LinkageKind, MergeCandidate, Mode,
};

use crate::state::State;

/// Which distance function seeds a condensed dissimilarity matrix from
/// feature vectors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Metric {
    /// Ordinary Euclidean distance.
    Euclidean,
    /// The arc-cosine of the cosine similarity between two vectors.
    Cosine,
}

/// Enumerate the maximal `alpha`-intervals of constant dendrogram shape
/// for a dataset of feature vectors, interpolating between the two
/// linkage rules named by `mode`.
///
/// `metric` and `normalize` control how the condensed dissimilarity
/// matrix is seeded from `points` (see [`euclidean_dists`] and
/// [`cosine_dists`]); the same seeded matrix is used for both the `alpha
/// = 0` and `alpha = 1` endpoints, since only the *linkage rule* differs
/// between them, not the base dissimilarities.
///
/// `labels` assigns each point a ground-truth class, used only by
/// [`majority_cost`]/[`hamming_cost`] on the dendrograms this produces,
/// never by the clustering itself. `handler` is called once per interval
/// with its lower bound, upper bound, and dendrogram root.
pub fn enumerate_points(
    mode: Mode,
    metric: Metric,
    normalize: bool,
    points: &[Vec<f64>],
    labels: &[usize],
    handler: impl FnMut(f64, f64, Rc<Node>),
) -> Result<()> {
    if points.len() != labels.len() {
        return Err(Error::LabelCountMismatch {
            points: points.len(),
            labels: labels.len(),
        });
    }
    let dists = match metric {
        Metric::Euclidean => euclidean_dists(points, normalize)?,
        Metric::Cosine => cosine_dists(points, normalize)?,
    };
    run(dists.clone(), dists, mode, labels, handler)
}

/// Enumerate the maximal `alpha`-intervals of constant dendrogram shape,
/// interpolating directly between two caller-supplied condensed
/// dissimilarity matrices.
///
/// Use this when the two endpoints aren't "the same base distances under
/// two linkage rules" but genuinely different distance matrices (for
/// example, two different feature representations of the same points).
/// Both matrices are evolved with single linkage as clusters merge.
pub fn enumerate_distances(
    d0: Vec<f64>,
    d1: Vec<f64>,
    labels: &[usize],
    handler: impl FnMut(f64, f64, Rc<Node>),
) -> Result<()> {
    if d0.len() != d1.len() {
        return Err(Error::DimensionMismatch {
            expected: d0.len(),
            found: d1.len(),
            row: 0,
        });
    }
    run(d0, d1, Mode::RawPair, labels, handler)
}

fn run(
    dists_low: Vec<f64>,
    dists_high: Vec<f64>,
    mode: Mode,
    labels: &[usize],
    handler: impl FnMut(f64, f64, Rc<Node>),
) -> Result<()> {
    if labels.is_empty() {
        return Err(Error::EmptyLabelSet);
    }
    let points = labels.len();
    if points < 2 {
        return Err(Error::TooFewPoints { points });
    }
    let num_classes = labels.iter().copied().max().unwrap() + 1;
    let leaves = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| Rc::new(Node::leaf(i, label, num_classes)))
        .collect();
    let state = State::initial(dists_low, dists_high, leaves, mode);
    enumerate::enumerate(mode, state, handler);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_points_tiles_unit_interval() {
        let points = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
        ];
        let labels = vec![0, 0, 1, 1];

        let mut intervals = Vec::new();
        enumerate_points(
            Mode::SingleComplete,
            Metric::Euclidean,
            false,
            &points,
            &labels,
            |lb, ub, _root| intervals.push((lb, ub)),
        )
        .unwrap();

        intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        assert_eq!(intervals.first().unwrap().0, 0.0);
        assert_eq!(intervals.last().unwrap().1, 1.0);
        for pair in intervals.windows(2) {
            assert!((pair[0].1 - pair[1].0).abs() < 1e-9);
        }
    }

    #[test]
    fn enumerate_points_rejects_label_mismatch() {
        let points = vec![vec![0.0], vec![1.0]];
        let labels = vec![0];
        let err = enumerate_points(
            Mode::SingleComplete,
            Metric::Euclidean,
            false,
            &points,
            &labels,
            |_, _, _| {},
        );
        assert!(err.is_err());
    }

    #[test]
    fn enumerate_distances_raw_pair() {
        let d0 = vec![0.1, 5.0, 5.0];
        let d1 = vec![5.0, 5.0, 0.1];
        let labels = vec![0, 0, 1];
        let mut roots = Vec::new();
        enumerate_distances(d0, d1, &labels, |lb, ub, root| {
            roots.push((lb, ub, root));
        })
        .unwrap();
        assert!(!roots.is_empty());
        for (_, _, root) in &roots {
            assert_eq!(root.size(), 3);
        }
    }

    /// The set of original point indices under a subtree, used by the
    /// scenario tests below to check which pair of points merged first
    /// without depending on internal merge order bookkeeping.
    fn leaf_points(node: &Node) -> Vec<usize> {
        match node {
            Node::Leaf { point, .. } => vec![*point],
            Node::Internal { left, right, .. } => {
                let mut pts = leaf_points(left);
                pts.extend(leaf_points(right));
                pts.sort_unstable();
                pts
            }
        }
    }

    #[test]
    fn s1_trivial_two_points() {
        let labels = vec![0, 1];
        let d0 = vec![1.0];
        let d1 = vec![1.0];
        let mut intervals = Vec::new();
        let mut root = None;
        enumerate_distances(d0, d1, &labels, |lb, ub, r| {
            intervals.push((lb, ub));
            root = Some(r);
        })
        .unwrap();
        assert_eq!(intervals, vec![(0.0, 1.0)]);
        let root = root.unwrap();
        assert_eq!(leaf_points(&root), vec![0, 1]);
        // pruned back to one cluster per original point, each already
        // matches its own ground-truth label exactly.
        assert_eq!(majority_cost(&root, 2).unwrap(), 0.0);
        assert_eq!(hamming_cost(&root, 2).unwrap(), 0.0);
    }

    #[test]
    fn s2_single_switch_three_points() {
        // A=0, B=1, C=3 on the line: d0 is ordinary distance, d1 swaps the
        // roles of B and C.
        let labels = vec![0, 1, 2];
        // condensed order for 3 points: (A,B), (A,C), (B,C)
        let d0 = vec![1.0, 3.0, 2.0];
        let d1 = vec![2.0, 1.0, 3.0];

        let mut regions = Vec::new();
        enumerate_distances(d0, d1, &labels, |lb, ub, root| {
            regions.push((lb, ub, root));
        })
        .unwrap();
        regions.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        // crossing point of (1-alpha)*1+alpha*2 and (1-alpha)*3+alpha*1
        let expected_crossing = 2.0 / 3.0;
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].0, 0.0);
        assert!((regions[0].1 - expected_crossing).abs() < 1e-9);
        assert_eq!(regions[1].1, 1.0);

        // first interval: A and B merge before C joins.
        let first_merge = match regions[0].2.as_ref() {
            Node::Internal { left, right, .. } => {
                if left.is_leaf() { leaf_points(right) } else { leaf_points(left) }
            }
            Node::Leaf { .. } => panic!("expected internal root"),
        };
        assert_eq!(first_merge, vec![0, 1]);

        // second interval: A and C merge before B joins.
        let second_merge = match regions[1].2.as_ref() {
            Node::Internal { left, right, .. } => {
                if left.is_leaf() { leaf_points(right) } else { leaf_points(left) }
            }
            Node::Leaf { .. } => panic!("expected internal root"),
        };
        assert_eq!(second_merge, vec![0, 2]);
    }

    #[test]
    fn s3_average_complete_rectangle_has_multiple_regimes() {
        // A 1x3 rectangle: the short edges and the diagonals have
        // different lengths, so average and complete linkage disagree
        // about which pair of clusters is closest at some point in the
        // sweep.
        let points = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![3.0, 0.0],
            vec![3.0, 1.0],
        ];
        let labels = vec![0, 0, 1, 1];
        let mut intervals = Vec::new();
        enumerate_points(
            Mode::AverageComplete,
            Metric::Euclidean,
            false,
            &points,
            &labels,
            |lb, ub, _root| intervals.push((lb, ub)),
        )
        .unwrap();
        assert!(intervals.len() >= 2);
        intervals.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        assert_eq!(intervals.first().unwrap().0, 0.0);
        assert_eq!(intervals.last().unwrap().1, 1.0);
        for pair in intervals.windows(2) {
            assert!((pair[0].1 - pair[1].0).abs() < 1e-9);
        }
    }

    #[test]
    fn s5_hamming_exceeds_majority_when_two_subtrees_share_a_majority_class() {
        // Two 3-point subtrees, each 2 of class 0 and 1 of class 1.
        // Majority-cost labels both subtrees "class 0" for free, paying
        // only for each subtree's single minority point. Hamming cost
        // must assign the two clusters distinct labels (only 2 classes
        // exist, so there's no padding slack), forcing one cluster to
        // take the worse label.
        let left = Rc::new(Node::merge(
            Rc::new(Node::merge(
                Rc::new(Node::leaf(0, 0, 2)),
                Rc::new(Node::leaf(1, 0, 2)),
            )),
            Rc::new(Node::leaf(2, 1, 2)),
        ));
        let right = Rc::new(Node::merge(
            Rc::new(Node::merge(
                Rc::new(Node::leaf(3, 0, 2)),
                Rc::new(Node::leaf(4, 0, 2)),
            )),
            Rc::new(Node::leaf(5, 1, 2)),
        ));
        let root = Node::merge(left, right);

        let majority = majority_cost(&root, 2).unwrap();
        let hamming = hamming_cost(&root, 2).unwrap();
        assert!(hamming > majority);
    }

    #[test]
    fn s4_pruning_recovers_a_perfect_three_way_split() {
        // Three classes, two leaves each: {0,3} class 0, {1,4} class 1,
        // {2,5} class 2. However the tree is shaped, pruning to k=3 at
        // the three pair-nodes gives each cluster a single ground-truth
        // class, so the best k=3 pruning has majority_cost zero.
        let pair0 = Rc::new(Node::merge(
            Rc::new(Node::leaf(0, 0, 3)),
            Rc::new(Node::leaf(3, 0, 3)),
        ));
        let pair1 = Rc::new(Node::merge(
            Rc::new(Node::leaf(1, 1, 3)),
            Rc::new(Node::leaf(4, 1, 3)),
        ));
        let pair2 = Rc::new(Node::merge(
            Rc::new(Node::leaf(2, 2, 3)),
            Rc::new(Node::leaf(5, 2, 3)),
        ));
        let root = Node::merge(pair0, Rc::new(Node::merge(pair1, pair2)));

        assert_eq!(majority_cost(&root, 3).unwrap(), 0.0);
    }

    #[test]
    fn s6_tie_break_by_slope_moves_the_boundary_to_one_half() {
        // (0,1) and (1,2) both cost exactly 3.0 at alpha=0.5, but (0,1)'s
        // cost is constant while (1,2)'s falls from 5 to 1 as alpha
        // grows; (0,1) wins for alpha<0.5, and the tie at alpha=0.5 goes
        // to (1,2) under the smaller-slope rule, matching its win for
        // alpha>0.5.
        let labels = vec![0, 1, 2];
        let d0 = vec![3.0, 9.0, 5.0];
        let d1 = vec![3.0, 9.0, 1.0];

        let mut regions = Vec::new();
        enumerate_distances(d0, d1, &labels, |lb, ub, root| {
            regions.push((lb, ub, root));
        })
        .unwrap();
        regions.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        assert_eq!(regions[0].0, 0.0);
        assert!((regions[0].1 - 0.5).abs() < 1e-9);

        let first_merge = match regions[0].2.as_ref() {
            Node::Internal { left, right, .. } => {
                if left.is_leaf() { leaf_points(right) } else { leaf_points(left) }
            }
            Node::Leaf { .. } => panic!("expected internal root"),
        };
        assert_eq!(first_merge, vec![0, 1]);
    }

    #[test]
    fn end_to_end_majority_cost_is_zero_for_separable_clusters() {
        let points = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![5.0, 5.0],
            vec![5.1, 5.0],
        ];
        let labels = vec![0, 0, 1, 1];
        let mut last_root = None;
        enumerate_points(
            Mode::SingleComplete,
            Metric::Euclidean,
            false,
            &points,
            &labels,
            |_, _, root| last_root = Some(root),
        )
        .unwrap();
        let root = last_root.unwrap();
        assert_eq!(majority_cost(&root, 2).unwrap(), 0.0);
        assert_eq!(hamming_cost(&root, 2).unwrap(), 0.0);
    }
}
