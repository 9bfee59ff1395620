use std::rc::Rc;

/// A node in a dendrogram.
///
/// Leaves correspond to the original points being clustered; internal nodes
/// correspond to merges performed by the enumerator. Every node carries a
/// `counts` vector recording, for each ground-truth class, how many of the
/// points in its subtree belong to that class. This is the only piece of
/// information the cost evaluators (`majority_cost`, `hamming_cost`) need,
/// so it is computed once at construction time rather than recomputed on
/// every query.
///
/// Nodes are shared via `Rc` across the sibling branches the enumerator
/// produces while walking the same `[0, 1]` sweep: a subtree that is
/// untouched by a merge at some α is the very same `Rc<Node>` in every
/// dendrogram that contains it, not a copy.
#[derive(Debug)]
pub enum Node {
    /// A single original point.
    Leaf {
        /// The point's index in the input dataset.
        point: usize,
        /// A one-hot count vector: `counts[label] == 1`, all else `0`.
        counts: Vec<u32>,
    },
    /// The result of merging two clusters.
    Internal {
        /// The left child, by convention the child with the smaller
        /// minimum point index.
        left: Rc<Node>,
        /// The right child.
        right: Rc<Node>,
        /// The elementwise sum of the children's count vectors.
        counts: Vec<u32>,
    },
}

impl Node {
    /// Build a leaf node for `point`, belonging to ground-truth class
    /// `label`, out of `num_classes` total classes.
    pub fn leaf(point: usize, label: usize, num_classes: usize) -> Node {
        let mut counts = vec![0u32; num_classes];
        counts[label] += 1;
        Node::Leaf { point, counts }
    }

    /// Merge two subtrees into a new internal node.
    ///
    /// The child with the smaller minimum point index becomes `left`, so
    /// that two dendrograms built from the same merge sequence in either
    /// order compare equal under `Node::same_shape`.
    pub fn merge(a: Rc<Node>, b: Rc<Node>) -> Node {
        let (left, right) = if a.min_point() <= b.min_point() {
            (a, b)
        } else {
            (b, a)
        };
        let counts = sum_counts(left.counts(), right.counts());
        Node::Internal { left, right, counts }
    }

    /// The per-class count vector for this subtree.
    pub fn counts(&self) -> &[u32] {
        match *self {
            Node::Leaf { ref counts, .. } => counts,
            Node::Internal { ref counts, .. } => counts,
        }
    }

    /// The total number of points in this subtree.
    pub fn size(&self) -> u32 {
        self.counts().iter().sum()
    }

    /// The smallest original point index contained in this subtree.
    ///
    /// Used only to give merges a canonical left/right orientation.
    fn min_point(&self) -> usize {
        match *self {
            Node::Leaf { point, .. } => point,
            Node::Internal { ref left, .. } => left.min_point(),
        }
    }

    /// True if this node has no children.
    pub fn is_leaf(&self) -> bool {
        matches!(*self, Node::Leaf { .. })
    }

    /// Compare two dendrograms for structural (not merely count-vector)
    /// equality: same tree shape, same leaf points at the same positions.
    ///
    /// Used by the merge-stability property test to check that a
    /// from-scratch run at some α inside an emitted interval reconstructs
    /// the same dendrogram the enumerator produced for that interval.
    pub fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (
                Node::Leaf { point: p1, .. },
                Node::Leaf { point: p2, .. },
            ) => p1 == p2,
            (
                Node::Internal { left: l1, right: r1, .. },
                Node::Internal { left: l2, right: r2, .. },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }
}

fn sum_counts(a: &[u32], b: &[u32]) -> Vec<u32> {
    a.iter().zip(b.iter()).map(|(x, y)| x + y).collect()
}
