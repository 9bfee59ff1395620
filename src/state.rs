use std::rc::Rc;

use crate::active::Active;
use crate::condensed::CondensedMatrix;
use crate::linkage_update::{merge_avg, merge_max, merge_min};
use crate::node::Node;

/// The three linkage criteria this crate knows how to interpolate between.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LinkageKind {
    /// Minimum pairwise dissimilarity between two clusters.
    Single,
    /// Maximum pairwise dissimilarity between two clusters.
    Complete,
    /// Size-weighted mean pairwise dissimilarity between two clusters.
    Average,
}

impl LinkageKind {
    /// Update `dists` in place after merging `dying` into `survivor`,
    /// according to this linkage rule.
    ///
    /// `sizes` must be `Some` when this is `LinkageKind::Average`; the
    /// other two rules don't need cluster sizes.
    pub fn merge(
        &self,
        dists: &mut CondensedMatrix<'_>,
        active: &Active,
        survivor: usize,
        dying: usize,
        sizes: Option<(usize, usize)>,
    ) {
        match *self {
            LinkageKind::Single => merge_min(dists, active, survivor, dying),
            LinkageKind::Complete => {
                merge_max(dists, active, survivor, dying)
            }
            LinkageKind::Average => {
                let (sa, sb) = sizes.expect("average linkage needs sizes");
                merge_avg(dists, active, survivor, dying, sa, sb)
            }
        }
    }
}

/// Which pair of linkage rules (or raw distance matrices) the sweep
/// interpolates between.
///
/// The naming follows the convention of naming the `alpha = 0` endpoint
/// first: `SingleComplete` means single linkage at `alpha = 0`, complete
/// linkage at `alpha = 1`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Interpolates between single and complete linkage.
    SingleComplete,
    /// Interpolates between single and average linkage.
    SingleAverage,
    /// Interpolates between average and complete linkage.
    AverageComplete,
    /// Interpolates between two caller-supplied distance matrices, both
    /// updated with single linkage as clusters merge.
    RawPair,
}

impl Mode {
    /// The linkage rule governing the `alpha = 0` distance matrix.
    pub fn low_kind(&self) -> LinkageKind {
        match *self {
            Mode::SingleComplete | Mode::SingleAverage => LinkageKind::Single,
            Mode::AverageComplete => LinkageKind::Average,
            Mode::RawPair => LinkageKind::Single,
        }
    }

    /// The linkage rule governing the `alpha = 1` distance matrix.
    pub fn high_kind(&self) -> LinkageKind {
        match *self {
            Mode::SingleComplete | Mode::AverageComplete => {
                LinkageKind::Complete
            }
            Mode::SingleAverage => LinkageKind::Average,
            Mode::RawPair => LinkageKind::Single,
        }
    }

    /// Whether either endpoint's linkage rule needs per-cluster sizes.
    pub fn needs_sizes(&self) -> bool {
        self.low_kind() == LinkageKind::Average
            || self.high_kind() == LinkageKind::Average
    }
}

/// A candidate merge: a pair of active cluster indices, `c1 < c2`.
pub type MergeCandidate = (usize, usize);

/// An affine function `a * alpha + b`, used to track how a merge
/// candidate's interpolated dissimilarity varies with `alpha`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFunction {
    /// The slope.
    pub a: f64,
    /// The intercept.
    pub b: f64,
}

impl LinearFunction {
    /// Build the linear function `(1 - alpha) * low + alpha * high`.
    pub fn interpolating(low: f64, high: f64) -> LinearFunction {
        LinearFunction { a: high - low, b: low }
    }

    /// Evaluate this function at `alpha`.
    pub fn at(&self, alpha: f64) -> f64 {
        self.a * alpha + self.b
    }

    /// The `alpha` at which this function and `other` cross.
    ///
    /// Returns `None` when the two lines are parallel (including when they
    /// are identical), since no single crossing point exists.
    pub fn intersection_with(&self, other: &LinearFunction) -> Option<f64> {
        let da = self.a - other.a;
        if da == 0.0 {
            return None;
        }
        Some((other.b - self.b) / da)
    }
}

/// A half-open interval of the sweep parameter, `[lb, ub)`, except for the
/// final interval of a sweep which closes at `ub = 1.0` inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    /// The lower bound.
    pub lb: f64,
    /// The upper bound.
    pub ub: f64,
}

/// The state of a parametric-linkage sweep over a window `[alpha_min,
/// alpha_max]` of the `[0, 1]` parameter.
///
/// This collapses the three tagged state variants of the system this crate
/// is modeled on (one state shape per interpolation mode) into a single
/// record: `sizes` is `Some` exactly when the active `Mode` needs
/// per-cluster sizes for at least one of its two linkage rules, and `None`
/// otherwise.
#[derive(Clone, Debug)]
pub struct State {
    /// The lower bound of this state's window.
    pub alpha_min: f64,
    /// The upper bound of this state's window.
    pub alpha_max: f64,
    /// The condensed dissimilarity matrix governing the `alpha = 0`
    /// endpoint of this window, evolved by merges performed so far.
    pub dists_low: Vec<f64>,
    /// The condensed dissimilarity matrix governing the `alpha = 1`
    /// endpoint of this window.
    pub dists_high: Vec<f64>,
    /// The clusters still alive in this state.
    pub active: Active,
    /// Per-cluster size, present only when the sweep's mode needs it.
    pub sizes: Option<Vec<usize>>,
    /// The dendrogram node built for each cluster index so far, shared by
    /// `Rc` across sibling states produced from the same ancestor.
    pub nodes: Vec<Option<Rc<Node>>>,
    /// The number of original points.
    pub points: usize,
}

impl State {
    /// Build the initial state for a sweep over all of `[0, 1]`.
    pub fn initial(
        dists_low: Vec<f64>,
        dists_high: Vec<f64>,
        leaves: Vec<Rc<Node>>,
        mode: Mode,
    ) -> State {
        let points = leaves.len();
        State {
            alpha_min: 0.0,
            alpha_max: 1.0,
            dists_low,
            dists_high,
            active: Active::with_len(points),
            sizes: if mode.needs_sizes() {
                Some(vec![1; points])
            } else {
                None
            },
            nodes: leaves.into_iter().map(Some).collect(),
            points,
        }
    }

    /// Borrow the `alpha = 0` distance matrix for 2-dimensional indexing.
    pub fn low_matrix(&mut self) -> CondensedMatrix<'_> {
        CondensedMatrix::new(&mut self.dists_low, self.points)
    }

    /// Borrow the `alpha = 1` distance matrix for 2-dimensional indexing.
    pub fn high_matrix(&mut self) -> CondensedMatrix<'_> {
        CondensedMatrix::new(&mut self.dists_high, self.points)
    }

    /// Apply the merge of `survivor` and `dying` to both distance
    /// matrices, the node table, and (if present) the size table, then
    /// remove `dying` from `active`.
    ///
    /// `c1` and `c2` need not be ordered; the merged node always ends up
    /// at `min(c1, c2)`, matching the convention used throughout the
    /// system this is modeled on (the lower index survives).
    pub fn merge(&mut self, mode: Mode, c1: usize, c2: usize) {
        let (survivor, dying) = (c1.min(c2), c1.max(c2));
        let sizes = self
            .sizes
            .as_ref()
            .map(|s| (s[survivor], s[dying]));

        {
            let active = self.active.clone();
            let mut low = self.low_matrix();
            mode.low_kind().merge(&mut low, &active, survivor, dying, sizes);
        }
        {
            let active = self.active.clone();
            let mut high = self.high_matrix();
            mode.high_kind().merge(
                &mut high, &active, survivor, dying, sizes,
            );
        }
        if let Some(ref mut sizes) = self.sizes {
            sizes[survivor] += sizes[dying];
        }
        let left = self.nodes[dying].take().expect("dying cluster has a node");
        let right =
            self.nodes[survivor].take().expect("survivor cluster has a node");
        self.nodes[survivor] = Some(Rc::new(Node::merge(left, right)));
        self.active.remove(dying);
    }

    /// The single surviving cluster's node, once `active.len() == 1`.
    pub fn root(&self) -> Rc<Node> {
        let last = self.active.iter().next().expect("state has no clusters");
        self.nodes[last].clone().expect("surviving cluster has a node")
    }
}
