use std::rc::Rc;

use quickcheck::{Arbitrary, Gen};
use rand::Rng;

use crate::node::Node;

/// A pair of condensed pairwise dissimilarity matrices, of the same size,
/// with no accidental ties within either matrix.
///
/// Ties are avoided because several of this crate's invariants (which pair
/// the merge oracle picks, where the interval splitter places a boundary)
/// are only guaranteed up to the tie-break rule; generating matrices with
/// guaranteed-distinct values lets property tests check the underlying
/// math without also re-testing tie-breaking.
#[derive(Clone, Debug)]
pub struct DistinctMatrixPair {
    low: Vec<f64>,
    high: Vec<f64>,
    points: usize,
}

impl DistinctMatrixPair {
    /// Build a pair from two raw sequences, truncating both to the longest
    /// shared valid condensed-matrix length and forcing distinct values in
    /// each.
    pub fn new(mut low: Vec<f64>, mut high: Vec<f64>) -> DistinctMatrixPair {
        make_distinct(&mut low);
        make_distinct(&mut high);

        let len = low.len().min(high.len());
        low.truncate(len);
        high.truncate(len);

        let mut n = points_for(len);
        let mut valid_len = (n * n.saturating_sub(1)) / 2;
        while valid_len > len {
            n -= 1;
            valid_len = (n * n.saturating_sub(1)) / 2;
        }
        low.truncate(valid_len);
        high.truncate(valid_len);

        for v in low.iter_mut().chain(high.iter_mut()) {
            if v.is_nan() {
                *v = 0.0;
            }
        }

        DistinctMatrixPair { low, high, points: n }
    }

    /// The number of points the matrices describe.
    pub fn points(&self) -> usize {
        self.points
    }

    /// A copy of the low-endpoint condensed matrix.
    pub fn low(&self) -> Vec<f64> {
        self.low.clone()
    }

    /// A copy of the high-endpoint condensed matrix.
    pub fn high(&self) -> Vec<f64> {
        self.high.clone()
    }

    /// Build one leaf `Node` per point, alternating between two
    /// ground-truth classes.
    pub fn leaves(&self) -> Vec<Rc<Node>> {
        (0..self.points)
            .map(|i| Rc::new(Node::leaf(i, i % 2, 2)))
            .collect()
    }
}

impl Arbitrary for DistinctMatrixPair {
    fn arbitrary(_g: &mut Gen) -> DistinctMatrixPair {
        let mut rng = rand::thread_rng();
        let size = rng.gen_range(2..12);
        let len = (size * (size - 1)) / 2;
        let low: Vec<f64> =
            (0..len).map(|_| rng.gen_range(-0.5..=0.5)).collect();
        let high: Vec<f64> =
            (0..len).map(|_| rng.gen_range(-0.5..=0.5)).collect();
        DistinctMatrixPair::new(low, high)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = DistinctMatrixPair>> {
        let high = self.high.clone();
        Box::new(
            self.low
                .shrink()
                .map(move |low| DistinctMatrixPair::new(low, high.clone())),
        )
    }
}

/// Mutate `xs` in place such that all of its elements are distinct, without
/// disturbing the relative order of values that were already distinct.
///
/// Walks the values from smallest to largest, keeping a running floor: any
/// value that doesn't clear the floor (a tie or an out-of-order duplicate)
/// is pushed to `floor + 1.0` instead. Every tie in the input becomes a
/// run of consecutive integers above whatever value they tied, so no two
/// elements of `xs` end up equal.
fn make_distinct(xs: &mut [f64]) {
    if xs.is_empty() {
        return;
    }
    let mut order: Vec<usize> = (0..xs.len()).collect();
    order.sort_by(|&a, &b| xs[a].partial_cmp(&xs[b]).unwrap());

    let mut floor = xs[order[0]];
    for &i in &order[1..] {
        if xs[i] <= floor {
            xs[i] = floor + 1.0;
        }
        floor = xs[i];
    }
}

/// An upper bound on the number of points describable by a condensed
/// matrix of the given length.
fn points_for(condensed_len: usize) -> usize {
    ((condensed_len as f64) * 2.0).sqrt().ceil() as usize
}
