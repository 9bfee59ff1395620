use std::rc::Rc;

use crate::condensed::CondensedMatrix;
use crate::node::Node;
use crate::oracle::nearest_merge;
use crate::state::{Mode, State};

/// Run linkage from scratch at a single fixed `alpha`: repeatedly merge
/// the globally nearest active pair until one cluster remains.
///
/// This mirrors the "naive" reference style used elsewhere in systems like
/// this one (rescan every active pair for the minimum each step, with no
/// persistent priority queue), but does so over the *pair* of distance
/// matrices this crate's merge rule maintains rather than a single fixed
/// matrix, since `mode`'s two linkage rules evolve independently after
/// every merge.
///
/// Used by tests to check that every `alpha` inside an interval the
/// enumerator reports reconstructs, up to tree shape, the dendrogram that
/// interval carries.
pub fn plain_linkage(
    dists_low: Vec<f64>,
    dists_high: Vec<f64>,
    leaves: Vec<Rc<Node>>,
    mode: Mode,
    alpha: f64,
) -> Rc<Node> {
    let mut state = State::initial(dists_low, dists_high, leaves, mode);
    while state.active.len() > 1 {
        let points = state.points;
        let (c1, c2) = {
            let low = CondensedMatrix::new(&mut state.dists_low, points);
            let high = CondensedMatrix::new(&mut state.dists_high, points);
            nearest_merge(&low, &high, &state.active, alpha)
                .expect("at least two active clusters")
                .0
        };
        state.merge(mode, c1, c2);
    }
    state.root()
}
