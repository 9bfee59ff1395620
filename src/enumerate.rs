use std::rc::Rc;

use crate::condensed::CondensedMatrix;
use crate::node::Node;
use crate::split::split;
use crate::state::{Mode, State};

/// Walk the sweep parameter `alpha` across `[state.alpha_min,
/// state.alpha_max]`, calling `handler` once for every maximal sub-interval
/// over which the dendrogram produced by running linkage from scratch at
/// any `alpha` in that interval is the same shape.
///
/// This is a depth-first work-list walk, not recursion: each window is
/// split into sub-windows of constant winning merge, a merge is performed
/// in each sub-window's copy of the state, and the sub-windows are pushed
/// back onto the work list. A window is a leaf (handed to `handler`) once
/// only one cluster remains active.
///
/// To avoid allocating one `State` per leaf, the last sub-window produced
/// by a split reuses the parent `State` in place instead of cloning it;
/// only the other sub-windows are cloned.
pub fn enumerate(
    mode: Mode,
    initial: State,
    mut handler: impl FnMut(f64, f64, Rc<Node>),
) {
    let mut work = vec![initial];
    while let Some(mut st) = work.pop() {
        if st.active.len() <= 1 {
            handler(st.alpha_min, st.alpha_max, st.root());
            continue;
        }

        let windows = {
            let points = st.points;
            let low = CondensedMatrix::new(&mut st.dists_low, points);
            let high = CondensedMatrix::new(&mut st.dists_high, points);
            split(&low, &high, &st.active, st.alpha_min, st.alpha_max)
        };

        let last = windows.len().saturating_sub(1);
        for (i, (interval, (c1, c2), _lf)) in windows.into_iter().enumerate()
        {
            if i == last {
                st.alpha_min = interval.lb;
                st.alpha_max = interval.ub;
                st.merge(mode, c1, c2);
                work.push(st);
                break;
            }
            let mut child = st.clone();
            child.alpha_min = interval.lb;
            child.alpha_max = interval.ub;
            child.merge(mode, c1, c2);
            work.push(child);
        }
    }
}
