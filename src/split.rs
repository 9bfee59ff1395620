use crate::active::Active;
use crate::condensed::CondensedMatrix;
use crate::oracle::nearest_merge;
use crate::state::{Interval, LinearFunction, MergeCandidate};

/// Find the smallest `alpha` in `(alpha_start, alpha_end]` at which some
/// active pair's interpolated dissimilarity crosses `current`'s.
///
/// `current` is the linear function of the pair presently winning the
/// merge race. Every other active pair is checked for an intersection with
/// `current`; the nearest one is the next point at which the winning pair
/// can change. Ties among simultaneous crossings are broken the same way
/// `nearest_merge` breaks ties (smaller slope, then lexicographically
/// smaller pair), since the actual identity of the new winner at that
/// boundary is always re-derived from a fresh oracle call in `split`, not
/// from this tie-break — this one only needs to agree on *where* the
/// boundary falls.
fn nearest_intersection(
    low: &CondensedMatrix<'_>,
    high: &CondensedMatrix<'_>,
    active: &Active,
    current: &LinearFunction,
    alpha_start: f64,
    alpha_end: f64,
) -> Option<f64> {
    let members = active.to_vec();
    let mut best: Option<(f64, MergeCandidate, LinearFunction)> = None;

    for (i, &p) in members.iter().enumerate() {
        for &q in &members[i + 1..] {
            let lf = LinearFunction::interpolating(low[[p, q]], high[[p, q]]);
            let alpha = match current.intersection_with(&lf) {
                Some(alpha) => alpha,
                None => continue,
            };
            if alpha <= alpha_start || alpha > alpha_end {
                continue;
            }
            let candidate = (alpha, (p, q), lf);
            let replace = match &best {
                None => true,
                Some((best_alpha, best_pair, best_lf)) => {
                    alpha < *best_alpha
                        || (alpha == *best_alpha && lf.a < best_lf.a)
                        || (alpha == *best_alpha
                            && lf.a == best_lf.a
                            && (p, q) < *best_pair)
                }
            };
            if replace {
                best = Some(candidate);
            }
        }
    }
    best.map(|(alpha, ..)| alpha)
}

/// Split the window `[alpha_min, alpha_max]` into sub-intervals over which
/// the winning merge candidate (the pair linkage would merge next) does
/// not change.
///
/// The returned intervals tile `[alpha_min, alpha_max]` with no gaps or
/// overlaps: the first interval starts at `alpha_min`, each subsequent
/// interval starts where the previous one ends, and the last ends at
/// `alpha_max`.
///
/// Returns an empty vector when fewer than two clusters are active (no
/// merge is possible).
pub fn split(
    low: &CondensedMatrix<'_>,
    high: &CondensedMatrix<'_>,
    active: &Active,
    alpha_min: f64,
    alpha_max: f64,
) -> Vec<(Interval, MergeCandidate, LinearFunction)> {
    let (lower_pair, lower_lf, _) =
        match nearest_merge(low, high, active, alpha_min) {
            Some(x) => x,
            None => return vec![],
        };
    let (upper_pair, _, _) =
        nearest_merge(low, high, active, alpha_max).unwrap();

    if lower_pair == upper_pair {
        return vec![(
            Interval { lb: alpha_min, ub: alpha_max },
            lower_pair,
            lower_lf,
        )];
    }

    let mut windows = Vec::new();
    let mut start = alpha_min;
    let mut current_pair = lower_pair;
    let mut current_lf = lower_lf;

    loop {
        match nearest_intersection(
            low, high, active, &current_lf, start, alpha_max,
        ) {
            Some(crossing) => {
                windows.push((
                    Interval { lb: start, ub: crossing },
                    current_pair,
                    current_lf,
                ));
                start = crossing;
                if start >= alpha_max {
                    break;
                }
                // Re-derive the winner at the boundary from the oracle
                // itself rather than trusting which pair `nearest_intersection`
                // happened to cross with: when three or more pairs cross
                // at the same alpha, only a full rescan applies the
                // complete tie-break order.
                let (next_pair, next_lf, _) =
                    nearest_merge(low, high, active, start).unwrap();
                current_pair = next_pair;
                current_lf = next_lf;
            }
            None => {
                windows.push((
                    Interval { lb: start, ub: alpha_max },
                    current_pair,
                    current_lf,
                ));
                break;
            }
        }
    }
    windows
}
