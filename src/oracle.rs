use crate::active::Active;
use crate::condensed::CondensedMatrix;
use crate::state::{LinearFunction, MergeCandidate};

/// Scan every active pair and find the one with the smallest interpolated
/// dissimilarity at `alpha`, i.e. the pair linkage would merge next.
///
/// Ties are broken, in order: smaller interpolated distance; then smaller
/// slope (the pair whose dissimilarity grows slower as `alpha` increases is
/// preferred, since it will likely remain the minimum longer); then
/// lexicographically smaller `(c1, c2)`.
///
/// Returns `None` when fewer than two clusters are active.
pub fn nearest_merge(
    low: &CondensedMatrix<'_>,
    high: &CondensedMatrix<'_>,
    active: &Active,
    alpha: f64,
) -> Option<(MergeCandidate, LinearFunction, f64)> {
    let members = active.to_vec();
    let mut best: Option<(MergeCandidate, LinearFunction, f64)> = None;

    for (i, &p) in members.iter().enumerate() {
        for &q in &members[i + 1..] {
            let lf = LinearFunction::interpolating(low[[p, q]], high[[p, q]]);
            let dist = lf.at(alpha);
            let candidate = ((p, q), lf, dist);
            best = Some(match best {
                None => candidate,
                Some(current) if is_better(&candidate, &current) => {
                    candidate
                }
                Some(current) => current,
            });
        }
    }
    best
}

fn is_better(
    candidate: &(MergeCandidate, LinearFunction, f64),
    current: &(MergeCandidate, LinearFunction, f64),
) -> bool {
    let (cand_pair, cand_lf, cand_dist) = candidate;
    let (cur_pair, cur_lf, cur_dist) = current;
    if cand_dist != cur_dist {
        return cand_dist < cur_dist;
    }
    if cand_lf.a != cur_lf.a {
        return cand_lf.a < cur_lf.a;
    }
    cand_pair < cur_pair
}
