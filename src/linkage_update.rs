use crate::active::Active;
use crate::condensed::CondensedMatrix;

/// Update a dissimilarity matrix in place after merging `dying` into
/// `survivor`, using the single-linkage (minimum) rule.
///
/// For every other active cluster `x`, the new dissimilarity between `x`
/// and `survivor` is `min(d(x, survivor), d(x, dying))`. `dying` is left in
/// the matrix unmodified; the caller is responsible for removing it from
/// `active` once every rule that needs to read its row has done so.
pub fn merge_min(
    dists: &mut CondensedMatrix<'_>,
    active: &Active,
    survivor: usize,
    dying: usize,
) {
    for x in active.iter() {
        if x == survivor || x == dying {
            continue;
        }
        let a = pair(x, survivor);
        let b = pair(x, dying);
        let merged = dists[a].min(dists[b]);
        dists[pair(x, survivor)] = merged;
    }
}

/// Like [`merge_min`], but using the complete-linkage (maximum) rule.
pub fn merge_max(
    dists: &mut CondensedMatrix<'_>,
    active: &Active,
    survivor: usize,
    dying: usize,
) {
    for x in active.iter() {
        if x == survivor || x == dying {
            continue;
        }
        let a = pair(x, survivor);
        let b = pair(x, dying);
        let merged = dists[a].max(dists[b]);
        dists[pair(x, survivor)] = merged;
    }
}

/// Like [`merge_min`], but using the average-linkage (Lance-Williams
/// weighted mean, weighted by cluster size) rule.
pub fn merge_avg(
    dists: &mut CondensedMatrix<'_>,
    active: &Active,
    survivor: usize,
    dying: usize,
    size_survivor: usize,
    size_dying: usize,
) {
    let total = (size_survivor + size_dying) as f64;
    for x in active.iter() {
        if x == survivor || x == dying {
            continue;
        }
        let a = pair(x, survivor);
        let b = pair(x, dying);
        let merged = (size_survivor as f64 * dists[a]
            + size_dying as f64 * dists[b])
            / total;
        dists[pair(x, survivor)] = merged;
    }
}

/// Normalize an unordered pair into the `[row, col]` form `CondensedMatrix`
/// indexing expects, where `row < col`.
fn pair(x: usize, y: usize) -> [usize; 2] {
    if x < y {
        [x, y]
    } else {
        [y, x]
    }
}
