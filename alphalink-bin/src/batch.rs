use std::fs::{self, File};
use std::io;
use std::path::Path;

use alphalink::{enumerate_points, LabeledPoint, Metric, Mode, Node};
use rayon::prelude::*;

use crate::IntervalCost;

/// Options shared by every file evaluated in `--input-dir` mode.
pub(crate) struct BatchConfig {
    pub(crate) mode: Mode,
    pub(crate) metric: Metric,
    pub(crate) normalize: bool,
    pub(crate) clusters: usize,
    pub(crate) labels: Option<Vec<usize>>,
    pub(crate) points_per_label: Option<usize>,
    pub(crate) batch_id: usize,
    pub(crate) average: bool,
}

/// Read a labeled-point CSV file, optionally restricting it to a subset
/// of labels and to the `batch_id`-th disjoint window of `points_per_label`
/// points for each surviving label.
///
/// Labels are counted in file order; a point is kept only once its
/// label's running count falls inside
/// `[points_per_label * batch_id, points_per_label * (batch_id + 1))`.
/// This makes disjoint batches of a dataset reproducible without needing
/// a random number generator at the CLI boundary, and without loading
/// more than one batch into memory at a time.
pub(crate) fn load_points(
    path: &Path,
    label_subset: Option<&[usize]>,
    points_per_label: Option<usize>,
    batch_id: usize,
) -> io::Result<Vec<LabeledPoint>> {
    let file = File::open(path)?;
    let all = alphalink::read_labeled_points(file)?;

    let mut counts = std::collections::HashMap::new();
    let mut kept = Vec::with_capacity(all.len());
    for point in all {
        if let Some(subset) = label_subset {
            if !subset.contains(&point.label) {
                continue;
            }
        }
        if let Some(cap) = points_per_label {
            let seen = counts.entry(point.label).or_insert(0usize);
            let window = (cap * batch_id)..(cap * (batch_id + 1));
            let keep = window.contains(seen);
            *seen += 1;
            if !keep {
                continue;
            }
        }
        kept.push(point);
    }
    if kept.is_empty() {
        return Err(alphalink::Error::EmptyInput.into());
    }
    Ok(kept)
}

/// Run a full sweep over `points` and score every emitted interval with
/// `cost`.
pub(crate) fn evaluate(
    points: &[LabeledPoint],
    mode: Mode,
    metric: Metric,
    normalize: bool,
    clusters: usize,
    cost: fn(&Node, usize) -> alphalink::Result<f64>,
) -> io::Result<Vec<IntervalCost>> {
    let features: Vec<Vec<f64>> =
        points.iter().map(|p| p.features.clone()).collect();
    let labels: Vec<usize> = points.iter().map(|p| p.label).collect();

    let mut rows = Vec::new();
    let mut failure = None;
    enumerate_points(mode, metric, normalize, &features, &labels, |lb, ub, root| {
        if failure.is_some() {
            return;
        }
        match cost(&root, clusters) {
            Ok(c) => rows.push(IntervalCost { alpha_min: lb, alpha_max: ub, cost: c }),
            Err(e) => failure = Some(e),
        }
    })?;
    if let Some(e) = failure {
        return Err(e.into());
    }
    rows.sort_by(|a, b| a.alpha_min.partial_cmp(&b.alpha_min).unwrap());
    Ok(rows)
}

/// Evaluate every CSV file directly under `dir`, in parallel, and either
/// return their rows concatenated or averaged into one row per region of
/// the sweep (see [`average_regions`]).
pub(crate) fn run_batch(
    dir: &Path,
    config: &BatchConfig,
    cost: fn(&Node, usize) -> alphalink::Result<f64>,
) -> io::Result<Vec<IntervalCost>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().map(|ext| ext == "csv").unwrap_or(false))
        .collect();
    paths.sort();

    let per_file: Vec<Vec<IntervalCost>> = paths
        .par_iter()
        .map(|path| -> io::Result<Vec<IntervalCost>> {
            let points = load_points(
                path,
                config.labels.as_deref(),
                config.points_per_label,
                config.batch_id,
            )?;
            evaluate(
                &points,
                config.mode,
                config.metric,
                config.normalize,
                config.clusters,
                cost,
            )
        })
        .collect::<io::Result<Vec<_>>>()?;

    if config.average {
        Ok(average_regions(&per_file))
    } else {
        Ok(per_file.into_iter().flatten().collect())
    }
}

/// Collapse several files' interval lists into one sequence of regions
/// tiling `[0, 1]`, each scored by the mean of every file's cost at that
/// region.
///
/// A region boundary is placed at every distinct `alpha_min`/`alpha_max`
/// that appears in any file's output, since that's exactly where some
/// file's dendrogram shape (and therefore its cost) can change.
fn average_regions(per_file: &[Vec<IntervalCost>]) -> Vec<IntervalCost> {
    let mut breakpoints: Vec<f64> = per_file
        .iter()
        .flat_map(|rows| rows.iter().flat_map(|r| [r.alpha_min, r.alpha_max]))
        .collect();
    breakpoints.sort_by(|a, b| a.partial_cmp(b).unwrap());
    breakpoints.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

    let mut regions = Vec::new();
    for window in breakpoints.windows(2) {
        let (lb, ub) = (window[0], window[1]);
        let mid = (lb + ub) / 2.0;
        let mut sum = 0.0;
        let mut n = 0usize;
        for rows in per_file {
            if let Some(row) =
                rows.iter().find(|r| r.alpha_min <= mid && mid < r.alpha_max)
            {
                sum += row.cost;
                n += 1;
            }
        }
        if n > 0 {
            regions.push(IntervalCost { alpha_min: lb, alpha_max: ub, cost: sum / n as f64 });
        }
    }
    compress_regions(regions)
}

/// Merge consecutive regions whose averaged cost is equal, so a run of
/// breakpoints that didn't actually change the score collapses back into
/// one row.
fn compress_regions(regions: Vec<IntervalCost>) -> Vec<IntervalCost> {
    let mut out: Vec<IntervalCost> = Vec::with_capacity(regions.len());
    for region in regions {
        match out.last_mut() {
            Some(prev) if (prev.cost - region.cost).abs() < 1e-12 => {
                prev.alpha_max = region.alpha_max;
            }
            _ => out.push(region),
        }
    }
    out
}
