use crate::condensed::CondensedMatrix;
use crate::error::{Error, Result};

fn validate(points: &[Vec<f64>]) -> Result<usize> {
    if points.is_empty() {
        return Err(Error::EmptyInput);
    }
    if points.len() < 2 {
        return Err(Error::TooFewPoints { points: points.len() });
    }
    let dim = points[0].len();
    for (row, p) in points.iter().enumerate() {
        if p.len() != dim {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: p.len(),
                row,
            });
        }
    }
    Ok(dim)
}

fn normalize_in_place(dists: &mut [f64]) {
    let max = dists.iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        for d in dists.iter_mut() {
            *d /= max;
        }
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    (dot / (norm_a * norm_b)).acos()
}

/// Seed a condensed pairwise dissimilarity matrix from feature vectors
/// using Euclidean distance.
///
/// When `normalize` is true, every dissimilarity is divided by the largest
/// one, scaling the matrix into `[0, 1]`.
pub fn euclidean_dists(
    points: &[Vec<f64>],
    normalize: bool,
) -> Result<Vec<f64>> {
    validate(points)?;
    seed(points, normalize, euclidean)
}

/// Seed a condensed pairwise dissimilarity matrix from feature vectors
/// using angular (cosine) distance: the arc-cosine of the cosine
/// similarity between two vectors.
///
/// When `normalize` is true, every dissimilarity is divided by the largest
/// one, scaling the matrix into `[0, 1]`.
pub fn cosine_dists(
    points: &[Vec<f64>],
    normalize: bool,
) -> Result<Vec<f64>> {
    validate(points)?;
    seed(points, normalize, cosine)
}

fn seed(
    points: &[Vec<f64>],
    normalize: bool,
    metric: impl Fn(&[f64], &[f64]) -> f64,
) -> Result<Vec<f64>> {
    let n = points.len();
    let mut dists = vec![0.0; (n * (n - 1)) / 2];
    for row in 0..n - 1 {
        for col in row + 1..n {
            let d = metric(&points[row], &points[col]);
            if !d.is_finite() {
                return Err(Error::NonFinite { row, column: col });
            }
            dists[CondensedMatrix::offset_of(n, row, col)] = d;
        }
    }
    if normalize {
        normalize_in_place(&mut dists);
    }
    Ok(dists)
}
