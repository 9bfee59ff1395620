use std::error;
use std::fmt;
use std::io;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// An error produced while seeding, enumerating, or evaluating a parametric
/// linkage sweep.
#[derive(Clone, Debug)]
pub enum Error {
    /// The dataset to cluster is empty.
    EmptyInput,
    /// Fewer than two points were supplied, so no dissimilarity is
    /// well-defined.
    TooFewPoints {
        /// The number of points that were supplied.
        points: usize,
    },
    /// Feature vectors did not all have the same dimensionality.
    DimensionMismatch {
        /// The dimensionality established by earlier rows.
        expected: usize,
        /// The dimensionality found in the offending row.
        found: usize,
        /// The index of the offending row.
        row: usize,
    },
    /// A CSV row could not be parsed into a label and feature vector.
    BadRow {
        /// The line number of the offending row.
        line: usize,
        /// A description of why the row was rejected.
        message: String,
    },
    /// A dissimilarity was NaN or infinite.
    NonFinite {
        /// The row index of the offending dissimilarity.
        row: usize,
        /// The column index of the offending dissimilarity.
        column: usize,
    },
    /// `k` (the requested number of clusters for a cost evaluation) is zero
    /// or exceeds the number of points.
    InvalidK {
        /// The requested number of clusters.
        k: usize,
        /// The number of points available.
        points: usize,
    },
    /// No ground-truth labels were supplied, or the label subset was empty.
    EmptyLabelSet,
    /// The number of ground-truth labels didn't match the number of
    /// points.
    LabelCountMismatch {
        /// The number of points.
        points: usize,
        /// The number of ground-truth labels supplied.
        labels: usize,
    },
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::EmptyInput => write!(f, "no points were supplied"),
            Error::TooFewPoints { points } => {
                write!(f, "need at least 2 points, found {}", points)
            }
            Error::DimensionMismatch { expected, found, row } => write!(
                f,
                "row {} has {} features, expected {}",
                row, found, expected
            ),
            Error::BadRow { line, ref message } => {
                write!(f, "line {}: {}", line, message)
            }
            Error::NonFinite { row, column } => write!(
                f,
                "dissimilarity between {} and {} is not finite",
                row, column
            ),
            Error::InvalidK { k, points } => write!(
                f,
                "k={} is invalid for {} points",
                k, points
            ),
            Error::EmptyLabelSet => {
                write!(f, "no ground-truth labels were supplied")
            }
            Error::LabelCountMismatch { points, labels } => write!(
                f,
                "{} labels supplied for {} points",
                labels, points
            ),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        io::Error::new(io::ErrorKind::Other, err)
    }
}
