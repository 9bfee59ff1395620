use std::io::Read;

use crate::error::{Error, Result};

/// A single labeled point read from an input file: a ground-truth class
/// label followed by a feature vector.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledPoint {
    /// The ground-truth class, used only for evaluation, never for
    /// clustering itself.
    pub label: usize,
    /// The feature vector, fed to [`crate::seed`].
    pub features: Vec<f64>,
}

/// Read labeled points from a CSV source.
///
/// Each line is `label,feature_1,feature_2,...`. Lines starting with `#`
/// are comments and are skipped. This is the boundary format external
/// collaborators use to hand a dataset to the rest of this crate; nothing
/// downstream of this function deals with text.
pub fn read_labeled_points<R: Read>(rdr: R) -> Result<Vec<LabeledPoint>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(rdr);

    let mut points = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let line = i + 1;
        let record = result.map_err(|e| Error::BadRow {
            line,
            message: e.to_string(),
        })?;
        if record.is_empty() {
            continue;
        }
        let mut fields = record.iter();
        let label_field = fields.next().unwrap();
        let label: usize =
            label_field.trim().parse().map_err(|_| Error::BadRow {
                line,
                message: format!("invalid label '{}'", label_field),
            })?;
        let mut features = Vec::with_capacity(record.len().saturating_sub(1));
        for field in fields {
            let value: f64 =
                field.trim().parse().map_err(|_| Error::BadRow {
                    line,
                    message: format!("invalid feature '{}'", field),
                })?;
            features.push(value);
        }
        points.push(LabeledPoint { label, features });
    }

    if points.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(points)
}
