use crate::{
    error::{Error, Result},
    zone::{FeatureRange, NormMeta},
};

/// Min/max-normalize the columns of a row-major table.
///
/// Returns the observed range of every column, keyed by `names`, and the rows with each value
/// mapped into [0, 1]. A constant column normalizes to all zeros.
pub fn normalize_columns(names: &[String], rows: &[Vec<f64>]) -> Result<(NormMeta, Vec<Vec<f64>>)> {
    if let Some(row) = rows.iter().find(|row| row.len() != names.len()) {
        return Err(Error::upstream(format!("row has {} values, expected {}", row.len(), names.len())))
    }
    if rows.is_empty() {
        return Err(Error::upstream("no rows to normalize"))
    }

    let ranges = (0..names.len())
        .map(|col| {
            let (min, max) = rows.iter()
                .map(|row| row[col])
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
            FeatureRange::new(min, max)
        })
        .collect::<Vec<_>>();

    let normalized = rows.iter()
        .map(|row| row.iter().zip(&ranges).map(|(&v, range)| range.normalize(v)).collect())
        .collect();
    let meta = names.iter().cloned().zip(ranges).collect();
    Ok((meta, normalized))
}
