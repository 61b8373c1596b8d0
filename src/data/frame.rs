//! CSV reading and column extraction.

use std::{fs::File, io::{Cursor, ErrorKind}, path::Path};

use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, CsvReader, DataType}};

use crate::error::{Error, Result};

/// Every column is read as text; numeric coercion happens per column on extraction.
fn options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Reads a CSV file from `path` into a Polars DataFrame of string columns.
pub(crate) fn read_csv(path: &Path) -> Result<DataFrame> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::not_found(format!("dataset {} does not exist", path.display())),
        _ => Error::upstream(format!("failed to open {}: {e}", path.display())),
    })?;
    Ok(options().into_reader_with_file_handle(file).finish()?)
}

/// Reads CSV text into a Polars DataFrame of string columns.
pub(crate) fn read_csv_str(csv: &str) -> Result<DataFrame> {
    Ok(CsvReader::new(Cursor::new(csv.as_bytes())).with_options(options()).finish()?)
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a polars::prelude::Column> {
    df.column(name).map_err(|_| Error::upstream(format!("missing column {name}")))
}

/// A column coerced to floats. Unparsable and non-finite cells become `None`.
pub(crate) fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let values = column(df, name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().map(|v| v.filter(|x| x.is_finite())).collect())
}

/// A column rendered as strings.
pub(crate) fn string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let values = column(df, name)?.cast(&DataType::String)?;
    Ok(values.str()?.into_iter().map(|v| v.map(str::to_owned)).collect())
}

/// Like [`string_column`], but a missing column yields all `None`.
pub(crate) fn optional_string_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    if df.column(name).is_ok() {
        string_column(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

/// Mean of the present values, if any.
pub(crate) fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (count, total) = values.into_iter().flatten().fold((0usize, 0.0), |(c, t), v| (c + 1, t + v));
    (count > 0).then(|| total / count as f64)
}
