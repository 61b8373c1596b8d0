use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    sort::{merge_sort_by_key, quicksort_by_key},
};

/// A labelled record with named numeric fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub label: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, f64>,
}

impl Record {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), fields: BTreeMap::new() }
    }

    /// Builder-style field setter.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    #[inline] pub fn get(&self, name: &str) -> Option<f64> { self.fields.get(name).copied() }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMethod {
    #[default]
    Quicksort,
    Mergesort,
}

impl FromStr for SortMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quicksort" => Ok(Self::Quicksort),
            "mergesort" => Ok(Self::Mergesort),
            other => Err(Error::config(format!("unknown sort method {other}, use quicksort or mergesort"))),
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortMethod::Quicksort => write!(f, "quicksort"),
            SortMethod::Mergesort => write!(f, "mergesort"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort records on the numeric field `key`.
///
/// The key must be present and non-NaN on every record. Descending order reverses the
/// ascending result as a whole.
pub fn sort_records(records: &[Record], key: &str, method: SortMethod, direction: SortDirection) -> Result<Vec<Record>> {
    let present = records.iter().filter(|r| r.fields.contains_key(key)).count();
    if present == 0 && !records.is_empty() {
        return Err(Error::config(format!("unknown sort column {key}")))
    }
    if present < records.len() {
        return Err(Error::upstream(format!("{} records have no value for {key}", records.len() - present)))
    }
    if let Some(r) = records.iter().find(|r| r.fields[key].is_nan()) {
        return Err(Error::upstream(format!("record {} has a NaN {key}", r.label)))
    }

    let value = |r: &Record| r.fields[key];
    let mut sorted = match method {
        SortMethod::Quicksort => quicksort_by_key(records, value),
        SortMethod::Mergesort => merge_sort_by_key(records, value),
    };
    if direction == SortDirection::Descending { sorted.reverse() }
    Ok(sorted)
}
