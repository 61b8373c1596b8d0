use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A timestamped row of named measurements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRecord {
    /// Seconds since the Unix epoch, UTC.
    pub timestamp: i64,
    /// Measurement name -> value. Absent names are missing measurements.
    pub values: BTreeMap<String, f64>,
}

impl TimeRecord {
    pub fn new(timestamp: i64) -> Self { Self { timestamp, values: BTreeMap::new() } }

    /// Builder-style measurement setter.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// A measurement, if present.
    #[inline] pub fn get(&self, name: &str) -> Option<f64> { self.values.get(name).copied() }
}
