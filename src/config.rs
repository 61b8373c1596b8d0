use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters of the zone similarity graph.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Candidate neighbors kept per zone.
    pub k: usize,
    /// Weight of the normalized feature-space distance.
    pub feature_weight: f64,
    /// Weight of the normalized great-circle distance.
    pub geo_weight: f64,
}

impl Default for GraphConfig {
    fn default() -> Self { Self { k: 5, feature_weight: 0.6, geo_weight: 0.4 } }
}

impl GraphConfig {
    /// Construct a config with the given neighbor count and weights.
    pub fn new(k: usize, feature_weight: f64, geo_weight: f64) -> Self {
        Self { k, feature_weight, geo_weight }
    }

    /// Check that the weights can produce a meaningful combined distance.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::config("k must be a positive integer"))
        }
        for (name, w) in [("feature_weight", self.feature_weight), ("geo_weight", self.geo_weight)] {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::config(format!("{name} must be a finite non-negative number, got {w}")))
            }
        }
        if self.feature_weight + self.geo_weight <= 0.0 {
            return Err(Error::config("feature_weight + geo_weight must be > 0"))
        }
        Ok(())
    }
}

/// Parameters of the k-means clustering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    pub k: usize,
    pub max_iter: usize,
    /// Seed of the initial centroid draw.
    pub seed: u64,
}

impl Default for KMeansConfig {
    fn default() -> Self { Self { k: 4, max_iter: 20, seed: 42 } }
}

impl KMeansConfig {
    /// Check bounds against the number of points to be clustered.
    pub fn validate(&self, num_points: usize) -> Result<()> {
        if self.k < 2 || self.k > num_points {
            return Err(Error::config(format!("k must be in [2, {num_points}], got {}", self.k)))
        }
        if self.max_iter == 0 {
            return Err(Error::config("max_iter must be at least 1"))
        }
        Ok(())
    }
}

/// Parameters of the chunked climate aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    pub partitions: usize,
}

impl Default for AggregateConfig {
    fn default() -> Self { Self { partitions: 4 } }
}

impl AggregateConfig {
    /// Upper bound on partitions, and so on the worker threads of one aggregation.
    pub const MAX_PARTITIONS: usize = 16;

    pub fn validate(&self) -> Result<()> {
        if !(1..=Self::MAX_PARTITIONS).contains(&self.partitions) {
            return Err(Error::config(format!(
                "partitions must be in [1, {}], got {}", Self::MAX_PARTITIONS, self.partitions
            )))
        }
        Ok(())
    }
}

/// All tunable parameters, as read from a settings file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub graph: GraphConfig,
    pub kmeans: KMeansConfig,
    pub aggregate: AggregateConfig,
    /// Default row limit for series and sort listings.
    pub sort_limit: Option<usize>,
}

impl Settings {
    /// Read settings from a JSON file. Missing sections fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::config(format!("failed to open settings file {}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read settings from any JSON reader.
    pub fn from_reader(reader: impl std::io::Read) -> Result<Self> {
        let settings: Self = serde_json::from_reader(reader)
            .map_err(|e| Error::config(format!("malformed settings: {e}")))?;
        settings.graph.validate()?;
        settings.aggregate.validate()?;
        Ok(settings)
    }

    /// Effective row limit for listings.
    pub fn sort_limit(&self) -> usize { self.sort_limit.unwrap_or(200) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GraphConfig::default().validate().is_ok());
        assert!(KMeansConfig::default().validate(10).is_ok());
        assert!(AggregateConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_weight_sum_is_rejected() {
        let err = GraphConfig::new(3, 0.0, 0.0).validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn negative_or_nan_weight_is_rejected() {
        assert!(GraphConfig::new(3, -0.1, 1.0).validate().is_err());
        assert!(GraphConfig::new(3, f64::NAN, 1.0).validate().is_err());
        assert!(GraphConfig::new(0, 0.5, 0.5).validate().is_err());
    }

    #[test]
    fn kmeans_bounds() {
        let config = KMeansConfig { k: 5, ..Default::default() };
        assert!(config.validate(4).is_err());
        assert!(config.validate(5).is_ok());
        assert!(KMeansConfig { k: 1, ..Default::default() }.validate(5).is_err());
        assert!(KMeansConfig { max_iter: 0, ..Default::default() }.validate(5).is_err());
    }

    #[test]
    fn settings_fill_missing_sections_with_defaults() {
        let json = r#"{ "graph": { "k": 3 }, "kmeans": { "seed": 7 } }"#;
        let settings = Settings::from_reader(json.as_bytes()).unwrap();
        assert_eq!(settings.graph, GraphConfig::new(3, 0.6, 0.4));
        assert_eq!(settings.kmeans.seed, 7);
        assert_eq!(settings.kmeans.k, 4);
        assert_eq!(settings.aggregate.partitions, 4);
        assert_eq!(settings.sort_limit(), 200);
    }

    #[test]
    fn partitions_are_bounded() {
        assert!(AggregateConfig { partitions: 1 }.validate().is_ok());
        assert!(AggregateConfig { partitions: AggregateConfig::MAX_PARTITIONS }.validate().is_ok());
        let err = AggregateConfig { partitions: AggregateConfig::MAX_PARTITIONS + 1 }.validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(AggregateConfig { partitions: 0 }.validate().is_err());

        let json = r#"{ "aggregate": { "partitions": 100000 } }"#;
        assert!(matches!(Settings::from_reader(json.as_bytes()), Err(Error::Configuration(_))));
    }

    #[test]
    fn settings_reject_invalid_graph_weights() {
        let json = r#"{ "graph": { "feature_weight": 0.0, "geo_weight": 0.0 } }"#;
        assert!(matches!(Settings::from_reader(json.as_bytes()), Err(Error::Configuration(_))));
    }
}
