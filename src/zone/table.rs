use ahash::AHashMap;
use serde::Serialize;

use crate::error::{Error, Result};

/// A geographic district summarized into location plus soil attributes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Zone {
    id: String,
    lat: f64,
    lon: f64,
    soil_score: f64,
    features: Vec<f64>, // Normalized values, aligned with `ZoneTable::feature_names`
}

impl Zone {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64, soil_score: f64, features: Vec<f64>) -> Self {
        Self { id: id.into(), lat, lon, soil_score, features }
    }

    #[inline] pub fn id(&self) -> &str { &self.id }
    #[inline] pub fn lat(&self) -> f64 { self.lat }
    #[inline] pub fn lon(&self) -> f64 { self.lon }
    #[inline] pub fn soil_score(&self) -> f64 { self.soil_score }

    /// Normalized feature vector.
    #[inline] pub fn features(&self) -> &[f64] { &self.features }

    /// Euclidean distance between the feature vectors of two zones.
    pub fn feature_distance(&self, other: &Zone) -> f64 {
        self.features.iter()
            .zip(other.features.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// One row per zone, with the names of the normalized feature columns.
#[derive(Clone, Debug)]
pub struct ZoneTable {
    feature_names: Vec<String>,
    zones: Vec<Zone>,
    index: AHashMap<String, usize>,
}

impl ZoneTable {
    /// Construct a table, validating ids, feature widths and numeric values.
    pub fn new(feature_names: Vec<String>, zones: Vec<Zone>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(zones.len());
        for (i, zone) in zones.iter().enumerate() {
            if zone.features.len() != feature_names.len() {
                return Err(Error::upstream(format!(
                    "zone {} has {} features, expected {}", zone.id, zone.features.len(), feature_names.len())))
            }
            let finite = [zone.lat, zone.lon, zone.soil_score].iter()
                .chain(zone.features.iter())
                .all(|v| v.is_finite());
            if !finite {
                return Err(Error::upstream(format!("zone {} has non-finite attributes", zone.id)))
            }
            if index.insert(zone.id.clone(), i).is_some() {
                return Err(Error::upstream(format!("duplicate zone id {}", zone.id)))
            }
        }
        Ok(Self { feature_names, zones, index })
    }

    #[inline] pub fn len(&self) -> usize { self.zones.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.zones.is_empty() }
    #[inline] pub fn zones(&self) -> &[Zone] { &self.zones }
    #[inline] pub fn feature_names(&self) -> &[String] { &self.feature_names }

    /// Position of a zone in input order.
    #[inline] pub fn position(&self, id: &str) -> Option<usize> { self.index.get(id).copied() }

    /// Look up a zone by id.
    pub fn get(&self, id: &str) -> Option<&Zone> { self.position(id).map(|i| &self.zones[i]) }

    /// Column index of a normalized feature.
    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_names.iter().position(|f| f == name)
    }
}
