use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Observed range of a raw feature, used to map values into and out of [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub fn new(min: f64, max: f64) -> Self { Self { min, max } }

    /// Width of the range.
    #[inline] pub fn span(&self) -> f64 { self.max - self.min }

    /// Map a raw value into [0, 1]. A degenerate (zero-width) range maps everything to 0.
    #[inline]
    pub fn normalize(&self, value: f64) -> f64 {
        if self.span() == 0.0 { 0.0 } else { (value - self.min) / self.span() }
    }

    /// Map a normalized value back onto the raw scale.
    #[inline]
    pub fn denormalize(&self, norm: f64) -> f64 { self.min + norm * self.span() }
}

/// Raw feature name -> observed range.
pub type NormMeta = BTreeMap<String, FeatureRange>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_bounds_to_unit_interval() {
        let range = FeatureRange::new(4.0, 8.0);
        assert_eq!(range.normalize(4.0), 0.0);
        assert_eq!(range.normalize(8.0), 1.0);
        assert_eq!(range.normalize(6.0), 0.5);
    }

    #[test]
    fn degenerate_range_normalizes_to_zero() {
        let range = FeatureRange::new(3.0, 3.0);
        assert_eq!(range.normalize(3.0), 0.0);
        assert_eq!(range.denormalize(0.7), 3.0);
    }

    #[test]
    fn denormalize_inverts_normalize() {
        let range = FeatureRange::new(-2.0, 10.0);
        for v in [-2.0, 0.0, 3.5, 10.0] {
            assert!((range.denormalize(range.normalize(v)) - v).abs() < 1e-12);
        }
    }
}
