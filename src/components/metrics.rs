use serde::Serialize;

use crate::zone::Zone;

/// Summary statistics for a group of zones.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterMetrics {
    pub count: usize,
    /// Mean soil score, `None` for an empty group.
    pub soil_score_avg: Option<f64>,
    /// (min, max) latitude.
    pub lat_span: Option<(f64, f64)>,
    /// (min, max) longitude.
    pub lon_span: Option<(f64, f64)>,
}

impl ClusterMetrics {
    /// Compute metrics over any collection of zones.
    pub fn of<'a>(zones: impl IntoIterator<Item = &'a Zone>) -> Self {
        let span = |(lo, hi): (f64, f64), v: f64| (lo.min(v), hi.max(v));
        let empty = (f64::INFINITY, f64::NEG_INFINITY);

        let (count, total, lat, lon) = zones.into_iter().fold(
            (0usize, 0.0, empty, empty),
            |(count, total, lat, lon), z| (count + 1, total + z.soil_score(), span(lat, z.lat()), span(lon, z.lon())),
        );

        if count == 0 {
            return Self { count, soil_score_avg: None, lat_span: None, lon_span: None }
        }
        Self { count, soil_score_avg: Some(total / count as f64), lat_span: Some(lat), lon_span: Some(lon) }
    }
}
