use geo::{Distance, HaversineMeasure, Point};

use crate::{
    config::GraphConfig,
    error::{Error, Result},
    graph::ZoneGraph,
    zone::{Zone, ZoneTable},
};

/// Spherical Earth radius used for great-circle distances, in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two zones, in kilometers.
pub fn haversine_km(a: &Zone, b: &Zone) -> f64 {
    let measure = HaversineMeasure::new(EARTH_RADIUS_M);
    measure.distance(Point::new(a.lon(), a.lat()), Point::new(b.lon(), b.lat())) / 1000.0
}

/// Builds zone similarity graphs for a fixed weighting configuration.
#[derive(Clone, Copy, Debug)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    /// Create a builder, rejecting invalid weights up front.
    pub fn new(config: GraphConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline] pub fn config(&self) -> &GraphConfig { &self.config }

    /// Build a graph snapshot over the zones of `table`.
    ///
    /// Every zone lists its `k` closest other zones by combined distance; ties keep input
    /// order. Quality-flow edges keep the candidate edges that point to an equal or lower
    /// soil score.
    pub fn build(&self, table: &ZoneTable) -> Result<ZoneGraph> {
        let n = table.len();
        if n < 2 {
            return Err(Error::config(format!("at least 2 zones are required to build a graph, got {n}")))
        }
        let zones = table.zones();

        // Pairwise great-circle distances, normalized by the largest one.
        let mut geo = vec![0.0; n * n];
        let mut max_geo = 0.0f64;
        for i in 0..n {
            for j in i + 1..n {
                let d = haversine_km(&zones[i], &zones[j]);
                geo[i * n + j] = d;
                geo[j * n + i] = d;
                max_geo = max_geo.max(d);
            }
        }
        if max_geo == 0.0 { max_geo = 1.0 }

        let GraphConfig { k, feature_weight, geo_weight } = self.config;
        let lists = (0..n)
            .map(|i| {
                let mut candidates = (0..n)
                    .filter(|&j| j != i)
                    .map(|j| {
                        let feature = zones[i].feature_distance(&zones[j]);
                        let combined = feature_weight * feature + geo_weight * (geo[i * n + j] / max_geo);
                        (j as u32, combined)
                    })
                    .collect::<Vec<_>>();
                // Stable sort, so equal distances keep input order.
                candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
                candidates.truncate(k);
                candidates
            })
            .collect::<Vec<_>>();

        let graph = ZoneGraph::from_lists(table.clone(), lists);
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.undirected().edge_count(),
            directed_edges = graph.directed().edge_count(),
            k, feature_weight, geo_weight,
            "built zone graph"
        );
        Ok(graph)
    }
}

/// Build a zone graph with the given configuration.
pub fn build_zone_graph(table: &ZoneTable, config: &GraphConfig) -> Result<ZoneGraph> {
    GraphBuilder::new(*config)?.build(table)
}
