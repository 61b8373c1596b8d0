#![doc = "Zone soil similarity graphs and the analytics run over them"]
mod aggregate;
mod cluster;
mod components;
mod config;
mod data;
mod error;
mod graph;
mod path;
mod sort;
mod zone;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use config::{AggregateConfig, GraphConfig, KMeansConfig, Settings};

#[doc(inline)]
pub use zone::{FeatureRange, NormMeta, Zone, ZoneTable};

#[doc(inline)]
pub use graph::{build_zone_graph, haversine_km, Graph, GraphBuilder, GraphView, NodeView, ZoneGraph};

#[doc(inline)]
pub use path::{bellman_ford, floyd_warshall, DistanceMatrix, ShortestPathResult};

#[doc(inline)]
pub use components::{strongly_connected_components, ClusterMetrics, StronglyConnectedComponent};

#[doc(inline)]
pub use cluster::{kmeans, Cluster, KMeansResult};

#[doc(inline)]
pub use sort::{merge_sort_by_key, quicksort_by_key, sort_records, Record, SortDirection, SortMethod};

#[doc(inline)]
pub use aggregate::{aggregate, AggregateResult, AggregateSpec, AggregateSummary, ChunkSummary, TimeRecord};

#[doc(inline)]
pub use data::{
    normalize_columns, ClimateDataset, ClimateReading, ClimateSummary, CsvSource, DataSource, DataStore,
    DatasetSnapshot, DatasetSummary, DistrictSummary, MonthlyClimate, SeriesPoint, SoilDataset, SoilSummary,
    YearRange, CLIMATE_METRICS, SOIL_FEATURES,
};
