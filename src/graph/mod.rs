mod builder;
mod graph;
mod zone_graph;

pub use builder::{build_zone_graph, haversine_km, GraphBuilder};
pub use graph::Graph;
pub use zone_graph::{GraphView, NodeView, ZoneGraph};
