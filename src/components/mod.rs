mod kosaraju;
mod metrics;

pub use kosaraju::{strongly_connected_components, StronglyConnectedComponent};
pub use metrics::ClusterMetrics;
