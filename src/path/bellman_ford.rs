use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    graph::ZoneGraph,
};

/// Single-source shortest distances over one graph snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShortestPathResult {
    pub source: String,
    /// Zone id -> distance from the source, `None` when unreachable.
    pub distance: BTreeMap<String, Option<f64>>,
    /// Zone id -> previous zone on a shortest path, `None` for the source and unreachable zones.
    pub prev: BTreeMap<String, Option<String>>,
}

impl ShortestPathResult {
    /// Distance to a zone, `Ok(None)` if unreachable.
    pub fn distance_to(&self, target: &str) -> Result<Option<f64>> {
        self.distance.get(target).copied().ok_or_else(|| Error::not_found(format!("zone {target}")))
    }

    /// Reconstruct the zone ids on a shortest path from the source to `target`.
    /// Returns `Ok(None)` when the target is unreachable.
    pub fn path_to(&self, target: &str) -> Result<Option<Vec<String>>> {
        if self.distance_to(target)?.is_none() { return Ok(None) }

        let mut path = vec![target.to_string()];
        let mut current = target;
        while let Some(Some(prev)) = self.prev.get(current) {
            // Predecessor chains are acyclic; a longer walk means the maps are inconsistent.
            if path.len() > self.prev.len() {
                return Err(Error::invariant(format!("predecessor cycle through {prev}")))
            }
            path.push(prev.clone());
            current = prev;
        }
        path.reverse();
        Ok(Some(path))
    }
}

/// Bellman-Ford from `source` over the undirected candidate adjacency, used exactly as listed.
///
/// Runs at most |V| - 1 relaxation passes and stops at the first pass without updates.
/// Edge weights are non-negative by construction, so the extra negative-cycle detection pass
/// is intentionally not performed.
pub fn bellman_ford(graph: &ZoneGraph, source: &str) -> Result<ShortestPathResult> {
    let start = graph.node_index(source)?;
    let n = graph.node_count();

    let mut dist = vec![f64::INFINITY; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    dist[start] = 0.0;

    let edges = graph.undirected().iter_edges().collect::<Vec<_>>();
    let mut passes = 0;
    for _ in 0..n.saturating_sub(1) {
        passes += 1;
        let mut updated = false;
        for &(u, v, w) in &edges {
            if dist[u] + w < dist[v] {
                dist[v] = dist[u] + w;
                prev[v] = Some(u);
                updated = true;
            }
        }
        if !updated { break }
    }
    tracing::debug!(source, passes, "bellman-ford finished");

    let id = |node: usize| graph.zone(node).id().to_string();
    Ok(ShortestPathResult {
        source: source.to_string(),
        distance: (0..n).map(|v| (id(v), dist[v].is_finite().then_some(dist[v]))).collect(),
        prev: (0..n).map(|v| (id(v), prev[v].map(id))).collect(),
    })
}
