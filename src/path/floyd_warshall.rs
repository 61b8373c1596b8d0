use ndarray::Array2;
use serde::Serialize;

use crate::{
    error::{Error, Result},
    graph::ZoneGraph,
};

/// All-pairs shortest distances over one graph snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistanceMatrix {
    /// Zone ids in row/column order.
    pub nodes: Vec<String>,
    /// `matrix[i][j]` is the distance from `nodes[i]` to `nodes[j]`, `None` when unreachable.
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl DistanceMatrix {
    /// Distance between two zones by id.
    pub fn distance(&self, from: &str, to: &str) -> Result<Option<f64>> {
        let position = |id: &str| self.nodes.iter().position(|n| n == id)
            .ok_or_else(|| Error::not_found(format!("zone {id}")));
        Ok(self.matrix[position(from)?][position(to)?])
    }
}

/// Floyd-Warshall over the undirected candidate adjacency, used exactly as listed.
///
/// Direct edges are seeded with the smallest listed weight for the pair. O(n³).
pub fn floyd_warshall(graph: &ZoneGraph) -> DistanceMatrix {
    let n = graph.node_count();
    let mut dist = Array2::from_elem((n, n), f64::INFINITY);
    for i in 0..n { dist[[i, i]] = 0.0 }
    for (u, v, w) in graph.undirected().iter_edges() {
        if w < dist[[u, v]] { dist[[u, v]] = w }
    }

    for k in 0..n {
        for i in 0..n {
            let through = dist[[i, k]];
            if through.is_infinite() { continue }
            for j in 0..n {
                let candidate = through + dist[[k, j]];
                if candidate < dist[[i, j]] { dist[[i, j]] = candidate }
            }
        }
    }
    tracing::debug!(nodes = n, "floyd-warshall finished");

    DistanceMatrix {
        nodes: graph.zones().iter().map(|z| z.id().to_string()).collect(),
        matrix: dist.rows().into_iter()
            .map(|row| row.iter().map(|&d| d.is_finite().then_some(d)).collect())
            .collect(),
    }
}
