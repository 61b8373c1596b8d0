use serde::Serialize;

use crate::{
    components::ClusterMetrics,
    error::{Error, Result},
    graph::{Graph, ZoneGraph},
};

/// A strongly connected component of the quality-flow graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StronglyConnectedComponent {
    pub members: Vec<String>,
    pub metrics: ClusterMetrics,
}

/// Order in which nodes finish a depth-first traversal of `graph`, visiting roots in node order.
fn finishing_order(graph: &Graph) -> Vec<usize> {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);

    // Stack frames are (node, index of the next neighbor to explore).
    let mut stack: Vec<(usize, usize)> = Vec::new();
    for root in 0..n {
        if visited[root] { continue }
        visited[root] = true;
        stack.push((root, 0));

        while let Some(frame) = stack.last_mut() {
            let u = frame.0;
            match graph.edge(u, frame.1) {
                Some(v) => {
                    frame.1 += 1;
                    if !visited[v] {
                        visited[v] = true;
                        stack.push((v, 0));
                    }
                }
                None => {
                    stack.pop();
                    order.push(u);
                }
            }
        }
    }
    order
}

/// Assign each node a component id by traversing `reversed` in reverse finishing order.
fn assign_components(reversed: &Graph, order: &[usize]) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; reversed.node_count()];
    let mut components = Vec::new();

    for &root in order.iter().rev() {
        if assigned[root] { continue }
        assigned[root] = true;

        let mut members = Vec::new();
        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            members.push(u);
            for v in reversed.edges(u) {
                if !assigned[v] {
                    assigned[v] = true;
                    stack.push(v);
                }
            }
        }
        components.push(members);
    }
    components
}

/// Kosaraju decomposition of the directed quality-flow adjacency.
///
/// Components are returned largest first; equal sizes keep discovery order.
pub fn strongly_connected_components(graph: &ZoneGraph) -> Result<Vec<StronglyConnectedComponent>> {
    let directed = graph.directed();
    if let Some((u, v)) = directed.dangling_edge() {
        return Err(Error::invariant(format!(
            "directed edge from {} references unknown node index {v}", graph.zone(u).id())))
    }

    let order = finishing_order(directed);
    let mut components = assign_components(&directed.reversed(), &order)
        .into_iter()
        .map(|nodes| StronglyConnectedComponent {
            metrics: ClusterMetrics::of(nodes.iter().map(|&u| graph.zone(u))),
            members: nodes.iter().map(|&u| graph.zone(u).id().to_string()).collect(),
        })
        .collect::<Vec<_>>();
    components.sort_by(|a, b| b.members.len().cmp(&a.members.len()));

    tracing::debug!(components = components.len(), "kosaraju finished");
    Ok(components)
}
