use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    error::{Error, Result},
    graph::Graph,
    zone::{Zone, ZoneTable},
};

/// An immutable snapshot of the zone similarity graph.
///
/// Holds the zones, the undirected candidate-neighbor adjacency and the derived directed
/// quality-flow adjacency. Node indices follow the input order of the zone table.
#[derive(Clone, Debug)]
pub struct ZoneGraph {
    table: ZoneTable,
    undirected: Graph,
    directed: Graph,
}

impl ZoneGraph {
    /// Assemble a snapshot from per-node `(target, weight)` lists over table indices.
    /// The directed adjacency is derived from the undirected one.
    pub(crate) fn from_lists(table: ZoneTable, lists: Vec<Vec<(u32, f64)>>) -> Self {
        assert!(lists.len() == table.len(), "lists.len() must equal the number of zones");

        let zones = table.zones();
        let directed = lists.iter().enumerate()
            .map(|(u, list)| {
                list.iter()
                    .filter(|&&(v, _)| zones[u].soil_score() >= zones[v as usize].soil_score())
                    .copied()
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        Self {
            undirected: Graph::from_weighted_lists(&lists),
            directed: Graph::from_weighted_lists(&directed),
            table,
        }
    }

    /// Assemble a snapshot from explicit adjacency lists keyed by zone id.
    ///
    /// Zones without an entry get an empty list. Fails if a list references an unknown id,
    /// contains a self-loop, or carries a negative or non-finite weight.
    pub fn from_adjacency<S, T>(table: ZoneTable, adjacency: impl IntoIterator<Item = (S, Vec<(T, f64)>)>) -> Result<Self>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut lists = vec![Vec::new(); table.len()];
        for (source, neighbors) in adjacency {
            let source = source.as_ref();
            let u = table.position(source)
                .ok_or_else(|| Error::invariant(format!("adjacency lists unknown zone {source}")))?;
            for (target, weight) in neighbors {
                let target = target.as_ref();
                let v = table.position(target)
                    .ok_or_else(|| Error::invariant(format!("edge {source} -> {target} references an unknown zone")))?;
                if u == v {
                    return Err(Error::invariant(format!("self-loop on zone {source}")))
                }
                if !weight.is_finite() || weight < 0.0 {
                    return Err(Error::invariant(format!("edge {source} -> {target} has invalid weight {weight}")))
                }
                lists[u].push((v as u32, weight));
            }
        }
        Ok(Self::from_lists(table, lists))
    }

    /// Get the number of zones in the snapshot.
    #[inline] pub fn node_count(&self) -> usize { self.table.len() }

    /// Get the zones in node order.
    #[inline] pub fn zones(&self) -> &[Zone] { self.table.zones() }

    /// Get the zone at a node index.
    #[inline] pub fn zone(&self, node: usize) -> &Zone { &self.table.zones()[node] }

    /// Get the table the snapshot was built from.
    #[inline] pub fn table(&self) -> &ZoneTable { &self.table }

    /// Get the undirected candidate-neighbor adjacency.
    #[inline] pub fn undirected(&self) -> &Graph { &self.undirected }

    /// Get the directed quality-flow adjacency.
    #[inline] pub fn directed(&self) -> &Graph { &self.directed }

    /// Look up a zone by id.
    pub fn zone_by_id(&self, id: &str) -> Option<&Zone> { self.table.get(id) }

    /// Resolve a zone id to its node index.
    pub fn node_index(&self, id: &str) -> Result<usize> {
        self.table.position(id).ok_or_else(|| Error::not_found(format!("zone {id}")))
    }

    /// Candidate neighbors of a zone, with edge weights.
    pub fn neighbors(&self, id: &str) -> Result<Vec<(&str, f64)>> {
        let u = self.node_index(id)?;
        Ok(self.named_edges(&self.undirected, u))
    }

    /// Quality-flow neighbors of a zone, with edge weights.
    pub fn directed_neighbors(&self, id: &str) -> Result<Vec<(&str, f64)>> {
        let u = self.node_index(id)?;
        Ok(self.named_edges(&self.directed, u))
    }

    /// The zone with the highest soil score (first in input order on ties).
    pub fn best_zone(&self) -> Option<&Zone> {
        self.zones().iter().reduce(|best, z| if z.soil_score() > best.soil_score() { z } else { best })
    }

    /// Serializable view of the whole snapshot.
    pub fn view(&self) -> GraphView<'_> {
        let names = self.table.feature_names();
        let nodes = self.zones().iter()
            .map(|z| (z.id(), NodeView {
                lat: z.lat(),
                lon: z.lon(),
                soil_score: z.soil_score(),
                features: names.iter().map(String::as_str).zip(z.features().iter().copied()).collect(),
            }))
            .collect();
        let adjacency = |graph: &Graph| (0..self.node_count())
            .map(|u| (self.zone(u).id(), self.named_edges(graph, u)))
            .collect::<BTreeMap<_, _>>();

        GraphView { nodes, adjacency: adjacency(&self.undirected), directed: adjacency(&self.directed) }
    }

    fn named_edges(&self, graph: &Graph, node: usize) -> Vec<(&str, f64)> {
        graph.edges_with_weights(node).map(|(v, w)| (self.zone(v).id(), w)).collect()
    }
}

/// Per-node attributes in a [`GraphView`].
#[derive(Debug, Serialize)]
pub struct NodeView<'a> {
    pub lat: f64,
    pub lon: f64,
    pub soil_score: f64,
    pub features: BTreeMap<&'a str, f64>,
}

/// Transport-ready view of a [`ZoneGraph`].
#[derive(Debug, Serialize)]
pub struct GraphView<'a> {
    pub nodes: BTreeMap<&'a str, NodeView<'a>>,
    pub adjacency: BTreeMap<&'a str, Vec<(&'a str, f64)>>,
    pub directed: BTreeMap<&'a str, Vec<(&'a str, f64)>>,
}
