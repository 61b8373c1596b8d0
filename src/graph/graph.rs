/// A weighted adjacency structure in compressed sparse row format.
///
/// Rows are per-node candidate lists, so the relation is not required to be symmetric.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    edge_weights: Vec<f64>,
}

impl Graph {
    /// Construct a graph from adjacency lists and their edge weights.
    pub(crate) fn new(num_nodes: usize, edges: &[Vec<u32>], edge_weights: &[Vec<f64>]) -> Self {
        assert!(edges.len() == num_nodes, "edges.len() must equal num_nodes");
        assert!(edge_weights.len() == num_nodes, "edge_weights.len() must equal num_nodes");
        edges.iter().zip(edge_weights.iter()).enumerate().for_each(|(i, (edges, weights))| {
            assert!(edges.len() == weights.len(), "edges[{i}].len() must equal edge_weights[{i}].len()");
        });

        Self {
            size: num_nodes,
            offsets: std::iter::once(0u32).chain(
                edges.iter()
                    .map(|v| v.len() as u32)
                    .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
            ).collect::<Vec<u32>>(),
            edges: edges.iter().flatten().copied().collect(),
            edge_weights: edge_weights.iter().flatten().copied().collect(),
        }
    }

    /// Construct a graph from per-node `(target, weight)` lists.
    pub(crate) fn from_weighted_lists(lists: &[Vec<(u32, f64)>]) -> Self {
        let (edges, weights): (Vec<Vec<u32>>, Vec<Vec<f64>>) = lists.iter()
            .map(|list| list.iter().copied().unzip::<u32, f64, Vec<u32>, Vec<f64>>())
            .unzip();
        Self::new(lists.len(), &edges, &weights)
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of listed neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get the ith neighbor of a given node.
    #[inline]
    pub fn edge(&self, node: usize, i: usize) -> Option<usize> {
        self.range(node).nth(i).map(|v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors and edge weights of a given node.
    #[inline]
    pub fn edges_with_weights(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.range(node).map(move |v| (self.edges[v] as usize, self.edge_weights[v]))
    }

    /// Get an iterator over every `(source, target, weight)` triple, in row order.
    pub fn iter_edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.size).flat_map(move |u| self.edges_with_weights(u).map(move |(v, w)| (u, v, w)))
    }

    /// Check whether `target` is listed among the neighbors of `source`.
    pub fn has_edge(&self, source: usize, target: usize) -> bool {
        self.edges(source).any(|v| v == target)
    }

    /// First edge whose target is not a node of this graph, if any.
    pub(crate) fn dangling_edge(&self) -> Option<(usize, usize)> {
        self.iter_edges().find(|&(_, v, _)| v >= self.size).map(|(u, v, _)| (u, v))
    }

    /// Build the graph with every edge reversed. Rows keep source order.
    pub(crate) fn reversed(&self) -> Self {
        let mut lists = vec![Vec::new(); self.size];
        for (u, v, w) in self.iter_edges() {
            lists[v].push((u as u32, w));
        }
        Self::from_weighted_lists(&lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four zones with asymmetric candidate lists, as a top-k builder produces them.
    fn make_test_graph() -> Graph {
        Graph::from_weighted_lists(&[
            vec![(1, 0.4), (3, 1.2)],
            vec![(0, 0.4), (2, 0.7)],
            vec![(1, 0.7)],
            vec![(0, 1.2), (2, 0.9), (1, 1.6)],
        ])
    }

    #[test]
    fn csr_graph_construction() {
        let graph = make_test_graph();
        assert_eq!((graph.node_count(), graph.edge_count()), (4, 8));

        assert_eq!(graph.offsets, vec![0, 2, 4, 5, 8]);
        assert_eq!(graph.edges, vec![1, 3, 0, 2, 1, 0, 2, 1]);
        assert_eq!(graph.edge_weights, vec![0.4, 1.2, 0.4, 0.7, 0.7, 1.2, 0.9, 1.6]);
        assert_eq!(graph.offsets.last().map(|&o| o as usize), Some(graph.edge_weights.len()));
    }

    #[test]
    fn degree_and_edge_access() {
        let graph = make_test_graph();

        assert_eq!(graph.degree(3), 3);
        assert_eq!(graph.degree(2), 1);
        assert_eq!(graph.edge(3, 2), Some(1));
        assert_eq!(graph.edge(3, 3), None);
        assert_eq!(graph.edges_with_weights(3).collect::<Vec<_>>(), vec![(0, 1.2), (2, 0.9), (1, 1.6)]);
        assert!(graph.has_edge(2, 1));
        assert!(!graph.has_edge(2, 0));
    }

    #[test]
    fn parallel_lists_match_weighted_lists() {
        let graph = Graph::new(
            4,
            &[vec![1, 3], vec![0, 2], vec![1], vec![0, 2, 1]],
            &[vec![0.4, 1.2], vec![0.4, 0.7], vec![0.7], vec![1.2, 0.9, 1.6]],
        );
        assert_eq!(graph, make_test_graph());
    }

    #[test]
    fn reversed_flips_every_edge() {
        let graph = Graph::from_weighted_lists(&[vec![(1, 1.0), (2, 4.0)], vec![(2, 2.0)], vec![]]);
        let reversed = graph.reversed();

        assert_eq!(reversed.edge_count(), 3);
        assert_eq!(reversed.edges_with_weights(0).count(), 0);
        assert_eq!(reversed.edges_with_weights(1).collect::<Vec<_>>(), vec![(0, 1.0)]);
        assert_eq!(reversed.edges_with_weights(2).collect::<Vec<_>>(), vec![(0, 4.0), (1, 2.0)]);
    }

    #[test]
    fn empty_graph_is_valid() {
        let graph = Graph::new(0, &[], &[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.offsets, vec![0]);
        assert!(graph.dangling_edge().is_none());
    }

    #[test]
    fn dangling_edges_are_reported() {
        let graph = Graph::from_weighted_lists(&[vec![(5, 1.0)], vec![]]);
        assert_eq!(graph.dangling_edge(), Some((0, 5)));
    }

    #[test]
    #[should_panic(expected = "edges[0].len() must equal edge_weights[0].len()")]
    fn new_panics_when_per_node_len_mismatch() {
        let _ = Graph::new(2, &[vec![1], vec![]], &[vec![], vec![]]);
    }

    #[test]
    #[should_panic]
    fn degree_panics_for_out_of_bounds_node() {
        let graph = make_test_graph();
        graph.degree(graph.node_count());
    }
}
