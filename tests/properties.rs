// Property tests over randomly generated zone tables and records:
//   graph shape, shortest-path agreement, component partitions, clustering, sorting, aggregation

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use agrograph::{
    aggregate, bellman_ford, build_zone_graph, floyd_warshall, kmeans, merge_sort_by_key, quicksort_by_key,
    strongly_connected_components, AggregateSpec, FeatureRange, GraphConfig, KMeansConfig, NormMeta, TimeRecord,
    Zone, ZoneGraph, ZoneTable,
};
use proptest::prelude::*;

const FEATURES: [&str; 3] = ["ph", "om", "cec"];

fn zone_table() -> impl Strategy<Value = ZoneTable> {
    prop::collection::vec((-13.0f64..-11.0, -76.0f64..-74.0, prop::array::uniform3(0.0f64..=1.0)), 2..12)
        .prop_map(|rows| {
            let zones = rows.into_iter().enumerate()
                .map(|(i, (lat, lon, features))| {
                    let score = features.iter().sum::<f64>() / features.len() as f64;
                    Zone::new(format!("z{i}"), lat, lon, score, features.to_vec())
                })
                .collect();
            ZoneTable::new(FEATURES.iter().map(|f| f.to_string()).collect(), zones).unwrap()
        })
}

fn graph_config() -> impl Strategy<Value = GraphConfig> {
    (1usize..6, 0.0f64..=1.0).prop_map(|(k, w)| GraphConfig::new(k, w, 1.0 - w + 0.01))
}

fn norm_meta() -> NormMeta {
    FEATURES.iter().map(|f| (f.to_string(), FeatureRange::new(0.0, 1.0))).collect()
}

/// Nodes reachable from `start` along quality-flow edges.
fn reachable(graph: &ZoneGraph, start: usize) -> BTreeSet<usize> {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(u) = queue.pop_front() {
        for v in graph.directed().edges(u) {
            if seen.insert(v) { queue.push_back(v) }
        }
    }
    seen
}

proptest! {
    #[test]
    fn adjacency_is_bounded_and_loop_free(table in zone_table(), config in graph_config()) {
        let graph = build_zone_graph(&table, &config).unwrap();
        for u in 0..graph.node_count() {
            prop_assert!(graph.undirected().degree(u) <= config.k);
            prop_assert!(graph.undirected().degree(u) == config.k.min(table.len() - 1));
            prop_assert!(graph.undirected().edges(u).all(|v| v != u));
            prop_assert!(graph.undirected().edges_with_weights(u).all(|(_, w)| w.is_finite() && w >= 0.0));
        }
    }

    #[test]
    fn quality_flow_edges_point_downhill(table in zone_table(), config in graph_config()) {
        let graph = build_zone_graph(&table, &config).unwrap();
        for (u, v, w) in graph.directed().iter_edges() {
            prop_assert!(graph.undirected().has_edge(u, v));
            prop_assert!(graph.zone(u).soil_score() >= graph.zone(v).soil_score());
            let undirected = graph.undirected().edges_with_weights(u).find(|&(t, _)| t == v).map(|(_, w)| w);
            prop_assert_eq!(undirected, Some(w));
        }
    }

    #[test]
    fn bellman_ford_agrees_with_floyd_warshall(table in zone_table(), config in graph_config()) {
        let graph = build_zone_graph(&table, &config).unwrap();
        let matrix = floyd_warshall(&graph);
        for source in table.zones() {
            let result = bellman_ford(&graph, source.id()).unwrap();
            for target in table.zones() {
                let single = result.distance_to(target.id()).unwrap();
                let all = matrix.distance(source.id(), target.id()).unwrap();
                match (single, all) {
                    (Some(a), Some(b)) => prop_assert!((a - b).abs() <= 1e-9 * a.max(1.0)),
                    (a, b) => prop_assert_eq!(a, b),
                }
            }
        }
    }

    #[test]
    fn components_partition_and_are_strongly_connected(table in zone_table(), config in graph_config()) {
        let graph = build_zone_graph(&table, &config).unwrap();
        let components = strongly_connected_components(&graph).unwrap();

        let mut seen = BTreeSet::new();
        for component in &components {
            prop_assert_eq!(component.metrics.count, component.members.len());
            let nodes = component.members.iter().map(|id| graph.node_index(id).unwrap()).collect::<Vec<_>>();
            for &u in &nodes {
                prop_assert!(seen.insert(u));
                let from_u = reachable(&graph, u);
                prop_assert!(nodes.iter().all(|v| from_u.contains(v)));
            }
        }
        prop_assert_eq!(seen.len(), graph.node_count());
        prop_assert!(components.windows(2).all(|w| w[0].members.len() >= w[1].members.len()));
    }

    #[test]
    fn kmeans_is_deterministic_and_finite(table in zone_table(), k in 2usize..5, seed in any::<u64>()) {
        prop_assume!(k <= table.len());
        let config = KMeansConfig { k, max_iter: 20, seed };
        let first = kmeans(&table, &norm_meta(), &config).unwrap();
        let second = kmeans(&table, &norm_meta(), &config).unwrap();
        prop_assert_eq!(&first, &second);

        prop_assert_eq!(first.clusters.len(), k);
        prop_assert!(first.clusters.iter().flat_map(|c| c.centroid.values()).all(|v| v.is_finite()));
        prop_assert_eq!(first.clusters.iter().map(|c| c.members.len()).sum::<usize>(), table.len());
    }

    #[test]
    fn sorting_methods_agree(values in prop::collection::vec(-1.0e6f64..1.0e6, 0..200)) {
        let quick = quicksort_by_key(&values, |&v| v);
        let merge = merge_sort_by_key(&values, |&v| v);
        let mut expected = values.clone();
        expected.sort_by(f64::total_cmp);
        prop_assert_eq!(&quick, &expected);
        prop_assert_eq!(&merge, &expected);

        let reversed = expected.iter().rev().copied().collect::<Vec<_>>();
        prop_assert_eq!(quicksort_by_key(&reversed, |&v| v), expected.clone());
        prop_assert_eq!(merge_sort_by_key(&expected, |&v| v), expected);
    }

    #[test]
    fn aggregation_covers_every_row(
        readings in prop::collection::vec((0i64..1_000_000, 0.0f64..40.0, 0.0f64..10.0), 0..300),
        partitions in 1usize..9,
    ) {
        let records = readings.iter()
            .map(|&(t, tt, rr)| TimeRecord::new(t).with("TT", tt).with("RR", rr))
            .collect::<Vec<_>>();
        let spec = AggregateSpec::new().mean("temp_avg", "TT").sum("rain_total", "RR");
        let result = aggregate(&records, &spec, partitions).unwrap();

        prop_assert_eq!(result.aggregate.rows, records.len());
        prop_assert_eq!(result.partitions.iter().map(|c| c.rows).sum::<usize>(), records.len());
        prop_assert!(result.partitions.len() <= partitions);

        let rain = readings.iter().map(|r| r.2).sum::<f64>();
        let total = result.aggregate.values["rain_total"].unwrap();
        prop_assert!((total - rain).abs() <= 1e-6 * rain.max(1.0));
    }

    #[test]
    fn single_partition_is_a_direct_computation(
        temps in prop::collection::vec(-10.0f64..40.0, 1..200),
    ) {
        let records = temps.iter().enumerate()
            .map(|(i, &tt)| TimeRecord::new(i as i64).with("TT", tt))
            .collect::<Vec<_>>();
        let spec = AggregateSpec::new().mean("temp_avg", "TT");
        let result = aggregate(&records, &spec, 1).unwrap();

        let direct = temps.iter().sum::<f64>() / temps.len() as f64;
        let mean = result.aggregate.values["temp_avg"].unwrap();
        prop_assert!((mean - direct).abs() <= 1e-9 * direct.abs().max(1.0));
        prop_assert_eq!(result.partitions.len(), 1);
    }
}

#[test]
fn view_lists_every_zone() {
    let table = ZoneTable::new(
        vec!["ph".into()],
        vec![
            Zone::new("a", -12.0, -75.0, 0.9, vec![0.9]),
            Zone::new("b", -12.1, -75.1, 0.1, vec![0.1]),
        ],
    ).unwrap();
    let graph = build_zone_graph(&table, &GraphConfig::default()).unwrap();
    let view = graph.view();
    assert_eq!(view.nodes.keys().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(view.directed["a"].len(), 1);
    assert!(view.directed["b"].is_empty());

    let nodes: BTreeMap<_, _> = view.nodes.iter().map(|(id, n)| (*id, n.features["ph"])).collect();
    assert_eq!(nodes["a"], 0.9);
}
