use agrograph::{bellman_ford, floyd_warshall, strongly_connected_components, Settings, ZoneGraph};
use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::{Cli, ShortestPathArgs};

/// Build the zone graph under the effective graph settings.
fn zone_graph(cli: &Cli, settings: &Settings) -> Result<ZoneGraph> {
    let snapshot = super::load(cli)?;
    snapshot.zone_graph(&settings.graph).context("[graph] failed to build zone graph")
}

pub fn graph(cli: &Cli) -> Result<()> {
    let graph = zone_graph(cli, &super::settings(cli)?)?;
    super::print_json(&graph.view())
}

pub fn shortest_path(cli: &Cli, args: &ShortestPathArgs) -> Result<()> {
    let settings = super::settings(cli)?;
    let graph = zone_graph(cli, &settings)?;
    let source = match &args.source {
        Some(source) => source.clone(),
        None => graph.best_zone().context("[shortest-path] no zones")?.id().to_string(),
    };

    let result = bellman_ford(&graph, &source)
        .with_context(|| format!("[shortest-path] cannot run from {source}"))?;
    super::print_json(&json!({
        "feature_weight": settings.graph.feature_weight,
        "geo_weight": settings.graph.geo_weight,
        "source": result.source,
        "distance": result.distance,
        "prev": result.prev,
    }))
}

pub fn all_pairs(cli: &Cli) -> Result<()> {
    let graph = zone_graph(cli, &super::settings(cli)?)?;
    super::print_json(&floyd_warshall(&graph))
}

pub fn components(cli: &Cli) -> Result<()> {
    let graph = zone_graph(cli, &super::settings(cli)?)?;
    let components = strongly_connected_components(&graph).context("[components] analysis failed")?;
    tracing::info!(count = components.len(), "found strongly connected components");
    super::print_json(&json!({ "components": components }))
}
