pub mod analytics;
pub mod datasets;
pub mod graph;

use std::sync::Arc;

use agrograph::{CsvSource, DataStore, DatasetSnapshot, GraphConfig, Settings};
use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::Cli;

/// Settings file (or defaults) with the command-line overrides applied.
pub fn settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("[settings] failed to load {}", path.display()))?,
        None => Settings::default(),
    };
    settings.graph = GraphConfig {
        k: cli.k.unwrap_or(settings.graph.k),
        feature_weight: cli.feature_weight.unwrap_or(settings.graph.feature_weight),
        geo_weight: cli.geo_weight.unwrap_or(settings.graph.geo_weight),
    };
    settings.graph.validate().context("[settings] invalid graph weighting")?;
    Ok(settings)
}

/// Load both datasets named on the command line.
pub fn load(cli: &Cli) -> Result<Arc<DatasetSnapshot>> {
    let mut store = DataStore::new(CsvSource::new(&cli.soil, &cli.climate));
    store.load().with_context(|| {
        format!("[data] failed to load {} and {}", cli.soil.display(), cli.climate.display())
    })
}

/// Write a value to stdout as pretty JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
