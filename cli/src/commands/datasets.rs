use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::{Cli, SeriesArgs, ZonesArgs};

pub fn summary(cli: &Cli) -> Result<()> {
    let snapshot = super::load(cli)?;
    super::print_json(&snapshot.summary())
}

pub fn zones(cli: &Cli, args: &ZonesArgs) -> Result<()> {
    let snapshot = super::load(cli)?;
    super::print_json(&json!({ "zones": snapshot.soil().ranking(args.limit) }))
}

pub fn series(cli: &Cli, args: &SeriesArgs) -> Result<()> {
    let settings = super::settings(cli)?;
    let snapshot = super::load(cli)?;
    let limit = args.limit.unwrap_or(settings.sort_limit());

    let series = snapshot.climate()
        .timeseries(&args.metric, args.year, limit)
        .with_context(|| format!("[series] cannot extract {}", args.metric))?;
    tracing::info!(metric = %args.metric, points = series.len(), "extracted climate series");
    super::print_json(&json!({ "metric": args.metric.to_ascii_uppercase(), "series": series }))
}
