use agrograph::{AggregateSpec, KMeansConfig, Record, SortDirection, SortMethod};
use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::{AggregateArgs, Cli, Dataset, KMeansArgs, SortArgs};

pub fn kmeans(cli: &Cli, args: &KMeansArgs) -> Result<()> {
    let settings = super::settings(cli)?;
    let snapshot = super::load(cli)?;
    let config = KMeansConfig {
        k: args.clusters.unwrap_or(settings.kmeans.k),
        max_iter: args.max_iter.unwrap_or(settings.kmeans.max_iter),
        seed: args.seed.unwrap_or(settings.kmeans.seed),
    };

    let soil = snapshot.soil();
    let result = agrograph::kmeans(soil.zone_table(), soil.norm_meta(), &config)
        .with_context(|| format!("[kmeans] clustering into {} groups failed", config.k))?;
    super::print_json(&result)
}

/// Rows of the requested dataset as sortable records.
fn records(cli: &Cli, args: &SortArgs, limit: usize) -> Result<(String, Vec<Record>)> {
    let snapshot = super::load(cli)?;
    match args.dataset {
        Dataset::Climate => {
            let metric = args.metric.to_ascii_uppercase();
            let series = snapshot.climate().timeseries(&metric, args.year, limit)?;
            let records = series.iter()
                .filter_map(|p| {
                    let label = format!("{}-{:02}", p.year, p.month);
                    p.value.map(|v| Record::new(label).with(metric.as_str(), v))
                })
                .collect();
            Ok((metric, records))
        }
        Dataset::Soil => {
            let records = snapshot.soil().ranking(limit).iter()
                .map(|d| {
                    d.features.iter().fold(
                        Record::new(d.distrito.as_str())
                            .with("lat", d.lat)
                            .with("lon", d.lon)
                            .with("muestras", d.muestras as f64)
                            .with("soil_score", d.soil_score),
                        |record, (name, &value)| record.with(name.as_str(), value),
                    )
                })
                .collect();
            Ok((args.metric.clone(), records))
        }
    }
}

pub fn sort(cli: &Cli, args: &SortArgs) -> Result<()> {
    let settings = super::settings(cli)?;
    let method: SortMethod = args.method.parse()?;
    let direction = if args.reverse { SortDirection::Descending } else { SortDirection::Ascending };
    let limit = args.limit.unwrap_or(settings.sort_limit());

    let (metric, records) = records(cli, args, limit).context("[sort] failed to collect rows")?;
    let items = agrograph::sort_records(&records, &metric, method, direction)
        .with_context(|| format!("[sort] cannot sort on {metric}"))?;
    super::print_json(&json!({
        "dataset": format!("{:?}", args.dataset).to_ascii_lowercase(),
        "metric": metric,
        "method": method.to_string(),
        "items": items,
    }))
}

pub fn aggregate(cli: &Cli, args: &AggregateArgs) -> Result<()> {
    let settings = super::settings(cli)?;
    let snapshot = super::load(cli)?;
    let partitions = args.partitions.unwrap_or(settings.aggregate.partitions);

    let result = agrograph::aggregate(&snapshot.climate().records(), &AggregateSpec::climate(), partitions)
        .with_context(|| format!("[aggregate] failed with {partitions} partitions"))?;
    super::print_json(&result)
}
