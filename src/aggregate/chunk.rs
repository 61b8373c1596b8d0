use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::TimeRecord,
    config::AggregateConfig,
    error::{Error, Result},
};

/// Which measurements to aggregate, and the names to report them under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateSpec {
    /// (output name, measurement) pairs averaged within each chunk.
    pub means: Vec<(String, String)>,
    /// (output name, measurement) pairs summed within each chunk.
    pub sums: Vec<(String, String)>,
}

impl Default for AggregateSpec {
    fn default() -> Self { Self::climate() }
}

impl AggregateSpec {
    /// Nothing to aggregate; only row counts are reported.
    pub fn new() -> Self { Self { means: Vec::new(), sums: Vec::new() } }

    /// Weather-station aggregates: mean temperature, humidity and pressure, total rainfall.
    pub fn climate() -> Self {
        Self::new()
            .mean("temp_avg", "TT")
            .mean("humidity_avg", "HR")
            .sum("rain_total", "RR")
            .mean("pressure_avg", "PP")
    }

    pub fn mean(mut self, output: impl Into<String>, field: impl Into<String>) -> Self {
        self.means.push((output.into(), field.into()));
        self
    }

    pub fn sum(mut self, output: impl Into<String>, field: impl Into<String>) -> Self {
        self.sums.push((output.into(), field.into()));
        self
    }

    fn fields(&self) -> impl Iterator<Item = &str> {
        self.means.iter().chain(self.sums.iter()).map(|(_, field)| field.as_str())
    }
}

/// Aggregates of one contiguous chunk of records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChunkSummary {
    pub chunk: usize,
    pub rows: usize,
    /// Output name -> value; a mean is `None` when the chunk has no values for it.
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

/// Recombined aggregates over all chunks.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub rows: usize,
    /// Requested partition count.
    pub partitions: usize,
    #[serde(flatten)]
    pub values: BTreeMap<String, Option<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregateResult {
    pub aggregate: AggregateSummary,
    pub partitions: Vec<ChunkSummary>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (count, total) = values.fold((0usize, 0.0), |(c, t), v| (c + 1, t + v));
    (count > 0).then(|| total / count as f64)
}

/// Aggregate one chunk. Pure function of its inputs.
fn summarize(chunk: usize, records: &[TimeRecord], spec: &AggregateSpec) -> ChunkSummary {
    let means = spec.means.iter()
        .map(|(output, field)| (output.clone(), mean(records.iter().filter_map(|r| r.get(field)))));
    let sums = spec.sums.iter()
        .map(|(output, field)| (output.clone(), Some(records.iter().filter_map(|r| r.get(field)).sum())));
    ChunkSummary { chunk, rows: records.len(), values: means.chain(sums).collect() }
}

/// Divide-and-conquer aggregation of time-ordered records.
///
/// Records are sorted chronologically and split into contiguous chunks of
/// `ceil(n / partitions)` rows, each summarized on a pool of `partitions` worker threads.
/// Chunk means are recombined as a plain mean of means, which weights a short final chunk
/// the same as a full one. Sums are added. `partitions` must be in
/// [1, [`AggregateConfig::MAX_PARTITIONS`]].
pub fn aggregate(records: &[TimeRecord], spec: &AggregateSpec, partitions: usize) -> Result<AggregateResult> {
    AggregateConfig { partitions }.validate()?;
    if !records.is_empty() {
        if let Some(field) = spec.fields().find(|&f| records.iter().all(|r| r.get(f).is_none())) {
            return Err(Error::config(format!("unknown metric column {field}")))
        }
    }

    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.timestamp);

    let chunks = if sorted.is_empty() {
        Vec::new()
    } else {
        let chunk_size = sorted.len().div_ceil(partitions);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(partitions).build()?;
        pool.install(|| {
            sorted.par_chunks(chunk_size)
                .enumerate()
                .map(|(i, chunk)| summarize(i, chunk, spec))
                .collect::<Vec<_>>()
        })
    };
    tracing::debug!(rows = sorted.len(), partitions, chunks = chunks.len(), "aggregated records");

    let means = spec.means.iter()
        .map(|(output, _)| (output.clone(), mean(chunks.iter().filter_map(|c| c.values[output]))));
    let sums = spec.sums.iter()
        .map(|(output, _)| (output.clone(), Some(chunks.iter().filter_map(|c| c.values[output]).sum())));

    Ok(AggregateResult {
        aggregate: AggregateSummary { rows: sorted.len(), partitions, values: means.chain(sums).collect() },
        partitions: chunks,
    })
}
