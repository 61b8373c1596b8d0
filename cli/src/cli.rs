use std::path::PathBuf;

/// Soil zone analytics CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "agrograph", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON settings file
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Soil samples CSV
    #[arg(long, global = true, default_value = "soil.csv", value_hint = clap::ValueHint::FilePath)]
    pub soil: PathBuf,

    /// Weather station CSV
    #[arg(long, global = true, default_value = "climate.csv", value_hint = clap::ValueHint::FilePath)]
    pub climate: PathBuf,

    /// Candidate neighbors per zone
    #[arg(long, global = true)]
    pub k: Option<usize>,

    /// Weight of soil feature distance in edge weights
    #[arg(long, global = true)]
    pub feature_weight: Option<f64>,

    /// Weight of geographic distance in edge weights
    #[arg(long, global = true)]
    pub geo_weight: Option<f64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Row counts, year range and feature ranges of both datasets
    Summary,

    /// Districts ranked by soil score
    Zones(ZonesArgs),

    /// The zone similarity graph
    Graph,

    /// Shortest distances from one zone
    ShortestPath(ShortestPathArgs),

    /// Shortest distances between every pair of zones
    AllPairs,

    /// Strongly connected components of the quality-flow graph
    Components,

    /// Cluster zones on their soil features
    Kmeans(KMeansArgs),

    /// Sort a climate series or the soil ranking on one metric
    Sort(SortArgs),

    /// A single climate metric over time
    Series(SeriesArgs),

    /// Chunked parallel aggregation of the climate readings
    Aggregate(AggregateArgs),
}

#[derive(clap::Args, Debug)]
pub struct ZonesArgs {
    /// Number of districts to list
    #[arg(short, long, default_value_t = 50)]
    pub limit: usize,
}

#[derive(clap::Args, Debug)]
pub struct ShortestPathArgs {
    /// Source district, defaults to the best-scoring one
    #[arg(short, long)]
    pub source: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct KMeansArgs {
    /// Number of clusters
    #[arg(short, long)]
    pub clusters: Option<usize>,

    /// Maximum iterations
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Seed for choosing the initial centroids
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dataset {
    Climate,
    Soil,
}

#[derive(clap::Args, Debug)]
pub struct SortArgs {
    /// Dataset to sort
    #[arg(short, long, value_enum, default_value_t = Dataset::Climate)]
    pub dataset: Dataset,

    /// Column to sort on, e.g. TT for climate or pH for soil
    #[arg(short, long, default_value = "TT")]
    pub metric: String,

    /// quicksort or mergesort
    #[arg(long, default_value = "quicksort")]
    pub method: String,

    /// Sort in descending order
    #[arg(short, long)]
    pub reverse: bool,

    /// Number of rows to sort
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Restrict climate rows to one year
    #[arg(short, long)]
    pub year: Option<i32>,
}

#[derive(clap::Args, Debug)]
pub struct SeriesArgs {
    /// One of TT, HR, RR, PP, FF, DD
    #[arg(short, long, default_value = "TT")]
    pub metric: String,

    /// Restrict to one year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Maximum number of points
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct AggregateArgs {
    /// Number of chunks, and of worker threads (1 to 16)
    #[arg(short, long)]
    pub partitions: Option<usize>,
}
