mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{analytics, datasets, graph};
use tracing_subscriber::EnvFilter;

/// Log to stderr at a level chosen by `-v` count, unless RUST_LOG is set.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Summary => datasets::summary(&cli),
        Commands::Zones(args) => datasets::zones(&cli, args),
        Commands::Series(args) => datasets::series(&cli, args),
        Commands::Graph => graph::graph(&cli),
        Commands::ShortestPath(args) => graph::shortest_path(&cli, args),
        Commands::AllPairs => graph::all_pairs(&cli),
        Commands::Components => graph::components(&cli),
        Commands::Kmeans(args) => analytics::kmeans(&cli, args),
        Commands::Sort(args) => analytics::sort(&cli, args),
        Commands::Aggregate(args) => analytics::aggregate(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
