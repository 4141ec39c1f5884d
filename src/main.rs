use anyhow::Result;
use clap::{Parser, Subcommand};
use rollgraph::commands::{graph, validate};
use rollgraph::config::{Config, CONFIG_FILE};
use rollgraph::logging::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rollgraph")]
#[command(about = "Assemble and check multi-service rollout step graphs", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a topology and every pipeline it references
    Validate {
        /// Path to the topology file
        #[arg(short, long)]
        topology: Option<PathBuf>,
    },

    /// Build the step graph for entrypoints or a single service
    Graph {
        /// Path to the topology file
        #[arg(short, long)]
        topology: Option<PathBuf>,

        /// Entrypoint service group (repeatable; defaults to the topology's entrypoints)
        #[arg(short, long = "entrypoint")]
        entrypoints: Vec<String>,

        /// Build the graph for this service's pipeline only
        #[arg(short, long, conflicts_with = "entrypoints")]
        service: Option<String>,

        /// Write the graph in DOT format to this file
        #[arg(long)]
        dot: Option<PathBuf>,

        /// Print the graph nodes as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    init_logging(config.log_filter.as_deref(), cli.verbose);

    match cli.command {
        Commands::Validate { topology } => validate::execute(&config.topology_path(topology)?),
        Commands::Graph {
            topology,
            entrypoints,
            service,
            dot,
            json,
        } => graph::execute(&graph::GraphArgs {
            topology: config.topology_path(topology)?,
            entrypoints: config.entrypoints(entrypoints),
            service,
            dot: config.dot_output(dot),
            json,
        }),
    }
}
