//! `rollgraph graph`: assemble the step graph and optionally render it

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::GraphError;
use crate::graph::Graph;
use crate::loader::Rollout;
use crate::topology::Entrypoint;

/// Resolved arguments for the graph command
#[derive(Debug, Clone, Default)]
pub struct GraphArgs {
    pub topology: PathBuf,
    pub entrypoints: Vec<String>,
    /// Build the graph of this service's pipeline alone
    pub service: Option<String>,
    pub dot: Option<PathBuf>,
    pub json: bool,
}

/// Execute the graph command
pub fn execute(args: &GraphArgs) -> Result<()> {
    let rollout = Rollout::load(&args.topology)?;
    rollout
        .topology
        .validate()
        .with_context(|| format!("Invalid topology: {}", args.topology.display()))?;

    let graph = match build(&rollout, args) {
        Ok(graph) => graph,
        Err(err) => {
            // a cyclic graph is still worth looking at
            let cyclic = err.downcast_ref::<GraphError>().and_then(GraphError::graph);
            if let (Some(graph), Some(path)) = (cyclic, &args.dot) {
                write_dot(graph, path)?;
            }
            return Err(err).context("Failed to build graph");
        }
    };

    if let Some(path) = &args.dot {
        write_dot(&graph, path)?;
    }

    if args.json {
        let json = serde_json::to_string_pretty(&graph.nodes)
            .context("Failed to serialize graph nodes")?;
        println!("{json}");
    } else {
        print_summary(&graph);
    }
    Ok(())
}

fn build(rollout: &Rollout, args: &GraphArgs) -> Result<Graph> {
    if let Some(service_group) = &args.service {
        let service = rollout.topology.lookup(service_group)?;
        let pipeline = rollout
            .pipelines
            .get(service_group)
            .with_context(|| format!("Service {service_group} has no pipeline"))?;
        return Ok(Graph::for_pipeline(service, pipeline)?);
    }

    let entrypoints: Vec<Entrypoint> = if args.entrypoints.is_empty() {
        rollout.topology.entrypoints.clone()
    } else {
        args.entrypoints.iter().map(Entrypoint::new).collect()
    };
    if entrypoints.is_empty() {
        bail!(
            "No entrypoints: pass --entrypoint, --service, or declare entrypoints in the topology"
        );
    }

    Ok(Graph::for_entrypoints(
        &rollout.topology,
        &entrypoints,
        &rollout.pipelines,
    )?)
}

fn write_dot(graph: &Graph, path: &Path) -> Result<()> {
    let dot = graph.to_dot()?;
    std::fs::write(path, dot)
        .with_context(|| format!("Failed to write DOT file: {}", path.display()))?;
    info!(path = %path.display(), "wrote DOT graph");
    Ok(())
}

fn print_summary(graph: &Graph) {
    let roots = graph.nodes.iter().filter(|n| n.is_root()).count();
    let leaves = graph.nodes.iter().filter(|n| n.is_leaf()).count();

    println!(
        "{} Graph is acyclic: {} services, {} resource groups, {} steps",
        "✓".green().bold(),
        graph.services.len(),
        graph.resource_groups.len(),
        graph.nodes.len()
    );
    println!("  {} root steps, {} leaf steps", roots, leaves);
    if let Some(subscription) = &graph.subscription {
        println!("  subscription provisioned by {}", subscription.to_string().cyan());
    }
    if !graph.service_validation_steps.is_empty() {
        println!(
            "  {} service validation steps",
            graph.service_validation_steps.len()
        );
    }

    let mut shared: Vec<(&String, &[String])> = graph
        .resource_groups
        .keys()
        .map(|name| (name, graph.resource_group_owners(name)))
        .filter(|(_, owners)| owners.len() > 1)
        .collect();
    shared.sort();
    for (name, owners) in shared {
        println!("  resource group {} shared by {}", name.bold(), owners.join(", "));
    }
}
