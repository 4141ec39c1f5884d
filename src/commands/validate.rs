//! `rollgraph validate`: check a topology and every pipeline it references

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::loader::Rollout;
use crate::pipeline::StepSpec;

/// Execute the validate command
pub fn execute(topology_path: &Path) -> Result<()> {
    let rollout = Rollout::load(topology_path)?;
    rollout
        .topology
        .validate()
        .with_context(|| format!("Invalid topology: {}", topology_path.display()))?;

    println!(
        "{} Topology {} is valid ({} root services, {} entrypoints)",
        "✓".green().bold(),
        topology_path.display(),
        rollout.topology.services.len(),
        rollout.topology.entrypoints.len()
    );

    let mut service_groups: Vec<&String> = rollout.pipelines.keys().collect();
    service_groups.sort();
    for service_group in service_groups {
        let pipeline = &rollout.pipelines[service_group];
        let steps: usize = pipeline.resource_groups.iter().map(|rg| rg.steps.len()).sum();
        let opaque = pipeline
            .resource_groups
            .iter()
            .flat_map(|rg| &rg.steps)
            .filter(|step| !step.is_well_formed_over_inputs())
            .count();
        println!(
            "  {} {} ({} resource groups, {} steps, {} with undeclared inputs)",
            "✓".green(),
            service_group,
            pipeline.resource_groups.len(),
            steps,
            opaque
        );
    }

    for service_group in rollout.services_without_pipeline() {
        println!("  {} {} has no pipeline", "!".yellow().bold(), service_group);
    }

    Ok(())
}
