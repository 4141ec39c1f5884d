//! Shared helpers for loading fixtures and writing throwaway rollouts

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use rollgraph::graph::{Graph, Identifier, Node};
use rollgraph::loader::Rollout;

pub const GLOBAL: &str = "Microsoft.Azure.ARO.HCP.Global";
pub const REGION: &str = "Microsoft.Azure.ARO.HCP.Region";
pub const SVC: &str = "Microsoft.Azure.ARO.HCP.Service.Infra";
pub const MGMT: &str = "Microsoft.Azure.ARO.HCP.Management.Infra";

/// Path to the checked-in sample rollout topology
pub fn fixture_topology() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("rollout")
        .join("topology.yaml")
}

pub fn load_fixture() -> Rollout {
    Rollout::load(&fixture_topology()).expect("Failed to load fixture rollout")
}

/// Write a topology and its pipeline files into a fresh temp directory.
/// Returns the directory guard and the topology path.
pub fn write_rollout(topology: &str, pipelines: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let topology_path = temp_dir.path().join("topology.yaml");
    fs::write(&topology_path, topology).expect("Failed to write topology");
    for (name, content) in pipelines {
        fs::write(temp_dir.path().join(name), content).expect("Failed to write pipeline");
    }
    (temp_dir, topology_path)
}

/// A two-service topology: `parent` with a single child `child`
pub fn parent_child_topology(parent: &str, child: &str) -> String {
    format!(
        r#"services:
  - serviceGroup: {parent}
    pipelinePath: parent.yaml
    children:
      - serviceGroup: {child}
        pipelinePath: child.yaml
entrypoints:
  - identifier: {parent}
"#
    )
}

pub fn id(service_group: &str, resource_group: &str, step: &str) -> Identifier {
    Identifier::new(service_group, resource_group, step)
}

pub fn node<'g>(graph: &'g Graph, identifier: &Identifier) -> &'g Node {
    graph
        .node(identifier)
        .unwrap_or_else(|| panic!("missing node {identifier}"))
}
