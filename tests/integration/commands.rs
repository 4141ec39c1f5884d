//! The CLI commands run against rollouts on disk

use std::fs;

use rollgraph::commands::graph::{self, GraphArgs};
use rollgraph::commands::validate;

use super::helpers::*;

#[test]
fn test_validate_fixture() {
    validate::execute(&fixture_topology()).expect("fixture validates");
}

#[test]
fn test_validate_rejects_bad_topology() {
    let topology = format!(
        r#"services:
  - serviceGroup: {REGION}
entrypoints:
  - identifier: {SVC}
"#
    );
    let (_temp_dir, topology_path) = write_rollout(&topology, &[]);

    let err = validate::execute(&topology_path).unwrap_err();
    assert!(format!("{err:#}").contains("was not found in the dependency tree"));
}

#[test]
fn test_graph_writes_dot() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let dot = temp_dir.path().join("graph.dot");

    graph::execute(&GraphArgs {
        topology: fixture_topology(),
        dot: Some(dot.clone()),
        ..Default::default()
    })
    .expect("graph command succeeds");

    let content = fs::read_to_string(&dot).unwrap();
    assert!(content.contains("Management.Infra_management_cluster"));
    assert!(content.ends_with('}'));
}

#[test]
fn test_graph_for_single_service() {
    graph::execute(&GraphArgs {
        topology: fixture_topology(),
        service: Some(MGMT.to_string()),
        json: true,
        ..Default::default()
    })
    .expect("single service graph");
}

#[test]
fn test_graph_writes_dot_for_cycle() {
    let pipeline = format!(
        r#"serviceGroup: {REGION}
resourceGroups:
  - name: regional
    resourceGroup: hcp-regional
    subscription: hcp-sub
    steps:
      - name: a
        action: Shell
        command: make a
        dependsOn:
          - resourceGroup: regional
            step: b
      - name: b
        action: Shell
        command: make b
        dependsOn:
          - resourceGroup: regional
            step: a
"#
    );
    let topology = format!(
        r#"services:
  - serviceGroup: {REGION}
    pipelinePath: region.yaml
"#
    );
    let (temp_dir, topology_path) = write_rollout(&topology, &[("region.yaml", &pipeline)]);
    let dot = temp_dir.path().join("cycle.dot");

    let err = graph::execute(&GraphArgs {
        topology: topology_path,
        entrypoints: vec![REGION.to_string()],
        dot: Some(dot.clone()),
        ..Default::default()
    })
    .unwrap_err();

    assert!(format!("{err:#}").contains("cycle detected"));
    let content = fs::read_to_string(&dot).expect("DOT written despite the cycle");
    assert!(content.contains(" \"Region_regional_a\" -> \"Region_regional_b\";\n"));
}

#[test]
fn test_graph_without_entrypoints() {
    let topology = format!(
        r#"services:
  - serviceGroup: {REGION}
"#
    );
    let (_temp_dir, topology_path) = write_rollout(&topology, &[]);

    let err = graph::execute(&GraphArgs {
        topology: topology_path,
        ..Default::default()
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("No entrypoints"));
}
