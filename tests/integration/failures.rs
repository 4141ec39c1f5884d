//! Graph assembly failures on rollouts read from disk

use rollgraph::error::GraphError;
use rollgraph::graph::Graph;
use rollgraph::loader::Rollout;

use super::helpers::*;

fn simple_pipeline(service_group: &str, resource_group: &str, subscription: &str) -> String {
    format!(
        r#"serviceGroup: {service_group}
resourceGroups:
  - name: {resource_group}
    resourceGroup: hcp-{resource_group}
    subscription: {subscription}
    steps:
      - name: deploy
        action: Shell
        command: make deploy
"#
    )
}

fn build(topology_path: &std::path::Path) -> Result<Graph, GraphError> {
    let rollout = Rollout::load(topology_path).expect("rollout loads");
    rollout.topology.validate().expect("topology is valid");
    Graph::for_entrypoints(
        &rollout.topology,
        &rollout.topology.entrypoints,
        &rollout.pipelines,
    )
}

#[test]
fn test_conflicting_shared_resource_group() {
    let parent = simple_pipeline(REGION, "shared", "sub-a");
    let child = simple_pipeline(SVC, "shared", "sub-b");
    let (_temp_dir, topology_path) = write_rollout(
        &parent_child_topology(REGION, SVC),
        &[("parent.yaml", &parent), ("child.yaml", &child)],
    );

    let err = build(&topology_path).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, GraphError::ConflictingResourceGroupMetadata { .. }));
    assert!(message.contains(REGION));
    assert!(message.contains("-   subscription: \"sub-a\","));
    assert!(message.contains("+   subscription: \"sub-b\","));
}

#[test]
fn test_cycle_within_pipeline() {
    let parent = format!(
        r#"serviceGroup: {REGION}
resourceGroups:
  - name: regional
    resourceGroup: hcp-regional
    subscription: hcp-sub
    steps:
      - name: first
        action: Shell
        command: make first
        dependsOn:
          - resourceGroup: regional
            step: second
      - name: second
        action: Shell
        command: make second
        dependsOn:
          - resourceGroup: regional
            step: first
"#
    );
    let child = simple_pipeline(SVC, "svc", "hcp-sub");
    let (_temp_dir, topology_path) = write_rollout(
        &parent_child_topology(REGION, SVC),
        &[("parent.yaml", &parent), ("child.yaml", &child)],
    );

    let err = build(&topology_path).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("regional/first"));
    assert!(message.contains("regional/second"));

    let graph = err.into_graph().expect("graph returned with cycle");
    assert_eq!(graph.nodes.len(), 3);
    assert!(graph.to_dot().is_ok());
}

#[test]
fn test_two_subscriptions_in_rollout() {
    let with_subscription = |service_group: &str, resource_group: &str| {
        format!(
            r#"serviceGroup: {service_group}
resourceGroups:
  - name: {resource_group}
    resourceGroup: hcp-{resource_group}
    subscription: hcp-{resource_group}
    subscriptionProvisioning:
      displayName:
        value: {resource_group}
    steps: []
"#
        )
    };
    let parent = with_subscription(REGION, "regional");
    let child = with_subscription(SVC, "svc");
    let (_temp_dir, topology_path) = write_rollout(
        &parent_child_topology(REGION, SVC),
        &[("parent.yaml", &parent), ("child.yaml", &child)],
    );

    let err = build(&topology_path).unwrap_err();
    assert!(matches!(
        err,
        GraphError::DuplicateSubscriptionProvisioning { .. }
    ));
}

#[test]
fn test_pipeline_under_wrong_service() {
    // the child's pipeline file declares the parent's service group
    let parent = simple_pipeline(REGION, "regional", "hcp-sub");
    let (_temp_dir, topology_path) = write_rollout(
        &parent_child_topology(REGION, SVC),
        &[("parent.yaml", &parent), ("child.yaml", &parent)],
    );

    let err = build(&topology_path).unwrap_err();
    assert!(matches!(
        err,
        GraphError::PipelineServiceGroupMismatch { ref service_group, .. } if service_group == SVC
    ));
}

#[test]
fn test_duplicate_service_in_topology() {
    let topology = format!(
        r#"services:
  - serviceGroup: {REGION}
    children:
      - serviceGroup: {REGION}
entrypoints:
  - identifier: ""
"#
    );
    let (_temp_dir, topology_path) = write_rollout(&topology, &[]);

    let rollout = Rollout::load(&topology_path).unwrap();
    let message = rollout.topology.validate().unwrap_err().to_string();
    assert!(message.starts_with("dependency tree invalid: "));
    assert!(message.contains(&format!("duplicate entries: [{REGION}]")));
    assert!(message.contains("entrypoint identifier cannot be empty"));
}
