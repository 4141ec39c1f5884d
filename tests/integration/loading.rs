//! Loading topologies and pipelines from disk

use std::fs;

use rollgraph::loader::Rollout;
use rollgraph::pipeline::{Step, StepSpec};

use super::helpers::*;

#[test]
fn test_fixture_loads_every_pipeline() {
    let rollout = load_fixture();

    rollout.topology.validate().expect("fixture topology is valid");
    assert_eq!(rollout.pipelines.len(), 4);
    for service_group in [GLOBAL, REGION, SVC, MGMT] {
        assert_eq!(rollout.pipelines[service_group].service_group, service_group);
    }
    assert!(rollout.services_without_pipeline().is_empty());
}

#[test]
fn test_fixture_step_kinds_decode() {
    let rollout = load_fixture();

    let global = &rollout.pipelines[GLOBAL].resource_groups[0];
    assert!(matches!(global.steps[0], Step::Arm(_)));
    assert!(matches!(global.steps[1], Step::ImageMirror(_)));
    assert!(global.subscription_provisioning.is_some());

    let mirror = &global.steps[1];
    assert_eq!(mirror.action_type(), "ImageMirror");
    assert_eq!(mirror.required_inputs().len(), 1);
    assert!(mirror.is_well_formed_over_inputs());

    let mgmt = &rollout.pipelines[MGMT].resource_groups[0];
    assert!(matches!(mgmt.steps[1], Step::Logs(_)));
    assert_eq!(mgmt.steps[1].dependencies().len(), 1);
}

#[test]
fn test_pipeline_paths_are_relative_to_topology() {
    let topology = format!(
        r#"services:
  - serviceGroup: {REGION}
    pipelinePath: pipelines/region.yaml
"#
    );
    let pipeline = format!(
        r#"serviceGroup: {REGION}
rolloutName: Region
resourceGroups:
  - name: regional
    resourceGroup: hcp-regional
    subscription: hcp-sub
    steps:
      - name: deploy
        action: Shell
        command: make deploy
"#
    );
    let (temp_dir, topology_path) = write_rollout(&topology, &[]);
    fs::create_dir(temp_dir.path().join("pipelines")).unwrap();
    fs::write(temp_dir.path().join("pipelines/region.yaml"), pipeline).unwrap();

    let rollout = Rollout::load(&topology_path).unwrap();
    assert_eq!(rollout.pipelines.len(), 1);
}

#[test]
fn test_service_without_pipeline_is_reported() {
    let topology = format!(
        r#"services:
  - serviceGroup: {REGION}
    children:
      - serviceGroup: {SVC}
"#
    );
    let (_temp_dir, topology_path) = write_rollout(&topology, &[]);

    let rollout = Rollout::load(&topology_path).unwrap();
    assert_eq!(
        rollout.services_without_pipeline(),
        vec![REGION.to_string(), SVC.to_string()]
    );
}

#[test]
fn test_missing_pipeline_file_names_service() {
    let (_temp_dir, topology_path) = write_rollout(&parent_child_topology(REGION, SVC), &[]);

    let err = Rollout::load(&topology_path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains(REGION));
    assert!(message.contains("parent.yaml"));
}

#[test]
fn test_invalid_pipeline_is_rejected_on_load() {
    let topology = format!(
        r#"services:
  - serviceGroup: {REGION}
    pipelinePath: region.yaml
"#
    );
    let pipeline = format!(
        r#"serviceGroup: {REGION}
resourceGroups:
  - name: regional
    resourceGroup: hcp-regional
    subscription: hcp-sub
    steps:
      - name: deploy
        action: Shell
        command: make deploy
        dependsOn:
          - resourceGroup: elsewhere
            step: setup
"#
    );
    let (_temp_dir, topology_path) = write_rollout(&topology, &[("region.yaml", &pipeline)]);

    let err = Rollout::load(&topology_path).unwrap_err();
    assert!(format!("{err:#}").contains("no such resource group elsewhere"));
}
