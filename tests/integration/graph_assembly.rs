//! Assembling the fixture rollout into one graph

use rollgraph::graph::Graph;
use rollgraph::topology::Entrypoint;

use super::helpers::*;

fn fixture_graph() -> Graph {
    let rollout = load_fixture();
    Graph::for_entrypoints(
        &rollout.topology,
        &rollout.topology.entrypoints,
        &rollout.pipelines,
    )
    .expect("fixture graph builds")
}

#[test]
fn test_fixture_graph_shape() {
    let graph = fixture_graph();

    assert_eq!(graph.services.len(), 4);
    assert_eq!(graph.nodes.len(), 10);
    assert!(graph.find_cycle().unwrap().is_none());
    assert_eq!(graph.service_validation_steps.len(), 1);

    let subscription = graph.subscription.as_ref().expect("global subscription");
    assert_eq!(subscription.service_group, GLOBAL);
    assert_eq!(subscription.resource_group, "global");
}

#[test]
fn test_fixture_edges_are_symmetric() {
    let graph = fixture_graph();
    for n in &graph.nodes {
        for child in &n.children {
            assert!(node(&graph, child).parents.contains(&n.identifier));
        }
        for parent in &n.parents {
            assert!(node(&graph, parent).children.contains(&n.identifier));
        }
    }
}

#[test]
fn test_sibling_services_share_one_frontier() {
    let graph = fixture_graph();

    let svc_root = node(&graph, &id(SVC, "service", "cluster"));
    let mgmt_root = node(&graph, &id(MGMT, "management", "cluster"));
    assert_eq!(svc_root.parents, mgmt_root.parents);
    assert!(svc_root.parents.contains(&id(REGION, "regional", "zone")));
    assert!(svc_root.parents.contains(&id(REGION, "regional", "rp-registration")));
    // nothing from the service cluster leaks into the management cluster's parents
    assert!(mgmt_root
        .parents
        .iter()
        .all(|p| p.service_group != SVC));
}

#[test]
fn test_inferred_edges_within_service() {
    let graph = fixture_graph();

    // aksCluster input on the Helm step
    assert_eq!(
        node(&graph, &id(SVC, "service", "deploy")).parents,
        vec![id(SVC, "service", "cluster")]
    );
    // shellIdentity input on the mirror step
    assert_eq!(
        node(&graph, &id(GLOBAL, "global", "mirror")).parents,
        vec![id(GLOBAL, "global", "infra")]
    );
}

#[test]
fn test_region_roots_follow_global_leaves() {
    let graph = fixture_graph();

    let mirror = node(&graph, &id(GLOBAL, "global", "mirror"));
    assert!(mirror.children.contains(&id(REGION, "regional", "region")));
    assert!(mirror
        .children
        .contains(&id(REGION, "regional", "rp-registration")));
    // zone depends on region, so it is not a root
    assert!(!mirror.children.contains(&id(REGION, "regional", "zone")));
}

#[test]
fn test_shared_regional_resource_group() {
    let graph = fixture_graph();

    // executionConstraints environments differ only in order
    assert_eq!(
        graph.resource_group_owners("regional"),
        [REGION.to_string(), SVC.to_string()]
    );
    assert_eq!(graph.resource_group_owners("management"), [MGMT.to_string()]);
}

#[test]
fn test_single_service_graph() {
    let rollout = load_fixture();
    let service = rollout.topology.lookup(REGION).unwrap();

    let graph = Graph::for_pipeline(service, &rollout.pipelines[REGION]).unwrap();
    assert_eq!(graph.services.len(), 1);
    assert_eq!(graph.nodes.len(), 3);
    assert!(graph.nodes.iter().all(|n| n.identifier.service_group == REGION));
}

#[test]
fn test_subtree_entrypoint() {
    let rollout = load_fixture();

    let graph = Graph::for_entrypoint(
        &rollout.topology,
        &Entrypoint::new(REGION),
        &rollout.pipelines,
    )
    .unwrap();
    assert_eq!(graph.services.len(), 3);
    assert!(!graph.services.contains_key(GLOBAL));
    assert!(graph.subscription.is_none());
}

#[test]
fn test_fixture_dot() {
    let dot = fixture_graph().to_dot().unwrap();

    assert!(dot.starts_with("digraph regexp {"));
    assert!(dot.contains(" \"Global_global_infra\" [label=\"Global/global/infra\"];\n"));
    assert!(dot.contains(" \"Global_global_mirror\" -> \"Region_regional_region\";\n"));
    assert!(dot.contains(
        " \"Service.Infra_service_cluster\" -> \"Service.Infra_service_deploy\";\n"
    ));
    assert!(dot.contains(" \"serviceValidation\" -> \"Region_regional_region-smoke\";\n"));
}

#[test]
fn test_nodes_serialize_as_json() {
    let graph = fixture_graph();
    let json = serde_json::to_value(&graph.nodes).unwrap();

    let first = &json[0];
    assert!(first["serviceGroup"].is_string());
    assert!(first["resourceGroup"].is_string());
    assert!(first["step"].is_string());
    assert!(first["children"].is_array());
}
