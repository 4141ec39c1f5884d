//! Node construction for a single pipeline

use std::collections::{BTreeMap, HashMap};

use crate::error::{GraphError, GraphResult};
use crate::pipeline::{Pipeline, ResourceGroupMeta, Step, StepSpec, ValidationStep};

use super::identifier::{Identifier, Node};
use super::Subscription;

/// Everything one pipeline contributes to a graph
pub(super) struct PipelineNodes {
    pub resource_groups: BTreeMap<String, ResourceGroupMeta>,
    pub subscription: Option<Subscription>,
    pub steps: HashMap<String, HashMap<String, Step>>,
    pub validation_steps: BTreeMap<Identifier, ValidationStep>,
    /// Sorted by identifier
    pub nodes: Vec<Node>,
}

/// An inter-step dependency, only used while nodes are being built
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Edge {
    from: Identifier,
    to: Identifier,
}

/// Build the nodes for one pipeline, with edges from declared and inferred
/// dependencies. Knows nothing about other services.
pub(super) fn nodes_for(pipeline: &Pipeline) -> GraphResult<PipelineNodes> {
    let service_group = pipeline.service_group.as_str();

    // registries of steps by (resource group, step name) and resource groups by name
    let mut resource_groups = BTreeMap::new();
    let mut subscription: Option<Subscription> = None;
    let mut steps: HashMap<String, HashMap<String, Step>> = HashMap::new();
    let mut validation_steps = BTreeMap::new();
    let mut nodes: BTreeMap<Identifier, Node> = BTreeMap::new();

    for rg in &pipeline.resource_groups {
        let name = rg.name();
        if resource_groups
            .insert(name.to_string(), rg.meta.clone())
            .is_some()
        {
            return Err(GraphError::DuplicateResourceGroup {
                service_group: service_group.to_string(),
                resource_group: name.to_string(),
            });
        }

        if let Some(provisioning) = &rg.subscription_provisioning {
            if subscription.is_some() {
                return Err(GraphError::MultipleSubscriptionsInPipeline {
                    service_group: service_group.to_string(),
                });
            }
            subscription = Some(Subscription {
                service_group: service_group.to_string(),
                resource_group: name.to_string(),
                config: provisioning.clone(),
            });
        }

        let registry = steps.entry(name.to_string()).or_default();
        for step in &rg.steps {
            let identifier = Identifier::new(service_group, name, step.step_name());
            if registry
                .insert(step.step_name().to_string(), step.clone())
                .is_some()
            {
                return Err(GraphError::DuplicateStepName {
                    service_group: service_group.to_string(),
                    resource_group: name.to_string(),
                    step: step.step_name().to_string(),
                });
            }
            nodes.insert(identifier.clone(), Node::new(identifier));
        }

        for step in &rg.validation_steps {
            validation_steps.insert(
                Identifier::new(service_group, name, step.step_name()),
                step.clone(),
            );
        }
    }

    let mut edges = Vec::new();
    for rg in &pipeline.resource_groups {
        for step in &rg.steps {
            let to = Identifier::new(service_group, rg.name(), step.step_name());
            for dep in step.dependency_set() {
                let from = Identifier::from_dependency(service_group, &dep);
                if !nodes.contains_key(&from) {
                    return Err(GraphError::UnknownDependency {
                        service_group: service_group.to_string(),
                        step: format!("{}/{}", rg.name(), step.step_name()),
                        dependency: dep.to_string(),
                    });
                }
                edges.push(Edge {
                    from,
                    to: to.clone(),
                });
            }
        }
    }
    edges.sort();

    // edges are sorted, so parents and children come out sorted as well
    for edge in edges {
        if let Some(node) = nodes.get_mut(&edge.to) {
            node.parents.push(edge.from.clone());
        }
        if let Some(node) = nodes.get_mut(&edge.from) {
            node.children.push(edge.to);
        }
    }

    Ok(PipelineNodes {
        resource_groups,
        subscription,
        steps,
        validation_steps,
        nodes: nodes.into_values().collect(),
    })
}
