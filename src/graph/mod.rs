//! Execution graph of every step in a rollout
//!
//! Per-pipeline node sets are stitched together across the service forest: every
//! leaf step of a parent service runs before any root step of its child services.
//! The finished graph is checked for cycles before it is handed out.

mod builder;
mod cycle;
mod dot;
mod identifier;
mod metadata;
mod nodes;


use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::error::{GraphError, GraphResult};
use crate::pipeline::{Pipeline, ResourceGroupMeta, Step, SubscriptionProvisioning, ValidationStep};
use crate::topology::{Entrypoint, Service, Topology};

use builder::GraphBuilder;

pub use dot::{marshal_dot, shorten_service_group};
pub use identifier::{Identifier, Node};

/// The single subscription provisioning declaration of a graph
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub service_group: String,
    pub resource_group: String,
    pub config: SubscriptionProvisioning,
}

impl std::fmt::Display for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.service_group, self.resource_group)
    }
}

/// A validated, acyclic step graph.
///
/// Immutable once returned from a constructor.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Every service that contributed nodes, keyed by service group
    pub services: HashMap<String, Service>,
    /// Resource group metadata keyed by resource group name
    pub resource_groups: HashMap<String, ResourceGroupMeta>,
    pub subscription: Option<Subscription>,
    /// Step definitions by service group, resource group and step name
    pub steps: HashMap<String, HashMap<String, HashMap<String, Step>>>,
    pub nodes: Vec<Node>,
    pub service_validation_steps: BTreeMap<Identifier, ValidationStep>,
    resource_group_owners: HashMap<String, Vec<String>>,
}

impl Graph {
    /// Graph for a single service's pipeline. Children of `service` are ignored.
    pub fn for_pipeline(service: &Service, pipeline: &Pipeline) -> GraphResult<Self> {
        let pipelines = HashMap::from([(service.service_group.clone(), pipeline.clone())]);

        let mut builder = GraphBuilder::new(&pipelines);
        builder.accumulate(&service.without_children())?;
        builder.finish().into_checked()
    }

    /// Graph for the sub-tree rooted at one entrypoint
    pub fn for_entrypoint(
        topology: &Topology,
        entrypoint: &Entrypoint,
        pipelines: &HashMap<String, Pipeline>,
    ) -> GraphResult<Self> {
        Self::for_entrypoints(topology, std::slice::from_ref(entrypoint), pipelines)
    }

    /// Graph for the sub-trees rooted at each entrypoint, in order.
    ///
    /// Entrypoints must select disjoint sub-trees; a service reached twice is an
    /// error.
    pub fn for_entrypoints(
        topology: &Topology,
        entrypoints: &[Entrypoint],
        pipelines: &HashMap<String, Pipeline>,
    ) -> GraphResult<Self> {
        let mut builder = GraphBuilder::new(pipelines);
        for entrypoint in entrypoints {
            let root = topology
                .lookup(&entrypoint.identifier)
                .map_err(|source| GraphError::EntrypointLookup {
                    entrypoint: entrypoint.identifier.clone(),
                    source,
                })?;
            builder.accumulate(root)?;
        }
        builder.finish().into_checked()
    }

    /// Run cycle detection, handing the graph back inside the error on failure
    fn into_checked(self) -> GraphResult<Self> {
        info!(
            services = self.services.len(),
            nodes = self.nodes.len(),
            "graph assembled"
        );
        match cycle::find_cycle(&self.nodes)? {
            Some(cycle) => Err(GraphError::CycleDetected {
                cycle,
                graph: Box::new(self),
            }),
            None => Ok(self),
        }
    }

    /// Path of the first cycle found, if any
    pub fn find_cycle(&self) -> GraphResult<Option<Vec<Identifier>>> {
        cycle::find_cycle(&self.nodes)
    }

    pub fn node(&self, identifier: &Identifier) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.identifier == identifier)
    }

    pub fn step(&self, identifier: &Identifier) -> Option<&Step> {
        self.steps
            .get(&identifier.service_group)?
            .get(&identifier.resource_group)?
            .get(&identifier.step)
    }

    /// Services that declared resource group `name`, sorted
    pub fn resource_group_owners(&self, name: &str) -> &[String] {
        self.resource_group_owners
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn to_dot(&self) -> GraphResult<String> {
        marshal_dot(&self.nodes, &self.service_validation_steps)
    }
}
