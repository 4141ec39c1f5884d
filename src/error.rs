//! Error types for topology validation, pipeline validation and graph assembly
//!
//! Every failure here is fatal to the rollout that triggered it. Construction is a
//! pure function of its inputs, so nothing in this module is retryable.

use thiserror::Error;

use crate::graph::{Graph, Identifier};

/// Result type for graph assembly
pub type GraphResult<T> = Result<T, GraphError>;

/// Lookup of a service group that is not part of the topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("service group {service_group} not found in service tree")]
pub struct ServiceNotFoundError {
    pub service_group: String,
}

/// Problems found while validating a topology.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Every duplicate and entrypoint problem, collected in one pass
    #[error("dependency tree invalid: {}", .problems.join(", "))]
    Invalid { problems: Vec<String> },
}

/// Problems found while validating a single pipeline definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("pipeline.resourceGroups[{index}:{name}]: resource group name {name:?} duplicated")]
    DuplicateResourceGroup { index: usize, name: String },

    #[error("pipeline.resourceGroups[{index}:{resource_group}].steps[{step_index}:{step}]: step name {step:?} duplicated")]
    DuplicateStepName {
        index: usize,
        resource_group: String,
        step_index: usize,
        step: String,
    },

    #[error("pipeline.resourceGroups[{index}]: resource group name is required")]
    MissingResourceGroupName { index: usize },

    #[error("pipeline.resourceGroups[{index}:{name}]: subscription is required")]
    MissingSubscription { index: usize, name: String },

    #[error("pipeline.resourceGroups[{index}:{resource_group}].steps[{step_index}:{step}]: dependency {dependency} invalid: {reason}")]
    UnknownDependency {
        index: usize,
        resource_group: String,
        step_index: usize,
        step: String,
        dependency: String,
        reason: String,
    },
}

/// Errors that abort graph assembly.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// The same service group was reached twice while walking the topology
    #[error("service group {service_group} already recorded")]
    DuplicateServiceGroup { service_group: String },

    /// One pipeline declares the same resource group twice
    #[error("resource group {resource_group} declared more than once in pipeline {service_group}")]
    DuplicateResourceGroup {
        service_group: String,
        resource_group: String,
    },

    /// Two steps in one resource group share a name
    #[error("step {resource_group}/{step} declared more than once in pipeline {service_group}")]
    DuplicateStepName {
        service_group: String,
        resource_group: String,
        step: String,
    },

    /// The topology names a service for which no pipeline was supplied
    #[error("pipeline for service {service_group} not found")]
    UnknownPipelineForService { service_group: String },

    /// A pipeline was supplied under a key that differs from its own service group
    #[error("pipeline registered for service {service_group} declares service group {declared}")]
    PipelineServiceGroupMismatch {
        service_group: String,
        declared: String,
    },

    /// A step depends on a step that its pipeline does not declare
    #[error("step {step} in pipeline {service_group} depends on unknown step {dependency}")]
    UnknownDependency {
        service_group: String,
        step: String,
        dependency: String,
    },

    #[error("multiple subscriptions found for pipeline {service_group}")]
    MultipleSubscriptionsInPipeline { service_group: String },

    /// Same resource group name, differing metadata across services
    #[error("resource group {name} already recorded with different step meta (existing services: {}, new service: {new_owner}), diff:\n{diff}", .existing_owners.join(", "))]
    ConflictingResourceGroupMetadata {
        name: String,
        existing_owners: Vec<String>,
        new_owner: String,
        diff: String,
    },

    /// A second subscription provisioning declaration, anywhere in the graph
    #[error("subscription provisioning already recorded for {existing}, cannot add another for {new}")]
    DuplicateSubscriptionProvisioning { existing: String, new: String },

    #[error("failed to lookup entrypoint {entrypoint}: {source}")]
    EntrypointLookup {
        entrypoint: String,
        #[source]
        source: ServiceNotFoundError,
    },

    /// The assembled graph is not acyclic.
    ///
    /// The graph is carried along so that callers can still inspect or render it.
    #[error("cycle detected: {}", render_path(.cycle))]
    CycleDetected {
        cycle: Vec<Identifier>,
        graph: Box<Graph>,
    },

    /// An edge points at a node that does not exist; always a bug in assembly
    #[error("could not find node {identifier} - programmer error")]
    MissingNode { identifier: Identifier },

    #[error("invalid service group: {service_group:?} (expected at least 5 dot-separated parts, e.g. \"a.b.c.d.e\")")]
    InvalidServiceGroup { service_group: String },
}

impl GraphError {
    /// Creates a duplicate service group error
    pub fn duplicate_service_group(service_group: impl Into<String>) -> Self {
        Self::DuplicateServiceGroup {
            service_group: service_group.into(),
        }
    }

    /// Creates an unknown pipeline error
    pub fn unknown_pipeline(service_group: impl Into<String>) -> Self {
        Self::UnknownPipelineForService {
            service_group: service_group.into(),
        }
    }

    /// Creates an invalid service group error
    pub fn invalid_service_group(service_group: impl Into<String>) -> Self {
        Self::InvalidServiceGroup {
            service_group: service_group.into(),
        }
    }

    /// The graph that failed cycle detection, if this is a cycle error.
    pub fn graph(&self) -> Option<&Graph> {
        match self {
            Self::CycleDetected { graph, .. } => Some(graph.as_ref()),
            _ => None,
        }
    }

    /// Consumes the error, returning the cyclic graph if there was one.
    pub fn into_graph(self) -> Option<Graph> {
        match self {
            Self::CycleDetected { graph, .. } => Some(*graph),
            _ => None,
        }
    }
}

fn render_path(cycle: &[Identifier]) -> String {
    cycle
        .iter()
        .map(|id| format!("{}/{}", id.resource_group, id.step))
        .collect::<Vec<_>>()
        .join(" -> ")
}
