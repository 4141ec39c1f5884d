//! Graph vertex keys and nodes

use serde::{Deserialize, Serialize};

use crate::pipeline::StepDependency;

/// Identifies a step across every pipeline in a rollout.
///
/// Ordering is by service group, then resource group, then step name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub service_group: String,
    pub resource_group: String,
    pub step: String,
}

impl Identifier {
    pub fn new(
        service_group: impl Into<String>,
        resource_group: impl Into<String>,
        step: impl Into<String>,
    ) -> Self {
        Self {
            service_group: service_group.into(),
            resource_group: resource_group.into(),
            step: step.into(),
        }
    }

    /// Qualify a same-service dependency with its service group
    pub fn from_dependency(service_group: &str, dependency: &StepDependency) -> Self {
        Self::new(service_group, &dependency.resource_group, &dependency.step)
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.service_group, self.resource_group, self.step)
    }
}

/// A step and its direct neighbours.
///
/// Deliberately data-only: nothing here points back at the step definition, so
/// graph algorithms can be exercised without building real steps. Edges are kept
/// symmetric: `a` is in `b.parents` exactly when `b` is in `a.children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub identifier: Identifier,
    /// Direct children (not further descendants)
    pub children: Vec<Identifier>,
    /// Direct parents (not further ancestors)
    pub parents: Vec<Identifier>,
}

impl Node {
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            children: Vec::new(),
            parents: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
