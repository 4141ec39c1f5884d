//! Recursive assembly of per-pipeline nodes into one graph across the service forest

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use crate::error::{GraphError, GraphResult};
use crate::pipeline::{Pipeline, ResourceGroupMeta, Step, ValidationStep};
use crate::topology::Service;

use super::identifier::{Identifier, Node};
use super::metadata::{resource_group_meta_diff, resource_group_meta_equal};
use super::nodes::{nodes_for, PipelineNodes};
use super::{Graph, Subscription};

/// Exclusive owner of a graph under construction.
///
/// Nodes live in a flat arena indexed by identifier. While accumulation is in
/// progress edges may be one-sided, so none of this state is exposed until
/// [`GraphBuilder::finish`].
pub(super) struct GraphBuilder<'p> {
    pipelines: &'p HashMap<String, Pipeline>,
    services: HashMap<String, Service>,
    resource_groups: HashMap<String, ResourceGroupMeta>,
    resource_group_owners: HashMap<String, BTreeSet<String>>,
    subscription: Option<Subscription>,
    steps: HashMap<String, HashMap<String, HashMap<String, Step>>>,
    validation_steps: BTreeMap<Identifier, ValidationStep>,
    nodes: Vec<Node>,
    index: HashMap<Identifier, usize>,
}

impl<'p> GraphBuilder<'p> {
    pub fn new(pipelines: &'p HashMap<String, Pipeline>) -> Self {
        Self {
            pipelines,
            services: HashMap::new(),
            resource_groups: HashMap::new(),
            resource_group_owners: HashMap::new(),
            subscription: None,
            steps: HashMap::new(),
            validation_steps: BTreeMap::new(),
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add `service` and its whole sub-tree.
    ///
    /// Every root step of each child service is ordered after every step that had
    /// no children before this service's children were visited.
    pub fn accumulate(&mut self, service: &Service) -> GraphResult<()> {
        let service_group = service.service_group.as_str();
        if self.services.contains_key(service_group) || self.steps.contains_key(service_group) {
            return Err(GraphError::duplicate_service_group(service_group));
        }

        let pipelines = self.pipelines;
        let pipeline = pipelines
            .get(service_group)
            .ok_or_else(|| GraphError::unknown_pipeline(service_group))?;
        if pipeline.service_group != service_group {
            return Err(GraphError::PipelineServiceGroupMismatch {
                service_group: service_group.to_string(),
                declared: pipeline.service_group.clone(),
            });
        }

        debug!(
            service_group,
            children = service.children.len(),
            "accumulating service"
        );
        self.services.insert(service_group.to_string(), service.clone());

        let PipelineNodes {
            resource_groups,
            subscription,
            steps,
            validation_steps,
            nodes,
        } = nodes_for(pipeline)?;

        for (name, meta) in resource_groups {
            self.merge_resource_group(service_group, name, meta)?;
        }
        if let Some(subscription) = subscription {
            self.merge_subscription(subscription)?;
        }
        self.steps.insert(service_group.to_string(), steps);
        self.validation_steps.extend(validation_steps);
        for node in nodes {
            self.push_node(node);
        }

        // children of one parent all hang off the same frontier, not off each other
        let leaves = self.leaves();

        for child in &service.children {
            self.accumulate(child)?;

            let roots = self.roots_of(&child.service_group);
            debug!(
                parent = service_group,
                child = child.service_group.as_str(),
                leaves = leaves.len(),
                roots = roots.len(),
                "stitching child service"
            );
            self.link(&leaves, &roots)?;
        }

        Ok(())
    }

    /// Every node recorded so far, in any service, without children
    pub fn leaves(&self) -> Vec<Identifier> {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.identifier.clone())
            .collect()
    }

    /// Nodes of `service_group` without parents.
    ///
    /// A service has a single parent in the topology, so this runs exactly once per
    /// service and the roots it finds have not been linked to anything yet.
    pub fn roots_of(&self, service_group: &str) -> Vec<Identifier> {
        self.nodes
            .iter()
            .filter(|n| n.identifier.service_group == service_group && n.is_root())
            .map(|n| n.identifier.clone())
            .collect()
    }

    /// Order every root after every leaf
    pub fn link(&mut self, leaves: &[Identifier], roots: &[Identifier]) -> GraphResult<()> {
        if roots.is_empty() {
            return Ok(());
        }
        for root in roots {
            self.node_mut(root)?.parents.extend_from_slice(leaves);
        }
        for leaf in leaves {
            self.node_mut(leaf)?.children.extend_from_slice(roots);
        }
        Ok(())
    }

    fn push_node(&mut self, node: Node) {
        self.index.insert(node.identifier.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn node_mut(&mut self, identifier: &Identifier) -> GraphResult<&mut Node> {
        let position = *self
            .index
            .get(identifier)
            .ok_or_else(|| GraphError::MissingNode {
                identifier: identifier.clone(),
            })?;
        Ok(&mut self.nodes[position])
    }

    fn merge_resource_group(
        &mut self,
        service_group: &str,
        name: String,
        meta: ResourceGroupMeta,
    ) -> GraphResult<()> {
        match self.resource_groups.get(&name) {
            Some(existing) if !resource_group_meta_equal(existing, &meta) => {
                let existing_owners = self
                    .resource_group_owners
                    .get(&name)
                    .map(|owners| owners.iter().cloned().collect())
                    .unwrap_or_default();
                Err(GraphError::ConflictingResourceGroupMetadata {
                    diff: resource_group_meta_diff(existing, &meta),
                    name,
                    existing_owners,
                    new_owner: service_group.to_string(),
                })
            }
            Some(_) => {
                debug!(
                    resource_group = name.as_str(),
                    service_group, "resource group shared with identical metadata"
                );
                self.resource_group_owners
                    .entry(name)
                    .or_default()
                    .insert(service_group.to_string());
                Ok(())
            }
            None => {
                self.resource_group_owners
                    .entry(name.clone())
                    .or_default()
                    .insert(service_group.to_string());
                self.resource_groups.insert(name, meta);
                Ok(())
            }
        }
    }

    fn merge_subscription(&mut self, subscription: Subscription) -> GraphResult<()> {
        if let Some(existing) = &self.subscription {
            return Err(GraphError::DuplicateSubscriptionProvisioning {
                existing: existing.to_string(),
                new: subscription.to_string(),
            });
        }
        self.subscription = Some(subscription);
        Ok(())
    }

    /// Freeze the accumulated state into a graph
    pub fn finish(self) -> Graph {
        Graph {
            services: self.services,
            resource_groups: self.resource_groups,
            subscription: self.subscription,
            steps: self.steps,
            nodes: self.nodes,
            service_validation_steps: self.validation_steps,
            resource_group_owners: self
                .resource_group_owners
                .into_iter()
                .map(|(name, owners)| (name, owners.into_iter().collect()))
                .collect(),
        }
    }
}
