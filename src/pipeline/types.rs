//! Pipeline type definitions

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::step::{Step, ValidationStep};
use super::values::Value;

/// A service's deployment pipeline: ordered resource groups, each holding steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub service_group: String,
    #[serde(default)]
    pub rollout_name: String,
    #[serde(default)]
    pub resource_groups: Vec<ResourceGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_step: Option<BuildStep>,
}

/// Builds artifacts before any shell steps run, from the pipeline's directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStep {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    #[serde(flatten)]
    pub meta: ResourceGroupMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_provisioning: Option<SubscriptionProvisioning>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_steps: Vec<ValidationStep>,
}

/// Where a resource group deploys to.
///
/// Several services may target the same resource group name as long as they
/// agree on this metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupMeta {
    /// Semantic name, unique across the rollout
    pub name: String,
    /// Azure resource group
    pub resource_group: String,
    /// Subscription key
    pub subscription: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub execution_constraints: Vec<ExecutionConstraint>,
}

/// Restricts where and how often a resource group is deployed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionConstraint {
    pub singleton: bool,
    pub clouds: Vec<String>,
    pub environments: Vec<String>,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionProvisioning {
    pub display_name: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airs_registered_user_principal_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_domains: Option<Value>,
}

impl Pipeline {
    pub fn new(service_group: impl Into<String>) -> Self {
        Self {
            schema: None,
            service_group: service_group.into(),
            rollout_name: String::new(),
            resource_groups: Vec::new(),
            build_step: None,
        }
    }

    pub fn with_resource_groups(mut self, resource_groups: Vec<ResourceGroup>) -> Self {
        self.resource_groups = resource_groups;
        self
    }

    /// Read, parse and validate a pipeline file.
    ///
    /// The file must already be fully resolved; no templating happens here.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to load pipeline file: {}", path.display()))
    }

    /// Parse and validate pipeline content (for testing without file system)
    pub fn from_yaml(content: &str) -> Result<Self> {
        let pipeline: Pipeline =
            serde_yaml::from_str(content).context("Failed to parse pipeline YAML")?;
        pipeline
            .validate()
            .context("Pipeline file failed validation")?;
        Ok(pipeline)
    }
}

impl ResourceGroup {
    pub fn new(
        name: impl Into<String>,
        resource_group: impl Into<String>,
        subscription: impl Into<String>,
    ) -> Self {
        Self {
            meta: ResourceGroupMeta {
                name: name.into(),
                resource_group: resource_group.into(),
                subscription: subscription.into(),
                execution_constraints: Vec::new(),
            },
            subscription_provisioning: None,
            steps: Vec::new(),
            validation_steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_validation_steps(mut self, steps: Vec<ValidationStep>) -> Self {
        self.validation_steps = steps;
        self
    }

    pub fn with_subscription_provisioning(
        mut self,
        provisioning: SubscriptionProvisioning,
    ) -> Self {
        self.subscription_provisioning = Some(provisioning);
        self
    }

    pub fn with_execution_constraints(mut self, constraints: Vec<ExecutionConstraint>) -> Self {
        self.meta.execution_constraints = constraints;
        self
    }
}
