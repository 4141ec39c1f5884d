//! Structural validation of a single pipeline

use std::collections::{HashMap, HashSet};

use crate::error::PipelineError;

use super::step::StepSpec;
use super::types::Pipeline;

impl Pipeline {
    /// Check the integrity of the pipeline and its resource groups.
    ///
    /// Resource group names must be unique, step names must be unique within their
    /// resource group, and every dependency (declared or inferred from inputs) must
    /// name a step that exists in this pipeline. Cycles are left to graph assembly.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut references: HashMap<&str, HashSet<&str>> = HashMap::new();

        for (index, rg) in self.resource_groups.iter().enumerate() {
            if rg.meta.name.is_empty() {
                return Err(PipelineError::MissingResourceGroupName { index });
            }
            if rg.meta.subscription.is_empty() {
                return Err(PipelineError::MissingSubscription {
                    index,
                    name: rg.meta.name.clone(),
                });
            }
            if references.contains_key(rg.name()) {
                return Err(PipelineError::DuplicateResourceGroup {
                    index,
                    name: rg.meta.name.clone(),
                });
            }

            let mut steps = HashSet::new();
            for (step_index, step) in rg.steps.iter().enumerate() {
                if !steps.insert(step.step_name()) {
                    return Err(PipelineError::DuplicateStepName {
                        index,
                        resource_group: rg.meta.name.clone(),
                        step_index,
                        step: step.step_name().to_string(),
                    });
                }
            }
            references.insert(rg.name(), steps);
        }

        for (index, rg) in self.resource_groups.iter().enumerate() {
            for (step_index, step) in rg.steps.iter().enumerate() {
                for dep in step.dependency_set() {
                    let reason = match references.get(dep.resource_group.as_str()) {
                        None => format!("no such resource group {}", dep.resource_group),
                        Some(group) if !group.contains(dep.step.as_str()) => format!(
                            "resource group {} has no step {}",
                            dep.resource_group, dep.step
                        ),
                        Some(_) => continue,
                    };
                    return Err(PipelineError::UnknownDependency {
                        index,
                        resource_group: rg.meta.name.clone(),
                        step_index,
                        step: step.step_name().to_string(),
                        dependency: dep.to_string(),
                        reason,
                    });
                }
            }
        }

        Ok(())
    }
}
