//! Step references and configurable values

use serde::{Deserialize, Serialize};

/// A reference to a step in the same service group.
///
/// Ordering is by resource group, then step name.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDependency {
    pub resource_group: String,
    pub step: String,
}

impl StepDependency {
    pub fn new(resource_group: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            resource_group: resource_group.into(),
            step: step.into(),
        }
    }
}

impl std::fmt::Display for StepDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.resource_group, self.step)
    }
}

/// A reference to a step owned by another service group
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalStepDependency {
    pub service_group: String,
    pub resource_group: String,
    pub step: String,
}

/// Wires a value to a named output of another step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Input {
    pub name: String,
    #[serde(flatten)]
    pub step: StepDependency,
}

/// A configurable value: a literal, a configuration reference, or another step's output.
///
/// Configuration references are resolved before pipelines reach this crate; only
/// `input` matters for ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Input>,
}

impl Value {
    pub fn literal(value: impl Into<serde_yaml::Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn from_input(name: impl Into<String>, step: StepDependency) -> Self {
        Self {
            input: Some(Input {
                name: name.into(),
                step,
            }),
            ..Default::default()
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(input) = &self.input {
            write!(f, "{}.{}", input.step, input.name)
        } else if let Some(config_ref) = &self.config_ref {
            write!(f, "{{{{ .{config_ref} }}}}")
        } else if let Some(value) = &self.value {
            match value {
                serde_yaml::Value::String(s) => write!(f, "{s}"),
                other => write!(f, "{other:?}"),
            }
        } else {
            Ok(())
        }
    }
}

/// A named value, exported to a step's environment or template parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(flatten)]
    pub value: Value,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Collect the steps that the given values read outputs from, sorted and deduplicated.
pub fn inputs_of<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<StepDependency> {
    let mut deps: Vec<StepDependency> = values
        .into_iter()
        .filter_map(|v| v.input.as_ref().map(|input| input.step.clone()))
        .collect();
    deps.sort();
    deps.dedup();
    deps
}
