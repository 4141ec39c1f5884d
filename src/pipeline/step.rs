//! Step kinds and the capability set every kind exposes to graph assembly
//!
//! Steps are decoded from the `action` field into one variant of [`Step`]. Graph
//! assembly only ever talks to steps through [`StepSpec`], so adding a kind means
//! adding a variant and saying which of its values can carry inputs.

use serde::{Deserialize, Serialize};

use super::values::{inputs_of, ExternalStepDependency, StepDependency, Value, Variable};

/// Fields shared by every step kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<StepDependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub external_depends_on: Vec<ExternalStepDependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automated_retry: Option<AutomatedRetry>,
}

impl StepMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Retry policy for the step executor; graph assembly carries it untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomatedRetry {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_contains_any: Vec<String>,
    pub maximum_retries: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_between_retries: Option<String>,
}

/// Capabilities every step kind implements.
pub trait StepSpec {
    fn meta(&self) -> &StepMeta;

    /// The `action` discriminator this kind is decoded from
    fn action_type(&self) -> &'static str;

    fn step_name(&self) -> &str {
        &self.meta().name
    }

    fn description(&self) -> String {
        format!("Step {}\n  Kind: {}", self.step_name(), self.action_type())
    }

    /// Explicit same-service ordering declared by the pipeline author
    fn dependencies(&self) -> Vec<StepDependency> {
        self.meta().depends_on.clone()
    }

    /// Same-service ordering implied by values wired to other steps' outputs
    fn required_inputs(&self) -> Vec<StepDependency> {
        Vec::new()
    }

    fn external_dependencies(&self) -> Vec<ExternalStepDependency> {
        self.meta().external_depends_on.clone()
    }

    fn automated_retries(&self) -> Option<&AutomatedRetry> {
        self.meta().automated_retry.as_ref()
    }

    /// Whether [`StepSpec::required_inputs`] captures everything the step reads
    fn is_well_formed_over_inputs(&self) -> bool {
        true
    }

    /// `dependencies() ∪ required_inputs()`, sorted by (resource group, step) and deduplicated
    fn dependency_set(&self) -> Vec<StepDependency> {
        let mut deps = self.dependencies();
        deps.extend(self.required_inputs());
        deps.sort();
        deps.dedup();
        deps
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArmStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    pub variables: Vec<Variable>,
    pub template: String,
    pub parameters: String,
    pub deployment_level: String,
    pub output_only: bool,
    pub deployment_mode: String,
}

impl StepSpec for ArmStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "ARM"
    }

    fn description(&self) -> String {
        format!(
            "Step {}\n  Kind: {}\n  Template: {}\n  Parameters: {}",
            self.meta.name,
            self.action_type(),
            self.template,
            self.parameters
        )
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of(self.variables.iter().map(|v| &v.value))
    }
}

/// Commands for a shell step's dry run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DryRun {
    pub variables: Vec<Variable>,
    pub command: String,
}

/// A file exposed to a shell step through an environment variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    #[serde(rename = "filepath")]
    pub file_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    pub command: String,
    pub variables: Vec<Variable>,
    pub dry_run: DryRun,
    pub references: Vec<Reference>,
    pub subnet_id: String,
    pub shell_identity: Value,
}

impl ShellStep {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            meta: StepMeta::named(name),
            command: command.into(),
            ..Default::default()
        }
    }

    pub fn with_depends_on(mut self, depends_on: Vec<StepDependency>) -> Self {
        self.meta.depends_on = depends_on;
        self
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }
}

impl StepSpec for ShellStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "Shell"
    }

    fn description(&self) -> String {
        format!(
            "Step {}\n  Kind: {}\n  Command: {}",
            self.meta.name,
            self.action_type(),
            self.command
        )
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of(
            self.variables
                .iter()
                .chain(&self.dry_run.variables)
                .map(|v| &v.value)
                .chain(std::iter::once(&self.shell_identity)),
        )
    }

    // arbitrary commands can read anything
    fn is_well_formed_over_inputs(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HelmStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    pub release_name: String,
    pub release_namespace: String,
    pub chart_dir: String,
    pub values_file: String,
    pub aks_cluster: Value,
    pub identity_from: Value,
    pub variables: Vec<Variable>,
}

impl StepSpec for HelmStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "Helm"
    }

    fn description(&self) -> String {
        format!(
            "Step {}\n  Kind: {}\n  Release: {}/{}\n  Chart: {}",
            self.meta.name,
            self.action_type(),
            self.release_namespace,
            self.release_name,
            self.chart_dir
        )
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of(
            self.variables
                .iter()
                .map(|v| &v.value)
                .chain([&self.aks_cluster, &self.identity_from]),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DelegateChildZoneStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    pub parent_zone: Value,
    pub child_zone: Value,
}

impl StepSpec for DelegateChildZoneStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "DelegateChildZone"
    }

    fn description(&self) -> String {
        format!(
            "Step {}\n  Kind: {}\n  Parent: {}\n  Child: {}",
            self.meta.name,
            self.action_type(),
            self.parent_zone,
            self.child_zone
        )
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of([&self.parent_zone, &self.child_zone])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetCertificateIssuerStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    pub vault_base_url: Value,
    pub issuer: Value,
    pub secret_key_vault: Value,
    pub secret_name: Value,
    pub application_id: Value,
}

impl StepSpec for SetCertificateIssuerStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "SetCertificateIssuer"
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of([
            &self.vault_base_url,
            &self.issuer,
            &self.secret_key_vault,
            &self.secret_name,
            &self.application_id,
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateCertificateStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    pub vault_base_url: Value,
    pub certificate_name: Value,
    pub content_type: Value,
    pub san: Value,
    pub issuer: Value,
    pub secret_key_vault: Value,
    pub secret_name: Value,
    pub application_id: Value,
    pub common_name: Value,
}

impl StepSpec for CreateCertificateStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "CreateCertificate"
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of([
            &self.vault_base_url,
            &self.certificate_name,
            &self.content_type,
            &self.san,
            &self.issuer,
            &self.secret_key_vault,
            &self.secret_name,
            &self.application_id,
            &self.common_name,
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceProviderRegistrationStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    pub resource_provider_namespaces: Value,
}

impl StepSpec for ResourceProviderRegistrationStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "ResourceProviderRegistration"
    }

    fn description(&self) -> String {
        format!(
            "Step {}\n  Kind: {}\n  Namespaces: {}",
            self.meta.name,
            self.action_type(),
            self.resource_provider_namespaces
        )
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of([&self.resource_provider_namespaces])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageMirrorStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    #[serde(rename = "targetACR")]
    pub target_acr: Value,
    pub source_registry: Value,
    pub repository: Value,
    pub digest: Value,
    pub copy_from: String,
    pub image_file_path: Value,
    pub image_tar_file_name: Value,
    pub image_metadata_file_name: Value,
    pub pull_secret_key_vault: Value,
    pub pull_secret_name: Value,
    pub shell_identity: Value,
    pub ado_project: Value,
    pub artifact_name: Value,
    pub build_id: Value,
}

impl StepSpec for ImageMirrorStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "ImageMirror"
    }

    fn description(&self) -> String {
        format!(
            "Step {}\n  Kind: {}\n  From {}:{}@{} to {}",
            self.meta.name,
            self.action_type(),
            self.source_registry,
            self.repository,
            self.digest,
            self.target_acr
        )
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of([
            &self.target_acr,
            &self.source_registry,
            &self.repository,
            &self.digest,
            &self.image_file_path,
            &self.image_tar_file_name,
            &self.image_metadata_file_name,
            &self.pull_secret_key_vault,
            &self.pull_secret_name,
            &self.shell_identity,
        ])
    }

    // copying from a local OCI layout reads files the inputs don't describe
    fn is_well_formed_over_inputs(&self) -> bool {
        self.copy_from != "oci-layout"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogsStep {
    #[serde(flatten)]
    pub meta: StepMeta,
    pub subscription_id: Value,
    pub namespace: Value,
    #[serde(rename = "certsan")]
    pub cert_san: Value,
    #[serde(rename = "certdescription")]
    pub cert_description: Value,
    pub config_version: Value,
}

impl StepSpec for LogsStep {
    fn meta(&self) -> &StepMeta {
        &self.meta
    }

    fn action_type(&self) -> &'static str {
        "Logs"
    }

    fn required_inputs(&self) -> Vec<StepDependency> {
        inputs_of([
            &self.subscription_id,
            &self.namespace,
            &self.cert_san,
            &self.cert_description,
            &self.config_version,
        ])
    }
}

/// A pipeline step, decoded by its `action` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Step {
    #[serde(rename = "ARM")]
    Arm(ArmStep),
    Shell(ShellStep),
    Helm(HelmStep),
    DelegateChildZone(DelegateChildZoneStep),
    SetCertificateIssuer(SetCertificateIssuerStep),
    CreateCertificate(CreateCertificateStep),
    ResourceProviderRegistration(ResourceProviderRegistrationStep),
    ImageMirror(ImageMirrorStep),
    Logs(LogsStep),
}

impl Step {
    fn inner(&self) -> &dyn StepSpec {
        match self {
            Self::Arm(s) => s,
            Self::Shell(s) => s,
            Self::Helm(s) => s,
            Self::DelegateChildZone(s) => s,
            Self::SetCertificateIssuer(s) => s,
            Self::CreateCertificate(s) => s,
            Self::ResourceProviderRegistration(s) => s,
            Self::ImageMirror(s) => s,
            Self::Logs(s) => s,
        }
    }
}

/// A service validation step, run after the rollout rather than as part of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ValidationStep {
    Shell(ShellStep),
}

impl ValidationStep {
    fn inner(&self) -> &dyn StepSpec {
        match self {
            Self::Shell(s) => s,
        }
    }
}

macro_rules! delegate_step_spec {
    ($ty:ty) => {
        impl StepSpec for $ty {
            fn meta(&self) -> &StepMeta {
                self.inner().meta()
            }

            fn action_type(&self) -> &'static str {
                self.inner().action_type()
            }

            fn description(&self) -> String {
                self.inner().description()
            }

            fn required_inputs(&self) -> Vec<StepDependency> {
                self.inner().required_inputs()
            }

            fn is_well_formed_over_inputs(&self) -> bool {
                self.inner().is_well_formed_over_inputs()
            }
        }
    };
}

delegate_step_spec!(Step);
delegate_step_spec!(ValidationStep);

impl From<ShellStep> for Step {
    fn from(step: ShellStep) -> Self {
        Self::Shell(step)
    }
}

impl From<ArmStep> for Step {
    fn from(step: ArmStep) -> Self {
        Self::Arm(step)
    }
}
