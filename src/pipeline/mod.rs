//! Pipeline definitions and the step dependency model
//!
//! Pipelines arrive here already resolved: configuration values are filled in and
//! templates expanded by the caller. This module only decodes, validates and
//! exposes dependency information.

mod step;
mod types;
mod validation;
mod values;


pub use step::{
    ArmStep, AutomatedRetry, CreateCertificateStep, DelegateChildZoneStep, DryRun, HelmStep,
    ImageMirrorStep, LogsStep, Reference, ResourceProviderRegistrationStep,
    SetCertificateIssuerStep, ShellStep, Step, StepMeta, StepSpec, ValidationStep,
};
pub use types::{
    BuildStep, ExecutionConstraint, Pipeline, ResourceGroup, ResourceGroupMeta,
    SubscriptionProvisioning,
};
pub use values::{inputs_of, ExternalStepDependency, Input, StepDependency, Value, Variable};
