pub mod artifact_service;
pub mod config_resolver;
pub mod content_service;
pub mod provision_service;
pub mod target_service;
pub mod tool_probe;

pub use artifact_service::{ArtifactOutcome, ArtifactService};
pub use config_resolver::{ConfigResolver, FIELD_ORDER, ResolveMode};
pub use content_service::{ContentOutcome, ContentRequest, ContentService};
pub use provision_service::{
    ProvisionReport, ProvisionRequest, ProvisionService, ProvisionSettings, RunMode,
};
pub use target_service::{TargetOutcome, TargetPlan, TargetService, protected_names};
pub use tool_probe::ToolProbe;
