//! Application layer for yaspp provisioning.
//!
//! This layer contains:
//! - **Services**: the provisioning pipeline and the stages it is built from
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. All rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ProvisionReport, ProvisionRequest, ProvisionService, ProvisionSettings, RunMode,
};

// Re-export port traits (for adapter implementation)
pub use ports::{AssetStore, Filesystem, ProcessRunner, Prompter, Reporter};

pub use error::ApplicationError;
