//! yaspp core - hexagonal architecture implementation
//!
//! This crate provides the domain and application layers for `create-yaspp`,
//! the tool that provisions a new yaspp site project.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          yaspp-cli (create-yaspp)       │
//! │     (args, settings, prompts, output)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (ProvisionService and its stages)      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, ProcessRunner, Prompter,   │
//! │  AssetStore, Reporter)                  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      yaspp-adapters (Infrastructure)    │
//! │ (LocalFilesystem, SystemProcessRunner,  │
//! │  EmbeddedAssets, ...)                   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use yaspp_core::prelude::*;
//!
//! let service = ProvisionService::new(filesystem, runner, prompter, assets, reporter);
//! let report = service.provision(ProvisionRequest {
//!     target: "/work/my-site".into(),
//!     working_dir: "/work".into(),
//!     ..ProvisionRequest::default()
//! })?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, ProvisionReport, ProvisionRequest, ProvisionService, ProvisionSettings,
        RunMode,
        ports::{
            Activity, AssetStore, CommandSpec, Filesystem, OutputLine, ProcessResult,
            ProcessRunner, Prompter, Reporter,
        },
    };
    pub use crate::domain::{
        Confirmation, DomainError, Field, FileKind, OptionsDraft, ResolvedOptions, SiteConfig,
        Stage, TargetPolicy, Tool,
    };
    pub use crate::error::{ErrorCategory, YasppError, YasppResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
