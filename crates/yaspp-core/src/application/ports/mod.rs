//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: file and tree operations
//!   - `ProcessRunner`: external tools (git, yarn, npm)
//!   - `Prompter`: interactive questions
//!   - `AssetStore`: bundled templates and sample site
//!   - `Reporter`: progress and warnings
//!
//! - **Driving (Input) Ports**: the `ProvisionService` itself, called by the CLI

pub mod output;

#[cfg(test)]
pub use output::MockPrompter;
pub use output::{
    Activity, AssetStore, CommandSpec, Filesystem, OutputLine, ProcessResult, ProcessRunner,
    Prompter, Reporter,
};
