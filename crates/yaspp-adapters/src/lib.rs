//! Infrastructure adapters for yaspp.
//!
//! This crate implements the ports defined in `yaspp-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod assets;
pub mod filesystem;
pub mod process;
pub mod reporter;

// Re-export commonly used adapters
pub use assets::EmbeddedAssets;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::{ScriptedProcessRunner, SystemProcessRunner};
pub use reporter::{RecordingReporter, SilentReporter};
