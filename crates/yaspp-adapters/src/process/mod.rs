//! Process execution adapters.

mod scripted;
mod system;

pub use scripted::{ScriptedProcessRunner, failure, version_or_ok};
pub use system::SystemProcessRunner;
