//! Application layer errors.
//!
//! These errors represent failures in orchestration, not rule violations.
//! Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{DomainError, Tool};
use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Resolution finished with rule violations and no way to re-edit.
    #[error("Invalid options:\n{}", format_issues(.0))]
    ValidationFailed(Vec<DomainError>),

    /// Mandatory external tools are not installed.
    #[error("Required tools not found: {}", format_tools(.tools))]
    ToolMissing { tools: Vec<Tool> },

    /// Target path cannot be used as a directory.
    #[error("Target {path} is unusable: {reason}")]
    TargetUnusable { path: PathBuf, reason: String },

    /// Strict policy: target has entries.
    #[error("Target {path} is not empty")]
    TargetNotEmpty { path: PathBuf },

    /// Collision policy: files the pipeline writes already exist.
    #[error("Target {path} already contains: {}", .names.join(", "))]
    AssetCollision { path: PathBuf, names: Vec<String> },

    /// Local content path is missing or not a folder.
    #[error("Content source {path} does not exist or is not a folder")]
    SourceNotFound { path: PathBuf },

    /// Local content folder and its copy destination nest inside each other.
    #[error("Cannot copy {folder} into {destination}: the folders overlap")]
    SourceOverlapsTarget {
        folder: PathBuf,
        destination: PathBuf,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// External command exited with a failure status.
    #[error("`{command}` failed with status {status}")]
    ToolExecution {
        command: String,
        status: i32,
        stderr: String,
    },

    /// `--refresh` without a side-car snapshot in the target.
    #[error("No saved options found at {path}")]
    SnapshotMissing { path: PathBuf },

    /// Options file could not be parsed.
    #[error("Cannot read options from {path}: {reason}")]
    SnapshotInvalid { path: PathBuf, reason: String },

    /// A prompt was needed but the terminal is not interactive.
    #[error("Input required for {what}, but no terminal is attached")]
    InteractionUnavailable { what: String },

    /// User chose to stop.
    #[error("Cancelled by user")]
    Cancelled,

    /// Adapter state lock poisoned.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ValidationFailed(issues) => {
                let mut hints: Vec<String> = issues.iter().flat_map(|e| e.suggestions()).collect();
                hints.dedup();
                hints
            }
            Self::ToolMissing { tools } => {
                let mut hints = Vec::new();
                if tools.contains(&Tool::Git) {
                    hints.push("Install git: https://git-scm.com/downloads".into());
                }
                if tools.iter().any(|t| t.is_package_manager()) {
                    hints.push("Install Node.js, which ships npm: https://nodejs.org".into());
                }
                hints
            }
            Self::TargetUnusable { path, .. } => vec![
                format!("Something other than a folder exists at {}", path.display()),
                "Choose another --target".into(),
            ],
            Self::TargetNotEmpty { .. } => vec![
                "Pick an empty folder with --target".into(),
                "Or pass --clean to clear it first (destructive)".into(),
                "Or use --target-policy collision to only require free file names".into(),
            ],
            Self::AssetCollision { .. } => vec![
                "Remove the listed entries".into(),
                "Or pass --clean to clear the target first (destructive)".into(),
            ],
            Self::SourceNotFound { path } => vec![
                format!("Check that {} exists and is a folder", path.display()),
                "Relative --path values resolve against the current directory".into(),
            ],
            Self::SourceOverlapsTarget { .. } => vec![
                "Pick a --target outside the content folder".into(),
                "Or point --path at a folder that neither contains nor sits inside the target".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ToolExecution { stderr, .. } if !stderr.is_empty() => {
                vec![format!("Tool output: {}", stderr.trim())]
            }
            Self::SnapshotMissing { .. } => vec![
                "--refresh needs a target provisioned by an earlier run".into(),
                "Run without --refresh to provision it".into(),
            ],
            Self::SnapshotInvalid { .. } => {
                vec!["The options file must be a JSON object like .yaspp-options.json".into()]
            }
            Self::InteractionUnavailable { .. } => vec![
                "Pass the value as a flag".into(),
                "Or run with --auto to accept defaults".into(),
            ],
            _ => vec![],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationFailed(_) => ErrorCategory::Validation,
            Self::ToolMissing { .. }
            | Self::TargetUnusable { .. }
            | Self::TargetNotEmpty { .. }
            | Self::AssetCollision { .. }
            | Self::SourceNotFound { .. }
            | Self::SourceOverlapsTarget { .. }
            | Self::SnapshotMissing { .. }
            | Self::InteractionUnavailable { .. } => ErrorCategory::Precondition,
            Self::FilesystemError { .. } => ErrorCategory::Io,
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            Self::SnapshotInvalid { .. } => ErrorCategory::Configuration,
            Self::Cancelled | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }

    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

fn format_issues(issues: &[DomainError]) -> String {
    issues
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_tools(tools: &[Tool]) -> String {
    tools
        .iter()
        .map(Tool::program)
        .collect::<Vec<_>>()
        .join(", ")
}
