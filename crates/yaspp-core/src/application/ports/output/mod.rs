//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `yaspp-adapters` crate provides implementations; the prompter and the
//! terminal reporter live in the CLI.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::domain::{Confirmation, DomainError, Field, FileKind, OptionsDraft, Stage};
use crate::error::YasppResult;

// ── Filesystem ────────────────────────────────────────────────────────────────

/// Port for filesystem operations.
///
/// Implemented by:
/// - `yaspp_adapters::filesystem::LocalFilesystem` (production)
/// - `yaspp_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// What occupies `path`, without following a final symlink.
    fn kind(&self, path: &Path) -> FileKind;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool {
        self.kind(path).exists()
    }

    /// Create a directory and all parents.
    ///
    /// Succeeds without change when a folder is already there; fails when a
    /// non-folder occupies the path.
    fn create_dir_all(&self, path: &Path) -> YasppResult<()>;

    /// `true` when no file exists anywhere below `path`.
    ///
    /// A missing folder counts as empty unless `must_exist`.
    fn is_empty(&self, path: &Path, must_exist: bool) -> YasppResult<bool>;

    /// Names of the direct children of a folder.
    fn entries(&self, path: &Path) -> YasppResult<Vec<String>>;

    /// Delete a folder with its contents (`remove_root`) or only its contents.
    ///
    /// Never fails loudly: problems are logged and reported as `false`.
    fn remove_tree(&self, path: &Path, remove_root: bool, must_exist: bool) -> bool;

    /// Mirror `src` into `dst`, clearing `dst` first.
    ///
    /// Rejects `src` and `dst` that nest inside each other once links and
    /// `..` are resolved. Symlinks and special files are skipped. A failed
    /// copy removes what it wrote.
    fn copy_tree(&self, src: &Path, dst: &Path) -> YasppResult<()>;

    /// Write content to a file, creating parent folders.
    fn write_file(&self, path: &Path, content: &str) -> YasppResult<()>;

    fn read_to_string(&self, path: &Path) -> YasppResult<String>;
}

// ── Processes ─────────────────────────────────────────────────────────────────

/// An external command to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// Log the command and report success without spawning anything.
    pub dry: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn dry(mut self, dry: bool) -> Self {
        self.dry = dry;
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// One line of process output, as it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(s) | Self::Stderr(s) => s,
        }
    }
}

/// Exit status plus everything the process printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    pub status: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ProcessResult {
    /// Status used when the program could not be started.
    pub const NOT_FOUND: i32 = 127;

    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// What a dry run returns.
    pub fn dry() -> Self {
        Self::default()
    }

    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self {
            status: Self::NOT_FOUND,
            stdout: Vec::new(),
            stderr: vec![reason.into()],
        }
    }
}

/// Port for running external tools.
///
/// Implemented by:
/// - `yaspp_adapters::process::SystemProcessRunner` (production)
/// - `yaspp_adapters::process::ScriptedProcessRunner` (testing)
pub trait ProcessRunner: Send + Sync {
    /// Run to completion, handing each output line to `on_line` as it is
    /// read. Failing to start is reported through the status, not an error.
    fn run(&self, spec: &CommandSpec, on_line: &mut dyn FnMut(&OutputLine)) -> ProcessResult;
}

// ── Interaction ───────────────────────────────────────────────────────────────

/// Port for asking the user.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter: Send + Sync {
    /// Ask for one field. The answer is trimmed; an empty answer keeps the
    /// default.
    fn ask(&self, field: Field, default: Option<String>) -> YasppResult<String>;

    /// Show the collected draft with any validation issues and ask what next.
    fn review(&self, draft: &OptionsDraft, issues: &[DomainError]) -> YasppResult<Confirmation>;

    /// Ask before clearing an unusable target.
    fn confirm_clear(&self, target: &Path, reason: &str) -> YasppResult<bool>;

    /// Ask whether saved options found in the target should be reused.
    fn confirm_reuse(&self, snapshot: &Path) -> YasppResult<bool>;
}

// ── Assets ────────────────────────────────────────────────────────────────────

/// Port for bundled resources.
pub trait AssetStore: Send + Sync {
    /// A scaffold template by name (`gitignore`, `package.json`, `nav.json`).
    fn template(&self, name: &str) -> Option<String>;

    /// Files of the bundled sample site, relative to the site folder.
    fn sample_site(&self) -> Vec<(PathBuf, String)>;
}

// ── Progress ──────────────────────────────────────────────────────────────────

/// A long-running operation worth a spinner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activity {
    Clone { url: String },
    CopyContent { from: PathBuf },
    SampleSite,
    FrameworkClone { url: String },
    Install { manager: String },
    InitScript { manager: String, script: String },
}

/// Port for progress reporting.
pub trait Reporter: Send + Sync {
    fn stage(&self, stage: Stage);

    fn activity_started(&self, activity: &Activity);

    fn activity_finished(&self, activity: &Activity, ok: bool);

    /// Streamed output from a running tool.
    fn output_line(&self, line: &OutputLine);

    fn warn(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_display_quotes_spaced_args() {
        let spec = CommandSpec::new("git")
            .args(["clone", "https://example.com/a b.git"])
            .arg("site");
        assert_eq!(
            spec.to_string(),
            "git clone \"https://example.com/a b.git\" site"
        );
    }

    #[test]
    fn spawn_failure_is_not_success() {
        let result = ProcessResult::spawn_failed("no such program");
        assert!(!result.success());
        assert_eq!(result.status, ProcessResult::NOT_FOUND);
        assert!(ProcessResult::dry().success());
    }
}
