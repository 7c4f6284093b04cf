//! Content acquisition: stage site content below the target by copying a
//! local folder, cloning a repository, or writing the bundled sample.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{
            Activity, AssetStore, CommandSpec, Filesystem, OutputLine, ProcessRunner, Reporter,
        },
    },
    domain::{ContentSource, ResolvedOptions, Tool, paths},
    error::YasppResult,
};

#[derive(Debug, Clone)]
pub struct ContentRequest<'r> {
    /// Base for relative local paths.
    pub working_dir: &'r Path,
    /// Folder under the target receiving the content.
    pub folder: &'r str,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentOutcome {
    pub destination: PathBuf,
    /// Prefix that makes content-relative paths target-relative; empty when
    /// no rewrite is needed.
    pub delta: String,
    /// Files written for the bundled sample.
    pub written: Vec<PathBuf>,
}

pub struct ContentService<'a> {
    filesystem: &'a dyn Filesystem,
    runner: &'a dyn ProcessRunner,
    assets: &'a dyn AssetStore,
    reporter: &'a dyn Reporter,
}

impl<'a> ContentService<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        runner: &'a dyn ProcessRunner,
        assets: &'a dyn AssetStore,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            filesystem,
            runner,
            assets,
            reporter,
        }
    }

    /// Resolve and check a local content folder. Runs before the target is
    /// touched so a bad path leaves no trace.
    ///
    /// The folder must exist and must not nest with `<target>/<folder>` in
    /// either direction.
    pub fn check_source(
        &self,
        options: &ResolvedOptions,
        working_dir: &Path,
        folder: &str,
    ) -> YasppResult<Option<PathBuf>> {
        let ContentSource::LocalPath { path } = options.source() else {
            return Ok(None);
        };
        let source = resolve_against(working_dir, path);
        if !self.filesystem.kind(&source).is_folder() {
            return Err(ApplicationError::SourceNotFound { path: source }.into());
        }
        let destination = paths::absolute_path(working_dir, &options.target().join(folder));
        if destination.starts_with(&source) || source.starts_with(&destination) {
            return Err(ApplicationError::SourceOverlapsTarget {
                folder: source,
                destination,
            }
            .into());
        }
        Ok(Some(source))
    }

    /// Path delta applied to copied or cloned content.
    pub fn delta_for(options: &ResolvedOptions, destination: &Path) -> String {
        if !options.source().needs_rebase() {
            return String::new();
        }
        paths::relative_path(
            &options.target().to_string_lossy(),
            &destination.to_string_lossy(),
        )
    }

    #[instrument(skip_all, fields(folder = request.folder, dry_run = request.dry_run))]
    pub fn acquire(
        &self,
        options: &ResolvedOptions,
        request: &ContentRequest<'_>,
    ) -> YasppResult<ContentOutcome> {
        let destination = options.target().join(request.folder);
        let mut outcome = ContentOutcome {
            delta: Self::delta_for(options, &destination),
            destination: destination.clone(),
            written: Vec::new(),
        };

        match options.source() {
            ContentSource::LocalPath { .. } => {
                let source = self
                    .check_source(options, request.working_dir, request.folder)?
                    .unwrap_or_else(|| destination.clone());
                let activity = Activity::CopyContent {
                    from: source.clone(),
                };
                if request.dry_run {
                    info!(from = %source.display(), "Dry run: content would be copied");
                    return Ok(outcome);
                }
                self.reporter.activity_started(&activity);
                let result = self.filesystem.copy_tree(&source, &destination);
                self.reporter.activity_finished(&activity, result.is_ok());
                result?;
            }
            ContentSource::Repository { url, branch } => {
                clone_into(
                    self.filesystem,
                    self.runner,
                    self.reporter,
                    CloneJob {
                        url,
                        branch: branch.as_deref(),
                        parent: options.target(),
                        folder: request.folder,
                        dry_run: request.dry_run,
                        activity: Activity::Clone { url: url.clone() },
                    },
                )?;
            }
            ContentSource::Bundled => {
                let activity = Activity::SampleSite;
                self.reporter.activity_started(&activity);
                let result = self.write_sample(&destination, request.dry_run);
                self.reporter.activity_finished(&activity, result.is_ok());
                outcome.written = result?;
            }
        }

        debug!(delta = %outcome.delta, "Content staged");
        Ok(outcome)
    }

    fn write_sample(&self, destination: &Path, dry_run: bool) -> YasppResult<Vec<PathBuf>> {
        if !dry_run
            && self.filesystem.exists(destination)
            && !self.filesystem.remove_tree(destination, false, false)
        {
            return Err(
                ApplicationError::filesystem(destination, "could not clear previous content")
                    .into(),
            );
        }
        let mut written = Vec::new();
        for (relative, content) in self.assets.sample_site() {
            let path = destination.join(&relative);
            if !dry_run {
                self.filesystem.write_file(&path, &content)?;
            }
            written.push(path);
        }
        Ok(written)
    }
}

pub(crate) struct CloneJob<'j> {
    pub url: &'j str,
    pub branch: Option<&'j str>,
    pub parent: &'j Path,
    pub folder: &'j str,
    pub dry_run: bool,
    pub activity: Activity,
}

/// Replace `<parent>/<folder>` with a fresh clone. A failing clone is fatal.
pub(crate) fn clone_into(
    filesystem: &dyn Filesystem,
    runner: &dyn ProcessRunner,
    reporter: &dyn Reporter,
    job: CloneJob<'_>,
) -> YasppResult<()> {
    let destination = job.parent.join(job.folder);
    if !job.dry_run
        && filesystem.exists(&destination)
        && !filesystem.remove_tree(&destination, true, false)
    {
        return Err(ApplicationError::filesystem(
            &destination,
            "could not remove previous clone",
        )
        .into());
    }

    let mut spec = CommandSpec::new(Tool::Git.program()).arg("clone");
    if let Some(branch) = job.branch {
        spec = spec.args(["--single-branch", "--branch", branch]);
    }
    let spec = spec
        .args([job.url, job.folder])
        .cwd(job.parent)
        .dry(job.dry_run);

    reporter.activity_started(&job.activity);
    let result = runner.run(&spec, &mut |line: &OutputLine| reporter.output_line(line));
    reporter.activity_finished(&job.activity, result.success());

    if !result.success() {
        return Err(ApplicationError::ToolExecution {
            command: spec.to_string(),
            status: result.status,
            stderr: result.stderr.join("\n"),
        }
        .into());
    }
    Ok(())
}

/// Join a relative path onto `base`; absolute paths pass through. `.` and
/// `..` are folded either way.
pub fn resolve_against(base: &Path, path: &str) -> PathBuf {
    paths::absolute_path(base, Path::new(path))
}
