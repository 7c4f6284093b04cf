//! Provision Service - main application orchestrator.
//!
//! This service coordinates the whole provisioning workflow:
//! 1. Probe external tools
//! 2. Load persisted options and resolve the configuration
//! 3. Check the content source, then prepare the target
//! 4. Stage content (and the framework clone)
//! 5. Write artifacts
//! 6. Finalize with the package manager
//!
//! Every stage short-circuits on error except finalize, whose failures are
//! downgraded to warnings: once the descriptor is written the target is a
//! usable project.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::{
    application::{
        ApplicationError,
        ports::{
            Activity, AssetStore, CommandSpec, Filesystem, OutputLine, ProcessRunner, Prompter,
            Reporter,
        },
        services::{
            artifact_service::ArtifactService,
            config_resolver::{ConfigResolver, ResolveMode},
            content_service::{CloneJob, ContentRequest, ContentService, clone_into, resolve_against},
            target_service::{TargetPlan, TargetService, protected_names},
            tool_probe::ToolProbe,
        },
    },
    domain::{
        OPTIONS_FILE, OptionsDraft, OptionsSnapshot, ResolvedOptions, SiteConfig, Stage,
        TargetPolicy, Tool, ToolAvailability,
    },
    error::YasppResult,
};

/// User-level settings that shape a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionSettings {
    pub content_folder: String,
    pub framework_repository: Option<String>,
    pub framework_folder: String,
    pub package_manager: Option<Tool>,
    pub init_script: String,
    pub policy: TargetPolicy,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            content_folder: "site".into(),
            framework_repository: None,
            framework_folder: "yaspp".into(),
            package_manager: None,
            init_script: "init".into(),
            policy: TargetPolicy::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunMode {
    /// Accept supplied and default values without prompting.
    pub auto: bool,
    /// Review resolved options before continuing (interactive only).
    pub confirm: bool,
    pub dry_run: bool,
    /// Re-run acquisition with the options saved in the target.
    pub refresh: bool,
    /// Skip content acquisition and the framework clone.
    pub skip_content: bool,
    /// Clear an unusable target without asking.
    pub clean: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProvisionRequest {
    /// Values given on the command line.
    pub options: OptionsDraft,
    /// Options file to load instead of prompting.
    pub config_file: Option<PathBuf>,
    /// Absolute target directory.
    pub target: PathBuf,
    /// Base for relative paths in the request.
    pub working_dir: PathBuf,
    pub settings: ProvisionSettings,
    pub mode: RunMode,
}

/// What a run did, or would have done in dry-run mode.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionReport {
    pub run_id: Uuid,
    pub target: PathBuf,
    pub dry_run: bool,
    pub options: ResolvedOptions,
    pub site_config: SiteConfig,
    pub tools: ToolAvailability,
    pub package_manager: Option<Tool>,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub warnings: Vec<String>,
    /// Install and init script both succeeded.
    pub finalized: bool,
}

/// Main provisioning service.
pub struct ProvisionService {
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn ProcessRunner>,
    prompter: Box<dyn Prompter>,
    assets: Box<dyn AssetStore>,
    reporter: Box<dyn Reporter>,
}

impl ProvisionService {
    /// Create a new provision service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn ProcessRunner>,
        prompter: Box<dyn Prompter>,
        assets: Box<dyn AssetStore>,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            filesystem,
            runner,
            prompter,
            assets,
            reporter,
        }
    }

    /// Provision a site into `request.target`.
    pub fn provision(&self, request: ProvisionRequest) -> YasppResult<ProvisionReport> {
        let run_id = Uuid::new_v4();
        let span = info_span!(
            "provision",
            %run_id,
            target = %request.target.display(),
            dry_run = request.mode.dry_run
        );
        let _entered = span.enter();

        let mut mode = request.mode;
        if mode.refresh {
            mode.auto = true;
        }

        // 1. Tools
        self.reporter.stage(Stage::Probe);
        let tools = ToolProbe::new(self.runner.as_ref()).probe();
        ToolProbe::require(&tools)?;
        let package_manager = tools.package_manager(request.settings.package_manager);

        // 2. Options
        self.reporter.stage(Stage::Configure);
        let defaults = self.load_defaults(&request, &mut mode)?;
        let options = ConfigResolver::new(self.prompter.as_ref()).resolve(
            &request.options,
            &defaults,
            &request.target,
            mode.clean,
            ResolveMode {
                auto: mode.auto,
                confirm: mode.confirm,
            },
        )?;
        info!(source = ?options.source(), "Options resolved");

        let content = ContentService::new(
            self.filesystem.as_ref(),
            self.runner.as_ref(),
            self.assets.as_ref(),
            self.reporter.as_ref(),
        );

        // 3. Source, then target
        if !mode.skip_content {
            content.check_source(
                &options,
                &request.working_dir,
                &request.settings.content_folder,
            )?;
        }

        self.reporter.stage(Stage::Target);
        let framework_folder = request
            .settings
            .framework_repository
            .as_ref()
            .map(|_| request.settings.framework_folder.as_str());
        let plan = TargetPlan {
            policy: request.settings.policy,
            protected: protected_names(&request.settings.content_folder, framework_folder),
            clean: mode.clean,
            interactive: !mode.auto,
            dry_run: mode.dry_run,
            refresh: mode.refresh,
        };
        TargetService::new(self.filesystem.as_ref(), self.prompter.as_ref())
            .prepare(options.target(), &plan)?;

        // 4. Content
        let mut written = Vec::new();
        let delta = if mode.skip_content {
            ContentService::delta_for(
                &options,
                &options.target().join(&request.settings.content_folder),
            )
        } else {
            self.reporter.stage(Stage::Content);
            let staged = content.acquire(
                &options,
                &ContentRequest {
                    working_dir: &request.working_dir,
                    folder: &request.settings.content_folder,
                    dry_run: mode.dry_run,
                },
            )?;
            written.extend(staged.written);

            if let Some(url) = &request.settings.framework_repository {
                self.reporter.stage(Stage::Framework);
                clone_into(
                    self.filesystem.as_ref(),
                    self.runner.as_ref(),
                    self.reporter.as_ref(),
                    CloneJob {
                        url,
                        branch: None,
                        parent: options.target(),
                        folder: &request.settings.framework_folder,
                        dry_run: mode.dry_run,
                        activity: Activity::FrameworkClone { url: url.clone() },
                    },
                )?;
            }
            staged.delta
        };
        let rebased = options.rebased(&delta);

        // 5. Artifacts
        self.reporter.stage(Stage::Artifacts);
        let artifacts = ArtifactService::new(
            self.filesystem.as_ref(),
            self.assets.as_ref(),
            self.reporter.as_ref(),
        )
        .generate(&rebased, &options.to_draft(), mode.dry_run)?;
        written.extend(artifacts.written);
        let mut warnings = artifacts.warnings;

        // 6. Finalize
        let finalized = if mode.refresh {
            info!("Refresh: finalize skipped");
            false
        } else {
            self.reporter.stage(Stage::Finalize);
            self.finalize(
                &request,
                package_manager,
                options.target(),
                mode.dry_run,
                &mut warnings,
            )
        };

        info!(
            files = written.len(),
            warnings = warnings.len(),
            "Provisioning completed"
        );
        Ok(ProvisionReport {
            run_id,
            target: options.target().to_path_buf(),
            dry_run: mode.dry_run,
            site_config: artifacts.site_config,
            options: rebased,
            tools,
            package_manager,
            written,
            skipped: artifacts.skipped,
            warnings,
            finalized,
        })
    }

    /// Persisted options used as defaults. Loading a file switches the run
    /// to auto-reply; an auto run picks up the side-car on its own.
    fn load_defaults(
        &self,
        request: &ProvisionRequest,
        mode: &mut RunMode,
    ) -> YasppResult<OptionsDraft> {
        if let Some(file) = &request.config_file {
            let path = resolve_against(&request.working_dir, &file.to_string_lossy());
            mode.auto = true;
            return self.read_options(path);
        }

        let side_car = request.target.join(OPTIONS_FILE);
        if mode.refresh {
            return self.read_options(side_car);
        }
        if !self.filesystem.kind(&side_car).exists() {
            return Ok(OptionsDraft::default());
        }
        // Auto runs reuse a previous run's options without asking.
        if mode.auto {
            return self.read_options(side_car);
        }
        if self.prompter.confirm_reuse(&side_car)? {
            mode.auto = true;
            return self.read_options(side_car);
        }
        Ok(OptionsDraft::default())
    }

    fn read_options(&self, path: PathBuf) -> YasppResult<OptionsDraft> {
        if !self.filesystem.exists(&path) {
            return Err(ApplicationError::SnapshotMissing { path }.into());
        }
        let text = self.filesystem.read_to_string(&path)?;
        OptionsSnapshot::parse_options(&text).map_err(|e| {
            ApplicationError::SnapshotInvalid {
                path,
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Install dependencies and run the init script. Failures are warnings.
    fn finalize(
        &self,
        request: &ProvisionRequest,
        manager: Option<Tool>,
        target: &std::path::Path,
        dry_run: bool,
        warnings: &mut Vec<String>,
    ) -> bool {
        let Some(manager) = manager else {
            warnings.push("No package manager available; dependencies not installed".into());
            return false;
        };
        let program = manager.program().to_string();
        let script = request.settings.init_script.clone();

        let steps = [
            (
                Activity::Install {
                    manager: program.clone(),
                },
                CommandSpec::new(&program).arg("install"),
            ),
            (
                Activity::InitScript {
                    manager: program.clone(),
                    script: script.clone(),
                },
                CommandSpec::new(&program).args(["run", script.as_str()]),
            ),
        ];

        for (activity, spec) in steps {
            let spec = spec.cwd(target).dry(dry_run);
            self.reporter.activity_started(&activity);
            let result = self
                .runner
                .run(&spec, &mut |line: &OutputLine| self.reporter.output_line(line));
            self.reporter.activity_finished(&activity, result.success());

            if !result.success() {
                let message = format!(
                    "`{spec}` failed with status {}; run it manually in {}",
                    result.status,
                    target.display()
                );
                warn!(status = result.status, command = %spec, "Finalize step failed");
                self.reporter.warn(&message);
                warnings.push(message);
                return false;
            }
        }
        true
    }
}
