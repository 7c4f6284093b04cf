//! The provisioning run.
//!
//! Responsibility: translate CLI arguments into a `ProvisionRequest`, wire
//! the adapters, call the core service and display the report. No business
//! logic lives here.

use std::{
    io::IsTerminal as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, instrument};

use yaspp_adapters::{EmbeddedAssets, LocalFilesystem, SilentReporter, SystemProcessRunner};
use yaspp_core::{
    application::{ProvisionReport, ProvisionRequest, ProvisionService, Reporter, RunMode},
    domain::paths,
    error::YasppError,
};

use crate::{
    cli::{CreateArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    messages::Catalog,
    output::OutputManager,
    prompt,
    reporter::ProgressReporter,
};

/// Execute a provisioning run.
///
/// 1. Resolve the target against the working directory
/// 2. Pick the prompter (terminal or non-interactive)
/// 3. Build the request from flags and settings
/// 4. Run the pipeline
/// 5. Print the summary, or the JSON report
#[instrument(skip_all, fields(target = %args.target.display()))]
pub fn execute(
    args: CreateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let cwd = std::env::current_dir().with_cli_context(|| "reading the current directory")?;
    let target = paths::absolute_path(&cwd, &args.target);

    let catalog = Arc::new(Catalog::english().map_err(|e| YasppError::Internal {
        message: format!("bundled messages are invalid: {e}"),
    })?);

    let interactive = !args.auto && !args.refresh && std::io::stdin().is_terminal();
    let color = output.supports_color();
    debug!(interactive, target = %target.display(), "Run settings");

    let reporter: Box<dyn Reporter> = if global.quiet {
        Box::new(SilentReporter)
    } else {
        Box::new(ProgressReporter::new(
            Arc::clone(&catalog),
            target.display().to_string(),
            color,
        ))
    };

    let service = ProvisionService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(SystemProcessRunner::new()),
        prompt::select(Arc::clone(&catalog), interactive, color),
        Box::new(EmbeddedAssets::new()),
        reporter,
    );

    let request = build_request(&args, &config, target, cwd.clone());
    info!(dry_run = request.mode.dry_run, "Provisioning started");
    let report = service.provision(request)?;

    if output.is_json() {
        output.json(&report)?;
    } else {
        print_summary(&report, &args, &config, &catalog, &cwd, &output)?;
    }
    Ok(())
}

fn build_request(
    args: &CreateArgs,
    config: &AppConfig,
    target: PathBuf,
    working_dir: PathBuf,
) -> ProvisionRequest {
    ProvisionRequest {
        options: args.draft(),
        config_file: args.config.clone(),
        target,
        working_dir,
        settings: config.provision_settings(args.target_policy.map(Into::into)),
        mode: RunMode {
            auto: args.auto,
            confirm: !args.yes,
            dry_run: args.dry_run,
            refresh: args.refresh,
            skip_content: args.no_content,
            clean: args.clean,
        },
    }
}

/// `target` made absolute, with `.` and `..` resolved lexically.
fn print_summary(
    report: &ProvisionReport,
    args: &CreateArgs,
    config: &AppConfig,
    catalog: &Catalog,
    cwd: &Path,
    output: &OutputManager,
) -> CliResult<()> {
    let target = report.target.display().to_string();
    let relative = |p: &Path| {
        p.strip_prefix(&report.target)
            .unwrap_or(p)
            .display()
            .to_string()
    };

    if report.dry_run {
        output.info(&catalog.format("done.dryrun", &[("target", target.as_str())]))?;
        let count = report.written.len().to_string();
        output.info(&catalog.format("done.wouldWrite", &[("count", count.as_str())]))?;
        for path in &report.written {
            output.print(&format!("  {}", relative(path)))?;
        }
        return Ok(());
    }

    let key = if args.refresh {
        "done.refreshed"
    } else {
        "done.created"
    };
    output.success(&catalog.format(key, &[("target", target.as_str())]))?;
    let count = report.written.len().to_string();
    output.print(&catalog.format("done.written", &[("count", count.as_str())]))?;
    for path in &report.skipped {
        let path = relative(path);
        output.print(&catalog.format("done.skipped", &[("path", path.as_str())]))?;
    }
    if !report.warnings.is_empty() {
        let count = report.warnings.len().to_string();
        output.warning(&catalog.format("done.warnings", &[("count", count.as_str())]))?;
        for warning in &report.warnings {
            output.print(&format!("  {warning}"))?;
        }
    }
    if args.refresh {
        return Ok(());
    }

    let manager = report
        .package_manager
        .map(|t| t.program().to_string())
        .unwrap_or_else(|| "npm".into());
    output.print("")?;
    output.print(&catalog.get("done.next"))?;
    if report.target != cwd {
        let shown = report
            .target
            .strip_prefix(cwd)
            .map(|p| p.display().to_string())
            .unwrap_or(target);
        output.print(&catalog.format("done.cd", &[("target", shown.as_str())]))?;
    }
    if !report.finalized {
        output.print(&catalog.format(
            "done.install",
            &[
                ("manager", manager.as_str()),
                ("script", config.defaults.init_script.as_str()),
            ],
        ))?;
    }
    output.print(&catalog.format("done.dev", &[("manager", manager.as_str())]))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use yaspp_core::domain::{Field, TargetPolicy};

    use super::*;
    use crate::cli::Cli;

    fn args(argv: &[&str]) -> CreateArgs {
        let mut full = vec!["create-yaspp"];
        full.extend_from_slice(argv);
        Cli::parse_from(full).create
    }

    #[test]
    fn request_reflects_flags() {
        let a = args(&[
            "--auto",
            "-y",
            "-D",
            "--no-content",
            "--clean",
            "--target-policy",
            "collision",
            "--content-root",
            "content",
        ]);
        let req = build_request(
            &a,
            &AppConfig::default(),
            PathBuf::from("/t"),
            PathBuf::from("/w"),
        );
        assert!(req.mode.auto && req.mode.dry_run && req.mode.skip_content && req.mode.clean);
        assert!(!req.mode.confirm);
        assert!(!req.mode.refresh);
        assert_eq!(req.settings.policy, TargetPolicy::Collision);
        assert_eq!(req.options.get(Field::ContentRoot), Some("content"));
        assert_eq!(req.working_dir, PathBuf::from("/w"));
    }

    #[test]
    fn review_is_on_by_default() {
        let req = build_request(
            &args(&[]),
            &AppConfig::default(),
            PathBuf::from("/t"),
            PathBuf::from("/w"),
        );
        assert!(req.mode.confirm);
        assert_eq!(req.settings.policy, TargetPolicy::Strict);
        assert!(req.config_file.is_none());
    }
}
