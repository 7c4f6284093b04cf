//! End-to-end runs of the provisioning pipeline against in-memory adapters.

use std::path::{Path, PathBuf};

use yaspp_adapters::{
    EmbeddedAssets, MemoryFilesystem, RecordingReporter, ScriptedProcessRunner,
    process::{failure, version_or_ok},
};
use yaspp_core::{
    application::services::{ContentRequest, ContentService},
    domain::DomainValidator,
    prelude::*,
};

const TARGET: &str = "/work/out";

/// Refuses every question, like a detached terminal.
struct NoPrompts;

impl Prompter for NoPrompts {
    fn ask(&self, field: Field, _: Option<String>) -> YasppResult<String> {
        Err(ApplicationError::InteractionUnavailable {
            what: field.to_string(),
        }
        .into())
    }
    fn review(&self, _: &OptionsDraft, _: &[DomainError]) -> YasppResult<Confirmation> {
        Ok(Confirmation::Abort)
    }
    fn confirm_clear(&self, _: &Path, _: &str) -> YasppResult<bool> {
        Ok(false)
    }
    fn confirm_reuse(&self, _: &Path) -> YasppResult<bool> {
        Ok(false)
    }
}

/// Accepts defaults and agrees to every yes/no question.
struct AgreeingPrompter;

impl Prompter for AgreeingPrompter {
    fn ask(&self, _: Field, default: Option<String>) -> YasppResult<String> {
        Ok(default.unwrap_or_default())
    }
    fn review(&self, _: &OptionsDraft, _: &[DomainError]) -> YasppResult<Confirmation> {
        Ok(Confirmation::Accept)
    }
    fn confirm_clear(&self, _: &Path, _: &str) -> YasppResult<bool> {
        Ok(true)
    }
    fn confirm_reuse(&self, _: &Path) -> YasppResult<bool> {
        Ok(true)
    }
}

/// Memory filesystem that cannot delete anything, like a locked folder.
struct LockedFilesystem(MemoryFilesystem);

impl Filesystem for LockedFilesystem {
    fn kind(&self, path: &Path) -> FileKind {
        self.0.kind(path)
    }
    fn create_dir_all(&self, path: &Path) -> YasppResult<()> {
        self.0.create_dir_all(path)
    }
    fn is_empty(&self, path: &Path, must_exist: bool) -> YasppResult<bool> {
        self.0.is_empty(path, must_exist)
    }
    fn entries(&self, path: &Path) -> YasppResult<Vec<String>> {
        self.0.entries(path)
    }
    fn remove_tree(&self, _: &Path, _: bool, _: bool) -> bool {
        false
    }
    fn copy_tree(&self, src: &Path, dst: &Path) -> YasppResult<()> {
        self.0.copy_tree(src, dst)
    }
    fn write_file(&self, path: &Path, content: &str) -> YasppResult<()> {
        self.0.write_file(path, content)
    }
    fn read_to_string(&self, path: &Path) -> YasppResult<String> {
        self.0.read_to_string(path)
    }
}

struct Harness {
    fs: MemoryFilesystem,
    runner: ScriptedProcessRunner,
    reporter: RecordingReporter,
}

impl Harness {
    fn new() -> Self {
        Self::with(MemoryFilesystem::new(), ScriptedProcessRunner::with_toolchain())
    }

    fn with(fs: MemoryFilesystem, runner: ScriptedProcessRunner) -> Self {
        Self {
            fs: fs.with_dir("/work"),
            runner,
            reporter: RecordingReporter::new(),
        }
    }

    fn service(&self, prompter: impl Prompter + 'static) -> ProvisionService {
        ProvisionService::new(
            Box::new(self.fs.clone()),
            Box::new(self.runner.clone()),
            Box::new(prompter),
            Box::new(EmbeddedAssets::new()),
            Box::new(self.reporter.clone()),
        )
    }

    fn run(&self, request: ProvisionRequest) -> YasppResult<ProvisionReport> {
        self.service(NoPrompts).provision(request)
    }

    fn descriptor(&self) -> serde_json::Value {
        let text = self
            .fs
            .read_file(Path::new(TARGET).join("yaspp.config.json"))
            .expect("descriptor written");
        serde_json::from_str(&text).unwrap()
    }

    fn has(&self, relative: &str) -> bool {
        self.fs.exists(&Path::new(TARGET).join(relative))
    }
}

fn site_options() -> OptionsDraft {
    OptionsDraft::default()
        .with(Field::ContentRoot, "content")
        .with(Field::ContentIndex, "content/en")
        .with(Field::LocaleRoot, "locales")
        .with(Field::Langs, "en")
        .with(Field::DefaultLocale, "en")
}

fn request(options: OptionsDraft) -> ProvisionRequest {
    ProvisionRequest {
        options,
        target: PathBuf::from(TARGET),
        working_dir: PathBuf::from("/work"),
        mode: RunMode {
            auto: true,
            ..RunMode::default()
        },
        ..ProvisionRequest::default()
    }
}

fn application_error(err: YasppError) -> ApplicationError {
    match err {
        YasppError::Application(e) => e,
        other => panic!("expected an application error, got {other:?}"),
    }
}

// ── Bundled sample ────────────────────────────────────────────────────────────

#[test]
fn bundled_site_keeps_paths_unchanged() {
    let h = Harness::new();
    let report = h.run(request(site_options())).unwrap();

    assert!(h.has("site/content/en/index.md"));
    assert!(h.has("site/locales/en.json"));
    let config = h.descriptor();
    assert_eq!(config["content"]["root"], "content");
    assert_eq!(config["content"]["index"], "content/en");
    assert_eq!(config["locale"]["langs"], serde_json::json!(["en"]));

    for file in [".yaspp-options.json", ".gitignore", "package.json", "data/nav.json"] {
        assert!(h.has(file), "{file}");
    }
    let package = h.fs.read_file(Path::new(TARGET).join("package.json")).unwrap();
    assert!(package.contains("\"name\": \"out\""));

    assert!(report.finalized);
    assert_eq!(report.package_manager, Some(Tool::Yarn));
    assert_eq!(
        h.runner.command_lines(),
        vec!["yarn install", "yarn run init"]
    );
    assert_eq!(
        h.reporter.stages(),
        vec![
            Stage::Probe,
            Stage::Configure,
            Stage::Target,
            Stage::Content,
            Stage::Artifacts,
            Stage::Finalize
        ]
    );
}

#[test]
fn side_car_stores_what_the_user_configured() {
    let h = Harness::new();
    h.fs.write_file(Path::new("/work/docs/index.md"), "# docs")
        .unwrap();
    h.run(request(site_options().with(Field::LocalPath, "docs")))
        .unwrap();

    let text = h
        .fs
        .read_file(Path::new(TARGET).join(".yaspp-options.json"))
        .unwrap();
    let saved: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(saved["options"]["path"], "docs");
    assert_eq!(saved["options"]["contentRoot"], "content");
    assert!(saved["savedAt"].is_string());
}

// ── Local copy ────────────────────────────────────────────────────────────────

#[test]
fn local_content_is_copied_and_paths_rebased() {
    let fs = MemoryFilesystem::new()
        .with_file("/work/docs/content/en/index.md", "# Hello")
        .with_file("/work/docs/locales/en.json", "{}");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());

    h.run(request(
        site_options()
            .with(Field::LocalPath, "docs")
            .with(Field::StyleRoot, "style")
            .with(Field::StyleIndex, "main"),
    ))
    .unwrap();

    assert_eq!(
        h.fs.read_file("/work/out/site/content/en/index.md").as_deref(),
        Some("# Hello")
    );
    let config = h.descriptor();
    assert_eq!(config["content"]["root"], "site/content");
    assert_eq!(config["content"]["index"], "site/content/en");
    assert_eq!(config["locale"]["root"], "site/locales");
    assert_eq!(config["style"]["index"], "site/main.scss");
}

#[test]
fn missing_local_path_fails_before_touching_target() {
    let h = Harness::new();
    let err = h
        .run(request(site_options().with(Field::LocalPath, "nope")))
        .unwrap_err();

    assert!(matches!(
        application_error(err),
        ApplicationError::SourceNotFound { .. }
    ));
    assert_eq!(h.fs.kind(Path::new(TARGET)), FileKind::Absent);
}

#[test]
fn local_path_enclosing_target_is_refused_before_touching_it() {
    let fs = MemoryFilesystem::new().with_file("/work/cwd/notes.md", "keep");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(site_options().with(Field::LocalPath, ".."));
    req.working_dir = PathBuf::from("/work/cwd");

    match application_error(h.run(req).unwrap_err()) {
        ApplicationError::SourceOverlapsTarget {
            folder,
            destination,
        } => {
            assert_eq!(folder, PathBuf::from("/work"));
            assert_eq!(destination, PathBuf::from("/work/out/site"));
        }
        other => panic!("unexpected: {other}"),
    }
    assert_eq!(h.fs.kind(Path::new(TARGET)), FileKind::Absent);
    assert!(h.runner.command_lines().is_empty());
    assert_eq!(h.fs.list_files(), vec![PathBuf::from("/work/cwd/notes.md")]);
}

#[test]
fn local_path_inside_content_folder_is_refused() {
    let fs = MemoryFilesystem::new().with_file("/work/out/site/docs/index.md", "# keep");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(site_options().with(Field::LocalPath, "out/site/docs"));
    req.mode.clean = true;

    assert!(matches!(
        application_error(h.run(req).unwrap_err()),
        ApplicationError::SourceOverlapsTarget { .. }
    ));
    assert!(h.has("site/docs/index.md"));
}

#[test]
fn stale_sample_that_cannot_be_cleared_is_an_error() {
    let fs = LockedFilesystem(MemoryFilesystem::new().with_file("/work/out/site/old.md", "stale"));
    let runner = ScriptedProcessRunner::with_toolchain();
    let assets = EmbeddedAssets::new();
    let reporter = RecordingReporter::new();
    let options =
        DomainValidator::validate_options(&site_options(), Path::new(TARGET), false).unwrap();
    let request = ContentRequest {
        working_dir: Path::new("/work"),
        folder: "site",
        dry_run: false,
    };

    let err = ContentService::new(&fs, &runner, &assets, &reporter)
        .acquire(&options, &request)
        .unwrap_err();

    match application_error(err) {
        ApplicationError::FilesystemError { path, reason } => {
            assert_eq!(path, PathBuf::from("/work/out/site"));
            assert!(reason.contains("could not clear"), "{reason}");
        }
        other => panic!("unexpected: {other}"),
    }
    assert_eq!(fs.0.list_files(), vec![PathBuf::from("/work/out/site/old.md")]);
}

#[test]
fn conflicting_sources_never_clone_or_copy() {
    let fs = MemoryFilesystem::new().with_file("/work/docs/index.md", "x");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let err = h
        .run(request(
            site_options()
                .with(Field::Repository, "https://example.com/site.git")
                .with(Field::LocalPath, "docs"),
        ))
        .unwrap_err();

    match application_error(err) {
        ApplicationError::ValidationFailed(issues) => {
            assert_eq!(issues, vec![DomainError::ConflictingSources]);
        }
        other => panic!("unexpected: {other}"),
    }
    assert!(h.runner.command_lines().is_empty());
    assert!(!h.has("site"));
}

// ── Repository clone ──────────────────────────────────────────────────────────

#[test]
fn repository_is_cloned_with_single_branch() {
    let fs = MemoryFilesystem::new();
    let cloned = fs.clone();
    let runner = ScriptedProcessRunner::with_toolchain().on("git", move |spec| {
        if spec.args.first().map(String::as_str) == Some("clone") {
            let cwd = spec.cwd.clone().unwrap_or_default();
            let folder = spec.args.last().cloned().unwrap_or_default();
            let _ = cloned.write_file(&cwd.join(folder).join("content/en/index.md"), "# cloned");
        }
        version_or_ok(spec, "git version 2.43.0")
    });
    let h = Harness::with(fs, runner);

    h.run(request(
        site_options()
            .with(Field::Repository, "https://example.com/site.git")
            .with(Field::Branch, "main"),
    ))
    .unwrap();

    let clone = h
        .runner
        .calls()
        .into_iter()
        .find(|c| c.program == "git" && c.args.first().map(String::as_str) == Some("clone"))
        .unwrap();
    assert_eq!(
        clone.to_string(),
        "git clone --single-branch --branch main https://example.com/site.git site"
    );
    assert_eq!(clone.cwd.as_deref(), Some(Path::new(TARGET)));
    assert!(h.has("site/content/en/index.md"));
    assert_eq!(h.descriptor()["content"]["root"], "site/content");
}

#[test]
fn failed_clone_stops_the_pipeline() {
    let runner = ScriptedProcessRunner::with_toolchain().on("git", |spec| {
        if spec.args.first().map(String::as_str) == Some("clone") {
            failure(128, "fatal: repository not found")
        } else {
            version_or_ok(spec, "git version 2.43.0")
        }
    });
    let h = Harness::with(MemoryFilesystem::new(), runner);

    let err = h
        .run(request(
            site_options().with(Field::Repository, "https://example.com/missing.git"),
        ))
        .unwrap_err();

    match application_error(err) {
        ApplicationError::ToolExecution { status, stderr, .. } => {
            assert_eq!(status, 128);
            assert!(stderr.contains("not found"));
        }
        other => panic!("unexpected: {other}"),
    }
    assert!(!h.has("yaspp.config.json"));
}

#[test]
fn framework_repository_is_cloned_next_to_content() {
    let h = Harness::new();
    let mut req = request(site_options());
    req.settings.framework_repository = Some("https://example.com/yaspp.git".into());
    h.run(req).unwrap();

    assert!(
        h.runner
            .command_lines()
            .contains(&"git clone https://example.com/yaspp.git yaspp".to_string())
    );
    assert!(h.reporter.stages().contains(&Stage::Framework));
}

// ── Target policy ─────────────────────────────────────────────────────────────

#[test]
fn strict_policy_rejects_non_empty_target() {
    let fs = MemoryFilesystem::new().with_file("/work/out/README.md", "keep");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());

    let err = h.run(request(site_options())).unwrap_err();
    assert!(matches!(
        application_error(err),
        ApplicationError::TargetNotEmpty { .. }
    ));
    assert!(h.has("README.md"));
}

#[test]
fn clean_clears_target_without_asking() {
    let fs = MemoryFilesystem::new().with_file("/work/out/README.md", "old");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(site_options());
    req.mode.clean = true;

    h.run(req).unwrap();
    assert!(!h.has("README.md"));
    assert!(h.has("yaspp.config.json"));
}

#[test]
fn interactive_run_offers_to_clear() {
    let fs = MemoryFilesystem::new().with_file("/work/out/README.md", "old");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(site_options());
    req.mode.auto = false;

    h.service(AgreeingPrompter).provision(req).unwrap();
    assert!(!h.has("README.md"));
}

#[test]
fn collision_policy_only_guards_written_names() {
    let fs = MemoryFilesystem::new().with_file("/work/out/README.md", "keep");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(site_options());
    req.settings.policy = TargetPolicy::Collision;
    h.run(req).unwrap();
    assert!(h.has("README.md"));

    let fs = MemoryFilesystem::new().with_file("/work/out/package.json", "{}");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(site_options());
    req.settings.policy = TargetPolicy::Collision;
    match application_error(h.run(req).unwrap_err()) {
        ApplicationError::AssetCollision { names, .. } => assert_eq!(names, vec!["package.json"]),
        other => panic!("unexpected: {other}"),
    }
}

#[test]
fn collision_policy_counts_links_and_skips_missing_target() {
    let fs = MemoryFilesystem::new()
        .with_file("/work/out/README.md", "keep")
        .with_special("/work/out/data");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(site_options());
    req.settings.policy = TargetPolicy::Collision;
    match application_error(h.run(req).unwrap_err()) {
        ApplicationError::AssetCollision { names, .. } => assert_eq!(names, vec!["data"]),
        other => panic!("unexpected: {other}"),
    }

    let h = Harness::new();
    let mut req = request(site_options());
    req.settings.policy = TargetPolicy::Collision;
    req.mode.dry_run = true;
    h.run(req).unwrap();
    assert_eq!(h.fs.kind(Path::new(TARGET)), FileKind::Absent);
}

#[test]
fn file_in_place_of_target_is_unusable() {
    let fs = MemoryFilesystem::new().with_file(TARGET, "not a folder");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let err = h.run(request(site_options())).unwrap_err();
    assert!(matches!(
        application_error(err),
        ApplicationError::TargetUnusable { .. }
    ));
}

// ── Tools and finalize ────────────────────────────────────────────────────────

#[test]
fn missing_git_fails_before_anything_else() {
    let runner = ScriptedProcessRunner::with_toolchain().without("git");
    let h = Harness::with(MemoryFilesystem::new(), runner);

    match application_error(h.run(request(site_options())).unwrap_err()) {
        ApplicationError::ToolMissing { tools } => assert_eq!(tools, vec![Tool::Git]),
        other => panic!("unexpected: {other}"),
    }
    assert_eq!(h.fs.kind(Path::new(TARGET)), FileKind::Absent);
}

#[test]
fn failed_install_is_a_warning() {
    let runner = ScriptedProcessRunner::with_toolchain()
        .without("yarn")
        .on("npm", |spec| {
            if spec.args.first().map(String::as_str) == Some("install") {
                failure(1, "npm ERR! network")
            } else {
                version_or_ok(spec, "10.5.0")
            }
        });
    let h = Harness::with(MemoryFilesystem::new(), runner);

    let report = h.run(request(site_options())).unwrap();

    assert!(!report.finalized);
    assert_eq!(report.package_manager, Some(Tool::Npm));
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("npm install"));
    assert_eq!(h.reporter.warnings(), report.warnings);
    // The init script is not attempted after a failed install.
    assert_eq!(h.runner.command_lines(), vec!["npm install"]);
    assert!(h.has("yaspp.config.json"));
}

#[test]
fn preferred_package_manager_is_used() {
    let h = Harness::new();
    let mut req = request(site_options());
    req.settings.package_manager = Some(Tool::Npm);
    req.settings.init_script = "setup".into();
    h.run(req).unwrap();
    assert_eq!(
        h.runner.command_lines(),
        vec!["npm install", "npm run setup"]
    );
}

// ── Modes ─────────────────────────────────────────────────────────────────────

#[test]
fn dry_run_writes_nothing() {
    let h = Harness::new();
    let mut req = request(site_options());
    req.mode.dry_run = true;

    let report = h.run(req).unwrap();

    assert!(report.dry_run);
    assert!(
        report
            .written
            .contains(&Path::new(TARGET).join("yaspp.config.json"))
    );
    assert_eq!(h.fs.kind(Path::new(TARGET)), FileKind::Absent);
    assert!(h.fs.list_files().is_empty());
    let finalize_calls: Vec<_> = h
        .runner
        .calls()
        .into_iter()
        .filter(|c| c.args.first().map(String::as_str) != Some("--version"))
        .collect();
    assert!(!finalize_calls.is_empty());
    assert!(finalize_calls.iter().all(|c| c.dry));
}

#[test]
fn skip_content_writes_only_artifacts() {
    let h = Harness::new();
    let mut req = request(site_options());
    req.mode.skip_content = true;
    req.settings.framework_repository = Some("https://example.com/yaspp.git".into());

    h.run(req).unwrap();

    assert!(!h.has("site"));
    assert!(h.has("yaspp.config.json"));
    assert!(!h.reporter.stages().contains(&Stage::Content));
    assert!(!h.runner.command_lines().iter().any(|c| c.starts_with("git")));
}

#[test]
fn auto_run_reuses_side_car_without_asking() {
    let fs = MemoryFilesystem::new().with_file("/work/docs/content/en/index.md", "# docs");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    h.run(request(site_options().with(Field::LocalPath, "docs")))
        .unwrap();
    h.fs.write_file(Path::new("/work/out/site/content/en/index.md"), "edited")
        .unwrap();

    // NoPrompts would refuse reuse, so only the auto path can load it.
    let mut req = request(OptionsDraft::default());
    req.mode.clean = true;
    let report = h.run(req).unwrap();

    assert_eq!(
        h.fs.read_file("/work/out/site/content/en/index.md").as_deref(),
        Some("# docs")
    );
    assert_eq!(report.site_config.content.root, "site/content");
}

#[test]
fn refresh_reuses_saved_options_and_skips_finalize() {
    let fs = MemoryFilesystem::new().with_file("/work/docs/content/en/index.md", "v1");
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    h.run(request(site_options().with(Field::LocalPath, "docs")))
        .unwrap();

    h.fs.write_file(Path::new("/work/docs/content/en/index.md"), "v2")
        .unwrap();
    let refresh_runner = ScriptedProcessRunner::with_toolchain();
    let again = Harness {
        fs: h.fs.clone(),
        runner: refresh_runner.clone(),
        reporter: RecordingReporter::new(),
    };
    let mut req = request(OptionsDraft::default());
    req.mode = RunMode {
        refresh: true,
        ..RunMode::default()
    };
    let report = again.run(req).unwrap();

    assert_eq!(
        again
            .fs
            .read_file("/work/out/site/content/en/index.md")
            .as_deref(),
        Some("v2")
    );
    assert!(!report.finalized);
    assert!(refresh_runner.command_lines().is_empty());
    assert!(
        report
            .skipped
            .contains(&Path::new(TARGET).join("package.json"))
    );
    assert_eq!(again.descriptor()["content"]["root"], "site/content");
}

#[test]
fn refresh_needs_saved_options() {
    let h = Harness::new();
    let mut req = request(OptionsDraft::default());
    req.mode.refresh = true;
    assert!(matches!(
        application_error(h.run(req).unwrap_err()),
        ApplicationError::SnapshotMissing { .. }
    ));
}

#[test]
fn config_file_replaces_prompts() {
    let fs = MemoryFilesystem::new().with_file(
        "/work/options.json",
        r#"{"contentRoot":"content","contentIndex":"content/en","localeRoot":"locales","langs":"en he","defaultLocale":"he"}"#,
    );
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(OptionsDraft::default());
    req.mode.auto = false;
    req.config_file = Some(PathBuf::from("options.json"));

    let report = h.run(req).unwrap();
    assert_eq!(report.options.default_locale(), "he");
    assert_eq!(h.descriptor()["locale"]["langs"], serde_json::json!(["en", "he"]));
}

#[test]
fn saved_options_are_offered_for_reuse() {
    let fs = MemoryFilesystem::new().with_file(
        "/work/out/.yaspp-options.json",
        r#"{"generator":"yaspp-core 0.1.0","savedAt":"2026-01-01T00:00:00Z","options":{"contentRoot":"content","contentIndex":"content/en","localeRoot":"locales","langs":"en"}}"#,
    );
    let h = Harness::with(fs, ScriptedProcessRunner::with_toolchain());
    let mut req = request(OptionsDraft::default());
    req.mode.auto = false;
    req.mode.clean = true;

    let report = h.service(AgreeingPrompter).provision(req).unwrap();
    assert_eq!(report.options.content_index(), "content/en");
}

#[test]
fn report_serializes_for_json_output() {
    let h = Harness::new();
    let report = h.run(request(site_options())).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["siteConfig"]["content"]["root"], "content");
    assert_eq!(json["tools"]["git"], "2.43.0");
    assert_eq!(json["packageManager"], "yarn");
    assert_eq!(json["options"]["source"]["kind"], "bundled");
}
