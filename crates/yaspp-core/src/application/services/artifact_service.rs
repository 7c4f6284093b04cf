//! Artifact generation: the project descriptor, the options side-car and the
//! scaffold templates.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::{
    application::ports::{AssetStore, Filesystem, Reporter},
    domain::{
        OPTIONS_FILE, OptionsDraft, OptionsSnapshot, ResolvedOptions, SITE_CONFIG_FILE, SiteConfig,
    },
    error::{Context, YasppResult},
};

/// Template name and where it lands, relative to the target.
pub const SCAFFOLD_TEMPLATES: [(&str, &str); 3] = [
    ("gitignore", ".gitignore"),
    ("package.json", "package.json"),
    ("nav.json", crate::domain::NAV_FILE),
];

/// Placeholder replaced with the project name in templates.
pub const NAME_PLACEHOLDER: &str = "{{name}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactOutcome {
    pub site_config: SiteConfig,
    pub written: Vec<PathBuf>,
    /// Templates not written because the file already exists.
    pub skipped: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

pub struct ArtifactService<'a> {
    filesystem: &'a dyn Filesystem,
    assets: &'a dyn AssetStore,
    reporter: &'a dyn Reporter,
}

impl<'a> ArtifactService<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        assets: &'a dyn AssetStore,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            filesystem,
            assets,
            reporter,
        }
    }

    /// `options` carries target-relative paths; `persisted` is what the
    /// user configured and is what a later refresh reloads.
    #[instrument(skip_all, fields(target = %options.target().display(), dry_run = dry_run))]
    pub fn generate(
        &self,
        options: &ResolvedOptions,
        persisted: &OptionsDraft,
        dry_run: bool,
    ) -> YasppResult<ArtifactOutcome> {
        let target = options.target();
        let site_config = SiteConfig::from_options(options);
        let mut outcome = ArtifactOutcome {
            site_config: site_config.clone(),
            written: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
        };

        let descriptor = site_config
            .to_json()
            .context("serializing site descriptor")?;
        self.write(target.join(SITE_CONFIG_FILE), &descriptor, dry_run, &mut outcome)?;

        let snapshot = serde_json::to_string_pretty(&OptionsSnapshot::new(persisted.clone()))
            .context("serializing options snapshot")?;
        self.write(target.join(OPTIONS_FILE), &snapshot, dry_run, &mut outcome)?;

        let name = project_name(target);
        for (template, relative) in SCAFFOLD_TEMPLATES {
            let path = target.join(relative);
            if self.filesystem.exists(&path) {
                debug!(path = %path.display(), "Keeping existing file");
                outcome.skipped.push(path);
                continue;
            }
            match self.assets.template(template) {
                Some(body) => {
                    let body = body.replace(NAME_PLACEHOLDER, &name);
                    self.write(path, &body, dry_run, &mut outcome)?;
                }
                None => {
                    let message = format!("Template '{template}' is missing; {relative} not created");
                    warn!("{message}");
                    self.reporter.warn(&message);
                    outcome.warnings.push(message);
                }
            }
        }

        Ok(outcome)
    }

    fn write(
        &self,
        path: PathBuf,
        content: &str,
        dry_run: bool,
        outcome: &mut ArtifactOutcome,
    ) -> YasppResult<()> {
        if !dry_run {
            self.filesystem.write_file(&path, content)?;
        }
        outcome.written.push(path);
        Ok(())
    }
}

/// Package name derived from the target folder: lower-case, with anything
/// outside `[a-z0-9._-]` turned into `-`.
pub fn project_name(target: &Path) -> String {
    let raw = target
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let name: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let name = name.trim_matches(|c| c == '-' || c == '.').to_string();
    if name.is_empty() {
        "yaspp-site".to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_name_is_package_safe() {
        assert_eq!(project_name(Path::new("/work/My Site")), "my-site");
        assert_eq!(project_name(Path::new("/work/docs_v2")), "docs_v2");
        assert_eq!(project_name(Path::new("/")), "yaspp-site");
    }
}
