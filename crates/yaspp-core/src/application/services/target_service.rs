//! Target provisioning: make sure the destination exists and is usable
//! before anything is written into it.

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, Prompter},
    },
    domain::{NAV_FILE, OPTIONS_FILE, SITE_CONFIG_FILE, TargetPolicy},
    error::{YasppError, YasppResult},
};

/// Top-level names the pipeline writes into the target.
pub fn protected_names(content_folder: &str, framework_folder: Option<&str>) -> Vec<String> {
    let nav_root = NAV_FILE.split('/').next().unwrap_or(NAV_FILE);
    let mut names: Vec<String> = [
        "package.json",
        ".gitignore",
        SITE_CONFIG_FILE,
        OPTIONS_FILE,
        nav_root,
        content_folder,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    if let Some(folder) = framework_folder {
        names.push(folder.to_string());
    }
    names
}

#[derive(Debug, Clone, Default)]
pub struct TargetPlan {
    pub policy: TargetPolicy,
    /// Names checked by the collision policy.
    pub protected: Vec<String>,
    /// Clear an unusable target without asking.
    pub clean: bool,
    /// Offer to clear instead of failing.
    pub interactive: bool,
    pub dry_run: bool,
    /// Reuse an already provisioned target; only its existence is checked.
    pub refresh: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetOutcome {
    pub created: bool,
    pub cleared: bool,
}

pub struct TargetService<'a> {
    filesystem: &'a dyn Filesystem,
    prompter: &'a dyn Prompter,
}

impl<'a> TargetService<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, prompter: &'a dyn Prompter) -> Self {
        Self {
            filesystem,
            prompter,
        }
    }

    #[instrument(skip_all, fields(target = %target.display(), policy = ?plan.policy))]
    pub fn prepare(&self, target: &Path, plan: &TargetPlan) -> YasppResult<TargetOutcome> {
        let kind = self.filesystem.kind(target);
        if kind.exists() && !kind.is_folder() {
            return Err(ApplicationError::TargetUnusable {
                path: target.to_path_buf(),
                reason: "not a folder".into(),
            }
            .into());
        }

        let mut outcome = TargetOutcome {
            created: !kind.exists(),
            cleared: false,
        };
        if !plan.dry_run {
            self.filesystem.create_dir_all(target)?;
        }

        if plan.refresh {
            return Ok(outcome);
        }

        let Some(violation) = self.check_policy(target, plan)? else {
            return Ok(outcome);
        };

        let clear = if plan.clean {
            true
        } else if plan.interactive {
            self.prompter.confirm_clear(target, &violation.to_string())?
        } else {
            false
        };
        if !clear {
            return Err(violation.into());
        }

        if plan.dry_run {
            info!("Dry run: target would be cleared");
        } else {
            warn!("Clearing target contents");
            if !self.filesystem.remove_tree(target, false, true) {
                return Err(YasppError::from(ApplicationError::filesystem(
                    target,
                    "could not clear target",
                )));
            }
        }
        outcome.cleared = true;
        Ok(outcome)
    }

    fn check_policy(
        &self,
        target: &Path,
        plan: &TargetPlan,
    ) -> YasppResult<Option<ApplicationError>> {
        match plan.policy {
            TargetPolicy::Strict => {
                let empty = self.filesystem.is_empty(target, false)?;
                Ok((!empty).then(|| ApplicationError::TargetNotEmpty {
                    path: target.to_path_buf(),
                }))
            }
            TargetPolicy::Collision => {
                if !self.filesystem.kind(target).is_folder() {
                    return Ok(None);
                }
                let present = self.filesystem.entries(target)?;
                let taken: Vec<String> = plan
                    .protected
                    .iter()
                    .filter(|name| present.contains(name))
                    .cloned()
                    .collect();
                Ok((!taken.is_empty()).then(|| ApplicationError::AssetCollision {
                    path: target.to_path_buf(),
                    names: taken,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_names_cover_written_entries() {
        let names = protected_names("site", Some("yaspp"));
        for expected in [
            "package.json",
            ".gitignore",
            "yaspp.config.json",
            ".yaspp-options.json",
            "data",
            "site",
            "yaspp",
        ] {
            assert!(names.iter().any(|n| n == expected), "{expected}");
        }
    }
}
