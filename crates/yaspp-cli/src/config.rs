//! Tool settings.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns it; the core crate only sees the [`ProvisionSettings`]
//! derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables `YASPP_*`, `__` between nested keys
//!    (`YASPP_DEFAULTS__PACKAGE_MANAGER=npm`)
//! 3. The `--settings` file, or the platform config file when present
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use yaspp_core::{
    application::ProvisionSettings,
    domain::{TargetPolicy, Tool},
};

const ENV_PREFIX: &str = "YASPP";

/// Application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Defaults for provisioning runs.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub content_folder: String,
    pub target_policy: TargetPolicy,
    pub package_manager: Option<Tool>,
    pub framework_repository: Option<String>,
    pub framework_folder: String,
    pub init_script: String,
}

impl Default for Defaults {
    fn default() -> Self {
        let settings = ProvisionSettings::default();
        Self {
            content_folder: settings.content_folder,
            target_policy: settings.policy,
            package_manager: settings.package_manager,
            framework_repository: settings.framework_repository,
            framework_folder: settings.framework_folder,
            init_script: settings.init_script,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load settings.
    ///
    /// `settings_file` is the path passed via `--settings`; it must exist.
    /// Without it the platform config file is read when present.
    pub fn load(settings_file: Option<&Path>) -> anyhow::Result<Self> {
        let file = match settings_file {
            Some(path) => File::from(path).required(true),
            None => File::from(Self::config_path()).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    /// Path to the default settings file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.yaspp.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "yaspp", "create-yaspp")
            .map(|d| d.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from(".yaspp.toml"))
    }

    /// Settings for one provisioning run. A policy given on the command
    /// line wins over the configured one.
    pub fn provision_settings(&self, policy: Option<TargetPolicy>) -> ProvisionSettings {
        let d = &self.defaults;
        ProvisionSettings {
            content_folder: d.content_folder.clone(),
            framework_repository: d.framework_repository.clone().filter(|u| !u.is_empty()),
            framework_folder: d.framework_folder.clone(),
            package_manager: d.package_manager.filter(|t| t.is_package_manager()),
            init_script: d.init_script.clone(),
            policy: policy.unwrap_or(d.target_policy),
        }
    }
}
