//! Domain value objects: Field, FileKind, Tool, TargetPolicy, Confirmation.
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Field ─────────────────────────────────────────────────────────────────────

/// One collectable option, in the order the resolver asks for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Repository,
    LocalPath,
    ContentRoot,
    ContentIndex,
    LocaleRoot,
    StyleRoot,
    StyleIndex,
    AssetsRoot,
    Langs,
    DefaultLocale,
    Branch,
}

impl Field {
    /// Human label used in validation messages.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::LocalPath => "local path",
            Self::ContentRoot => "content root",
            Self::ContentIndex => "content index",
            Self::LocaleRoot => "locale root",
            Self::StyleRoot => "style root",
            Self::StyleIndex => "style index",
            Self::AssetsRoot => "assets root",
            Self::Langs => "languages",
            Self::DefaultLocale => "default locale",
            Self::Branch => "branch",
        }
    }

    /// Command-line flag that sets this field.
    pub const fn flag(&self) -> &'static str {
        match self {
            Self::Repository => "--repository",
            Self::LocalPath => "--path",
            Self::ContentRoot => "--content-root",
            Self::ContentIndex => "--content-index",
            Self::LocaleRoot => "--locale-root",
            Self::StyleRoot => "--style-root",
            Self::StyleIndex => "--style-index",
            Self::AssetsRoot => "--assets-root",
            Self::Langs => "--langs",
            Self::DefaultLocale => "--default-locale",
            Self::Branch => "--branch",
        }
    }

    /// Stable key for message catalogs.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Repository => "repository",
            Self::LocalPath => "localPath",
            Self::ContentRoot => "contentRoot",
            Self::ContentIndex => "contentIndex",
            Self::LocaleRoot => "localeRoot",
            Self::StyleRoot => "styleRoot",
            Self::StyleIndex => "styleIndex",
            Self::AssetsRoot => "assetsRoot",
            Self::Langs => "langs",
            Self::DefaultLocale => "defaultLocale",
            Self::Branch => "branch",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── FileKind ──────────────────────────────────────────────────────────────────

/// What occupies a path on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Absent,
    File,
    Folder,
    Other,
}

impl FileKind {
    pub const fn is_folder(self) -> bool {
        matches!(self, Self::Folder)
    }

    pub const fn exists(self) -> bool {
        !matches!(self, Self::Absent)
    }
}

// ── Tool ──────────────────────────────────────────────────────────────────────

/// External tools the pipeline relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Git,
    Yarn,
    Npm,
    Npx,
}

impl Tool {
    /// Probe order.
    pub const ALL: [Tool; 4] = [Tool::Git, Tool::Yarn, Tool::Npm, Tool::Npx];

    pub const fn program(&self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Yarn => "yarn",
            Self::Npm => "npm",
            Self::Npx => "npx",
        }
    }

    pub const fn is_package_manager(self) -> bool {
        matches!(self, Self::Yarn | Self::Npm)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "git" => Ok(Self::Git),
            "yarn" => Ok(Self::Yarn),
            "npm" => Ok(Self::Npm),
            "npx" => Ok(Self::Npx),
            other => Err(format!("unknown tool: {other}")),
        }
    }
}

// ── TargetPolicy ──────────────────────────────────────────────────────────────

/// How strictly the target directory must be vacant before provisioning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPolicy {
    /// No entry anywhere in the tree.
    #[default]
    Strict,
    /// Only the names the pipeline writes must be free.
    Collision,
}

impl FromStr for TargetPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" | "strict-empty" => Ok(Self::Strict),
            "collision" | "asset-collision" => Ok(Self::Collision),
            other => Err(format!("unknown target policy: {other}")),
        }
    }
}

// ── Confirmation ──────────────────────────────────────────────────────────────

/// Answer to the end-of-pass review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accept,
    Edit,
    Abort,
}

// ── Stage ─────────────────────────────────────────────────────────────────────

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Probe,
    Configure,
    Target,
    Content,
    Framework,
    Artifacts,
    Finalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Probe => "probe",
            Self::Configure => "configure",
            Self::Target => "target",
            Self::Content => "content",
            Self::Framework => "framework",
            Self::Artifacts => "artifacts",
            Self::Finalize => "finalize",
        };
        f.write_str(s)
    }
}
