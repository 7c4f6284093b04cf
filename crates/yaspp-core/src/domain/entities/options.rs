//! Scaffolding options in their two shapes.
//!
//! [`OptionsDraft`] is the in-progress record the resolver fills field by
//! field from command-line values, a persisted snapshot and prompts. Every
//! field is optional and unchecked.
//!
//! [`ResolvedOptions`] is the validated result. It has no public constructor:
//! `DomainValidator::validate_options` is the only producer, so holding one
//! proves every invariant held at resolution time.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{paths, value_objects::Field};

// ── Draft ─────────────────────────────────────────────────────────────────────

/// Partially collected options. Also the persisted side-car shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub langs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_locale: Option<String>,
}

impl OptionsDraft {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Store a value; empty strings are stored as absent.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        *self.slot_mut(field) = value.filter(|v| !v.is_empty());
    }

    /// Builder-style [`Self::set`].
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    /// `true` when the value was given at all, even as an empty string.
    pub fn is_given(&self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Repository => &self.repository,
            Field::LocalPath => &self.path,
            Field::ContentRoot => &self.content_root,
            Field::ContentIndex => &self.content_index,
            Field::LocaleRoot => &self.locale_root,
            Field::StyleRoot => &self.style_root,
            Field::StyleIndex => &self.style_index,
            Field::AssetsRoot => &self.assets_root,
            Field::Langs => &self.langs,
            Field::DefaultLocale => &self.default_locale,
            Field::Branch => &self.branch,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Repository => &mut self.repository,
            Field::LocalPath => &mut self.path,
            Field::ContentRoot => &mut self.content_root,
            Field::ContentIndex => &mut self.content_index,
            Field::LocaleRoot => &mut self.locale_root,
            Field::StyleRoot => &mut self.style_root,
            Field::StyleIndex => &mut self.style_index,
            Field::AssetsRoot => &mut self.assets_root,
            Field::Langs => &mut self.langs,
            Field::DefaultLocale => &mut self.default_locale,
            Field::Branch => &mut self.branch,
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// The side-car file written next to the project descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsSnapshot {
    pub generator: String,
    pub saved_at: DateTime<Utc>,
    pub options: OptionsDraft,
}

impl OptionsSnapshot {
    pub fn new(options: OptionsDraft) -> Self {
        Self {
            generator: format!("yaspp-core {}", crate::VERSION),
            saved_at: Utc::now(),
            options,
        }
    }

    /// Parse either a full snapshot or a bare options object.
    pub fn parse_options(text: &str) -> Result<OptionsDraft, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OptionsFile {
            Snapshot(OptionsSnapshot),
            Draft(OptionsDraft),
        }

        Ok(match serde_json::from_str::<OptionsFile>(text)? {
            OptionsFile::Snapshot(s) => s.options,
            OptionsFile::Draft(d) => d,
        })
    }
}

// ── Resolved ──────────────────────────────────────────────────────────────────

/// Where the site content comes from. At most one concrete source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentSource {
    Repository { url: String, branch: Option<String> },
    LocalPath { path: String },
    Bundled,
}

impl ContentSource {
    /// Copied and cloned content lands one level below the target, so its
    /// paths need rebasing. The bundled site is laid out to match as-is.
    pub const fn needs_rebase(&self) -> bool {
        !matches!(self, Self::Bundled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    pub root: String,
    pub index: String,
}

/// Validated scaffolding options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    source: ContentSource,
    content_root: String,
    content_index: String,
    locale_root: String,
    langs: Vec<String>,
    default_locale: String,
    style: Option<StyleOptions>,
    assets_root: Option<String>,
    target: PathBuf,
    clean: bool,
}

impl ResolvedOptions {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        source: ContentSource,
        content_root: String,
        content_index: String,
        locale_root: String,
        langs: Vec<String>,
        default_locale: String,
        style: Option<StyleOptions>,
        assets_root: Option<String>,
        target: PathBuf,
        clean: bool,
    ) -> Self {
        Self {
            source,
            content_root,
            content_index,
            locale_root,
            langs,
            default_locale,
            style,
            assets_root,
            target,
            clean,
        }
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }
    pub fn content_root(&self) -> &str {
        &self.content_root
    }
    pub fn content_index(&self) -> &str {
        &self.content_index
    }
    pub fn locale_root(&self) -> &str {
        &self.locale_root
    }
    pub fn langs(&self) -> &[String] {
        &self.langs
    }
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }
    pub fn style(&self) -> Option<&StyleOptions> {
        self.style.as_ref()
    }
    pub fn assets_root(&self) -> Option<&str> {
        self.assets_root.as_deref()
    }
    pub fn target(&self) -> &Path {
        &self.target
    }
    pub fn clean(&self) -> bool {
        self.clean
    }

    /// Prefix every root and index path with `delta`.
    ///
    /// Used after content is staged below the target: paths the user gave
    /// relative to the content become relative to the project root.
    pub fn rebased(&self, delta: &str) -> Self {
        let rebase = |p: &str| paths::prefix_path(delta, p);
        Self {
            content_root: rebase(&self.content_root),
            content_index: rebase(&self.content_index),
            locale_root: rebase(&self.locale_root),
            style: self.style.as_ref().map(|s| StyleOptions {
                root: rebase(&s.root),
                index: rebase(&s.index),
            }),
            assets_root: self.assets_root.as_deref().map(rebase),
            ..self.clone()
        }
    }

    /// Back to the persisted shape, for the side-car and for re-editing.
    pub fn to_draft(&self) -> OptionsDraft {
        let (repository, branch, path) = match &self.source {
            ContentSource::Repository { url, branch } => (Some(url.clone()), branch.clone(), None),
            ContentSource::LocalPath { path } => (None, None, Some(path.clone())),
            ContentSource::Bundled => (None, None, None),
        };
        OptionsDraft {
            repository,
            branch,
            path,
            content_root: Some(self.content_root.clone()),
            content_index: Some(self.content_index.clone()),
            locale_root: Some(self.locale_root.clone()),
            style_root: self.style.as_ref().map(|s| s.root.clone()),
            style_index: self.style.as_ref().map(|s| s.index.clone()),
            assets_root: self.assets_root.clone(),
            langs: Some(self.langs.join(",")),
            default_locale: Some(self.default_locale.clone()),
        }
    }
}
