//! The project descriptor written at the root of a provisioned site.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::options::ResolvedOptions;

/// Project descriptor file name, at the target root.
pub const SITE_CONFIG_FILE: &str = "yaspp.config.json";
/// Side-car options snapshot, at the target root.
pub const OPTIONS_FILE: &str = ".yaspp-options.json";
/// Navigation stub, relative to the target root.
pub const NAV_FILE: &str = "data/nav.json";

/// `yaspp.config.json`.
///
/// Every path is relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub content: ContentSection,
    pub locale: LocaleSection,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub style: Option<StyleSection>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assets: Option<AssetsSection>,
    pub nav: NavSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    pub root: String,
    pub index: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleSection {
    pub root: String,
    pub langs: Vec<String>,
    pub default_locale: String,
    /// Per-language page overrides; empty on a fresh site.
    #[serde(default)]
    pub pages: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSection {
    pub root: String,
    pub index: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetsSection {
    pub root: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    pub file: String,
}

impl SiteConfig {
    pub fn from_options(options: &ResolvedOptions) -> Self {
        Self {
            content: ContentSection {
                root: options.content_root().to_string(),
                index: options.content_index().to_string(),
            },
            locale: LocaleSection {
                root: options.locale_root().to_string(),
                langs: options.langs().to_vec(),
                default_locale: options.default_locale().to_string(),
                pages: BTreeMap::new(),
            },
            style: options.style().map(|s| StyleSection {
                root: s.root.clone(),
                index: s.index.clone(),
            }),
            assets: options.assets_root().map(|root| AssetsSection {
                root: root.to_string(),
            }),
            nav: NavSection {
                file: NAV_FILE.to_string(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self).map(|mut s| {
            s.push('\n');
            s
        })
    }
}
