use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use semver::Version;
use serde::Serialize;

use crate::domain::value_objects::Tool;

/// Result of probing the external tools.
///
/// A tool maps to `None` when it could not be run or printed no version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ToolAvailability {
    versions: BTreeMap<Tool, Option<Version>>,
}

impl ToolAvailability {
    pub fn record(&mut self, tool: Tool, version: Option<Version>) {
        self.versions.insert(tool, version);
    }

    pub fn with(mut self, tool: Tool, version: &str) -> Self {
        self.record(tool, parse_version(version));
        self
    }

    pub fn version(&self, tool: Tool) -> Option<&Version> {
        self.versions.get(&tool).and_then(Option::as_ref)
    }

    pub fn is_available(&self, tool: Tool) -> bool {
        self.version(tool).is_some()
    }

    /// The package manager to run, honoring a preference when it is present.
    /// Falls back to yarn, then npm.
    pub fn package_manager(&self, preferred: Option<Tool>) -> Option<Tool> {
        preferred
            .filter(|t| t.is_package_manager() && self.is_available(*t))
            .or_else(|| {
                [Tool::Yarn, Tool::Npm]
                    .into_iter()
                    .find(|t| self.is_available(*t))
            })
    }

    /// Tools that must be present but are not. A missing package manager is
    /// reported as both yarn and npm.
    pub fn missing_mandatory(&self) -> Vec<Tool> {
        let mut missing = Vec::new();
        if !self.is_available(Tool::Git) {
            missing.push(Tool::Git);
        }
        if self.package_manager(None).is_none() {
            missing.extend([Tool::Yarn, Tool::Npm]);
        }
        missing
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tool, Option<&Version>)> {
        self.versions.iter().map(|(t, v)| (*t, v.as_ref()))
    }
}

/// Pull the first `X.Y.Z` out of a `--version` banner.
pub fn parse_version(output: &str) -> Option<Version> {
    static TRIPLE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = TRIPLE
        .get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").ok())
        .as_ref()?;
    let caps = re.captures(output)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}
