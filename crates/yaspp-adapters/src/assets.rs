//! Bundled templates and the default sample site, embedded at compile time.

use std::path::PathBuf;

use include_dir::{Dir, DirEntry, include_dir};
use yaspp_core::application::ports::AssetStore;

static ASSETS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/assets");

const TEMPLATES: &str = "templates";
const SAMPLE_SITE: &str = "site";

/// Asset store backed by files compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAssets;

impl EmbeddedAssets {
    pub fn new() -> Self {
        Self
    }
}

impl AssetStore for EmbeddedAssets {
    fn template(&self, name: &str) -> Option<String> {
        ASSETS_DIR
            .get_file(format!("{TEMPLATES}/{name}"))
            .and_then(|file| file.contents_utf8())
            .map(|s| s.to_string())
    }

    fn sample_site(&self) -> Vec<(PathBuf, String)> {
        let Some(root) = ASSETS_DIR.get_dir(SAMPLE_SITE) else {
            return Vec::new();
        };
        let mut files = Vec::new();
        collect_files(root, &mut files);
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files
            .into_iter()
            .filter_map(|(path, content)| {
                path.strip_prefix(SAMPLE_SITE)
                    .ok()
                    .map(|rel| (rel.to_path_buf(), content))
            })
            .collect()
    }
}

fn collect_files(dir: &Dir<'_>, out: &mut Vec<(PathBuf, String)>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(sub) => collect_files(sub, out),
            DirEntry::File(file) => {
                if let Some(text) = file.contents_utf8() {
                    out.push((file.path().to_path_buf(), text.to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn scaffold_templates_are_bundled() {
        let assets = EmbeddedAssets::new();
        for name in ["gitignore", "package.json", "nav.json"] {
            assert!(assets.template(name).is_some(), "{name}");
        }
        assert!(assets.template("missing.txt").is_none());
    }

    #[test]
    fn package_template_has_name_placeholder_and_init_script() {
        let body = EmbeddedAssets::new().template("package.json").unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "{{name}}");
        assert!(json["scripts"]["init"].is_string());
    }

    #[test]
    fn sample_site_paths_are_relative_to_site_folder() {
        let files = EmbeddedAssets::new().sample_site();
        let paths: Vec<&Path> = files.iter().map(|(p, _)| p.as_path()).collect();
        assert!(paths.contains(&Path::new("content/en/index.md")));
        assert!(paths.contains(&Path::new("locales/en.json")));
        assert!(paths.iter().all(|p| !p.starts_with("site")));
    }
}
