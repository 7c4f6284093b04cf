//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;
use yaspp_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::FileKind,
    error::{YasppError, YasppResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn kind(&self, path: &Path) -> FileKind {
        match fs::symlink_metadata(path) {
            Ok(meta) if meta.is_dir() => FileKind::Folder,
            Ok(meta) if meta.is_file() => FileKind::File,
            Ok(_) => FileKind::Other,
            Err(_) => FileKind::Absent,
        }
    }

    fn create_dir_all(&self, path: &Path) -> YasppResult<()> {
        match self.kind(path) {
            FileKind::Folder => return Ok(()),
            FileKind::Absent => {}
            _ => {
                return Err(ApplicationError::TargetUnusable {
                    path: path.to_path_buf(),
                    reason: "a file is in the way".into(),
                }
                .into());
            }
        }
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))?;
        if self.kind(path).is_folder() {
            Ok(())
        } else {
            Err(ApplicationError::filesystem(path, "directory missing after creation").into())
        }
    }

    fn is_empty(&self, path: &Path, must_exist: bool) -> YasppResult<bool> {
        match self.kind(path) {
            FileKind::Folder => {}
            FileKind::Absent if !must_exist => return Ok(true),
            _ => {
                return Err(ApplicationError::filesystem(path, "not an existing folder").into());
            }
        }
        for entry in WalkDir::new(path).min_depth(1) {
            let entry = entry.map_err(|e| map_walk_error(path, e))?;
            if !entry.file_type().is_dir() {
                debug!(entry = %entry.path().display(), "Folder is not empty");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn entries(&self, path: &Path) -> YasppResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))? {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn remove_tree(&self, path: &Path, remove_root: bool, must_exist: bool) -> bool {
        if !self.kind(path).is_folder() {
            return !must_exist;
        }
        let result = if remove_root {
            fs::remove_dir_all(path)
        } else {
            clear_dir(path)
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to remove tree");
                false
            }
        }
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> YasppResult<()> {
        if !self.kind(src).is_folder() {
            return Err(ApplicationError::SourceNotFound {
                path: src.to_path_buf(),
            }
            .into());
        }
        let (real_src, real_dst) = (canonical(src), canonical(dst));
        if real_dst.starts_with(&real_src) || real_src.starts_with(&real_dst) {
            return Err(ApplicationError::SourceOverlapsTarget {
                folder: real_src,
                destination: real_dst,
            }
            .into());
        }

        if self.kind(dst).is_folder() && !self.remove_tree(dst, false, true) {
            return Err(ApplicationError::filesystem(dst, "could not clear destination").into());
        }

        match copy_entries(src, dst) {
            Ok(count) => {
                debug!(files = count, from = %src.display(), to = %dst.display(), "Tree copied");
                Ok(())
            }
            Err(e) => {
                self.remove_tree(dst, false, false);
                Err(e)
            }
        }
    }

    fn write_file(&self, path: &Path, content: &str) -> YasppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_to_string(&self, path: &Path) -> YasppResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }
}

/// Resolve links and `..` in `path`, which need not exist yet: the deepest
/// existing ancestor is canonicalized and the missing tail appended.
fn canonical(path: &Path) -> PathBuf {
    let mut missing = Vec::new();
    let mut current = path;
    loop {
        if let Ok(resolved) = dunce::canonicalize(current) {
            return missing
                .iter()
                .rev()
                .fold(resolved, |acc: PathBuf, name| acc.join(name));
        }
        match (current.parent(), current.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Delete every child of `path`, keeping `path` itself.
fn clear_dir(path: &Path) -> io::Result<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let child = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&child)?;
        } else {
            fs::remove_file(&child)?;
        }
    }
    Ok(())
}

/// Copy regular files and folders below `src` into `dst`, returning the
/// number of files copied. Anything else is skipped.
fn copy_entries(src: &Path, dst: &Path) -> YasppResult<usize> {
    fs::create_dir_all(dst).map_err(|e| map_io_error(dst, e, "create directory"))?;
    let mut copied = 0;
    for entry in WalkDir::new(src).min_depth(1).follow_links(false) {
        let entry = entry.map_err(|e| map_walk_error(src, e))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| ApplicationError::filesystem(entry.path(), e))?;
        let target: PathBuf = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| map_io_error(&target, e, "create directory"))?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target).map_err(|e| map_io_error(&target, e, "copy file"))?;
            copied += 1;
        } else {
            debug!(entry = %entry.path().display(), "Skipping special file");
        }
    }
    Ok(copied)
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> YasppError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

fn map_walk_error(root: &Path, e: walkdir::Error) -> YasppError {
    let path = e.path().unwrap_or(root).to_path_buf();
    ApplicationError::FilesystemError {
        path,
        reason: format!("Failed to walk directory: {}", e),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tree(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, file).unwrap();
        }
    }

    #[test]
    fn create_dir_all_is_idempotent_and_rejects_files() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let dir = tmp.path().join("a/b");
        fs_.create_dir_all(&dir).unwrap();
        fs_.create_dir_all(&dir).unwrap();
        assert!(dir.is_dir());

        let file = tmp.path().join("f");
        fs::write(&file, "x").unwrap();
        assert!(fs_.create_dir_all(&file).is_err());
    }

    #[test]
    fn is_empty_ignores_empty_subfolders() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        fs::create_dir_all(tmp.path().join("x/y/z")).unwrap();
        assert!(fs_.is_empty(tmp.path(), true).unwrap());

        tree(tmp.path(), &["x/y/z/file.txt"]);
        assert!(!fs_.is_empty(tmp.path(), true).unwrap());
    }

    #[test]
    fn is_empty_on_missing_folder() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let missing = tmp.path().join("missing");
        assert!(fs_.is_empty(&missing, false).unwrap());
        assert!(fs_.is_empty(&missing, true).is_err());
    }

    #[test]
    fn entries_are_sorted_direct_children() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        tree(tmp.path(), &["b.txt", "a/inner.txt"]);
        fs::create_dir(tmp.path().join("empty")).unwrap();

        assert_eq!(fs_.entries(tmp.path()).unwrap(), vec!["a", "b.txt", "empty"]);
        assert!(fs_.entries(&tmp.path().join("b.txt")).is_err());
    }

    #[test]
    fn remove_tree_can_keep_root() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let root = tmp.path().join("root");
        tree(&root, &["a.txt", "sub/b.txt"]);

        assert!(fs_.remove_tree(&root, false, true));
        assert!(root.is_dir());
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);

        assert!(fs_.remove_tree(&root, true, true));
        assert!(!root.exists());
        assert!(fs_.remove_tree(&root, true, false));
        assert!(!fs_.remove_tree(&root, true, true));
    }

    #[test]
    fn copy_tree_mirrors_and_clears_destination() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        tree(&src, &["index.md", "content/en/page.md"]);
        tree(&dst, &["stale.txt"]);

        fs_.copy_tree(&src, &dst).unwrap();

        assert!(!dst.join("stale.txt").exists());
        assert_eq!(
            fs::read_to_string(dst.join("content/en/page.md")).unwrap(),
            "content/en/page.md"
        );
    }

    #[test]
    fn copy_tree_rejects_nested_destination() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let src = tmp.path().join("src");
        tree(&src, &["a.txt"]);

        assert!(fs_.copy_tree(&src, &src.join("inner")).is_err());
        assert!(fs_.copy_tree(&src, &src).is_err());
        // Shares a string prefix but is a sibling.
        fs_.copy_tree(&src, &tmp.path().join("src-copy")).unwrap();
        assert!(tmp.path().join("src-copy/a.txt").exists());
    }

    #[test]
    fn copy_tree_sees_through_parent_segments() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let cwd = tmp.path().join("cwd");
        tree(&cwd, &["notes.md"]);

        let err = fs_
            .copy_tree(&cwd.join(".."), &cwd.join("out/site"))
            .unwrap_err();
        assert!(err.to_string().contains("overlap"));
        assert!(!cwd.join("out").exists());
        assert!(cwd.join("notes.md").exists());
    }

    #[test]
    fn copy_tree_refuses_to_clear_its_own_source() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let dst = tmp.path().join("site");
        tree(&dst, &["docs/page.md"]);

        assert!(fs_.copy_tree(&dst.join("docs"), &dst).is_err());
        assert!(dst.join("docs/page.md").exists());
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_sees_through_symlinked_destination() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let src = tmp.path().join("src");
        tree(&src, &["a.txt"]);
        std::os::unix::fs::symlink(&src, tmp.path().join("alias")).unwrap();

        assert!(fs_.copy_tree(&src, &tmp.path().join("alias/inner")).is_err());
        assert!(!src.join("inner").exists());
    }

    #[test]
    fn copy_tree_requires_source_folder() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let err = fs_
            .copy_tree(&tmp.path().join("nope"), &tmp.path().join("dst"))
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!tmp.path().join("dst").exists());
    }

    #[cfg(unix)]
    #[test]
    fn copy_tree_skips_symlinks() {
        let tmp = TempDir::new().unwrap();
        let fs_ = LocalFilesystem::new();
        let src = tmp.path().join("src");
        tree(&src, &["real.txt"]);
        std::os::unix::fs::symlink(src.join("real.txt"), src.join("link.txt")).unwrap();

        let dst = tmp.path().join("dst");
        fs_.copy_tree(&src, &dst).unwrap();
        assert!(dst.join("real.txt").exists());
        assert!(!dst.join("link.txt").exists());
    }
}
