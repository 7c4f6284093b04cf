//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use yaspp_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::{FileKind, paths},
    error::YasppResult,
};

/// In-memory filesystem for testing.
///
/// Paths are stored as given; tests should use absolute paths throughout.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    /// Entries that are neither files nor folders (symlinks, sockets).
    specials: BTreeSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn kind(&self, path: &Path) -> FileKind {
        if self.directories.contains(path) {
            FileKind::Folder
        } else if self.files.contains_key(path) {
            FileKind::File
        } else if self.specials.contains(path) {
            FileKind::Other
        } else {
            FileKind::Absent
        }
    }

    fn mkdirs(&mut self, path: &Path) -> YasppResult<()> {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            let kind = self.kind(ancestor);
            if kind.exists() && !kind.is_folder() {
                return Err(ApplicationError::TargetUnusable {
                    path: ancestor.to_path_buf(),
                    reason: "a file is in the way".into(),
                }
                .into());
            }
        }
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                self.directories.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }

    fn clear_below(&mut self, path: &Path) {
        let below = |p: &PathBuf| p.starts_with(path) && p != path;
        self.files.retain(|p, _| !below(p));
        self.directories.retain(|p| !below(p));
        self.specials.retain(|p| !below(p));
    }
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, creating its parents (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        let _ = self.write_file(path.as_ref(), content);
        self
    }

    /// Seed an empty folder (testing helper).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        let _ = self.create_dir_all(path.as_ref());
        self
    }

    /// Seed an entry that is neither file nor folder, like a symlink.
    pub fn with_special(self, path: impl AsRef<Path>) -> Self {
        if let Ok(mut inner) = self.inner.write() {
            inner.specials.insert(path.as_ref().to_path_buf());
        }
        self
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read(&self) -> YasppResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }

    fn write(&self) -> YasppResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }
}

impl Filesystem for MemoryFilesystem {
    fn kind(&self, path: &Path) -> FileKind {
        self.read()
            .map(|inner| inner.kind(path))
            .unwrap_or(FileKind::Absent)
    }

    fn create_dir_all(&self, path: &Path) -> YasppResult<()> {
        self.write()?.mkdirs(path)
    }

    fn is_empty(&self, path: &Path, must_exist: bool) -> YasppResult<bool> {
        let inner = self.read()?;
        match inner.kind(path) {
            FileKind::Folder => {}
            FileKind::Absent if !must_exist => return Ok(true),
            _ => {
                return Err(ApplicationError::filesystem(path, "not an existing folder").into());
            }
        }
        let has_file = inner.files.keys().any(|p| p.starts_with(path))
            || inner.specials.iter().any(|p| p.starts_with(path));
        Ok(!has_file)
    }

    fn entries(&self, path: &Path) -> YasppResult<Vec<String>> {
        let inner = self.read()?;
        if !inner.kind(path).is_folder() {
            return Err(ApplicationError::filesystem(path, "not a folder").into());
        }
        let children = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .chain(inner.specials.iter())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect::<BTreeSet<_>>();
        Ok(children.into_iter().collect())
    }

    fn remove_tree(&self, path: &Path, remove_root: bool, must_exist: bool) -> bool {
        let Ok(mut inner) = self.write() else {
            return false;
        };
        if !inner.kind(path).is_folder() {
            return !must_exist;
        }
        inner.clear_below(path);
        if remove_root {
            inner.directories.remove(path);
        }
        true
    }

    fn copy_tree(&self, src: &Path, dst: &Path) -> YasppResult<()> {
        // No links here, so folding `..` is all the canonicalization needed.
        let src = &paths::absolute_path(Path::new("/"), src);
        let dst = &paths::absolute_path(Path::new("/"), dst);
        let mut inner = self.write()?;
        if !inner.kind(src).is_folder() {
            return Err(ApplicationError::SourceNotFound {
                path: src.to_path_buf(),
            }
            .into());
        }
        if dst.starts_with(src) || src.starts_with(dst) {
            return Err(ApplicationError::SourceOverlapsTarget {
                folder: src.to_path_buf(),
                destination: dst.to_path_buf(),
            }
            .into());
        }

        inner.clear_below(dst);
        inner.mkdirs(dst)?;

        let rebase = |p: &Path| p.strip_prefix(src).ok().map(|rel| dst.join(rel));
        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(src))
            .filter_map(|p| rebase(p.as_path()))
            .collect();
        let files: Vec<(PathBuf, String)> = inner
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(src))
            .filter_map(|(p, c)| rebase(p.as_path()).map(|t| (t, c.clone())))
            .collect();

        inner.directories.extend(dirs);
        inner.files.extend(files);
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> YasppResult<()> {
        let mut inner = self.write()?;
        if inner.kind(path).is_folder() {
            return Err(ApplicationError::filesystem(path, "is a folder").into());
        }
        if let Some(parent) = path.parent() {
            inner.mkdirs(parent)?;
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> YasppResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::filesystem(path, "no such file").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_folders_count_as_empty() {
        let fs = MemoryFilesystem::new().with_dir("/t/a/b");
        assert!(fs.is_empty(Path::new("/t"), true).unwrap());
        let fs = fs.with_file("/t/a/b/c.txt", "x");
        assert!(!fs.is_empty(Path::new("/t"), true).unwrap());
        assert!(fs.is_empty(Path::new("/missing"), false).unwrap());
        assert!(fs.is_empty(Path::new("/missing"), true).is_err());
    }

    #[test]
    fn create_dir_all_refuses_file_in_the_way() {
        let fs = MemoryFilesystem::new().with_file("/t/file", "x");
        assert!(fs.create_dir_all(Path::new("/t/file")).is_err());
        assert!(fs.create_dir_all(Path::new("/t/file/below")).is_err());
        assert!(fs.create_dir_all(Path::new("/t/dir")).is_ok());
    }

    #[test]
    fn copy_tree_clears_then_copies_but_skips_specials() {
        let fs = MemoryFilesystem::new()
            .with_file("/src/a.md", "a")
            .with_file("/src/sub/b.md", "b")
            .with_special("/src/link")
            .with_file("/dst/old.md", "old");

        fs.copy_tree(Path::new("/src"), Path::new("/dst")).unwrap();

        assert_eq!(fs.read_file("/dst/sub/b.md").as_deref(), Some("b"));
        assert!(fs.read_file("/dst/old.md").is_none());
        assert_eq!(fs.kind(Path::new("/dst/link")), FileKind::Absent);
    }

    #[test]
    fn copy_tree_guards_against_self_nesting() {
        let fs = MemoryFilesystem::new().with_file("/src/a.md", "a");
        assert!(fs.copy_tree(Path::new("/src"), Path::new("/src/x")).is_err());
        assert!(fs.copy_tree(Path::new("/src"), Path::new("/src2")).is_ok());
    }

    #[test]
    fn copy_tree_folds_parent_segments_before_guarding() {
        let fs = MemoryFilesystem::new().with_file("/w/cwd/a.md", "a");
        let err = fs
            .copy_tree(Path::new("/w/cwd/.."), Path::new("/w/cwd/out/site"))
            .unwrap_err();
        assert!(err.to_string().contains("overlap"));
        assert!(fs.copy_tree(Path::new("/w/cwd/out/.."), Path::new("/w")).is_err());
        assert_eq!(fs.list_files(), vec![PathBuf::from("/w/cwd/a.md")]);
    }

    #[test]
    fn entries_lists_direct_children() {
        let fs = MemoryFilesystem::new()
            .with_file("/t/a.txt", "")
            .with_file("/t/sub/b.txt", "")
            .with_dir("/t/empty");
        assert_eq!(
            fs.entries(Path::new("/t")).unwrap(),
            vec!["a.txt", "empty", "sub"]
        );
    }
}
