//! Path arithmetic on forward-slash strings.
//!
//! Everything here is pure: no filesystem access. The string helpers do not
//! resolve `.`/`..`; callers pass directories made absolute by
//! [`absolute_path`] first.

use std::path::{Component, Path, PathBuf};

/// Join `path` onto `base` unless it is already absolute, then fold `.` and
/// `..` components lexically. `..` at the root stays at the root.
pub fn absolute_path(base: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Rewrite a platform path into forward-slash form.
///
/// - backslashes become `/` and runs of separators collapse to one
/// - a drive-letter prefix (`C:`) is kept but lower-cased (`c:/...`)
/// - a trailing separator is dropped unless the path is a root
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(path.len());
    let mut last_was_sep = false;
    for ch in path.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' {
            if last_was_sep {
                continue;
            }
            last_was_sep = true;
        } else {
            last_was_sep = false;
        }
        out.push(ch);
    }

    if has_drive_prefix(&out) {
        let drive = out[..1].to_ascii_lowercase();
        out.replace_range(..1, &drive);
        if out.len() == 2 {
            out.push('/');
        }
    }

    let is_root = out == "/" || (has_drive_prefix(&out) && out.len() == 3);
    if out.ends_with('/') && !is_root {
        out.pop();
    }
    out
}

/// Express `to_dir` relative to `from_dir`.
///
/// Segments are compared left to right, ignoring case, until they diverge.
/// One `..` is emitted per remaining `from_dir` segment, followed by the rest
/// of `to_dir`. When that form is longer than `to_dir` itself (divergence near
/// the root) the normalized `to_dir` is returned instead. Equal inputs yield
/// an empty string.
pub fn relative_path(from_dir: &str, to_dir: &str) -> String {
    let from = normalize_path(from_dir);
    let to = normalize_path(to_dir);

    let from_segments: Vec<&str> = segments(&from);
    let to_segments: Vec<&str> = segments(&to);

    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a.to_lowercase() == b.to_lowercase())
        .count();

    let ups = from_segments.len() - common;
    let mut parts: Vec<&str> = std::iter::repeat_n("..", ups).collect();
    parts.extend_from_slice(&to_segments[common..]);
    let relative = parts.join("/");

    if relative.len() <= to.len() {
        relative
    } else {
        to
    }
}

/// Prefix a project-relative path with a directory delta.
///
/// Absolute paths and empty values are returned unchanged; an empty delta is
/// a no-op.
pub fn prefix_path(delta: &str, path: &str) -> String {
    if delta.is_empty() || path.is_empty() || is_absolute(path) {
        return path.to_string();
    }
    let path = path.trim_start_matches("./");
    let delta = delta.trim_end_matches('/');
    format!("{delta}/{path}")
}

/// `true` for `/...` and `c:/...` style paths.
pub fn is_absolute(path: &str) -> bool {
    let normalized = normalize_path(path);
    normalized.starts_with('/') || has_drive_prefix(&normalized)
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes.len() == 2 || bytes[2] == b'/')
}
