//! Path helpers shared by configuration, plugins, and the executor.
//!
//! - Tilde expansion for configured home and repository paths
//! - Lexical resolution of `.` and `..` (no symlinks are followed)
//! - Relative symlink targets between two locations inside the store

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Expand tilde (~) to the home directory.
///
/// Handles `~` and `~/path`; `~user` syntax is rejected.
///
/// # Errors
///
/// Returns an error if the path is not valid UTF-8, the home directory
/// cannot be determined, or `~user` syntax is used.
///
/// # Examples
///
/// ```
/// use dotrepo::paths::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/dotfiles")).unwrap();
/// assert!(expanded.is_absolute());
/// assert!(expanded.ends_with("dotfiles"));
///
/// assert_eq!(expand_tilde(Path::new("/srv")).unwrap(), Path::new("/srv"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Path contains invalid UTF-8".to_string(),
    })?;

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Cannot determine home directory".to_string(),
    })?;

    if path_str == "~" {
        Ok(home)
    } else if path_str.starts_with("~/") || path_str.starts_with("~\\") {
        Ok(home.join(&path_str[2..]))
    } else {
        Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// Resolve `.` and `..` components lexically.
///
/// `..` at the root (or at the start of a relative path) is dropped rather
/// than rejected: the result is only used for comparing link targets.
///
/// # Examples
///
/// ```
/// use dotrepo::paths::resolve_components;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     resolve_components(Path::new("/repo/b/../a/./f")),
///     PathBuf::from("/repo/a/f")
/// );
/// ```
#[must_use]
pub fn resolve_components(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) | Component::Normal(_) => {
                result.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
        }
    }
    result
}

/// Where a symlink at `link` with raw target `raw_target` points to.
///
/// Relative targets are interpreted against the directory holding the link.
#[must_use]
pub fn link_destination(link: &Path, raw_target: &Path) -> PathBuf {
    if raw_target.is_absolute() {
        return resolve_components(raw_target);
    }
    let base = link.parent().unwrap_or_else(|| Path::new(""));
    resolve_components(&base.join(raw_target))
}

/// Compute the relative path that reaches `target` from the directory
/// containing `link`.
///
/// Both paths must be absolute (or both relative to the same base).
///
/// # Examples
///
/// ```
/// use dotrepo::paths::relative_link_target;
/// use std::path::{Path, PathBuf};
///
/// let target = relative_link_target(
///     Path::new("/repo/dotfiles/plain/common/.config/git/config"),
///     Path::new("/repo/dotfiles/plain/work/.config/git/config"),
/// );
/// assert_eq!(target, PathBuf::from("../../../common/.config/git/config"));
/// ```
#[must_use]
pub fn relative_link_target(target: &Path, link: &Path) -> PathBuf {
    let target = resolve_components(target);
    let base = resolve_components(link.parent().unwrap_or_else(|| Path::new("")));

    let target_parts: Vec<Component<'_>> = target.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_parts.len() {
        result.push("..");
    }
    for part in &target_parts[common..] {
        result.push(part);
    }
    result
}
