//! Tracked path identity.
//!
//! A [`TrackedPath`] names a file relative to the home directory together
//! with the ordered categories it lives under in the store and the storage
//! plugin that owns its store copies. Category order is master priority.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Plugin used when a tracked path does not name one.
pub const DEFAULT_PLUGIN: &str = "plain";

/// A relative file identity managed across categories and home.
///
/// # Examples
///
/// ```
/// use dotrepo::TrackedPath;
///
/// let tracked = TrackedPath::new(".vimrc", ["common", "laptop"]).unwrap();
/// assert_eq!(tracked.categories(), ["common", "laptop"]);
/// assert_eq!(tracked.plugin(), "plain");
///
/// assert!(TrackedPath::new("/etc/hosts", ["common"]).is_err());
/// assert!(TrackedPath::new(".vimrc", Vec::<String>::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TrackedPath {
    path: PathBuf,
    categories: Vec<String>,
    plugin: String,
}

impl TrackedPath {
    /// Creates a tracked path routed through the default plugin.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the path is absolute, empty, or escapes its
    /// root, and `Validation` if the category list is empty, contains an
    /// invalid name, or repeats a category.
    pub fn new<P, I, S>(path: P, categories: I) -> Result<Self>
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_plugin(path, categories, DEFAULT_PLUGIN)
    }

    /// Creates a tracked path routed through the named plugin.
    ///
    /// # Errors
    ///
    /// Same as [`TrackedPath::new`], plus `Validation` for an empty plugin
    /// name.
    pub fn with_plugin<P, I, S>(path: P, categories: I, plugin: impl Into<String>) -> Result<Self>
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.into();
        validate_relative(&path)?;

        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        if categories.is_empty() {
            return Err(Error::Validation {
                field: "categories".into(),
                message: format!("\"{}\" has no categories", path.display()),
            });
        }
        for (i, category) in categories.iter().enumerate() {
            validate_category(category)?;
            if categories[..i].contains(category) {
                return Err(Error::Validation {
                    field: "categories".into(),
                    message: format!(
                        "category '{category}' listed twice for \"{}\"",
                        path.display()
                    ),
                });
            }
        }

        let plugin = plugin.into();
        if plugin.trim().is_empty() {
            return Err(Error::Validation {
                field: "plugin".into(),
                message: "plugin name cannot be empty".into(),
            });
        }

        Ok(Self {
            path,
            categories,
            plugin,
        })
    }

    /// The path relative to home.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Categories in priority order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// The highest-priority category.
    #[must_use]
    pub fn primary_category(&self) -> &str {
        // Construction guarantees at least one category.
        &self.categories[0]
    }

    /// Name of the storage plugin that owns this path's store copies.
    #[must_use]
    pub fn plugin(&self) -> &str {
        &self.plugin
    }
}

impl fmt::Display for TrackedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn validate_relative(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "tracked path cannot be empty".into(),
        });
    }
    for component in path.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidPath {
                    path: path.to_path_buf(),
                    reason: "tracked paths must be relative to home".into(),
                });
            }
            Component::ParentDir => {
                return Err(Error::InvalidPath {
                    path: path.to_path_buf(),
                    reason: "tracked paths cannot contain '..'".into(),
                });
            }
        }
    }
    if path.components().all(|c| c == Component::CurDir) {
        return Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "tracked path must name a file".into(),
        });
    }
    Ok(())
}

/// Checks that a category name is usable as a single store directory.
///
/// # Errors
///
/// Returns `Validation` for empty names, names containing path separators
/// or NUL bytes, and the special names `.` and `..`.
pub fn validate_category(name: &str) -> Result<()> {
    let invalid = |message: &str| Error::Validation {
        field: "category".into(),
        message: format!("'{name}': {message}"),
    };

    if name.trim().is_empty() {
        return Err(invalid("cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains('\0') {
        return Err(invalid("cannot contain path separators or NUL"));
    }
    if name == "." || name == ".." {
        return Err(invalid("reserved name"));
    }
    Ok(())
}
