//! Resolved locations and their observed filesystem state.
//!
//! [`classify`] is the single place that turns a path into a
//! [`LocationState`]; update, restore, and clean planning all go through it.

use std::fmt;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::paths::link_destination;

/// Which side of the convergence a location belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum LocationKind {
    /// The tracked path under the home directory.
    Home,
    /// The store copy for the named category.
    Category(String),
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Category(name) => write!(f, "category '{name}'"),
        }
    }
}

/// A physical filesystem path tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    kind: LocationKind,
    path: PathBuf,
}

impl Location {
    /// A home location.
    #[must_use]
    pub fn home(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: LocationKind::Home,
            path: path.into(),
        }
    }

    /// A store location for `category`.
    #[must_use]
    pub fn category(category: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: LocationKind::Category(category.into()),
            path: path.into(),
        }
    }

    /// The role of this location.
    #[must_use]
    pub const fn kind(&self) -> &LocationKind {
        &self.kind
    }

    /// The physical path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this is the home location.
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.kind == LocationKind::Home
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path.display(), self.kind)
    }
}

/// Observed state of a location at planning time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "target")]
pub enum LocationState {
    /// Nothing exists at the path.
    Absent,
    /// A regular file holding real content.
    RegularFile,
    /// A symlink resolving to the current master. Carries the raw link target.
    SymlinkValid(PathBuf),
    /// A symlink whose target does not exist.
    SymlinkBroken,
    /// A symlink resolving to something other than the current master.
    /// Carries the lexical destination of the link.
    SymlinkForeign(PathBuf),
    /// A directory or special file, or a path below a regular file; never
    /// managed.
    Unsupported,
}

impl LocationState {
    /// Whether the location holds real content.
    #[must_use]
    pub const fn is_regular_file(&self) -> bool {
        matches!(self, Self::RegularFile)
    }

    /// Whether the location is a symlink of any kind.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(
            self,
            Self::SymlinkValid(_) | Self::SymlinkBroken | Self::SymlinkForeign(_)
        )
    }

    /// Whether anything at all exists at the location.
    #[must_use]
    pub const fn exists(&self) -> bool {
        !matches!(self, Self::Absent)
    }
}

impl fmt::Display for LocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::RegularFile => write!(f, "regular file"),
            Self::SymlinkValid(target) => write!(f, "link to master ({})", target.display()),
            Self::SymlinkBroken => write!(f, "broken link"),
            Self::SymlinkForeign(target) => write!(f, "link to {}", target.display()),
            Self::Unsupported => write!(f, "neither a file nor a symlink"),
        }
    }
}

/// Classifies `path` against the current `master`, without following the
/// final path component when it is a symlink.
///
/// A symlink is `SymlinkValid` only when it resolves to the same file as
/// `master`; with no master every resolving symlink is `SymlinkForeign`.
///
/// # Errors
///
/// Returns any I/O error other than "not found" (e.g. permission denied).
/// A path whose parent is a regular file is `Unsupported`, not an error.
///
/// # Examples
///
/// ```
/// use dotrepo::location::{classify, LocationState};
///
/// let dir = tempfile::tempdir().unwrap();
/// let master = dir.path().join("master");
/// std::fs::write(&master, "x").unwrap();
///
/// assert_eq!(classify(&master, None).unwrap(), LocationState::RegularFile);
/// assert_eq!(classify(&dir.path().join("nope"), None).unwrap(), LocationState::Absent);
/// ```
pub fn classify(path: &Path, master: Option<&Path>) -> io::Result<LocationState> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LocationState::Absent),
        Err(e) if is_not_dir(&e) => return Ok(LocationState::Unsupported),
        Err(e) => return Err(e),
    };

    let file_type = metadata.file_type();
    if file_type.is_file() {
        return Ok(LocationState::RegularFile);
    }
    if !file_type.is_symlink() {
        return Ok(LocationState::Unsupported);
    }

    let raw_target = fs::read_link(path)?;
    let resolved = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound) || is_loop(&e) => {
            return Ok(LocationState::SymlinkBroken);
        }
        Err(e) => return Err(e),
    };

    if let Some(master) = master {
        if let Ok(master) = fs::canonicalize(master) {
            if master == resolved {
                return Ok(LocationState::SymlinkValid(raw_target));
            }
        }
    }
    Ok(LocationState::SymlinkForeign(link_destination(
        path,
        &raw_target,
    )))
}

/// Symlink loops surface as a raw OS error rather than a stable kind.
#[cfg(unix)]
fn is_loop(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::ELOOP)
}

#[cfg(not(unix))]
fn is_loop(_e: &io::Error) -> bool {
    false
}

/// A parent component of the path is not a directory.
#[cfg(unix)]
fn is_not_dir(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::ENOTDIR)
}

#[cfg(not(unix))]
fn is_not_dir(_e: &io::Error) -> bool {
    false
}
