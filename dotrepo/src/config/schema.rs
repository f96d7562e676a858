//! Configuration schema definitions.
//!
//! [`Config`] is the on-disk shape: every field optional so that sources
//! can be layered. [`Settings`] is the fully resolved result the rest of
//! the program works with.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default store directory, relative to the repository.
pub const DEFAULT_STORE_DIR: &str = "dotfiles";

/// Default filelist name, relative to the repository.
pub const DEFAULT_FILELIST: &str = "filelist";

/// Category active when none is configured.
pub const DEFAULT_ACTIVE_CATEGORY: &str = "common";

/// One configuration layer.
///
/// # Examples
///
/// ```
/// use dotrepo::config::{Config, ConflictPolicy};
///
/// let config: Config = serde_yaml::from_str("categories: [common, laptop]\nconflict_policy: keep\n").unwrap();
/// assert_eq!(config.categories, Some(vec!["common".to_string(), "laptop".to_string()]));
/// assert_eq!(config.conflict_policy, Some(ConflictPolicy::Keep));
///
/// assert!(serde_yaml::from_str::<Config>("symlinks: always\n").is_err());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Home directory tracked paths are relative to (`~` is expanded).
    pub home: Option<PathBuf>,

    /// Store directory, relative to the repository.
    pub store_dir: Option<PathBuf>,

    /// Filelist location, relative to the repository.
    pub filelist: Option<PathBuf>,

    /// Active categories.
    pub categories: Option<Vec<String>>,

    /// Plugin for filelist entries that do not name one.
    pub default_plugin: Option<String>,

    /// How conflicts are decided.
    pub conflict_policy: Option<ConflictPolicy>,
}

/// How the executor decides whether to discard divergent content.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Ask on the terminal for every conflict.
    #[default]
    Ask,
    /// Replace without asking.
    Replace,
    /// Keep the existing content without asking.
    Keep,
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ask => write!(f, "ask"),
            Self::Replace => write!(f, "replace"),
            Self::Keep => write!(f, "keep"),
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" => Ok(Self::Ask),
            "replace" => Ok(Self::Replace),
            "keep" => Ok(Self::Keep),
            _ => Err(format!(
                "invalid conflict policy '{s}' (expected ask, replace or keep)"
            )),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Repository root.
    pub repo: PathBuf,
    /// Home directory.
    pub home: PathBuf,
    /// Absolute store directory.
    pub store_dir: PathBuf,
    /// Absolute filelist path.
    pub filelist: PathBuf,
    /// Active categories, never empty.
    pub categories: Vec<String>,
    /// Plugin for filelist entries that do not name one.
    pub default_plugin: String,
    /// How conflicts are decided.
    pub conflict_policy: ConflictPolicy,
}
