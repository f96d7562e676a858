//! Configuration file discovery and loading.
//!
//! This module finds the user and repository configuration files and
//! parses them in precedence order.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the repository configuration file.
pub const REPO_CONFIG_FILE: &str = "dotrepo.yaml";

/// Configuration source with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed configuration.
    pub config: Config,
}

/// Loads configuration from the user and repository config files.
///
/// # Examples
///
/// ```
/// use dotrepo::config::ConfigLoader;
///
/// let repo = tempfile::tempdir().unwrap();
/// std::fs::write(repo.path().join("dotrepo.yaml"), "categories: [laptop]\n").unwrap();
///
/// let empty = tempfile::tempdir().unwrap();
/// let sources = ConfigLoader::load_all(repo.path(), Some(empty.path())).unwrap();
/// assert_eq!(sources.len(), 1);
/// assert_eq!(sources[0].config.categories, Some(vec!["laptop".to_string()]));
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load every configuration file that exists.
    ///
    /// Looks for:
    /// 1. User config at `~/.config/dotrepo/config.yaml` (precedence 1)
    /// 2. Repository config at `<repo>/dotrepo.yaml` (precedence 2)
    ///
    /// `config_dir` replaces `~/.config/dotrepo` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed.
    pub fn load_all(repo: &Path, config_dir: Option<&Path>) -> Result<Vec<ConfigSource>> {
        let mut sources = Vec::new();

        let user_path = match config_dir {
            Some(dir) => dir.join("config.yaml"),
            None => Self::user_config_path()?,
        };
        if let Some(source) = Self::load_optional(&user_path, 1)? {
            sources.push(source);
        }

        if let Some(source) = Self::load_optional(&repo.join(REPO_CONFIG_FILE), 2)? {
            sources.push(source);
        }

        sources.sort_by_key(|s| s.precedence);
        Ok(sources)
    }

    fn load_optional(path: &Path, precedence: u8) -> Result<Option<ConfigSource>> {
        if !path.exists() {
            return Ok(None);
        }
        log::debug!("loading configuration from {}", path.display());
        let config = Self::load_file(path)?;
        Ok(Some(ConfigSource {
            path: path.to_path_buf(),
            precedence,
            config,
        }))
    }

    /// Load and parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath` if the file cannot be read and `Configuration`
    /// if it is not valid configuration YAML.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("failed to read configuration file: {e}"),
        })?;

        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| Error::Configuration {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default user configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn user_config_path() -> Result<PathBuf> {
        let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
            path: PathBuf::from("~"),
            reason: "cannot determine home directory".into(),
        })?;
        Ok(home.join(".config").join("dotrepo").join("config.yaml"))
    }
}
