//! Layered construction of [`Settings`].

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::{
    Config, ConflictPolicy, Settings, DEFAULT_ACTIVE_CATEGORY, DEFAULT_FILELIST,
    DEFAULT_STORE_DIR,
};
use crate::config::validator::ConfigValidator;
use crate::error::{Error, Result};
use crate::paths::expand_tilde;
use crate::tracked::DEFAULT_PLUGIN;

/// Builds resolved settings from defaults, files, environment and
/// programmatic overrides, in increasing precedence.
///
/// # Examples
///
/// ```
/// use dotrepo::config::{Config, ConfigBuilder};
///
/// let overrides = Config {
///     home: Some("/home/me".into()),
///     categories: Some(vec!["laptop".into()]),
///     ..Default::default()
/// };
/// let settings = ConfigBuilder::new("/home/me/dots")
///     .skip_files()
///     .skip_env()
///     .with_config(overrides)
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.store_dir, std::path::Path::new("/home/me/dots/dotfiles"));
/// assert_eq!(settings.categories, ["laptop"]);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    repo: PathBuf,
    config_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Vec<Config>,
}

impl ConfigBuilder {
    /// Starts building settings for the repository at `repo`.
    #[must_use]
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            config_dir: None,
            skip_files: false,
            skip_env: false,
            overrides: Vec::new(),
        }
    }

    /// Reads the user config from `dir/config.yaml` instead of
    /// `~/.config/dotrepo/config.yaml`.
    #[must_use]
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Ignores configuration files.
    #[must_use]
    pub const fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignores `DOTREPO_*` environment variables.
    #[must_use]
    pub const fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Adds a layer with the highest precedence so far.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides.push(config);
        self
    }

    /// Merges every layer and resolves paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is invalid, an environment
    /// variable cannot be parsed, or validation fails.
    pub fn build(self) -> Result<Settings> {
        let mut config = Config::default();

        if !self.skip_files {
            for source in ConfigLoader::load_all(&self.repo, self.config_dir.as_deref())? {
                ConfigValidator::validate(&source.config)?;
                ConfigMerger::merge_into(&mut config, &source.config);
            }
        }

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        for layer in &self.overrides {
            ConfigMerger::merge_into(&mut config, layer);
        }
        ConfigValidator::validate(&config)?;

        let settings = Self::resolve(&self.repo, config)?;
        ConfigValidator::validate_settings(&settings)?;
        Ok(settings)
    }

    fn resolve(repo: &Path, config: Config) -> Result<Settings> {
        let home = match config.home {
            Some(home) => expand_tilde(&home)?,
            None => home::home_dir().ok_or_else(|| Error::InvalidPath {
                path: PathBuf::from("~"),
                reason: "cannot determine home directory".into(),
            })?,
        };

        let store_dir = config
            .store_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));
        let filelist = config
            .filelist
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILELIST));

        Ok(Settings {
            repo: repo.to_path_buf(),
            home,
            store_dir: repo.join(store_dir),
            filelist: repo.join(filelist),
            categories: config
                .categories
                .unwrap_or_else(|| vec![DEFAULT_ACTIVE_CATEGORY.to_string()]),
            default_plugin: config
                .default_plugin
                .unwrap_or_else(|| DEFAULT_PLUGIN.to_string()),
            conflict_policy: config.conflict_policy.unwrap_or(ConflictPolicy::Ask),
        })
    }
}
