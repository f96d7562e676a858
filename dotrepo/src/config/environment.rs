//! Environment variable handling for configuration overrides.
//!
//! `DOTREPO_*` variables override configuration files and are overridden
//! by command-line flags.

use crate::config::schema::{Config, ConflictPolicy};
use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Overrides the home directory.
pub const HOME_ENV: &str = "DOTREPO_HOME";
/// Comma-separated active categories.
pub const CATEGORIES_ENV: &str = "DOTREPO_CATEGORIES";
/// Overrides the default plugin.
pub const DEFAULT_PLUGIN_ENV: &str = "DOTREPO_DEFAULT_PLUGIN";
/// Overrides the conflict policy.
pub const CONFLICT_POLICY_ENV: &str = "DOTREPO_CONFLICT_POLICY";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use dotrepo::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply `DOTREPO_*` overrides to `config`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a variable holds an invalid value.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(home) = env::var(HOME_ENV) {
            if !home.is_empty() {
                config.home = Some(PathBuf::from(home));
            }
        }

        if let Ok(categories) = env::var(CATEGORIES_ENV) {
            config.categories = Some(Self::parse_categories(&categories)?);
        }

        if let Ok(plugin) = env::var(DEFAULT_PLUGIN_ENV) {
            config.default_plugin = Some(plugin);
        }

        if let Ok(policy) = env::var(CONFLICT_POLICY_ENV) {
            config.conflict_policy = Some(parse_policy(CONFLICT_POLICY_ENV, &policy)?);
        }

        Ok(())
    }

    /// Parse a comma-separated category list, ignoring blank items.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if no category remains.
    pub fn parse_categories(s: &str) -> Result<Vec<String>> {
        let categories: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();
        if categories.is_empty() {
            return Err(Error::Validation {
                field: CATEGORIES_ENV.into(),
                message: "at least one category is required".into(),
            });
        }
        Ok(categories)
    }
}

/// Policy parse helper shared with the CLI.
///
/// # Errors
///
/// Returns `Validation` naming `field` for unknown policies.
pub fn parse_policy(field: &str, value: &str) -> Result<ConflictPolicy> {
    value.parse().map_err(|message| Error::Validation {
        field: field.into(),
        message,
    })
}
