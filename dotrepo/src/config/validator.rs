//! Configuration validation.

use crate::config::schema::{Config, Settings};
use crate::error::{Error, Result};
use crate::paths::resolve_components;
use crate::tracked::validate_category;
use std::path::Path;

/// Validates configuration layers and resolved settings.
///
/// # Examples
///
/// ```
/// use dotrepo::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { categories: Some(vec!["a/b".into()]), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate one configuration layer.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for empty or malformed category names, an empty
    /// category list, and an empty plugin name.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref categories) = config.categories {
            Self::validate_categories(categories)?;
        }

        if let Some(ref plugin) = config.default_plugin {
            if plugin.trim().is_empty() {
                return Err(Error::Validation {
                    field: "default_plugin".into(),
                    message: "plugin name cannot be empty".into(),
                });
            }
        }

        if let Some(ref store_dir) = config.store_dir {
            Self::validate_not_empty("store_dir", store_dir)?;
        }

        if let Some(ref filelist) = config.filelist {
            Self::validate_not_empty("filelist", filelist)?;
        }

        Ok(())
    }

    /// Validate resolved settings.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if home and repository are the same directory,
    /// or if any layer-level rule fails.
    pub fn validate_settings(settings: &Settings) -> Result<()> {
        Self::validate_categories(&settings.categories)?;

        if resolve_components(&settings.home) == resolve_components(&settings.repo) {
            return Err(Error::Validation {
                field: "home".into(),
                message: format!(
                    "safety checks failed: home and repository are the same directory ({})",
                    settings.home.display()
                ),
            });
        }

        Ok(())
    }

    fn validate_categories(categories: &[String]) -> Result<()> {
        if categories.is_empty() {
            return Err(Error::Validation {
                field: "categories".into(),
                message: "at least one category must be active".into(),
            });
        }
        for category in categories {
            validate_category(category)?;
        }
        Ok(())
    }

    fn validate_not_empty(field: &str, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(Error::Validation {
                field: field.into(),
                message: "path cannot be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ConflictPolicy;
    use std::path::PathBuf;

    fn settings(home: &str, repo: &str) -> Settings {
        Settings {
            repo: PathBuf::from(repo),
            home: PathBuf::from(home),
            store_dir: PathBuf::from(repo).join("dotfiles"),
            filelist: PathBuf::from(repo).join("filelist"),
            categories: vec!["common".into()],
            default_plugin: "plain".into(),
            conflict_policy: ConflictPolicy::Ask,
        }
    }

    #[test]
    fn test_category_rules() {
        for bad in ["", "  ", "a/b", "..", "a\\b"] {
            let config = Config {
                categories: Some(vec![bad.into()]),
                ..Default::default()
            };
            assert!(ConfigValidator::validate(&config).is_err(), "{bad:?} accepted");
        }

        let empty = Config {
            categories: Some(Vec::new()),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&empty).is_err());
    }

    #[test]
    fn test_empty_plugin() {
        let config = Config {
            default_plugin: Some(" ".into()),
            ..Default::default()
        };
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert!(err.to_string().contains("default_plugin"));
    }

    #[test]
    fn test_home_equal_to_repo() {
        assert!(ConfigValidator::validate_settings(&settings("/home/me", "/home/me/")).is_err());
        assert!(ConfigValidator::validate_settings(&settings("/home/me", "/home/me/dots")).is_ok());
    }
}
